use nfspry_types::portmap::{PMAP_PROG, PROGRAM, VERSION, call_args, call_result, mapping};
use nfspry_types::xdr::{Opaque, Pack, Unpack};

use crate::error::{Error, PortmapError};
use crate::rpc::RpcClient;

/// Client for the portmapper service.
#[derive(Debug)]
pub struct PortmapperClient {
    rpc: RpcClient,
}

impl PortmapperClient {
    #[must_use]
    pub fn new(rpc: RpcClient) -> Self {
        Self { rpc }
    }

    /// Resolves the port registered for `(prog, vers, prot)`.
    pub async fn getport(&mut self, prog: u32, vers: u32, prot: u32) -> Result<u16, Error> {
        let args = mapping {
            prog,
            vers,
            prot,
            port: 0,
        };

        let port: u32 = self.call(PMAP_PROG::PMAPPROC_GETPORT, &args).await?;
        match u16::try_from(port) {
            Ok(0) => Err(PortmapError::ProgramUnavailable.into()),
            Ok(port) => Ok(port),
            Err(_) => Err(PortmapError::InvalidPortValue(port).into()),
        }
    }

    /// Calls a remote procedure indirectly via `PMAPPROC_CALLIT`: the
    /// portmapper forwards the packed arguments to the target program and
    /// relays its reply. Useful for reaching a service from the
    /// portmapper's own source address and port.
    pub async fn callit<C: Pack>(
        &mut self,
        prog: u32,
        vers: u32,
        proc: u32,
        args: &C,
    ) -> Result<call_result<'static>, Error> {
        let mut packed = Vec::with_capacity(args.packed_size());
        args.pack(&mut packed)?;

        let callit = call_args {
            prog,
            vers,
            proc,
            args: Opaque::owned(packed),
        };
        self.call(PMAP_PROG::PMAPPROC_CALLIT, &callit).await
    }

    async fn call<C, R>(&mut self, proc: PMAP_PROG, args: &C) -> Result<R, Error>
    where
        C: Pack,
        R: Unpack,
    {
        self.rpc.call(PROGRAM, VERSION, proc as u32, args).await
    }
}
