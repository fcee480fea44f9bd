//! RPC call core.

use std::fmt::Debug;
use std::io::Cursor;
use std::time::Duration;

use nfspry_types::rpc::{
    RPC_VERSION_2, accept_stat_data, call_body, msg_body, opaque_auth, reply_body, rpc_msg,
};
use nfspry_types::xdr::{Pack, Unpack};
use tracing::trace;

use crate::error::{Error, RpcError};
use crate::transport::Transport;

/// Timeout applied uniformly to every call unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// A long-lived client handle for one RPC channel.
///
/// Owns the transport (dropping the client closes the socket), the XID
/// sequence, and the authenticator used on every call. The authenticator
/// fields come first so teardown releases them before the transport.
pub struct RpcClient {
    credential: opaque_auth<'static>,
    verifier: opaque_auth<'static>,
    transport: Box<dyn Transport>,
    xid: u32,
    timeout: Duration,
}

impl Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        f.debug_struct("RpcClient").finish()
    }
}

impl RpcClient {
    /// Creates a client with a random initial XID and no authentication.
    #[must_use]
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            xid: rand::random(),
            credential: opaque_auth::default(),
            verifier: opaque_auth::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Replaces the authenticator. The previous one is dropped first.
    pub fn set_auth(&mut self, credential: opaque_auth<'static>) {
        self.credential = credential;
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Calls a procedure: one request record out, one reply record in,
    /// all within the session timeout.
    pub async fn call<C, R>(&mut self, prog: u32, vers: u32, proc: u32, args: &C) -> Result<R, Error>
    where
        C: Pack,
        R: Unpack,
    {
        let record = {
            let call = call_body {
                rpcvers: RPC_VERSION_2,
                prog,
                vers,
                proc,
                cred: self.credential.borrow(),
                verf: self.verifier.borrow(),
            };
            let msg = rpc_msg {
                xid: self.xid,
                body: msg_body::CALL(call),
            };

            let mut buf = Vec::with_capacity(msg.packed_size() + args.packed_size());
            msg.pack(&mut buf)?;
            args.pack(&mut buf)?;
            buf
        };
        if record.len() % 4 != 0 {
            return Err(RpcError::WrongLength.into());
        }

        let xid = self.xid;
        self.xid = self.xid.wrapping_add(1);
        trace!(prog, vers, proc, xid, len = record.len(), "RPC call");

        let reply = tokio::time::timeout(self.timeout, async {
            self.transport.send_record(&record).await?;
            self.transport.recv_record().await
        })
        .await
        .map_err(|_| Error::Timeout)?
        .map_err(Error::Io)?;

        Self::parse_reply(reply, xid)
    }

    fn parse_reply<R: Unpack>(reply: Vec<u8>, xid: u32) -> Result<R, Error> {
        let len = reply.len() as u64;
        let mut cursor = Cursor::new(reply);
        let (msg, _) = rpc_msg::unpack(&mut cursor)?;

        if msg.xid != xid {
            return Err(RpcError::UnexpectedXid.into());
        }

        let accepted = match msg.body {
            msg_body::REPLY(reply_body::MSG_ACCEPTED(accepted)) => accepted,
            msg_body::REPLY(reply_body::MSG_DENIED(denied)) => return Err(denied.into()),
            msg_body::CALL(_) => return Err(RpcError::UnexpectedCall.into()),
        };

        if !matches!(accepted.reply_data, accept_stat_data::SUCCESS) {
            let rpc_error = RpcError::try_from(accepted.reply_data)
                .expect("SUCCESS is handled above");
            return Err(rpc_error.into());
        }

        let (value, _) = R::unpack(&mut cursor)?;
        if cursor.position() != len {
            return Err(RpcError::NotFullyParsed {
                pos: cursor.position(),
                len,
            }
            .into());
        }
        Ok(value)
    }
}
