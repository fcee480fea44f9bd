use nfspry_types::mount::{
    MOUNT_PROGRAM, PROGRAM, VERSION, dirpath, exports, mountlist, mountres3, mountres3_ok,
};
use nfspry_types::rpc::opaque_auth;
use nfspry_types::xdr::{Pack, Unpack, Void};

use crate::error::Error;
use crate::rpc::RpcClient;

/// Client for the mount service.
#[derive(Debug)]
pub struct MountClient {
    rpc: RpcClient,
}

impl MountClient {
    #[must_use]
    pub fn new(rpc: RpcClient) -> Self {
        Self { rpc }
    }

    /// Replaces the channel's authenticator.
    pub fn set_auth(&mut self, credential: opaque_auth<'static>) {
        self.rpc.set_auth(credential);
    }

    /// Mounts an export, returning its file handle.
    pub async fn mnt(&mut self, path: dirpath<'_>) -> Result<mountres3_ok<'static>, Error> {
        let result: mountres3<'static> = self.call(MOUNT_PROGRAM::MOUNTPROC3_MNT, &path).await?;
        match result {
            mountres3::Ok(ok) => Ok(ok),
            mountres3::Err(status) => Err(Error::Mount(status)),
        }
    }

    /// Removes one entry from the server's mount table.
    pub async fn umnt(&mut self, path: dirpath<'_>) -> Result<(), Error> {
        let Void = self.call(MOUNT_PROGRAM::MOUNTPROC3_UMNT, &path).await?;
        Ok(())
    }

    /// Removes every entry for this client from the server's mount table.
    /// The protocol defines no argument; the caller is identified by the
    /// RPC credentials.
    pub async fn umntall(&mut self) -> Result<(), Error> {
        let Void = self.call(MOUNT_PROGRAM::MOUNTPROC3_UMNTALL, &Void).await?;
        Ok(())
    }

    /// Fetches the export list.
    pub async fn export(&mut self) -> Result<exports<'static, 'static>, Error> {
        self.call(MOUNT_PROGRAM::MOUNTPROC3_EXPORT, &Void).await
    }

    /// Fetches the server's mount table.
    pub async fn dump(&mut self) -> Result<mountlist<'static, 'static>, Error> {
        self.call(MOUNT_PROGRAM::MOUNTPROC3_DUMP, &Void).await
    }

    async fn call<C, R>(&mut self, proc: MOUNT_PROGRAM, args: &C) -> Result<R, Error>
    where
        C: Pack,
        R: Unpack,
    {
        self.rpc.call(PROGRAM, VERSION, proc as u32, args).await
    }
}
