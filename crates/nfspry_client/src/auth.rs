//! Authenticator construction.

use nfspry_types::rpc::{AUTH_UNIX_MACHINENAME_MAX, auth_unix, opaque_auth};
use nfspry_types::xdr::Opaque;

use crate::error::Error;

/// Builds an `AUTH_UNIX` credential for the given identity: the local
/// hostname, the uid, the gid, and a single-element group list.
#[must_use]
pub fn unix_credential(uid: u32, gid: u32) -> opaque_auth<'static> {
    let mut machinename = local_hostname();
    machinename.truncate(AUTH_UNIX_MACHINENAME_MAX);

    let auth = auth_unix {
        stamp: rand::random(),
        machinename: Opaque::owned(machinename),
        uid,
        gid,
        gids: vec![gid],
    };
    opaque_auth::auth_unix(&auth)
}

/// `AUTH_DES` needs a key exchange this client does not implement.
pub fn des_credential(_uid: u32, _secret_key: &str) -> Result<opaque_auth<'static>, Error> {
    Err(Error::AuthUnsupported("AUTH_DES"))
}

fn local_hostname() -> Vec<u8> {
    let mut buf = [0u8; 256];
    let rc = unsafe { libc::gethostname(buf.as_mut_ptr().cast(), buf.len()) };
    if rc != 0 {
        return b"unknown".to_vec();
    }
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    buf[..end].to_vec()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::io::Cursor;

    use nfspry_types::rpc::auth_flavor;
    use nfspry_types::xdr::Unpack;

    use super::*;

    #[test]
    fn unix_credential_carries_single_group() {
        let cred = unix_credential(0xffff_fffe, 0xffff_fffe);
        assert_eq!(cred.flavor, auth_flavor::AUTH_UNIX);

        let mut cursor = Cursor::new(cred.body.to_vec());
        let (auth, _) = auth_unix::unpack(&mut cursor).unwrap();
        assert_eq!(auth.uid, 0xffff_fffe);
        assert_eq!(auth.gid, 0xffff_fffe);
        assert_eq!(auth.gids, vec![0xffff_fffe]);
        assert!(auth.machinename.len() <= AUTH_UNIX_MACHINENAME_MAX);
    }

    #[test]
    fn des_credential_is_rejected() {
        let err = des_credential(0, "secret").unwrap_err();
        assert!(matches!(err, Error::AuthUnsupported("AUTH_DES")));
    }
}
