// Tests for RPC and Mount protocol types.
#![allow(clippy::unwrap_used)]

use std::borrow::Cow;
use std::io::Cursor;

use nfspry_types::mount::{fhandle3, mountres3, mountres3_ok, mountstat3};
use nfspry_types::rpc::{
    RPC_VERSION_2, auth_unix, call_body, fragment_header, msg_body, opaque_auth, rpc_msg,
};
use nfspry_types::xdr::{Opaque, Pack, Unpack};

fn null_call() -> call_body<'static> {
    call_body {
        rpcvers: RPC_VERSION_2,
        prog: 100_003,
        vers: 3,
        proc: 0,
        cred: opaque_auth::default(),
        verf: opaque_auth::default(),
    }
}

#[test]
fn rpc_call_len() {
    let call = null_call();
    assert_eq!(call.packed_size(), 32);

    let msg = rpc_msg {
        xid: 123,
        body: msg_body::CALL(call),
    };
    assert_eq!(msg.packed_size(), 40);
}

#[test]
fn rpc_call_roundtrip() {
    let msg = rpc_msg {
        xid: 123,
        body: msg_body::CALL(null_call()),
    };

    let mut buf = Vec::new();
    let written = msg.pack(&mut buf).unwrap();
    assert_eq!(written, 40);

    let mut cursor = Cursor::new(buf);
    let (decoded, read) = rpc_msg::unpack(&mut cursor).unwrap();
    assert_eq!(read, written);
    assert_eq!(decoded.xid, 123);
    match decoded.body {
        msg_body::CALL(call) => {
            assert_eq!(call.rpcvers, RPC_VERSION_2);
            assert_eq!(call.prog, 100_003);
            assert_eq!(call.vers, 3);
            assert_eq!(call.proc, 0);
        }
        msg_body::REPLY(_) => panic!("expected CALL message body"),
    }
}

#[test]
fn auth_unix_credential_bytes() {
    let auth = auth_unix {
        stamp: 0,
        machinename: Opaque::owned(b"host".to_vec()),
        uid: 0xffff_fffe,
        gid: 0xffff_fffe,
        gids: vec![0xffff_fffe],
    };
    let cred = opaque_auth::auth_unix(&auth);

    let mut buf = Vec::new();
    cred.pack(&mut buf).unwrap();
    assert_eq!(
        buf,
        [
            0x00, 0x00, 0x00, 0x01, // AUTH_UNIX
            0x00, 0x00, 0x00, 0x1c, // body length: 28
            0x00, 0x00, 0x00, 0x00, // stamp
            0x00, 0x00, 0x00, 0x04, // machine name length
            b'h', b'o', b's', b't', // machine name, no padding needed
            0xff, 0xff, 0xff, 0xfe, // uid (-2)
            0xff, 0xff, 0xff, 0xfe, // gid (-2)
            0x00, 0x00, 0x00, 0x01, // one group
            0xff, 0xff, 0xff, 0xfe, // the gid again
        ]
    );
}

#[test]
fn mountres3_success_bytes() {
    let res = mountres3::Ok(mountres3_ok {
        fhandle: fhandle3(Opaque(Cow::Borrowed(&[0x12, 0x34, 0x56, 0x78]))),
        auth_flavors: vec![1],
    });

    let mut buf = Vec::new();
    let written = res.pack(&mut buf).unwrap();
    assert_eq!(written, res.packed_size());
    assert_eq!(
        buf,
        [
            0x00, 0x00, 0x00, 0x00, // MNT3_OK
            0x00, 0x00, 0x00, 0x04, // fhandle length
            0x12, 0x34, 0x56, 0x78, // fhandle data
            0x00, 0x00, 0x00, 0x01, // one auth flavor
            0x00, 0x00, 0x00, 0x01, // AUTH_UNIX
        ]
    );

    let mut cursor = Cursor::new(buf);
    let (decoded, read) = mountres3::unpack(&mut cursor).unwrap();
    assert_eq!(read, written);
    match decoded {
        mountres3::Ok(ok) => {
            assert_eq!(ok.fhandle.0.as_ref(), [0x12, 0x34, 0x56, 0x78]);
            assert_eq!(ok.auth_flavors, vec![1]);
        }
        mountres3::Err(_) => panic!("expected success response"),
    }
}

#[test]
fn mountres3_error_is_bare_status() {
    let res = mountres3::Err(mountstat3::MNT3ERR_PERM);
    let mut buf = Vec::new();
    assert_eq!(res.pack(&mut buf).unwrap(), 4);
    assert_eq!(buf, [0x00, 0x00, 0x00, 0x01]);

    let mut cursor = Cursor::new(buf);
    let (decoded, _) = mountres3::unpack(&mut cursor).unwrap();
    match decoded {
        mountres3::Err(err) => assert_eq!(err, mountstat3::MNT3ERR_PERM),
        mountres3::Ok(_) => panic!("expected error response"),
    }
}

#[test]
fn fhandle3_converts_to_nfs_handle() {
    let data = vec![0x42u8; 32];
    let fh = fhandle3(Opaque(Cow::Borrowed(&data)));
    let nfs_fh = fh.to_nfs_fh3();
    assert_eq!(nfs_fh.data.as_ref(), &data[..]);

    // distinct buffers: mutating the original must not alias
    drop(fh);
    assert_eq!(nfs_fh.data.len(), 32);
}

#[test]
fn fragment_header_flags() {
    let header = fragment_header::new(40, true);
    assert!(header.last());
    assert_eq!(header.fragment_length(), 40);
    assert_eq!(header.to_bytes(), [0x80, 0x00, 0x00, 0x28]);

    let partial = fragment_header::new(0x1234, false);
    assert!(!partial.last());
    assert_eq!(partial.fragment_length(), 0x1234);

    let parsed = fragment_header::from([0x80, 0x00, 0x00, 0x28]);
    assert!(parsed.last());
    assert_eq!(parsed.fragment_length(), 40);
}

#[test]
fn mountstat3_renders_rfc_names() {
    assert_eq!(mountstat3::MNT3ERR_ACCES.to_string(), "MNT3ERR_ACCES");
    assert_eq!(
        mountstat3::MNT3ERR_SERVERFAULT.to_string(),
        "MNT3ERR_SERVERFAULT"
    );
}
