// Tests for NFSv3 protocol types.
#![allow(clippy::unwrap_used)]

use std::io::Cursor;

use nfspry_types::nfs3::{
    LOOKUP3args, Nfs3Option, Nfs3Result, READ3res, READDIR3res, createhow3, createverf3,
    devicedata3, diropargs3, filename3, mknoddata3, nfs_fh3, nfsstat3, sattr3, set_atime,
    set_gid3, set_mode3, set_mtime, specdata3,
};
use nfspry_types::xdr::{Opaque, Pack, Unpack};

fn handle(bytes: &[u8]) -> nfs_fh3 {
    nfs_fh3 {
        data: Opaque::owned(bytes.to_vec()),
    }
}

#[test]
fn lookup_args_bytes() {
    let args = LOOKUP3args {
        what: diropargs3 {
            dir: handle(&[0xaa, 0xbb, 0xcc, 0xdd]),
            name: filename3::from("a"),
        },
    };
    assert_eq!(args.packed_size(), 16);

    let mut buf = Vec::new();
    let written = args.pack(&mut buf).unwrap();
    assert_eq!(written, 16);
    assert_eq!(
        buf,
        [
            0x00, 0x00, 0x00, 0x04, // handle length
            0xaa, 0xbb, 0xcc, 0xdd, // handle data
            0x00, 0x00, 0x00, 0x01, // name length
            b'a', 0x00, 0x00, 0x00, // name, padded
        ]
    );
}

#[test]
fn read_res_without_attributes() {
    // NFS3_OK, absent post_op_attr, count 3, eof, 3 data bytes + pad
    let wire = [
        0x00, 0x00, 0x00, 0x00, // status
        0x00, 0x00, 0x00, 0x00, // attributes absent
        0x00, 0x00, 0x00, 0x03, // count
        0x00, 0x00, 0x00, 0x01, // eof
        0x00, 0x00, 0x00, 0x03, // data length
        b'f', b'o', b'o', 0x00, // data, padded
    ];

    let mut cursor = Cursor::new(wire.to_vec());
    let (res, read) = READ3res::unpack(&mut cursor).unwrap();
    assert_eq!(read, wire.len());
    let ok = res.unwrap();
    assert!(ok.file_attributes.is_none());
    assert_eq!(ok.count, 3);
    assert!(ok.eof);
    assert_eq!(ok.data.as_ref(), b"foo");
}

#[test]
fn read_res_error_carries_status() {
    let wire = [
        0x00, 0x00, 0x00, 0x0d, // NFS3ERR_ACCES
        0x00, 0x00, 0x00, 0x00, // attributes absent
    ];
    let mut cursor = Cursor::new(wire.to_vec());
    let (res, _) = READ3res::unpack(&mut cursor).unwrap();
    match res {
        Nfs3Result::Err((status, _)) => assert_eq!(status, nfsstat3::NFS3ERR_ACCES),
        Nfs3Result::Ok(_) => panic!("expected error result"),
    }
}

#[test]
fn readdir_res_entry_list() {
    // Two entries then eof; cookies 1 and 2.
    let mut wire = vec![
        0x00, 0x00, 0x00, 0x00, // status
        0x00, 0x00, 0x00, 0x00, // dir attributes absent
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // cookieverf
    ];
    for (fileid, name, cookie) in [(5u64, b"a", 1u64), (6u64, b"b", 2u64)] {
        wire.extend_from_slice(&[0, 0, 0, 1]); // value follows
        wire.extend_from_slice(&fileid.to_be_bytes());
        wire.extend_from_slice(&[0, 0, 0, 1, name[0], 0, 0, 0]);
        wire.extend_from_slice(&cookie.to_be_bytes());
    }
    wire.extend_from_slice(&[0, 0, 0, 0]); // end of list
    wire.extend_from_slice(&[0, 0, 0, 1]); // eof

    let mut cursor = Cursor::new(wire.clone());
    let (res, read) = READDIR3res::unpack(&mut cursor).unwrap();
    assert_eq!(read, wire.len());
    let ok = res.unwrap();
    assert!(ok.reply.eof);

    let entries = ok.reply.entries.into_inner();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].name.as_ref(), b"a");
    assert_eq!(entries[0].cookie, 1);
    assert_eq!(entries[1].name.as_ref(), b"b");
    assert_eq!(entries[1].cookie, 2);
}

#[test]
fn sattr3_mode_only() {
    let attrs = sattr3 {
        mode: set_mode3::Some(0o40755),
        ..sattr3::default()
    };

    let mut buf = Vec::new();
    let written = attrs.pack(&mut buf).unwrap();
    assert_eq!(written, attrs.packed_size());
    assert_eq!(
        buf,
        [
            0x00, 0x00, 0x00, 0x01, // mode present
            0x00, 0x00, 0x41, 0xed, // 0o40755
            0x00, 0x00, 0x00, 0x00, // uid absent
            0x00, 0x00, 0x00, 0x00, // gid absent
            0x00, 0x00, 0x00, 0x00, // size absent
            0x00, 0x00, 0x00, 0x00, // atime: don't change
            0x00, 0x00, 0x00, 0x00, // mtime: don't change
        ]
    );
}

#[test]
fn sattr3_roundtrip() {
    let attrs = sattr3 {
        mode: set_mode3::Some(0o644),
        gid: set_gid3::Some(100),
        atime: set_atime::SET_TO_SERVER_TIME,
        mtime: set_mtime::DONT_CHANGE,
        ..sattr3::default()
    };

    let mut buf = Vec::new();
    attrs.pack(&mut buf).unwrap();
    let mut cursor = Cursor::new(buf);
    let (decoded, _) = sattr3::unpack(&mut cursor).unwrap();
    assert!(matches!(decoded.mode, Nfs3Option::Some(0o644)));
    assert!(matches!(decoded.gid, Nfs3Option::Some(100)));
    assert!(decoded.uid.is_none());
    assert!(matches!(decoded.atime, set_atime::SET_TO_SERVER_TIME));
}

#[test]
fn createhow3_exclusive_is_bare_verifier() {
    let how = createhow3::EXCLUSIVE(createverf3([1, 2, 3, 4, 5, 6, 7, 8]));
    let mut buf = Vec::new();
    let written = how.pack(&mut buf).unwrap();
    assert_eq!(written, 12);
    assert_eq!(buf, [0, 0, 0, 2, 1, 2, 3, 4, 5, 6, 7, 8]);
}

#[test]
fn mknoddata3_device_roundtrip() {
    let data = mknoddata3::NF3BLK(devicedata3 {
        dev_attributes: sattr3 {
            mode: set_mode3::Some(0o777),
            ..sattr3::default()
        },
        spec: specdata3 {
            specdata1: 8,
            specdata2: 1,
        },
    });

    let mut buf = Vec::new();
    let written = data.pack(&mut buf).unwrap();
    assert_eq!(written, data.packed_size());
    assert_eq!(buf[..4], [0, 0, 0, 3]); // NF3BLK

    let mut cursor = Cursor::new(buf);
    let (decoded, _) = mknoddata3::unpack(&mut cursor).unwrap();
    match decoded {
        mknoddata3::NF3BLK(dev) => {
            assert_eq!(dev.spec.specdata1, 8);
            assert_eq!(dev.spec.specdata2, 1);
        }
        _ => panic!("expected NF3BLK"),
    }
}

#[test]
fn nfsstat3_renders_rfc_names() {
    assert_eq!(nfsstat3::NFS3ERR_PERM.to_string(), "NFS3ERR_PERM");
    assert_eq!(nfsstat3::NFS3ERR_NOENT.to_string(), "NFS3ERR_NOENT");
    assert_eq!(nfsstat3::NFS3ERR_JUKEBOX.to_string(), "NFS3ERR_JUKEBOX");
}
