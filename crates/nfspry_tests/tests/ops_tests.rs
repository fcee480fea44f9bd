// Driver-pipeline tests against the stateful in-memory peer.
#![allow(clippy::unwrap_used, clippy::cast_possible_truncation)]

use nfspry::ops;
use nfspry_client::rpc::RpcClient;
use nfspry_client::NfsClient;
use nfspry_tests::{MemPeer, Reply, ScriptTransport, pack, reg_attrs, unpack};
use nfspry_types::nfs3::{
    LOOKUP3args, LOOKUP3res, LOOKUP3resok, NFS_PROGRAM, Nfs3Option, Nfs3Result, ftype3, nfs_fh3,
};
use nfspry_types::xdr::Opaque;

fn client_for(peer: &MemPeer) -> NfsClient {
    NfsClient::new(RpcClient::new(peer.transport()))
}

#[tokio::test(flavor = "current_thread")]
async fn readdir_pages_with_cookie_from_last_entry() {
    let peer = MemPeer::new();
    for name in ["epsilon", "alpha", "delta", "beta", "gamma"] {
        peer.insert(name, b"x");
    }
    let mut nfs = client_for(&peer);

    let names = ops::read_dir_names(&mut nfs, &MemPeer::root()).await.unwrap();
    assert_eq!(names, vec!["alpha", "beta", "delta", "epsilon", "gamma"]);

    // two entries per page over five files: resumed at the cookie of the
    // last entry of each reply
    assert_eq!(*peer.cookies_seen.borrow(), vec![0, 2, 4]);
}

#[tokio::test(flavor = "current_thread")]
async fn read_file_loops_until_size_is_covered() {
    let content: Vec<u8> = (0..5000u32).map(|i| (i % 251) as u8).collect();
    let peer = MemPeer::new();
    peer.insert("blob", &content);
    let mut nfs = client_for(&peer);

    let fh = ops::lookup(&mut nfs, &MemPeer::root(), "blob").await.unwrap().object;
    let mut out = Vec::new();
    let received = ops::read_file(&mut nfs, &fh, content.len() as u64, 1024, &mut out)
        .await
        .unwrap();

    assert_eq!(received, content.len() as u64);
    assert_eq!(out, content);
}

#[tokio::test(flavor = "current_thread")]
async fn put_then_get_is_byte_identical() {
    // more than 4x the transfer size, not chunk-aligned
    let transfer_size = 1024u32;
    let content: Vec<u8> = (0..4 * 1024 + 7u32).map(|i| (i * 31 % 256) as u8).collect();

    let peer = MemPeer::new();
    let mut nfs = client_for(&peer);

    let mut src = std::io::Cursor::new(content.clone());
    let sent = ops::write_file(
        &mut nfs,
        &MemPeer::root(),
        "upload.bin",
        &mut src,
        transfer_size as usize,
    )
    .await
    .unwrap();
    assert_eq!(sent, content.len() as u64);
    assert_eq!(peer.content("upload.bin").unwrap(), content);

    let fh = ops::lookup(&mut nfs, &MemPeer::root(), "upload.bin")
        .await
        .unwrap()
        .object;
    let mut fetched = Vec::new();
    let received = ops::read_file(
        &mut nfs,
        &fh,
        content.len() as u64,
        transfer_size,
        &mut fetched,
    )
    .await
    .unwrap();

    assert_eq!(received, content.len() as u64);
    assert_eq!(fetched, content);
}

#[tokio::test(flavor = "current_thread")]
async fn put_over_an_existing_file_warns_and_continues() {
    let peer = MemPeer::new();
    peer.insert("present", b"old");
    let mut nfs = client_for(&peer);

    let mut src = std::io::Cursor::new(b"new".to_vec());
    let sent = ops::write_file(&mut nfs, &MemPeer::root(), "present", &mut src, 1024)
        .await
        .unwrap();
    assert_eq!(sent, 3);
    assert_eq!(peer.content("present").unwrap(), b"new");
}

fn dir_handle(tag: &[u8]) -> nfs_fh3 {
    nfs_fh3 {
        data: Opaque::owned(tag.to_vec()),
    }
}

/// A lookup-only peer describing `/a/b` as directories and `/a/b/c` as a
/// regular file.
fn walk_transport() -> Box<dyn nfspry_client::transport::Transport> {
    ScriptTransport::new(|proc, args| {
        assert_eq!(proc, NFS_PROGRAM::NFSPROC3_LOOKUP as u32);
        let args: LOOKUP3args = unpack(&args);
        let name = String::from_utf8_lossy(args.what.name.as_ref()).into_owned();

        let (handle, type_) = match name.as_str() {
            "a" => (dir_handle(b"a"), ftype3::NF3DIR),
            "b" => (dir_handle(b"ab"), ftype3::NF3DIR),
            "c" => (dir_handle(b"abc"), ftype3::NF3REG),
            _ => {
                let res: LOOKUP3res = Nfs3Result::Err((
                    nfspry_types::nfs3::nfsstat3::NFS3ERR_NOENT,
                    nfspry_types::nfs3::LOOKUP3resfail::default(),
                ));
                return Reply::Success(pack(&res));
            }
        };

        let mut attrs = reg_attrs(0, 1);
        attrs.type_ = type_;
        let res: LOOKUP3res = Nfs3Result::Ok(LOOKUP3resok {
            object: handle,
            obj_attributes: Nfs3Option::Some(attrs),
            dir_attributes: Nfs3Option::None,
        });
        Reply::Success(pack(&res))
    })
}

#[tokio::test(flavor = "current_thread")]
async fn resolve_dir_walks_each_segment() {
    let mut nfs = NfsClient::new(RpcClient::new(walk_transport()));
    let root = dir_handle(b"root");

    let handle = ops::resolve_dir(&mut nfs, &root, &root, "a/b").await.unwrap();
    assert_eq!(handle.data.as_ref(), b"ab");
}

#[tokio::test(flavor = "current_thread")]
async fn resolve_dir_rejects_a_file_segment() {
    let mut nfs = NfsClient::new(RpcClient::new(walk_transport()));
    let root = dir_handle(b"root");

    let err = ops::resolve_dir(&mut nfs, &root, &root, "a/b/c").await.unwrap_err();
    assert_eq!(err.to_string(), "c: is not a directory");
}

#[tokio::test(flavor = "current_thread")]
async fn resolve_dir_resets_on_leading_slash() {
    let mut nfs = NfsClient::new(RpcClient::new(walk_transport()));
    let root = dir_handle(b"root");
    let cwd = dir_handle(b"elsewhere");

    // empty path and absolute path both start from the root
    let handle = ops::resolve_dir(&mut nfs, &root, &cwd, "").await.unwrap();
    assert_eq!(handle.data.as_ref(), b"root");

    let handle = ops::resolve_dir(&mut nfs, &root, &cwd, "/a").await.unwrap();
    assert_eq!(handle.data.as_ref(), b"a");
}

#[tokio::test(flavor = "current_thread")]
async fn missing_attributes_are_a_protocol_anomaly() {
    let transport = ScriptTransport::new(|_, _| {
        let res: LOOKUP3res = Nfs3Result::Ok(LOOKUP3resok {
            object: dir_handle(b"x"),
            obj_attributes: Nfs3Option::None,
            dir_attributes: Nfs3Option::None,
        });
        Reply::Success(pack(&res))
    });
    let mut nfs = NfsClient::new(RpcClient::new(transport));
    let root = dir_handle(b"root");

    let err = ops::resolve_dir(&mut nfs, &root, &root, "x").await.unwrap_err();
    assert!(err.to_string().contains("no attributes"));
}
