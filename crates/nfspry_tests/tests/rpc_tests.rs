// Client-engine tests against the scripted in-memory peer.
#![allow(clippy::unwrap_used)]

use nfspry_client::error::{Error, PortmapError, RpcError};
use nfspry_client::rpc::RpcClient;
use nfspry_client::{MountClient, PortmapperClient};
use nfspry_tests::{Reply, ScriptTransport, pack, unpack};
use nfspry_types::mount::{
    MOUNT_PROGRAM, dirpath, export_node, exports, fhandle3, mountres3, mountres3_ok, mountstat3,
    name,
};
use nfspry_types::portmap::{PMAP_PROG, call_args, call_result, mapping};
use nfspry_types::rpc::accept_stat_data;
use nfspry_types::xdr::{List, Opaque, Void};

fn rpc_over(handler: impl FnMut(u32, Vec<u8>) -> Reply + 'static) -> RpcClient {
    RpcClient::new(ScriptTransport::new(handler))
}

#[tokio::test(flavor = "current_thread")]
async fn call_roundtrip() {
    let mut rpc = rpc_over(|proc, args| {
        assert_eq!(proc, 0);
        assert!(args.is_empty());
        Reply::Success(Vec::new())
    });
    let Void = rpc.call(100_003, 3, 0, &Void).await.unwrap();
}

#[tokio::test(flavor = "current_thread")]
async fn xid_mismatch_is_rejected() {
    let mut rpc = rpc_over(|_, _| Reply::WrongXid(Vec::new()));
    let err = rpc.call::<Void, Void>(100_003, 3, 0, &Void).await.unwrap_err();
    assert!(matches!(err, Error::Rpc(RpcError::UnexpectedXid)));
}

#[tokio::test(flavor = "current_thread")]
async fn denied_reply_is_an_auth_error() {
    let mut rpc = rpc_over(|_, _| Reply::Denied);
    let err = rpc.call::<Void, Void>(100_003, 3, 0, &Void).await.unwrap_err();
    assert!(matches!(err, Error::Rpc(RpcError::Auth(_))));
}

#[tokio::test(flavor = "current_thread")]
async fn prog_unavail_is_surfaced() {
    let mut rpc = rpc_over(|_, _| Reply::Error(accept_stat_data::PROG_UNAVAIL));
    let err = rpc.call::<Void, Void>(100_003, 3, 0, &Void).await.unwrap_err();
    assert!(matches!(err, Error::Rpc(RpcError::ProgUnavail)));
}

#[tokio::test(flavor = "current_thread")]
async fn trailing_reply_bytes_are_rejected() {
    let mut rpc = rpc_over(|_, _| Reply::Success(vec![0, 0, 0, 0, 9, 9, 9, 9]));
    let err = rpc.call::<Void, u32>(100_003, 3, 0, &Void).await.unwrap_err();
    assert!(matches!(err, Error::Rpc(RpcError::NotFullyParsed { .. })));
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn silent_peer_times_out() {
    let mut rpc = rpc_over(|_, _| Reply::Silence);
    rpc.set_timeout(std::time::Duration::from_secs(60));
    let err = rpc.call::<Void, Void>(100_003, 3, 0, &Void).await.unwrap_err();
    assert!(matches!(err, Error::Timeout));
}

#[tokio::test(flavor = "current_thread")]
async fn getport_resolves_mapping() {
    let rpc = rpc_over(|proc, args| {
        assert_eq!(proc, PMAP_PROG::PMAPPROC_GETPORT as u32);
        let mapping: mapping = unpack(&args);
        assert_eq!(mapping.prog, 100_005);
        assert_eq!(mapping.vers, 3);
        assert_eq!(mapping.prot, 6);
        assert_eq!(mapping.port, 0);
        Reply::Success(pack(&2049u32))
    });
    let mut portmapper = PortmapperClient::new(rpc);
    let port = portmapper.getport(100_005, 3, 6).await.unwrap();
    assert_eq!(port, 2049);
}

#[tokio::test(flavor = "current_thread")]
async fn getport_zero_means_unregistered() {
    let rpc = rpc_over(|_, _| Reply::Success(pack(&0u32)));
    let mut portmapper = PortmapperClient::new(rpc);
    let err = portmapper.getport(100_005, 3, 17).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Portmap(PortmapError::ProgramUnavailable)
    ));
}

#[tokio::test(flavor = "current_thread")]
async fn callit_embeds_and_relays_the_mount_call() {
    let rpc = rpc_over(|proc, args| {
        assert_eq!(proc, PMAP_PROG::PMAPPROC_CALLIT as u32);
        let call: call_args = unpack(&args);
        assert_eq!(call.prog, 100_005);
        assert_eq!(call.vers, 3);
        assert_eq!(call.proc, MOUNT_PROGRAM::MOUNTPROC3_MNT as u32);

        let path: dirpath = unpack(call.args.as_ref());
        assert_eq!(path.0.as_ref(), b"/export/pub");

        let res = mountres3::Ok(mountres3_ok {
            fhandle: fhandle3(Opaque::borrowed(&[7u8; 32])),
            auth_flavors: vec![1],
        });
        let result = call_result {
            port: 723,
            res: Opaque::owned(pack(&res)),
        };
        Reply::Success(pack(&result))
    });

    let mut portmapper = PortmapperClient::new(rpc);
    let result = portmapper
        .callit(
            100_005,
            3,
            MOUNT_PROGRAM::MOUNTPROC3_MNT as u32,
            &dirpath(Opaque::borrowed(b"/export/pub")),
        )
        .await
        .unwrap();
    assert_eq!(result.port, 723);

    let embedded: mountres3 = unpack(result.res.as_ref());
    match embedded {
        mountres3::Ok(ok) => assert_eq!(ok.fhandle.0.len(), 32),
        mountres3::Err(_) => panic!("expected an embedded success"),
    }
}

#[tokio::test(flavor = "current_thread")]
async fn mnt_returns_the_handle() {
    let rpc = rpc_over(|proc, args| {
        assert_eq!(proc, MOUNT_PROGRAM::MOUNTPROC3_MNT as u32);
        let path: dirpath = unpack(&args);
        assert_eq!(path.0.as_ref(), b"/export");
        let res = mountres3::Ok(mountres3_ok {
            fhandle: fhandle3(Opaque::borrowed(&[0xab; 16])),
            auth_flavors: vec![1],
        });
        Reply::Success(pack(&res))
    });

    let mut mount = MountClient::new(rpc);
    let ok = mount
        .mnt(dirpath(Opaque::borrowed(b"/export")))
        .await
        .unwrap();
    assert_eq!(ok.fhandle.0.as_ref(), &[0xab; 16]);
    assert_eq!(ok.auth_flavors, vec![1]);
}

#[tokio::test(flavor = "current_thread")]
async fn mnt_failure_carries_the_status() {
    let rpc = rpc_over(|_, _| Reply::Success(pack(&mountres3::Err(mountstat3::MNT3ERR_ACCES))));
    let mut mount = MountClient::new(rpc);
    let err = mount
        .mnt(dirpath(Opaque::borrowed(b"/secret")))
        .await
        .unwrap_err();
    match err {
        Error::Mount(status) => assert_eq!(status.to_string(), "MNT3ERR_ACCES"),
        other => panic!("expected a mount error, got {other:?}"),
    }
}

#[tokio::test(flavor = "current_thread")]
async fn umnt_and_umntall_are_void() {
    let rpc = rpc_over(|proc, _| {
        assert!(
            proc == MOUNT_PROGRAM::MOUNTPROC3_UMNT as u32
                || proc == MOUNT_PROGRAM::MOUNTPROC3_UMNTALL as u32
        );
        Reply::Success(Vec::new())
    });
    let mut mount = MountClient::new(rpc);
    mount.umnt(dirpath(Opaque::borrowed(b"/export"))).await.unwrap();
    mount.umntall().await.unwrap();
}

#[tokio::test(flavor = "current_thread")]
async fn export_list_decodes() {
    let rpc = rpc_over(|proc, _| {
        assert_eq!(proc, MOUNT_PROGRAM::MOUNTPROC3_EXPORT as u32);
        let list: exports = List(vec![
            export_node {
                ex_dir: dirpath(Opaque::borrowed(b"/export/pub")),
                ex_groups: List(vec![]),
            },
            export_node {
                ex_dir: dirpath(Opaque::borrowed(b"/export/home")),
                ex_groups: List(vec![name(Opaque::borrowed(b"trusted"))]),
            },
        ]);
        Reply::Success(pack(&list))
    });

    let mut mount = MountClient::new(rpc);
    let list = mount.export().await.unwrap();
    let nodes = list.into_inner();
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0].ex_dir.0.as_ref(), b"/export/pub");
    assert!(nodes[0].ex_groups.is_empty());
    assert_eq!(nodes[1].ex_groups.iter().count(), 1);
}
