//! MOUNT-side verbs: session setup, export enumeration, handle access.

use anyhow::{Result, bail};
use nfspry_client::net::Proto;
use nfspry_types::nfs3::NFS3_FHSIZE;

use super::usage;
use crate::session::{MountOptions, Session};

pub async fn host(session: &mut Session, args: &[&str]) -> Result<()> {
    let &[spec] = args else {
        return Err(usage("host"));
    };
    session.open_host(spec).await
}

pub async fn mount(session: &mut Session, args: &[&str]) -> Result<()> {
    let mut opts = MountOptions::default();
    let mut path = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if let Some(flags) = arg.strip_prefix('-') {
            for flag in flags.chars() {
                match flag {
                    'u' => opts.evade = true,
                    'p' => opts.via_portmap = true,
                    'T' => opts.proto = Some(Proto::Tcp),
                    'U' => opts.proto = Some(Proto::Udp),
                    'P' => {
                        let value = iter.next().ok_or_else(|| usage("mount"))?;
                        // taken as typed, in host byte order
                        opts.port = Some(
                            value
                                .parse()
                                .map_err(|_| anyhow::anyhow!("{value}: bad port"))?,
                        );
                    }
                    _ => return Err(usage("mount")),
                }
            }
        } else if path.is_none() {
            path = Some(*arg);
        } else {
            return Err(usage("mount"));
        }
    }

    let Some(path) = path else {
        return Err(usage("mount"));
    };
    session.mount(path, opts).await
}

pub async fn umount(session: &mut Session, args: &[&str]) -> Result<()> {
    if !args.is_empty() {
        return Err(usage("umount"));
    }
    session.require_nfs()?;
    session.umount_current().await
}

pub async fn umountall(session: &mut Session, args: &[&str]) -> Result<()> {
    if !args.is_empty() {
        return Err(usage("umountall"));
    }
    let remote = session.require_remote()?;
    remote.mnt.client.umntall().await?;
    Ok(())
}

pub async fn export(session: &mut Session, args: &[&str]) -> Result<()> {
    if !args.is_empty() {
        return Err(usage("export"));
    }
    let remote = session.require_remote()?;
    let exports = remote.mnt.client.export().await?;

    println!("Export list for {}:", remote.host);
    for node in &exports {
        let dir = String::from_utf8_lossy(node.ex_dir.0.as_ref());
        let groups: Vec<String> = node
            .ex_groups
            .iter()
            .map(|g| String::from_utf8_lossy(g.0.as_ref()).into_owned())
            .collect();
        if groups.is_empty() {
            println!("{dir:<30} everyone");
        } else {
            println!("{dir:<30} {}", groups.join(","));
        }
    }
    Ok(())
}

pub async fn dump(session: &mut Session, args: &[&str]) -> Result<()> {
    if !args.is_empty() {
        return Err(usage("dump"));
    }
    let remote = session.require_remote()?;
    let mounts = remote.mnt.client.dump().await?;

    for entry in &mounts {
        let hostname = String::from_utf8_lossy(entry.ml_hostname.0.as_ref());
        let directory = String::from_utf8_lossy(entry.ml_directory.0.as_ref());
        println!("{hostname}:{directory}");
    }
    Ok(())
}

pub async fn handle(session: &mut Session, args: &[&str]) -> Result<()> {
    if args.is_empty() {
        let nfs = session.require_nfs()?;
        let pairs: Vec<String> = nfs
            .cwd
            .data
            .as_ref()
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect();
        println!("{}: {}", nfs.mount_path, pairs.join(" "));
        return Ok(());
    }

    let bytes = parse_handle(args)?;
    session.install_handle(bytes).await
}

/// Accepts space-separated hex pairs or one contiguous hex string.
fn parse_handle(args: &[&str]) -> Result<Vec<u8>> {
    let joined: String = args.concat();
    let bytes = hex::decode(&joined).map_err(|_| anyhow::anyhow!("{joined}: bad handle bytes"))?;
    if bytes.is_empty() || bytes.len() > NFS3_FHSIZE {
        bail!("handle must be 1 to {NFS3_FHSIZE} bytes");
    }
    Ok(bytes)
}

#[allow(clippy::cast_possible_wrap)] // -2 is the point
pub fn status(session: &mut Session, args: &[&str]) -> Result<()> {
    if !args.is_empty() {
        return Err(usage("status"));
    }

    println!("User id        : {}", session.auth.uid as i32);
    println!("Group id       : {}", session.auth.gid as i32);
    println!("Authentication : {}", session.auth.flavor);
    match &session.remote {
        Some(remote) => {
            println!("Remote host    : {} ({})", remote.host, remote.addr);
            println!("Mount channel  : {} {}", remote.mnt.addr, remote.mnt.proto);
            match &remote.nfs {
                Some(nfs) => {
                    println!("Mount path     : {}", nfs.mount_path);
                    println!("NFS channel    : {} {}", nfs.channel.addr, nfs.channel.proto);
                    println!("Transfer size  : {}", nfs.transfer_size);
                }
                None => println!("Mount path     : (none)"),
            }
        }
        None => println!("Remote host    : (none)"),
    }
    Ok(())
}
