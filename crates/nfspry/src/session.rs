//! Per-session state: the open channels, the current mount, and the
//! operator's identity. One instance is owned by the shell; every command
//! takes it by mutable reference, so all access is strictly sequential.

use std::fmt;
use std::io::Cursor;
use std::net::{Ipv4Addr, SocketAddrV4};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use nfspry_client::net::{self, HostSpec, Proto, SourceRoute};
use nfspry_client::rpc::RpcClient;
use nfspry_client::{MountClient, NfsClient, PortmapperClient, auth};
use nfspry_types::mount::{self as mount3, MOUNT_PROGRAM, dirpath, fhandle3, mountres3};
use nfspry_types::nfs3::{self, FSINFO3args, Nfs3Result, nfs_fh3};
use nfspry_types::rpc::opaque_auth;
use nfspry_types::xdr::{Opaque, Unpack};
use tracing::debug;

/// The traditional "nobody" id, -2.
pub const NOBODY: u32 = 0xffff_fffe;

/// Fallback when FSINFO fails or reports nothing useful.
pub const DEFAULT_TRANSFER_SIZE: u32 = 8192;

/// Placeholder mount path when the operator installed a raw handle.
pub const HANDLE_MOUNT_PATH: &str = "<handle>";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AuthFlavor {
    Unix,
    Des,
}

impl fmt::Display for AuthFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unix => "AUTH_UNIX",
            Self::Des => "AUTH_DES",
        })
    }
}

/// The operator's identity for RPC credentials.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub flavor: AuthFlavor,
    pub uid: u32,
    pub gid: u32,
    pub secret_key: Option<String>,
}

impl AuthSettings {
    /// Builds the authenticator for the current settings. AUTH_DES is
    /// accepted as a setting but cannot be built.
    pub fn credential(&self) -> Result<opaque_auth<'static>> {
        match self.flavor {
            AuthFlavor::Unix => Ok(auth::unix_credential(self.uid, self.gid)),
            AuthFlavor::Des => {
                auth::des_credential(self.uid, self.secret_key.as_deref().unwrap_or(""))
                    .map_err(Into::into)
            }
        }
    }
}

/// An open RPC channel and the service endpoint it reaches.
pub struct Channel<C> {
    pub client: C,
    pub addr: SocketAddrV4,
    pub proto: Proto,
}

/// The NFS side of a session: present iff an export is mounted or a raw
/// handle is installed. `cwd` always names a directory.
pub struct NfsMount {
    pub channel: Channel<NfsClient>,
    pub mount_path: String,
    pub root: nfs_fh3,
    pub cwd: nfs_fh3,
    pub transfer_size: u32,
}

/// The remote side of a session: present iff `host` succeeded.
pub struct Remote {
    pub host: String,
    pub addr: Ipv4Addr,
    pub route: Option<SourceRoute>,
    pub mnt: Channel<MountClient>,
    pub nfs: Option<NfsMount>,
}

/// Options for the `mount` command.
#[derive(Debug, Default, Clone, Copy)]
pub struct MountOptions {
    /// Send UMNT right after MNT but keep the handle.
    pub evade: bool,
    /// Route the MNT call through the portmapper (PMAPPROC_CALLIT).
    pub via_portmap: bool,
    /// Force the NFS channel protocol; default is TCP with UDP fallback.
    pub proto: Option<Proto>,
    /// Skip portmap and use this NFS port directly.
    pub port: Option<u16>,
}

pub struct Session {
    pub verbose: bool,
    pub interactive: bool,
    pub timeout: Duration,
    pub auth: AuthSettings,
    pub remote: Option<Remote>,
}

impl Session {
    #[must_use]
    pub fn new(verbose: bool, interactive: bool, timeout: Duration, flavor: AuthFlavor) -> Self {
        Self {
            verbose,
            interactive,
            timeout,
            auth: AuthSettings {
                flavor,
                uid: NOBODY,
                gid: NOBODY,
                secret_key: None,
            },
            remote: None,
        }
    }

    pub fn require_remote(&mut self) -> Result<&mut Remote> {
        match &mut self.remote {
            Some(remote) => Ok(remote),
            None => bail!("no host specified"),
        }
    }

    pub fn require_nfs(&mut self) -> Result<&mut NfsMount> {
        match self.remote.as_mut().and_then(|r| r.nfs.as_mut()) {
            Some(nfs) => Ok(nfs),
            None => bail!("no remote file system mounted"),
        }
    }

    /// Opens the MOUNT channel to `spec`, closing any prior session first.
    /// With a source route, only TCP is attempted; otherwise TCP is tried
    /// first and UDP on TCP failure.
    pub async fn open_host(&mut self, spec: &str) -> Result<()> {
        self.close_session().await;

        let spec = HostSpec::parse(spec)?;
        let route = spec.resolve_route()?;
        let addr = net::resolve_ipv4(&spec.host).with_context(|| spec.host.clone())?;
        let credential = self.auth.credential()?;

        let conn = if route.is_some() {
            net::connect_service(
                addr,
                Proto::Tcp,
                mount3::PROGRAM,
                mount3::VERSION,
                route.as_ref(),
                None,
                self.timeout,
            )
            .await?
        } else {
            match net::connect_service(
                addr,
                Proto::Tcp,
                mount3::PROGRAM,
                mount3::VERSION,
                None,
                None,
                self.timeout,
            )
            .await
            {
                Ok(conn) => conn,
                Err(e) => {
                    debug!("TCP mount channel failed ({e}), falling back to UDP");
                    net::connect_service(
                        addr,
                        Proto::Udp,
                        mount3::PROGRAM,
                        mount3::VERSION,
                        None,
                        None,
                        self.timeout,
                    )
                    .await?
                }
            }
        };

        let mut rpc = conn.rpc;
        rpc.set_auth(credential);
        let proto = conn.proto;

        self.remote = Some(Remote {
            host: spec.host.clone(),
            addr,
            route,
            mnt: Channel {
                client: MountClient::new(rpc),
                addr: conn.addr,
                proto,
            },
            nfs: None,
        });

        if self.verbose {
            println!("Open {} ({addr}) {proto}", spec.host);
        }
        Ok(())
    }

    /// Mounts an export: MNT (directly or through the portmapper), NFS
    /// channel setup, FSINFO for the transfer size. Any prior NFS state is
    /// dropped before the attempt, so failure leaves it cleared.
    pub async fn mount(&mut self, path: &str, opts: MountOptions) -> Result<()> {
        self.close_nfs();
        self.require_remote()?;

        let fhandle = if opts.via_portmap {
            self.mnt_via_portmap(path).await?
        } else {
            let remote = self.require_remote()?;
            remote
                .mnt
                .client
                .mnt(dirpath(Opaque::borrowed(path.as_bytes())))
                .await
                .with_context(|| format!("mount {path}"))?
                .fhandle
        };
        let root = fhandle.to_nfs_fh3();

        let mut channel = self.connect_nfs_channel(opts.proto, opts.port).await?;

        if opts.evade {
            let remote = self.require_remote()?;
            if let Err(e) = remote
                .mnt
                .client
                .umnt(dirpath(Opaque::borrowed(path.as_bytes())))
                .await
            {
                eprintln!("umount after mount: {e}");
            }
        }

        let transfer_size = probe_transfer_size(&mut channel.client, &root).await;
        let proto = channel.proto;

        let remote = self.require_remote()?;
        remote.nfs = Some(NfsMount {
            channel,
            mount_path: path.to_string(),
            root: root.clone(),
            cwd: root,
            transfer_size,
        });

        if self.verbose {
            println!("Mount `{path}`, {proto}, transfer size {transfer_size} bytes.");
        }
        Ok(())
    }

    /// Installs a raw file handle without asking the MOUNT daemon, opening
    /// the NFS channel against the known server address.
    pub async fn install_handle(&mut self, bytes: Vec<u8>) -> Result<()> {
        self.close_nfs();
        self.require_remote()?;

        let mut channel = self.connect_nfs_channel(None, None).await?;
        let root = nfs_fh3 {
            data: Opaque::owned(bytes),
        };
        let transfer_size = probe_transfer_size(&mut channel.client, &root).await;
        let proto = channel.proto;

        let remote = self.require_remote()?;
        remote.nfs = Some(NfsMount {
            channel,
            mount_path: HANDLE_MOUNT_PATH.to_string(),
            root: root.clone(),
            cwd: root,
            transfer_size,
        });

        if self.verbose {
            println!("Mount `{HANDLE_MOUNT_PATH}`, {proto}, transfer size {transfer_size} bytes.");
        }
        Ok(())
    }

    /// Opens an authenticated NFS channel per the protocol preference:
    /// forced protocol, or TCP with UDP fallback. A source route forces
    /// TCP.
    async fn connect_nfs_channel(
        &mut self,
        proto: Option<Proto>,
        port: Option<u16>,
    ) -> Result<Channel<NfsClient>> {
        let credential = self.auth.credential()?;
        let timeout = self.timeout;
        let remote = self.require_remote()?;
        let addr = remote.addr;
        let route = remote.route.clone();

        let conn = match proto {
            Some(proto) => {
                net::connect_service(
                    addr,
                    proto,
                    nfs3::PROGRAM,
                    nfs3::VERSION,
                    route.as_ref(),
                    port,
                    timeout,
                )
                .await?
            }
            None if route.is_some() => {
                net::connect_service(
                    addr,
                    Proto::Tcp,
                    nfs3::PROGRAM,
                    nfs3::VERSION,
                    route.as_ref(),
                    port,
                    timeout,
                )
                .await?
            }
            None => {
                match net::connect_service(
                    addr,
                    Proto::Tcp,
                    nfs3::PROGRAM,
                    nfs3::VERSION,
                    None,
                    port,
                    timeout,
                )
                .await
                {
                    Ok(conn) => conn,
                    Err(e) => {
                        debug!("TCP NFS channel failed ({e}), falling back to UDP");
                        net::connect_service(
                            addr,
                            Proto::Udp,
                            nfs3::PROGRAM,
                            nfs3::VERSION,
                            None,
                            port,
                            timeout,
                        )
                        .await?
                    }
                }
            }
        };

        let mut rpc = conn.rpc;
        rpc.set_auth(credential);
        Ok(Channel {
            client: NfsClient::new(rpc),
            addr: conn.addr,
            proto: conn.proto,
        })
    }

    /// Sends the MNT request inside a PMAPPROC_CALLIT payload over UDP, so
    /// the call reaches the MOUNT daemon from the portmapper itself.
    async fn mnt_via_portmap(&mut self, path: &str) -> Result<fhandle3<'static>> {
        let credential = self.auth.credential()?;
        let timeout = self.timeout;
        let remote = self.require_remote()?;
        if remote.route.is_some() {
            bail!("mount -p is incompatible with a source route");
        }
        let addr = remote.addr;

        let transport = net::open_transport(
            addr,
            nfspry_types::portmap::PMAP_PORT,
            Proto::Udp,
            None,
            net::Bind::Ephemeral,
        )
        .await?;
        let mut rpc = RpcClient::new(transport);
        rpc.set_timeout(timeout);
        rpc.set_auth(credential);
        let mut portmapper = PortmapperClient::new(rpc);

        let result = portmapper
            .callit(
                mount3::PROGRAM,
                mount3::VERSION,
                MOUNT_PROGRAM::MOUNTPROC3_MNT as u32,
                &dirpath(Opaque::borrowed(path.as_bytes())),
            )
            .await
            .with_context(|| format!("mount {path} via portmap"))?;
        debug!(port = result.port, "portmapper forwarded the MNT call");

        let mut cursor = Cursor::new(result.res.into_owned());
        let (res, _): (mountres3<'static>, usize) = mountres3::unpack(&mut cursor)?;
        match res {
            mountres3::Ok(ok) => Ok(ok.fhandle),
            mountres3::Err(status) => bail!("mount {path}: {status}"),
        }
    }

    /// Rebuilds and installs the authenticator on every open channel. The
    /// channels drop their previous authenticator on replacement.
    pub fn apply_auth(&mut self) -> Result<()> {
        if self.remote.is_some() {
            let mnt_cred = self.auth.credential()?;
            let nfs_cred = self.auth.credential()?;
            let remote = self.require_remote()?;
            remote.mnt.client.set_auth(mnt_cred);
            if let Some(nfs) = &mut remote.nfs {
                nfs.channel.client.set_auth(nfs_cred);
            }
        }
        Ok(())
    }

    /// Drops the NFS side without touching the server's mount table.
    pub fn close_nfs(&mut self) {
        if let Some(remote) = &mut self.remote {
            // dropping the channel closes its socket
            remote.nfs = None;
        }
    }

    /// The `umount` path: tell the server, then drop the NFS side.
    pub async fn umount_current(&mut self) -> Result<()> {
        let Some(remote) = &mut self.remote else {
            return Ok(());
        };
        let Some(nfs) = remote.nfs.take() else {
            return Ok(());
        };
        if nfs.mount_path != HANDLE_MOUNT_PATH {
            remote
                .mnt
                .client
                .umnt(dirpath(Opaque::owned(nfs.mount_path.into_bytes())))
                .await?;
        }
        Ok(())
    }

    /// Full close: UMNT if a real export is mounted, then both channels.
    pub async fn close_session(&mut self) {
        if self.remote.is_some() {
            if let Err(e) = self.umount_current().await {
                eprintln!("umount: {e}");
            }
            self.remote = None;
        }
    }
}

/// FSINFO on the (new) root; 8192 on any failure.
pub async fn probe_transfer_size(nfs: &mut NfsClient, root: &nfs_fh3) -> u32 {
    match nfs
        .fsinfo(&FSINFO3args {
            fsroot: root.clone(),
        })
        .await
    {
        Ok(Nfs3Result::Ok(ok)) if ok.wtmax > 0 => ok.wtmax,
        _ => DEFAULT_TRANSFER_SIZE,
    }
}
