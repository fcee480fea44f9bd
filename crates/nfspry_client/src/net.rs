//! Raw socket construction for the MOUNT and NFS channels.
//!
//! Sockets are built with `socket2` so the client controls the source port
//! (servers enforcing the "secure mount" heuristic require a reserved one)
//! and can install a loose source route before connecting. Connect happens
//! in blocking mode; the connected socket is switched to non-blocking and
//! handed to tokio.

use std::io::{Error, ErrorKind, Result};
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, ToSocketAddrs};
use std::os::fd::AsRawFd;
use std::time::Duration;

use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use tracing::debug;

use crate::portmap::PortmapperClient;
use crate::rpc::RpcClient;
use crate::transport::{DatagramTransport, StreamTransport, Transport};

/// Ports below this are reserved for privileged processes.
pub const IPPORT_RESERVED: u16 = 1024;

/// IP option type for Loose Source and Record Route.
pub const IPOPT_LSRR: u8 = 0x83;

/// Offset of the first hop slot in a source-route option.
pub const IPOPT_MINOFF: u8 = 4;

/// Transport protocol for an RPC channel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Proto {
    Tcp,
    Udp,
}

impl Proto {
    /// The protocol number used in portmap lookups.
    #[must_use]
    pub const fn ipproto(self) -> u32 {
        match self {
            Self::Tcp => nfspry_types::portmap::IPPROTO_TCP,
            Self::Udp => nfspry_types::portmap::IPPROTO_UDP,
        }
    }
}

impl std::fmt::Display for Proto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Tcp => "TCP",
            Self::Udp => "UDP",
        })
    }
}

/// A parsed `host` argument: `[<localaddr>] '@' [<hop>':'…]<dest>`, or
/// `[<hop>':'…]<dest>` without a local address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSpec {
    pub host: String,
    pub local: Option<String>,
    pub hops: Vec<String>,
}

impl HostSpec {
    pub fn parse(spec: &str) -> Result<Self> {
        let (local, rest) = match spec.split_once('@') {
            Some((local, rest)) => {
                let local = if local.is_empty() {
                    None
                } else {
                    Some(local.to_string())
                };
                (local, rest)
            }
            None => (None, spec),
        };

        let mut parts: Vec<&str> = rest.split(':').collect();
        let host = parts.pop().unwrap_or_default();
        if host.is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!("bad host specification: {spec}"),
            ));
        }
        if parts.iter().any(|hop| hop.is_empty()) {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!("empty hop in source route: {spec}"),
            ));
        }

        Ok(Self {
            host: host.to_string(),
            local,
            hops: parts.into_iter().map(str::to_string).collect(),
        })
    }

    /// Whether the operator asked for a source-routed connection.
    #[must_use]
    pub fn is_routed(&self) -> bool {
        self.local.is_some() || !self.hops.is_empty()
    }

    /// Resolves the route part (not the destination) to addresses.
    pub fn resolve_route(&self) -> Result<Option<SourceRoute>> {
        if !self.is_routed() {
            return Ok(None);
        }
        let local = self.local.as_deref().map(resolve_ipv4).transpose()?;
        let hops = self
            .hops
            .iter()
            .map(|hop| resolve_ipv4(hop))
            .collect::<Result<Vec<_>>>()?;
        Ok(Some(SourceRoute { local, hops }))
    }
}

/// A resolved loose source route: an optional local bind address and the
/// intermediate hops, in traversal order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRoute {
    pub local: Option<Ipv4Addr>,
    pub hops: Vec<Ipv4Addr>,
}

/// Resolves a host name or dotted quad to an IPv4 address.
pub fn resolve_ipv4(host: &str) -> Result<Ipv4Addr> {
    (host, 0u16)
        .to_socket_addrs()?
        .find_map(|addr| match addr {
            SocketAddr::V4(v4) => Some(*v4.ip()),
            SocketAddr::V6(_) => None,
        })
        .ok_or_else(|| {
            Error::new(
                ErrorKind::AddrNotAvailable,
                format!("{host}: no IPv4 address"),
            )
        })
}

/// Builds the LSRR option bytes: type, length, pointer (`IPOPT_MINOFF`),
/// the hop addresses, NUL-padded to a multiple of 4.
#[must_use]
#[allow(clippy::cast_possible_truncation)] // 9 hops at most fit an IP header
pub fn lsrr_option(hops: &[Ipv4Addr]) -> Vec<u8> {
    let len = 3 + 4 * hops.len();
    let mut option = Vec::with_capacity(len + 3);
    option.push(IPOPT_LSRR);
    option.push(len as u8);
    option.push(IPOPT_MINOFF);
    for hop in hops {
        option.extend_from_slice(&hop.octets());
    }
    while option.len() % 4 != 0 {
        option.push(0);
    }
    option
}

/// Source-port policy for a new socket.
#[derive(Copy, Clone, Debug)]
pub enum Bind {
    /// Any ephemeral port; used for portmap probes.
    Ephemeral,
    /// Walk the reserved range; fail when it is exhausted.
    Reserved,
    /// Walk the reserved range; fall back to an ephemeral port when every
    /// reserved port is in use.
    ReservedWithFallback,
}

/// Walks the reserved port range downwards from 1023, skipping ports that
/// are in use, stopping at `IPPORT_RESERVED / 2`. Returns the bound port.
pub(crate) fn walk_reserved<F>(mut bind_at: F) -> Result<u16>
where
    F: FnMut(u16) -> Result<()>,
{
    let mut port = IPPORT_RESERVED - 1;
    while port > IPPORT_RESERVED / 2 {
        match bind_at(port) {
            Ok(()) => return Ok(port),
            Err(e)
                if matches!(
                    e.raw_os_error(),
                    Some(libc::EADDRINUSE | libc::EADDRNOTAVAIL)
                ) =>
            {
                port -= 1;
            }
            Err(e) => return Err(e),
        }
    }
    Err(Error::new(
        ErrorKind::AddrInUse,
        "all reserved ports in use",
    ))
}

fn bind_socket(socket: &Socket, local: Ipv4Addr, bind: Bind) -> Result<u16> {
    let bind_to = |port: u16| socket.bind(&SockAddr::from(SocketAddrV4::new(local, port)));
    match bind {
        Bind::Ephemeral => {
            bind_to(0)?;
            Ok(0)
        }
        Bind::Reserved => {
            let port = walk_reserved(bind_to)?;
            debug!(port, "bound reserved source port");
            Ok(port)
        }
        Bind::ReservedWithFallback => match walk_reserved(bind_to) {
            Ok(port) => {
                debug!(port, "bound reserved source port");
                Ok(port)
            }
            Err(e) if e.kind() == ErrorKind::AddrInUse => {
                debug!("reserved range exhausted, binding ephemeral port");
                bind_to(0)?;
                Ok(0)
            }
            Err(e) => Err(e),
        },
    }
}

fn set_ip_options(socket: &Socket, option: &[u8]) -> Result<()> {
    let rc = unsafe {
        libc::setsockopt(
            socket.as_raw_fd(),
            libc::IPPROTO_IP,
            libc::IP_OPTIONS,
            option.as_ptr().cast(),
            option.len() as libc::socklen_t,
        )
    };
    if rc != 0 {
        return Err(Error::last_os_error());
    }
    Ok(())
}

/// The address the socket actually connects to and the LSRR option to
/// install, if any. With a non-empty route the packet is sent to the first
/// hop; the option lists the remaining hops and then the destination.
fn connect_target(dest: Ipv4Addr, route: Option<&SourceRoute>) -> (Ipv4Addr, Option<Vec<u8>>) {
    match route {
        Some(r) if !r.hops.is_empty() => {
            let mut listed: Vec<Ipv4Addr> = r.hops[1..].to_vec();
            listed.push(dest);
            (r.hops[0], Some(lsrr_option(&listed)))
        }
        _ => (dest, None),
    }
}

/// Opens a transport to `dest:port`, applying the bind policy and the
/// optional source route. A route forces TCP.
pub async fn open_transport(
    dest: Ipv4Addr,
    port: u16,
    proto: Proto,
    route: Option<&SourceRoute>,
    bind: Bind,
) -> Result<Box<dyn Transport>> {
    let local = route
        .and_then(|r| r.local)
        .unwrap_or(Ipv4Addr::UNSPECIFIED);
    let (connect_ip, option) = connect_target(dest, route);
    let peer = SockAddr::from(SocketAddrV4::new(connect_ip, port));

    match proto {
        Proto::Tcp => {
            let socket = Socket::new(Domain::IPV4, Type::STREAM, Some(Protocol::TCP))?;
            bind_socket(&socket, local, bind)?;
            if let Some(option) = &option {
                set_ip_options(&socket, option)?;
                debug!(hops = option.len() / 4, "installed loose source route");
            }
            socket.connect(&peer)?;
            socket.set_nonblocking(true)?;
            debug!(%connect_ip, port, "TCP channel connected");

            let stream = tokio::net::TcpStream::from_std(socket.into())?;
            Ok(Box::new(StreamTransport::new(
                crate::io::tokio::TokioIo::new(stream),
            )))
        }
        Proto::Udp => {
            if option.is_some() {
                return Err(Error::new(
                    ErrorKind::InvalidInput,
                    "source routing requires TCP",
                ));
            }
            let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
            bind_socket(&socket, local, bind)?;
            socket.connect(&peer)?;
            socket.set_nonblocking(true)?;
            debug!(%connect_ip, port, "UDP channel connected");

            let socket = tokio::net::UdpSocket::from_std(socket.into())?;
            Ok(Box::new(DatagramTransport::new(socket)))
        }
    }
}

/// A ready-to-use RPC channel and the service endpoint it talks to.
pub struct Connection {
    pub rpc: RpcClient,
    pub addr: SocketAddrV4,
    pub proto: Proto,
}

/// Opens an authenticated channel to an RPC service on `dest`.
///
/// Unless `port_override` is given, the service port is resolved through
/// the portmapper on an ephemeral-port probe connection first. The service
/// channel itself binds a reserved source port (with ephemeral fallback in
/// source-routed mode).
pub async fn connect_service(
    dest: Ipv4Addr,
    proto: Proto,
    prog: u32,
    vers: u32,
    route: Option<&SourceRoute>,
    port_override: Option<u16>,
    timeout: Duration,
) -> std::result::Result<Connection, crate::error::Error> {
    let port = match port_override {
        Some(port) => port,
        None => {
            let probe = open_transport(
                dest,
                nfspry_types::portmap::PMAP_PORT,
                proto,
                route,
                Bind::Ephemeral,
            )
            .await?;
            let mut rpc = RpcClient::new(probe);
            rpc.set_timeout(timeout);
            let mut portmapper = PortmapperClient::new(rpc);
            let port = portmapper.getport(prog, vers, proto.ipproto()).await?;
            debug!(prog, vers, %proto, port, "resolved service port");
            port
        }
    };

    let bind = if route.is_some() {
        Bind::ReservedWithFallback
    } else {
        Bind::Reserved
    };
    let transport = open_transport(dest, port, proto, route, bind).await?;
    let mut rpc = RpcClient::new(transport);
    rpc.set_timeout(timeout);

    Ok(Connection {
        rpc,
        addr: SocketAddrV4::new(dest, port),
        proto,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn host_spec_plain() {
        let spec = HostSpec::parse("zeus").unwrap();
        assert_eq!(spec.host, "zeus");
        assert_eq!(spec.local, None);
        assert!(spec.hops.is_empty());
        assert!(!spec.is_routed());
    }

    #[test]
    fn host_spec_with_hops() {
        let spec = HostSpec::parse("10.0.0.1:10.0.0.2:target").unwrap();
        assert_eq!(spec.host, "target");
        assert_eq!(spec.hops, vec!["10.0.0.1", "10.0.0.2"]);
        assert!(spec.is_routed());
    }

    #[test]
    fn host_spec_with_local_and_hops() {
        let spec = HostSpec::parse("192.0.2.7@10.0.0.1:target").unwrap();
        assert_eq!(spec.local.as_deref(), Some("192.0.2.7"));
        assert_eq!(spec.hops, vec!["10.0.0.1"]);
        assert_eq!(spec.host, "target");
    }

    #[test]
    fn host_spec_with_empty_local() {
        let spec = HostSpec::parse("@10.0.0.1:target").unwrap();
        assert_eq!(spec.local, None);
        assert_eq!(spec.hops, vec!["10.0.0.1"]);
        assert!(spec.is_routed());
    }

    #[test]
    fn host_spec_rejects_empty_host() {
        assert!(HostSpec::parse("").is_err());
        assert!(HostSpec::parse("a@").is_err());
        assert!(HostSpec::parse("10.0.0.1:").is_err());
    }

    #[test]
    fn host_spec_rejects_empty_hop() {
        assert!(HostSpec::parse("10.0.0.1::target").is_err());
    }

    #[test]
    fn lsrr_option_bytes() {
        let hops = [Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(192, 0, 2, 9)];
        let option = lsrr_option(&hops);
        assert_eq!(
            option,
            [
                0x83, 11, 4, // type, length, pointer
                10, 0, 0, 1, // first hop
                192, 0, 2, 9, // final destination
                0, // padding to a multiple of 4
            ]
        );
        assert_eq!(option.len() % 4, 0);
    }

    #[test]
    fn connect_target_routes_via_first_hop() {
        let dest = Ipv4Addr::new(198, 51, 100, 5);
        let route = SourceRoute {
            local: None,
            hops: vec![Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(10, 0, 0, 2)],
        };
        let (ip, option) = connect_target(dest, Some(&route));
        assert_eq!(ip, Ipv4Addr::new(10, 0, 0, 1));
        let option = option.unwrap();
        // the option lists hop 2 and then the destination
        assert_eq!(&option[3..7], &[10, 0, 0, 2]);
        assert_eq!(&option[7..11], &[198, 51, 100, 5]);
    }

    #[test]
    fn connect_target_without_route() {
        let dest = Ipv4Addr::new(198, 51, 100, 5);
        let (ip, option) = connect_target(dest, None);
        assert_eq!(ip, dest);
        assert!(option.is_none());
    }

    #[test]
    fn walk_starts_at_1023() {
        let mut tried = Vec::new();
        let port = walk_reserved(|p| {
            tried.push(p);
            Ok(())
        })
        .unwrap();
        assert_eq!(port, 1023);
        assert_eq!(tried, vec![1023]);
    }

    #[test]
    fn walk_skips_busy_ports() {
        let port = walk_reserved(|p| {
            if p > 1000 {
                Err(Error::from_raw_os_error(libc::EADDRINUSE))
            } else {
                Ok(())
            }
        })
        .unwrap();
        assert_eq!(port, 1000);
    }

    #[test]
    fn walk_aborts_on_other_errors() {
        let err = walk_reserved(|_| Err(Error::from_raw_os_error(libc::EACCES))).unwrap_err();
        assert_eq!(err.raw_os_error(), Some(libc::EACCES));
    }

    #[test]
    fn walk_stops_at_half_reserved() {
        let mut last = None;
        let err = walk_reserved(|p| {
            last = Some(p);
            Err(Error::from_raw_os_error(libc::EADDRNOTAVAIL))
        })
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AddrInUse);
        assert_eq!(last, Some(513));
    }

    #[test]
    fn resolve_ipv4_literal() {
        assert_eq!(
            resolve_ipv4("192.0.2.10").unwrap(),
            Ipv4Addr::new(192, 0, 2, 10)
        );
    }
}
