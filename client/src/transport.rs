use log::debug;
use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use tokio::net::{lookup_host, UdpSocket};
use tokio::time::{timeout_at, Instant};

use crate::error::ProbeError;

/// Datagram capability the probes run over.
///
/// Dropping the transport releases the underlying socket.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send_to(&mut self, buf: &[u8], target: SocketAddr) -> io::Result<usize>;

    /// Waits for one datagram until `deadline`. `Ok(None)` means the
    /// deadline passed; any other failure is returned as an error.
    async fn recv_from(
        &mut self,
        buf: &mut [u8],
        deadline: Instant,
    ) -> io::Result<Option<(usize, SocketAddr)>>;

    fn local_addr(&self) -> io::Result<SocketAddr>;
}

pub struct UdpTransport {
    sock: UdpSocket,
}

impl UdpTransport {
    pub async fn bind(addr: SocketAddr) -> io::Result<Self> {
        let sock = UdpSocket::bind(addr).await?;
        debug!("bind: {:?}", sock.local_addr());
        Ok(Self { sock })
    }

    /// Binds to the local address the OS would use to reach `server`,
    /// or to `local_ip` with an ephemeral port when one is given.
    ///
    /// The exact address matters: test II compares it against the mapped
    /// address, so a wildcard bind would always look like a NAT.
    pub async fn for_server(server: SocketAddr, local_ip: Option<IpAddr>) -> io::Result<Self> {
        let local_addr = match local_ip {
            Some(ip) => SocketAddr::new(ip, 0),
            None => route_local_addr(server).await?,
        };
        Self::bind(local_addr).await
    }
}

impl Transport for UdpTransport {
    async fn send_to(&mut self, buf: &[u8], target: SocketAddr) -> io::Result<usize> {
        self.sock.send_to(buf, target).await
    }

    async fn recv_from(
        &mut self,
        buf: &mut [u8],
        deadline: Instant,
    ) -> io::Result<Option<(usize, SocketAddr)>> {
        match timeout_at(deadline, self.sock.recv_from(buf)).await {
            Ok(v) => v.map(Some),
            Err(_elapsed) => Ok(None),
        }
    }

    fn local_addr(&self) -> io::Result<SocketAddr> {
        self.sock.local_addr()
    }
}

// connect 一个临时的 socket, 由系统选出本地地址
async fn route_local_addr(server: SocketAddr) -> io::Result<SocketAddr> {
    let unspecified = match server {
        SocketAddr::V4(_) => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        SocketAddr::V6(_) => IpAddr::V6(Ipv6Addr::UNSPECIFIED),
    };

    let probe = UdpSocket::bind(SocketAddr::new(unspecified, 0)).await?;
    probe.connect(server).await?;
    let local_addr = probe.local_addr()?;
    debug!("route to {} leaves from {}", server, local_addr);

    Ok(local_addr)
}

/// Resolves `host:port`, first address wins.
pub async fn resolve(server: &str) -> Result<SocketAddr, ProbeError> {
    let mut addrs = lookup_host(server)
        .await
        .map_err(|e| ProbeError::Resolve(format!("{}, {}", server, e)))?;

    addrs
        .next()
        .ok_or_else(|| ProbeError::Resolve(format!("{}, no address", server)))
}
