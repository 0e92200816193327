use log::{debug, info};
use rand::rngs::OsRng;
use rand::RngCore;
use std::net::{IpAddr, SocketAddr};

use crate::error::ProbeError;
use crate::nat_type::NatType;
use crate::probe::{Probe, Session, Step};
use crate::retransmit::{send_and_wait, RetransmitPolicy};
use crate::transport::{resolve, Transport, UdpTransport};

pub const DEFAULT_SERVER_ADDR: &str = "stun.ekiga.net:3478";

#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Pin the local interface instead of asking the routing table.
    pub local_ip: Option<IpAddr>,
    pub policy: RetransmitPolicy,
}

/// Runs the probes one after another over a single transport.
pub struct Client<T, R> {
    transport: T,
    rng: R,
    policy: RetransmitPolicy,
}

impl<T: Transport, R: RngCore> Client<T, R> {
    pub fn new(transport: T, rng: R, policy: RetransmitPolicy) -> Self {
        Self {
            transport,
            rng,
            policy,
        }
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    pub async fn run_probe(
        &mut self,
        probe: Probe,
        session: &mut Session,
    ) -> Result<Step, ProbeError> {
        let request = probe.build_request(&mut self.rng)?;
        let dst = probe.destination(session)?;
        debug!("{:?} --> {}", probe, dst);

        let reply = {
            let session = &*session;
            send_and_wait(&mut self.transport, &self.policy, &request, dst, |reply| {
                probe.accepts(session, dst, reply)
            })
            .await?
        };

        if reply.is_none() {
            debug!("{:?} no reply from {}", probe, dst);
        }

        probe.transition(session, reply.as_ref())
    }

    pub async fn detect(&mut self, server_addr: SocketAddr) -> Result<NatType, ProbeError> {
        let local_addr = self.transport.local_addr()?;
        let mut session = Session::new(local_addr, server_addr);

        let mut probe = Probe::Test1;
        loop {
            match self.run_probe(probe, &mut session).await? {
                Step::Next(next) => probe = next,
                Step::Done(nat_type) => {
                    debug!("mapped_address: {:?}", session.mapped_addr);
                    debug!("changed_address: {:?}", session.changed_addr);
                    return Ok(nat_type);
                }
            }
        }
    }
}

/// Detects the NAT type between this host and `server` (`host:port`).
/// An empty `server` picks [`DEFAULT_SERVER_ADDR`].
pub async fn discovery(server: &str) -> Result<NatType, ProbeError> {
    discovery_with(server, &ClientConfig::default()).await
}

pub async fn discovery_with(server: &str, config: &ClientConfig) -> Result<NatType, ProbeError> {
    let server = match server.is_empty() {
        true => DEFAULT_SERVER_ADDR,
        false => server,
    };

    let server_addr = resolve(server).await?;
    let transport = UdpTransport::for_server(server_addr, config.local_ip).await?;
    info!(
        "stun server: {} ({}), local addr: {}",
        server,
        server_addr,
        transport.local_addr()?
    );

    let mut client = Client::new(transport, OsRng, config.policy);
    client.detect(server_addr).await
}
