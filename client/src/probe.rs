//! The four tests of rfc 3489 section 10.1 and how their outcomes chain.
//!
//! ```text
//!   Test I --no reply--> UDP blocked
//!     |
//!   Test II --reply--> mapped == local ? Open internet : Full cone
//!     | no reply
//!     +--> mapped == local ? Symmetric UDP firewall : Test III
//!
//!   Test III (to changed address) --no reply--> error
//!     | reply
//!     +--> mapped changed ? Symmetric : Test IV
//!
//!   Test IV --reply--> Restricted
//!     | no reply
//!     +--> Port restricted
//! ```

use log::debug;
use rand::RngCore;
use std::net::SocketAddr;
use stun_classic::attrs::change_request::ChangeRequest;
use stun_classic::header::MessageType;
use stun_classic::message::Message;

use crate::error::ProbeError;
use crate::nat_type::NatType;

/// What the tests learn about the path, filled in as the run goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub local_addr: SocketAddr,
    pub server_addr: SocketAddr,
    pub mapped_addr: Option<SocketAddr>,
    pub changed_addr: Option<SocketAddr>,
}

impl Session {
    pub fn new(local_addr: SocketAddr, server_addr: SocketAddr) -> Self {
        Self {
            local_addr,
            server_addr,
            mapped_addr: None,
            changed_addr: None,
        }
    }

    // 映射地址和本地地址相同, 没有 NAT
    pub fn has_public_ip(&self) -> bool {
        self.mapped_addr == Some(self.local_addr)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Probe {
    /// Plain request to the primary server.
    Test1,
    /// Primary server, answer from the other ip and port.
    Test2,
    /// Plain request to the changed address.
    Test3,
    /// Primary server, answer from the other port.
    Test4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Next(Probe),
    Done(NatType),
}

impl Probe {
    pub fn change_request(self) -> ChangeRequest {
        match self {
            Probe::Test1 | Probe::Test3 => ChangeRequest::new(false, false),
            Probe::Test2 => ChangeRequest::new(true, true),
            Probe::Test4 => ChangeRequest::new(false, true),
        }
    }

    /// Fresh binding request. CHANGE-REQUEST is only attached when a flag is set.
    pub fn build_request<R: RngCore + ?Sized>(self, rng: &mut R) -> Result<Message, ProbeError> {
        let mut request = Message::new(MessageType::BindingRequest, rng)?;

        let change_request = self.change_request();
        if change_request.change_ip || change_request.change_port {
            request.add_attr(change_request.into())?;
        }

        Ok(request)
    }

    pub fn destination(self, session: &Session) -> Result<SocketAddr, ProbeError> {
        match self {
            Probe::Test1 | Probe::Test2 | Probe::Test4 => Ok(session.server_addr),
            Probe::Test3 => session
                .changed_addr
                .ok_or_else(|| ProbeError::Protocol("no changed address from test1".to_string())),
        }
    }

    /// Whether `reply` is the answer this test is waiting for.
    pub fn accepts(self, session: &Session, dst: SocketAddr, reply: &Message) -> bool {
        let ok = match self {
            Probe::Test1 => reply.mapped_address().is_some() && reply.changed_address().is_some(),
            Probe::Test2 => reply.origin.is_some() && reply.origin == session.changed_addr,
            Probe::Test3 => reply.mapped_address().is_some(),
            Probe::Test4 => match reply.origin {
                Some(origin) => origin.port() != dst.port(),
                None => false,
            },
        };

        match ok {
            true => debug!("{:?} recv package and check OK", self),
            false => debug!("{:?} recv package, but check FAILED", self),
        }
        ok
    }

    /// Folds the accepted reply, or its absence, into `session` and picks
    /// what happens next.
    pub fn transition(
        self,
        session: &mut Session,
        reply: Option<&Message>,
    ) -> Result<Step, ProbeError> {
        let step = match (self, reply) {
            (Probe::Test1, None) => Step::Done(NatType::UdpBlocked),
            (Probe::Test1, Some(reply)) => {
                session.mapped_addr = reply.mapped_address();
                session.changed_addr = reply.changed_address();
                Step::Next(Probe::Test2)
            }

            (Probe::Test2, None) => match session.has_public_ip() {
                true => Step::Done(NatType::SymmetricUdpFirewall),
                false => Step::Next(Probe::Test3),
            },
            (Probe::Test2, Some(_)) => match session.has_public_ip() {
                true => Step::Done(NatType::OpenInternet),
                false => Step::Done(NatType::FullCone),
            },

            (Probe::Test3, None) => {
                return Err(ProbeError::Protocol(
                    "the changed server had no answer".to_string(),
                ));
            }
            (Probe::Test3, Some(reply)) => match reply.mapped_address() != session.mapped_addr {
                true => Step::Done(NatType::Symmetric),
                false => Step::Next(Probe::Test4),
            },

            (Probe::Test4, None) => Step::Done(NatType::PortRestricted),
            (Probe::Test4, Some(_)) => Step::Done(NatType::Restricted),
        };

        Ok(step)
    }
}
