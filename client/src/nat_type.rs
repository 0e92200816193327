use std::fmt;

/// Outcome of a detection run, rfc 3489 section 10.1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NatType {
    #[default]
    Unknown,
    OpenInternet,
    FullCone,
    Restricted,
    PortRestricted,
    SymmetricUdpFirewall,
    Symmetric,
    UdpBlocked,
    Error,
}

impl NatType {
    pub fn description(&self) -> &'static str {
        match self {
            NatType::Unknown => "NAT type indeterminacy",
            NatType::OpenInternet => "Open internet",
            NatType::FullCone => "Full cone NAT",
            NatType::Restricted => "Restricted NAT",
            NatType::PortRestricted => "Port restricted NAT",
            NatType::SymmetricUdpFirewall => "Symmetric UDP firewall",
            NatType::Symmetric => "Symmetric NAT",
            NatType::UdpBlocked => "UDP blocked firewall",
            NatType::Error => "Detecting failed",
        }
    }
}

impl fmt::Display for NatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}
