pub mod client;
pub mod error;
pub mod nat_type;
pub mod probe;
pub mod retransmit;
pub mod transport;

pub use client::{discovery, discovery_with, Client, ClientConfig, DEFAULT_SERVER_ADDR};
pub use error::ProbeError;
pub use nat_type::NatType;
