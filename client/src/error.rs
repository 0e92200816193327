use std::io;
use stun_classic::{FormatError, RuntimeError};
use thiserror::Error;

use crate::nat_type::NatType;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("format error, {0}")]
    Format(#[from] FormatError),

    #[error("transport error, {0}")]
    Transport(#[from] io::Error),

    #[error("can't resolve stun server: {0}")]
    Resolve(String),

    #[error("protocol error, {0}")]
    Protocol(String),

    #[error("runtime error, {0}")]
    Runtime(#[from] RuntimeError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Format,
    Transport,
    Protocol,
    Runtime,
}

impl ProbeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProbeError::Format(_) => ErrorKind::Format,
            ProbeError::Transport(_) | ProbeError::Resolve(_) => ErrorKind::Transport,
            ProbeError::Protocol(_) => ErrorKind::Protocol,
            ProbeError::Runtime(_) => ErrorKind::Runtime,
        }
    }
}

/// Every failed run reports as [`NatType::Error`].
impl From<&ProbeError> for NatType {
    fn from(_: &ProbeError) -> Self {
        NatType::Error
    }
}
