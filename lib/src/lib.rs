//! Rfc 3489 (classic STUN) message codec.

pub mod attrs;
pub mod constants;
pub mod error;
pub mod header;
pub mod message;
pub mod util;

pub use error::{FormatError, RuntimeError};
pub use header::{MessageType, TransId};
pub use message::Message;
