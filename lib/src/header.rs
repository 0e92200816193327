use crate::constants::*;
use bytes::{BufMut, Bytes, BytesMut};

use crate::error::FormatError;

pub type TransId = [u8; TRANS_ID_LEN];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    BindingRequest,
    BindingResponse,
    BindingErrorResponse,
    SharedSecretRequest,
    SharedSecretResponse,
    SharedSecretErrorResponse,
}

impl MessageType {
    pub fn code(self) -> u16 {
        match self {
            MessageType::BindingRequest => MESSAGE_TYPE_BIND_REQ,
            MessageType::BindingResponse => MESSAGE_TYPE_BIND_RES,
            MessageType::BindingErrorResponse => MESSAGE_TYPE_BIND_ERR_RES,
            MessageType::SharedSecretRequest => MESSAGE_TYPE_SHARED_SECRET_REQ,
            MessageType::SharedSecretResponse => MESSAGE_TYPE_SHARED_SECRET_RES,
            MessageType::SharedSecretErrorResponse => MESSAGE_TYPE_SHARED_SECRET_ERR_RES,
        }
    }
}

impl TryFrom<u16> for MessageType {
    type Error = FormatError;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        let msg_type = match code {
            MESSAGE_TYPE_BIND_REQ => MessageType::BindingRequest,
            MESSAGE_TYPE_BIND_RES => MessageType::BindingResponse,
            MESSAGE_TYPE_BIND_ERR_RES => MessageType::BindingErrorResponse,
            MESSAGE_TYPE_SHARED_SECRET_REQ => MessageType::SharedSecretRequest,
            MESSAGE_TYPE_SHARED_SECRET_RES => MessageType::SharedSecretResponse,
            MESSAGE_TYPE_SHARED_SECRET_ERR_RES => MessageType::SharedSecretErrorResponse,
            v => return Err(FormatError::UnknownMessageType(v)),
        };
        Ok(msg_type)
    }
}

// rfc 3489, 11.1
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub msg_type: MessageType,

    // 不包括header的20字节
    pub msg_len: u16,

    pub trans_id: TransId,
}

impl Header {
    pub fn new(msg_type: MessageType, msg_len: u16, trans_id: TransId) -> Self {
        Self {
            msg_type,
            msg_len,
            trans_id,
        }
    }

    pub fn pack(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(HEADER_LEN);
        buf.put_u16(self.msg_type.code());
        buf.put_u16(self.msg_len);
        buf.put_slice(&self.trans_id);
        buf.freeze()
    }

    /// Reads the fixed 20 bytes at the front of `buf`.
    ///
    /// The declared length is returned as-is; it is not checked against
    /// the number of bytes that follow.
    pub fn unpack(buf: &[u8]) -> Result<Self, FormatError> {
        // 只检查长度
        if buf.len() < HEADER_LEN {
            return Err(FormatError::TooShort(buf.len()));
        }

        let mut index = 0_usize;
        let msg_type = u16::from_be_bytes([buf[index], buf[index + 1]]);
        let msg_type = MessageType::try_from(msg_type)?;

        index += 2;
        let msg_len = u16::from_be_bytes([buf[index], buf[index + 1]]);

        index += 2;
        let mut trans_id = [0_u8; TRANS_ID_LEN];
        trans_id.copy_from_slice(&buf[index..HEADER_LEN]);

        Ok(Self {
            msg_type,
            msg_len,
            trans_id,
        })
    }
}
