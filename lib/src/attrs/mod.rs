#![allow(clippy::len_without_is_empty)]

use bytes::{BufMut, Bytes, BytesMut};

use crate::constants::*;
use crate::error::FormatError;
use crate::util;

pub mod address_attr;
pub mod change_request;
pub mod errcode_attr;

/// rfc 3489, 11.2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttrType {
    MappedAddress,
    ResponseAddress,
    ChangeRequest,
    SourceAddress,
    ChangedAddress,
    Username,
    Password,
    MessageIntegrity,
    ErrorCode,
    UnknownAttributes,
    ReflectedFrom,
    // 0x8000 以上的可选属性, 例如 xor-mapped-address, software
    Other(u16),
}

impl AttrType {
    pub fn code(self) -> u16 {
        match self {
            AttrType::MappedAddress => ATTR_MAPPED_ADDRESS,
            AttrType::ResponseAddress => ATTR_RESPONSE_ADDRESS,
            AttrType::ChangeRequest => ATTR_CHANGE_REQUEST,
            AttrType::SourceAddress => ATTR_SOURCE_ADDRESS,
            AttrType::ChangedAddress => ATTR_CHANGED_ADDRESS,
            AttrType::Username => ATTR_USERNAME,
            AttrType::Password => ATTR_PASSWORD,
            AttrType::MessageIntegrity => ATTR_MESSAGE_INTEGRITY,
            AttrType::ErrorCode => ATTR_ERROR_CODE,
            AttrType::UnknownAttributes => ATTR_UNKNOWN_ATTRIBUTES,
            AttrType::ReflectedFrom => ATTR_REFLECTED_FROM,
            AttrType::Other(v) => v,
        }
    }

}

impl From<u16> for AttrType {
    fn from(code: u16) -> Self {
        match code {
            ATTR_MAPPED_ADDRESS => AttrType::MappedAddress,
            ATTR_RESPONSE_ADDRESS => AttrType::ResponseAddress,
            ATTR_CHANGE_REQUEST => AttrType::ChangeRequest,
            ATTR_SOURCE_ADDRESS => AttrType::SourceAddress,
            ATTR_CHANGED_ADDRESS => AttrType::ChangedAddress,
            ATTR_USERNAME => AttrType::Username,
            ATTR_PASSWORD => AttrType::Password,
            ATTR_MESSAGE_INTEGRITY => AttrType::MessageIntegrity,
            ATTR_ERROR_CODE => AttrType::ErrorCode,
            ATTR_UNKNOWN_ATTRIBUTES => AttrType::UnknownAttributes,
            ATTR_REFLECTED_FROM => AttrType::ReflectedFrom,
            v => AttrType::Other(v),
        }
    }
}

/// One TLV attribute. `value` is always zero padded to a 4 byte boundary
/// and `attr_len` is the padded length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAttr {
    pub attr_type: AttrType,
    pub attr_len: u16,
    pub value: Bytes,
}

impl RawAttr {
    /// Pads `value` to a 4 byte boundary. Fails when the padded value
    /// would not fit the 16 bit length field.
    pub fn new(attr_type: AttrType, value: Bytes) -> Result<Self, FormatError> {
        if value.len() > MAX_ATTR_VALUE_LEN {
            return Err(FormatError::AttrTooLong(value.len()));
        }
        Ok(Self::fixed(attr_type, &value))
    }

    // 定长的属性, value 不会超过 MAX_ATTR_VALUE_LEN
    pub(crate) fn fixed(attr_type: AttrType, value: &[u8]) -> Self {
        debug_assert!(value.len() <= MAX_ATTR_VALUE_LEN);
        let value = util::padding(value);
        Self {
            attr_type,
            attr_len: value.len() as u16,
            value,
        }
    }

    /// Bytes this attribute occupies on the wire, header included.
    pub fn len(&self) -> usize {
        ATTR_HEADER_LEN + util::align(self.attr_len as usize)
    }

    pub fn pack(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.len());

        buf.put_u16(self.attr_type.code());
        buf.put_u16(self.attr_len);
        buf.put_slice(&self.value);

        buf.freeze()
    }

    /// Decodes the attribute starting at `offset`, returning it together
    /// with the number of bytes it consumed (`4 + align(length)`).
    pub fn unpack(buf: &[u8], offset: usize) -> Result<(Self, usize), FormatError> {
        let available = buf.len().saturating_sub(offset);
        if available < ATTR_HEADER_LEN {
            return Err(FormatError::AttrOverflow {
                offset,
                needed: ATTR_HEADER_LEN,
                available,
            });
        }

        let mut index = offset;
        let attr_type = u16::from_be_bytes([buf[index], buf[index + 1]]);

        index += 2;
        let attr_len = u16::from_be_bytes([buf[index], buf[index + 1]]) as usize;

        let consumed = ATTR_HEADER_LEN + util::align(attr_len);
        if consumed > available {
            return Err(FormatError::AttrOverflow {
                offset,
                needed: consumed,
                available,
            });
        }

        index += 2;
        let value = Bytes::copy_from_slice(&buf[index..index + attr_len]);

        Ok((Self::new(attr_type.into(), value)?, consumed))
    }
}
