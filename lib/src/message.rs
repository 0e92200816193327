use crate::attrs::address_attr::AddressAttr;
use crate::attrs::errcode_attr::ErrcodeAttr;
use crate::attrs::{AttrType, RawAttr};
use crate::constants::*;
use crate::error::{FormatError, RuntimeError};
use crate::header::{Header, MessageType, TransId};
use crate::util;
use bytes::{BufMut, Bytes, BytesMut};
use log::trace;
use rand::RngCore;
use std::net::SocketAddr;

/// A STUN message: header, attributes in insertion order and, for
/// messages read off the wire, the address they came from.
///
/// `header.msg_len` always equals the sum of `attr.len()` over `attrs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub header: Header,
    pub attrs: Vec<RawAttr>,
    pub origin: Option<SocketAddr>,
}

impl Message {
    /// Fresh message with a new transaction id and no attributes.
    pub fn new<R: RngCore + ?Sized>(
        msg_type: MessageType,
        rng: &mut R,
    ) -> Result<Self, RuntimeError> {
        let trans_id = util::new_trans_id(rng)?;
        Ok(Self::with_trans_id(msg_type, trans_id))
    }

    pub fn with_trans_id(msg_type: MessageType, trans_id: TransId) -> Self {
        Self {
            header: Header::new(msg_type, 0, trans_id),
            attrs: Vec::with_capacity(4),
            origin: None,
        }
    }

    pub fn msg_type(&self) -> MessageType {
        self.header.msg_type
    }

    pub fn trans_id(&self) -> &TransId {
        &self.header.trans_id
    }

    /// Appends `attr`. Fails, leaving the message untouched, when the
    /// attributes would no longer fit in one 65535 byte message.
    pub fn add_attr(&mut self, attr: RawAttr) -> Result<(), FormatError> {
        let total = self.header.msg_len as usize + attr.len();
        if total > MAX_ATTRS_LEN {
            return Err(FormatError::TooLong(HEADER_LEN + total));
        }

        self.header.msg_len = total as u16;
        self.attrs.push(attr);
        Ok(())
    }

    pub fn pack(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(HEADER_LEN + self.header.msg_len as usize);
        buf.put_slice(&self.header.pack());
        for v in self.attrs.iter() {
            buf.put_slice(&v.pack());
        }

        buf.freeze()
    }

    pub fn unpack(buf: &[u8]) -> Result<Self, FormatError> {
        if buf.len() < HEADER_LEN {
            return Err(FormatError::TooShort(buf.len()));
        }
        if buf.len() > MAX_MESSAGE_LEN {
            return Err(FormatError::TooLong(buf.len()));
        }

        let header = Header::unpack(buf)?;
        let mut message = Self::with_trans_id(header.msg_type, header.trans_id);

        let mut offset = HEADER_LEN;
        while buf.len() - offset >= ATTR_HEADER_LEN {
            let (attr, consumed) = RawAttr::unpack(buf, offset)?;
            if let AttrType::Other(code) = attr.attr_type {
                trace!("attr {:#06x}, {} bytes, kept raw", code, attr.attr_len);
            }
            message.add_attr(attr)?;
            offset += consumed;
        }

        Ok(message)
    }

    pub fn find_attr(&self, attr_type: AttrType) -> Option<&RawAttr> {
        self.attrs.iter().find(|v| v.attr_type == attr_type)
    }

    /// Address carried by the first attribute of `attr_type`, or `None`
    /// when it is missing or can't be decoded.
    pub fn first_address(&self, attr_type: AttrType) -> Option<SocketAddr> {
        let attr = self.find_attr(attr_type)?;
        AddressAttr::try_from(attr).ok().map(|v| v.address)
    }

    pub fn mapped_address(&self) -> Option<SocketAddr> {
        self.first_address(AttrType::MappedAddress)
    }

    pub fn changed_address(&self) -> Option<SocketAddr> {
        self.first_address(AttrType::ChangedAddress)
    }

    pub fn source_address(&self) -> Option<SocketAddr> {
        self.first_address(AttrType::SourceAddress)
    }

    pub fn error_code(&self) -> Option<ErrcodeAttr> {
        let attr = self.find_attr(AttrType::ErrorCode)?;
        ErrcodeAttr::try_from(attr).ok()
    }
}
