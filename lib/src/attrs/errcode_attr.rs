use crate::attrs::{AttrType, RawAttr};
use crate::error::FormatError;
use crate::util;
use bytes::{BufMut, BytesMut};

// class:  3 bit        1-6
// number: 8 bit        0-99

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrcodeAttr {
    pub code: u16,
    pub msg: String,
}

impl ErrcodeAttr {
    pub fn new(code: u16, msg: &str) -> Self {
        Self {
            code,
            msg: msg.to_string(),
        }
    }
}

impl TryFrom<ErrcodeAttr> for RawAttr {
    type Error = FormatError;

    // reason phrase 可能很长
    fn try_from(attr: ErrcodeAttr) -> Result<Self, Self::Error> {
        let mut bytes_buf = BytesMut::with_capacity(4 + attr.msg.len());
        bytes_buf.put_u16(0);
        bytes_buf.put_u16(util::pack_error_code(attr.code));
        bytes_buf.put_slice(attr.msg.as_bytes());

        RawAttr::new(AttrType::ErrorCode, bytes_buf.freeze())
    }
}

impl TryFrom<&RawAttr> for ErrcodeAttr {
    type Error = FormatError;

    fn try_from(base_attr: &RawAttr) -> Result<Self, Self::Error> {
        if base_attr.value.len() < 4 {
            return Err(FormatError::BufSize(format!(
                "err_code attr buf len:{} < 4",
                base_attr.value.len()
            )));
        }

        let value = &base_attr.value[..];
        let code = util::unpack_error_code(u16::from_be_bytes([value[2], value[3]]));

        // reason phrase 后面可能有补齐用的 0
        let msg = match std::str::from_utf8(&value[4..]) {
            Ok(v) => v.trim_end_matches('\0').trim().to_string(),
            Err(_e) => {
                return Err(FormatError::NotUtf8);
            }
        };

        Ok(Self { code, msg })
    }
}
