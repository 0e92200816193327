use crate::attrs::{AttrType, RawAttr};
use crate::constants::*;
use crate::error::FormatError;
use bytes::{BufMut, BytesMut};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

// 地址类的attribute
//
// mapped-address  response-address  source-address  changed-address  reflected-from
//
//  0                   1                   2                   3
//  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |x x x x x x x x|    Family     |           Port                |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                 Address (32 bits or 128 bits)                 |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//
// ipv4: family: 0x01, 4 bytes
// ipv6: family: 0x02, 16 bytes

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressAttr {
    pub attr_type: AttrType,
    pub address: SocketAddr,
}

impl AddressAttr {
    pub fn new(attr_type: AttrType, address: SocketAddr) -> Self {
        Self { attr_type, address }
    }
}

impl From<AddressAttr> for RawAttr {
    fn from(attr: AddressAttr) -> Self {
        let (family, ip_bytes): (u8, Vec<u8>) = match attr.address.ip() {
            IpAddr::V4(ip) => (ATTR_FAMILY_IPV4, ip.octets().into()),
            IpAddr::V6(ip) => (ATTR_FAMILY_IPV6, ip.octets().into()),
        };

        let mut bytes_buf = BytesMut::with_capacity(4 + ip_bytes.len());

        bytes_buf.put_u8(0);
        bytes_buf.put_u8(family);
        bytes_buf.put_u16(attr.address.port());
        bytes_buf.put_slice(&ip_bytes);

        RawAttr::fixed(attr.attr_type, &bytes_buf)
    }
}

impl TryFrom<&RawAttr> for AddressAttr {
    type Error = FormatError;

    /// The family byte picks how many address bytes are read; the
    /// attribute length only has to be large enough to hold them.
    fn try_from(base_attr: &RawAttr) -> Result<Self, Self::Error> {
        let attr_type = base_attr.attr_type;
        let value = &base_attr.value[..];

        if value.len() < 4 {
            return Err(FormatError::BufSize(format!("attr buf len:{}", value.len())));
        }

        let mut index = 1_usize;
        let family = value[index];

        index += 1;
        let port = u16::from_be_bytes([value[index], value[index + 1]]);

        index += 2;

        let ip = match family {
            ATTR_FAMILY_IPV4 => {
                if index + 4 > value.len() {
                    return Err(FormatError::BufSize("ipv4 buf len < 4".to_string()));
                }
                let mut addr = [0_u8; 4];
                addr.copy_from_slice(&value[index..index + 4]);
                IpAddr::V4(Ipv4Addr::from(addr))
            }
            ATTR_FAMILY_IPV6 => {
                if index + 16 > value.len() {
                    return Err(FormatError::BufSize("ipv6 buf len < 16".to_string()));
                }
                let mut addr = [0_u8; 16];
                addr.copy_from_slice(&value[index..index + 16]);
                IpAddr::V6(Ipv6Addr::from(addr))
            }
            v => {
                return Err(FormatError::BadValue(format!("ip family: {}", v)));
            }
        };

        Ok(Self {
            attr_type,
            address: SocketAddr::new(ip, port),
        })
    }
}
