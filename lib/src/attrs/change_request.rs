use crate::attrs::{AttrType, RawAttr};
use crate::constants::*;
use crate::error::FormatError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChangeRequest {
    pub change_ip: bool,
    pub change_port: bool,
}

impl ChangeRequest {
    pub fn new(change_ip: bool, change_port: bool) -> Self {
        Self {
            change_ip,
            change_port,
        }
    }
}

impl From<ChangeRequest> for RawAttr {
    fn from(attr: ChangeRequest) -> Self {
        let mut value = [0_u8; 4];
        if attr.change_ip {
            value[3] |= CHANGE_IP_FLAG;
        }
        if attr.change_port {
            value[3] |= CHANGE_PORT_FLAG;
        }
        RawAttr::fixed(AttrType::ChangeRequest, &value)
    }
}

impl TryFrom<&RawAttr> for ChangeRequest {
    type Error = FormatError;

    fn try_from(base_attr: &RawAttr) -> Result<Self, Self::Error> {
        if base_attr.value.len() != 4 {
            return Err(FormatError::BufSize(format!(
                "change_request attr len:{} != 4",
                base_attr.value.len()
            )));
        }

        let flag = base_attr.value[3];

        let change_ip = flag & CHANGE_IP_FLAG == CHANGE_IP_FLAG;
        let change_port = flag & CHANGE_PORT_FLAG == CHANGE_PORT_FLAG;
        Ok(Self {
            change_ip,
            change_port,
        })
    }
}
