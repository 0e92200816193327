// 0xA2400227, private prefix of every transaction id we generate.
// Not the rfc 5389 magic cookie: rfc 3489 servers echo the 16 bytes verbatim.
pub const MAGIC_PREFIX: [u8; 4] = [0xA2, 0x40, 0x02, 0x27];

pub const TRANS_ID_LEN: usize = 16;
pub const HEADER_LEN: usize = 20;
pub const ATTR_HEADER_LEN: usize = 4;

// udp payload can't be larger than this
pub const MAX_MESSAGE_LEN: usize = u16::MAX as usize;
// header 之后的部分
pub const MAX_ATTRS_LEN: usize = MAX_MESSAGE_LEN - HEADER_LEN;
// 补齐后的 value 长度仍要放进 u16, 且是4的倍数
pub const MAX_ATTR_VALUE_LEN: usize = 65532;

pub const MESSAGE_TYPE_BIND_REQ: u16 = 0x0001;
pub const MESSAGE_TYPE_BIND_RES: u16 = 0x0101;
pub const MESSAGE_TYPE_BIND_ERR_RES: u16 = 0x0111;
pub const MESSAGE_TYPE_SHARED_SECRET_REQ: u16 = 0x0002;
pub const MESSAGE_TYPE_SHARED_SECRET_RES: u16 = 0x0102;
pub const MESSAGE_TYPE_SHARED_SECRET_ERR_RES: u16 = 0x0112;

pub const ATTR_FAMILY_IPV4: u8 = 0x01;
pub const ATTR_FAMILY_IPV6: u8 = 0x02;

pub const ATTR_MAPPED_ADDRESS: u16 = 0x0001;
pub const ATTR_RESPONSE_ADDRESS: u16 = 0x0002;
pub const ATTR_CHANGE_REQUEST: u16 = 0x0003;
pub const ATTR_SOURCE_ADDRESS: u16 = 0x0004;
pub const ATTR_CHANGED_ADDRESS: u16 = 0x0005;
pub const ATTR_USERNAME: u16 = 0x0006;
pub const ATTR_PASSWORD: u16 = 0x0007;
pub const ATTR_MESSAGE_INTEGRITY: u16 = 0x0008;
pub const ATTR_ERROR_CODE: u16 = 0x0009;
pub const ATTR_UNKNOWN_ATTRIBUTES: u16 = 0x000a;
pub const ATTR_REFLECTED_FROM: u16 = 0x000b;

pub const CHANGE_IP_FLAG: u8 = 0x04;
pub const CHANGE_PORT_FLAG: u8 = 0x02;
