use thiserror::Error;

/// Malformed bytes on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("message too short: {0} < 20")]
    TooShort(usize),

    #[error("message too long: {0} > 65535")]
    TooLong(usize),

    // 属性声明的长度超出了剩余的buf
    #[error("attr at offset {offset} needs {needed} bytes, {available} available")]
    AttrOverflow {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("attr value too long: {0} > 65532")]
    AttrTooLong(usize),

    // buf不够
    #[error("buf size: {0}")]
    BufSize(String),

    //字段的值不合规
    #[error("bad value: {0}")]
    BadValue(String),

    #[error("unknown message type: {0:#06x}")]
    UnknownMessageType(u16),

    // 不是utf8字符串
    #[error("not utf8")]
    NotUtf8,
}

/// Failure while building a message locally.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("random source unavailable: {0}")]
    Random(#[from] rand::Error),
}
