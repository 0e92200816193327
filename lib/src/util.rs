use crate::constants::{MAGIC_PREFIX, TRANS_ID_LEN};
use crate::error::RuntimeError;
use crate::header::TransId;
use bytes::{BufMut, Bytes, BytesMut};
use rand::RngCore;
use std::fmt::Write as _;

pub fn print_bytes(buf: &[u8], separator: &str, row_width: usize) -> String {
    let mut hex = String::new();
    buf.iter().enumerate().for_each(|(x, y)| {
        let _ = write!(hex, "{:02X}", y);
        if (x + 1) % row_width == 0 {
            hex.push('\n');
        } else {
            hex.push_str(separator);
        }
    });

    hex
}

/// Smallest multiple of 4 that is >= `n`.
pub fn align(n: usize) -> usize {
    (n + 3) & !3
}

// 4*n bytes, 不足的补0
pub fn padding(value: &[u8]) -> Bytes {
    let new_len = align(value.len());

    let mut buf = BytesMut::with_capacity(new_len);
    buf.put_slice(value);
    buf.put_bytes(0, new_len - value.len());
    buf.freeze()
}

/// Magic prefix followed by 12 bytes drawn from `rng`.
pub fn new_trans_id<R: RngCore + ?Sized>(rng: &mut R) -> Result<TransId, RuntimeError> {
    let prefix_len = MAGIC_PREFIX.len();
    let mut trans_id = [0u8; TRANS_ID_LEN];

    trans_id[..prefix_len].copy_from_slice(&MAGIC_PREFIX[..]);
    rng.try_fill_bytes(&mut trans_id[prefix_len..])?;
    Ok(trans_id)
}

pub fn pack_error_code(code: u16) -> u16 {
    let n1 = code / 100;
    let n2 = code % 100;

    n1 << 8 | n2
}

pub fn unpack_error_code(code: u16) -> u16 {
    let n2 = code & 0x00ff;
    let n1 = (code >> 8) & 0x07;
    n1 * 100 + n2
}
