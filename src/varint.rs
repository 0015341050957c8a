//! Base-128 varint primitives shared by the reader and writer.

use bytes::BufMut;

use crate::error::{DecodeError, DecodeErrorKind};

/// Encodes an integer in LEB128 variable length format: seven bits per
/// byte, least significant group first, the high bit marking continuation.
#[inline]
pub fn encode_varint(mut value: u64, buf: &mut impl BufMut) {
    loop {
        let group = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            buf.put_u8(group);
            return;
        }
        buf.put_u8(group | 0x80);
    }
}

/// Returns the encoded length of the value in LEB128 variable length
/// format: one byte per started group of seven significant bits, between
/// 1 and 10 inclusive.
#[inline]
pub fn encoded_len_varint(value: u64) -> usize {
    // `value | 1` keeps zero at one significant bit, hence one byte.
    let significant_bits = 64 - (value | 1).leading_zeros() as usize;
    (significant_bits + 6) / 7
}

/// Decodes a LEB128-encoded integer from the front of `bytes`, returning the
/// value and the number of bytes consumed.
#[inline]
pub fn decode_varint(bytes: &[u8]) -> Result<(u64, usize), DecodeError> {
    let mut value = 0u64;
    for (count, &byte) in bytes.iter().enumerate().take(10) {
        value |= u64::from(byte & 0x7F) << (count * 7);
        if byte <= 0x7F {
            // The tenth byte may only contribute a single bit; anything more
            // overflows u64. See protobuf-go's ConsumeVarint.
            if count == 9 && byte >= 0x02 {
                return Err(DecodeErrorKind::VarintOverflow.into());
            }
            return Ok((value, count + 1));
        }
    }
    if bytes.len() < 10 {
        Err(DecodeErrorKind::Truncated.into())
    } else {
        Err(DecodeErrorKind::VarintOverflow.into())
    }
}

/// Maps a signed 32-bit integer onto the unsigned varint space, keeping
/// small magnitudes small regardless of sign.
#[inline]
pub fn encode_zigzag32(value: i32) -> u64 {
    u64::from(((value << 1) ^ (value >> 31)) as u32)
}

#[inline]
pub fn decode_zigzag32(value: u64) -> i32 {
    let value = value as u32;
    ((value >> 1) as i32) ^ (-((value & 1) as i32))
}

#[inline]
pub fn encode_zigzag64(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

#[inline]
pub fn decode_zigzag64(value: u64) -> i64 {
    ((value >> 1) as i64) ^ (-((value & 1) as i64))
}
