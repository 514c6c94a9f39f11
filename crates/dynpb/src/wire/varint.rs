// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Base-128 varints and little-endian fixed-width fields.
//!
//! Each varint byte carries 7 data bits, least significant group first;
//! bit 7 is set on every byte except the last. A u64 needs at most 10 bytes.
//!
//! ```text
//! 300 = 0b1_0010_1100
//!   byte 0: 0b1_0101100 = 0xAC  (low 7 bits, more follow)
//!   byte 1: 0b0_0000010 = 0x02  (next 7 bits, last)
//! ```

use crate::error::{Error, Result};

/// Maximum bytes needed to encode a u64.
pub(crate) const MAX_VARINT_LEN: usize = 10;

const CONTINUATION_BIT: u8 = 0x80;
const DATA_MASK: u8 = 0x7F;

/// Append `value` as a varint.
#[inline]
pub(crate) fn put_varint(out: &mut Vec<u8>, mut value: u64) {
    loop {
        let byte = (value & u64::from(DATA_MASK)) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | CONTINUATION_BIT);
    }
}

/// Encoded size of `value`.
#[inline]
#[must_use]
pub(crate) const fn varint_len(value: u64) -> usize {
    if value == 0 {
        return 1;
    }
    let bits = 64 - value.leading_zeros() as usize;
    bits.div_ceil(7)
}

/// Read a varint from the front of `buf`, returning it and the bytes consumed.
#[inline]
pub(crate) fn read_varint(buf: &[u8]) -> Result<(u64, usize)> {
    let mut result: u64 = 0;
    let mut shift: u32 = 0;

    for (i, &byte) in buf.iter().enumerate() {
        if i >= MAX_VARINT_LEN {
            return Err(Error::ParseError("varint longer than 10 bytes".to_string()));
        }
        let data = u64::from(byte & DATA_MASK);
        // At shift 63 only the lowest bit still fits in a u64.
        if shift == 63 && data > 1 {
            return Err(Error::ParseError("varint overflows 64 bits".to_string()));
        }
        result |= data << shift;
        if byte & CONTINUATION_BIT == 0 {
            return Ok((result, i + 1));
        }
        shift += 7;
    }

    Err(Error::ParseError("truncated varint".to_string()))
}

/// Append a little-endian 32-bit value.
#[inline]
pub(crate) fn put_fixed32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

/// Append a little-endian 64-bit value.
#[inline]
pub(crate) fn put_fixed64(out: &mut Vec<u8>, value: u64) {
    out.extend_from_slice(&value.to_le_bytes());
}

pub(crate) fn read_fixed32(buf: &[u8]) -> Result<u32> {
    buf.get(..4)
        .and_then(|b| b.try_into().ok())
        .map(u32::from_le_bytes)
        .ok_or_else(|| Error::ParseError("truncated fixed32".to_string()))
}

pub(crate) fn read_fixed64(buf: &[u8]) -> Result<u64> {
    buf.get(..8)
        .and_then(|b| b.try_into().ok())
        .map(u64::from_le_bytes)
        .ok_or_else(|| Error::ParseError("truncated fixed64".to_string()))
}
