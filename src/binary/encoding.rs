// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Binary decoding primitives: varint and a bounds-checked byte cursor.
//!
//! Every delta in a posting stream is a varint, and every table entry is a
//! handful of little-endian integers followed by a length-prefixed string.
//! Both go through [`ByteReader`], which never reads past the slice it was
//! given. The on-disk format has no checksum, so the reader is the last line
//! between a corrupt file and a wrong answer.
//!
//! # References
//!
//! - **Varint (LEB128)**: Little-endian base-128 variable-length integer encoding.
//!   Originally from DWARF debugging format (1992+), popularized by Protocol Buffers.
//!   See: DWARF4 specification §7.6 "Variable Length Data", and
//!   Google Protocol Buffers encoding: <https://protobuf.dev/programming-guides/encoding/>

use super::error::FormatError;
use super::header::MAX_VARINT_BYTES;

// ============================================================================
// VARINT ENCODING
// ============================================================================

/// Encode a varint to bytes
pub fn encode_varint(mut value: u32, buf: &mut Vec<u8>) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            buf.push(byte);
            break;
        } else {
            buf.push(byte | 0x80);
        }
    }
}

/// Number of bytes `encode_varint` emits for `value`.
pub fn varint_len(value: u32) -> usize {
    let bits = 32 - value.leading_zeros() as usize;
    bits.div_ceil(7).max(1)
}

/// Decode a varint from bytes, returning (value, bytes_consumed)
///
/// Returns an error if:
/// - Buffer is empty or ends before the terminating byte
/// - Varint exceeds MAX_VARINT_BYTES or carries bits past 32
pub fn decode_varint(bytes: &[u8]) -> Result<(u32, usize), FormatError> {
    decode_varint_at(bytes, 0)
}

/// Same as [`decode_varint`], reporting errors relative to `base`.
fn decode_varint_at(bytes: &[u8], base: usize) -> Result<(u32, usize), FormatError> {
    let mut result: u32 = 0;
    let mut shift = 0u32;

    for (i, &byte) in bytes.iter().take(MAX_VARINT_BYTES).enumerate() {
        let group = (byte & 0x7F) as u32;
        // Fifth byte may only contribute the top 4 bits
        if shift == 28 && group > 0x0F {
            return Err(FormatError::VarintOverflow { offset: base });
        }
        result |= group << shift;
        if byte & 0x80 == 0 {
            return Ok((result, i + 1));
        }
        shift += 7;
    }

    if bytes.len() >= MAX_VARINT_BYTES {
        Err(FormatError::VarintOverflow { offset: base })
    } else {
        Err(FormatError::TruncatedVarint { offset: base })
    }
}

// ============================================================================
// BYTE READER
// ============================================================================

/// Forward-only cursor over a borrowed byte slice.
///
/// Offsets are absolute within the slice, so when the slice is the whole
/// mapped file, errors point at real file offsets.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Reader positioned at `pos`. Positioning past the end is allowed;
    /// the next read reports it.
    pub fn at(bytes: &'a [u8], pos: usize) -> Self {
        Self { bytes, pos }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.pos)
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], FormatError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.bytes.len())
            .ok_or(FormatError::UnexpectedEnd {
                offset: self.pos,
                needed: n - self.remaining().min(n),
            })?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], FormatError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, FormatError> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u32_le(&mut self) -> Result<u32, FormatError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64_le(&mut self) -> Result<u64, FormatError> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    /// Read a `u8` length prefix followed by that many bytes.
    pub fn read_str8(&mut self) -> Result<&'a [u8], FormatError> {
        let len = self.read_u8()? as usize;
        self.read_bytes(len)
    }

    #[inline]
    pub fn read_varint(&mut self) -> Result<u32, FormatError> {
        let start = self.pos;
        let tail = self.bytes.get(start..).unwrap_or(&[]);
        let (value, consumed) = decode_varint_at(tail, start)?;
        self.pos = start + consumed;
        Ok(value)
    }
}

/// Strip the trailing NUL padding the indexer appends to stored strings.
pub fn trim_nul(bytes: &[u8]) -> &[u8] {
    let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    &bytes[..end]
}


// ============================================================================
// KANI MODEL CHECKING PROOFS
// ============================================================================
//
// Run with: cargo kani
//
// Verified properties:
// 1. decode_varint never panics for any byte sequence
// 2. Roundtrip: decode(encode(x)) == x for all x
// 3. Output length: encode produces at most MAX_VARINT_BYTES bytes

#[cfg(kani)]
mod kani_proofs {
    use super::*;

    #[kani::proof]
    fn verify_encode_varint_bounded() {
        let value: u32 = kani::any();
        let mut buf = Vec::new();
        encode_varint(value, &mut buf);

        kani::assert(!buf.is_empty(), "encode_varint must produce at least 1 byte");
        kani::assert(
            buf.len() <= MAX_VARINT_BYTES,
            "encode_varint must produce at most MAX_VARINT_BYTES bytes",
        );
        kani::assert(buf.len() == varint_len(value), "varint_len must agree");
    }

    #[kani::proof]
    #[kani::unwind(7)]
    fn verify_decode_varint_no_panic() {
        let len: usize = kani::any_where(|&n| n <= MAX_VARINT_BYTES + 1);
        let mut bytes = [0u8; 6];
        for i in 0..len {
            bytes[i] = kani::any();
        }
        if let Ok((_, consumed)) = decode_varint(&bytes[..len]) {
            kani::assert(consumed > 0 && consumed <= len, "consumed within input");
        }
    }

    #[kani::proof]
    #[kani::unwind(7)]
    fn verify_varint_roundtrip() {
        let original: u32 = kani::any();
        let mut buf = Vec::new();
        encode_varint(original, &mut buf);
        let result = decode_varint(&buf);
        kani::assert(result == Ok((original, buf.len())), "Roundtrip must preserve value");
    }
}
