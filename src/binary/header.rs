// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Binary format header.
//!
//! The header is 48 bytes of fixed-size fields at offset zero. It is read
//! before anything is mapped and tells you where the three tables live. Three
//! checks gate everything else: the magic, the declared header size, and the
//! declared file size. A file that fails any of them was either written by
//! something else or got truncated, and we refuse to touch the rest.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::Serialize;

use super::encoding::ByteReader;
use super::error::FormatError;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Magic bytes: "TSOD0001" in ASCII
pub const MAGIC: [u8; 8] = *b"TSOD0001";

/// Serialized header size: 8 (magic) + 8 (creation_ts) + 8 * 4 (u32 fields)
pub const HEADER_SIZE: usize = 48;

/// Size of one term offset record: offset u32 + count u32
pub const TERM_OFFSET_SIZE: usize = 8;

/// Fixed prefix of a vocabulary or video entry: u32 field + u8 length
pub const ENTRY_PREFIX_SIZE: usize = 5;

/// Longest word or video name a `u8` length prefix can describe
pub const MAX_NAME_LEN: usize = u8::MAX as usize;

/// Maximum varint bytes (u32 needs at most 5 bytes)
pub const MAX_VARINT_BYTES: usize = 5;

// ============================================================================
// HEADER
// ============================================================================

/// Binary format header (48 bytes fixed size)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexHeader {
    /// Seconds since the Unix epoch when the indexer ran
    pub creation_ts: u64,
    pub header_size: u32,
    pub file_size: u32,
    pub video_count: u32,
    pub video_table_offset: u32,
    pub vocab_count: u32,
    pub vocab_table_offset: u32,
    pub term_count: u32,
    pub term_table_offset: u32,
}

impl IndexHeader {
    pub const SIZE: usize = HEADER_SIZE;

    /// Read the fixed header fields. Only the magic is checked here; size
    /// checks need the real file length and live in [`validate`](Self::validate).
    pub fn read(bytes: &[u8]) -> Result<Self, FormatError> {
        let mut r = ByteReader::new(bytes);

        let mut magic = [0u8; 8];
        magic.copy_from_slice(r.read_bytes(MAGIC.len())?);
        if magic != MAGIC {
            return Err(FormatError::BadMagic { found: magic });
        }

        Ok(Self {
            creation_ts: r.read_u64_le()?,
            header_size: r.read_u32_le()?,
            file_size: r.read_u32_le()?,
            video_count: r.read_u32_le()?,
            video_table_offset: r.read_u32_le()?,
            vocab_count: r.read_u32_le()?,
            vocab_table_offset: r.read_u32_le()?,
            term_count: r.read_u32_le()?,
            term_table_offset: r.read_u32_le()?,
        })
    }

    /// Check the declared sizes against reality.
    pub fn validate(&self, actual_file_size: u64) -> Result<(), FormatError> {
        if self.header_size as usize != HEADER_SIZE {
            return Err(FormatError::HeaderSizeMismatch {
                declared: self.header_size,
                expected: HEADER_SIZE as u32,
            });
        }
        if u64::from(self.file_size) != actual_file_size {
            return Err(FormatError::FileSizeMismatch {
                declared: self.file_size,
                actual: actual_file_size,
            });
        }
        self.check_tables()
    }

    /// Read and validate against `bytes.len()`.
    pub fn parse(bytes: &[u8]) -> Result<Self, FormatError> {
        let header = Self::read(bytes)?;
        header.validate(bytes.len() as u64)?;
        Ok(header)
    }

    /// Every table must start inside the file; the term table has a fixed
    /// record size, so it must fit completely.
    fn check_tables(&self) -> Result<(), FormatError> {
        let file_size = u64::from(self.file_size);
        let term_len = u64::from(self.term_count) * TERM_OFFSET_SIZE as u64;
        let tables = [
            ("video", self.video_table_offset, self.video_count, 0),
            ("vocabulary", self.vocab_table_offset, self.vocab_count, 0),
            ("term", self.term_table_offset, self.term_count, term_len),
        ];

        for (table, offset, count, len) in tables {
            if count == 0 {
                continue;
            }
            let offset = u64::from(offset);
            if offset < HEADER_SIZE as u64 || offset + len.max(1) > file_size {
                return Err(FormatError::TableOutOfBounds {
                    table,
                    offset,
                    len,
                    file_size,
                });
            }
        }
        Ok(())
    }

    pub fn created_at(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(self.creation_ts)
    }

    pub fn write(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&MAGIC);
        buf.extend_from_slice(&self.creation_ts.to_le_bytes());
        buf.extend_from_slice(&self.header_size.to_le_bytes());
        buf.extend_from_slice(&self.file_size.to_le_bytes());
        buf.extend_from_slice(&self.video_count.to_le_bytes());
        buf.extend_from_slice(&self.video_table_offset.to_le_bytes());
        buf.extend_from_slice(&self.vocab_count.to_le_bytes());
        buf.extend_from_slice(&self.vocab_table_offset.to_le_bytes());
        buf.extend_from_slice(&self.term_count.to_le_bytes());
        buf.extend_from_slice(&self.term_table_offset.to_le_bytes());
    }
}
