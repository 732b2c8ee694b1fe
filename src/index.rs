// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The loaded index: mapped bytes plus the lookup structures built from them.
//!
//! Loading happens in a fixed order. Read exactly the header-sized prefix,
//! validate magic, header size and file size, and only then map the file and
//! walk the vocabulary and video tables. Any failure aborts the whole load;
//! there is no partially loaded index.
//!
//! Everything is immutable after [`Index::open`]. Queries borrow the index,
//! so several indexes can be open side by side and share nothing.

use std::fs::File;
use std::io::{self, Read};
use std::ops::{Deref, Range};
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::binary::{
    decode_videos, decode_vocabulary, FormatError, IndexHeader, PostingCursor, TermId,
    TermIterator, TermOffset, TermTable, Video, HEADER_SIZE,
};
use crate::vocabulary::Vocabulary;

// ============================================================================
// ERRORS
// ============================================================================

/// Startup failures. All of them are fatal for the caller.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("can't open {}", path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("{} is smaller than the 48-byte header", path.display())]
    ShortHeader { path: PathBuf },

    #[error("failed to map {}", path.display())]
    Map { path: PathBuf, source: io::Error },

    #[error("invalid index file")]
    Format(#[from] FormatError),
}

// ============================================================================
// BACKING BYTES
// ============================================================================

/// Where the index bytes live.
#[derive(Debug)]
pub enum IndexBytes {
    /// Read-only mapping of the file, released when the index is dropped
    Mapped(Mmap),
    /// In-memory buffer (tests, embedded indexes)
    Owned(Vec<u8>),
}

impl Deref for IndexBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            IndexBytes::Mapped(mmap) => mmap,
            IndexBytes::Owned(vec) => vec,
        }
    }
}

// ============================================================================
// INDEX
// ============================================================================

#[derive(Debug)]
pub struct Index {
    bytes: IndexBytes,
    header: IndexHeader,
    vocabulary: Vocabulary,
    videos: Vec<Video>,
    /// Byte range of the term offset table, checked at load
    term_table: Range<usize>,
}

/// Summary numbers for display.
#[derive(Debug, Clone, Serialize)]
pub struct IndexStats {
    pub file_size: usize,
    pub videos: usize,
    pub vocabulary: usize,
    pub terms: usize,
    pub postings: u64,
}

impl Index {
    /// Open and map an index file.
    ///
    /// The file must not change while the index is alive: the mapping has no
    /// way to notice, and a shrinking file turns reads into SIGBUS.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, IndexError> {
        let path = path.as_ref();
        let open_err = |source| IndexError::Open {
            path: path.to_path_buf(),
            source,
        };

        let mut file = File::open(path).map_err(open_err)?;

        let mut prefix = [0u8; HEADER_SIZE];
        file.read_exact(&mut prefix).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => IndexError::ShortHeader {
                path: path.to_path_buf(),
            },
            _ => open_err(e),
        })?;

        let header = IndexHeader::read(&prefix)?;
        let actual_len = file.metadata().map_err(open_err)?.len();
        header.validate(actual_len)?;

        let map_err = |source| IndexError::Map {
            path: path.to_path_buf(),
            source,
        };
        // SAFETY: mapped read-only; the file is treated as immutable for the
        // lifetime of the index (see the doc comment above).
        #[allow(unsafe_code)]
        let mmap = unsafe { Mmap::map(&file) }.map_err(map_err)?;

        debug!(path = %path.display(), bytes = mmap.len(), "mapped index");
        Ok(Self::load(IndexBytes::Mapped(mmap), header)?)
    }

    /// Load an index from an in-memory buffer.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, FormatError> {
        let header = IndexHeader::parse(&bytes)?;
        Self::load(IndexBytes::Owned(bytes), header)
    }

    /// Build the lookup structures. `header` is already validated against
    /// the length of `bytes`.
    fn load(bytes: IndexBytes, header: IndexHeader) -> Result<Self, FormatError> {
        let entries = decode_vocabulary(&bytes, &header)?;
        let vocabulary = Vocabulary::from_entries(&entries, header.term_count)?;
        let videos = decode_videos(&bytes, &header)?;
        let term_table = TermTable::new(&bytes, &header)?.byte_range(&header);

        debug!(
            videos = videos.len(),
            words = vocabulary.len(),
            terms = header.term_count,
            "loaded index tables"
        );

        Ok(Self {
            bytes,
            header,
            vocabulary,
            videos,
            term_table,
        })
    }

    pub fn header(&self) -> &IndexHeader {
        &self.header
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn videos(&self) -> &[Video] {
        &self.videos
    }

    pub fn video(&self, video_id: u32) -> Option<&Video> {
        self.videos.get(video_id as usize)
    }

    /// The raw file contents.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len_bytes(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_mapped(&self) -> bool {
        matches!(self.bytes, IndexBytes::Mapped(_))
    }

    pub fn term_count(&self) -> u32 {
        self.header.term_count
    }

    pub fn term_table(&self) -> TermTable<'_> {
        TermTable::from_records(&self.bytes[self.term_table.clone()])
    }

    pub fn term_offset(&self, term_id: TermId) -> Option<TermOffset> {
        self.term_table().get(term_id)
    }

    pub fn lookup(&self, word: impl AsRef<[u8]>) -> Option<TermId> {
        self.vocabulary.lookup(word)
    }

    /// Fresh iterator over a term's postings, already on the first one.
    pub fn term_iterator(&self, term_id: TermId) -> Result<TermIterator<'_>, FormatError> {
        let TermOffset { offset, count } =
            self.term_offset(term_id).ok_or(FormatError::UnknownTerm {
                term_id,
                term_count: self.header.term_count,
            })?;
        if count > 0 && offset as usize >= self.bytes.len() {
            return Err(FormatError::PostingOutOfBounds {
                term_id,
                offset,
                file_size: self.bytes.len(),
            });
        }
        TermIterator::new(term_id, PostingCursor::new(&self.bytes, offset as usize, count))
    }

    /// Decode every posting stream up front.
    ///
    /// Loading only checks the header and tables; a corrupt posting stream
    /// otherwise shows up mid-query. Returns the total posting count.
    pub fn verify(&self) -> Result<u64, FormatError> {
        self.verify_with(|_| {})
    }

    /// [`verify`](Self::verify) with a callback per finished term.
    pub fn verify_with<F>(&self, on_term: F) -> Result<u64, FormatError>
    where
        F: Fn(TermId) + Sync,
    {
        let walk = |term_id: TermId| -> Result<u64, FormatError> {
            let mut it = self.term_iterator(term_id)?;
            let mut seen = u64::from(it.current().is_some());
            while it.advance()? {
                seen += 1;
            }
            Ok(seen)
        };
        let check = |term_id: TermId| {
            let seen = walk(term_id)
                .inspect_err(|e| warn!(term_id, error = %e, "corrupt posting stream"));
            on_term(term_id);
            seen
        };

        #[cfg(feature = "rayon")]
        {
            use rayon::prelude::*;
            (0..self.header.term_count).into_par_iter().map(check).sum()
        }

        #[cfg(not(feature = "rayon"))]
        {
            (0..self.header.term_count).map(check).sum()
        }
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            file_size: self.bytes.len(),
            videos: self.videos.len(),
            vocabulary: self.vocabulary.len(),
            terms: self.header.term_count as usize,
            postings: self.term_table().iter().map(|(_, t)| u64::from(t.count)).sum(),
        }
    }
}
