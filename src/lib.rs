// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Reader and query layer for `TSOD0001` transcript search indexes.
//!
//! An index file holds every word spoken across a set of video transcripts:
//! a vocabulary, a term offset table, a video table and one delta-encoded
//! posting stream per term. This crate maps the file read-only, validates
//! its header, and answers queries by resolving words to lazy posting
//! iterators. Writing indexes is out of scope.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐     ┌─────────────┐
//! │   binary/    │────▶│   index.rs   │────▶│ tokenizer.rs │────▶│  query.rs   │
//! │ (header,     │     │ (Index::open,│     │ (words,      │     │ (Executor,  │
//! │  tables,     │     │  Vocabulary, │     │  tokenize)   │     │  MergeStage)│
//! │  postings)   │     │  term_iter)  │     │              │     │             │
//! └──────────────┘     └──────────────┘     └──────────────┘     └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use tsodex::{Index, QueryExecutor};
//!
//! let index = Index::open("tsoding.dat")?;
//! let outcome = QueryExecutor::new(&index).execute("borrow checker")?;
//! println!("{} words, terms {:?}", outcome.word_count, outcome.term_ids);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod binary;
mod index;
mod query;
mod tokenizer;
mod utils;
mod vocabulary;

#[doc(hidden)]
pub mod testing;

pub use binary::{FormatError, Posting, TermId, TermIterator, Video};
pub use index::{Index, IndexBytes, IndexError, IndexStats};
pub use query::{MergeStage, QueryExecutor, QueryOutcome, QueryPlan, SearchResult, Unmerged};
pub use tokenizer::{tokenize, words, TokenizedQuery};
pub use utils::{normalize_token, MAX_TOKEN_LEN};
pub use vocabulary::Vocabulary;
