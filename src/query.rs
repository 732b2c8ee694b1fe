// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query execution.
//!
//! Two stages. Planning tokenizes the query and opens one iterator per
//! resolved word. Merging consumes those iterators and produces
//! [`SearchResult`]s. Merging is a trait so the combination rule
//! (intersection, union, phrase proximity) is a choice made by the caller;
//! the default [`Unmerged`] stage produces nothing and the executor reports
//! only which terms resolved.

use serde::Serialize;

use crate::binary::{FormatError, TermId, TermIterator};
use crate::tokenizer::{tokenize, TokenizedQuery};
use crate::Index;

/// One ranked hit: a span of a video's transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub video_id: u32,
    pub ts_min: u32,
    pub ts_max: u32,
    pub byte_pos_min: u32,
    pub byte_pos_max: u32,
    pub rank: u32,
}

/// Combines per-term iterators into results.
pub trait MergeStage {
    fn merge<'a>(
        &self,
        index: &'a Index,
        terms: Vec<TermIterator<'a>>,
    ) -> Result<Vec<SearchResult>, FormatError>;
}

/// Drops the iterators without combining them.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unmerged;

impl MergeStage for Unmerged {
    fn merge<'a>(
        &self,
        _index: &'a Index,
        _terms: Vec<TermIterator<'a>>,
    ) -> Result<Vec<SearchResult>, FormatError> {
        Ok(Vec::new())
    }
}

/// Planned query, ready to merge.
pub type QueryPlan<'a> = TokenizedQuery<'a>;

/// What a query produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryOutcome {
    pub word_count: usize,
    /// Resolved term ids in query order
    pub term_ids: Vec<TermId>,
    pub results: Vec<SearchResult>,
}

pub struct QueryExecutor<'a, M = Unmerged> {
    index: &'a Index,
    merger: M,
}

impl<'a> QueryExecutor<'a, Unmerged> {
    pub fn new(index: &'a Index) -> Self {
        Self {
            index,
            merger: Unmerged,
        }
    }
}

impl<'a, M: MergeStage> QueryExecutor<'a, M> {
    pub fn with_merger(index: &'a Index, merger: M) -> Self {
        Self { index, merger }
    }

    pub fn index(&self) -> &'a Index {
        self.index
    }

    /// Tokenize and open iterators without merging.
    pub fn plan(&self, query: &str) -> Result<QueryPlan<'a>, FormatError> {
        tokenize(self.index, query)
    }

    pub fn execute(&self, query: &str) -> Result<QueryOutcome, FormatError> {
        let plan = self.plan(query)?;
        let term_ids = plan.term_ids();
        let word_count = plan.word_count;
        let results = self.merger.merge(self.index, plan.terms)?;

        Ok(QueryOutcome {
            word_count,
            term_ids,
            results,
        })
    }
}
