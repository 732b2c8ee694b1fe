// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the tsodex command-line interface.
//!
//! With no subcommand the binary behaves like the original search shell:
//! load the index, then read queries line by line until end of input.
//! `search` runs one query, `inspect` prints the file structure and can walk
//! every posting stream up front.

pub mod display;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tsodex",
    about = "Query a TSOD0001 transcript search index",
    version
)]
pub struct Cli {
    /// Path to the index file
    #[arg(
        short,
        long,
        global = true,
        env = "TSODEX_INDEX",
        default_value = "tsoding.dat"
    )]
    pub index: PathBuf,

    /// Print results as JSON lines instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read queries from stdin until end of input (the default)
    Repl,

    /// Run a single query
    Search {
        /// Search query
        query: String,

        /// Also print the first N postings of every resolved term
        #[arg(short, long, default_value = "0")]
        postings: usize,
    },

    /// Print header fields and table sizes
    Inspect {
        /// Decode every posting stream and report corruption
        #[arg(long)]
        verify: bool,
    },
}
