// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use tsodex::{Index, Posting, QueryExecutor, QueryOutcome, TermId};

mod cli;
use cli::display::{self, format_size, pad_left, row, section_bot, section_mid, section_top};
use cli::{Cli, Commands};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let index = Index::open(&cli.index).context("failed to load index")?;
    info!(
        path = %cli.index.display(),
        videos = index.videos().len(),
        terms = index.term_count(),
        "index loaded"
    );

    match cli.command {
        None | Some(Commands::Repl) => repl(&index, cli.json),
        Some(Commands::Search { query, postings }) => search(&index, &query, postings, cli.json),
        Some(Commands::Inspect { verify }) => inspect(&index, verify, cli.json),
    }
}

// ============================================================================
// REPL
// ============================================================================

fn outcome_line(outcome: &QueryOutcome) -> String {
    format!(
        "Word count: {}, token count: {}, tokens: {:?}",
        outcome.word_count,
        outcome.term_ids.len(),
        outcome.term_ids
    )
}

/// Read queries until end of input. A corrupt posting stream fails the
/// query, not the session.
fn repl(index: &Index, json: bool) -> Result<()> {
    let executor = QueryExecutor::new(index);
    let mut input = io::stdin().lock();
    let mut stdout = io::stdout().lock();
    let mut line = Vec::new();

    loop {
        if !json {
            write!(stdout, "> ")?;
            stdout.flush()?;
        }

        line.clear();
        if input.read_until(b'\n', &mut line)? == 0 {
            if !json {
                writeln!(stdout)?;
            }
            return Ok(());
        }
        let query = String::from_utf8_lossy(&line);
        let query = query.trim_end_matches(['\n', '\r']);
        debug!(query, "query");

        match executor.execute(query) {
            Ok(outcome) if json => writeln!(stdout, "{}", serde_json::to_string(&outcome)?)?,
            Ok(outcome) => writeln!(stdout, "{}", outcome_line(&outcome))?,
            Err(e) => eprintln!("error: {}", e),
        }
    }
}

// ============================================================================
// SEARCH
// ============================================================================

#[derive(Serialize)]
struct TermReport {
    term_id: TermId,
    word: String,
    total: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    postings: Vec<Posting>,
}

#[derive(Serialize)]
struct SearchReport {
    #[serde(flatten)]
    outcome: QueryOutcome,
    terms: Vec<TermReport>,
}

fn search(index: &Index, query: &str, limit: usize, json: bool) -> Result<()> {
    let executor = QueryExecutor::new(index);
    let outcome = executor.execute(query)?;

    let mut terms = Vec::with_capacity(outcome.term_ids.len());
    for &term_id in &outcome.term_ids {
        let word = index
            .vocabulary()
            .word(term_id)
            .map(String::from_utf8_lossy)
            .unwrap_or_default()
            .into_owned();
        let total = index.term_offset(term_id).map_or(0, |t| t.count);
        let postings = index
            .term_iterator(term_id)?
            .first_postings(limit)
            .with_context(|| format!("corrupt posting stream for {:?}", word))?;
        terms.push(TermReport {
            term_id,
            word,
            total,
            postings,
        });
    }

    if json {
        let report = SearchReport { outcome, terms };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", outcome_line(&outcome));
    for word in tsodex::words(query) {
        if index.vocabulary().lookup_exact(&word).is_none() {
            println!(
                "  {} {}",
                display::themed(display::RED, &[], "miss"),
                String::from_utf8_lossy(&word)
            );
        }
    }
    for term in &terms {
        println!(
            "  {} {} {}",
            display::themed(display::CYAN, &[display::BOLD], &term.word),
            display::themed(display::GRAY, &[], &format!("#{}", term.term_id)),
            pad_left(&format!("{} postings", term.total), 14)
        );
        for posting in &term.postings {
            println!(
                "    {}",
                display::posting_line(posting, index.video(posting.video_id))
            );
        }
    }
    Ok(())
}

// ============================================================================
// INSPECT
// ============================================================================

fn inspect(index: &Index, verify: bool, json: bool) -> Result<()> {
    let verified = if verify { Some(verify_postings(index)?) } else { None };

    if json {
        #[derive(Serialize)]
        struct InspectReport<'a> {
            header: &'a tsodex::binary::IndexHeader,
            stats: tsodex::IndexStats,
            videos: &'a [tsodex::Video],
            #[serde(skip_serializing_if = "Option::is_none")]
            verified_postings: Option<u64>,
        }
        let report = InspectReport {
            header: index.header(),
            stats: index.stats(),
            videos: index.videos(),
            verified_postings: verified,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let header = index.header();
    let stats = index.stats();
    let field = |name: &str, value: String| row(&format!("  {:<20}{}", name, value));

    section_top("HEADER");
    field("magic", String::from_utf8_lossy(&tsodex::binary::MAGIC).into_owned());
    field("created", display::format_timestamp(header.created_at()));
    field("header size", format!("{} B", header.header_size));
    field("file size", format_size(stats.file_size));

    section_mid("TABLES");
    let table = |name: &str, count: u32, offset: u32| {
        field(name, format!("{:>10} entries at offset {:#x}", count, offset))
    };
    table("videos", header.video_count, header.video_table_offset);
    table("vocabulary", header.vocab_count, header.vocab_table_offset);
    table("term offsets", header.term_count, header.term_table_offset);
    field("postings", format!("{:>10}", stats.postings));

    if let Some(decoded) = verified {
        section_mid("VERIFY");
        field(
            "posting streams",
            display::themed(display::GREEN, &[], &format!("ok, {} decoded", decoded)),
        );
    }

    section_mid("VIDEOS");
    for (id, video) in index.videos().iter().enumerate().take(10) {
        row(&format!("  {:>5}  {}", id, video.name));
    }
    if index.videos().len() > 10 {
        row(&display::themed(
            display::GRAY,
            &[],
            &format!("  ... {} more", index.videos().len() - 10),
        ));
    }
    section_bot();
    Ok(())
}

#[cfg(feature = "indicatif")]
fn verify_postings(index: &Index) -> Result<u64> {
    use indicatif::{ProgressBar, ProgressStyle};

    let bar = ProgressBar::new(u64::from(index.term_count()));
    bar.set_style(
        ProgressStyle::with_template("{spinner} verifying postings [{bar:40}] {pos}/{len} terms")
            .context("invalid progress template")?
            .progress_chars("=> "),
    );
    let result = index.verify_with(|_| bar.inc(1));
    bar.finish_and_clear();
    Ok(result?)
}

#[cfg(not(feature = "indicatif"))]
fn verify_postings(index: &Index) -> Result<u64> {
    Ok(index.verify()?)
}
