//! Command-line interface for tcreview.
//!
//! Provides commands for reviewing a document, previewing its
//! segmentation, checking its verdict, and inspecting or clearing the
//! review ledger.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config::{self, ResolvedConfig};
use crate::core::{Ledger, ReviewReport, ReviewSession, Segmenter, StorageError, Verdict};
use crate::domain::ReviewStatus;

pub mod prompt;

use prompt::{confirm, rule, TerminalDecider};

/// tcreview - Content-addressed review of terms & conditions
#[derive(Parser, Debug)]
#[command(name = "tcreview")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Ledger file (overrides config and TCREVIEW_LEDGER)
    #[arg(long, global = true)]
    pub ledger: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Review a terms & conditions text file
    Review {
        /// Document to review
        file: PathBuf,

        /// Print the report as JSON instead of the summary block
        #[arg(long)]
        json: bool,
    },

    /// Show how a document would be split, without reviewing it
    Segment {
        /// Document to segment
        file: PathBuf,
    },

    /// Show a document's verdict from existing reviews
    Verdict {
        /// Document to check
        file: PathBuf,
    },

    /// Show the review ledger
    Ledger {
        /// List every recorded section
        #[arg(short, long)]
        all: bool,
    },

    /// Remove all recorded reviews
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let cfg = config::config()?;
        let ledger_path = self.ledger.unwrap_or_else(|| cfg.ledger.clone());

        match self.command {
            Commands::Review { file, json } => review(cfg, &ledger_path, &file, json),
            Commands::Segment { file } => show_segments(cfg, &file),
            Commands::Verdict { file } => show_verdict(cfg, &ledger_path, &file),
            Commands::Ledger { all } => show_ledger(&ledger_path, all),
            Commands::Clear { yes } => clear_ledger(&ledger_path, yes),
            Commands::Config => show_config(cfg, &ledger_path),
        }
    }
}

fn read_document(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read document: {}", path.display()))
}

fn open_session(cfg: &ResolvedConfig, ledger_path: &Path) -> Result<ReviewSession> {
    let ledger = Ledger::load(ledger_path)?.with_preview_chars(cfg.review.preview_chars);
    Ok(ReviewSession::new(
        ledger,
        Segmenter::new(cfg.segmentation.clone()),
    ))
}

/// Interactively review a document
fn review(cfg: &ResolvedConfig, ledger_path: &Path, file: &Path, json: bool) -> Result<()> {
    let text = read_document(file)?;
    let mut session = open_session(cfg, ledger_path)?;

    println!("\nProcessing: {}", file.display());

    let stdin = io::stdin();
    let mut decider = TerminalDecider::new(stdin.lock(), io::stdout(), cfg.review.wrap_width);
    let report = session.review(&text, &mut decider)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &ReviewReport) {
    let summary = &report.summary;

    println!("\n{}", rule());
    println!("SUMMARY");
    println!("{}", rule());
    println!("Total sections: {} (split by {})", summary.total, report.strategy);
    println!("Already reviewed: {}", summary.already_reviewed);
    println!("New sections: {}", summary.new);
    println!("Approved: {}", summary.approved);
    println!("Disapproved: {}", summary.disapproved);
    println!("Skipped: {}", summary.skipped);
    println!("{}", rule());

    print_verdict(report.verdict);
}

fn print_verdict(verdict: Verdict) {
    println!("\n{}", rule());
    println!("FINAL VERDICT");
    println!("{}", rule());
    println!("{}", verdict.headline());
    if let Some(detail) = verdict.detail() {
        println!("{}", detail);
    }
    println!("{}", rule());
}

/// Print the sections a document splits into
fn show_segments(cfg: &ResolvedConfig, file: &Path) -> Result<()> {
    let text = read_document(file)?;
    let segmentation = Segmenter::new(cfg.segmentation.clone()).segment(&text);

    println!(
        "Found {} sections (strategy: {})",
        segmentation.sections.len(),
        segmentation.strategy
    );
    println!("{}", "-".repeat(80));

    for (i, section) in segmentation.sections.iter().enumerate() {
        let preview = section.preview(60).replace('\n', " ");
        println!(
            "{:>4}  {}  {:>6} chars  {}",
            i + 1,
            section.fingerprint().short(),
            section.char_len(),
            preview
        );
    }

    Ok(())
}

/// Print a document's verdict without prompting
fn show_verdict(cfg: &ResolvedConfig, ledger_path: &Path, file: &Path) -> Result<()> {
    let text = read_document(file)?;
    let session = open_session(cfg, ledger_path)?;
    let (_, sections, verdict) = session.assess(&text);

    let reviewed = sections
        .iter()
        .filter(|s| session.ledger().contains(&s.fingerprint()))
        .count();
    println!("Reviewed sections: {}/{}", reviewed, sections.len());

    print_verdict(verdict);
    Ok(())
}

/// Print ledger totals, optionally every record
fn show_ledger(ledger_path: &Path, all: bool) -> Result<()> {
    let ledger = Ledger::load(ledger_path)?;

    if ledger.is_empty() {
        println!("No sections reviewed yet.");
        return Ok(());
    }

    let stats = ledger.stats();
    println!("\nTotal reviewed sections: {}", stats.total);
    println!("Approved: {}", stats.approved);
    println!("Disapproved: {}", stats.disapproved);

    if all {
        for (_, record) in ledger.iter() {
            let label = match record.status {
                ReviewStatus::Approved => "APPROVED",
                ReviewStatus::Disapproved => "DISAPPROVED",
            };
            println!("\n{}: {}", label, record.preview);
        }
    } else {
        println!("\nUse --all to list every section");
    }

    Ok(())
}

/// Clear the ledger after confirmation
fn clear_ledger(ledger_path: &Path, yes: bool) -> Result<()> {
    // A corrupt ledger can still be reset
    let mut ledger = match Ledger::load(ledger_path) {
        Ok(ledger) => ledger,
        Err(StorageError::Malformed { source, .. }) => {
            eprintln!("Ledger is not well-formed ({}); clearing will replace it.", source);
            Ledger::empty(ledger_path)
        }
        Err(e) => return Err(e.into()),
    };

    let confirmed = yes || {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();
        confirm(
            &mut input,
            &mut output,
            "Are you sure you want to clear all reviews?",
        )?
    };

    if !confirmed {
        println!("Cancelled.");
        return Ok(());
    }

    ledger.clear()?;
    println!("Database cleared.");
    Ok(())
}

/// Show the resolved configuration (for debugging)
fn show_config(cfg: &ResolvedConfig, ledger_path: &Path) -> Result<()> {
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Paths:");
    println!("  Home:   {}", cfg.home.display());
    println!("  Ledger: {}", ledger_path.display());
    println!();
    println!("Segmentation:");
    println!("  Min sections:        {}", cfg.segmentation.min_sections);
    println!("  Paragraph min chars: {}", cfg.segmentation.paragraph_min_chars);
    println!("  Line min chars:      {}", cfg.segmentation.line_min_chars);
    println!(
        "  Chunk size:          {}..={} chars",
        cfg.segmentation.chunk_min_chars, cfg.segmentation.chunk_max_chars
    );
    println!();
    println!("Review:");
    println!("  Preview chars: {}", cfg.review.preview_chars);
    println!("  Wrap width:    {}", cfg.review.wrap_width);

    Ok(())
}
