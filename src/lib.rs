//! tcreview - Content-addressed review of terms & conditions
//!
//! Splits a terms & conditions document into sections, remembers a human
//! approve/disapprove decision for each section by content hash, and derives
//! a verdict for the whole document.
//!
//! # Architecture
//!
//! Review decisions are content-addressed:
//! - A section is identified by the SHA256 of its trimmed, lowercased text
//! - A decision made once applies to every document containing that section
//! - Skipped sections are never recorded and are asked about again next time
//!
//! # Modules
//!
//! - `domain`: Data structures (Section, Fingerprint, Decision, ReviewRecord)
//! - `core`: Segmenter, Ledger, Verdict, ReviewSession
//! - `cli`: Command-line interface
//! - `config`: Path and threshold configuration
//!
//! # Usage
//!
//! ```bash
//! # Review a document interactively
//! tcreview review terms.txt
//!
//! # Check a new version against earlier decisions
//! tcreview verdict terms-v2.txt
//!
//! # Inspect the ledger
//! tcreview ledger --all
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;

// Re-export main types at crate root for convenience
pub use self::core::{Decider, Ledger, ReviewReport, ReviewSession, Segmenter, StorageError, Verdict};
pub use domain::{Decision, Fingerprint, ReviewRecord, ReviewStatus, Section};
