//! Core review logic.
//!
//! This module contains:
//! - Segmenter: Cascading document segmentation
//! - Ledger: Content-addressed decision store
//! - Verdict: Document-level outcome
//! - ReviewSession: Main review loop

pub mod ledger;
pub mod segmenter;
pub mod session;
pub mod verdict;

// Re-export commonly used types
pub use ledger::{Ledger, LedgerStats, StorageError, DEFAULT_PREVIEW_CHARS};
pub use segmenter::{Attempt, Segmentation, Segmenter, SegmenterConfig, Strategy};
pub use session::{Decider, ReviewReport, ReviewSession, ReviewSummary, SectionPrompt};
pub use verdict::{verdict, Verdict};
