//! Domain types for the reviewer.
//!
//! This module contains the core data structures:
//! - Section: A trimmed, reviewable span of document text
//! - Fingerprint: Content address of a section
//! - Decision: Human verdict on a single section
//! - ReviewRecord: What the ledger remembers about a section

pub mod decision;
pub mod section;

// Re-export commonly used types
pub use decision::{Decision, InvalidDecision, ReviewRecord, ReviewStatus};
pub use section::{Fingerprint, Section};
