//! Document-level verdict derived from ledger state.

use serde::Serialize;

use crate::domain::{ReviewStatus, Section};

use super::ledger::Ledger;

/// Aggregate review outcome of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// Some section has no decision, or sections were skipped this run
    Incomplete,
    ContainsDisapproved,
    AllApproved,
    NoSectionsReviewed,
}

impl Verdict {
    pub fn headline(&self) -> &'static str {
        match self {
            Verdict::Incomplete => "INCOMPLETE REVIEW",
            Verdict::ContainsDisapproved => "THIS T&C CONTAINS DISAPPROVED SECTIONS",
            Verdict::AllApproved => "THIS T&C HAS ALL APPROVED SECTIONS",
            Verdict::NoSectionsReviewed => "NO SECTIONS REVIEWED",
        }
    }

    pub fn detail(&self) -> Option<&'static str> {
        match self {
            Verdict::Incomplete => Some("Some sections have not been reviewed yet."),
            Verdict::ContainsDisapproved => {
                Some("This document has one or more sections that were disapproved.")
            }
            Verdict::AllApproved => Some("All sections in this document have been approved."),
            Verdict::NoSectionsReviewed => None,
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.headline())
    }
}

/// Compute the verdict for `sections` against the current ledger
///
/// Precedence: incomplete, then disapproved, then approved.
pub fn verdict(sections: &[Section], ledger: &Ledger, skipped_this_run: usize) -> Verdict {
    let mut all_reviewed = skipped_this_run == 0;
    let mut has_disapproved = false;
    let mut has_approved = false;

    for section in sections {
        match ledger.status(&section.fingerprint()) {
            Some(ReviewStatus::Disapproved) => has_disapproved = true,
            Some(ReviewStatus::Approved) => has_approved = true,
            None => all_reviewed = false,
        }
    }

    if !all_reviewed {
        Verdict::Incomplete
    } else if has_disapproved {
        Verdict::ContainsDisapproved
    } else if has_approved {
        Verdict::AllApproved
    } else {
        Verdict::NoSectionsReviewed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ledger_with(temp: &TempDir, entries: &[(&str, ReviewStatus)]) -> Ledger {
        let mut ledger = Ledger::empty(temp.path().join("tc_reviews.json"));
        for (text, status) in entries {
            let section = Section::new(text);
            ledger
                .record(section.fingerprint(), *status, section.as_str())
                .unwrap();
        }
        ledger
    }

    fn sections(texts: &[&str]) -> Vec<Section> {
        texts.iter().map(|t| Section::new(t)).collect()
    }

    #[test]
    fn test_contains_disapproved() {
        let temp = TempDir::new().unwrap();
        let ledger = ledger_with(
            &temp,
            &[("a", ReviewStatus::Approved), ("b", ReviewStatus::Disapproved)],
        );
        assert_eq!(
            verdict(&sections(&["a", "b"]), &ledger, 0),
            Verdict::ContainsDisapproved
        );
    }

    #[test]
    fn test_all_approved() {
        let temp = TempDir::new().unwrap();
        let ledger = ledger_with(
            &temp,
            &[("a", ReviewStatus::Approved), ("b", ReviewStatus::Approved)],
        );
        assert_eq!(verdict(&sections(&["a", "b"]), &ledger, 0), Verdict::AllApproved);
    }

    #[test]
    fn test_missing_section_is_incomplete() {
        let temp = TempDir::new().unwrap();
        let ledger = ledger_with(&temp, &[("a", ReviewStatus::Approved)]);
        assert_eq!(verdict(&sections(&["a", "b"]), &ledger, 0), Verdict::Incomplete);
    }

    #[test]
    fn test_incomplete_beats_disapproved() {
        let temp = TempDir::new().unwrap();
        let ledger = ledger_with(&temp, &[("a", ReviewStatus::Disapproved)]);
        assert_eq!(verdict(&sections(&["a", "b"]), &ledger, 0), Verdict::Incomplete);
    }

    #[test]
    fn test_skips_this_run_are_incomplete() {
        let temp = TempDir::new().unwrap();
        let ledger = ledger_with(
            &temp,
            &[("a", ReviewStatus::Approved), ("b", ReviewStatus::Approved)],
        );
        assert_eq!(verdict(&sections(&["a", "b"]), &ledger, 1), Verdict::Incomplete);
    }

    #[test]
    fn test_case_and_padding_share_decisions() {
        let temp = TempDir::new().unwrap();
        let ledger = ledger_with(&temp, &[("Payment Terms", ReviewStatus::Approved)]);
        assert_eq!(
            verdict(&sections(&["  PAYMENT TERMS "]), &ledger, 0),
            Verdict::AllApproved
        );
    }

    #[test]
    fn test_no_sections() {
        let temp = TempDir::new().unwrap();
        let ledger = ledger_with(&temp, &[]);
        assert_eq!(verdict(&[], &ledger, 0), Verdict::NoSectionsReviewed);
        assert_eq!(Verdict::NoSectionsReviewed.detail(), None);
    }
}
