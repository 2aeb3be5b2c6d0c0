//! Review session: drives a document through segmentation, the ledger and
//! a human decider, then derives the verdict.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::domain::{Decision, ReviewStatus, Section};

use super::ledger::Ledger;
use super::segmenter::{Segmenter, Strategy};
use super::verdict::{verdict, Verdict};

/// What a decider is shown for one section
#[derive(Debug, Clone, Copy)]
pub struct SectionPrompt<'a> {
    /// 1-based position in the document
    pub index: usize,
    pub total: usize,
    pub section: &'a Section,
}

/// Source of human decisions
///
/// `decide` returns the raw response; the session parses it and asks again
/// when it is not a valid decision.
pub trait Decider {
    fn decide(&mut self, prompt: &SectionPrompt<'_>) -> Result<String>;

    /// Called with a response that did not parse, before asking again
    fn rejected(&mut self, _response: &str) {}

    /// Called for sections answered from the ledger
    fn already_reviewed(&mut self, _prompt: &SectionPrompt<'_>, _status: ReviewStatus) {}
}

impl<F> Decider for F
where
    F: FnMut(&SectionPrompt<'_>) -> Result<String>,
{
    fn decide(&mut self, prompt: &SectionPrompt<'_>) -> Result<String> {
        self(prompt)
    }
}

/// Counts for one run over a document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReviewSummary {
    pub total: usize,
    pub already_reviewed: usize,
    pub new: usize,
    pub approved: usize,
    pub disapproved: usize,
    pub skipped: usize,
}

/// Outcome of reviewing a document
#[derive(Debug, Clone, Serialize)]
pub struct ReviewReport {
    pub strategy: Strategy,
    pub summary: ReviewSummary,
    pub verdict: Verdict,
}

/// Owns the ledger for the lifetime of a review
#[derive(Debug)]
pub struct ReviewSession {
    ledger: Ledger,
    segmenter: Segmenter,
}

impl ReviewSession {
    pub fn new(ledger: Ledger, segmenter: Segmenter) -> Self {
        Self { ledger, segmenter }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Give the ledger back to the caller
    pub fn into_ledger(self) -> Ledger {
        self.ledger
    }

    /// Review every section of `text`, asking `decider` about unseen ones
    ///
    /// Each decision is persisted as soon as it is made. A failed write or a
    /// decider error ends the review; earlier decisions stay recorded.
    #[instrument(skip_all, fields(chars = text.len()))]
    pub fn review<D: Decider + ?Sized>(&mut self, text: &str, decider: &mut D) -> Result<ReviewReport> {
        let segmentation = self.segmenter.segment(text);
        let sections = &segmentation.sections;
        let total = sections.len();
        info!(sections = total, strategy = %segmentation.strategy, "Starting review");

        let mut summary = ReviewSummary {
            total,
            ..Default::default()
        };

        for (i, section) in sections.iter().enumerate() {
            let prompt = SectionPrompt {
                index: i + 1,
                total,
                section,
            };
            let fingerprint = section.fingerprint();

            if let Some(status) = self.ledger.status(&fingerprint) {
                debug!(index = prompt.index, fingerprint = %fingerprint.short(), %status, "Already reviewed");
                summary.already_reviewed += 1;
                decider.already_reviewed(&prompt, status);
                continue;
            }

            summary.new += 1;

            let decision = if section.is_empty() {
                warn!(index = prompt.index, "Empty section, skipping");
                Decision::Skipped
            } else {
                ask(decider, &prompt)?
            };

            if let Some(status) = decision.status() {
                self.ledger
                    .record(fingerprint, status, section.as_str())
                    .with_context(|| format!("Failed to record decision for section {}", prompt.index))?;
            }

            match decision {
                Decision::Approved => summary.approved += 1,
                Decision::Disapproved => summary.disapproved += 1,
                Decision::Skipped => summary.skipped += 1,
            }
        }

        let verdict = verdict(sections, &self.ledger, summary.skipped);
        info!(
            new = summary.new,
            already_reviewed = summary.already_reviewed,
            skipped = summary.skipped,
            %verdict,
            "Review finished"
        );

        Ok(ReviewReport {
            strategy: segmentation.strategy,
            summary,
            verdict,
        })
    }

    /// Verdict for `text` from the ledger alone, without asking anyone
    pub fn assess(&self, text: &str) -> (Strategy, Vec<Section>, Verdict) {
        let segmentation = self.segmenter.segment(text);
        let verdict = verdict(&segmentation.sections, &self.ledger, 0);
        (segmentation.strategy, segmentation.sections, verdict)
    }
}

/// Ask until the decider gives a valid response
fn ask<D: Decider + ?Sized>(decider: &mut D, prompt: &SectionPrompt<'_>) -> Result<Decision> {
    loop {
        let response = decider
            .decide(prompt)
            .with_context(|| format!("No decision for section {}", prompt.index))?;

        match response.parse::<Decision>() {
            Ok(decision) => return Ok(decision),
            Err(e) => {
                warn!(index = prompt.index, "{}", e);
                decider.rejected(&response);
            }
        }
    }
}
