//! Review Flow Integration Tests
//!
//! Drives whole documents through a ReviewSession with scripted deciders and
//! checks summaries, verdicts and what lands in the ledger file.

use std::collections::VecDeque;
use std::path::PathBuf;

use anyhow::Result;
use tcreview::core::{ReviewSummary, SectionPrompt, Strategy};
use tcreview::{Decider, Ledger, ReviewSession, ReviewStatus, Segmenter, Verdict};
use tempfile::TempDir;

const HEADINGS: [&str; 6] = [
    "ACCEPTANCE OF TERMS",
    "PAYMENT AND BILLING",
    "USER CONDUCT RULES",
    "TERMINATION POLICY",
    "LIMITATION OF CLAIMS",
    "GOVERNING LAW TEXT",
];

/// Six headed blocks, each with a 150 character body
fn headed_document() -> String {
    HEADINGS
        .iter()
        .map(|heading| {
            let body = format!("The {} clause applies to every user of the service. ", heading.to_lowercase());
            let body: String = body.chars().cycle().take(150).collect();
            format!("{}\n\n{}", heading, body)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Answers from a fixed script and counts how often it was asked
struct Scripted {
    responses: VecDeque<String>,
    asked: usize,
    already: Vec<(usize, ReviewStatus)>,
}

impl Scripted {
    fn new(responses: &[&str]) -> Self {
        Self {
            responses: responses.iter().map(|r| r.to_string()).collect(),
            asked: 0,
            already: Vec::new(),
        }
    }

    fn repeat(response: &str, times: usize) -> Self {
        Self::new(&vec![response; times])
    }
}

impl Decider for Scripted {
    fn decide(&mut self, _prompt: &SectionPrompt<'_>) -> Result<String> {
        self.asked += 1;
        self.responses
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("script exhausted"))
    }

    fn already_reviewed(&mut self, prompt: &SectionPrompt<'_>, status: ReviewStatus) {
        self.already.push((prompt.index, status));
    }
}

fn ledger_path(temp: &TempDir) -> PathBuf {
    temp.path().join("tc_reviews.json")
}

fn open(temp: &TempDir) -> ReviewSession {
    let ledger = Ledger::load(ledger_path(temp)).unwrap();
    ReviewSession::new(ledger, Segmenter::default())
}

#[test]
fn test_first_review_then_rerun() {
    let temp = TempDir::new().unwrap();
    let document = headed_document();

    let mut session = open(&temp);
    let mut decider = Scripted::repeat("a", 6);
    let report = session.review(&document, &mut decider).unwrap();

    assert_eq!(report.strategy, Strategy::Headings);
    assert_eq!(
        report.summary,
        ReviewSummary {
            total: 6,
            new: 6,
            approved: 6,
            ..Default::default()
        }
    );
    assert_eq!(report.verdict, Verdict::AllApproved);
    assert_eq!(decider.asked, 6);

    let written = std::fs::read_to_string(ledger_path(&temp)).unwrap();

    // Second run in a fresh session reads everything from the file
    let mut session = open(&temp);
    let mut decider = Scripted::new(&[]);
    let report = session.review(&document, &mut decider).unwrap();

    assert_eq!(
        report.summary,
        ReviewSummary {
            total: 6,
            already_reviewed: 6,
            ..Default::default()
        }
    );
    assert_eq!(report.verdict, Verdict::AllApproved);
    assert_eq!(decider.asked, 0);
    assert_eq!(decider.already.len(), 6);
    assert!(decider
        .already
        .iter()
        .all(|(_, status)| *status == ReviewStatus::Approved));

    assert_eq!(std::fs::read_to_string(ledger_path(&temp)).unwrap(), written);
}

#[test]
fn test_one_disapproval_marks_document() {
    let temp = TempDir::new().unwrap();
    let mut session = open(&temp);
    let mut decider = Scripted::new(&["a", "a", "d", "a", "a", "a"]);

    let report = session.review(&headed_document(), &mut decider).unwrap();
    assert_eq!(report.summary.approved, 5);
    assert_eq!(report.summary.disapproved, 1);
    assert_eq!(report.verdict, Verdict::ContainsDisapproved);
}

#[test]
fn test_skipped_sections_are_asked_next_time() {
    let temp = TempDir::new().unwrap();
    let document = headed_document();

    let mut session = open(&temp);
    let report = session
        .review(&document, &mut Scripted::new(&["a", "s", "a", "a", "s", "a"]))
        .unwrap();
    assert_eq!(report.summary.skipped, 2);
    assert_eq!(report.verdict, Verdict::Incomplete);
    assert_eq!(session.ledger().len(), 4);

    let mut session = open(&temp);
    let mut decider = Scripted::new(&["a", "a"]);
    let report = session.review(&document, &mut decider).unwrap();
    assert_eq!(decider.asked, 2);
    assert_eq!(report.summary.already_reviewed, 4);
    assert_eq!(report.summary.new, 2);
    assert_eq!(report.verdict, Verdict::AllApproved);
}

#[test]
fn test_decisions_carry_across_documents() {
    let temp = TempDir::new().unwrap();
    let document = headed_document();

    let mut session = open(&temp);
    session
        .review(&document, &mut Scripted::repeat("a", 6))
        .unwrap();

    // Same sections in different casing, plus one new clause
    let revised = format!(
        "{}\n\nARBITRATION NOTICE\n\nThe parties waive any right to a jury trial.",
        document.to_uppercase()
    );
    let mut decider = Scripted::new(&["d"]);
    let report = session.review(&revised, &mut decider).unwrap();

    assert_eq!(report.summary.total, 7);
    assert_eq!(report.summary.already_reviewed, 6);
    assert_eq!(decider.asked, 1);
    assert_eq!(report.verdict, Verdict::ContainsDisapproved);
}

#[test]
fn test_verdict_without_prompting() {
    let temp = TempDir::new().unwrap();
    let document = headed_document();

    let session = open(&temp);
    let (strategy, sections, verdict) = session.assess(&document);
    assert_eq!(strategy, Strategy::Headings);
    assert_eq!(sections.len(), 6);
    assert_eq!(verdict, Verdict::Incomplete);
    assert!(!ledger_path(&temp).exists());
}
