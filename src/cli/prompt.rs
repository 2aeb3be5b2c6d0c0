//! Terminal rendering of sections and line-oriented decision prompts.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use crate::core::{Decider, SectionPrompt};
use crate::domain::ReviewStatus;

/// Width of the `=` rules around a section
pub const RULE_WIDTH: usize = 80;

pub fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Greedy word wrap; words longer than `width` get a line of their own
pub fn wrap_text(text: &str, width: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let needed = if current.is_empty() { word_len } else { word_len + 1 };

        if current_len + needed <= width {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            current_len += needed;
        } else {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            current.push_str(word);
            current_len = word_len;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines.join("\n")
}

/// Asks a human on a line-oriented terminal
pub struct TerminalDecider<R, W> {
    input: R,
    output: W,
    wrap_width: usize,

    /// Set after an invalid response so the section is not shown again
    retrying: bool,
}

impl<R: BufRead, W: Write> TerminalDecider<R, W> {
    pub fn new(input: R, output: W, wrap_width: usize) -> Self {
        Self {
            input,
            output,
            wrap_width,
            retrying: false,
        }
    }

    fn show_section(&mut self, prompt: &SectionPrompt<'_>) -> Result<()> {
        writeln!(self.output, "\n[{}/{}] NEW SECTION", prompt.index, prompt.total)?;
        writeln!(self.output, "\n{}", rule())?;
        writeln!(self.output, "SECTION TO REVIEW:")?;
        writeln!(self.output, "{}", rule())?;
        writeln!(
            self.output,
            "{}",
            wrap_text(prompt.section.as_str(), self.wrap_width)
        )?;
        writeln!(self.output, "{}", rule())?;
        Ok(())
    }
}

impl<R: BufRead, W: Write> Decider for TerminalDecider<R, W> {
    fn decide(&mut self, prompt: &SectionPrompt<'_>) -> Result<String> {
        if !std::mem::take(&mut self.retrying) {
            self.show_section(prompt)?;
        }

        write!(self.output, "\nApprove (a), Disapprove (d), or Skip (s)? ")?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read decision")?;
        if read == 0 {
            anyhow::bail!("Input closed before a decision was made");
        }

        Ok(line.trim().to_string())
    }

    fn rejected(&mut self, _response: &str) {
        self.retrying = true;
        // Best effort: the prompt is shown again right after
        let _ = writeln!(self.output, "Invalid choice. Please enter 'a', 'd', or 's'.");
    }

    fn already_reviewed(&mut self, prompt: &SectionPrompt<'_>, status: ReviewStatus) {
        let _ = writeln!(
            self.output,
            "\n[{}/{}] Already reviewed: {}",
            prompt.index, prompt.total, status
        );
    }
}

/// Ask a yes/no style question; only the exact word `yes` confirms
pub fn confirm<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<bool> {
    write!(output, "{} (yes/no): ", question)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line).context("Failed to read confirmation")?;
    Ok(line.trim().eq_ignore_ascii_case("yes"))
}
