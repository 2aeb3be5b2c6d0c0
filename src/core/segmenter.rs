//! Document segmentation into reviewable sections.
//!
//! Segmentation runs a cascade of strategies, most structured first:
//! 1. Boundary patterns (headings, numbered clauses, `Article N`, `Section N`),
//!    each tried alone and accepted only with more than `min_sections` pieces
//! 2. Long paragraphs, accepted with at least `min_sections` pieces
//! 3. Long lines, accepted with at least `min_sections` pieces
//! 4. Sentence packing into size-bounded chunks, which always succeeds

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::Section;

/// Thresholds that drive the cascade
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmenterConfig {
    /// Minimum number of sections for a segmentation to be usable
    #[serde(default = "default_min_sections")]
    pub min_sections: usize,

    /// Paragraphs must be longer than this many characters
    #[serde(default = "default_paragraph_min_chars")]
    pub paragraph_min_chars: usize,

    /// Lines must be longer than this many characters
    #[serde(default = "default_line_min_chars")]
    pub line_min_chars: usize,

    /// A chunk is not closed before reaching this many characters
    #[serde(default = "default_chunk_min_chars")]
    pub chunk_min_chars: usize,

    /// A chunk is closed before growing past this many characters
    #[serde(default = "default_chunk_max_chars")]
    pub chunk_max_chars: usize,
}

fn default_min_sections() -> usize {
    5
}
fn default_paragraph_min_chars() -> usize {
    100
}
fn default_line_min_chars() -> usize {
    200
}
fn default_chunk_min_chars() -> usize {
    300
}
fn default_chunk_max_chars() -> usize {
    2000
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            min_sections: default_min_sections(),
            paragraph_min_chars: default_paragraph_min_chars(),
            line_min_chars: default_line_min_chars(),
            chunk_min_chars: default_chunk_min_chars(),
            chunk_max_chars: default_chunk_max_chars(),
        }
    }
}

/// A stage of the segmentation cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// A short all-caps heading line
    Headings,
    /// A line starting `<number>. `
    Numbered,
    /// A line starting `Article <number>`
    Articles,
    /// A line starting `Section <number>`
    Sections,
    /// Blank-line separated paragraphs
    Paragraphs,
    /// Single lines
    Lines,
    /// Sentences packed into size-bounded chunks
    Chunks,
}

impl Strategy {
    /// Cascade order
    pub const CASCADE: [Strategy; 7] = [
        Strategy::Headings,
        Strategy::Numbered,
        Strategy::Articles,
        Strategy::Sections,
        Strategy::Paragraphs,
        Strategy::Lines,
        Strategy::Chunks,
    ];

    fn boundary(self) -> Option<&'static Regex> {
        let patterns = boundary_patterns();
        match self {
            Strategy::Headings => Some(&patterns[0]),
            Strategy::Numbered => Some(&patterns[1]),
            Strategy::Articles => Some(&patterns[2]),
            Strategy::Sections => Some(&patterns[3]),
            _ => None,
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Strategy::Headings => "headings",
            Strategy::Numbered => "numbered",
            Strategy::Articles => "articles",
            Strategy::Sections => "sections",
            Strategy::Paragraphs => "paragraphs",
            Strategy::Lines => "lines",
            Strategy::Chunks => "chunks",
        };
        f.write_str(name)
    }
}

/// Patterns matched at the start of a line; a match starts a new piece
fn boundary_patterns() -> &'static [Regex; 4] {
    static PATTERNS: OnceLock<[Regex; 4]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"^[A-Z][A-Z \t&'\-]{5,79}\n",
            r"^\d+\.\s",
            r"^Article\s+\d+",
            r"^Section\s+\d+",
        ]
        .map(|pattern| Regex::new(pattern).expect("boundary pattern is a valid regex"))
    })
}

/// Output of a single strategy
#[derive(Debug, Clone)]
pub struct Attempt {
    pub sections: Vec<Section>,

    /// Whether the cascade may stop here
    pub accepted: bool,
}

/// Result of segmenting a document
#[derive(Debug, Clone)]
pub struct Segmentation {
    /// Strategy that produced the sections
    pub strategy: Strategy,

    /// Sections in document order
    pub sections: Vec<Section>,
}

/// Splits documents into sections
#[derive(Debug, Clone, Default)]
pub struct Segmenter {
    config: SegmenterConfig,
}

impl Segmenter {
    pub fn new(config: SegmenterConfig) -> Self {
        Self { config }
    }

    /// Segment a document, returning the first accepted strategy's output
    ///
    /// Never returns an empty list: an unsplittable document becomes a single
    /// (possibly empty) section.
    pub fn segment(&self, text: &str) -> Segmentation {
        let text = normalize_newlines(text);

        for strategy in Strategy::CASCADE {
            let attempt = self.attempt_normalized(strategy, &text);
            debug!(
                %strategy,
                sections = attempt.sections.len(),
                accepted = attempt.accepted,
                "Segmentation attempt"
            );

            if attempt.accepted {
                info!(%strategy, sections = attempt.sections.len(), "Document segmented");
                return Segmentation {
                    strategy,
                    sections: attempt.sections,
                };
            }
        }

        // Chunking always accepts, so this is only reached if the cascade changes
        Segmentation {
            strategy: Strategy::Chunks,
            sections: self.chunk_by_size(&text),
        }
    }

    /// Run one strategy on its own
    pub fn attempt(&self, strategy: Strategy, text: &str) -> Attempt {
        self.attempt_normalized(strategy, &normalize_newlines(text))
    }

    fn attempt_normalized(&self, strategy: Strategy, text: &str) -> Attempt {
        let min = self.config.min_sections;

        match strategy {
            Strategy::Headings | Strategy::Numbered | Strategy::Articles | Strategy::Sections => {
                let sections = match strategy.boundary() {
                    Some(pattern) => non_empty(split_at_boundaries(text, pattern)),
                    None => Vec::new(),
                };
                let accepted = sections.len() > min;
                Attempt { sections, accepted }
            }
            Strategy::Paragraphs => {
                let sections = longer_than(text.split("\n\n"), self.config.paragraph_min_chars);
                let accepted = sections.len() >= min;
                Attempt { sections, accepted }
            }
            Strategy::Lines => {
                let sections = longer_than(text.split('\n'), self.config.line_min_chars);
                let accepted = sections.len() >= min;
                Attempt { sections, accepted }
            }
            Strategy::Chunks => Attempt {
                sections: self.chunk_by_size(text),
                accepted: true,
            },
        }
    }

    /// Greedily pack sentences into chunks of `chunk_min_chars..=chunk_max_chars`
    ///
    /// A chunk closes only once it has reached the minimum and the next
    /// sentence would push it past the maximum. An undersized tail is merged
    /// into the previous chunk; a document too short for any chunk is
    /// returned whole, whitespace included.
    pub fn chunk_by_size(&self, text: &str) -> Vec<Section> {
        let min_chars = self.config.chunk_min_chars;
        let max_chars = self.config.chunk_max_chars;

        let mut chunks: Vec<String> = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        let mut current_len = 0usize;

        for sentence in split_sentences(text) {
            let sentence_len = sentence.chars().count();

            if current_len + sentence_len > max_chars && current_len >= min_chars {
                chunks.push(current.join(" "));
                current = vec![sentence];
                current_len = sentence_len;
            } else {
                current.push(sentence);
                current_len += sentence_len + 1;
            }
        }

        if !current.is_empty() {
            let remainder = current.join(" ");
            match chunks.last_mut() {
                Some(last) if current_len < min_chars => {
                    last.push(' ');
                    last.push_str(&remainder);
                }
                // Too short for a chunk of its own: keep the text as written
                None if current_len < min_chars => return vec![Section::new(text)],
                _ => chunks.push(remainder),
            }
        }

        let sections = non_empty(chunks.iter().map(String::as_str));
        if sections.is_empty() {
            return vec![Section::new(text)];
        }
        sections
    }
}

fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Split before every line, other than the first, that matches `pattern`
fn split_at_boundaries<'a>(text: &'a str, pattern: &Regex) -> Vec<&'a str> {
    let mut pieces = Vec::new();
    let mut piece_start = 0;
    let mut line_start = 0;

    for line in text.split_inclusive('\n') {
        if line_start > 0 && pattern.is_match(&text[line_start..]) {
            pieces.push(&text[piece_start..line_start]);
            piece_start = line_start;
        }
        line_start += line.len();
    }

    pieces.push(&text[piece_start..]);
    pieces
}

fn sentence_break() -> &'static Regex {
    static BREAK: OnceLock<Regex> = OnceLock::new();
    BREAK.get_or_init(|| Regex::new(r"[.!?]\s+").expect("sentence pattern is a valid regex"))
}

/// Split after `.`, `!` or `?` followed by whitespace, dropping the whitespace
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for found in sentence_break().find_iter(text) {
        // Terminators are single-byte, keep them with the sentence
        sentences.push(&text[start..found.start() + 1]);
        start = found.end();
    }

    sentences.push(&text[start..]);
    sentences.retain(|s| !s.is_empty());
    sentences
}

fn non_empty<'a>(pieces: impl IntoIterator<Item = &'a str>) -> Vec<Section> {
    pieces
        .into_iter()
        .map(Section::new)
        .filter(|section| !section.is_empty())
        .collect()
}

fn longer_than<'a>(pieces: impl IntoIterator<Item = &'a str>, min_chars: usize) -> Vec<Section> {
    pieces
        .into_iter()
        .map(Section::new)
        .filter(|section| section.char_len() > min_chars)
        .collect()
}
