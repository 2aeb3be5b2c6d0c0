//! Content-addressed review ledger with file-based persistence.
//!
//! The ledger maps section fingerprints to review records and is stored as a
//! single pretty-printed JSON object. Every mutation rewrites the whole file
//! before returning, so the file always reflects the in-memory mapping.
//!
//! ```text
//! {
//!   "<sha256 hex>": { "status": "approved", "preview": "1. Acceptance ..." },
//!   "<sha256 hex>": { "status": "disapproved", "preview": "ARBITRATION ..." }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::{Fingerprint, ReviewRecord, ReviewStatus};

/// Default number of characters kept as a record preview
pub const DEFAULT_PREVIEW_CHARS: usize = 200;

/// Errors reading or writing the ledger file
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read ledger {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Ledger {} is not well-formed: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write ledger {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to serialize ledger: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Totals over every record in the ledger
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerStats {
    pub total: usize,
    pub approved: usize,
    pub disapproved: usize,
}

/// Persistent fingerprint -> review record mapping
#[derive(Debug)]
pub struct Ledger {
    /// Path to the JSON file
    path: PathBuf,

    /// Characters of section text kept in new records
    preview_chars: usize,

    records: BTreeMap<Fingerprint, ReviewRecord>,
}

impl Ledger {
    /// Load the ledger at `path`, starting empty if the file does not exist
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();

        if !path.exists() {
            debug!(path = %path.display(), "No ledger file yet, starting empty");
            return Ok(Self::empty(path));
        }

        let content = fs::read_to_string(&path).map_err(|source| StorageError::Read {
            path: path.clone(),
            source,
        })?;

        let records: BTreeMap<Fingerprint, ReviewRecord> =
            serde_json::from_str(&content).map_err(|source| StorageError::Malformed {
                path: path.clone(),
                source,
            })?;

        debug!(path = %path.display(), records = records.len(), "Ledger loaded");

        Ok(Self {
            path,
            preview_chars: DEFAULT_PREVIEW_CHARS,
            records,
        })
    }

    /// An empty ledger that will persist to `path` on first write
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            preview_chars: DEFAULT_PREVIEW_CHARS,
            records: BTreeMap::new(),
        }
    }

    /// Set how many characters of section text new records keep
    pub fn with_preview_chars(mut self, preview_chars: usize) -> Self {
        self.preview_chars = preview_chars;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the record for a fingerprint
    pub fn lookup(&self, fingerprint: &Fingerprint) -> Option<&ReviewRecord> {
        self.records.get(fingerprint)
    }

    /// Status stored for a fingerprint
    pub fn status(&self, fingerprint: &Fingerprint) -> Option<ReviewStatus> {
        self.lookup(fingerprint).map(|record| record.status)
    }

    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.records.contains_key(fingerprint)
    }

    /// Insert a record and persist the whole ledger
    ///
    /// Returns `Ok(false)` without writing if the fingerprint is already
    /// recorded; the first decision for a fingerprint is kept. On a failed
    /// write the insertion is undone.
    pub fn record(
        &mut self,
        fingerprint: Fingerprint,
        status: ReviewStatus,
        section_text: &str,
    ) -> Result<bool, StorageError> {
        if self.records.contains_key(&fingerprint) {
            debug!(fingerprint = %fingerprint.short(), "Already recorded, keeping first decision");
            return Ok(false);
        }

        let record = ReviewRecord {
            status,
            preview: truncate_chars(section_text, self.preview_chars).to_string(),
        };
        self.records.insert(fingerprint.clone(), record);

        if let Err(e) = self.persist() {
            self.records.remove(&fingerprint);
            return Err(e);
        }

        debug!(fingerprint = %fingerprint.short(), %status, "Decision recorded");
        Ok(true)
    }

    /// Remove every record and persist the empty ledger
    pub fn clear(&mut self) -> Result<(), StorageError> {
        let previous = std::mem::take(&mut self.records);

        if let Err(e) = self.persist() {
            self.records = previous;
            return Err(e);
        }

        info!(path = %self.path.display(), removed = previous.len(), "Ledger cleared");
        Ok(())
    }

    /// Rewrite the ledger file from memory
    ///
    /// Writes to a sibling temp file and renames it over the ledger.
    pub fn persist(&self) -> Result<(), StorageError> {
        let write_error = |source: io::Error| StorageError::Write {
            path: self.path.clone(),
            source,
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(write_error)?;

        let content = serde_json::to_string_pretty(&self.records)?;

        let mut file = NamedTempFile::new_in(dir).map_err(write_error)?;
        file.write_all(content.as_bytes()).map_err(write_error)?;
        file.as_file().sync_all().map_err(write_error)?;
        file.persist(&self.path).map_err(|e| write_error(e.error))?;

        Ok(())
    }

    /// Iterate records in fingerprint order
    pub fn iter(&self) -> impl Iterator<Item = (&Fingerprint, &ReviewRecord)> {
        self.records.iter()
    }

    pub fn stats(&self) -> LedgerStats {
        let mut stats = LedgerStats {
            total: self.records.len(),
            ..Default::default()
        };
        for record in self.records.values() {
            match record.status {
                ReviewStatus::Approved => stats.approved += 1,
                ReviewStatus::Disapproved => stats.disapproved += 1,
            }
        }
        stats
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
