//! Review decisions and the records the ledger keeps for them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A response that is not one of the three decisions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid decision: {0:?} (expected approved, disapproved or skipped)")]
pub struct InvalidDecision(pub String);

/// Outcome of reviewing one section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approved,
    Disapproved,
    /// Deferred; never persisted
    Skipped,
}

impl Decision {
    /// The persistable status, if any
    pub fn status(self) -> Option<ReviewStatus> {
        match self {
            Decision::Approved => Some(ReviewStatus::Approved),
            Decision::Disapproved => Some(ReviewStatus::Disapproved),
            Decision::Skipped => None,
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decision::Approved => write!(f, "approved"),
            Decision::Disapproved => write!(f, "disapproved"),
            Decision::Skipped => write!(f, "skipped"),
        }
    }
}

impl std::str::FromStr for Decision {
    type Err = InvalidDecision;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "a" | "approved" => Ok(Decision::Approved),
            "d" | "disapproved" => Ok(Decision::Disapproved),
            "s" | "skipped" => Ok(Decision::Skipped),
            _ => Err(InvalidDecision(s.to_string())),
        }
    }
}

/// A decision that can be stored in the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Approved,
    Disapproved,
}

impl std::fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReviewStatus::Approved => write!(f, "approved"),
            ReviewStatus::Disapproved => write!(f, "disapproved"),
        }
    }
}

/// Ledger entry for one fingerprint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub status: ReviewStatus,

    /// Leading characters of the section as it was reviewed
    pub preview: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_from_str() {
        assert_eq!("a".parse::<Decision>().unwrap(), Decision::Approved);
        assert_eq!(" Approved\n".parse::<Decision>().unwrap(), Decision::Approved);
        assert_eq!("D".parse::<Decision>().unwrap(), Decision::Disapproved);
        assert_eq!("disapproved".parse::<Decision>().unwrap(), Decision::Disapproved);
        assert_eq!("s".parse::<Decision>().unwrap(), Decision::Skipped);
        assert_eq!("skipped".parse::<Decision>().unwrap(), Decision::Skipped);

        let err = "maybe".parse::<Decision>().unwrap_err();
        assert_eq!(err, InvalidDecision("maybe".to_string()));
        assert!("".parse::<Decision>().is_err());
    }

    #[test]
    fn test_skipped_has_no_status() {
        assert_eq!(Decision::Approved.status(), Some(ReviewStatus::Approved));
        assert_eq!(Decision::Disapproved.status(), Some(ReviewStatus::Disapproved));
        assert_eq!(Decision::Skipped.status(), None);
    }

    #[test]
    fn test_record_json_shape() {
        let record = ReviewRecord {
            status: ReviewStatus::Disapproved,
            preview: "Arbitration".to_string(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "disapproved", "preview": "Arbitration"})
        );
    }

    #[test]
    fn test_skipped_status_is_rejected() {
        let result: Result<ReviewRecord, _> =
            serde_json::from_str(r#"{"status": "skipped", "preview": "x"}"#);
        assert!(result.is_err());
    }
}
