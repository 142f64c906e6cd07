//! Form submission models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Triage priority tier. Ordered from most to least urgent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(format!("Unknown priority: {}", other)),
        }
    }
}

/// A stored patient submission. Never mutated after insert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FormSubmission {
    pub id: i64,
    pub template_id: i64,
    pub patient_id: i64,
    /// Answers exactly as submitted
    pub answers: Value,
    /// Set only for clinical wizard templates
    pub priority: Option<Priority>,
    pub submission_date: String,
}

/// A submission ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubmission {
    pub template_id: i64,
    pub patient_id: i64,
    pub answers: Value,
    pub priority: Option<Priority>,
}

impl NewSubmission {
    /// Serialized answers text and its digest, as persisted.
    pub fn answers_record(&self) -> serde_json::Result<(String, String)> {
        let text = serde_json::to_string(&self.answers)?;
        let digest = answers_digest(&text);
        Ok((text, digest))
    }
}

/// What the caller gets back from a successful insert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubmissionReceipt {
    pub id: i64,
    pub submission_date: String,
}

/// Hex SHA-256 of the stored answers text.
pub fn answers_digest(answers_json: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(answers_json.as_bytes());
    hex::encode(hasher.finalize())
}
