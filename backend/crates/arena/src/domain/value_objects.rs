//! Domain Value Objects
//!
//! Closed vocabularies for challenges and submissions. Each has a lenient
//! `from_remote` decoder for backend values and a `code` for writing back.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Challenge lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeStatus {
    #[default]
    Active,
    Closed,
}

impl ChallengeStatus {
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            ChallengeStatus::Active => "active",
            ChallengeStatus::Closed => "closed",
        }
    }

    /// Accepts the alternate `open`/`evaluating` vocabulary as well
    pub fn from_remote(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "active" => ChallengeStatus::Active,
            "closed" => ChallengeStatus::Closed,
            "open" => ChallengeStatus::Active,
            "evaluating" => {
                tracing::debug!("Mapping challenge status 'evaluating' to closed");
                ChallengeStatus::Closed
            }
            other => {
                tracing::warn!(status = other, "Unknown challenge status, treating as active");
                ChallengeStatus::Active
            }
        }
    }
}

impl fmt::Display for ChallengeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl Difficulty {
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }

    /// Missing or unknown values fall back to `Intermediate`
    pub fn from_remote(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("beginner") => Difficulty::Beginner,
            Some("intermediate") | Some("") | None => Difficulty::Intermediate,
            Some("advanced") => Difficulty::Advanced,
            Some(other) => {
                tracing::warn!(difficulty = other, "Unknown difficulty, using Intermediate");
                Difficulty::Intermediate
            }
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Review state of a submission as the builder sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl SubmissionStatus {
    /// Remote status written for new submissions
    pub const REMOTE_SUBMITTED: &'static str = "submitted";

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Approved => "approved",
            SubmissionStatus::Rejected => "rejected",
        }
    }

    pub fn from_remote(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("submitted") | Some("under_review") | Some("pending") | None => {
                SubmissionStatus::Pending
            }
            Some("evaluated") | Some("approved") => SubmissionStatus::Approved,
            Some("rejected") => SubmissionStatus::Rejected,
            Some(other) => {
                tracing::warn!(status = other, "Unknown submission status, treating as pending");
                SubmissionStatus::Pending
            }
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
