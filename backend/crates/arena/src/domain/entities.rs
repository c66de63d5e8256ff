//! Domain Entities
//!
//! Core business entities for the challenge marketplace.

use chrono::{DateTime, NaiveDate, Utc};
use kernel::id::{ChallengeId, SubmissionId, UserId};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{ChallengeStatus, Difficulty, SubmissionStatus};
use crate::error::{ArenaError, ArenaResult};

pub const UNKNOWN_SPONSOR: &str = "Unknown Sponsor";
pub const UNKNOWN_USER: &str = "Unknown User";
pub const DEFAULT_LOGO_URL: &str = "https://placehold.co/50";
pub const DEFAULT_PRIZE: &str = "$1,000";

/// Supporting material linked from a challenge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    pub link: String,
}

/// Challenge entity - a task posted by a sponsor
///
/// This is also the shape persisted under `acceptedChallenges`, so every
/// field added later must carry `#[serde(default)]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    pub id: ChallengeId,
    pub title: String,
    pub sponsor_display_name: String,
    pub description: String,
    pub deadline: NaiveDate,
    #[serde(default)]
    pub status: ChallengeStatus,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub logo_url: String,
    pub prize_text: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub evaluation_criteria: Vec<String>,
    #[serde(default)]
    pub resources: Vec<Resource>,
    /// `None` only for built-in fixtures
    #[serde(default)]
    pub sponsor_id: Option<UserId>,
    #[serde(default)]
    pub submissions: Vec<Submission>,
}

/// Submission entity - a builder's solution link for a challenge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: SubmissionId,
    pub challenge_id: ChallengeId,
    pub builder_id: UserId,
    pub builder_display_name: String,
    pub submission_link: String,
    pub submitted_at: DateTime<Utc>,
    #[serde(default)]
    pub status: SubmissionStatus,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
}

/// Submission about to be written; the link is already validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubmission {
    pub challenge_id: ChallengeId,
    pub builder_id: UserId,
    /// Kept locally; the backend resolves names through the profile join
    pub builder_display_name: String,
    pub project_link: String,
}

// ============================================================================
// Authoring
// ============================================================================

/// Sponsor input for a new challenge
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeDraft {
    pub title: String,
    pub description: String,
    pub deadline: NaiveDate,
    #[serde(default)]
    pub status: ChallengeStatus,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub prize_text: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub evaluation_criteria: Vec<String>,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

impl ChallengeDraft {
    /// Required fields must be non-blank
    pub fn validate(&self) -> ArenaResult<()> {
        if self.title.trim().is_empty() {
            return Err(ArenaError::Validation("Title is required".to_string()));
        }
        if self.description.trim().is_empty() {
            return Err(ArenaError::Validation("Description is required".to_string()));
        }
        if self.resources.iter().any(|r| r.name.trim().is_empty()) {
            return Err(ArenaError::Validation("Every resource needs a name".to_string()));
        }
        Ok(())
    }

    pub fn into_challenge(
        self,
        id: ChallengeId,
        sponsor_id: UserId,
        sponsor_display_name: String,
    ) -> Challenge {
        Challenge {
            id,
            title: self.title.trim().to_string(),
            sponsor_display_name,
            description: self.description.trim().to_string(),
            deadline: self.deadline,
            status: self.status,
            difficulty: self.difficulty,
            logo_url: non_blank(self.logo_url).unwrap_or_else(|| DEFAULT_LOGO_URL.to_string()),
            prize_text: non_blank(self.prize_text).unwrap_or_else(|| DEFAULT_PRIZE.to_string()),
            category: non_blank(self.category),
            requirements: clean_lines(self.requirements),
            evaluation_criteria: clean_lines(self.evaluation_criteria),
            resources: self.resources,
            sponsor_id: Some(sponsor_id),
            submissions: Vec::new(),
        }
    }
}

/// Partial edit of a challenge; `None` leaves the field unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub status: Option<ChallengeStatus>,
    pub difficulty: Option<Difficulty>,
    pub logo_url: Option<String>,
    pub prize_text: Option<String>,
    /// `Some(None)` clears the category
    #[serde(default, with = "double_option")]
    pub category: Option<Option<String>>,
    pub requirements: Option<Vec<String>>,
    pub evaluation_criteria: Option<Vec<String>>,
    pub resources: Option<Vec<Resource>>,
}

impl ChallengePatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn validate(&self) -> ArenaResult<()> {
        if self.is_empty() {
            return Err(ArenaError::Validation("Nothing to update".to_string()));
        }
        if matches!(&self.title, Some(t) if t.trim().is_empty()) {
            return Err(ArenaError::Validation("Title is required".to_string()));
        }
        if matches!(&self.description, Some(d) if d.trim().is_empty()) {
            return Err(ArenaError::Validation("Description is required".to_string()));
        }
        Ok(())
    }

    /// Merge over `existing`; identity, sponsor and submissions are kept
    pub fn apply_to(&self, existing: &Challenge) -> Challenge {
        let mut merged = existing.clone();
        if let Some(title) = &self.title {
            merged.title = title.trim().to_string();
        }
        if let Some(description) = &self.description {
            merged.description = description.trim().to_string();
        }
        if let Some(deadline) = self.deadline {
            merged.deadline = deadline;
        }
        if let Some(status) = self.status {
            merged.status = status;
        }
        if let Some(difficulty) = self.difficulty {
            merged.difficulty = difficulty;
        }
        if let Some(logo) = non_blank(self.logo_url.clone()) {
            merged.logo_url = logo;
        }
        if let Some(prize) = non_blank(self.prize_text.clone()) {
            merged.prize_text = prize;
        }
        if let Some(category) = &self.category {
            merged.category = non_blank(category.clone());
        }
        if let Some(requirements) = &self.requirements {
            merged.requirements = clean_lines(requirements.clone());
        }
        if let Some(criteria) = &self.evaluation_criteria {
            merged.evaluation_criteria = clean_lines(criteria.clone());
        }
        if let Some(resources) = &self.resources {
            merged.resources = resources.clone();
        }
        merged
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn clean_lines(lines: Vec<String>) -> Vec<String> {
    lines
        .into_iter()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

/// Distinguishes an absent field from an explicit `null`
mod double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}
