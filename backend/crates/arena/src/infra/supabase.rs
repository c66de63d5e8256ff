//! Supabase Arena Repository
//!
//! `challenges` and `submissions` tables over PostgREST. Rows are decoded
//! leniently: list columns may arrive as JSON arrays or as JSON-encoded
//! strings, and rows with an unreadable deadline are skipped.

use chrono::{DateTime, NaiveDate, Utc};
use kernel::id::{ChallengeId, SubmissionId, UserId};
use platform::rest::{RestClient, eq};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{
    Challenge, DEFAULT_LOGO_URL, DEFAULT_PRIZE, NewSubmission, Resource, Submission, UNKNOWN_SPONSOR,
    UNKNOWN_USER,
};
use crate::domain::repository::{ChallengeRepository, SubmissionRepository};
use crate::domain::value_objects::{ChallengeStatus, Difficulty, SubmissionStatus};
use crate::error::ArenaResult;

const CHALLENGES: &str = "challenges";
const SUBMISSIONS: &str = "submissions";

/// Columns plus the profile join used for display names
const SELECT_WITH_PROFILE: &str = "*,profiles(full_name)";
const NEWEST_FIRST: &str = "created_at.desc";

/// Hosted-backend challenge and submission repository
#[derive(Debug, Clone)]
pub struct SupabaseArenaRepository {
    client: RestClient,
}

impl SupabaseArenaRepository {
    /// Shares the bearer-token slot with the auth repository built on the same client
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }

    async fn select_challenges(&self, query: &[(&str, String)]) -> ArenaResult<Vec<Challenge>> {
        let rows: Vec<ChallengeRow> = self.client.select(CHALLENGES, query).await?;
        Ok(rows.into_iter().filter_map(ChallengeRow::into_challenge).collect())
    }

    async fn select_submissions(&self, query: &[(&str, String)]) -> ArenaResult<Vec<Submission>> {
        let rows: Vec<SubmissionRow> = self.client.select(SUBMISSIONS, query).await?;
        Ok(rows.into_iter().map(SubmissionRow::into_submission).collect())
    }
}

// ============================================================================
// Challenge Repository Implementation
// ============================================================================

impl ChallengeRepository for SupabaseArenaRepository {
    async fn list_challenges(&self) -> ArenaResult<Vec<Challenge>> {
        self.select_challenges(&[
            ("select", SELECT_WITH_PROFILE.to_string()),
            ("order", NEWEST_FIRST.to_string()),
        ])
        .await
    }

    async fn list_challenges_by_sponsor(&self, sponsor_id: &UserId) -> ArenaResult<Vec<Challenge>> {
        self.select_challenges(&[
            ("select", "*".to_string()),
            ("sponsor_id", eq(sponsor_id)),
            ("order", NEWEST_FIRST.to_string()),
        ])
        .await
    }

    async fn get_challenge(&self, id: &ChallengeId) -> ArenaResult<Option<Challenge>> {
        let found = self
            .select_challenges(&[("select", SELECT_WITH_PROFILE.to_string()), ("id", eq(id))])
            .await?;
        Ok(found.into_iter().next())
    }

    async fn create_challenge(&self, challenge: &Challenge) -> ArenaResult<Option<Challenge>> {
        let rows: Vec<ChallengeRow> = self
            .client
            .insert(CHALLENGES, &ChallengeWriteRow::from_challenge(challenge, true))
            .await?;
        Ok(rows.into_iter().next().and_then(ChallengeRow::into_challenge))
    }

    async fn update_challenge(
        &self,
        id: &ChallengeId,
        challenge: &Challenge,
    ) -> ArenaResult<Option<Challenge>> {
        let rows: Vec<ChallengeRow> = self
            .client
            .update(
                CHALLENGES,
                &[("id", eq(id))],
                &ChallengeWriteRow::from_challenge(challenge, false),
            )
            .await?;
        Ok(rows.into_iter().next().and_then(ChallengeRow::into_challenge))
    }

    async fn delete_challenge(&self, id: &ChallengeId) -> ArenaResult<bool> {
        self.client.delete(CHALLENGES, &[("id", eq(id))]).await?;
        Ok(true)
    }
}

// ============================================================================
// Submission Repository Implementation
// ============================================================================

impl SubmissionRepository for SupabaseArenaRepository {
    async fn create_submission(&self, submission: &NewSubmission) -> ArenaResult<Option<Submission>> {
        let body = SubmissionWriteRow {
            challenge_id: submission.challenge_id.as_str(),
            builder_id: submission.builder_id.as_str(),
            project_link: &submission.project_link,
            notes: "",
            status: SubmissionStatus::REMOTE_SUBMITTED,
        };
        let rows: Vec<SubmissionRow> = self.client.insert(SUBMISSIONS, &body).await?;
        Ok(rows.into_iter().next().map(SubmissionRow::into_submission))
    }

    async fn list_submissions_for_challenge(
        &self,
        challenge_id: &ChallengeId,
    ) -> ArenaResult<Vec<Submission>> {
        self.select_submissions(&[
            ("select", SELECT_WITH_PROFILE.to_string()),
            ("challenge_id", eq(challenge_id)),
            ("order", NEWEST_FIRST.to_string()),
        ])
        .await
    }

    async fn list_submissions_by_builder(&self, builder_id: &UserId) -> ArenaResult<Vec<Submission>> {
        self.select_submissions(&[
            ("select", SELECT_WITH_PROFILE.to_string()),
            ("builder_id", eq(builder_id)),
            ("order", NEWEST_FIRST.to_string()),
        ])
        .await
    }
}

// ============================================================================
// Wire rows
// ============================================================================

#[derive(Debug, Default, Deserialize)]
struct ProfileJoin {
    #[serde(default)]
    full_name: Option<String>,
}

impl ProfileJoin {
    fn name(join: Option<ProfileJoin>) -> Option<String> {
        join.and_then(|p| p.full_name)
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ChallengeRow {
    id: String,
    #[serde(default)]
    sponsor_id: Option<String>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    /// Plain-text requirements, one per line; the array column wins
    #[serde(default)]
    requirements: Option<String>,
    #[serde(default)]
    deadline: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    logo: Option<String>,
    #[serde(default)]
    prize: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    requirements_array: Option<serde_json::Value>,
    #[serde(default)]
    evaluation_array: Option<serde_json::Value>,
    #[serde(default)]
    resources: Option<serde_json::Value>,
    #[serde(default)]
    profiles: Option<ProfileJoin>,
}

impl ChallengeRow {
    fn into_challenge(self) -> Option<Challenge> {
        let Some(deadline) = self.deadline.as_deref().and_then(parse_deadline) else {
            tracing::warn!(challenge_id = %self.id, deadline = ?self.deadline, "Skipping challenge with unreadable deadline");
            return None;
        };

        let mut requirements: Vec<String> = json_list(&self.id, "requirements_array", self.requirements_array);
        if requirements.is_empty() {
            requirements = self
                .requirements
                .as_deref()
                .unwrap_or_default()
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect();
        }

        Some(Challenge {
            evaluation_criteria: json_list(&self.id, "evaluation_array", self.evaluation_array),
            resources: json_list::<Resource>(&self.id, "resources", self.resources),
            id: ChallengeId::from_string(self.id),
            title: self.title,
            sponsor_display_name: ProfileJoin::name(self.profiles)
                .unwrap_or_else(|| UNKNOWN_SPONSOR.to_string()),
            description: self.description,
            deadline,
            status: self
                .status
                .as_deref()
                .map(ChallengeStatus::from_remote)
                .unwrap_or_default(),
            difficulty: Difficulty::from_remote(self.difficulty.as_deref()),
            logo_url: non_empty(self.logo).unwrap_or_else(|| DEFAULT_LOGO_URL.to_string()),
            prize_text: non_empty(self.prize).unwrap_or_else(|| DEFAULT_PRIZE.to_string()),
            category: non_empty(self.category),
            requirements,
            sponsor_id: self.sponsor_id.map(UserId::from_string),
            submissions: Vec::new(),
        })
    }
}

/// `YYYY-MM-DD`, or the date part of a timestamp
fn parse_deadline(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| raw.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()))
}

/// A JSON array, or a string holding one; anything else is logged and empty
fn json_list<T: DeserializeOwned>(id: &str, column: &str, value: Option<serde_json::Value>) -> Vec<T> {
    let decoded = match value {
        None | Some(serde_json::Value::Null) => return Vec::new(),
        Some(serde_json::Value::String(text)) => serde_json::from_str(&text),
        Some(other) => serde_json::from_value(other),
    };
    decoded.unwrap_or_else(|e| {
        tracing::warn!(challenge_id = %id, column, error = %e, "Unreadable list column, using empty list");
        Vec::new()
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

#[derive(Debug, Serialize)]
struct ChallengeWriteRow<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    sponsor_id: Option<&'a str>,
    title: &'a str,
    description: &'a str,
    requirements: String,
    deadline: NaiveDate,
    status: &'static str,
    difficulty: &'static str,
    logo: &'a str,
    prize: &'a str,
    category: Option<&'a str>,
    requirements_array: &'a [String],
    evaluation_array: &'a [String],
    resources: &'a [Resource],
}

impl<'a> ChallengeWriteRow<'a> {
    /// Ownership is only written on insert
    fn from_challenge(challenge: &'a Challenge, with_sponsor: bool) -> Self {
        Self {
            sponsor_id: challenge
                .sponsor_id
                .as_ref()
                .filter(|_| with_sponsor)
                .map(UserId::as_str),
            title: &challenge.title,
            description: &challenge.description,
            requirements: challenge.requirements.join("\n"),
            deadline: challenge.deadline,
            status: challenge.status.code(),
            difficulty: challenge.difficulty.code(),
            logo: &challenge.logo_url,
            prize: &challenge.prize_text,
            category: challenge.category.as_deref(),
            requirements_array: &challenge.requirements,
            evaluation_array: &challenge.evaluation_criteria,
            resources: &challenge.resources,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SubmissionRow {
    id: String,
    challenge_id: String,
    builder_id: String,
    #[serde(default)]
    project_link: String,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    feedback: Option<String>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    score: Option<f64>,
    #[serde(default)]
    profiles: Option<ProfileJoin>,
}

impl SubmissionRow {
    fn into_submission(self) -> Submission {
        Submission {
            id: SubmissionId::from_string(self.id),
            challenge_id: ChallengeId::from_string(self.challenge_id),
            builder_id: UserId::from_string(self.builder_id),
            builder_display_name: ProfileJoin::name(self.profiles)
                .unwrap_or_else(|| UNKNOWN_USER.to_string()),
            submission_link: self.project_link,
            submitted_at: self.created_at.unwrap_or_else(Utc::now),
            status: SubmissionStatus::from_remote(self.status.as_deref()),
            feedback: non_empty(self.feedback).or_else(|| non_empty(self.notes)),
            score: self.score,
        }
    }
}

#[derive(Debug, Serialize)]
struct SubmissionWriteRow<'a> {
    challenge_id: &'a str,
    builder_id: &'a str,
    project_link: &'a str,
    notes: &'a str,
    status: &'static str,
}
