//! Data Transfer Objects
//!
//! Request/response types for the arena API. Challenges and submissions
//! are serialized as-is; these cover the envelopes around them.

use kernel::id::{ChallengeId, UserId};
use serde::{Deserialize, Serialize};

/// POST /builder/submissions
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitSolutionRequest {
    pub challenge_id: ChallengeId,
    /// Defaults to the signed-in builder
    #[serde(default)]
    pub builder_id: Option<UserId>,
    #[serde(default)]
    pub builder_name: String,
    pub link: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptResponse {
    pub challenge_id: ChallengeId,
    /// False when the challenge was already accepted
    pub added: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveResponse {
    pub challenge_id: ChallengeId,
    pub removed: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub challenge_id: ChallengeId,
    /// False when the backend reported nothing deleted; the challenge stays
    pub deleted: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RefreshResponse {
    pub added: usize,
}
