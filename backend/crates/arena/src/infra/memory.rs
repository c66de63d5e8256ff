//! In-Memory Arena Repository
//!
//! Process-local stand-in for the `challenges` and `submissions` tables,
//! used by tests and by the offline demo. Ids are UUIDs as on the backend;
//! lists come back newest first.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use chrono::Utc;
use kernel::id::{ChallengeId, SubmissionId, UserId};
use platform::rest::RestError;

use crate::domain::entities::{Challenge, NewSubmission, Submission, UNKNOWN_SPONSOR};
use crate::domain::repository::{ChallengeRepository, SubmissionRepository};
use crate::domain::value_objects::SubmissionStatus;
use crate::error::{ArenaError, ArenaResult};

#[derive(Default)]
struct Tables {
    /// Insertion order; reads reverse it
    challenges: Vec<Challenge>,
    submissions: Vec<Submission>,
}

#[derive(Default)]
pub struct MemoryArenaRepository {
    tables: Mutex<Tables>,
    offline: AtomicBool,
    writes_failing: AtomicBool,
    submission_writes: AtomicUsize,
}

impl MemoryArenaRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Add a row as if another client had created it
    pub fn insert_remote(&self, challenge: Challenge) {
        let mut tables = self.lock();
        tables.challenges.retain(|c| c.id != challenge.id);
        tables.challenges.push(challenge);
    }

    /// Delete a row as if another client had removed it
    pub fn remove_remote(&self, id: &ChallengeId) {
        self.lock().challenges.retain(|c| &c.id != id);
    }

    pub fn remote_challenge(&self, id: &ChallengeId) -> Option<Challenge> {
        self.lock().challenges.iter().find(|c| &c.id == id).cloned()
    }

    /// Every call fails as if the backend were unreachable
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Reads succeed, writes are rejected
    pub fn set_writes_failing(&self, failing: bool) {
        self.writes_failing.store(failing, Ordering::SeqCst);
    }

    /// Number of submission inserts that reached the table
    pub fn submission_write_count(&self) -> usize {
        self.submission_writes.load(Ordering::SeqCst)
    }

    fn check_online(&self) -> ArenaResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ArenaError::Remote(RestError::Status {
                status: 503,
                code: None,
                message: "Arena backend offline".to_string(),
            }));
        }
        Ok(())
    }

    fn check_writable(&self) -> ArenaResult<()> {
        self.check_online()?;
        if self.writes_failing.load(Ordering::SeqCst) {
            return Err(ArenaError::Remote(RestError::Status {
                status: 500,
                code: None,
                message: "Write rejected".to_string(),
            }));
        }
        Ok(())
    }

    /// Stored rows carry no embedded submissions, like the table
    fn stored(challenge: &Challenge) -> Challenge {
        Challenge {
            submissions: Vec::new(),
            ..challenge.clone()
        }
    }
}

impl ChallengeRepository for MemoryArenaRepository {
    async fn list_challenges(&self) -> ArenaResult<Vec<Challenge>> {
        self.check_online()?;
        Ok(self.lock().challenges.iter().rev().cloned().collect())
    }

    async fn list_challenges_by_sponsor(&self, sponsor_id: &UserId) -> ArenaResult<Vec<Challenge>> {
        self.check_online()?;
        Ok(self
            .lock()
            .challenges
            .iter()
            .rev()
            .filter(|c| c.sponsor_id.as_ref() == Some(sponsor_id))
            .map(|c| Challenge {
                // No profile join on this listing
                sponsor_display_name: UNKNOWN_SPONSOR.to_string(),
                ..c.clone()
            })
            .collect())
    }

    async fn get_challenge(&self, id: &ChallengeId) -> ArenaResult<Option<Challenge>> {
        self.check_online()?;
        Ok(self.remote_challenge(id))
    }

    async fn create_challenge(&self, challenge: &Challenge) -> ArenaResult<Option<Challenge>> {
        self.check_writable()?;
        let stored = Challenge {
            id: ChallengeId::new(),
            ..Self::stored(challenge)
        };
        self.lock().challenges.push(stored.clone());
        Ok(Some(stored))
    }

    async fn update_challenge(
        &self,
        id: &ChallengeId,
        challenge: &Challenge,
    ) -> ArenaResult<Option<Challenge>> {
        self.check_writable()?;
        let mut tables = self.lock();
        let Some(slot) = tables.challenges.iter_mut().find(|c| &c.id == id) else {
            return Ok(None);
        };
        *slot = Challenge {
            id: id.clone(),
            sponsor_id: slot.sponsor_id.clone(),
            ..Self::stored(challenge)
        };
        Ok(Some(slot.clone()))
    }

    async fn delete_challenge(&self, id: &ChallengeId) -> ArenaResult<bool> {
        self.check_writable()?;
        let mut tables = self.lock();
        let before = tables.challenges.len();
        tables.challenges.retain(|c| &c.id != id);
        Ok(tables.challenges.len() != before)
    }
}

impl SubmissionRepository for MemoryArenaRepository {
    async fn create_submission(&self, submission: &NewSubmission) -> ArenaResult<Option<Submission>> {
        self.check_writable()?;
        let stored = Submission {
            id: SubmissionId::new(),
            challenge_id: submission.challenge_id.clone(),
            builder_id: submission.builder_id.clone(),
            builder_display_name: submission.builder_display_name.clone(),
            submission_link: submission.project_link.clone(),
            submitted_at: Utc::now(),
            status: SubmissionStatus::Pending,
            feedback: None,
            score: None,
        };
        self.lock().submissions.push(stored.clone());
        self.submission_writes.fetch_add(1, Ordering::SeqCst);
        Ok(Some(stored))
    }

    async fn list_submissions_for_challenge(
        &self,
        challenge_id: &ChallengeId,
    ) -> ArenaResult<Vec<Submission>> {
        self.check_online()?;
        Ok(self
            .lock()
            .submissions
            .iter()
            .rev()
            .filter(|s| &s.challenge_id == challenge_id)
            .cloned()
            .collect())
    }

    async fn list_submissions_by_builder(&self, builder_id: &UserId) -> ArenaResult<Vec<Submission>> {
        self.check_online()?;
        Ok(self
            .lock()
            .submissions
            .iter()
            .rev()
            .filter(|s| &s.builder_id == builder_id)
            .cloned()
            .collect())
    }
}
