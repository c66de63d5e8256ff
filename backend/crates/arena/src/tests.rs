//! Behaviour tests for the challenge cache
//! Run against the in-memory auth and arena repositories

#[cfg(test)]
mod support {
    use std::sync::Arc;
    use std::time::Duration;

    use auth::application::SignInInput;
    use auth::models::UserRole;
    use auth::{MemoryAuthRepository, SessionHandle, SessionStore};
    use chrono::NaiveDate;
    use kernel::id::UserId;
    use platform::storage::{KeyValueStore, MemoryStore};

    use crate::application::{CacheConfig, CacheState, ChallengeCache};
    use crate::domain::entities::{Challenge, ChallengeDraft};
    use crate::infra::MemoryArenaRepository;

    pub const PASSWORD: &str = "Arena#Launch2025";
    pub const SPONSOR_EMAIL: &str = "ops@meditech.io";
    pub const OTHER_SPONSOR_EMAIL: &str = "team@marketgenius.ai";
    pub const BUILDER_EMAIL: &str = "ada@example.com";

    pub struct Fixture {
        pub sessions: Arc<SessionStore<MemoryAuthRepository>>,
        pub remote: Arc<MemoryArenaRepository>,
        pub storage: Arc<dyn KeyValueStore>,
        pub cache: Arc<ChallengeCache<MemoryArenaRepository>>,
        pub sponsor_id: UserId,
        pub other_sponsor_id: UserId,
        pub builder_id: UserId,
        _session_task: SessionHandle,
    }

    impl Fixture {
        pub async fn new() -> Self {
            Self::with(Arc::new(MemoryStore::new()), CacheConfig::default()).await
        }

        /// Refresh ticker effectively off; tests call `refresh()` directly
        pub async fn with(storage: Arc<dyn KeyValueStore>, config: CacheConfig) -> Self {
            Self::build(storage, config.with_refresh_interval(Duration::from_secs(3600))).await
        }

        pub async fn build(storage: Arc<dyn KeyValueStore>, config: CacheConfig) -> Self {
            let accounts = Arc::new(MemoryAuthRepository::new());
            let sponsor_id =
                accounts.register_confirmed(SPONSOR_EMAIL, PASSWORD, "MediTech Solutions", UserRole::Sponsor);
            let other_sponsor_id = accounts.register_confirmed(
                OTHER_SPONSOR_EMAIL,
                PASSWORD,
                "MarketGenius Inc.",
                UserRole::Sponsor,
            );
            let builder_id =
                accounts.register_confirmed(BUILDER_EMAIL, PASSWORD, "Ada Lovelace", UserRole::Builder);

            let sessions = SessionStore::new(accounts);
            let session_task = sessions.start();
            sessions.settled().await;

            let remote = Arc::new(MemoryArenaRepository::new());
            let cache = ChallengeCache::new(
                Arc::clone(&remote),
                Arc::clone(&storage),
                sessions.subscribe(),
                config,
            );

            Self {
                sessions,
                remote,
                storage,
                cache,
                sponsor_id,
                other_sponsor_id,
                builder_id,
                _session_task: session_task,
            }
        }

        pub async fn sign_in(&self, email: &str) {
            self.sessions
                .sign_in(SignInInput {
                    email: email.to_string(),
                    password: PASSWORD.to_string(),
                })
                .await
                .unwrap();
            self.sessions.settled().await;
        }

        /// Wait for the cache state to satisfy `predicate`
        pub async fn wait_for<F>(&self, predicate: F) -> CacheState
        where
            F: FnMut(&CacheState) -> bool,
        {
            let mut rx = self.cache.subscribe();
            tokio::time::timeout(Duration::from_secs(2), rx.wait_for(predicate))
                .await
                .expect("cache state never reached")
                .expect("cache dropped")
                .clone()
        }
    }

    pub fn draft(title: &str) -> ChallengeDraft {
        ChallengeDraft {
            title: title.to_string(),
            description: "Rank incoming cases by urgency".to_string(),
            deadline: NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
            status: Default::default(),
            difficulty: Default::default(),
            logo_url: None,
            prize_text: Some("$4,000".to_string()),
            category: Some("Healthcare".to_string()),
            requirements: vec!["Explain every ranking".to_string()],
            evaluation_criteria: vec!["Recall on urgent cases".to_string()],
            resources: vec![],
        }
    }

    /// A backend row owned by `sponsor_id`
    pub fn remote_challenge(id: &str, sponsor_id: &UserId) -> Challenge {
        let mut challenge = crate::application::seed::seed_challenges().remove(0);
        challenge.id = id.into();
        challenge.title = format!("Remote {id}");
        challenge.sponsor_id = Some(sponsor_id.clone());
        challenge.sponsor_display_name = "MarketGenius Inc.".to_string();
        challenge
    }

    pub fn ids(challenges: &[Challenge]) -> Vec<&str> {
        challenges.iter().map(|c| c.id.as_str()).collect()
    }
}

#[cfg(test)]
mod accepted_tests {
    use super::support::*;
    use std::sync::Arc;

    use crate::application::CacheConfig;
    use crate::application::seed::SEED_CHALLENGE_IDS;
    use crate::error::ArenaError;
    use kernel::id::ChallengeId;
    use platform::storage::{FileStore, KeyValueStore, MemoryStore, load_json_or_default};

    use crate::application::config::ACCEPTED_STORAGE_KEY;
    use crate::domain::entities::Challenge;

    #[tokio::test]
    async fn test_seed_challenges_survive_empty_remote() {
        let f = Fixture::new().await;
        let _handle = f.cache.start();
        f.cache.loaded().await;

        for id in SEED_CHALLENGE_IDS {
            assert!(f.cache.get_challenge_by_id(&ChallengeId::from(id)).is_some());
        }
        assert!(!f.cache.is_loading());
    }

    #[tokio::test]
    async fn test_seed_challenges_survive_offline_remote() {
        let f = Fixture::new().await;
        f.remote.set_offline(true);
        let _handle = f.cache.start();
        f.cache.loaded().await;

        assert_eq!(f.cache.all_challenges().len(), SEED_CHALLENGE_IDS.len());
    }

    #[tokio::test]
    async fn test_add_challenge_is_idempotent() {
        let f = Fixture::new().await;
        let seed = f.cache.get_challenge_by_id(&ChallengeId::from("1")).unwrap();

        assert!(f.cache.add_challenge(seed.clone()));
        assert!(!f.cache.add_challenge(seed.clone()));
        assert!(f.cache.is_accepted(&seed.id));
        assert_eq!(f.cache.accepted_challenges().len(), 1);

        assert!(f.cache.remove_challenge(&seed.id));
        assert!(!f.cache.is_accepted(&seed.id));
        assert!(!f.cache.remove_challenge(&seed.id));
    }

    #[tokio::test]
    async fn test_accept_unknown_id() {
        let f = Fixture::new().await;
        let result = f.cache.accept_by_id(&ChallengeId::from("missing"));
        assert!(matches!(result, Err(ArenaError::ChallengeNotFound(_))));
    }

    #[tokio::test]
    async fn test_corrupt_storage_yields_empty_accepted_set() {
        let storage = Arc::new(MemoryStore::new().with_entry("acceptedChallenges", "{not json"));
        let f = Fixture::with(storage, CacheConfig::default()).await;
        assert!(f.cache.accepted_challenges().is_empty());
    }

    #[tokio::test]
    async fn test_accepted_set_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(dir.path()).unwrap());

        let first = Fixture::with(Arc::clone(&storage), CacheConfig::default()).await;
        first.cache.accept_by_id(&ChallengeId::from("2")).unwrap();
        drop(first);

        let reopened: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(dir.path()).unwrap());
        let second = Fixture::with(reopened, CacheConfig::default()).await;
        let accepted = second.cache.accepted_challenges();
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].sponsor_display_name, "MediTech Solutions");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_changes_persist_final_set() {
        let dir = tempfile::tempdir().unwrap();
        let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(dir.path()).unwrap());
        let f = Fixture::with(Arc::clone(&storage), CacheConfig::default()).await;

        let tasks: Vec<_> = (0..32)
            .map(|i| {
                let cache = Arc::clone(&f.cache);
                let challenge = remote_challenge(&format!("r-{i}"), &f.other_sponsor_id);
                tokio::spawn(async move {
                    let id = challenge.id.clone();
                    assert!(cache.add_challenge(challenge));
                    if i % 2 == 0 {
                        assert!(cache.remove_challenge(&id));
                    }
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        let accepted = f.cache.accepted_challenges();
        assert_eq!(accepted.len(), 16);
        let stored: Vec<Challenge> = load_json_or_default(storage.as_ref(), ACCEPTED_STORAGE_KEY);
        assert_eq!(stored, accepted);
    }
}

#[cfg(test)]
mod refresh_tests {
    use super::support::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::application::CacheConfig;
    use kernel::id::ChallengeId;
    use platform::storage::MemoryStore;

    #[tokio::test]
    async fn test_refresh_appends_new_ids_only() {
        let f = Fixture::new().await;
        f.remote.insert_remote(remote_challenge("A", &f.other_sponsor_id));
        f.remote.insert_remote(remote_challenge("B", &f.other_sponsor_id));
        assert_eq!(f.cache.refresh().await, 2);

        f.remote.insert_remote(remote_challenge("C", &f.other_sponsor_id));
        assert_eq!(f.cache.refresh().await, 1);

        let all = f.cache.all_challenges();
        let merged = ids(&all);
        for id in ["1", "2", "A", "B", "C"] {
            assert!(merged.contains(&id), "{id} missing from {merged:?}");
        }
        assert_eq!(merged.len(), 5);
    }

    #[tokio::test]
    async fn test_refresh_never_propagates_deletes_or_edits() {
        let f = Fixture::new().await;
        f.remote.insert_remote(remote_challenge("A", &f.other_sponsor_id));
        f.remote.insert_remote(remote_challenge("B", &f.other_sponsor_id));
        f.cache.refresh().await;

        f.remote.remove_remote(&ChallengeId::from("B"));
        let mut edited = remote_challenge("A", &f.other_sponsor_id);
        edited.title = "Edited elsewhere".to_string();
        f.remote.insert_remote(edited);

        assert_eq!(f.cache.refresh().await, 0);
        let b = f.cache.get_challenge_by_id(&ChallengeId::from("B"));
        assert!(b.is_some());
        let a = f.cache.get_challenge_by_id(&ChallengeId::from("A")).unwrap();
        assert_eq!(a.title, "Remote A");
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_state() {
        let f = Fixture::new().await;
        f.remote.insert_remote(remote_challenge("A", &f.other_sponsor_id));
        f.cache.refresh().await;

        f.remote.set_offline(true);
        assert_eq!(f.cache.refresh().await, 0);
        assert_eq!(f.cache.all_challenges().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_merges_until_handle_dropped() {
        let period = Duration::from_secs(10);
        let config = CacheConfig::default().with_refresh_interval(period);
        let f = Fixture::build(Arc::new(MemoryStore::new()), config).await;
        let handle = f.cache.start();
        f.cache.loaded().await;

        f.remote.insert_remote(remote_challenge("A", &f.other_sponsor_id));
        tokio::time::sleep(period / 2).await;
        assert!(f.cache.get_challenge_by_id(&ChallengeId::from("A")).is_none());

        // First tick at `period`
        tokio::time::sleep(period).await;
        assert!(f.cache.get_challenge_by_id(&ChallengeId::from("A")).is_some());

        drop(handle);
        f.remote.insert_remote(remote_challenge("B", &f.other_sponsor_id));
        tokio::time::sleep(period * 3).await;
        assert!(f.cache.get_challenge_by_id(&ChallengeId::from("B")).is_none());
        assert_eq!(f.cache.refresh().await, 1);
    }
}

#[cfg(test)]
mod session_tests {
    use super::support::*;

    use kernel::id::ChallengeId;

    #[tokio::test]
    async fn test_sponsor_challenges_load_on_sign_in() {
        let f = Fixture::new().await;
        let mut own = remote_challenge("mine", &f.sponsor_id);
        own.sponsor_display_name = "MediTech Solutions".to_string();
        f.remote.insert_remote(own);
        f.remote.insert_remote(remote_challenge("theirs", &f.other_sponsor_id));

        let _handle = f.cache.start();
        f.cache.loaded().await;
        f.sign_in(SPONSOR_EMAIL).await;

        let state = f.wait_for(|s| !s.created_challenges.is_empty()).await;
        assert_eq!(ids(&state.created_challenges), vec!["mine"]);
        // Name comes from the joined listing, not the sponsor-only one
        assert_eq!(state.created_challenges[0].sponsor_display_name, "MediTech Solutions");
    }

    #[tokio::test]
    async fn test_sign_out_clears_per_user_data() {
        let f = Fixture::new().await;
        let _handle = f.cache.start();
        f.cache.loaded().await;
        f.sign_in(SPONSOR_EMAIL).await;

        let created = f.cache.create_challenge(draft("Triage Assistant")).await.unwrap();
        f.cache.accept_by_id(&ChallengeId::from("1")).unwrap();
        assert!(f.storage.get("acceptedChallenges").unwrap().is_some());

        f.sessions.sign_out().await.unwrap();
        let state = f
            .wait_for(|s| s.accepted_challenges.is_empty() && s.created_challenges.is_empty())
            .await;

        assert!(state.challenge(&created.id).is_some());
        assert!(f.storage.get("acceptedChallenges").unwrap().is_none());
    }
}

#[cfg(test)]
mod authoring_tests {
    use super::support::*;

    use auth::models::UserRole;
    use kernel::id::ChallengeId;
    use platform::storage::{MemoryStore, load_json_or_default};
    use std::sync::Arc;

    use crate::application::CacheConfig;
    use crate::domain::entities::{Challenge, ChallengePatch};
    use crate::domain::services::is_local_id;
    use crate::error::ArenaError;

    #[tokio::test]
    async fn test_create_requires_session_and_changes_nothing() {
        let f = Fixture::new().await;
        let before = f.cache.snapshot();

        let result = f.cache.create_challenge(draft("Triage Assistant")).await;
        assert!(matches!(result, Err(ArenaError::NotAuthenticated)));
        assert_eq!(f.cache.snapshot(), before);
    }

    #[tokio::test]
    async fn test_create_requires_sponsor_role() {
        let f = Fixture::new().await;
        f.sign_in(BUILDER_EMAIL).await;

        let result = f.cache.create_challenge(draft("Triage Assistant")).await;
        assert!(matches!(
            result,
            Err(ArenaError::RoleNotPermitted(UserRole::Sponsor))
        ));
    }

    #[tokio::test]
    async fn test_create_is_visible_everywhere_with_backend_id() {
        let f = Fixture::new().await;
        f.sign_in(SPONSOR_EMAIL).await;

        let created = f.cache.create_challenge(draft("Triage Assistant")).await.unwrap();

        assert!(created.id.is_uuid());
        assert_eq!(created.sponsor_id, Some(f.sponsor_id.clone()));
        assert_eq!(created.sponsor_display_name, "MediTech Solutions");
        assert_eq!(f.cache.get_challenge_by_id(&created.id), Some(created.clone()));
        assert!(f.cache.created_challenges().contains(&created));
        assert!(f.remote.remote_challenge(&created.id).is_some());
        assert!(!f.cache.all_challenges().iter().any(|c| is_local_id(&c.id)));
    }

    #[tokio::test]
    async fn test_local_only_create_keeps_local_id() {
        let f = Fixture::with(Arc::new(MemoryStore::new()), CacheConfig::development()).await;
        f.sign_in(SPONSOR_EMAIL).await;

        let first = f.cache.create_challenge(draft("One")).await.unwrap();
        let second = f.cache.create_challenge(draft("Two")).await.unwrap();

        assert!(is_local_id(&first.id));
        assert_ne!(first.id, second.id);
        assert!(f.remote.remote_challenge(&first.id).is_none());
        assert_eq!(f.cache.created_challenges().len(), 2);
    }

    #[tokio::test]
    async fn test_create_rolls_back_when_backend_refuses() {
        let f = Fixture::new().await;
        f.sign_in(SPONSOR_EMAIL).await;
        f.remote.set_writes_failing(true);
        let before = f.cache.all_challenges();

        let result = f.cache.create_challenge(draft("Triage Assistant")).await;
        assert!(matches!(result, Err(ArenaError::Remote(_))));
        assert_eq!(f.cache.all_challenges(), before);
        assert!(f.cache.created_challenges().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_blank_title() {
        let f = Fixture::new().await;
        f.sign_in(SPONSOR_EMAIL).await;

        let result = f.cache.create_challenge(draft("  ")).await;
        assert!(matches!(result, Err(ArenaError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_failure_keeps_then_success_removes() {
        let f = Fixture::new().await;
        f.sign_in(SPONSOR_EMAIL).await;
        let created = f.cache.create_challenge(draft("Triage Assistant")).await.unwrap();
        f.cache.accept_by_id(&created.id).unwrap();

        f.remote.set_writes_failing(true);
        let result = f.cache.delete_challenge(&created.id).await;
        assert!(matches!(result, Err(ArenaError::Remote(_))));
        assert!(f.cache.get_challenge_by_id(&created.id).is_some());
        assert!(f.cache.created_challenges().iter().any(|c| c.id == created.id));
        assert!(f.cache.is_accepted(&created.id));

        f.remote.set_writes_failing(false);
        assert!(f.cache.delete_challenge(&created.id).await.unwrap());
        assert!(f.cache.get_challenge_by_id(&created.id).is_none());
        assert!(f.cache.created_challenges().is_empty());
        assert!(!f.cache.is_accepted(&created.id));

        let stored: Vec<Challenge> = load_json_or_default(f.storage.as_ref(), "acceptedChallenges");
        assert!(stored.is_empty());
    }

    #[tokio::test]
    async fn test_delete_restores_when_backend_deleted_nothing() {
        let f = Fixture::new().await;
        f.sign_in(SPONSOR_EMAIL).await;
        let created = f.cache.create_challenge(draft("Triage Assistant")).await.unwrap();

        f.remote.remove_remote(&created.id);
        assert!(!f.cache.delete_challenge(&created.id).await.unwrap());
        assert!(f.cache.get_challenge_by_id(&created.id).is_some());
    }

    #[tokio::test]
    async fn test_update_replaces_everywhere() {
        let f = Fixture::new().await;
        f.sign_in(SPONSOR_EMAIL).await;
        let created = f.cache.create_challenge(draft("Triage Assistant")).await.unwrap();
        f.cache.accept_by_id(&created.id).unwrap();

        let patch = ChallengePatch {
            prize_text: Some("$6,500".to_string()),
            ..Default::default()
        };
        let updated = f.cache.update_challenge(&created.id, patch).await.unwrap();

        assert_eq!(updated.prize_text, "$6,500");
        assert_eq!(updated.sponsor_display_name, "MediTech Solutions");
        for list in [
            f.cache.all_challenges(),
            f.cache.created_challenges(),
            f.cache.accepted_challenges(),
        ] {
            let copy = list.iter().find(|c| c.id == created.id).unwrap();
            assert_eq!(copy.prize_text, "$6,500");
        }
        assert_eq!(
            f.remote.remote_challenge(&created.id).unwrap().prize_text,
            "$6,500"
        );
    }

    #[tokio::test]
    async fn test_update_failure_leaves_record_unchanged() {
        let f = Fixture::new().await;
        f.sign_in(SPONSOR_EMAIL).await;
        let created = f.cache.create_challenge(draft("Triage Assistant")).await.unwrap();

        f.remote.set_writes_failing(true);
        let patch = ChallengePatch {
            title: Some("Renamed".to_string()),
            ..Default::default()
        };
        let result = f.cache.update_challenge(&created.id, patch).await;

        assert!(matches!(result, Err(ArenaError::Remote(_))));
        assert_eq!(f.cache.get_challenge_by_id(&created.id), Some(created));
    }

    #[tokio::test]
    async fn test_seed_and_foreign_challenges_are_read_only() {
        let f = Fixture::new().await;
        f.remote
            .insert_remote(remote_challenge("theirs", &f.other_sponsor_id));
        f.cache.refresh().await;
        f.sign_in(SPONSOR_EMAIL).await;

        let seed = ChallengeId::from("1");
        assert!(matches!(
            f.cache.delete_challenge(&seed).await,
            Err(ArenaError::SeedReadOnly(_))
        ));

        let theirs = ChallengeId::from("theirs");
        let patch = ChallengePatch {
            title: Some("Mine now".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            f.cache.update_challenge(&theirs, patch).await,
            Err(ArenaError::NotChallengeOwner(_))
        ));
        assert!(matches!(
            f.cache.delete_challenge(&ChallengeId::from("missing")).await,
            Err(ArenaError::ChallengeNotFound(_))
        ));
    }
}

#[cfg(test)]
mod submission_tests {
    use super::support::*;

    use kernel::id::{ChallengeId, UserId};

    use crate::application::SubmitSolutionInput;
    use crate::error::ArenaError;

    fn input(f: &Fixture, challenge: &str, link: &str) -> SubmitSolutionInput {
        SubmitSolutionInput {
            challenge_id: ChallengeId::from(challenge),
            builder_id: f.builder_id.clone(),
            builder_name: String::new(),
            link: link.to_string(),
        }
    }

    #[tokio::test]
    async fn test_invalid_link_rejected_before_remote_write() {
        let f = Fixture::new().await;
        f.sign_in(BUILDER_EMAIL).await;

        let result = f.cache.submit_challenge(input(&f, "1", "not-a-url")).await;
        assert!(matches!(result, Err(ArenaError::InvalidLink(_))));
        assert_eq!(f.remote.submission_write_count(), 0);
        assert!(f.cache.submissions().is_empty());
    }

    #[tokio::test]
    async fn test_submission_lands_in_ledger_and_challenge() {
        let f = Fixture::new().await;
        f.sign_in(BUILDER_EMAIL).await;

        let submission = f
            .cache
            .submit_challenge(input(&f, "1", "https://github.com/ada/sentiment"))
            .await
            .unwrap();

        assert_eq!(submission.builder_display_name, "Ada Lovelace");
        assert_eq!(f.cache.submissions(), vec![submission.clone()]);
        let challenge = f.cache.get_challenge_by_id(&ChallengeId::from("1")).unwrap();
        assert_eq!(challenge.submissions, vec![submission]);
        assert_eq!(f.remote.submission_write_count(), 1);
    }

    #[tokio::test]
    async fn test_resubmission_appends_and_latest_is_current() {
        let f = Fixture::new().await;
        f.sign_in(BUILDER_EMAIL).await;

        f.cache
            .submit_challenge(input(&f, "2", "https://github.com/ada/triage-v1"))
            .await
            .unwrap();
        let second = f
            .cache
            .submit_challenge(input(&f, "2", "https://github.com/ada/triage-v2"))
            .await
            .unwrap();

        assert_eq!(f.cache.submissions().len(), 2);
        let current = f
            .cache
            .current_submission(&ChallengeId::from("2"), &f.builder_id)
            .unwrap();
        assert_eq!(current.id, second.id);
    }

    #[tokio::test]
    async fn test_submission_guards() {
        let f = Fixture::new().await;

        let anonymous = f.cache.submit_challenge(input(&f, "1", "https://a.dev")).await;
        assert!(matches!(anonymous, Err(ArenaError::NotAuthenticated)));

        f.sign_in(BUILDER_EMAIL).await;
        let mut other = input(&f, "1", "https://a.dev");
        other.builder_id = UserId::from("someone-else");
        assert!(matches!(
            f.cache.submit_challenge(other).await,
            Err(ArenaError::ActingAsOtherUser)
        ));

        let unknown = f.cache.submit_challenge(input(&f, "missing", "https://a.dev")).await;
        assert!(matches!(unknown, Err(ArenaError::ChallengeNotFound(_))));
    }

    #[tokio::test]
    async fn test_remote_submission_failure_leaves_ledger_empty() {
        let f = Fixture::new().await;
        f.sign_in(BUILDER_EMAIL).await;
        f.remote.set_writes_failing(true);

        let result = f.cache.submit_challenge(input(&f, "1", "https://a.dev")).await;
        assert!(matches!(result, Err(ArenaError::Remote(_))));
        assert!(f.cache.submissions().is_empty());
    }

    #[tokio::test]
    async fn test_read_throughs_degrade_to_empty() {
        let f = Fixture::new().await;
        f.sign_in(BUILDER_EMAIL).await;
        f.cache
            .submit_challenge(input(&f, "1", "https://github.com/ada/sentiment"))
            .await
            .unwrap();

        let mine = f.cache.get_user_submissions(&f.builder_id).await;
        assert_eq!(mine.len(), 1);
        let for_challenge = f
            .cache
            .get_submissions_for_challenge(&ChallengeId::from("1"))
            .await;
        assert_eq!(for_challenge.len(), 1);

        f.remote.set_offline(true);
        assert!(f.cache.get_user_submissions(&f.builder_id).await.is_empty());
        assert!(f
            .cache
            .get_submissions_for_challenge(&ChallengeId::from("1"))
            .await
            .is_empty());
    }
}
