//! Domain Services
//!
//! Pure functions over challenge collections.

use kernel::id::{ChallengeId, UserId};

use crate::domain::entities::{Challenge, Submission};

/// Prefix of ids assigned before the backend has seen a record
pub const LOCAL_ID_PREFIX: &str = "local-";

/// Whether the record only exists locally
pub fn is_local_id(id: &ChallengeId) -> bool {
    id.as_str().starts_with(LOCAL_ID_PREFIX)
}

/// `local-<millis>`, suffixed with `-<n>` until `taken` says it is free
pub fn local_challenge_id(now_millis: i64, taken: impl Fn(&ChallengeId) -> bool) -> ChallengeId {
    let base = format!("{LOCAL_ID_PREFIX}{now_millis}");
    let mut candidate = ChallengeId::from(base.as_str());
    let mut n = 1u32;
    while taken(&candidate) {
        candidate = ChallengeId::from(format!("{base}-{n}"));
        n += 1;
    }
    candidate
}

/// Append every incoming record whose id is unknown; returns how many
///
/// Existing records are never replaced and nothing is removed.
pub fn merge_additive<I>(target: &mut Vec<Challenge>, incoming: I) -> usize
where
    I: IntoIterator<Item = Challenge>,
{
    let before = target.len();
    for challenge in incoming {
        if !target.iter().any(|c| c.id == challenge.id) {
            target.push(challenge);
        }
    }
    target.len() - before
}

/// Replace the record with the same id; returns whether one was found
pub fn replace_by_id(target: &mut [Challenge], challenge: &Challenge) -> bool {
    match target.iter_mut().find(|c| c.id == challenge.id) {
        Some(slot) => {
            *slot = challenge.clone();
            true
        }
        None => false,
    }
}

/// Remove the record with `id`, returning it with its position
pub fn take_by_id(target: &mut Vec<Challenge>, id: &ChallengeId) -> Option<(usize, Challenge)> {
    let index = target.iter().position(|c| &c.id == id)?;
    Some((index, target.remove(index)))
}

/// Put a record back where [`take_by_id`] found it
pub fn restore_at(target: &mut Vec<Challenge>, index: usize, challenge: Challenge) {
    if target.iter().any(|c| c.id == challenge.id) {
        return;
    }
    let index = index.min(target.len());
    target.insert(index, challenge);
}

/// Latest ledger entry for the pair; later entries win ties
pub fn latest_submission<'a>(
    ledger: &'a [Submission],
    challenge_id: &ChallengeId,
    builder_id: &UserId,
) -> Option<&'a Submission> {
    ledger
        .iter()
        .enumerate()
        .filter(|(_, s)| &s.challenge_id == challenge_id && &s.builder_id == builder_id)
        .max_by_key(|(index, s)| (s.submitted_at, *index))
        .map(|(_, s)| s)
}
