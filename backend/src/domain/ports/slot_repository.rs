//! Port for the slot ledger: durable slot rows with conditional updates.
//!
//! The ledger is the only shared mutable state in the system, so all race
//! safety lives behind this trait. Claim and release push their precondition
//! into a single conditional write; when the row no longer matches what the
//! caller observed, the adapter answers [`SlotRepositoryError::StateConflict`]
//! instead of applying the change. Exactly one of any set of racing claims on
//! a slot succeeds.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::actor::UserId;
use crate::domain::slot::{Slot, SlotStatus, day_window};

use super::define_port_error;

define_port_error! {
    /// Errors raised by slot ledger adapters.
    pub enum SlotRepositoryError {
        /// Ledger connection could not be established.
        Connection { message: String } =>
            "slot ledger connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "slot ledger query failed: {message}",
        /// The row no longer matched the write's precondition.
        StateConflict { slot_id: String } =>
            "slot {slot_id} changed underneath the requested update",
    }
}

/// Port for slot storage with compare-and-swap state transitions.
///
/// # Conditional writes
///
/// `claim` and `release` must apply their mutation and precondition check in
/// one atomic step — the storage layer's row-level serialization decides the
/// winner of a race, never an application-side read-then-write.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SlotRepository: Send + Sync {
    /// Fetch a slot by its identifier.
    async fn find_by_id(&self, slot_id: &Uuid) -> Result<Option<Slot>, SlotRepositoryError>;

    /// All slots starting within the UTC day window, unordered.
    async fn list_for_day(&self, day: NaiveDate) -> Result<Vec<Slot>, SlotRepositoryError>;

    /// Occupied slots owned by `owner` starting within the UTC day window.
    async fn list_owned_for_day(
        &self,
        owner: &UserId,
        day: NaiveDate,
    ) -> Result<Vec<Slot>, SlotRepositoryError>;

    /// Transition a slot to occupied under `new_owner`, but only while the
    /// row still carries `expected_status` and `expected_owner`.
    ///
    /// Returns the updated row, or [`SlotRepositoryError::StateConflict`]
    /// when another writer got there first. The expected occupant is part of
    /// the precondition because the caller's rule verdict depends on who
    /// holds the slot, not just that somebody does.
    async fn claim(
        &self,
        slot_id: &Uuid,
        expected_status: SlotStatus,
        expected_owner: Option<UserId>,
        new_owner: UserId,
    ) -> Result<Slot, SlotRepositoryError>;

    /// Return a slot to the free pool, but only while `owner` still holds it.
    ///
    /// [`SlotRepositoryError::StateConflict`] covers "already released",
    /// "held by someone else", and "no such slot" alike; callers do not need
    /// the distinction.
    async fn release(&self, slot_id: &Uuid, owner: UserId) -> Result<Slot, SlotRepositoryError>;
}

/// Mutex-guarded in-memory ledger.
///
/// Backs unit and integration tests, and serves as the fallback ledger when
/// the server runs without a database. The mutex is held only for the
/// duration of the compare-and-swap, never across an await, which gives the
/// same exactly-one-winner guarantee the SQL adapter gets from row locking.
#[derive(Debug, Default)]
pub struct InMemorySlotRepository {
    slots: std::sync::Mutex<std::collections::HashMap<Uuid, Slot>>,
}

impl InMemorySlotRepository {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger pre-populated with `slots`.
    pub fn seeded(slots: impl IntoIterator<Item = Slot>) -> Self {
        let ledger = Self::new();
        {
            let mut table = ledger.slots.lock().unwrap_or_else(|e| e.into_inner());
            for slot in slots {
                table.insert(slot.id(), slot);
            }
        }
        ledger
    }

    /// Current state of a slot, for test assertions.
    pub fn snapshot(&self, slot_id: &Uuid) -> Option<Slot> {
        self.slots
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(slot_id)
            .cloned()
    }

    fn lock(
        &self,
    ) -> std::sync::MutexGuard<'_, std::collections::HashMap<Uuid, Slot>> {
        // A poisoned lock only means another test thread panicked mid-write;
        // the map itself is still structurally sound.
        self.slots.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl SlotRepository for InMemorySlotRepository {
    async fn find_by_id(&self, slot_id: &Uuid) -> Result<Option<Slot>, SlotRepositoryError> {
        Ok(self.lock().get(slot_id).cloned())
    }

    async fn list_for_day(&self, day: NaiveDate) -> Result<Vec<Slot>, SlotRepositoryError> {
        let (start, end) = day_window(day);
        Ok(self
            .lock()
            .values()
            .filter(|slot| slot.starts_at() >= start && slot.starts_at() < end)
            .cloned()
            .collect())
    }

    async fn list_owned_for_day(
        &self,
        owner: &UserId,
        day: NaiveDate,
    ) -> Result<Vec<Slot>, SlotRepositoryError> {
        let (start, end) = day_window(day);
        Ok(self
            .lock()
            .values()
            .filter(|slot| {
                slot.owner() == Some(owner)
                    && slot.starts_at() >= start
                    && slot.starts_at() < end
            })
            .cloned()
            .collect())
    }

    async fn claim(
        &self,
        slot_id: &Uuid,
        expected_status: SlotStatus,
        expected_owner: Option<UserId>,
        new_owner: UserId,
    ) -> Result<Slot, SlotRepositoryError> {
        let mut table = self.lock();
        let Some(slot) = table.get_mut(slot_id) else {
            return Err(SlotRepositoryError::state_conflict(slot_id.to_string()));
        };
        if slot.status() != expected_status || slot.owner() != expected_owner.as_ref() {
            return Err(SlotRepositoryError::state_conflict(slot_id.to_string()));
        }
        *slot = slot.claimed_by(new_owner);
        Ok(slot.clone())
    }

    async fn release(
        &self,
        slot_id: &Uuid,
        owner: UserId,
    ) -> Result<Slot, SlotRepositoryError> {
        let mut table = self.lock();
        let Some(slot) = table.get_mut(slot_id) else {
            return Err(SlotRepositoryError::state_conflict(slot_id.to_string()));
        };
        if slot.owner() != Some(&owner) {
            return Err(SlotRepositoryError::state_conflict(slot_id.to_string()));
        }
        *slot = slot.released();
        Ok(slot.clone())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn seeded_slot() -> (InMemorySlotRepository, Uuid) {
        let starts_at = Utc
            .with_ymd_and_hms(2025, 12, 4, 10, 0, 0)
            .single()
            .expect("valid timestamp");
        let slot = Slot::available(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Lokale 2.03",
            starts_at,
            Some(starts_at + chrono::Duration::hours(1)),
        )
        .expect("valid slot");
        let id = slot.id();
        (InMemorySlotRepository::seeded([slot]), id)
    }

    #[rstest]
    #[tokio::test]
    async fn claim_succeeds_when_precondition_holds() {
        let (repo, slot_id) = seeded_slot();
        let owner = UserId::random();

        let claimed = repo
            .claim(&slot_id, SlotStatus::Available, None, owner.clone())
            .await
            .expect("claim succeeds");

        assert_eq!(claimed.status(), SlotStatus::Occupied);
        assert_eq!(claimed.owner(), Some(&owner));
    }

    #[rstest]
    #[tokio::test]
    async fn stale_precondition_is_a_conflict() {
        let (repo, slot_id) = seeded_slot();
        let winner = UserId::random();
        repo.claim(&slot_id, SlotStatus::Available, None, winner.clone())
            .await
            .expect("first claim succeeds");

        let err = repo
            .claim(&slot_id, SlotStatus::Available, None, UserId::random())
            .await
            .expect_err("stale claim conflicts");
        assert!(matches!(err, SlotRepositoryError::StateConflict { .. }));

        // The winner keeps the slot.
        assert_eq!(repo.snapshot(&slot_id).and_then(|s| s.owner().cloned()), Some(winner));
    }

    #[rstest]
    #[tokio::test]
    async fn takeover_precondition_checks_the_occupant() {
        let (repo, slot_id) = seeded_slot();
        let student = UserId::random();
        repo.claim(&slot_id, SlotStatus::Available, None, student.clone())
            .await
            .expect("student claim succeeds");

        // Precondition names a different occupant: refused.
        let err = repo
            .claim(
                &slot_id,
                SlotStatus::Occupied,
                Some(UserId::random()),
                UserId::random(),
            )
            .await
            .expect_err("wrong occupant conflicts");
        assert!(matches!(err, SlotRepositoryError::StateConflict { .. }));

        // Precondition matches the real occupant: applied.
        let teacher = UserId::random();
        let taken = repo
            .claim(&slot_id, SlotStatus::Occupied, Some(student), teacher.clone())
            .await
            .expect("takeover succeeds");
        assert_eq!(taken.owner(), Some(&teacher));
    }

    #[rstest]
    #[tokio::test]
    async fn release_requires_the_owner() {
        let (repo, slot_id) = seeded_slot();
        let owner = UserId::random();
        repo.claim(&slot_id, SlotStatus::Available, None, owner.clone())
            .await
            .expect("claim succeeds");

        let err = repo
            .release(&slot_id, UserId::random())
            .await
            .expect_err("non-owner cannot release");
        assert!(matches!(err, SlotRepositoryError::StateConflict { .. }));

        let released = repo.release(&slot_id, owner).await.expect("owner releases");
        assert_eq!(released.status(), SlotStatus::Available);
        assert!(released.owner().is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn releasing_a_free_slot_is_a_conflict() {
        let (repo, slot_id) = seeded_slot();
        let err = repo
            .release(&slot_id, UserId::random())
            .await
            .expect_err("free slot cannot be released");
        assert!(matches!(err, SlotRepositoryError::StateConflict { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_slot_is_a_conflict() {
        let (repo, _) = seeded_slot();
        let err = repo
            .claim(&Uuid::new_v4(), SlotStatus::Available, None, UserId::random())
            .await
            .expect_err("unknown slot conflicts");
        assert!(matches!(err, SlotRepositoryError::StateConflict { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn day_listing_filters_by_window_and_owner() {
        let day_start = Utc
            .with_ymd_and_hms(2025, 12, 4, 9, 0, 0)
            .single()
            .expect("valid timestamp");
        let owner = UserId::random();
        let facility = Uuid::new_v4();
        let todays = Slot::available(Uuid::new_v4(), facility, "A", day_start, None)
            .expect("valid slot")
            .claimed_by(owner.clone());
        let tomorrows = Slot::available(
            Uuid::new_v4(),
            facility,
            "B",
            day_start + chrono::Duration::hours(24),
            None,
        )
        .expect("valid slot");
        let repo = InMemorySlotRepository::seeded([todays.clone(), tomorrows]);

        let day = day_start.date_naive();
        let listed = repo.list_for_day(day).await.expect("list succeeds");
        assert_eq!(listed.len(), 1);

        let owned = repo
            .list_owned_for_day(&owner, day)
            .await
            .expect("owned list succeeds");
        assert_eq!(owned, vec![todays]);

        let stranger = repo
            .list_owned_for_day(&UserId::random(), day)
            .await
            .expect("owned list succeeds");
        assert!(stranger.is_empty());
    }
}
