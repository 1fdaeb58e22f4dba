//! Slot aggregate: one bookable time interval at one facility.
//!
//! Ownership and occupancy move together. A slot is either Available with no
//! owner or Occupied with exactly one owner; the constructor refuses any
//! other combination so adapters cannot smuggle an inconsistent row into the
//! domain.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::actor::UserId;

/// Occupancy state of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    /// Free to claim.
    Available,
    /// Held by exactly one owner.
    Occupied,
}

impl SlotStatus {
    /// Stable label used by storage adapters.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Occupied => "occupied",
        }
    }

    /// Parse a storage label back into a status.
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "available" => Some(Self::Available),
            "occupied" => Some(Self::Occupied),
            _ => None,
        }
    }
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors returned by [`Slot::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotValidationError {
    /// An available slot carried an owner.
    AvailableWithOwner,
    /// An occupied slot carried no owner.
    OccupiedWithoutOwner,
    /// The interval ends at or before it starts.
    EndsBeforeStarts,
}

impl fmt::Display for SlotValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AvailableWithOwner => write!(f, "available slot must not have an owner"),
            Self::OccupiedWithoutOwner => write!(f, "occupied slot must have an owner"),
            Self::EndsBeforeStarts => write!(f, "slot must end after it starts"),
        }
    }
}

impl std::error::Error for SlotValidationError {}

/// Unvalidated field bundle consumed by [`Slot::new`].
#[derive(Debug, Clone)]
pub struct SlotDraft {
    /// Unique slot identifier.
    pub id: Uuid,
    /// Facility the slot belongs to.
    pub facility_id: Uuid,
    /// Denormalised display summary.
    pub title: String,
    /// Interval start.
    pub starts_at: DateTime<Utc>,
    /// Interval end; `None` means open-ended.
    pub ends_at: Option<DateTime<Utc>>,
    /// Occupancy state.
    pub status: SlotStatus,
    /// Current owner, required exactly when occupied.
    pub owner: Option<UserId>,
}

/// One bookable time interval at one facility.
///
/// ## Invariants
/// - `owner` is present if and only if `status` is [`SlotStatus::Occupied`].
/// - `starts_at < ends_at` whenever `ends_at` is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    id: Uuid,
    facility_id: Uuid,
    title: String,
    starts_at: DateTime<Utc>,
    ends_at: Option<DateTime<Utc>>,
    status: SlotStatus,
    owner: Option<UserId>,
}

impl Slot {
    /// Validate a draft and construct a slot.
    pub fn new(draft: SlotDraft) -> Result<Self, SlotValidationError> {
        match (draft.status, draft.owner.is_some()) {
            (SlotStatus::Available, true) => return Err(SlotValidationError::AvailableWithOwner),
            (SlotStatus::Occupied, false) => return Err(SlotValidationError::OccupiedWithoutOwner),
            _ => {}
        }
        if let Some(ends_at) = draft.ends_at {
            if ends_at <= draft.starts_at {
                return Err(SlotValidationError::EndsBeforeStarts);
            }
        }

        Ok(Self {
            id: draft.id,
            facility_id: draft.facility_id,
            title: draft.title,
            starts_at: draft.starts_at,
            ends_at: draft.ends_at,
            status: draft.status,
            owner: draft.owner,
        })
    }

    /// Construct an available, ownerless slot.
    pub fn available(
        id: Uuid,
        facility_id: Uuid,
        title: impl Into<String>,
        starts_at: DateTime<Utc>,
        ends_at: Option<DateTime<Utc>>,
    ) -> Result<Self, SlotValidationError> {
        Self::new(SlotDraft {
            id,
            facility_id,
            title: title.into(),
            starts_at,
            ends_at,
            status: SlotStatus::Available,
            owner: None,
        })
    }

    /// Unique slot identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Facility the slot belongs to.
    pub fn facility_id(&self) -> Uuid {
        self.facility_id
    }

    /// Denormalised display summary.
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Interval start.
    pub fn starts_at(&self) -> DateTime<Utc> {
        self.starts_at
    }

    /// Interval end; `None` means open-ended.
    pub fn ends_at(&self) -> Option<DateTime<Utc>> {
        self.ends_at
    }

    /// Occupancy state.
    pub fn status(&self) -> SlotStatus {
        self.status
    }

    /// Current owner, present exactly when occupied.
    pub fn owner(&self) -> Option<&UserId> {
        self.owner.as_ref()
    }

    /// Calendar day the slot starts on (UTC).
    pub fn day(&self) -> NaiveDate {
        self.starts_at.date_naive()
    }

    /// Interval length in whole minutes, `None` when open-ended.
    pub fn duration_minutes(&self) -> Option<i64> {
        self.ends_at
            .map(|ends_at| (ends_at - self.starts_at).num_minutes())
    }

    /// The same interval held by `owner`. Preserves the ownership invariant
    /// by construction.
    pub fn claimed_by(&self, owner: UserId) -> Self {
        let mut next = self.clone();
        next.status = SlotStatus::Occupied;
        next.owner = Some(owner);
        next
    }

    /// The same interval returned to the free pool.
    pub fn released(&self) -> Self {
        let mut next = self.clone();
        next.status = SlotStatus::Available;
        next.owner = None;
        next
    }
}

/// Half-open UTC window `[00:00, 00:00 next day)` for a calendar day.
///
/// Day searches and daily usage aggregation both anchor to UTC midnight so
/// they always agree on which slots belong to a day.
pub fn day_window(day: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = day.and_time(NaiveTime::MIN).and_utc();
    (start, start + Duration::hours(24))
}
