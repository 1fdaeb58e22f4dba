//! Booking rule engine.
//!
//! Pure decision logic: given the actor, the target slot snapshot, the
//! current occupant's role, and the actor's usage for that day, decide
//! whether a claim may proceed and how. No I/O happens here; callers fetch
//! the inputs and must re-derive them after a storage conflict, because the
//! correct verdict can change with the new state.

use std::collections::BTreeSet;

use uuid::Uuid;

use crate::domain::actor::{Actor, Role, UserId};
use crate::domain::slot::{Slot, SlotStatus};

/// Default daily booking allowance in minutes (four hours).
pub const DEFAULT_MAX_DAILY_MINUTES: u32 = 240;

/// Default charge for an open-ended slot when summing daily usage.
pub const DEFAULT_FALLBACK_SLOT_MINUTES: u32 = 60;

/// How a permitted claim will transition the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimKind {
    /// The slot was free; this is a fresh booking.
    Booking,
    /// The slot was held by someone the actor may displace.
    Takeover,
}

/// Policy denial for a claim attempt.
///
/// Each denial maps to exactly one stable reason code consumed by callers;
/// the engine's job ends at producing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimDenial {
    /// The actor, or the current occupant, has no resolvable role.
    RoleMissing,
    /// The actor already holds this very slot.
    AlreadyOwned,
    /// Students never displace an existing booking.
    StudentOverride,
    /// Teachers never displace another teacher.
    TeacherOverridesTeacher,
    /// The booking would exceed the actor's daily allowance.
    DailyCapExceeded,
    /// The actor already books a different room that day.
    MultipleRooms,
}

impl ClaimDenial {
    /// Stable reason code surfaced to callers.
    pub fn reason_code(self) -> &'static str {
        match self {
            Self::RoleMissing => "owner_role_missing",
            Self::AlreadyOwned => "already_taken",
            Self::StudentOverride => "student_cannot_override",
            Self::TeacherOverridesTeacher => "teacher_cannot_override_teacher",
            Self::DailyCapExceeded => "max_hours_exceeded",
            Self::MultipleRooms => "multi_room_not_allowed",
        }
    }
}

/// An actor's current bookings for one calendar day, derived from the ledger
/// at decision time rather than kept as a counter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyUsage {
    booked_minutes: i64,
    facilities: BTreeSet<Uuid>,
}

impl DailyUsage {
    /// Aggregate usage from the slots an actor currently holds that day.
    ///
    /// Open-ended slots are charged `fallback_slot_minutes`.
    pub fn from_slots(slots: &[Slot], fallback_slot_minutes: u32) -> Self {
        let fallback = i64::from(fallback_slot_minutes);
        let mut usage = Self::default();
        for slot in slots {
            usage.booked_minutes += slot.duration_minutes().unwrap_or(fallback);
            usage.facilities.insert(slot.facility_id());
        }
        usage
    }

    /// Total minutes currently booked.
    pub fn booked_minutes(&self) -> i64 {
        self.booked_minutes
    }

    /// Whether the actor holds a booking at a facility other than `facility_id`.
    pub fn books_other_facility(&self, facility_id: Uuid) -> bool {
        self.facilities.iter().any(|held| *held != facility_id)
    }
}

/// Configurable booking limits and override rules.
///
/// The cap values and the single-room rule vary between deployments, so they
/// are parameters rather than constants.
#[derive(Debug, Clone)]
pub struct BookingPolicy {
    max_daily_minutes: u32,
    fallback_slot_minutes: u32,
    single_room_per_day: bool,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            max_daily_minutes: DEFAULT_MAX_DAILY_MINUTES,
            fallback_slot_minutes: DEFAULT_FALLBACK_SLOT_MINUTES,
            single_room_per_day: true,
        }
    }
}

impl BookingPolicy {
    /// Override the daily allowance in minutes.
    pub fn with_max_daily_minutes(mut self, minutes: u32) -> Self {
        self.max_daily_minutes = minutes;
        self
    }

    /// Override the charge for open-ended slots.
    pub fn with_fallback_slot_minutes(mut self, minutes: u32) -> Self {
        self.fallback_slot_minutes = minutes;
        self
    }

    /// Toggle the one-room-per-day restriction.
    pub fn with_single_room_per_day(mut self, enabled: bool) -> Self {
        self.single_room_per_day = enabled;
        self
    }

    /// Charge applied to open-ended slots when summing usage.
    pub fn fallback_slot_minutes(&self) -> u32 {
        self.fallback_slot_minutes
    }

    /// Decide whether `actor` may claim `slot`.
    ///
    /// `occupant_role` is the resolved role of the slot's current owner and
    /// is only consulted when the slot is occupied. `usage` covers the slot's
    /// calendar day.
    pub fn evaluate_claim(
        &self,
        actor: &Actor,
        slot: &Slot,
        occupant_role: Option<Role>,
        usage: &DailyUsage,
    ) -> Result<ClaimKind, ClaimDenial> {
        let Some(actor_role) = actor.role else {
            return Err(ClaimDenial::RoleMissing);
        };

        let kind = match slot.status() {
            SlotStatus::Available => ClaimKind::Booking,
            SlotStatus::Occupied if slot.owner() == Some(&actor.id) => {
                return Err(ClaimDenial::AlreadyOwned);
            }
            SlotStatus::Occupied => match actor_role {
                Role::Student => return Err(ClaimDenial::StudentOverride),
                Role::Teacher => match occupant_role {
                    None => return Err(ClaimDenial::RoleMissing),
                    Some(Role::Teacher) => return Err(ClaimDenial::TeacherOverridesTeacher),
                    Some(Role::Student) => ClaimKind::Takeover,
                },
            },
        };

        let candidate_minutes = slot
            .duration_minutes()
            .unwrap_or(i64::from(self.fallback_slot_minutes));
        if usage.booked_minutes() + candidate_minutes > i64::from(self.max_daily_minutes) {
            return Err(ClaimDenial::DailyCapExceeded);
        }
        if self.single_room_per_day && usage.books_other_facility(slot.facility_id()) {
            return Err(ClaimDenial::MultipleRooms);
        }

        Ok(kind)
    }

    /// Whether `actor_id` may release `slot`: only the current owner can.
    ///
    /// The release operation itself delegates this check to the ledger's
    /// conditional write; this helper exists for read-side filtering of
    /// cancellable bookings.
    pub fn can_release(actor_id: &UserId, slot: &Slot) -> bool {
        slot.owner() == Some(actor_id)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::{TimeZone, Utc};
    use rstest::{fixture, rstest};

    fn slot_at(facility_id: Uuid, hour: u32, minutes: i64, owner: Option<UserId>) -> Slot {
        let starts_at = Utc
            .with_ymd_and_hms(2025, 12, 4, hour, 0, 0)
            .single()
            .expect("valid timestamp");
        let draft = crate::domain::slot::SlotDraft {
            id: Uuid::new_v4(),
            facility_id,
            title: "Lokale".to_owned(),
            starts_at,
            ends_at: Some(starts_at + chrono::Duration::minutes(minutes)),
            status: owner
                .as_ref()
                .map_or(SlotStatus::Available, |_| SlotStatus::Occupied),
            owner,
        };
        Slot::new(draft).expect("valid slot")
    }

    #[fixture]
    fn policy() -> BookingPolicy {
        BookingPolicy::default()
    }

    #[rstest]
    #[case(Role::Student)]
    #[case(Role::Teacher)]
    fn free_slot_is_claimable_by_either_role(policy: BookingPolicy, #[case] role: Role) {
        let actor = Actor::new(UserId::random(), role);
        let slot = slot_at(Uuid::new_v4(), 10, 60, None);

        let verdict = policy.evaluate_claim(&actor, &slot, None, &DailyUsage::default());
        assert_eq!(verdict, Ok(ClaimKind::Booking));
    }

    #[rstest]
    fn actor_without_role_is_denied(policy: BookingPolicy) {
        let actor = Actor::without_role(UserId::random());
        let slot = slot_at(Uuid::new_v4(), 10, 60, None);

        let verdict = policy.evaluate_claim(&actor, &slot, None, &DailyUsage::default());
        assert_eq!(verdict, Err(ClaimDenial::RoleMissing));
    }

    #[rstest]
    #[case(Some(Role::Student))]
    #[case(Some(Role::Teacher))]
    fn student_never_overrides(policy: BookingPolicy, #[case] occupant_role: Option<Role>) {
        let actor = Actor::new(UserId::random(), Role::Student);
        let slot = slot_at(Uuid::new_v4(), 10, 60, Some(UserId::random()));

        let verdict = policy.evaluate_claim(&actor, &slot, occupant_role, &DailyUsage::default());
        assert_eq!(verdict, Err(ClaimDenial::StudentOverride));
    }

    #[rstest]
    fn teacher_takes_over_student_booking(policy: BookingPolicy) {
        let actor = Actor::new(UserId::random(), Role::Teacher);
        let slot = slot_at(Uuid::new_v4(), 10, 60, Some(UserId::random()));

        let verdict =
            policy.evaluate_claim(&actor, &slot, Some(Role::Student), &DailyUsage::default());
        assert_eq!(verdict, Ok(ClaimKind::Takeover));
    }

    #[rstest]
    fn teacher_never_overrides_teacher(policy: BookingPolicy) {
        let actor = Actor::new(UserId::random(), Role::Teacher);
        let slot = slot_at(Uuid::new_v4(), 10, 60, Some(UserId::random()));

        let verdict =
            policy.evaluate_claim(&actor, &slot, Some(Role::Teacher), &DailyUsage::default());
        assert_eq!(verdict, Err(ClaimDenial::TeacherOverridesTeacher));
    }

    #[rstest]
    fn reclaiming_an_owned_slot_is_denied(policy: BookingPolicy) {
        let actor = Actor::new(UserId::random(), Role::Teacher);
        let slot = slot_at(Uuid::new_v4(), 10, 60, Some(actor.id.clone()));

        let verdict =
            policy.evaluate_claim(&actor, &slot, Some(Role::Teacher), &DailyUsage::default());
        assert_eq!(verdict, Err(ClaimDenial::AlreadyOwned));
    }

    #[rstest]
    fn occupant_without_role_blocks_takeover(policy: BookingPolicy) {
        let actor = Actor::new(UserId::random(), Role::Teacher);
        let slot = slot_at(Uuid::new_v4(), 10, 60, Some(UserId::random()));

        let verdict = policy.evaluate_claim(&actor, &slot, None, &DailyUsage::default());
        assert_eq!(verdict, Err(ClaimDenial::RoleMissing));
    }

    #[rstest]
    fn daily_cap_counts_the_candidate_slot(policy: BookingPolicy) {
        let actor = Actor::new(UserId::random(), Role::Student);
        let facility = Uuid::new_v4();
        let held: Vec<Slot> = (9..12)
            .map(|hour| slot_at(facility, hour, 60, Some(actor.id.clone())))
            .collect();
        let usage = DailyUsage::from_slots(&held, DEFAULT_FALLBACK_SLOT_MINUTES);

        // Three hours held; one more fits exactly, ninety minutes does not.
        let hour_slot = slot_at(facility, 13, 60, None);
        assert_eq!(
            policy.evaluate_claim(&actor, &hour_slot, None, &usage),
            Ok(ClaimKind::Booking)
        );

        let long_slot = slot_at(facility, 13, 90, None);
        assert_eq!(
            policy.evaluate_claim(&actor, &long_slot, None, &usage),
            Err(ClaimDenial::DailyCapExceeded)
        );
    }

    #[rstest]
    fn open_ended_slots_are_charged_the_fallback(policy: BookingPolicy) {
        let actor = Actor::new(UserId::random(), Role::Student);
        let facility = Uuid::new_v4();
        let open_ended = Slot::available(Uuid::new_v4(), facility, "Lokale", Utc::now(), None)
            .expect("valid slot")
            .claimed_by(actor.id.clone());
        let usage = DailyUsage::from_slots(std::slice::from_ref(&open_ended), 240);

        let slot = slot_at(facility, 13, 60, None);
        assert_eq!(
            policy.evaluate_claim(&actor, &slot, None, &usage),
            Err(ClaimDenial::DailyCapExceeded)
        );
    }

    #[rstest]
    fn second_room_on_the_same_day_is_denied(policy: BookingPolicy) {
        let actor = Actor::new(UserId::random(), Role::Student);
        let held = vec![slot_at(Uuid::new_v4(), 9, 60, Some(actor.id.clone()))];
        let usage = DailyUsage::from_slots(&held, DEFAULT_FALLBACK_SLOT_MINUTES);

        let elsewhere = slot_at(Uuid::new_v4(), 13, 60, None);
        assert_eq!(
            policy.evaluate_claim(&actor, &elsewhere, None, &usage),
            Err(ClaimDenial::MultipleRooms)
        );
    }

    #[rstest]
    fn same_room_is_fine_under_single_room_policy(policy: BookingPolicy) {
        let actor = Actor::new(UserId::random(), Role::Student);
        let facility = Uuid::new_v4();
        let held = vec![slot_at(facility, 9, 60, Some(actor.id.clone()))];
        let usage = DailyUsage::from_slots(&held, DEFAULT_FALLBACK_SLOT_MINUTES);

        let same_room = slot_at(facility, 13, 60, None);
        assert_eq!(
            policy.evaluate_claim(&actor, &same_room, None, &usage),
            Ok(ClaimKind::Booking)
        );
    }

    #[rstest]
    fn multi_room_rule_can_be_disabled() {
        let policy = BookingPolicy::default().with_single_room_per_day(false);
        let actor = Actor::new(UserId::random(), Role::Student);
        let held = vec![slot_at(Uuid::new_v4(), 9, 60, Some(actor.id.clone()))];
        let usage = DailyUsage::from_slots(&held, DEFAULT_FALLBACK_SLOT_MINUTES);

        let elsewhere = slot_at(Uuid::new_v4(), 13, 60, None);
        assert_eq!(
            policy.evaluate_claim(&actor, &elsewhere, None, &usage),
            Ok(ClaimKind::Booking)
        );
    }

    #[rstest]
    fn cap_is_checked_before_the_room_rule(policy: BookingPolicy) {
        let actor = Actor::new(UserId::random(), Role::Student);
        let held: Vec<Slot> = (8..12)
            .map(|hour| slot_at(Uuid::new_v4(), hour, 60, Some(actor.id.clone())))
            .collect();
        let usage = DailyUsage::from_slots(&held, DEFAULT_FALLBACK_SLOT_MINUTES);

        let elsewhere = slot_at(Uuid::new_v4(), 13, 60, None);
        assert_eq!(
            policy.evaluate_claim(&actor, &elsewhere, None, &usage),
            Err(ClaimDenial::DailyCapExceeded)
        );
    }

    #[rstest]
    fn only_the_owner_may_release() {
        let owner = UserId::random();
        let slot = slot_at(Uuid::new_v4(), 10, 60, Some(owner.clone()));

        assert!(BookingPolicy::can_release(&owner, &slot));
        assert!(!BookingPolicy::can_release(&UserId::random(), &slot));
        assert!(!BookingPolicy::can_release(&owner, &slot.released()));
    }
}
