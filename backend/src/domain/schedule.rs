//! Day schedule projection: role-filtered facility/slot groupings.
//!
//! Pure functions only; the schedule service fetches slots and facilities
//! through ports and hands them here. Visibility rules: students see only
//! free slots in shared facilities, teachers see everything partitioned into
//! shared, teaching, and open-learning sections so occupied slots remain
//! visible for takeover.

use std::cmp::Ordering;
use std::collections::HashMap;

use uuid::Uuid;

use crate::domain::facility::{Facility, FacilityCategory};
use crate::domain::slot::{Slot, SlotStatus};

/// Which visibility rules apply to a schedule request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Student-filtered view: shared facilities, free slots only.
    Student,
    /// Unfiltered view: every slot, grouped by facility category.
    Teacher,
}

impl ViewMode {
    /// Interpret the optional `mode` query parameter; anything other than an
    /// explicit `teacher` request falls back to the filtered view.
    pub fn from_mode_param(mode: Option<&str>) -> Self {
        match mode {
            Some("teacher") => Self::Teacher,
            _ => Self::Student,
        }
    }
}

/// One facility together with its visible slots, ordered by start time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacilitySlots {
    /// Facility metadata.
    pub facility: Facility,
    /// Slots starting on the requested day, ascending by start.
    pub slots: Vec<Slot>,
}

/// Role-filtered schedule for one calendar day.
///
/// Student views only populate `shared`; teacher views fill all three
/// sections. Facilities without visible slots that day are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DaySchedule {
    /// Facilities bookable by everyone.
    pub shared: Vec<FacilitySlots>,
    /// Teaching rooms.
    pub teaching: Vec<FacilitySlots>,
    /// Open-learning areas.
    pub open_learning: Vec<FacilitySlots>,
}

/// Join a day's slots with facility metadata and apply visibility rules.
pub fn build_day_schedule(
    facilities: Vec<Facility>,
    slots: Vec<Slot>,
    view: ViewMode,
    teacher_only_markers: &[String],
) -> DaySchedule {
    let catalogue: HashMap<Uuid, Facility> = facilities
        .into_iter()
        .map(|facility| (facility.id, facility))
        .collect();

    let mut grouped: HashMap<Uuid, Vec<Slot>> = HashMap::new();
    for slot in slots {
        // Slots pointing at an unknown facility cannot be rendered; skip them.
        if !catalogue.contains_key(&slot.facility_id()) {
            continue;
        }
        if view == ViewMode::Student && slot.status() != SlotStatus::Available {
            continue;
        }
        grouped.entry(slot.facility_id()).or_default().push(slot);
    }

    let mut schedule = DaySchedule::default();
    for (facility_id, mut facility_slots) in grouped {
        let Some(facility) = catalogue.get(&facility_id).cloned() else {
            continue;
        };

        let section = match facility.category {
            FacilityCategory::Shared if facility.is_teacher_reserved(teacher_only_markers) => {
                FacilityCategory::Teaching
            }
            category => category,
        };
        if view == ViewMode::Student && section != FacilityCategory::Shared {
            continue;
        }

        facility_slots.sort_by_key(Slot::starts_at);
        let entry = FacilitySlots {
            facility,
            slots: facility_slots,
        };
        match section {
            FacilityCategory::Shared => schedule.shared.push(entry),
            FacilityCategory::Teaching => schedule.teaching.push(entry),
            FacilityCategory::OpenLearning => schedule.open_learning.push(entry),
        }
    }

    for section in [
        &mut schedule.shared,
        &mut schedule.teaching,
        &mut schedule.open_learning,
    ] {
        section.sort_by(|a, b| compare_facilities(&a.facility, &b.facility));
    }

    schedule
}

/// Facilities order by numeric floor first, then by title.
fn compare_facilities(a: &Facility, b: &Facility) -> Ordering {
    a.floor_rank()
        .cmp(&b.floor_rank())
        .then_with(|| natural_title_cmp(&a.title, &b.title))
}

/// Case-insensitive, numeric-aware title comparison.
///
/// Digit runs compare by value so `"Lokale 2.10"` sorts after `"Lokale 2.9"`
/// instead of between `2.1` and `2.2`.
pub fn natural_title_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(lc), Some(rc)) if lc.is_ascii_digit() && rc.is_ascii_digit() => {
                let ln = take_number(&mut left);
                let rn = take_number(&mut right);
                match ln.cmp(&rn) {
                    Ordering::Equal => {}
                    unequal => return unequal,
                }
            }
            (Some(lc), Some(rc)) => {
                let lc = lc.to_lowercase().next().unwrap_or(lc);
                let rc = rc.to_lowercase().next().unwrap_or(rc);
                match lc.cmp(&rc) {
                    Ordering::Equal => {
                        left.next();
                        right.next();
                    }
                    unequal => return unequal,
                }
            }
        }
    }
}

fn take_number(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> u64 {
    let mut value: u64 = 0;
    while let Some(c) = chars.peek().copied() {
        let Some(digit) = c.to_digit(10) else { break };
        value = value.saturating_mul(10).saturating_add(u64::from(digit));
        chars.next();
    }
    value
}
