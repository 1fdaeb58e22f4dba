//! Driving port for read-side schedule projections.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::Error;
use crate::domain::facility::{Facility, FacilityCategory};
use crate::domain::schedule::{DaySchedule, FacilitySlots, ViewMode};
use crate::domain::actor::UserId;

use super::booking_command::SlotPayload;

/// Serialisable facility snapshot for driving ports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityPayload {
    /// Unique facility identifier.
    pub id: Uuid,
    /// Display title.
    pub title: String,
    /// Free-text capacity.
    pub capacity: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Floor label.
    pub floor: Option<String>,
    /// Visibility category.
    pub category: FacilityCategory,
}

impl From<Facility> for FacilityPayload {
    fn from(facility: Facility) -> Self {
        Self {
            id: facility.id,
            title: facility.title,
            capacity: facility.capacity,
            description: facility.description,
            floor: facility.floor,
            category: facility.category,
        }
    }
}

/// One facility and its visible slots for the requested day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilitySlotsPayload {
    /// Facility metadata.
    pub facility: FacilityPayload,
    /// Slots ascending by start time.
    pub slots: Vec<SlotPayload>,
}

impl From<FacilitySlots> for FacilitySlotsPayload {
    fn from(entry: FacilitySlots) -> Self {
        Self {
            facility: entry.facility.into(),
            slots: entry.slots.into_iter().map(SlotPayload::from).collect(),
        }
    }
}

/// Request for a role-filtered day schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayScheduleRequest {
    /// Calendar day to project.
    pub day: NaiveDate,
    /// Visibility rules to apply.
    pub view: ViewMode,
}

/// Role-filtered day schedule, sectioned by facility category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayScheduleResponse {
    /// Facilities bookable by everyone.
    pub shared: Vec<FacilitySlotsPayload>,
    /// Teaching rooms (teacher view only).
    pub teaching: Vec<FacilitySlotsPayload>,
    /// Open-learning areas (teacher view only).
    pub open_learning: Vec<FacilitySlotsPayload>,
}

impl From<DaySchedule> for DayScheduleResponse {
    fn from(schedule: DaySchedule) -> Self {
        Self {
            shared: schedule.shared.into_iter().map(Into::into).collect(),
            teaching: schedule.teaching.into_iter().map(Into::into).collect(),
            open_learning: schedule
                .open_learning
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}

/// Request for the slots an actor holds on a given day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MyBookingsRequest {
    /// Whose bookings.
    pub actor_id: UserId,
    /// Calendar day to list.
    pub day: NaiveDate,
}

/// The actor's bookings for the requested day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyBookingsResponse {
    /// Occupied slots owned by the actor, ascending by start time.
    pub bookings: Vec<SlotPayload>,
}

/// Driving port for availability and ownership projections.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScheduleQuery: Send + Sync {
    /// Role-filtered schedule for one day.
    async fn day_schedule(&self, request: DayScheduleRequest)
    -> Result<DayScheduleResponse, Error>;

    /// The actor's own bookings for one day.
    async fn my_bookings(&self, request: MyBookingsRequest) -> Result<MyBookingsResponse, Error>;
}
