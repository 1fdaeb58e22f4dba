//! Schedule domain service: read-side availability projections.
//!
//! Queries take no locks and never block claim/release traffic; a view may
//! show a slot as free moments before someone claims it, and the stale read
//! resolves through the conflict path on the subsequent claim attempt.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::ports::{
    DayScheduleRequest, DayScheduleResponse, FacilityDirectory, FacilityDirectoryError,
    MyBookingsRequest, MyBookingsResponse, ScheduleQuery, SlotPayload, SlotRepository,
    SlotRepositoryError,
};
use crate::domain::schedule::build_day_schedule;
use crate::domain::slot::Slot;

fn map_slot_error(error: SlotRepositoryError) -> Error {
    match error {
        SlotRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("slot ledger unavailable: {message}"))
        }
        SlotRepositoryError::Query { message } | SlotRepositoryError::StateConflict { slot_id: message } => {
            Error::internal(format!("slot ledger error: {message}"))
        }
    }
}

fn map_directory_error(error: FacilityDirectoryError) -> Error {
    match error {
        FacilityDirectoryError::Connection { message } => {
            Error::service_unavailable(format!("facility directory unavailable: {message}"))
        }
        FacilityDirectoryError::Query { message } => {
            Error::internal(format!("facility directory error: {message}"))
        }
    }
}

/// Schedule service implementing the availability driving port.
#[derive(Clone)]
pub struct ScheduleService<S, F> {
    slots: Arc<S>,
    facilities: Arc<F>,
    teacher_only_markers: Vec<String>,
}

impl<S, F> ScheduleService<S, F> {
    /// Create a service over the given ledger and directory.
    ///
    /// `teacher_only_markers` are the description substrings that reserve a
    /// shared facility for teachers.
    pub fn new(slots: Arc<S>, facilities: Arc<F>, teacher_only_markers: Vec<String>) -> Self {
        Self {
            slots,
            facilities,
            teacher_only_markers,
        }
    }
}

#[async_trait]
impl<S, F> ScheduleQuery for ScheduleService<S, F>
where
    S: SlotRepository,
    F: FacilityDirectory,
{
    async fn day_schedule(
        &self,
        request: DayScheduleRequest,
    ) -> Result<DayScheduleResponse, Error> {
        let slots = self
            .slots
            .list_for_day(request.day)
            .await
            .map_err(map_slot_error)?;
        let facilities = self
            .facilities
            .list()
            .await
            .map_err(map_directory_error)?;

        let schedule =
            build_day_schedule(facilities, slots, request.view, &self.teacher_only_markers);
        Ok(schedule.into())
    }

    async fn my_bookings(&self, request: MyBookingsRequest) -> Result<MyBookingsResponse, Error> {
        let mut held = self
            .slots
            .list_owned_for_day(&request.actor_id, request.day)
            .await
            .map_err(map_slot_error)?;
        held.sort_by_key(Slot::starts_at);

        Ok(MyBookingsResponse {
            bookings: held.into_iter().map(SlotPayload::from).collect(),
        })
    }
}

#[cfg(test)]
#[path = "schedule_service_tests.rs"]
mod tests;
