//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain driving ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{BookingCommand, ScheduleQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Claim/release operations.
    pub bookings: Arc<dyn BookingCommand>,
    /// Availability and ownership projections.
    pub schedule: Arc<dyn ScheduleQuery>,
}

impl HttpState {
    /// Bundle the port implementations handlers need.
    pub fn new(bookings: Arc<dyn BookingCommand>, schedule: Arc<dyn ScheduleQuery>) -> Self {
        Self { bookings, schedule }
    }
}
