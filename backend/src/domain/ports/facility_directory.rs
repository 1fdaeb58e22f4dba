//! Port for the read-only facility catalogue.
//!
//! Facility metadata is owned and mutated elsewhere; the booking core only
//! lists it to join against the day's slots.

use async_trait::async_trait;

use crate::domain::facility::Facility;

use super::define_port_error;

define_port_error! {
    /// Errors raised by facility directory adapters.
    pub enum FacilityDirectoryError {
        /// Directory connection could not be established.
        Connection { message: String } =>
            "facility directory connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } =>
            "facility directory query failed: {message}",
    }
}

/// Port listing the facilities slots can belong to.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FacilityDirectory: Send + Sync {
    /// All known facilities, in no particular order.
    async fn list(&self) -> Result<Vec<Facility>, FacilityDirectoryError>;
}

/// Directory backed by a fixed list, for tests and database-less runs.
#[derive(Debug, Default, Clone)]
pub struct InMemoryFacilityDirectory {
    facilities: Vec<Facility>,
}

impl InMemoryFacilityDirectory {
    /// Create a directory over the given facilities.
    pub fn new(facilities: Vec<Facility>) -> Self {
        Self { facilities }
    }
}

#[async_trait]
impl FacilityDirectory for InMemoryFacilityDirectory {
    async fn list(&self) -> Result<Vec<Facility>, FacilityDirectoryError> {
        Ok(self.facilities.clone())
    }
}
