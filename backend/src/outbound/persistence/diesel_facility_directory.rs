//! PostgreSQL-backed `FacilityDirectory` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::facility::{Facility, FacilityCategory};
use crate::domain::ports::{FacilityDirectory, FacilityDirectoryError};

use super::diesel_helpers::{diesel_error_message, is_connection_error, pool_error_message};
use super::models::FacilityRow;
use super::pool::DbPool;
use super::schema::facilities;

/// Diesel-backed implementation of the `FacilityDirectory` port.
#[derive(Clone)]
pub struct DieselFacilityDirectory {
    pool: DbPool,
}

impl DieselFacilityDirectory {
    /// Create a new directory with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_facility(row: FacilityRow) -> Facility {
    Facility {
        id: row.facility_id,
        title: row.title,
        capacity: row.capacity,
        description: row.description,
        floor: row.floor,
        category: FacilityCategory::from_label(row.facility_type.as_deref()),
    }
}

#[async_trait]
impl FacilityDirectory for DieselFacilityDirectory {
    async fn list(&self) -> Result<Vec<Facility>, FacilityDirectoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| FacilityDirectoryError::connection(pool_error_message(err)))?;

        let rows: Vec<FacilityRow> = facilities::table
            .select(FacilityRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| {
                let message = diesel_error_message(&err, "list facilities");
                if is_connection_error(&err) {
                    FacilityDirectoryError::connection(message)
                } else {
                    FacilityDirectoryError::query(message)
                }
            })?;

        Ok(rows.into_iter().map(row_to_facility).collect())
    }
}
