//! PostgreSQL-backed `SlotRepository` implementation using Diesel ORM.
//!
//! The claim and release preconditions ride inside single
//! `UPDATE … RETURNING` statements, so PostgreSQL's row-level serialisation
//! decides the winner of a race: the statement that commits first applies,
//! every later one matches zero rows and surfaces as a state conflict.

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::actor::UserId;
use crate::domain::ports::{SlotRepository, SlotRepositoryError};
use crate::domain::slot::{Slot, SlotDraft, SlotStatus, day_window};

use super::diesel_helpers::{diesel_error_message, is_connection_error, pool_error_message};
use super::models::SlotRow;
use super::pool::DbPool;
use super::schema::slots;

/// Diesel-backed implementation of the `SlotRepository` port.
#[derive(Clone)]
pub struct DieselSlotRepository {
    pool: DbPool,
}

impl DieselSlotRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn connection(
        &self,
    ) -> Result<
        diesel_async::pooled_connection::bb8::PooledConnection<'_, diesel_async::AsyncPgConnection>,
        SlotRepositoryError,
    > {
        self.pool
            .get()
            .await
            .map_err(|err| SlotRepositoryError::connection(pool_error_message(err)))
    }
}

fn map_diesel_error(error: &diesel::result::Error, operation: &str) -> SlotRepositoryError {
    let message = diesel_error_message(error, operation);
    if is_connection_error(error) {
        SlotRepositoryError::connection(message)
    } else {
        SlotRepositoryError::query(message)
    }
}

/// Convert a database row to a domain slot.
///
/// A row that violates the ownership invariant or carries an unknown status
/// label is corrupt; it surfaces as a query error rather than a panic.
fn row_to_slot(row: SlotRow) -> Result<Slot, SlotRepositoryError> {
    let status = SlotStatus::parse(&row.status).ok_or_else(|| {
        SlotRepositoryError::query(format!(
            "slot {} carries unknown status {:?}",
            row.slot_id, row.status
        ))
    })?;

    Slot::new(SlotDraft {
        id: row.slot_id,
        facility_id: row.facility_id,
        title: row.title,
        starts_at: row.starts_at,
        ends_at: row.ends_at,
        status,
        owner: row.owner.map(UserId::from),
    })
    .map_err(|err| SlotRepositoryError::query(format!("slot {} is corrupt: {err}", row.slot_id)))
}

fn rows_to_slots(rows: Vec<SlotRow>) -> Result<Vec<Slot>, SlotRepositoryError> {
    rows.into_iter().map(row_to_slot).collect()
}

#[async_trait]
impl SlotRepository for DieselSlotRepository {
    async fn find_by_id(&self, slot_id: &Uuid) -> Result<Option<Slot>, SlotRepositoryError> {
        let mut conn = self.connection().await?;

        let row: Option<SlotRow> = slots::table
            .filter(slots::slot_id.eq(slot_id))
            .select(SlotRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(&err, "load slot"))?;

        row.map(row_to_slot).transpose()
    }

    async fn list_for_day(&self, day: NaiveDate) -> Result<Vec<Slot>, SlotRepositoryError> {
        let (start, end) = day_window(day);
        let mut conn = self.connection().await?;

        let rows: Vec<SlotRow> = slots::table
            .filter(slots::starts_at.ge(start).and(slots::starts_at.lt(end)))
            .select(SlotRow::as_select())
            .order_by(slots::starts_at.asc())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err, "list slots for day"))?;

        rows_to_slots(rows)
    }

    async fn list_owned_for_day(
        &self,
        owner: &UserId,
        day: NaiveDate,
    ) -> Result<Vec<Slot>, SlotRepositoryError> {
        let (start, end) = day_window(day);
        let mut conn = self.connection().await?;

        let rows: Vec<SlotRow> = slots::table
            .filter(
                slots::owner
                    .eq(owner.as_uuid())
                    .and(slots::status.eq(SlotStatus::Occupied.as_str()))
                    .and(slots::starts_at.ge(start))
                    .and(slots::starts_at.lt(end)),
            )
            .select(SlotRow::as_select())
            .order_by(slots::starts_at.asc())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err, "list owned slots for day"))?;

        rows_to_slots(rows)
    }

    async fn claim(
        &self,
        slot_id: &Uuid,
        expected_status: SlotStatus,
        expected_owner: Option<UserId>,
        new_owner: UserId,
    ) -> Result<Slot, SlotRepositoryError> {
        let mut conn = self.connection().await?;

        let changes = (
            slots::status.eq(SlotStatus::Occupied.as_str()),
            slots::owner.eq(Some(*new_owner.as_uuid())),
        );

        // Two statements rather than one dynamically-built filter: the
        // occupant precondition is either "this exact owner" or "no owner".
        let row: Option<SlotRow> = match expected_owner {
            Some(occupant) => {
                diesel::update(slots::table)
                    .filter(
                        slots::slot_id
                            .eq(slot_id)
                            .and(slots::status.eq(expected_status.as_str()))
                            .and(slots::owner.eq(*occupant.as_uuid())),
                    )
                    .set(changes)
                    .returning(SlotRow::as_returning())
                    .get_result(&mut conn)
                    .await
                    .optional()
                    .map_err(|err| map_diesel_error(&err, "claim slot"))?
            }
            None => {
                diesel::update(slots::table)
                    .filter(
                        slots::slot_id
                            .eq(slot_id)
                            .and(slots::status.eq(expected_status.as_str()))
                            .and(slots::owner.is_null()),
                    )
                    .set(changes)
                    .returning(SlotRow::as_returning())
                    .get_result(&mut conn)
                    .await
                    .optional()
                    .map_err(|err| map_diesel_error(&err, "claim slot"))?
            }
        };

        row.map_or_else(
            || Err(SlotRepositoryError::state_conflict(slot_id.to_string())),
            row_to_slot,
        )
    }

    async fn release(&self, slot_id: &Uuid, owner: UserId) -> Result<Slot, SlotRepositoryError> {
        let mut conn = self.connection().await?;

        let row: Option<SlotRow> = diesel::update(slots::table)
            .filter(
                slots::slot_id
                    .eq(slot_id)
                    .and(slots::status.eq(SlotStatus::Occupied.as_str()))
                    .and(slots::owner.eq(*owner.as_uuid())),
            )
            .set((
                slots::status.eq(SlotStatus::Available.as_str()),
                slots::owner.eq(None::<Uuid>),
            ))
            .returning(SlotRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(&err, "release slot"))?;

        row.map_or_else(
            || Err(SlotRepositoryError::state_conflict(slot_id.to_string())),
            row_to_slot,
        )
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn sample_row(status: &str, owner: Option<Uuid>) -> SlotRow {
        let starts_at = Utc
            .with_ymd_and_hms(2025, 12, 4, 10, 0, 0)
            .single()
            .expect("valid timestamp");
        SlotRow {
            slot_id: Uuid::new_v4(),
            facility_id: Uuid::new_v4(),
            title: "Lokale 2.03".to_owned(),
            starts_at,
            ends_at: Some(starts_at + chrono::Duration::hours(1)),
            status: status.to_owned(),
            owner,
            created_at: starts_at,
        }
    }

    #[rstest]
    fn occupied_row_converts_with_owner() {
        let owner = Uuid::new_v4();
        let row = sample_row("occupied", Some(owner));

        let slot = row_to_slot(row).expect("row converts");
        assert_eq!(slot.status(), SlotStatus::Occupied);
        assert_eq!(slot.owner().map(|id| *id.as_uuid()), Some(owner));
    }

    #[rstest]
    fn unknown_status_label_is_a_query_error() {
        let row = sample_row("maybe", None);
        let err = row_to_slot(row).expect_err("unknown label rejected");
        assert!(matches!(err, SlotRepositoryError::Query { .. }));
        assert!(err.to_string().contains("unknown status"));
    }

    #[rstest]
    fn invariant_violating_row_is_a_query_error() {
        let row = sample_row("occupied", None);
        let err = row_to_slot(row).expect_err("corrupt row rejected");
        assert!(matches!(err, SlotRepositoryError::Query { .. }));
        assert!(err.to_string().contains("corrupt"));
    }

    #[rstest]
    fn pool_errors_map_to_connection_errors() {
        let err = SlotRepositoryError::connection(pool_error_message(
            super::super::pool::PoolError::checkout("refused"),
        ));
        assert!(matches!(err, SlotRepositoryError::Connection { .. }));
        assert!(err.to_string().contains("refused"));
    }
}
