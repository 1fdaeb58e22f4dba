//! Internal Diesel row structs for database operations.
//!
//! Implementation details of the persistence layer; never exposed to the
//! domain. They exist solely to satisfy Diesel's type requirements.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{facilities, slots, user_roles};

/// Row struct for reading from the slots table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = slots)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SlotRow {
    pub slot_id: Uuid,
    pub facility_id: Uuid,
    pub title: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub status: String,
    pub owner: Option<Uuid>,
    #[expect(dead_code, reason = "schema field kept for audit queries")]
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the facilities table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = facilities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct FacilityRow {
    pub facility_id: Uuid,
    pub title: String,
    pub capacity: Option<String>,
    pub description: Option<String>,
    pub floor: Option<String>,
    pub facility_type: Option<String>,
}

/// Row struct for reading from the user_roles table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_roles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRoleRow {
    #[expect(dead_code, reason = "selected for completeness; lookups filter on it")]
    pub user_id: Uuid,
    pub role: String,
}
