//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly; Diesel uses
//! them for compile-time query validation and type-safe SQL generation.

diesel::table! {
    /// Bookable time slots, one row per interval per facility.
    ///
    /// `status` is `available` or `occupied`; `owner` is non-null exactly
    /// when `status` is `occupied` (enforced by a table check constraint).
    slots (slot_id) {
        /// Primary key: UUID v4 identifier.
        slot_id -> Uuid,
        /// Facility the slot belongs to.
        facility_id -> Uuid,
        /// Denormalised display summary.
        title -> Text,
        /// Interval start.
        starts_at -> Timestamptz,
        /// Interval end; NULL means open-ended.
        ends_at -> Nullable<Timestamptz>,
        /// Occupancy state label.
        status -> Text,
        /// Current owner, NULL while available.
        owner -> Nullable<Uuid>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Facility catalogue, maintained outside the booking core.
    facilities (facility_id) {
        /// Primary key: UUID v4 identifier.
        facility_id -> Uuid,
        /// Display title.
        title -> Text,
        /// Free-text capacity, e.g. "2-4 pers".
        capacity -> Nullable<Text>,
        /// Free-text description; may carry a teacher-only marker.
        description -> Nullable<Text>,
        /// Floor label, numeric when parseable.
        floor -> Nullable<Text>,
        /// Category label, e.g. "undervisning" or "open learning".
        facility_type -> Nullable<Text>,
    }
}

diesel::table! {
    /// Role registry, maintained by the external user administration.
    user_roles (user_id) {
        /// Primary key: the user's UUID.
        user_id -> Uuid,
        /// Role label, `student` or `teacher`.
        role -> Text,
    }
}
