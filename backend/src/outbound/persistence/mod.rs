//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the driven ports backed by PostgreSQL via
//! `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types; business rules stay in the domain.
//! - **Internal models**: row structs (`models.rs`) and schema definitions
//!   (`schema.rs`) never leak past this module.
//! - **Conditional writes**: the slot adapter pushes claim/release
//!   preconditions into single `UPDATE … RETURNING` statements so the
//!   database serialises racing writers.
//! - **Strongly typed errors**: Diesel and pool failures map onto the port
//!   error enums.

pub(crate) mod diesel_helpers;
mod diesel_facility_directory;
mod diesel_role_resolver;
mod diesel_slot_repository;
mod models;
mod pool;
mod schema;

pub use diesel_facility_directory::DieselFacilityDirectory;
pub use diesel_role_resolver::DieselRoleResolver;
pub use diesel_slot_repository::DieselSlotRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
