//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (slot ledger, facility directory, role resolver) describe
//! what the domain needs from the outside world; driving ports (booking
//! command, schedule query) describe what the outside world may ask of the
//! domain. Each driven port exposes a strongly typed error enum so adapters
//! map failures into predictable variants.

mod macros;
pub(crate) use macros::define_port_error;

mod booking_command;
mod facility_directory;
mod role_resolver;
mod schedule_query;
mod slot_repository;

pub use booking_command::{
    BookingCommand, ClaimSlotRequest, ClaimSlotResponse, ReleaseSlotRequest, ReleaseSlotResponse,
    SlotPayload,
};
#[cfg(test)]
pub use booking_command::MockBookingCommand;
pub use facility_directory::{FacilityDirectory, FacilityDirectoryError, InMemoryFacilityDirectory};
#[cfg(test)]
pub use facility_directory::MockFacilityDirectory;
pub use role_resolver::{RoleResolver, RoleResolverError, StaticRoleResolver};
#[cfg(test)]
pub use role_resolver::MockRoleResolver;
pub use schedule_query::{
    DayScheduleRequest, DayScheduleResponse, FacilityPayload, FacilitySlotsPayload,
    MyBookingsRequest, MyBookingsResponse, ScheduleQuery,
};
#[cfg(test)]
pub use schedule_query::MockScheduleQuery;
pub use slot_repository::{InMemorySlotRepository, SlotRepository, SlotRepositoryError};
#[cfg(test)]
pub use slot_repository::MockSlotRepository;
