//! Domain entities, booking policy, and the ports they are reached through.
//!
//! The types here are transport and storage agnostic. Inbound adapters build
//! requests out of HTTP payloads; outbound adapters persist slots behind the
//! driven ports in [`ports`]. Nothing in this module performs I/O except the
//! services, which only talk to ports.

pub mod actor;
pub mod booking_service;
pub mod error;
pub mod facility;
pub mod policy;
pub mod ports;
pub mod schedule;
pub mod schedule_service;
pub mod slot;

pub use self::actor::{Actor, ActorValidationError, Role, RoleParseError, UserId};
pub use self::booking_service::BookingService;
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::facility::{Facility, FacilityCategory, default_teacher_only_markers};
pub use self::policy::{BookingPolicy, ClaimDenial, ClaimKind, DailyUsage};
pub use self::schedule::{DaySchedule, FacilitySlots, ViewMode};
pub use self::schedule_service::ScheduleService;
pub use self::slot::{Slot, SlotDraft, SlotStatus, SlotValidationError, day_window};
