//! Room booking backend library modules.
//!
//! The crate follows a hexagonal layout: [`domain`] holds entities, booking
//! policy and ports, [`inbound`] adapts HTTP requests onto the driving ports,
//! and [`outbound`] implements the driven ports against PostgreSQL.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Request tracing middleware re-exported for server wiring.
pub use middleware::trace::Trace;
