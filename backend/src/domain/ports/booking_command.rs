//! Driving port for claim and release operations.
//!
//! Payloads are serialisable snapshots of domain state so inbound adapters
//! never reach into aggregates directly. Expected booking outcomes — policy
//! denials, lost races — surface as [`Error`] values with a stable reason
//! code under `details.code`; see the service for the mapping.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::actor::{Actor, UserId};
use crate::domain::error::Error;
use crate::domain::slot::{Slot, SlotStatus};

/// Serialisable slot snapshot for driving ports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotPayload {
    /// Unique slot identifier.
    pub id: Uuid,
    /// Facility the slot belongs to.
    pub facility_id: Uuid,
    /// Denormalised display summary.
    pub title: String,
    /// Interval start.
    pub starts_at: DateTime<Utc>,
    /// Interval end; absent means open-ended.
    pub ends_at: Option<DateTime<Utc>>,
    /// Occupancy state after the operation.
    pub status: SlotStatus,
    /// Current owner, present exactly when occupied.
    pub owner: Option<UserId>,
}

impl From<Slot> for SlotPayload {
    fn from(slot: Slot) -> Self {
        Self {
            id: slot.id(),
            facility_id: slot.facility_id(),
            title: slot.title().to_owned(),
            starts_at: slot.starts_at(),
            ends_at: slot.ends_at(),
            status: slot.status(),
            owner: slot.owner().cloned(),
        }
    }
}

/// Request to claim a slot for an actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimSlotRequest {
    /// Who is claiming.
    pub actor: Actor,
    /// Which slot.
    pub slot_id: Uuid,
}

/// Successful claim outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimSlotResponse {
    /// The slot after the claim.
    pub slot: SlotPayload,
    /// True when an existing booking was displaced rather than a free slot
    /// taken; callers word their confirmation message on this.
    pub takeover: bool,
}

/// Request to release a slot held by the actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseSlotRequest {
    /// Who is releasing.
    pub actor: Actor,
    /// Which slot.
    pub slot_id: Uuid,
}

/// Successful release outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseSlotResponse {
    /// The slot after the release, back in the free pool.
    pub slot: SlotPayload,
}

/// Driving port for the two booking state transitions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingCommand: Send + Sync {
    /// Claim a slot; see the service for the full decision sequence.
    async fn claim_slot(&self, request: ClaimSlotRequest) -> Result<ClaimSlotResponse, Error>;

    /// Release a slot currently held by the actor.
    async fn release_slot(&self, request: ReleaseSlotRequest)
    -> Result<ReleaseSlotResponse, Error>;
}
