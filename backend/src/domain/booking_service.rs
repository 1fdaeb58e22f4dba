//! Booking domain service: the claim and release operations.
//!
//! Composes the rule engine with the slot ledger so that the decision and
//! the state transition stay in the right order: load, decide, then write
//! conditionally. A failed write is terminal for the attempt — the service
//! never retries, because the correct verdict may differ on the new state
//! (a takeover that was legal against a student owner is not legal against
//! the teacher who won the race).

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use crate::domain::actor::Role;
use crate::domain::error::Error;
use crate::domain::policy::{BookingPolicy, ClaimDenial, ClaimKind, DailyUsage};
use crate::domain::ports::{
    BookingCommand, ClaimSlotRequest, ClaimSlotResponse, ReleaseSlotRequest, ReleaseSlotResponse,
    RoleResolver, RoleResolverError, SlotRepository, SlotRepositoryError,
};
use crate::domain::slot::{Slot, SlotStatus};

/// Booking service implementing the claim/release driving port.
#[derive(Clone)]
pub struct BookingService<S, R> {
    slots: Arc<S>,
    roles: Arc<R>,
    policy: BookingPolicy,
}

impl<S, R> BookingService<S, R> {
    /// Create a service over the given ledger, resolver, and policy.
    pub fn new(slots: Arc<S>, roles: Arc<R>, policy: BookingPolicy) -> Self {
        Self {
            slots,
            roles,
            policy,
        }
    }
}

fn slot_not_found(slot_id: Uuid) -> Error {
    Error::not_found("slot not found").with_details(json!({
        "slotId": slot_id,
        "code": "slot_not_found",
    }))
}

fn lost_race(slot_id: &str) -> Error {
    Error::conflict("the slot was just taken by someone else").with_details(json!({
        "slotId": slot_id,
        "code": "already_taken",
    }))
}

fn denial_error(denial: ClaimDenial) -> Error {
    let code = denial.reason_code();
    let details = json!({ "code": code });
    match denial {
        ClaimDenial::AlreadyOwned => {
            Error::conflict("you already hold this slot").with_details(details)
        }
        ClaimDenial::RoleMissing => {
            Error::forbidden("no role is registered for this booking").with_details(details)
        }
        ClaimDenial::StudentOverride => {
            Error::forbidden("students cannot take over an existing booking").with_details(details)
        }
        ClaimDenial::TeacherOverridesTeacher => {
            Error::forbidden("another teacher already holds this booking").with_details(details)
        }
        ClaimDenial::DailyCapExceeded => {
            Error::forbidden("daily booking allowance reached").with_details(details)
        }
        ClaimDenial::MultipleRooms => {
            Error::forbidden("only one room may be booked per day").with_details(details)
        }
    }
}

fn map_slot_error(error: SlotRepositoryError) -> Error {
    match error {
        SlotRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("slot ledger unavailable: {message}"))
        }
        SlotRepositoryError::Query { message } => {
            Error::internal(format!("slot ledger error: {message}"))
        }
        SlotRepositoryError::StateConflict { slot_id } => lost_race(&slot_id),
    }
}

fn map_role_error(error: RoleResolverError) -> Error {
    match error {
        RoleResolverError::Connection { message } => {
            Error::service_unavailable(format!("role resolver unavailable: {message}"))
        }
        RoleResolverError::Query { message } => {
            Error::internal(format!("role lookup error: {message}"))
        }
    }
}

impl<S, R> BookingService<S, R>
where
    S: SlotRepository,
    R: RoleResolver,
{
    async fn occupant_role(&self, slot: &Slot) -> Result<Option<Role>, Error> {
        match slot.owner() {
            Some(owner) if slot.status() == SlotStatus::Occupied => {
                self.roles.resolve(owner).await.map_err(map_role_error)
            }
            _ => Ok(None),
        }
    }

    async fn daily_usage(&self, request: &ClaimSlotRequest, slot: &Slot) -> Result<DailyUsage, Error> {
        let held = self
            .slots
            .list_owned_for_day(&request.actor.id, slot.day())
            .await
            .map_err(map_slot_error)?;
        Ok(DailyUsage::from_slots(
            &held,
            self.policy.fallback_slot_minutes(),
        ))
    }
}

#[async_trait]
impl<S, R> BookingCommand for BookingService<S, R>
where
    S: SlotRepository,
    R: RoleResolver,
{
    async fn claim_slot(&self, request: ClaimSlotRequest) -> Result<ClaimSlotResponse, Error> {
        let slot = self
            .slots
            .find_by_id(&request.slot_id)
            .await
            .map_err(map_slot_error)?
            .ok_or_else(|| slot_not_found(request.slot_id))?;

        let occupant_role = self.occupant_role(&slot).await?;
        let usage = self.daily_usage(&request, &slot).await?;

        let kind = self
            .policy
            .evaluate_claim(&request.actor, &slot, occupant_role, &usage)
            .map_err(denial_error)?;

        // The precondition is the exact state the verdict was computed
        // against; any interleaved writer turns this into a conflict.
        let updated = self
            .slots
            .claim(
                &request.slot_id,
                slot.status(),
                slot.owner().cloned(),
                request.actor.id.clone(),
            )
            .await
            .map_err(map_slot_error)?;

        debug!(
            slot_id = %updated.id(),
            actor = %request.actor.id,
            takeover = matches!(kind, ClaimKind::Takeover),
            "slot claimed"
        );

        Ok(ClaimSlotResponse {
            slot: updated.into(),
            takeover: matches!(kind, ClaimKind::Takeover),
        })
    }

    async fn release_slot(
        &self,
        request: ReleaseSlotRequest,
    ) -> Result<ReleaseSlotResponse, Error> {
        // The owner check lives in the conditional write itself; a missing
        // slot, a foreign owner, and an already-free slot are all the same
        // answer to the caller.
        let released = match self
            .slots
            .release(&request.slot_id, request.actor.id.clone())
            .await
        {
            Ok(slot) => slot,
            Err(SlotRepositoryError::StateConflict { slot_id }) => {
                return Err(
                    Error::not_found("booking not found or not owned by you").with_details(json!({
                        "slotId": slot_id,
                        "code": "not_found_or_not_owner",
                    })),
                );
            }
            Err(other) => return Err(map_slot_error(other)),
        };

        debug!(slot_id = %released.id(), actor = %request.actor.id, "slot released");

        Ok(ReleaseSlotResponse {
            slot: released.into(),
        })
    }
}

#[cfg(test)]
#[path = "booking_service_tests.rs"]
mod tests;
