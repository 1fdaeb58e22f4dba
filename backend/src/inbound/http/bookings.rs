//! Booking HTTP handlers.
//!
//! ```text
//! POST   /api/v1/bookings/{id}/claim
//! DELETE /api/v1/bookings/{id}
//! GET    /api/v1/my-bookings?date=YYYY-MM-DD
//! ```

use actix_web::{delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{
    ClaimSlotRequest, ClaimSlotResponse, MyBookingsRequest, ReleaseSlotRequest,
    ReleaseSlotResponse, SlotPayload,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_day, parse_uuid};

/// Slot snapshot returned by booking and search endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SlotBody {
    /// Slot identifier.
    #[schema(format = "uuid")]
    pub id: String,
    /// Facility identifier.
    #[schema(format = "uuid")]
    pub facility_id: String,
    /// Display summary.
    pub title: String,
    /// Interval start.
    #[schema(format = "date-time")]
    pub starts_at: String,
    /// Interval end; absent means open-ended.
    #[schema(format = "date-time")]
    pub ends_at: Option<String>,
    /// `available` or `occupied`.
    pub status: String,
    /// Owner id, present exactly when occupied.
    #[schema(format = "uuid")]
    pub owner: Option<String>,
}

impl From<SlotPayload> for SlotBody {
    fn from(slot: SlotPayload) -> Self {
        Self {
            id: slot.id.to_string(),
            facility_id: slot.facility_id.to_string(),
            title: slot.title,
            starts_at: slot.starts_at.to_rfc3339(),
            ends_at: slot.ends_at.map(|ends_at| ends_at.to_rfc3339()),
            status: slot.status.as_str().to_owned(),
            owner: slot.owner.map(|owner| owner.to_string()),
        }
    }
}

/// Response payload for a successful claim.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClaimResponseBody {
    /// The slot after the claim.
    pub slot: SlotBody,
    /// True when an existing booking was displaced; drives the confirmation
    /// wording shown to the user.
    pub takeover: bool,
}

impl From<ClaimSlotResponse> for ClaimResponseBody {
    fn from(response: ClaimSlotResponse) -> Self {
        Self {
            slot: response.slot.into(),
            takeover: response.takeover,
        }
    }
}

/// Response payload for a successful cancellation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CancelResponseBody {
    /// The slot after the release, back in the free pool.
    pub slot: SlotBody,
}

impl From<ReleaseSlotResponse> for CancelResponseBody {
    fn from(response: ReleaseSlotResponse) -> Self {
        Self {
            slot: response.slot.into(),
        }
    }
}

/// Query parameters for the own-bookings listing.
#[derive(Debug, Deserialize, IntoParams)]
pub struct MyBookingsParams {
    /// Calendar day, `YYYY-MM-DD`.
    pub date: String,
}

/// Response payload listing the caller's bookings.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MyBookingsBody {
    /// Occupied slots owned by the caller, ascending by start time.
    pub bookings: Vec<SlotBody>,
}

/// Claim a slot for the logged-in actor, taking over an existing booking
/// when the role rules allow it.
#[utoipa::path(
    post,
    path = "/api/v1/bookings/{id}/claim",
    params(("id" = String, Path, description = "Slot identifier")),
    responses(
        (status = 200, description = "Slot claimed", body = ClaimResponseBody),
        (status = 400, description = "Invalid request", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 401, description = "Login required", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 403, description = "Denied by booking rules", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 404, description = "Slot not found", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 409, description = "Slot was just taken", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "claimBooking",
    security(("SessionCookie" = []))
)]
#[post("/bookings/{id}/claim")]
pub async fn claim_booking(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<ClaimResponseBody>> {
    let actor = session.require_actor()?;
    let slot_id = parse_uuid(&path.into_inner(), "id")?;

    let response = state
        .bookings
        .claim_slot(ClaimSlotRequest { actor, slot_id })
        .await?;

    Ok(web::Json(response.into()))
}

/// Cancel a booking held by the logged-in actor, returning the slot to the
/// free pool.
#[utoipa::path(
    delete,
    path = "/api/v1/bookings/{id}",
    params(("id" = String, Path, description = "Slot identifier")),
    responses(
        (status = 200, description = "Booking cancelled", body = CancelResponseBody),
        (status = 400, description = "Invalid request", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 401, description = "Login required", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 404, description = "Not found or not owned by the caller", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "cancelBooking",
    security(("SessionCookie" = []))
)]
#[delete("/bookings/{id}")]
pub async fn cancel_booking(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<CancelResponseBody>> {
    let actor = session.require_actor()?;
    let slot_id = parse_uuid(&path.into_inner(), "id")?;

    let response = state
        .bookings
        .release_slot(ReleaseSlotRequest { actor, slot_id })
        .await?;

    Ok(web::Json(response.into()))
}

/// List the logged-in actor's bookings for one day.
#[utoipa::path(
    get,
    path = "/api/v1/my-bookings",
    params(MyBookingsParams),
    responses(
        (status = 200, description = "The caller's bookings", body = MyBookingsBody),
        (status = 400, description = "Invalid request", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 401, description = "Login required", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "myBookings",
    security(("SessionCookie" = []))
)]
#[get("/my-bookings")]
pub async fn my_bookings(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<MyBookingsParams>,
) -> ApiResult<web::Json<MyBookingsBody>> {
    let actor = session.require_actor()?;
    let day = parse_day(&params.date, "date")?;

    let response = state
        .schedule
        .my_bookings(MyBookingsRequest {
            actor_id: actor.id,
            day,
        })
        .await?;

    Ok(web::Json(MyBookingsBody {
        bookings: response
            .bookings
            .into_iter()
            .map(SlotBody::from)
            .collect(),
    }))
}

#[cfg(test)]
#[path = "bookings_tests.rs"]
mod tests;
