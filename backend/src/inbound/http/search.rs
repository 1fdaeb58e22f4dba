//! Day availability search handler.
//!
//! ```text
//! GET /api/v1/search?date=YYYY-MM-DD[&mode=teacher]
//! ```
//!
//! No login is required: the student-filtered view is the default, and the
//! teacher view only widens what is *visible* — taking a slot over still
//! goes through the booking rules.

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ViewMode;
use crate::domain::ports::{DayScheduleRequest, DayScheduleResponse, FacilitySlotsPayload};
use crate::inbound::http::ApiResult;
use crate::inbound::http::bookings::SlotBody;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_day;

/// Query parameters for the day search.
#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchParams {
    /// Calendar day, `YYYY-MM-DD`.
    pub date: String,
    /// `teacher` widens the view to every slot; anything else (or nothing)
    /// yields the student-filtered view.
    pub mode: Option<String>,
}

/// Facility metadata embedded in search results.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FacilityBody {
    /// Facility identifier.
    #[schema(format = "uuid")]
    pub facility_id: String,
    /// Display title.
    pub title: String,
    /// Free-text capacity, e.g. `"2-4 pers"`.
    pub capacity: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Floor label.
    pub floor: Option<String>,
    /// `shared`, `teaching`, or `open_learning`.
    pub category: String,
}

/// One facility and its visible slots.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FacilityGroupBody {
    /// Facility metadata.
    #[serde(flatten)]
    pub facility: FacilityBody,
    /// Slots ascending by start time.
    pub slots: Vec<SlotBody>,
}

impl From<FacilitySlotsPayload> for FacilityGroupBody {
    fn from(entry: FacilitySlotsPayload) -> Self {
        Self {
            facility: FacilityBody {
                facility_id: entry.facility.id.to_string(),
                title: entry.facility.title,
                capacity: entry.facility.capacity,
                description: entry.facility.description,
                floor: entry.facility.floor,
                category: entry.facility.category.as_str().to_owned(),
            },
            slots: entry.slots.into_iter().map(SlotBody::from).collect(),
        }
    }
}

/// Role-filtered day schedule grouped into facility sections.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponseBody {
    /// Facilities bookable by everyone.
    pub shared: Vec<FacilityGroupBody>,
    /// Teaching rooms (teacher view only).
    pub teaching: Vec<FacilityGroupBody>,
    /// Open-learning areas (teacher view only).
    pub open_learning: Vec<FacilityGroupBody>,
}

impl From<DayScheduleResponse> for SearchResponseBody {
    fn from(response: DayScheduleResponse) -> Self {
        Self {
            shared: response.shared.into_iter().map(Into::into).collect(),
            teaching: response.teaching.into_iter().map(Into::into).collect(),
            open_learning: response
                .open_learning
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}

/// Search the day's slots, filtered by the requested view.
#[utoipa::path(
    get,
    path = "/api/v1/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Day schedule", body = SearchResponseBody),
        (status = 400, description = "Invalid request", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["search"],
    operation_id = "searchDay",
    security([])
)]
#[get("/search")]
pub async fn search_day(
    state: web::Data<HttpState>,
    params: web::Query<SearchParams>,
) -> ApiResult<web::Json<SearchResponseBody>> {
    let day = parse_day(&params.date, "date")?;
    let view = ViewMode::from_mode_param(params.mode.as_deref());

    let response = state
        .schedule
        .day_schedule(DayScheduleRequest { day, view })
        .await?;

    Ok(web::Json(response.into()))
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
