//! Tests for the booking HTTP handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, test, web};
use chrono::{TimeZone, Utc};
use serde_json::json;
use uuid::Uuid;

use super::*;
use crate::domain::ports::{MockBookingCommand, MockScheduleQuery};
use crate::domain::{Actor, Error, Role, Slot, UserId};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::test_utils::test_session_middleware;

fn sample_payload(owner: Option<UserId>) -> SlotPayload {
    let starts_at = Utc
        .with_ymd_and_hms(2025, 12, 4, 10, 0, 0)
        .single()
        .expect("valid timestamp");
    let slot = Slot::available(
        Uuid::new_v4(),
        Uuid::new_v4(),
        "Lokale 2.03",
        starts_at,
        Some(starts_at + chrono::Duration::hours(1)),
    )
    .expect("valid slot");
    owner
        .map_or_else(|| slot.clone(), |owner| slot.claimed_by(owner))
        .into()
}

fn app_with(
    bookings: MockBookingCommand,
    schedule: MockScheduleQuery,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let state = crate::inbound::http::state::HttpState::new(Arc::new(bookings), Arc::new(schedule));
    App::new()
        .wrap(test_session_middleware())
        .app_data(web::Data::new(state))
        .route(
            "/login",
            web::get().to(|session: SessionContext| async move {
                let actor = Actor::new(UserId::random(), Role::Student);
                session.persist_actor(&actor)?;
                Ok::<_, Error>(HttpResponse::Ok())
            }),
        )
        .service(claim_booking)
        .service(cancel_booking)
        .service(my_bookings)
}

async fn login_cookie<S, B>(app: &S) -> actix_web::cookie::Cookie<'static>
where
    S: actix_web::dev::Service<actix_http::Request, Response = actix_web::dev::ServiceResponse<B>, Error = actix_web::Error>,
    B: actix_web::body::MessageBody,
{
    let res = test::call_service(app, test::TestRequest::get().uri("/login").to_request()).await;
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

#[actix_web::test]
async fn claim_without_login_is_refused() {
    let mut bookings = MockBookingCommand::new();
    bookings.expect_claim_slot().times(0);
    let app = test::init_service(app_with(bookings, MockScheduleQuery::new())).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/bookings/{}/claim", Uuid::new_v4()))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let payload: Error = test::read_body_json(res).await;
    assert_eq!(payload.reason_code(), Some("login_required"));
}

#[actix_web::test]
async fn claim_reports_the_takeover_flag() {
    let owner = UserId::random();
    let payload = sample_payload(Some(owner));
    let mut bookings = MockBookingCommand::new();
    bookings.expect_claim_slot().times(1).return_once(move |_| {
        Ok(ClaimSlotResponse {
            slot: payload,
            takeover: true,
        })
    });

    let app = test::init_service(app_with(bookings, MockScheduleQuery::new())).await;
    let cookie = login_cookie(&app).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/bookings/{}/claim", Uuid::new_v4()))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: ClaimResponseBody = test::read_body_json(res).await;
    assert!(body.takeover);
    assert_eq!(body.slot.status, "occupied");
}

#[actix_web::test]
async fn claim_with_malformed_id_is_a_bad_request() {
    let mut bookings = MockBookingCommand::new();
    bookings.expect_claim_slot().times(0);
    let app = test::init_service(app_with(bookings, MockScheduleQuery::new())).await;
    let cookie = login_cookie(&app).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/bookings/not-a-uuid/claim")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let payload: Error = test::read_body_json(res).await;
    assert_eq!(payload.reason_code(), Some("invalid_uuid"));
}

#[actix_web::test]
async fn denial_passes_through_with_status_and_reason() {
    let mut bookings = MockBookingCommand::new();
    bookings.expect_claim_slot().times(1).return_once(|_| {
        Err(Error::forbidden("students cannot take over an existing booking")
            .with_details(json!({ "code": "student_cannot_override" })))
    });

    let app = test::init_service(app_with(bookings, MockScheduleQuery::new())).await;
    let cookie = login_cookie(&app).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/bookings/{}/claim", Uuid::new_v4()))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let payload: Error = test::read_body_json(res).await;
    assert_eq!(payload.reason_code(), Some("student_cannot_override"));
}

#[actix_web::test]
async fn cancel_returns_the_freed_slot() {
    let payload = sample_payload(None);
    let mut bookings = MockBookingCommand::new();
    bookings
        .expect_release_slot()
        .times(1)
        .return_once(move |_| Ok(ReleaseSlotResponse { slot: payload }));

    let app = test::init_service(app_with(bookings, MockScheduleQuery::new())).await;
    let cookie = login_cookie(&app).await;

    let res = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/bookings/{}", Uuid::new_v4()))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: CancelResponseBody = test::read_body_json(res).await;
    assert_eq!(body.slot.status, "available");
    assert!(body.slot.owner.is_none());
}

#[actix_web::test]
async fn my_bookings_requires_a_date() {
    let app =
        test::init_service(app_with(MockBookingCommand::new(), MockScheduleQuery::new())).await;
    let cookie = login_cookie(&app).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/my-bookings")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    // Missing query parameter is rejected by the extractor.
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn my_bookings_lists_owned_slots() {
    let actor_id = UserId::random();
    let payload = sample_payload(Some(actor_id));
    let mut schedule = MockScheduleQuery::new();
    schedule.expect_my_bookings().times(1).return_once(move |_| {
        Ok(crate::domain::ports::MyBookingsResponse {
            bookings: vec![payload],
        })
    });

    let app = test::init_service(app_with(MockBookingCommand::new(), schedule)).await;
    let cookie = login_cookie(&app).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/my-bookings?date=2025-12-04")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: MyBookingsBody = test::read_body_json(res).await;
    assert_eq!(body.bookings.len(), 1);
    assert_eq!(body.bookings[0].status, "occupied");
}
