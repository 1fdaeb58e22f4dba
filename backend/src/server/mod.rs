//! Server construction and middleware wiring.

mod config;

pub use config::AppSettings;

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Key, SameSite};
use actix_web::{App, HttpServer, web};
use tracing::{info, warn};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use backend::Trace;
#[cfg(debug_assertions)]
use backend::doc::ApiDoc;
use backend::domain::ports::{InMemoryFacilityDirectory, InMemorySlotRepository, StaticRoleResolver};
use backend::domain::{BookingService, ScheduleService};
use backend::inbound::http::bookings::{cancel_booking, claim_booking, my_bookings};
use backend::inbound::http::health::{HealthState, live, ready};
use backend::inbound::http::search::search_day;
use backend::inbound::http::state::HttpState;
use backend::outbound::persistence::{
    DbPool, DieselFacilityDirectory, DieselRoleResolver, DieselSlotRepository, PoolConfig,
};

/// Assemble the HTTP state from configuration.
///
/// With a database URL the Diesel adapters are used; without one the server
/// falls back to empty in-memory adapters, which keeps local runs and smoke
/// tests possible with no PostgreSQL at hand.
async fn build_http_state(settings: &AppSettings) -> std::io::Result<HttpState> {
    let policy = settings.policy();
    let markers = settings.teacher_only_markers();

    match settings.database_url.as_deref() {
        Some(url) => {
            let pool = DbPool::new(PoolConfig::new(url))
                .await
                .map_err(|err| std::io::Error::other(format!("database pool: {err}")))?;
            let slots = Arc::new(DieselSlotRepository::new(pool.clone()));
            let bookings = BookingService::new(
                Arc::clone(&slots),
                Arc::new(DieselRoleResolver::new(pool.clone())),
                policy,
            );
            let schedule = ScheduleService::new(
                slots,
                Arc::new(DieselFacilityDirectory::new(pool)),
                markers,
            );
            Ok(HttpState::new(Arc::new(bookings), Arc::new(schedule)))
        }
        None => {
            warn!("no database url configured; using empty in-memory adapters");
            let slots = Arc::new(InMemorySlotRepository::new());
            let bookings = BookingService::new(
                Arc::clone(&slots),
                Arc::new(StaticRoleResolver::new()),
                policy,
            );
            let schedule = ScheduleService::new(
                slots,
                Arc::new(InMemoryFacilityDirectory::default()),
                markers,
            );
            Ok(HttpState::new(Arc::new(bookings), Arc::new(schedule)))
        }
    }
}

fn session_key(settings: &AppSettings) -> std::io::Result<Key> {
    let Some(path) = settings.session_key_file.as_deref() else {
        if cfg!(debug_assertions) {
            warn!("using temporary session key (dev only)");
            return Ok(Key::generate());
        }
        return Err(std::io::Error::other(
            "BOOKING_SESSION_KEY_FILE must be set outside debug builds",
        ));
    };

    let bytes = std::fs::read(path).map_err(|err| {
        std::io::Error::other(format!(
            "failed to read session key at {}: {err}",
            path.display()
        ))
    })?;
    Ok(Key::derive_from(&bytes))
}

/// Bind and run the HTTP server until shutdown.
pub async fn run(settings: AppSettings) -> std::io::Result<()> {
    let state = build_http_state(&settings).await?;
    let key = session_key(&settings)?;
    let cookie_secure = settings.cookie_secure;
    let bind_addr = settings.bind_addr().to_owned();

    let health_state = web::Data::new(HealthState::new());
    // Clone for the server factory so the readiness probe stays reachable.
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        let session = SessionMiddleware::builder(CookieSessionStore::default(), key.clone())
            .cookie_name("session".to_owned())
            .cookie_path("/".to_owned())
            .cookie_secure(cookie_secure)
            .cookie_http_only(true)
            .cookie_same_site(SameSite::Lax)
            .build();

        let api = web::scope("/api/v1")
            .wrap(session)
            .service(search_day)
            .service(claim_booking)
            .service(cancel_booking)
            .service(my_bookings);

        let app = App::new()
            .app_data(server_health_state.clone())
            .app_data(web::Data::new(state.clone()))
            .wrap(Trace)
            .service(api)
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        let app =
            app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

        app
    })
    .bind(&bind_addr)?;

    info!(%bind_addr, "booking backend listening");
    health_state.mark_ready();
    server.run().await
}
