//! Application settings loaded via OrthoConfig.
//!
//! Every knob can come from CLI flags, environment variables with the
//! `BOOKING_` prefix, or a configuration file. Booking limits live here
//! rather than as constants because deployments disagree on them.

use std::path::PathBuf;

use backend::domain::{BookingPolicy, default_teacher_only_markers};
use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Configuration values controlling the booking server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BOOKING")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL; absent means in-memory adapters.
    pub database_url: Option<String>,
    /// File holding the session cookie signing key.
    pub session_key_file: Option<PathBuf>,
    /// Mark the session cookie `Secure`.
    #[ortho_config(default = true)]
    pub cookie_secure: bool,
    /// Daily booking allowance in minutes.
    pub max_daily_minutes: Option<u32>,
    /// Minutes charged for an open-ended slot.
    pub fallback_slot_minutes: Option<u32>,
    /// Restrict each actor to one room per day.
    #[ortho_config(default = true)]
    pub single_room_per_day: bool,
    /// Description substrings reserving a facility for teachers.
    pub teacher_only_markers: Option<Vec<String>>,
}

impl AppSettings {
    /// Bind address, falling back to the default.
    pub fn bind_addr(&self) -> &str {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR)
    }

    /// Booking policy assembled from the configured limits.
    pub fn policy(&self) -> BookingPolicy {
        let mut policy =
            BookingPolicy::default().with_single_room_per_day(self.single_room_per_day);
        if let Some(minutes) = self.max_daily_minutes {
            policy = policy.with_max_daily_minutes(minutes);
        }
        if let Some(minutes) = self.fallback_slot_minutes {
            policy = policy.with_fallback_slot_minutes(minutes);
        }
        policy
    }

    /// Teacher-only description markers, falling back to the defaults.
    pub fn teacher_only_markers(&self) -> Vec<String> {
        self.teacher_only_markers
            .clone()
            .unwrap_or_else(default_teacher_only_markers)
    }
}
