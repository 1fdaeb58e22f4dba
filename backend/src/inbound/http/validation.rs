//! Shared validation helpers for inbound HTTP adapters.

use chrono::NaiveDate;
use serde_json::json;
use uuid::Uuid;

use crate::domain::Error;

fn invalid_field(field: &'static str, message: String, code: &'static str, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "value": value,
        "code": code,
    }))
}

/// Parse a path or query UUID, reporting the offending field on failure.
pub(crate) fn parse_uuid(value: &str, field: &'static str) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| {
        invalid_field(
            field,
            format!("{field} must be a valid UUID"),
            "invalid_uuid",
            value,
        )
    })
}

/// Parse a `YYYY-MM-DD` calendar day.
pub(crate) fn parse_day(value: &str, field: &'static str) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        invalid_field(
            field,
            format!("{field} must be a YYYY-MM-DD date"),
            "invalid_date",
            value,
        )
    })
}
