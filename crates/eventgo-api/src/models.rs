// Wire types for the EventGo REST API.
//
// Field names follow the backend's snake_case JSON. Optional fields are
// `Option` because older backend builds omit them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `message` value the backend returns on a first-time check-in.
pub const CHECKIN_SUCCESS_MESSAGE: &str = "Check-in thành công";

/// `message` value the backend returns when the ticket was already used.
pub const ALREADY_CHECKED_IN_MESSAGE: &str = "Vé đã được check-in trước đó";

/// Body of `POST /events/{id}/checkin/`.
#[derive(Debug, Clone, Serialize)]
pub struct CheckinBody<'a> {
    pub qr_code: &'a str,
}

/// HTTP 200 body of `POST /events/{id}/checkin/`.
///
/// The same status covers both a fresh check-in and a repeat scan;
/// [`is_already_checked_in`](Self::is_already_checked_in) tells them apart.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CheckinResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub order_id: Option<u64>,
    #[serde(default)]
    pub attendee_name: Option<String>,
    #[serde(default)]
    pub checkin_time: Option<DateTime<Utc>>,
}

impl CheckinResponse {
    /// `true` when the backend reports the ticket was redeemed earlier.
    pub fn is_already_checked_in(&self) -> bool {
        self.message == ALREADY_CHECKED_IN_MESSAGE
    }
}

/// Error envelope: `{"error": "..."}` (DRF views) or `{"detail": "..."}`
/// (DRF authentication failures).
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

impl ErrorBody {
    /// Extract the human-readable message from a raw error body, if any.
    pub(crate) fn message_from(body: &str) -> Option<String> {
        let parsed: ErrorBody = serde_json::from_str(body).ok()?;
        parsed
            .error
            .or(parsed.detail)
            .filter(|m| !m.trim().is_empty())
    }
}

/// Body of a successful `POST /auth/login/`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Body of `GET /events/{id}/detail/` (fields the check-in flow needs).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EventDetail {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    pub date: DateTime<Utc>,
    pub status: String,
    #[serde(default)]
    pub location: Option<String>,
}
