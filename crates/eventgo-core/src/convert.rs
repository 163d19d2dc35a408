// ── API-to-domain conversions ──
//
// Maps raw `eventgo_api` results into the canonical redemption outcome
// taxonomy and domain types. Classification is total: every response or
// failure lands on exactly one `RedemptionOutcome` variant.

use tracing::debug;

use eventgo_api::{CheckinResponse, Error, EventDetail};

use crate::model::{EventId, EventStatus, EventSummary, RedemptionOutcome};

// ── Redemption ─────────────────────────────────────────────────────

/// Classify the result of one check-in call.
pub fn classify(result: Result<CheckinResponse, Error>) -> RedemptionOutcome {
    match result {
        Ok(resp) => classify_response(resp),
        Err(err) => classify_error(err),
    }
}

fn classify_response(resp: CheckinResponse) -> RedemptionOutcome {
    if resp.is_already_checked_in() {
        return RedemptionOutcome::AlreadyRedeemed {
            attendee_name: resp.attendee_name,
            redeemed_at: resp.checkin_time,
        };
    }

    match resp.order_id {
        Some(order_id) => RedemptionOutcome::Success {
            order_id,
            attendee_name: resp.attendee_name,
        },
        None => {
            debug!(message = %resp.message, "200 response without order_id");
            RedemptionOutcome::TransientError {
                message: "unexpected check-in response".into(),
            }
        }
    }
}

fn classify_error(err: Error) -> RedemptionOutcome {
    match err {
        Error::Authentication { .. } => RedemptionOutcome::Unauthorized,
        Error::Api { status: 400, message } => RedemptionOutcome::InvalidCode {
            reason: Some(message).filter(|m| !m.is_empty()),
        },
        Error::Api { status: 404, .. } => RedemptionOutcome::NotFound,
        Error::Api { status, message } => RedemptionOutcome::TransientError {
            message: format!("server returned HTTP {status}: {message}"),
        },
        Error::Timeout { timeout_secs } => RedemptionOutcome::TransientError {
            message: format!("request timed out after {timeout_secs}s"),
        },
        Error::Transport(e) if e.is_connect() => RedemptionOutcome::TransientError {
            message: "cannot reach the server".into(),
        },
        Error::Transport(e) => RedemptionOutcome::TransientError {
            message: format!("network error: {e}"),
        },
        Error::Deserialization { message, .. } => RedemptionOutcome::TransientError {
            message: format!("unreadable server response: {message}"),
        },
        Error::Tls(msg) => RedemptionOutcome::TransientError {
            message: format!("TLS error: {msg}"),
        },
        Error::InvalidUrl(e) => RedemptionOutcome::TransientError {
            message: format!("invalid server URL: {e}"),
        },
    }
}

// ── Event ──────────────────────────────────────────────────────────

impl From<EventDetail> for EventSummary {
    fn from(d: EventDetail) -> Self {
        let status = d
            .status
            .parse()
            .unwrap_or_else(|_| EventStatus::Other(d.status.clone()));
        Self {
            id: EventId::new(d.id),
            name: d.name.filter(|n| !n.trim().is_empty()),
            starts_at: d.date,
            status,
            location: d.location,
        }
    }
}
