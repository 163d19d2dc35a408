// ── Core error types ──
//
// User-facing errors from eventgo-core. Consumers never see raw HTTP
// status codes or JSON parse failures; the `From<eventgo_api::Error>` impl
// translates transport-layer errors into domain variants.
//
// Redemption attempts do NOT use this type: every attempt resolves to a
// `RedemptionOutcome`. `CoreError` covers login, event lookup, credentials
// and configuration.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach EventGo backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Auth errors ──────────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("No access token available: {message}")]
    NoCredentials { message: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<eventgo_api::Error> for CoreError {
    fn from(err: eventgo_api::Error) -> Self {
        match err {
            eventgo_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            eventgo_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            eventgo_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            eventgo_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            eventgo_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            eventgo_api::Error::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            eventgo_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
