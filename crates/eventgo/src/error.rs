//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError`, `ConfigError` and non-success redemption outcomes into
//! user-facing errors with actionable help text and exit codes.

use miette::Diagnostic;
use thiserror::Error;

use eventgo_config::ConfigError;
use eventgo_core::{CoreError, RedemptionOutcome};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    /// Ticket code rejected by the backend (unpaid, malformed).
    pub const REJECTED: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to EventGo backend at {url}")]
    #[diagnostic(
        code(eventgo::connection_failed),
        help(
            "Check that the backend is reachable.\n\
             URL: {url}\n\
             Try: eventgo events show <id> -v"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("TLS setup failed: {reason}")]
    #[diagnostic(
        code(eventgo::tls_error),
        help(
            "Use --insecure (-k) to accept a self-signed certificate,\n\
             or configure ca_cert in your profile."
        )
    )]
    TlsError { reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(eventgo::auth_failed),
        help(
            "The access token is missing, invalid or expired.\n\
             Run: eventgo login --profile {profile}"
        )
    )]
    AuthFailed { profile: String, message: String },

    #[error("No access token for profile '{profile}'")]
    #[diagnostic(
        code(eventgo::no_credentials),
        help(
            "Log in with: eventgo login\n\
             Or pass --token / set EVENTGO_TOKEN."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(code(eventgo::not_found))]
    NotFound {
        resource_type: String,
        identifier: String,
    },

    #[error("Event {event_id} is not open for check-in (status: {status})")]
    #[diagnostic(
        code(eventgo::event_closed),
        help("Use --force to start scanning anyway.")
    )]
    EventClosed { event_id: String, status: String },

    // ── Redemption ───────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(eventgo::redemption))]
    Redemption {
        outcome: RedemptionOutcome,
        message: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error: {message}")]
    #[diagnostic(code(eventgo::api_error))]
    ApiError {
        message: String,
        status: Option<u16>,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(eventgo::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(eventgo::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: eventgo config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No EventGo server configured")]
    #[diagnostic(
        code(eventgo::no_config),
        help(
            "Create a profile with: eventgo config init\n\
             Or pass --server / set EVENTGO_SERVER.\n\
             Config file: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(eventgo::config))]
    Config { message: String },

    #[error("Keyring error: {message}")]
    #[diagnostic(
        code(eventgo::keyring),
        help("Use --store config to keep the token in the config file instead.")
    )]
    Keyring { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("'{action}' requires confirmation")]
    #[diagnostic(
        code(eventgo::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(eventgo::timeout),
        help("Increase timeout with --timeout or check backend responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── Session ──────────────────────────────────────────────────────
    #[error("Check-in session ended unexpectedly")]
    #[diagnostic(code(eventgo::session_closed))]
    SessionClosed,

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::EventClosed { .. } => exit_code::CONFLICT,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::ProfileNotFound { .. }
            | Self::NoConfig { .. } => exit_code::USAGE,
            Self::Redemption { outcome, .. } => match outcome {
                RedemptionOutcome::InvalidCode { .. } => exit_code::REJECTED,
                RedemptionOutcome::NotFound => exit_code::NOT_FOUND,
                RedemptionOutcome::Unauthorized => exit_code::AUTH,
                RedemptionOutcome::TransientError { .. } => exit_code::CONNECTION,
                RedemptionOutcome::Success { .. }
                | RedemptionOutcome::AlreadyRedeemed { .. } => exit_code::GENERAL,
            },
            _ => exit_code::GENERAL,
        }
    }

    /// Error for a redemption that did not admit the ticket.
    ///
    /// `None` for `Success` and `AlreadyRedeemed`: a repeat scan of a valid
    /// ticket is not a failure.
    pub fn from_outcome(outcome: &RedemptionOutcome) -> Option<Self> {
        match outcome {
            RedemptionOutcome::Success { .. } | RedemptionOutcome::AlreadyRedeemed { .. } => None,
            other => Some(Self::Redemption {
                outcome: other.clone(),
                message: other.to_string(),
            }),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl CliError {
    /// Map a core error. `profile` is the profile whose credentials were
    /// used, so auth help text points at the right `eventgo login`.
    pub fn from_core(err: CoreError, profile: &str) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => {
                if reason.starts_with("TLS error") {
                    CliError::TlsError { reason }
                } else {
                    CliError::ConnectionFailed {
                        url,
                        source: reason.into(),
                    }
                }
            }

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed {
                profile: profile.to_owned(),
                message,
            },

            CoreError::NoCredentials { message: _ } => CliError::NoCredentials {
                profile: profile.to_owned(),
            },

            CoreError::EventNotFound { event_id } => CliError::NotFound {
                resource_type: "event".into(),
                identifier: event_id,
            },

            CoreError::Api { message, status } => CliError::ApiError { message, status },

            CoreError::Config { message } => CliError::Config { message },

            CoreError::Internal(message) => CliError::ApiError {
                message,
                status: None,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::ProfileNotFound { name } => CliError::ProfileNotFound {
                name,
                available: String::new(),
            },
            ConfigError::Keyring(e) => CliError::Keyring {
                message: e.to_string(),
            },
            ConfigError::Io(e) => CliError::Io(e),
            other @ (ConfigError::Serialization(_) | ConfigError::Figment(_)) => {
                CliError::Config {
                    message: other.to_string(),
                }
            }
        }
    }
}
