//! Ticket redemption workflow between `eventgo-api` and operator front ends.
//!
//! This crate owns the check-in state machine and the domain model for the
//! EventGo operator tools:
//!
//! - **[`ScannerInput`]**: Gate between a continuous decode source (camera,
//!   stdin, hardware scanner) and the session. Forwards at most one
//!   [`ScanEvent`] per arming and drops everything else.
//!
//! - **[`SessionMachine`]**: Pure `Idle → Submitting → CoolingDown → Idle`
//!   state machine. Owns the "at most one request in flight" invariant and
//!   the cool-down deadline.
//!
//! - **[`CheckinSession`]**: Async driver for the machine: one background
//!   task consumes scans, awaits the [`Redeemer`], broadcasts one
//!   [`Notification`] per request, and re-arms the scanner when the
//!   cool-down deadline passes. Dropping the session abandons any in-flight
//!   call.
//!
//! - **[`Backend`]**: Facade over the EventGo API: login, event lookup,
//!   and session construction from a [`CheckinConfig`].
//!
//! - **Domain model** ([`model`]): [`RedemptionRequest`],
//!   [`RedemptionOutcome`], [`EventSummary`] and friends.

pub mod backend;
pub mod config;
pub mod convert;
pub mod credentials;
pub mod error;
pub mod model;
pub mod redeemer;
pub mod scanner;
pub mod session;

// ── Primary re-exports ──────────────────────────────────────────────
pub use backend::Backend;
pub use config::{CheckinConfig, DEFAULT_COOLDOWN, DEFAULT_TIMEOUT, TlsVerification};
pub use credentials::{CredentialProvider, StaticCredentials};
pub use error::CoreError;
pub use redeemer::Redeemer;
pub use scanner::ScannerInput;
pub use session::{CheckinSession, Notification, SessionMachine, SessionState};

pub use eventgo_api::BearerToken;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    CheckinAvailability, EventId, EventStatus, EventSummary, OutcomeCategory, RedemptionOutcome,
    RedemptionRequest, ScanEvent,
};
