use serde::Serialize;
use tokio::time::Instant;

use super::EventId;

/// One decoded code forwarded by the scanner.
///
/// Ephemeral: created by [`ScannerInput`](crate::ScannerInput), consumed by
/// the session immediately, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEvent {
    pub code: String,
    /// Monotonic capture time.
    pub captured_at: Instant,
}

impl ScanEvent {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            captured_at: Instant::now(),
        }
    }
}

/// A single redemption attempt: one code for one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedemptionRequest {
    pub event_id: EventId,
    pub code: String,
}

impl RedemptionRequest {
    pub fn new(event_id: EventId, code: impl Into<String>) -> Self {
        Self {
            event_id,
            code: code.into(),
        }
    }
}
