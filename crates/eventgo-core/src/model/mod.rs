// ── Domain model ──
//
// Canonical check-in types. Wire-format types live in `eventgo_api::models`
// and are converted in `crate::convert`.

pub mod event;
pub mod outcome;
pub mod scan;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use event::{CheckinAvailability, EventStatus, EventSummary};
pub use outcome::{OutcomeCategory, RedemptionOutcome};
pub use scan::{RedemptionRequest, ScanEvent};

/// Backend identifier of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(u64);

impl EventId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for EventId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EventId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}
