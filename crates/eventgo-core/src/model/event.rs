use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use strum::{Display, EnumString, IntoStaticStr};

use super::EventId;

/// How long before its start an upcoming event opens for early check-in.
pub const EARLY_CHECKIN_WINDOW: Duration = Duration::hours(24);

/// Lifecycle status reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, EnumString, IntoStaticStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EventStatus {
    Upcoming,
    Ongoing,
    Completed,
    Canceled,
    #[strum(default)]
    #[serde(untagged)]
    Other(String),
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Other(raw) => f.write_str(raw),
            known => {
                let name: &'static str = known.into();
                f.write_str(name)
            }
        }
    }
}

/// Event details relevant to a check-in station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventSummary {
    pub id: EventId,
    pub name: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub status: EventStatus,
    pub location: Option<String>,
}

impl EventSummary {
    pub fn availability(&self, now: DateTime<Utc>) -> CheckinAvailability {
        CheckinAvailability::evaluate(&self.status, self.starts_at, now)
    }
}

/// Whether an event currently accepts check-ins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CheckinAvailability {
    /// Event is running.
    Ongoing,
    /// Upcoming, but within [`EARLY_CHECKIN_WINDOW`] of its start.
    Early,
    /// Upcoming and further out than the early window. Still accepted.
    Upcoming,
    /// Completed, canceled or unknown status.
    Closed,
}

impl CheckinAvailability {
    pub fn evaluate(status: &EventStatus, starts_at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        match status {
            EventStatus::Ongoing => Self::Ongoing,
            EventStatus::Upcoming if starts_at - now <= EARLY_CHECKIN_WINDOW => Self::Early,
            EventStatus::Upcoming => Self::Upcoming,
            EventStatus::Completed | EventStatus::Canceled | EventStatus::Other(_) => Self::Closed,
        }
    }

    pub fn allows_check_in(self) -> bool {
        !matches!(self, Self::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().unwrap_or_else(|e| panic!("bad timestamp {s}: {e}"))
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("ONGOING".parse::<EventStatus>().ok(), Some(EventStatus::Ongoing));
        assert_eq!(
            "postponed".parse::<EventStatus>().ok(),
            Some(EventStatus::Other("postponed".into()))
        );
    }

    #[test]
    fn upcoming_within_a_day_is_early() {
        let start = at("2024-01-02T09:00:00Z");
        let now = at("2024-01-01T10:00:00Z");
        assert_eq!(
            CheckinAvailability::evaluate(&EventStatus::Upcoming, start, now),
            CheckinAvailability::Early
        );
    }

    #[test]
    fn upcoming_far_out_is_still_allowed() {
        let start = at("2024-01-10T09:00:00Z");
        let now = at("2024-01-01T10:00:00Z");
        let availability = CheckinAvailability::evaluate(&EventStatus::Upcoming, start, now);
        assert_eq!(availability, CheckinAvailability::Upcoming);
        assert!(availability.allows_check_in());
    }

    #[test]
    fn finished_events_are_closed() {
        let now = at("2024-01-01T10:00:00Z");
        for status in [
            EventStatus::Completed,
            EventStatus::Canceled,
            EventStatus::Other("draft".into()),
        ] {
            let availability = CheckinAvailability::evaluate(&status, now, now);
            assert!(!availability.allows_check_in(), "{status} should be closed");
        }
    }
}
