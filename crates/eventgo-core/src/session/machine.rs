// ── Redemption session state machine ──
//
// Pure transition logic with no I/O and no clock of its own: callers pass
// `now` in, which keeps every transition deterministic under test.
//
//   Idle ──scan──▶ Submitting ──outcome──▶ CoolingDown ──deadline──▶ Idle
//
// Scans in any state other than `Idle` are dropped.

use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, info};

use super::notification::Notification;
use crate::model::{EventId, RedemptionOutcome, RedemptionRequest, ScanEvent};

/// Where the session is in its redemption cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Ready for the next scan. The only state in which the scanner is armed.
    Idle,
    /// One request in flight.
    Submitting,
    /// Outcome shown; the scanner stays disarmed until `until`.
    CoolingDown { until: Instant },
}

impl SessionState {
    pub fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Short label for logs and status output.
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Submitting => "submitting",
            Self::CoolingDown { .. } => "cooling_down",
        }
    }
}

impl Serialize for SessionState {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// State machine for one check-in session bound to one event.
#[derive(Debug)]
pub struct SessionMachine {
    event_id: EventId,
    cooldown: Duration,
    state: SessionState,
    in_flight: Option<RedemptionRequest>,
}

impl SessionMachine {
    pub fn new(event_id: EventId, cooldown: Duration) -> Self {
        Self {
            event_id,
            cooldown,
            state: SessionState::Idle,
            in_flight: None,
        }
    }

    pub fn event_id(&self) -> EventId {
        self.event_id
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The request currently awaiting an outcome, if any.
    pub fn in_flight(&self) -> Option<&RedemptionRequest> {
        self.in_flight.as_ref()
    }

    /// Cool-down deadline while in `CoolingDown`.
    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            SessionState::CoolingDown { until } => Some(until),
            _ => None,
        }
    }

    /// `Idle` + scan: build the request and move to `Submitting`.
    /// Any other state drops the scan and returns `None`.
    pub fn on_scan(&mut self, scan: ScanEvent) -> Option<RedemptionRequest> {
        if !self.state.is_idle() {
            debug!(state = self.state.label(), "scan dropped");
            return None;
        }
        let request = RedemptionRequest::new(self.event_id, scan.code);
        info!(event_id = %self.event_id, "submitting check-in");
        self.in_flight = Some(request.clone());
        self.state = SessionState::Submitting;
        Some(request)
    }

    /// `Submitting` + outcome: start the cool-down and produce the single
    /// notification for this request. Outcomes arriving in any other state
    /// are stale and ignored.
    pub fn on_outcome(&mut self, outcome: RedemptionOutcome, now: Instant) -> Option<Notification> {
        if self.state != SessionState::Submitting {
            debug!(state = self.state.label(), "stale outcome ignored");
            return None;
        }
        let request = self.in_flight.take()?;
        let until = now + self.cooldown;
        self.state = SessionState::CoolingDown { until };
        debug!(cooldown_ms = self.cooldown.as_millis(), "cooling down");
        Some(Notification::new(request, outcome, Utc::now()))
    }

    /// Deadline check. Returns `true` on the `CoolingDown → Idle` transition.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        match self.state {
            SessionState::CoolingDown { until } if now >= until => {
                self.state = SessionState::Idle;
                debug!("re-armed");
                true
            }
            _ => false,
        }
    }

    /// Drop all state. Used on teardown.
    pub fn reset(&mut self) {
        self.in_flight = None;
        self.state = SessionState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COOLDOWN: Duration = Duration::from_secs(2);

    fn machine() -> SessionMachine {
        SessionMachine::new(EventId::new(42), COOLDOWN)
    }

    fn success() -> RedemptionOutcome {
        RedemptionOutcome::Success {
            order_id: 77,
            attendee_name: None,
        }
    }

    #[test]
    fn full_cycle() {
        let mut m = machine();
        let t0 = Instant::now();

        let req = m.on_scan(ScanEvent::new("TICKET-ABC123"));
        assert_eq!(req, Some(RedemptionRequest::new(EventId::new(42), "TICKET-ABC123")));
        assert_eq!(m.state(), SessionState::Submitting);

        let note = m.on_outcome(success(), t0);
        assert!(note.is_some());
        assert_eq!(m.deadline(), Some(t0 + COOLDOWN));
        assert!(m.in_flight().is_none());

        assert!(!m.on_tick(t0 + COOLDOWN - Duration::from_millis(1)));
        assert!(m.on_tick(t0 + COOLDOWN));
        assert!(m.state().is_idle());
    }

    #[test]
    fn scans_dropped_outside_idle() {
        let mut m = machine();
        let t0 = Instant::now();
        assert!(m.on_scan(ScanEvent::new("A")).is_some());
        assert!(m.on_scan(ScanEvent::new("B")).is_none());
        assert_eq!(m.in_flight().map(|r| r.code.as_str()), Some("A"));

        m.on_outcome(RedemptionOutcome::NotFound, t0);
        assert!(m.on_scan(ScanEvent::new("C")).is_none());
    }

    #[test]
    fn outcome_without_request_is_ignored() {
        let mut m = machine();
        assert!(m.on_outcome(success(), Instant::now()).is_none());
        assert!(m.state().is_idle());
    }

    #[test]
    fn every_outcome_cools_down() {
        let outcomes = [
            success(),
            RedemptionOutcome::AlreadyRedeemed {
                attendee_name: None,
                redeemed_at: None,
            },
            RedemptionOutcome::InvalidCode { reason: None },
            RedemptionOutcome::NotFound,
            RedemptionOutcome::Unauthorized,
            RedemptionOutcome::TransientError {
                message: "timeout".into(),
            },
        ];
        for outcome in outcomes {
            let mut m = machine();
            m.on_scan(ScanEvent::new("X"));
            let kind = outcome.kind();
            assert!(m.on_outcome(outcome, Instant::now()).is_some(), "{kind}");
            assert!(m.deadline().is_some(), "{kind}");
        }
    }

    #[test]
    fn tick_in_idle_is_noop() {
        let mut m = machine();
        assert!(!m.on_tick(Instant::now()));
    }

    #[test]
    fn reset_discards_in_flight() {
        let mut m = machine();
        m.on_scan(ScanEvent::new("A"));
        m.reset();
        assert!(m.state().is_idle());
        assert!(m.in_flight().is_none());
        assert!(m.on_outcome(success(), Instant::now()).is_none());
    }
}
