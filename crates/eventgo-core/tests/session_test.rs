#![allow(clippy::unwrap_used)]
// Session controller tests driven by a scripted redeemer under paused time.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pretty_assertions::assert_eq;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::time::Instant;

use eventgo_core::{
    BearerToken, CheckinSession, CoreError, CredentialProvider, EventId, OutcomeCategory,
    RedemptionOutcome, RedemptionRequest, Redeemer, SessionState, StaticCredentials,
};

const COOLDOWN: Duration = Duration::from_secs(2);

// ── Fakes ───────────────────────────────────────────────────────────

#[derive(Default)]
struct Counters {
    started: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    completed: AtomicUsize,
}

/// Returns scripted outcomes in order after `delay`.
#[derive(Clone)]
struct ScriptedRedeemer {
    outcomes: Arc<Mutex<VecDeque<RedemptionOutcome>>>,
    seen: Arc<Mutex<Vec<(RedemptionRequest, String)>>>,
    counters: Arc<Counters>,
    delay: Duration,
}

impl ScriptedRedeemer {
    fn new(delay: Duration, outcomes: impl IntoIterator<Item = RedemptionOutcome>) -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(outcomes.into_iter().collect())),
            seen: Arc::default(),
            counters: Arc::default(),
            delay,
        }
    }
}

impl Redeemer for ScriptedRedeemer {
    async fn redeem(&self, request: &RedemptionRequest, token: &BearerToken) -> RedemptionOutcome {
        self.seen
            .lock()
            .unwrap()
            .push((request.clone(), token.expose().to_owned()));
        let c = &self.counters;
        c.started.fetch_add(1, Ordering::SeqCst);
        let now = c.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        c.max_in_flight.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(self.delay).await;

        c.in_flight.fetch_sub(1, Ordering::SeqCst);
        c.completed.fetch_add(1, Ordering::SeqCst);
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(RedemptionOutcome::NotFound)
    }
}

struct NoCredentials;

impl CredentialProvider for NoCredentials {
    fn bearer_token(&self) -> Result<BearerToken, CoreError> {
        Err(CoreError::NoCredentials {
            message: "not logged in".into(),
        })
    }
}

fn creds() -> StaticCredentials {
    StaticCredentials::new("staff-token".to_owned())
}

fn success() -> RedemptionOutcome {
    RedemptionOutcome::Success {
        order_id: 77,
        attendee_name: Some("Nguyen Van A".into()),
    }
}

/// Let the session task run until it blocks again.
async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

// ── At most one in flight ───────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_at_most_one_request_in_flight() {
    let redeemer = ScriptedRedeemer::new(Duration::from_millis(500), [success(), success()]);
    let session = CheckinSession::start(EventId::new(42), COOLDOWN, redeemer.clone(), creds());
    let scanner = session.scanner();
    let mut notes = session.notifications();

    assert!(scanner.on_decode("TICKET-ABC123"));
    settle().await;
    assert_eq!(session.current_state(), SessionState::Submitting);

    // Burst of decodes while submitting: all dropped.
    for _ in 0..20 {
        assert!(!scanner.on_decode("TICKET-ABC123"));
        assert!(!scanner.on_decode("TICKET-OTHER"));
    }

    let note = notes.recv().await.unwrap();
    assert_eq!(note.category, OutcomeCategory::Success);

    // Still dropped during cool-down.
    assert!(!scanner.on_decode("TICKET-OTHER"));

    tokio::time::sleep(COOLDOWN).await;
    settle().await;
    assert!(scanner.is_armed());
    assert!(scanner.on_decode("TICKET-OTHER"));
    notes.recv().await.unwrap();

    assert_eq!(redeemer.counters.started.load(Ordering::SeqCst), 2);
    assert_eq!(redeemer.counters.max_in_flight.load(Ordering::SeqCst), 1);
    assert_eq!(notes.try_recv().unwrap_err(), TryRecvError::Empty);

    session.shutdown().await;
}

// ── Cool-down ───────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_cooldown_is_respected_for_every_outcome() {
    let outcomes = vec![
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
    let count = outcomes.len();
    let redeemer = ScriptedRedeemer::new(Duration::from_millis(100), outcomes);
    let session = CheckinSession::start(EventId::new(42), COOLDOWN, redeemer, creds());
    let scanner = session.scanner();
    let mut notes = session.notifications();
    let mut state = session.state();

    for i in 0..count {
        assert!(scanner.on_decode(&format!("CODE-{i}")), "scan {i} not forwarded");
        notes.recv().await.unwrap();
        let notified_at = Instant::now();

        state.wait_for(|s| s.is_idle()).await.unwrap();
        assert!(
            notified_at.elapsed() >= COOLDOWN,
            "re-armed after {:?}",
            notified_at.elapsed()
        );
    }

    session.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_cooling_down_carries_deadline() {
    let redeemer = ScriptedRedeemer::new(Duration::ZERO, [success()]);
    let session = CheckinSession::start(EventId::new(42), COOLDOWN, redeemer, creds());
    let mut notes = session.notifications();

    session.scanner().on_decode("TICKET-ABC123");
    notes.recv().await.unwrap();
    let now = Instant::now();

    match session.current_state() {
        SessionState::CoolingDown { until } => assert_eq!(until, now + COOLDOWN),
        other => panic!("expected CoolingDown, got {other:?}"),
    }

    session.shutdown().await;
}

// ── Teardown ────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_shutdown_abandons_in_flight_request() {
    let redeemer = ScriptedRedeemer::new(Duration::from_secs(10), [success()]);
    let session = CheckinSession::start(EventId::new(42), COOLDOWN, redeemer.clone(), creds());
    let scanner = session.scanner();
    let mut notes = session.notifications();

    assert!(scanner.on_decode("TICKET-ABC123"));
    settle().await;
    assert_eq!(redeemer.counters.started.load(Ordering::SeqCst), 1);

    session.shutdown().await;
    tokio::time::sleep(Duration::from_secs(30)).await;

    assert_eq!(redeemer.counters.completed.load(Ordering::SeqCst), 0);
    assert_eq!(notes.recv().await.unwrap_err(), RecvError::Closed);
    assert!(!scanner.is_armed());
    assert!(!scanner.on_decode("TICKET-ABC123"));
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_during_cooldown_never_rearms() {
    let redeemer = ScriptedRedeemer::new(Duration::from_millis(50), [success(), success()]);
    let session = CheckinSession::start(EventId::new(42), COOLDOWN, redeemer.clone(), creds());
    let scanner = session.scanner();
    let mut notes = session.notifications();
    let mut state = session.state();

    assert!(scanner.on_decode("TICKET-ABC123"));
    notes.recv().await.unwrap();
    assert!(matches!(
        *state.borrow_and_update(),
        SessionState::CoolingDown { .. }
    ));

    session.shutdown().await;

    // Teardown discards the state; the deadline passing afterwards changes nothing.
    assert_eq!(*state.borrow_and_update(), SessionState::Idle);
    tokio::time::sleep(COOLDOWN * 3).await;
    assert!(state.changed().await.is_err());

    assert!(!scanner.is_armed());
    assert!(!scanner.on_decode("TICKET-OTHER"));
    assert_eq!(notes.recv().await.unwrap_err(), RecvError::Closed);
    assert_eq!(redeemer.counters.started.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_drop_stops_session() {
    let redeemer = ScriptedRedeemer::new(Duration::from_secs(1), [success()]);
    let session = CheckinSession::start(EventId::new(42), COOLDOWN, redeemer.clone(), creds());
    let scanner = session.scanner();
    let mut notes = session.notifications();

    scanner.on_decode("TICKET-ABC123");
    settle().await;
    drop(session);

    assert_eq!(notes.recv().await.unwrap_err(), RecvError::Closed);
    assert_eq!(redeemer.counters.completed.load(Ordering::SeqCst), 0);
}

// ── Scenarios ───────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_successful_check_in_notifies_once() {
    let redeemer = ScriptedRedeemer::new(Duration::from_millis(50), [success()]);
    let session = CheckinSession::start(EventId::new(42), COOLDOWN, redeemer.clone(), creds());
    let mut notes = session.notifications();

    assert!(session.scanner().on_decode("TICKET-ABC123"));
    let note = notes.recv().await.unwrap();

    assert_eq!(
        note.request,
        RedemptionRequest::new(EventId::new(42), "TICKET-ABC123")
    );
    assert_eq!(note.outcome, success());
    assert_eq!(note.category, OutcomeCategory::Success);
    assert!(!note.reauth_required);
    assert!(note.message.contains("77"));

    let seen = redeemer.seen.lock().unwrap().clone();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].1, "staff-token");

    tokio::time::sleep(COOLDOWN * 2).await;
    assert_eq!(notes.try_recv().unwrap_err(), TryRecvError::Empty);
    session.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_duplicate_is_not_an_error() {
    let dup = RedemptionOutcome::AlreadyRedeemed {
        attendee_name: Some("Nguyen Van A".into()),
        redeemed_at: "2024-01-01T10:00:00Z".parse().ok(),
    };
    let redeemer = ScriptedRedeemer::new(Duration::from_millis(50), [dup.clone()]);
    let session = CheckinSession::start(EventId::new(42), COOLDOWN, redeemer, creds());
    let mut notes = session.notifications();

    session.scanner().on_decode("TICKET-ABC123");
    let note = notes.recv().await.unwrap();

    assert_eq!(note.outcome, dup);
    assert_eq!(note.category, OutcomeCategory::Duplicate);
    assert!(!note.reauth_required);
    session.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_unauthorized_requests_reauth() {
    let redeemer = ScriptedRedeemer::new(Duration::from_millis(50), [RedemptionOutcome::Unauthorized]);
    let session = CheckinSession::start(EventId::new(42), COOLDOWN, redeemer, creds());
    let mut notes = session.notifications();
    let mut state = session.state();

    session.scanner().on_decode("TICKET-ABC123");
    let note = notes.recv().await.unwrap();

    assert_eq!(note.outcome, RedemptionOutcome::Unauthorized);
    assert_eq!(note.category, OutcomeCategory::Error);
    assert!(note.reauth_required);

    // Cool-down still applies, then the scanner re-arms.
    state.wait_for(|s| s.is_idle()).await.unwrap();
    assert!(session.scanner().is_armed());
    session.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_missing_credentials_skip_the_network() {
    let redeemer = ScriptedRedeemer::new(Duration::ZERO, [success()]);
    let session = CheckinSession::start(EventId::new(42), COOLDOWN, redeemer.clone(), NoCredentials);
    let mut notes = session.notifications();

    session.scanner().on_decode("TICKET-ABC123");
    let note = notes.recv().await.unwrap();

    assert_eq!(note.outcome, RedemptionOutcome::Unauthorized);
    assert!(note.reauth_required);
    assert_eq!(redeemer.counters.started.load(Ordering::SeqCst), 0);
    session.shutdown().await;
}
