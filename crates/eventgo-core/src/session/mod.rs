// ── Check-in session ──
//
// Async driver for `SessionMachine`. One background task per session
// consumes scans, awaits the redeemer, broadcasts notifications and
// re-arms the scanner when the cool-down deadline passes. The network
// call is the task's only suspension point outside of waiting.

mod machine;
mod notification;

pub use machine::{SessionMachine, SessionState};
pub use notification::Notification;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::credentials::CredentialProvider;
use crate::model::{EventId, RedemptionOutcome, ScanEvent};
use crate::redeemer::Redeemer;
use crate::scanner::{ScanGate, ScannerInput};

const SCAN_CHANNEL_SIZE: usize = 4;
const NOTIFICATION_CHANNEL_SIZE: usize = 64;

/// A running check-in station for one event.
///
/// Dropping the session (or calling [`shutdown`](Self::shutdown)) stops the
/// background task. A redemption still in flight is abandoned and its
/// result is never reported.
pub struct CheckinSession {
    event_id: EventId,
    scanner: ScannerInput,
    state: watch::Receiver<SessionState>,
    notify_tx: broadcast::Sender<Notification>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl CheckinSession {
    /// Start a session in `Idle` with the scanner armed.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<R, C>(event_id: EventId, cooldown: Duration, redeemer: R, credentials: C) -> Self
    where
        R: Redeemer,
        C: CredentialProvider,
    {
        let gate = Arc::new(ScanGate::new());
        let (scan_tx, scan_rx) = mpsc::channel(SCAN_CHANNEL_SIZE);
        let (state_tx, state_rx) = watch::channel(SessionState::Idle);
        let (notify_tx, _) = broadcast::channel(NOTIFICATION_CHANNEL_SIZE);
        let cancel = CancellationToken::new();

        let worker = SessionTask {
            machine: SessionMachine::new(event_id, cooldown),
            redeemer,
            credentials,
            gate: Arc::clone(&gate),
            scans: scan_rx,
            state_tx,
            notify_tx: notify_tx.clone(),
            cancel: cancel.clone(),
        };
        info!(%event_id, cooldown_ms = cooldown.as_millis(), "check-in session started");
        let task = tokio::spawn(worker.run());

        Self {
            event_id,
            scanner: ScannerInput::new(gate, scan_tx),
            state: state_rx,
            notify_tx,
            cancel,
            task: Some(task),
        }
    }

    pub fn event_id(&self) -> EventId {
        self.event_id
    }

    /// Handle for the decode source.
    pub fn scanner(&self) -> ScannerInput {
        self.scanner.clone()
    }

    /// Subscribe to operator notifications. Only notifications produced
    /// after subscribing are received.
    pub fn notifications(&self) -> broadcast::Receiver<Notification> {
        self.notify_tx.subscribe()
    }

    /// Observe state transitions.
    pub fn state(&self) -> watch::Receiver<SessionState> {
        self.state.clone()
    }

    pub fn current_state(&self) -> SessionState {
        *self.state.borrow()
    }

    /// Stop the session and wait for the background task to exit.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(error = %e, "session task ended abnormally");
            }
        }
        info!(event_id = %self.event_id, "check-in session stopped");
    }
}

impl Drop for CheckinSession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

// ── Background task ──────────────────────────────────────────────

struct SessionTask<R, C> {
    machine: SessionMachine,
    redeemer: R,
    credentials: C,
    gate: Arc<ScanGate>,
    scans: mpsc::Receiver<ScanEvent>,
    state_tx: watch::Sender<SessionState>,
    notify_tx: broadcast::Sender<Notification>,
    cancel: CancellationToken,
}

impl<R: Redeemer, C: CredentialProvider> SessionTask<R, C> {
    async fn run(mut self) {
        'session: loop {
            // Idle: wait for the one scan this arming lets through.
            let scan = tokio::select! {
                biased;
                () = self.cancel.cancelled() => break,
                scan = self.scans.recv() => match scan {
                    Some(scan) => scan,
                    None => break,
                },
            };
            let Some(request) = self.machine.on_scan(scan) else {
                continue;
            };
            self.publish_state();

            // Submitting
            let outcome = match self.credentials.bearer_token() {
                Ok(token) => {
                    let submit = self.redeemer.redeem(&request, &token);
                    tokio::pin!(submit);
                    loop {
                        tokio::select! {
                            biased;
                            () = self.cancel.cancelled() => break 'session,
                            outcome = &mut submit => break outcome,
                            Some(_) = self.scans.recv() => debug!("scan dropped while submitting"),
                        }
                    }
                }
                Err(e) => {
                    warn!(error = %e, "no usable access token");
                    RedemptionOutcome::Unauthorized
                }
            };

            let Some(notification) = self.machine.on_outcome(outcome, Instant::now()) else {
                continue;
            };
            self.publish_state();
            info!(
                event_id = %notification.request.event_id,
                outcome = notification.outcome.kind(),
                "{}",
                notification.message
            );
            // No subscribers is fine.
            let _ = self.notify_tx.send(notification);

            // CoolingDown
            if let Some(deadline) = self.machine.deadline() {
                let sleep = tokio::time::sleep_until(deadline);
                tokio::pin!(sleep);
                loop {
                    tokio::select! {
                        biased;
                        () = self.cancel.cancelled() => break 'session,
                        () = &mut sleep => break,
                        Some(_) = self.scans.recv() => debug!("scan dropped while cooling down"),
                    }
                }
            }

            self.machine.on_tick(Instant::now());
            while self.scans.try_recv().is_ok() {}
            self.gate.arm();
            self.publish_state();
        }

        self.machine.reset();
        self.gate.disarm();
        self.publish_state();
        debug!("session task exited");
    }

    fn publish_state(&self) {
        self.state_tx.send_replace(self.machine.state());
    }
}
