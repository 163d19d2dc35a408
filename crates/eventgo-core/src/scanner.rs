// ── Scanner input adapter ──
//
// A camera or hardware scanner reports the same code many times per
// second while it stays in view. The adapter forwards at most one decode
// per arming and drops the rest. The session re-arms it on returning to
// `Idle`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc;
use tracing::trace;

use crate::model::ScanEvent;

/// Forwarding flag shared between the adapter and the session task.
#[derive(Debug)]
pub(crate) struct ScanGate {
    armed: AtomicBool,
}

impl ScanGate {
    pub(crate) fn new() -> Self {
        Self {
            armed: AtomicBool::new(true),
        }
    }

    /// Close the gate if it is open. Returns `true` for the single winner.
    pub(crate) fn try_disarm(&self) -> bool {
        self.armed
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub(crate) fn arm(&self) {
        self.armed.store(true, Ordering::Release);
    }

    pub(crate) fn disarm(&self) {
        self.armed.store(false, Ordering::Release);
    }

    pub(crate) fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }
}

/// Handle given to the decode source. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ScannerInput {
    gate: Arc<ScanGate>,
    tx: mpsc::Sender<ScanEvent>,
}

impl ScannerInput {
    pub(crate) fn new(gate: Arc<ScanGate>, tx: mpsc::Sender<ScanEvent>) -> Self {
        Self { gate, tx }
    }

    /// Feed one raw decode. Returns `true` if it was forwarded as a
    /// [`ScanEvent`].
    ///
    /// Blank decodes are dropped without consuming the arming. Once the
    /// session is torn down every decode is dropped.
    pub fn on_decode(&self, raw: &str) -> bool {
        let code = raw.trim();
        if code.is_empty() {
            return false;
        }
        if !self.gate.try_disarm() {
            trace!("scanner disarmed, decode dropped");
            return false;
        }
        if self.tx.try_send(ScanEvent::new(code)).is_err() {
            // Session gone. Leave the gate closed.
            return false;
        }
        true
    }

    /// Whether the next decode would be forwarded.
    pub fn is_armed(&self) -> bool {
        self.gate.is_armed() && !self.tx.is_closed()
    }
}
