//! Check-in command handlers.
//!
//! `scan` turns stdin into a decode stream for a long-running session;
//! `redeem` runs a single redemption cycle.

use chrono::{Local, Utc};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use eventgo_core::{
    Backend, CheckinAvailability, EventId, Notification, OutcomeCategory, RedemptionOutcome,
};

use crate::cli::{CheckinArgs, CheckinCommand, GlobalOpts};
use crate::config::Resolved;
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(
    backend: &Backend,
    args: CheckinArgs,
    resolved: &Resolved,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        CheckinCommand::Scan {
            event,
            force,
            skip_event_check,
        } => {
            let event_id = EventId::new(event);
            if !skip_event_check {
                check_event_open(backend, event_id, resolved, force, global.quiet).await?;
            }
            scan(backend, event_id, resolved, global).await
        }
        CheckinCommand::Redeem { event, code } => {
            redeem(backend, EventId::new(event), &code, resolved, global).await
        }
    }
}

// ── Event gate ──────────────────────────────────────────────────────

async fn check_event_open(
    backend: &Backend,
    event_id: EventId,
    resolved: &Resolved,
    force: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let event = backend
        .event(event_id, Some(resolved.credentials.as_ref()))
        .await
        .map_err(|e| resolved.core_error(e))?;
    let name = event.name.clone().unwrap_or_else(|| format!("event {event_id}"));

    match event.availability(Utc::now()) {
        CheckinAvailability::Ongoing => {}
        CheckinAvailability::Early | CheckinAvailability::Upcoming => {
            let starts = event.starts_at.with_timezone(&Local).format("%Y-%m-%d %H:%M");
            util::status(quiet, format!("Early check-in: {name} starts {starts}"));
        }
        CheckinAvailability::Closed if force => {
            warn!(%event_id, status = %event.status, "event closed, scanning anyway");
        }
        CheckinAvailability::Closed => {
            return Err(CliError::EventClosed {
                event_id: event_id.to_string(),
                status: event.status.to_string(),
            });
        }
    }
    util::status(quiet, format!("Checking in: {name}"));
    Ok(())
}

// ── Scan ────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct Tally {
    success: u32,
    duplicate: u32,
    error: u32,
}

impl Tally {
    fn record(&mut self, note: &Notification) {
        match note.category {
            OutcomeCategory::Success => self.success += 1,
            OutcomeCategory::Duplicate => self.duplicate += 1,
            OutcomeCategory::Error => self.error += 1,
        }
    }

    fn total(&self) -> u32 {
        self.success + self.duplicate + self.error
    }
}

async fn scan(
    backend: &Backend,
    event_id: EventId,
    resolved: &Resolved,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let session = backend.start_session(event_id, resolved.credentials.clone());
    let scanner = session.scanner();
    let mut notes = session.notifications();
    let color = output::should_color(global);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending: u32 = 0;
    let mut tally = Tally::default();
    let mut reauth_hinted = false;

    util::status(
        global.quiet,
        "Ready. One code per line; Ctrl-D to finish, Ctrl-C to abort.",
    );

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                debug!("interrupted");
                break;
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    // EOF: report what is still in flight, then stop.
                    while pending > 0 {
                        let note = next_notification(&mut notes).await?;
                        pending -= 1;
                        report(&note, &mut tally, &mut reauth_hinted, global, color);
                    }
                    break;
                };
                if scanner.on_decode(&line) {
                    pending += 1;
                } else {
                    debug!("decode dropped");
                }
            }
            note = next_notification(&mut notes) => {
                let note = note?;
                pending = pending.saturating_sub(1);
                report(&note, &mut tally, &mut reauth_hinted, global, color);
            }
        }
    }

    session.shutdown().await;
    util::status(
        global.quiet,
        format!(
            "{} scanned: {} checked in, {} already checked in, {} failed",
            tally.total(),
            tally.success,
            tally.duplicate,
            tally.error
        ),
    );
    Ok(())
}

fn report(
    note: &Notification,
    tally: &mut Tally,
    reauth_hinted: &mut bool,
    global: &GlobalOpts,
    color: bool,
) {
    tally.record(note);
    output::print_output(
        &output::render_notification(&output::format(global), note, color),
        global.quiet,
    );
    if note.reauth_required && !*reauth_hinted {
        util::status(global.quiet, "Access token rejected. Run: eventgo login");
        *reauth_hinted = true;
    }
}

async fn next_notification(
    notes: &mut broadcast::Receiver<Notification>,
) -> Result<Notification, CliError> {
    loop {
        match notes.recv().await {
            Ok(note) => return Ok(note),
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!(skipped = n, "notification output fell behind");
            }
            Err(broadcast::error::RecvError::Closed) => return Err(CliError::SessionClosed),
        }
    }
}

// ── Redeem ──────────────────────────────────────────────────────────

async fn redeem(
    backend: &Backend,
    event_id: EventId,
    code: &str,
    resolved: &Resolved,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let session = backend.start_session(event_id, resolved.credentials.clone());
    let mut notes = session.notifications();

    if !session.scanner().on_decode(code) {
        return Err(CliError::Validation {
            field: "code".into(),
            reason: "ticket code cannot be empty".into(),
        });
    }

    let pb = util::spinner("Checking in...", global.quiet);
    let note = next_notification(&mut notes).await;
    pb.finish_and_clear();
    session.shutdown().await;
    let note = note?;

    let color = output::should_color(global);
    output::print_output(
        &output::render_notification(&output::format(global), &note, color),
        global.quiet,
    );

    match CliError::from_outcome(&note.outcome) {
        None => Ok(()),
        Some(CliError::Redemption {
            outcome: RedemptionOutcome::Unauthorized,
            message,
        }) => Err(CliError::AuthFailed {
            profile: resolved.profile_name.clone(),
            message,
        }),
        Some(err) => Err(err),
    }
}
