//! Event command handlers.

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use eventgo_core::{Backend, CheckinAvailability, EventId, EventSummary};

use crate::cli::{EventsArgs, EventsCommand, GlobalOpts};
use crate::config::Resolved;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct EventView {
    #[serde(flatten)]
    event: EventSummary,
    availability: CheckinAvailability,
    checked_at: DateTime<Utc>,
}

fn detail(view: &EventView) -> String {
    let e = &view.event;
    let availability = match view.availability {
        CheckinAvailability::Ongoing => "open".to_owned(),
        CheckinAvailability::Early => "open (early check-in)".to_owned(),
        CheckinAvailability::Upcoming => "open (event has not started)".to_owned(),
        CheckinAvailability::Closed => "closed".to_owned(),
    };
    output::render_detail(&[
        ("ID", e.id.to_string()),
        ("Name", e.name.clone().unwrap_or_default()),
        (
            "Starts",
            e.starts_at
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M %Z")
                .to_string(),
        ),
        ("Status", e.status.to_string()),
        ("Location", e.location.clone().unwrap_or_default()),
        ("Check-in", availability),
    ])
}

pub async fn handle(
    backend: &Backend,
    args: EventsArgs,
    resolved: &Resolved,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        EventsCommand::Show { id } => {
            let event = backend
                .event(EventId::new(id), Some(resolved.credentials.as_ref()))
                .await
                .map_err(|e| resolved.core_error(e))?;
            let now = Utc::now();
            let view = EventView {
                availability: event.availability(now),
                event,
                checked_at: now,
            };
            let out = output::render_single(&output::format(global), &view, detail, |v| {
                v.availability.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
