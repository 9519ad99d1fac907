// Calendar Grid
// Lays out a day of events from a JSON file and prints the resulting blocks.
//
// Usage: calendar-grid <events.json> [YYYY-MM-DD] [--settings <grid.toml>] [--drag <id>:<pixels>]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use clap::Parser;
use egui::Pos2;

use calendar_grid::models::event::{Event, EventId};
use calendar_grid::models::settings::GridSettings;
use calendar_grid::services::event::{
    EventPatch, EventPayload, EventStore, RemoteCalendar, RemoteError, RemoteEvent,
};
use calendar_grid::services::settings::SettingsService;
use calendar_grid::ui_egui::drag::DragController;
use calendar_grid::ui_egui::views::{layout_day, TimeGridMapper, VisibleHours};
use calendar_grid::ui_egui::GrabTarget;

/// Remote used when running from a file: every call fails, so synced events
/// demonstrate rollback and local events update in place.
struct OfflineCalendar;

#[async_trait]
impl RemoteCalendar for OfflineCalendar {
    async fn create_event(&self, _payload: &EventPayload) -> Result<RemoteEvent, RemoteError> {
        Err(RemoteError::Request("offline".into()))
    }

    async fn update_event(
        &self,
        _remote_id: &str,
        _patch: &EventPatch,
    ) -> Result<RemoteEvent, RemoteError> {
        Err(RemoteError::Request("offline".into()))
    }

    async fn delete_event(&self, _remote_id: &str) -> Result<(), RemoteError> {
        Err(RemoteError::Request("offline".into()))
    }

    async fn get_event(&self, remote_id: &str) -> Result<RemoteEvent, RemoteError> {
        Err(RemoteError::NotFound(remote_id.to_string()))
    }
}

/// Lay out one day of events and optionally simulate a drag
#[derive(Parser)]
#[command(name = "calendar-grid")]
#[command(about = "Print the time-grid layout of a day of events")]
struct Cli {
    /// JSON array of events
    events: PathBuf,

    /// Day to lay out (YYYY-MM-DD), defaults to the earliest event's day
    day: Option<NaiveDate>,

    /// Grid settings file, defaults to the platform config directory
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Drag an event vertically, e.g. "3:120" moves event 3 down 120px
    #[arg(long, value_parser = parse_drag, allow_hyphen_values = true)]
    drag: Option<(EventId, f32)>,
}

fn parse_drag(value: &str) -> Result<(EventId, f32), String> {
    let (id, pixels) = value
        .split_once(':')
        .ok_or_else(|| format!("expected <id>:<pixels>, got {value}"))?;
    let id = id
        .trim()
        .parse()
        .map_err(|_| format!("invalid event id {id}"))?;
    let pixels = pixels
        .trim()
        .parse()
        .map_err(|_| format!("invalid pixel offset {pixels}"))?;
    Ok((id, pixels))
}

fn load_events(path: &PathBuf) -> Result<Vec<Event>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read events from {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse events in {}", path.display()))
}

fn print_day(store: &EventStore, settings: &GridSettings, day: NaiveDate) -> VisibleHours {
    let events = store.events_on(day);
    let visible = VisibleHours::compute(settings.working_hours, &events);
    let mapper = TimeGridMapper::from_settings(settings);

    println!(
        "{} (hours {:02}:00-{:02}:00)",
        day.format("%A %-d %B %Y"),
        visible.earliest_event_hour,
        visible.latest_event_hour
    );
    for block in layout_day(&events, day, visible.range(), &mapper) {
        let Some(event) = events.iter().find(|e| e.id == block.event_id) else {
            continue;
        };
        println!(
            "  [{}/{}] {:>5.1}% top  {:>6.1}px tall  left {:>5.1}%  width {:>5.1}%  {} {}-{}",
            block.column + 1,
            block.columns,
            block.top_percent,
            block.height_px,
            block.left_percent,
            block.width_percent,
            event.title,
            event.start.format("%H:%M"),
            event.end.format("%H:%M"),
        );
    }
    visible
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args = Cli::parse();
    let settings = match &args.settings {
        Some(path) => SettingsService::new(path).load()?,
        None => SettingsService::from_default_location()?.load()?,
    };

    let store = EventStore::new(Arc::new(OfflineCalendar));
    for event in load_events(&args.events)? {
        store.insert(event)?;
    }
    log::info!("Loaded {} events from {}", store.len(), args.events.display());

    let day = match args.day {
        Some(day) => day,
        None => store
            .events()
            .iter()
            .map(|e| e.start.date())
            .min()
            .ok_or_else(|| anyhow!("No events in {}", args.events.display()))?,
    };

    let visible = print_day(&store, &settings, day);

    for event in store.events_on(day) {
        if let Some(summary) = store.describe_recurrence(&event).await {
            println!("  {}: {}", event.title, summary);
        }
    }

    if let Some((id, pixels)) = args.drag {
        let event = store
            .get(id)
            .ok_or_else(|| anyhow!("No event with id {}", id))?;
        let mut drag = DragController::new(&settings, visible.range());
        drag.pointer_down(&event, event.start.date(), GrabTarget::Body, Pos2::new(0.0, 0.0));
        drag.pointer_move(Pos2::new(0.0, pixels));

        match drag.release(&store, Instant::now()).await {
            Ok(outcome) => println!("\nDrag {:+}px: {:?}", pixels, outcome),
            Err(err) => println!("\nDrag {:+}px rolled back: {}", pixels, err),
        }
        print_day(&store, &settings, day);
    }

    Ok(())
}
