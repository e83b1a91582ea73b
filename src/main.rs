mod alert;
mod app;
mod config;
mod form;
mod format;
mod store;
mod table;
mod theme;
mod ui;

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::{App, Popup};
use config::AppConfig;
use store::Store;

#[derive(Parser, Debug)]
#[command(name = "kaigi")]
#[command(author = "Sean Fournier")]
#[command(version = "0.1.0")]
#[command(about = "A terminal-friendly meeting-room reservation client")]
struct Args {
    /// Output today's agenda as JSON (for scripts/status bars)
    #[arg(short, long)]
    status: bool,

    /// Reserve a room by id without opening the TUI
    #[arg(short, long, value_name = "ROOM_ID")]
    reserve: Option<String>,

    /// Meeting title for --reserve
    #[arg(long, default_value = "Quick reservation")]
    title: String,

    /// Date for --reserve (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    date: Option<String>,

    /// Start time for --reserve (HH:MM)
    #[arg(long, default_value = "09:00")]
    start: String,

    /// End time for --reserve (HH:MM)
    #[arg(long, default_value = "10:00")]
    end: String,

    /// Attendee count for --reserve
    #[arg(long, default_value_t = 2)]
    attendees: u32,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    // Handle CLI-only commands
    if args.status {
        return print_status();
    }

    if let Some(room) = args.reserve.clone() {
        return reserve_room(&room, &args);
    }

    // Run TUI
    run_tui().await
}

fn print_status() -> Result<()> {
    let config = AppConfig::load().unwrap_or_default();
    let store = Store::load(config.store_file.as_deref());
    let today = Local::now().date_naive();

    let agenda: Vec<serde_json::Value> = store
        .agenda_for(today)
        .iter()
        .map(|r| {
            serde_json::json!({
                "room": store.room_name_of(r.room_id),
                "title": r.title,
                "start": format::time(&r.date.and_time(r.start)),
                "end": format::time(&r.date.and_time(r.end)),
            })
        })
        .collect();

    let output = serde_json::json!({
        "date": today.format(format::DATE_FMT).to_string(),
        "reservations": agenda,
    });

    println!("{}", serde_json::to_string(&output)?);
    Ok(())
}

/// One-shot reservation without the TUI. Reuses the same form gate and
/// room checks the popup goes through.
fn reserve_room(room_ident: &str, args: &Args) -> Result<()> {
    // A blank identifier is a no-op, same as in the TUI.
    if room_ident.trim().is_empty() {
        return Ok(());
    }

    let config = AppConfig::load().unwrap_or_default();
    let store = Store::load(config.store_file.as_deref());
    let mut app = App::from_parts(config, store);

    app.open_quick_reserve(room_ident);

    let date = args
        .date
        .clone()
        .unwrap_or_else(|| Local::now().date_naive().format(format::DATE_FMT).to_string());

    app.form.fields[form::FIELD_TITLE].set_value(args.title.clone());
    app.form.fields[form::FIELD_DATE].set_value(date);
    app.form.fields[form::FIELD_START].set_value(args.start.clone());
    app.form.fields[form::FIELD_END].set_value(args.end.clone());
    app.form.fields[form::FIELD_ATTENDEES].set_value(args.attendees.to_string());

    let before = app.store.reservations.len();
    app.submit_form();

    if app.store.reservations.len() > before {
        let message = app
            .alerts
            .iter()
            .last()
            .map(|a| a.message.clone())
            .unwrap_or_else(|| "Reservation created".to_string());
        notify("kaigi", &message)?;
        println!("{}", message);
        return Ok(());
    }

    // Field error or room-level rejection; surface whichever we have.
    let reason = app
        .alerts
        .iter()
        .last()
        .map(|a| a.message.clone())
        .or_else(|| {
            app.form
                .fields
                .iter()
                .find_map(|f| f.error.as_ref().map(|e| format!("{}: {}", f.label, e)))
        })
        .unwrap_or_else(|| "Reservation rejected".to_string());
    anyhow::bail!("{}", reason)
}

async fn run_tui() -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app state
    let mut app = App::new()?;

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') if app.popup == Popup::None => return Ok(()),
                        KeyCode::Char('c')
                            if key.modifiers.contains(event::KeyModifiers::CONTROL) =>
                        {
                            return Ok(())
                        }
                        _ => {
                            // Handle key and catch any errors to prevent crashes
                            if let Err(e) = app.handle_key(key) {
                                app.alerts.push(
                                    alert::AlertLevel::Error,
                                    format!("Error: {}", e),
                                );
                            }
                        }
                    }
                }
            }
        }

        // Periodic housekeeping (alert timers)
        app.tick();
    }
}

fn notify(summary: &str, body: &str) -> Result<()> {
    notify_rust::Notification::new()
        .summary(summary)
        .body(body)
        .icon("appointment-new")
        .show()?;
    Ok(())
}
