mod notice;
mod state;
mod theme;
mod ui;

use anyhow::Result;
use crossterm::{
    event::EventStream,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures_util::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use snc_client::{run_sync_loop, BotApiClient, POLL_INTERVAL};
use state::{App, Config};
use std::{
    io,
    time::{Duration, Instant},
};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

const COMMAND_QUEUE_CAPACITY: usize = 16;
const EVENT_QUEUE_CAPACITY: usize = 256;
const UI_TICK_MS: u64 = 200;

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config();
    init_logging();
    info!(event = "console_starting", api = %config.api_base_url);

    let client = BotApiClient::new(config.api_base_url.clone())?;
    let (command_tx, command_rx) = mpsc::channel(COMMAND_QUEUE_CAPACITY);
    let (event_tx, mut event_rx) = mpsc::channel(EVENT_QUEUE_CAPACITY);
    let sync_task = tokio::spawn(run_sync_loop(client, POLL_INTERVAL, event_tx, command_rx));
    let mut app = App::new(config, command_tx);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let mut events = EventStream::new();
    let mut ui_ticker = tokio::time::interval(Duration::from_millis(UI_TICK_MS));

    loop {
        app.tick(Instant::now());
        terminal.draw(|frame| ui::render(frame, &mut app))?;
        tokio::select! {
            _ = ui_ticker.tick() => {}
            Some(event) = event_rx.recv() => {
                app.apply_api_event(event, Instant::now());
            }
            maybe_event = events.next() => {
                if let Some(Ok(event)) = maybe_event {
                    app.handle_input(event, Instant::now());
                }
            }
        }
        if app.should_quit() {
            break;
        }
    }

    // The sync loop owns the poll timer; aborting the task here guarantees
    // no fetch fires after the console has torn down.
    sync_task.abort();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn load_config() -> Config {
    Config {
        api_base_url: resolve_api_base_url(),
    }
}

fn resolve_api_base_url() -> String {
    if let Ok(value) = std::env::var("SNC_API_URL") {
        if !value.trim().is_empty() {
            return value;
        }
    }
    "http://127.0.0.1:8000".to_string()
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_enabled = std::env::var("SNC_LOG_STDOUT")
        .ok()
        .and_then(|value| parse_bool_flag(&value))
        .unwrap_or(false);
    if stdout_enabled {
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    } else {
        // The alternate screen owns stdout; logs go nowhere unless asked for.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::sink)
            .try_init();
    }
}

fn parse_bool_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
