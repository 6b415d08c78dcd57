// ABOUTME: Main entry point for the tab console TUI

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, Terminal};
use std::{
    io,
    path::PathBuf,
    sync::Arc,
    time::{Duration, Instant},
};

use tab_console::app::{App, EventHandler};
use tab_console::components::LayoutComponent;
use tab_console::config::AppConfig;
use tab_console::storage::{JsonFileStorage, TabStorage};

#[derive(Debug, Parser)]
#[command(name = "tab-console", version, about = "Terminal admin console with persistent tabs")]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for the persisted tab session
    #[arg(long)]
    storage_dir: Option<PathBuf>,

    /// Do not restore or save open tabs
    #[arg(long)]
    no_cache: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging();
    setup_panic_handler();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if cli.no_cache {
        config.tab.cache = false;
    }

    let storage = match cli.storage_dir {
        Some(dir) => JsonFileStorage::with_dir(dir),
        None => JsonFileStorage::new(),
    }
    .context("Failed to prepare tab storage")?;
    let storage: Arc<dyn TabStorage> = Arc::new(storage);

    let mut app = App::new(&config, storage);
    app.init().await;
    let mut layout = LayoutComponent::new();

    let result = run_tui(&mut app, &mut layout).await;
    app.shutdown();
    result
}

async fn run_tui(app: &mut App, layout: &mut LayoutComponent) -> Result<()> {
    if let Err(e) = crossterm::terminal::is_raw_mode_enabled() {
        eprintln!("Cannot check terminal raw mode: {}", e);
        return Err(anyhow::anyhow!("Terminal not compatible: {}", e));
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| {
            layout.render(frame, &app.state);
        })?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if crossterm::event::poll(timeout)? {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press {
                    if let Some(app_event) = EventHandler::handle_key_event(key_event, &mut app.state) {
                        EventHandler::process_event(app_event, &mut app.state);
                    }
                }
            }
        }

        // Navigation requested by a key press runs right away rather than on the next tick
        if app.state.pending_async_action.is_some() || last_tick.elapsed() >= tick_rate {
            if let Err(e) = app.tick().await {
                tracing::error!("Error during app tick: {}", e);
            }
            last_tick = Instant::now();

            if app.needs_ui_refresh() {
                terminal.draw(|frame| {
                    layout.render(frame, &app.state);
                })?;
            }
        }

        if app.state.should_quit {
            break;
        }
    }

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}

fn setup_logging() {
    use std::fs::OpenOptions;
    use tracing_subscriber::prelude::*;

    let log_dir = dirs::home_dir()
        .map(|home| home.join(".tab-console").join("logs"))
        .unwrap_or_else(|| PathBuf::from(".tab-console/logs"));

    let _ = std::fs::create_dir_all(&log_dir);

    let log_file = log_dir.join(format!(
        "tab-console-{}.log",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    ));

    let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_file) else {
        eprintln!("Cannot open log file {}, logging disabled", log_file.display());
        return;
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false), // No ANSI colors in log file
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tab_console=info".into()),
        )
        .init();
}

fn setup_panic_handler() {
    use tracing::error;

    std::panic::set_hook(Box::new(|panic_info| {
        // Restore the terminal before reporting
        let _ = disable_raw_mode();
        let _ = execute!(std::io::stderr(), LeaveAlternateScreen, DisableMouseCapture);

        error!("Application panicked: {}", panic_info);
        eprintln!("Application panicked: {}", panic_info);
        eprintln!("Please check the logs for more details.");
    }));
}
