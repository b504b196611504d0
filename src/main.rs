use anyhow::{Context, Result};
use chrono::Local;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Instant;
use tracing::info;

use days_left::config::Config;
use days_left::tui::{self, App};
use days_left::{logging, store};

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--init") {
        let path = Config::generate_default()?;
        println!("Generated config file at: {}", path.display());
        println!("Set sync_dir to a synced folder to share your name across machines.");
        return Ok(());
    }

    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("days-left — how much of the year is left");
        println!();
        println!("USAGE:");
        println!("  days-left           Start the TUI");
        println!("  days-left --init    Generate a default config file");
        println!();
        println!("CONFIG:");
        println!("  File: ~/.config/days-left/config.toml");
        println!("  Or set env vars: DAYS_LEFT_SYNC_DIR and DAYS_LEFT_LOG");
        println!();
        println!("KEYBINDINGS:");
        println!("  Hover a day         Show its date after a second");
        println!("  Enter / Esc         Save name / leave the name prompt");
        println!("  n                   Back to the name prompt");
        println!("  r                   Refresh");
        println!("  q / Ctrl+C          Quit");
        return Ok(());
    }

    let config = Config::load().with_context(|| {
        "Failed to load configuration.\n\
         Run `days-left --init` to generate a config file."
    })?;

    // Without a log file the app still runs, just silently.
    match logging::init(&config.log_level) {
        Ok(Some(path)) => info!(log = %path.display(), "days-left starting"),
        Ok(None) => {}
        Err(e) => eprintln!("Warning: logging disabled: {e:#}"),
    }

    let store = store::open(&config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(store, Local::now(), Instant::now());
    let result = run_app(&mut terminal, &mut app).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
    }

    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    app.render(Local::now().date_naive());

    loop {
        terminal.draw(|f| tui::ui::render(f, app))?;

        let timeout = app.next_wakeup(Instant::now());
        match tui::event::poll_event(timeout)? {
            Some(Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                ..
            })) => tui::event::handle_key(app, code, modifiers),
            Some(Event::Mouse(mouse)) => tui::event::handle_mouse(app, mouse, Instant::now()),
            _ => {}
        }

        if !app.running {
            break;
        }

        app.tick(Instant::now(), Local::now());

        // Apply finished background work without blocking.
        app.poll_headline_result();
        app.poll_save_result(Local::now().date_naive());

        // Let spawned store tasks make progress between frames.
        tokio::task::yield_now().await;
    }

    Ok(())
}
