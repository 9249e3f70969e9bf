use std::io;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use castaway_core::commands::PlayerCommand;
use castaway_core::engine::{EngineHandle, TransportEngine};
use castaway_core::episode::{self, Episode};
use ratatui::{
    backend::CrosstermBackend,
    crossterm::{
        event::{self, Event, KeyCode, KeyEventKind},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
};

mod router;
mod routes;
mod state;
mod ui;

use router::{Router, route_for_name, tab_names};
use routes::player::PlayerRoute;
use state::AppState;

fn main() -> anyhow::Result<()> {
    tui_logger::init_logger(log::LevelFilter::Debug).expect("Failed to init tui_logger");
    tui_logger::set_default_level(log::LevelFilter::Debug);

    log::info!("Starting castaway");

    // Episode catalog from the command line; without one the player starts
    // with the empty-player placeholder
    let catalog = match std::env::args().nth(1) {
        Some(path) => episode::load_catalog(Path::new(&path))
            .with_context(|| format!("could not load episode catalog {}", path))?,
        None => Vec::new(),
    };

    // Create the media engine and get the communication handle
    let (engine, handle) = TransportEngine::new();
    let _engine_thread = engine.spawn()?;

    run_tui(handle, catalog)
}

fn run_tui(handle: EngineHandle, catalog: Vec<Episode>) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut state = AppState::new(catalog);
    let mut router = Router::new(Box::new(PlayerRoute));

    loop {
        // Fold engine events into state
        while let Ok(event) = handle.event_rx.try_recv() {
            state.handle_event(event);
        }

        // React to whatever changed since the last turn
        state.sync_engine(&handle)?;

        terminal.draw(|f| ui::draw(f, &state, &router))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let should_quit =
                        handle_global_keys(key.code, &mut state, &handle, &mut router)?;
                    if should_quit {
                        break;
                    }
                }
            }
        }
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}

/// Handle global keys, then delegate to the active route
fn handle_global_keys(
    key: KeyCode,
    state: &mut AppState,
    handle: &EngineHandle,
    router: &mut Router,
) -> anyhow::Result<bool> {
    match key {
        KeyCode::Char('q') => {
            let _ = handle.cmd_tx.send(PlayerCommand::Quit);
            return Ok(true);
        }
        KeyCode::Tab => {
            let tabs = tab_names();
            let current_name = router.current().name();
            let current_idx = tabs.iter().position(|n| *n == current_name).unwrap_or(0);
            let next_route = route_for_name(tabs[(current_idx + 1) % tabs.len()]);
            router.replace(next_route);
            return Ok(false);
        }
        _ => {}
    }

    let action = router.current_mut().handle_input(key, state, handle)?;
    router.execute_action(action);
    Ok(false)
}
