use std::io;
use std::time::Instant;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tokio::sync::mpsc;
use tracing::info;

use refreshkit_core::AppConfig;
use refreshkit_tui::{
    app::App,
    event::{AppEvent, EventHandler, LoadResult},
    input::{handle_key_event, handle_mouse_event},
    widgets::{FeedListWidget, StatusBarWidget},
};

pub async fn run(config: AppConfig) -> Result<()> {
    // Create channel for async load results
    let (load_tx, mut load_rx) = mpsc::unbounded_channel::<LoadResult>();

    let event_handler = EventHandler::new(config.ui.tick_rate_ms);
    let mut app = App::new(config, load_tx)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle("refreshkit"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    info!("Terminal demo started");

    let result = main_loop(&mut terminal, &mut app, &event_handler, &mut load_rx);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!("Terminal demo stopped");
    result
}

fn main_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    event_handler: &EventHandler,
    load_rx: &mut mpsc::UnboundedReceiver<LoadResult>,
) -> Result<()> {
    // Checked at the end of each iteration to pick the next poll timeout
    let mut needs_fast_update = false;

    loop {
        // Process any completed loads (non-blocking)
        while let Ok(result) = load_rx.try_recv() {
            app.on_load_result(result);
        }

        app.animate(Instant::now());

        // Draw UI
        terminal.draw(|frame| {
            let size = frame.area();

            // Main layout: list + status bar
            let main_layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(3), Constraint::Length(1)])
                .split(size);

            // List rows inside the border
            app.resize(main_layout[0].height.saturating_sub(2));

            FeedListWidget::render(frame, main_layout[0], app);
            StatusBarWidget::render(frame, main_layout[1], app);
        })?;

        let event = if needs_fast_update {
            event_handler.next_animation()?
        } else {
            event_handler.next()?
        };
        if let Some(event) = event {
            match event {
                AppEvent::Key(key) => app.handle_action(handle_key_event(key), Instant::now()),
                AppEvent::Mouse(mouse) => {
                    app.handle_action(handle_mouse_event(mouse), Instant::now())
                }
                AppEvent::Resize(_, _) => {
                    // The next draw picks up the new size
                }
                AppEvent::Tick => app.tick_spinner(),
            }
        }

        needs_fast_update = app.needs_fast_update() || app.viewport().is_dragging();

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
