use crate::app::App;
use crate::ui;
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::{Duration, Instant};

use super::action_queue::Action;
use super::actions::{Channels, Runtime};
use super::views::handle_key;

pub async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    runtime: &mut Runtime,
    mut channels: Channels,
) -> Result<()> {
    runtime.enqueue(Action::Reload(app.current_view));

    loop {
        app.on_frame(Instant::now());
        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(outcome) = handle_key(key, app, runtime.action_tx()) {
                        runtime.form_outcome(outcome);
                    }
                }
            }
        }

        while let Ok(action) = channels.actions.try_recv() {
            runtime.run_action(action, app);
        }
        while let Ok(outcome) = channels.outcomes.try_recv() {
            runtime.apply_outcome(outcome, app);
        }

        if !app.running {
            break;
        }
    }

    runtime.shutdown();
    app.close_form();
    Ok(())
}
