mod api;
mod app;
mod auth;
mod bootstrap;
mod cli;
mod config;
mod logging;
mod login;
mod runtime;
mod services;
mod session_store;
mod time_utils;
mod types;
mod ui;

use anyhow::{Context, Result};
use api::Backend;
use app::App;
use clap::Parser;
use cli::{Cli, Commands};
use config::FlowConfig;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use session_store::SessionStore;
use std::io;

#[tokio::main]
async fn main() -> Result<()> {
    // .env values become FLOW_* variables for the config loader.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let cfg = FlowConfig::load()?;
    logging::init(&FlowConfig::log_path()?, &cfg.log_level)?;

    match cli.command {
        Commands::Run => {
            let backend = Backend::remote(&cfg);
            run(cfg, backend, SessionStore::default_location()?).await
        }
        Commands::Dev => {
            let sessions = SessionStore::new(config::root_path()?.join("dev-session"));
            run(cfg, Backend::dev(), sessions).await
        }
        Commands::Login => {
            let sessions = SessionStore::default_location()?;
            login::run_login(&Backend::remote(&cfg), &sessions).await?;
            Ok(())
        }
        Commands::Logout => {
            SessionStore::default_location()?.clear()?;
            println!("Logged out. Session removed.");
            Ok(())
        }
        Commands::ConfigPath => {
            let path = FlowConfig::ensure_exists()?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

async fn run(cfg: FlowConfig, backend: Backend, sessions: SessionStore) -> Result<()> {
    let session = sessions.load()?;
    let api = backend.connect(session.as_deref()).context(
        "Failed to set up the record API client. Set project_id and public_key in the file \
         printed by `flow-tui config-path`.",
    )?;

    let mut app = App::new(cfg, FlowConfig::config_path()?);
    app.dev_mode = backend.is_dev();
    bootstrap::initialize_app_state(&mut app, &api).await;
    let (mut runtime, channels) = runtime::Runtime::new(backend, sessions, api);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let res = runtime::run_app(&mut terminal, &mut app, &mut runtime, channels).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "event loop failed");
        eprintln!("Error: {:?}", err);
    }
    tracing::info!("exiting");
    Ok(())
}
