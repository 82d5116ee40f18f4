//! userlist-tui binary entry point.
//!
//! Reads the config files, installs file logging, initializes the terminal
//! in raw mode, runs the TUI event loop, and restores the terminal on exit.
//!
use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::path::PathBuf;

use userlist_tui::app::config::Settings;
use userlist_tui::app::keymap::Keymap;
use userlist_tui::app::{self, AppState, Severity, Theme, config_file_write_path};
use userlist_tui::cli::Cli;
use userlist_tui::logging;
use userlist_tui::source::HttpSource;

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings_path = match &cli.config {
        Some(p) => p.to_string_lossy().into_owned(),
        None => config_file_write_path("userlist.conf"),
    };
    let (mut settings, problems) = Settings::load_or_init(&settings_path);
    cli.apply_to(&mut settings);

    let log_file = cli
        .log_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(config_file_write_path("userlist-tui.log")));
    if let Err(err) = logging::init(&log_file, settings.log_level.as_deref()) {
        eprintln!("warning: logging disabled: {err}");
    }
    for problem in &problems {
        tracing::warn!(path = %settings_path, error = %problem, "settings problem, default kept");
        eprintln!("warning: {settings_path}: {problem}");
    }

    let theme = Theme::load_or_init(&config_file_write_path("theme.conf"));
    let keymap = Keymap::load_or_init(&config_file_write_path("keybinds.conf"));
    let source = HttpSource::new(settings.endpoint.clone())
        .with_context(|| format!("building HTTP client for {}", settings.endpoint))?;
    tracing::info!(endpoint = %settings.endpoint, rows = settings.row_limit, "starting");

    let mut app_state = AppState::new(settings, theme, keymap);
    for problem in problems {
        app_state.notify(Severity::Warning, format!("userlist.conf: {problem}"));
    }
    let mut terminal = init_terminal().context("init terminal")?;

    let res = app::run(&mut terminal, &mut app_state, &source);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        tracing::error!(error = %err, "application error");
        eprintln!("application error: {err}");
    }
    Ok(())
}
