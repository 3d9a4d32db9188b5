//! tabview - browse CSV, JSON and YAML tables in the terminal
//!
//! Each file opens in its own tab with search, per-column filters, sorting,
//! pagination, row selection, column reordering and export.

mod action;
mod app;
mod component;
mod components;
mod config;
mod logging;
mod model;
mod services;
mod tui;

use crate::action::Action;
use crate::app::App;
use crate::component::Component;
use crate::config::Config;
use crate::tui::Tui;
use anyhow::{bail, Result};
use clap::Parser;
use crossterm::event::Event;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "tabview", version, about = "Terminal viewer for tabular data")]
struct Cli {
    /// CSV, JSON or YAML files to open, one tab each
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Column schema (JSON or YAML list of column descriptors)
    #[arg(long, env = "TABVIEW_SCHEMA")]
    schema: Option<PathBuf>,

    /// Rows per page
    #[arg(long)]
    page_size: Option<usize>,

    /// Directory exports are written to
    #[arg(long, env = "TABVIEW_EXPORT_DIR")]
    export_dir: Option<String>,

    /// Shell command that receives exported rows as JSON on stdin
    #[arg(long, env = "TABVIEW_EXPORT_COMMAND")]
    export_command: Option<String>,

    /// Disable the global search box
    #[arg(long)]
    no_search: bool,

    /// Save the effective settings to ~/.tabview/config.json
    #[arg(long)]
    save_config: bool,

    /// Log file (default ~/.tabview/tabview.log)
    #[arg(long, env = "TABVIEW_LOG_FILE")]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Command-line flags win over the config file
    fn apply(&self, config: &mut Config) {
        if let Some(page_size) = self.page_size {
            config.page_size = page_size;
        }
        if let Some(ref dir) = self.export_dir {
            config.export_dir = dir.clone();
        }
        if let Some(ref command) = self.export_command {
            config.export_command = Some(command.clone());
        }
        if self.no_search {
            config.search_enabled = false;
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_default();
    cli.apply(&mut config);
    if cli.save_config {
        config.save()?;
    }

    let log_path = cli.log_file.clone().unwrap_or_else(logging::default_log_path);
    if let Err(e) = logging::init(&log_path, config.log_level()) {
        eprintln!("Logging disabled: {:#}", e);
    }

    let schema = match cli.schema {
        Some(ref path) => Some(services::load_schema(path)?),
        None => None,
    };

    // Load everything before touching the terminal so errors stay readable
    let mut datasets = Vec::new();
    let mut skipped = Vec::new();
    for path in &cli.files {
        match services::load_dataset(path, schema.as_deref(), config.page_size) {
            Ok(dataset) => datasets.push(dataset),
            Err(e) => {
                log::error!("{}", e);
                eprintln!("Skipping {}: {}", path.display(), e);
                skipped.push(path.display().to_string());
            }
        }
    }
    if datasets.is_empty() {
        bail!("none of the given files could be loaded");
    }

    let mut app = App::new(datasets, schema, config);
    if !skipped.is_empty() {
        app.error = Some(format!("Could not load: {}", skipped.join(", ")));
    }
    app.init()?;

    let mut tui = Tui::new(Duration::from_millis(app.config.tick_rate_ms))?;
    tui.enter()?;

    let result = run_app(&mut tui, &mut app);

    tui.exit()?;

    if let Err(err) = result {
        log::error!("{:#}", err);
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }

    Ok(())
}

/// Run the main application loop
fn run_app(tui: &mut Tui, app: &mut App) -> Result<()> {
    while !app.should_quit {
        tui.draw(|frame| {
            if let Err(e) = app.draw(frame, frame.area()) {
                log::error!("draw error: {}", e);
            }
        })?;

        let action = match tui.next_event()? {
            Some(Event::Key(key)) => app.handle_key_event(key)?,
            Some(Event::Mouse(mouse)) => app.handle_mouse_event(mouse)?,
            Some(Event::Resize(w, h)) => Some(Action::Resize(w, h)),
            Some(_) => None,
            None => Some(Action::Tick),
        };

        let mut current = action;
        while let Some(a) = current {
            current = app.update(a)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_flags_override_config() {
        let cli = Cli::parse_from([
            "tabview",
            "people.csv",
            "--page-size",
            "25",
            "--no-search",
        ]);
        let mut config = Config::default();
        cli.apply(&mut config);

        assert_eq!(config.page_size, 25);
        assert!(!config.search_enabled);
        assert_eq!(config.export_dir, ".");
    }

    #[test]
    fn test_files_are_required() {
        assert!(Cli::try_parse_from(["tabview"]).is_err());
    }
}
