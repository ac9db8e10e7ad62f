mod app;
mod components;
mod event;
mod handler;
mod theme;
mod tui;
mod ui;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

use sync_tree_view::compare::scan::{compare_folder_pairs, FolderPairSpec};
use sync_tree_view::config::{AppConfig, SyncConfig, ViewConfig};
use sync_tree_view::error::{AppError, Result};

use crate::app::App;
use crate::event::{Event, EventHandler};
use crate::tui::{install_panic_hook, Tui};

/// Browse the differences between folder pairs as an aggregated tree.
#[derive(Parser, Debug)]
#[command(name = "stv", version, about)]
struct Cli {
    /// Left folder of the first pair
    left: Option<PathBuf>,

    /// Right folder of the first pair
    right: Option<PathBuf>,

    /// Additional folder pair (repeatable)
    #[arg(long = "pair", num_args = 2, value_names = ["LEFT", "RIGHT"], action = ArgAction::Append)]
    pairs: Vec<PathBuf>,

    /// Path to a config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sort column: name, count or bytes
    #[arg(long)]
    sort: Option<String>,

    /// Sort in descending order
    #[arg(long)]
    descending: bool,

    /// Sync variant: two-way, mirror or update
    #[arg(long)]
    variant: Option<String>,

    /// Write logs to this file (RUST_LOG controls the level)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn folder_pairs(&self) -> Result<Vec<FolderPairSpec>> {
        let mut specs = Vec::new();
        match (&self.left, &self.right) {
            (Some(left), Some(right)) => specs.push(FolderPairSpec::new(left, right)),
            (Some(_), None) => {
                return Err(AppError::InvalidPath(
                    "a right folder is required after the left one".into(),
                ))
            }
            _ => {}
        }
        for pair in self.pairs.chunks(2) {
            if let [left, right] = pair {
                specs.push(FolderPairSpec::new(left, right));
            }
        }
        if specs.is_empty() {
            return Err(AppError::InvalidPath(
                "no folder pair given; pass LEFT RIGHT or --pair LEFT RIGHT".into(),
            ));
        }
        Ok(specs)
    }

    fn overrides(&self) -> AppConfig {
        AppConfig {
            view: ViewConfig {
                sort_by: self.sort.clone(),
                ascending: self.descending.then_some(false),
                ..Default::default()
            },
            sync: SyncConfig {
                variant: self.variant.clone(),
            },
            ..Default::default()
        }
    }
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The TUI owns the terminal; logs only go to a file.
    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let pairs = cli.folder_pairs()?;
    let config = AppConfig::load(cli.config.as_deref(), Some(&cli.overrides()));
    config.validate()?;
    tracing::info!(pairs = pairs.len(), "starting comparison");

    let cmp = compare_folder_pairs(&pairs, config.sync_variant())?;

    install_panic_hook();

    let mut tui = Tui::new(config.mouse_enabled())?;
    let mut app = App::new(cmp, &config);
    let theme = theme::dark_theme();
    let mut events = EventHandler::new(Duration::from_millis(250));

    loop {
        tui.draw(|frame| ui::render(&mut app, frame, &theme))?;

        match events.next().await? {
            Event::Key(key) => handler::handle_key_event(&mut app, key),
            Event::Mouse(mouse) => handler::handle_mouse_event(&mut app, mouse),
            Event::Tick => app.clear_expired_status(),
            Event::Resize(_, _) => {}
        }

        if app.should_quit {
            break;
        }
    }

    tui.restore()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_pair_and_extra_pairs() {
        let cli = Cli::parse_from(["stv", "/a", "/b", "--pair", "/c", "/d"]);
        let pairs = cli.folder_pairs().unwrap();
        assert_eq!(pairs, vec![FolderPairSpec::new("/a", "/b"), FolderPairSpec::new("/c", "/d")]);
    }

    #[test]
    fn missing_pair_is_an_error() {
        let cli = Cli::parse_from(["stv"]);
        assert!(matches!(cli.folder_pairs(), Err(AppError::InvalidPath(_))));
        let cli = Cli::parse_from(["stv", "/a"]);
        assert!(cli.folder_pairs().is_err());
    }

    #[test]
    fn overrides_carry_sort_and_variant() {
        let cli = Cli::parse_from(["stv", "/a", "/b", "--sort", "name", "--descending", "--variant", "mirror"]);
        let ov = cli.overrides();
        assert_eq!(ov.view.sort_by.as_deref(), Some("name"));
        assert_eq!(ov.view.ascending, Some(false));
        assert_eq!(ov.sync.variant.as_deref(), Some("mirror"));
        assert!(ov.validate().is_ok());
    }

    #[test]
    fn unknown_sort_or_variant_is_rejected() {
        let cli = Cli::parse_from(["stv", "/a", "/b", "--sort", "date"]);
        let err = cli.overrides().validate().unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains("date"));

        let cli = Cli::parse_from(["stv", "/a", "/b", "--variant", "sideways"]);
        assert!(matches!(cli.overrides().validate(), Err(AppError::Config(_))));
    }
}
