use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use tokio::sync::oneshot;
use tracing_subscriber::EnvFilter;

mod config;
mod editor;
mod input;
mod render;
mod scripting;
mod store;
mod theme;

use config::{ConfigEngine, Settings};
use editor::{LineKind, Scratchpad};
use input::Keymap;
use render::Renderer;
use scripting::{InitError, RhaiRuntime};
use store::{FileStorage, ScriptStore};
use theme::Theme;

/// Terminal scratchpad for writing and running short Rhai scripts
#[derive(Debug, Parser)]
#[command(name = "scratch", version)]
struct Cli {
    /// Directory holding saved scripts and the log file
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Config script to run instead of ~/.config/scratch/init.rhai
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log file, defaults to <data dir>/scratch.log
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Saved script to open at startup
    script: Option<String>,
}

type App = Scratchpad<FileStorage, RhaiRuntime>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let data_dir = cli
        .data_dir
        .clone()
        .or_else(|| dirs::data_dir().map(|p| p.join("scratch")))
        .context("could not determine a data directory, pass --data-dir")?;
    fs::create_dir_all(&data_dir)
        .with_context(|| format!("failed to create {}", data_dir.display()))?;

    let log_file = cli
        .log_file
        .clone()
        .unwrap_or_else(|| data_dir.join("scratch.log"));
    init_logging(&log_file)?;

    let (settings, config_error) = load_settings(cli.config.as_deref());

    let storage = FileStorage::open(data_dir.join("scripts.json"))
        .context("failed to open script storage")?;
    tracing::info!(path = %storage.path().display(), "script storage ready");

    let mut pad: App = Scratchpad::new(ScriptStore::new(storage), settings.clone());
    if let Some(err) = config_error {
        pad.output.push(LineKind::Error, &err);
    }
    if let Some(name) = cli.script.as_deref() {
        pad.select_script(Some(name));
    }

    let keymap = Keymap::with_overrides(&settings.keybinds);
    let theme = theme::resolve_theme(&settings.theme);
    tracing::debug!(theme = %theme.name, "theme selected");

    // Runtime startup is the only thing that happens in the background
    let (init_tx, init_rx) = oneshot::channel();
    pad.runtime_starting();
    tokio::spawn(async move {
        let _ = init_tx.send(RhaiRuntime::initialize(settings).await);
    });

    let mut renderer = Renderer::new()?;
    renderer.setup()?;
    let result = event_loop(&mut pad, &mut renderer, &keymap, &theme, init_rx).await;
    renderer.teardown()?;

    tracing::info!("scratch exiting");
    result
}

async fn event_loop(
    pad: &mut App,
    renderer: &mut Renderer,
    keymap: &Keymap,
    theme: &Theme,
    mut init_rx: oneshot::Receiver<Result<RhaiRuntime, InitError>>,
) -> Result<()> {
    let mut event_stream = EventStream::new();
    let mut initializing = true;

    redraw(pad, renderer, theme)?;

    while pad.running {
        tokio::select! {
            Some(event) = event_stream.next() => {
                let event = event.context("failed to read terminal event")?;
                if let Event::Resize(width, height) = event {
                    renderer.resize(width, height);
                }
                input::handle_event(pad, keymap, event);
            }
            result = &mut init_rx, if initializing => {
                initializing = false;
                let result = result.unwrap_or_else(|_| {
                    Err(InitError::Interrupted("startup task ended without a result".to_string()))
                });
                pad.runtime_initialized(result);
            }
            else => break,
        }

        redraw(pad, renderer, theme)?;
    }

    Ok(())
}

fn redraw(pad: &mut App, renderer: &Renderer, theme: &Theme) -> Result<()> {
    let layout = renderer.layout(pad.settings.output_height);
    pad.adjust_scroll(layout.editor_height as usize);
    renderer.render(pad, theme)?;
    Ok(())
}

/// Log to a file; the terminal belongs to the UI
fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

/// Run the config script over the defaults. A broken config is reported
/// in the output log and the defaults are used.
fn load_settings(config: Option<&Path>) -> (Settings, Option<String>) {
    let mut engine = ConfigEngine::with_settings(Settings::new());
    let loaded = match config {
        Some(path) => engine.load_file(path),
        None => engine.load_default(),
    };

    let error = match loaded {
        Ok(()) => None,
        Err(e) => {
            tracing::warn!(error = %e, "config failed, using defaults");
            Some(e)
        }
    };

    let mut settings = if error.is_some() {
        Settings::new()
    } else {
        engine.settings()
    };
    if settings.prelude.is_none() {
        settings.prelude = ConfigEngine::default_prelude();
    }
    (settings, error)
}
