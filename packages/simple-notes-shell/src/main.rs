//! SimpleNotes shell: config loading, logging, store setup, command loop.
mod config;
mod log_file;
mod render;
mod shell;

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use simple_notes_core::storage::local::FileStore;
use simple_notes_core::storage::memory::MemoryStore;
use simple_notes_core::NotesApp;

use crate::config::Overrides;
use crate::render::TerminalRenderer;

#[derive(Debug, Parser)]
#[command(name = "simple-notes", version, about = "Keep short notes in a local store.")]
struct Cli {
    /// Config file (default: <config dir>/simple-notes/config.json)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory holding the durable note store
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Application part of the storage key prefix
    #[arg(long)]
    app_name: Option<String>,

    /// Container part of the storage key prefix; separate containers keep separate notes
    #[arg(long)]
    container: Option<String>,

    /// Where `export` writes notes.json
    #[arg(long, value_name = "DIR")]
    export_dir: Option<PathBuf>,

    /// Log file (default: <data dir>/logs/shell.log)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let (mut config, source) = config::load_config(&config_path);
    config.apply(Overrides {
        app_name: cli.app_name,
        container: cli.container,
        data_dir: cli.data_dir,
        export_dir: cli.export_dir,
    });
    let data_dir = config.data_dir();

    let log_path = cli
        .log_file
        .unwrap_or_else(|| log_file::default_log_path(&data_dir));
    if let Err(e) = log_file::init(&log_path) {
        eprintln!("failed to initialize logger: {}", e);
    }
    source.log(&config_path);
    if let config::ConfigSource::Invalid(e) = &source {
        eprintln!("Ignoring config {}: {}", config_path.display(), e);
    }
    log::info!("[simple_notes.shell] Notes stored in {}", data_dir.display());

    let durable = FileStore::new(&data_dir)
        .with_context(|| format!("Cannot open note store at {}", data_dir.display()))?;
    let renderer = TerminalRenderer::new(io::stdout(), config.export_dir());
    let mut app = NotesApp::start(&config.widget, durable, MemoryStore::new(), renderer)
        .context("Notes storage is not usable")?;

    shell::run(&mut app, io::stdin().lock())?;
    Ok(())
}
