mod commands;
mod config;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use geodraw_core::{default_storage_dir, FileStore, ShapeRepository, ShapeStore};
use geodraw_session::{EditTools, SceneMap};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::Command;
use config::Config;

/// Draw, edit and export polygons and circles on the globe
#[derive(Parser, Debug)]
#[command(name = "geodraw")]
#[command(version, about, long_about = None)]
struct Args {
    /// Shape store directory
    #[arg(long, value_name = "PATH", global = true)]
    store: Option<PathBuf>,

    /// Config file
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("geodraw=info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let config = Config::load(args.config.as_deref());
    let store_dir = args
        .store
        .or_else(|| config.storage_path.clone())
        .unwrap_or_else(default_storage_dir);
    debug!(?store_dir, ?config, "starting");

    let repo = ShapeRepository::load(Box::new(ShapeStore::new(FileStore::new(store_dir))));
    let mut tools = EditTools::new(repo, SceneMap::new()).with_undo_history(config.undo_history);
    tools.set_drawing_enabled(config.drawing_enabled);

    commands::run(&mut tools, args.command)
}
