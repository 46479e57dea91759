mod app;
mod cli;
mod commands;
mod config;
mod connection;
mod dashboard;
mod error;
mod event;
mod logging;
mod orders;
mod storage;
mod ui;
mod woo;

use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ordash")]
#[command(about = "A terminal dashboard for WooCommerce store orders")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/ordash/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<cli::Command>,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();
  let config = config::Config::load(args.config.as_deref())?;

  match args.command {
    Some(command) => {
      logging::init_stderr(&config.log_level);
      cli::run(command, &config).await
    }
    None => {
      let log_dir = config::data_dir()?.join("logs");
      std::fs::create_dir_all(&log_dir)?;
      let _guard = logging::init_file(&config.log_level, &log_dir);

      let mut app = app::App::new(config)?;
      app.run().await
    }
  }
}
