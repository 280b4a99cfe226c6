//! `daisy`: finds downloaded DAISY talking books and copies them onto a player.

mod commands;
mod reporter;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "daisy")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable debug logging
  #[arg(short, long)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// List the talking books found in the source directory
  Scan {
    /// Directory to scan instead of the configured one
    #[arg(short, long)]
    dir: Option<PathBuf>,
  },

  /// Copy one book, by its number in `scan`, onto the device
  Copy {
    /// 1-based catalog number
    index: usize,

    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Mount point of the player
    #[arg(long)]
    device_root: Option<PathBuf>,

    /// Folder on the device that receives the book folder
    #[arg(short, long)]
    target: Option<String>,

    /// Replace the book folder if it already exists
    #[arg(long)]
    overwrite: bool,
  },

  /// List folders on the device
  Browse {
    #[arg(default_value = "/")]
    path: String,

    #[arg(long)]
    device_root: Option<PathBuf>,
  },

  /// Remember the folder books are copied into
  Target {
    folder: String,

    #[arg(long)]
    device_name: Option<String>,

    #[arg(long)]
    device_root: Option<PathBuf>,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "info" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .init();

  let paths = daisy_config::paths()?;
  daisy_fs::recreate_dir(&paths.scratch_dir)?;

  match cli.command {
    Commands::Scan { dir } => commands::scan(paths, dir).await,
    Commands::Copy { index, dir, device_root, target, overwrite } => {
      commands::copy(paths, commands::CopyArgs { index, dir, device_root, target, overwrite }).await
    }
    Commands::Browse { path, device_root } => commands::browse(device_root, &path).await,
    Commands::Target { folder, device_name, device_root } => {
      commands::set_target(folder, device_name, device_root).await
    }
  }
}
