// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "ocr-capture")]
#[command(about = "Capture or pick an image for the OCR pipeline")]
#[command(version = env!("GIT_VERSION"))]
#[command(subcommand_required = false)]
struct Cli {
    /// Config file (default: ~/.config/ocr-capture/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive shell: capture/pick on command, Ctrl-C to quit
    Run {
        /// Camera device to use instead of the configured one
        #[arg(short, long)]
        device: Option<PathBuf>,
    },

    /// Take one photo and print its handle
    Capture {
        /// Camera device to use instead of the configured one
        #[arg(short, long)]
        device: Option<PathBuf>,

        /// Also copy the photo to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Pick one existing image and print its handle
    Pick {
        /// Directory the file dialog opens in
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// List video devices and whether this process may use them
    Devices,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=ocr_capture=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli::load_config(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Run { device }) => cli::run_interactive(&config, device),
        None => cli::run_interactive(&config, None),
        Some(Commands::Capture { device, output }) => cli::capture_once(&config, device, output),
        Some(Commands::Pick { dir }) => cli::pick_once(&config, dir),
        Some(Commands::Devices) => cli::list_devices(),
    }
}
