// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands
//!
//! This module provides command-line functionality for:
//! - The interactive capture shell
//! - One-shot capture and pick
//! - Listing video devices

use ocr_capture::backends::consumer::consumer_for;
use ocr_capture::backends::v4l2::list_video_devices;
use ocr_capture::backends::ImageConsumer;
use ocr_capture::config::Config;
use ocr_capture::host::{EventSender, Flow, Host, HostEvent, post};
use ocr_capture::shell::{ShellOptions, desktop_host, desktop_host_with_consumer};
use ocr_capture::{ImageHandle, RequestHandle};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{error, info};

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Load the config from `path`, or from the default location
pub fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    Ok(config)
}

/// Prints each delivered handle on stdout before passing it on
struct PrintingConsumer {
    inner: Box<dyn ImageConsumer>,
}

impl ImageConsumer for PrintingConsumer {
    fn consume(&mut self, image: ImageHandle) {
        println!("{}", image);
        self.inner.consume(image);
    }
}

/// Lines typed into the interactive shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShellCommand {
    Capture,
    Pick,
    Status,
    Help,
    Quit,
}

impl ShellCommand {
    fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "c" | "capture" => Some(ShellCommand::Capture),
            "p" | "pick" => Some(ShellCommand::Pick),
            "s" | "status" => Some(ShellCommand::Status),
            "h" | "help" | "?" => Some(ShellCommand::Help),
            "q" | "quit" | "exit" => Some(ShellCommand::Quit),
            _ => None,
        }
    }
}

const SHELL_HELP: &str = "Commands: [c]apture, [p]ick, [s]tatus, [h]elp, [q]uit";

/// Post a teardown when the user hits Ctrl-C
fn teardown_on_ctrlc(events: &EventSender) -> Result<(), ctrlc::Error> {
    let events = events.clone();
    ctrlc::set_handler(move || {
        info!("Interrupted, tearing down");
        post(&events, HostEvent::Teardown);
    })
}

/// Interactive shell: each typed command becomes a host event
pub fn run_interactive(config: &Config, device: Option<PathBuf>) -> CliResult {
    let options = ShellOptions {
        device,
        ..ShellOptions::default()
    };
    let consumer = Box::new(PrintingConsumer {
        inner: consumer_for(config.image_action),
    });
    let (mut host, events) = desktop_host_with_consumer(config, &options, consumer);
    teardown_on_ctrlc(&events)?;

    // stdin blocks, so read it on its own thread
    let (command_tx, mut commands) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }
            match ShellCommand::parse(&line) {
                Some(command) => {
                    if command_tx.send(command).is_err() {
                        break;
                    }
                }
                None => eprintln!("Unknown command: {}. {}", line.trim(), SHELL_HELP),
            }
        }
    });

    println!("{}", SHELL_HELP);
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        loop {
            tokio::select! {
                command = commands.recv() => {
                    let flow = match command {
                        Some(ShellCommand::Capture) => host.dispatch(HostEvent::CaptureButton),
                        Some(ShellCommand::Pick) => host.dispatch(HostEvent::PickButton),
                        Some(ShellCommand::Status) => {
                            println!("{}", host.status_line());
                            Flow::Continue
                        }
                        Some(ShellCommand::Help) => {
                            println!("{}", SHELL_HELP);
                            Flow::Continue
                        }
                        // End of input quits like an explicit quit
                        Some(ShellCommand::Quit) | None => host.dispatch(HostEvent::Teardown),
                    };
                    if flow == Flow::Stop {
                        break;
                    }
                }
                event = host.next_event() => {
                    let Some(event) = event else { break };
                    if host.dispatch(event) == Flow::Stop {
                        break;
                    }
                }
            }
        }
    });

    Ok(())
}

/// Take one photo
pub fn capture_once(config: &Config, device: Option<PathBuf>, output: Option<PathBuf>) -> CliResult {
    let options = ShellOptions {
        device,
        ..ShellOptions::default()
    };
    let (mut host, events) = desktop_host(config, &options);
    teardown_on_ctrlc(&events)?;

    let handle = host.controller_mut().on_capture_button_pressed();
    let image = wait_for(&mut host, handle)?;

    if let Some(output) = output {
        let source = image
            .local_path()
            .ok_or_else(|| format!("Capture is not a local file: {}", image))?;
        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(&source, &output)?;
        println!("Photo saved: {}", output.display());
    }

    println!("{}", image);
    Ok(())
}

/// Pick one existing image
pub fn pick_once(config: &Config, dir: Option<PathBuf>) -> CliResult {
    let options = ShellOptions {
        pick_dir: dir,
        ..ShellOptions::default()
    };
    let (mut host, events) = desktop_host(config, &options);
    teardown_on_ctrlc(&events)?;

    let handle = host.controller_mut().on_pick_button_pressed();
    let image = wait_for(&mut host, handle)?;

    println!("{}", image);
    Ok(())
}

fn wait_for(host: &mut Host, handle: RequestHandle) -> Result<ImageHandle, Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    let outcome = rt.block_on(host.run_until(handle));
    host.controller_mut().teardown();

    outcome.map_err(|e| {
        error!(error = %e, "Request ended without an image");
        e.into()
    })
}

/// List video devices
pub fn list_devices() -> CliResult {
    let devices = list_video_devices();

    if devices.is_empty() {
        println!("No video devices found.");
        return Ok(());
    }

    println!("Video devices:");
    println!();
    for device in devices {
        let name = if device.card.is_empty() {
            "(unavailable)".to_string()
        } else {
            format!("{} [{}]", device.card, device.driver)
        };
        println!("  {}  {}", device.path.display(), name);
        println!("      Permission: {}", device.permission);
    }

    Ok(())
}
