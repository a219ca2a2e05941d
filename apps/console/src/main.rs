use std::{
    io::{self, BufRead},
    path::PathBuf,
    sync::Arc,
    thread,
    time::Duration,
};

mod backend_bridge;
mod config;
mod controller;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{BotClient, TracingSink};
use crossbeam_channel::{bounded, select};
use shared::domain::FormField;
use tracing_subscriber::EnvFilter;

use crate::{
    backend_bridge::{commands::BackendCommand, runtime},
    config::{load_settings, validate_base_url, DEFAULT_CONFIG_PATH},
    controller::{events::UiEvent, reducer::Controller},
    ui::{input::HELP, ConsoleApp},
};

#[derive(Parser, Debug)]
#[command(about = "Terminal front end for the chat-bot configuration backend")]
struct Args {
    /// Backend base URL; overrides the config file and environment.
    #[arg(long)]
    base_url: Option<String>,
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Per-request timeout. Unset means the HTTP client default.
    #[arg(long)]
    timeout_secs: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let mut settings = load_settings(&args.config)?;
    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(timeout_secs) = args.timeout_secs {
        settings.request_timeout_secs = Some(timeout_secs);
    }
    let base_url = validate_base_url(&settings.base_url)?;
    tracing::info!(%base_url, "starting chatbot console");

    let client = BotClient::with_timeout(
        base_url,
        settings.request_timeout_secs.map(Duration::from_secs),
    )
    .context("failed to build HTTP client")?;

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    let worker = runtime::launch(Arc::new(client), cmd_rx, ui_tx);

    let (line_tx, line_rx) = bounded::<String>(64);
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if line_tx.send(line).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    tracing::error!("failed to read stdin: {err}");
                    break;
                }
            }
        }
    });

    let mut controller = Controller::new(Arc::new(TracingSink));
    controller.edit_field(FormField::DebugTag, settings.debug_tag);
    let mut app = ConsoleApp::new(controller, cmd_tx, io::stdout());
    println!("{HELP}");
    app.activate();

    loop {
        select! {
            recv(line_rx) -> line => match line {
                Ok(line) => {
                    if !app.handle_line(&line) {
                        break;
                    }
                }
                Err(_) => break,
            },
            recv(ui_rx) -> event => match event {
                Ok(event) => app.handle_event(event),
                Err(_) => {
                    tracing::error!("backend worker stopped");
                    break;
                }
            },
        }
    }

    // Closing the command queue lets the worker drain and exit.
    drop(app);
    if worker.join().is_err() {
        tracing::error!("backend worker panicked");
    }
    Ok(())
}
