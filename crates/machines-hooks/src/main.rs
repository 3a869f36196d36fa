//! # machines-hooks
//!
//! Hooks-handler binary: serves the Machines hooks to the contract-testing
//! tool over TCP, or lists them.

#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use contract_hooks::server::HookServer;
use contract_hooks_core::logging::init_subscriber;
use contract_hooks_settings::{HooksSettings, load_settings, load_settings_from_path, settings_path};
use tracing::info;

/// Machines API contract-test hooks.
#[derive(Parser, Debug)]
#[command(name = "machines-hooks", about = "Machines API contract-test hooks")]
struct Cli {
    /// Settings file (defaults to `~/.contract-hooks/settings.json`).
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the hooks handler until Ctrl-C.
    Serve {
        /// Host to bind (overrides settings).
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides settings; 0 for auto-assign).
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the registered hooks.
    List {
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn load(cli: &Cli) -> Result<HooksSettings> {
    match &cli.settings {
        Some(path) => load_settings_from_path(path)
            .with_context(|| format!("Failed to load settings from {}", path.display())),
        None => load_settings()
            .with_context(|| format!("Failed to load settings from {}", settings_path().display())),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = load(&cli)?;
    init_subscriber(&settings.logging.level);

    match cli.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                settings.server.host = host;
            }
            if let Some(port) = port {
                settings.server.port = port;
            }

            let addr = settings.server.bind_addr();
            let server = HookServer::bind(&addr, machines_hooks::registry())
                .await
                .with_context(|| format!("Failed to bind hooks handler on {addr}"))?;
            info!(addr = %server.local_addr()?, "Machines hooks ready");
            server.serve().await.context("Hooks handler failed")?;
        }
        Command::List { json } => {
            let hooks = machines_hooks::registry().list_all();
            if json {
                println!("{}", serde_json::to_string_pretty(&hooks)?);
            } else {
                for info in hooks {
                    match info.selector {
                        Some(selector) => println!("{:<22} {selector}", info.kind),
                        None => println!("{}", info.kind),
                    }
                }
            }
        }
    }

    Ok(())
}
