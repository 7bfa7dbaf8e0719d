use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use super::demo::{demo_engine, DemoOptions};
use crate::server::ServerHandle;

/// Command-line interface of the `grove` demo server
#[derive(Parser, Debug)]
#[command(name = "grove")]
#[command(version, about = "grove demo server", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the demo application
    Serve {
        /// Address to listen on
        #[arg(long, env = "GROVE_ADDR", default_value = "127.0.0.1:9999")]
        addr: String,

        /// Directory served under /assets
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// Directory of HTML templates
        #[arg(long)]
        templates: Option<PathBuf>,
    },
    /// Print the demo application's routes and exit
    Routes,
}

/// Execute a parsed command line
///
/// # Errors
///
/// The server cannot bind its address, or signal handling cannot be set up.
pub fn run_cli(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Serve {
            addr,
            static_dir,
            templates,
        } => {
            let engine = demo_engine(&DemoOptions {
                static_dir,
                templates,
            });
            let handle = engine
                .serve(addr.as_str())
                .with_context(|| format!("Failed to start server on {addr}"))?;
            wait_for_shutdown(handle)
        }
        Commands::Routes => {
            demo_engine(&DemoOptions::default()).router().dump_routes();
            Ok(())
        }
    }
}

#[cfg(unix)]
fn wait_for_shutdown(handle: ServerHandle) -> Result<()> {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals =
        Signals::new([SIGINT, SIGTERM]).context("Failed to register signal handlers")?;
    if let Some(signal) = signals.forever().next() {
        info!(signal = signal, addr = %handle.addr(), "Shutdown signal received");
    }
    handle.stop();
    info!("Server stopped");
    Ok(())
}

#[cfg(not(unix))]
fn wait_for_shutdown(handle: ServerHandle) -> Result<()> {
    handle
        .join()
        .map_err(|_| anyhow::anyhow!("server coroutine panicked"))
}
