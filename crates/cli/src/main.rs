//! Agentdeck CLI — the main entry point.
//!
//! Commands:
//! - `serve`  — Start the web gateway
//! - `probe`  — Exercise the remote session/query API directly
//! - `doctor` — Diagnose configuration and connectivity

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "agentdeck",
    about = "Agentdeck — web console for hosted reasoning engines",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web gateway
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Exercise the remote session/query API directly
    Probe {
        /// Engine to probe — a short id or full resource name
        #[arg(short, long)]
        engine: Option<String>,

        /// Message to send
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Diagnose configuration and connectivity
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Serve { port } => commands::serve::run(port).await?,
        Commands::Probe { engine, message } => commands::probe::run(engine, message).await?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
