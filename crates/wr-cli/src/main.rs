//! warren CLI
//!
//! Single binary for both roles of the channel:
//! - Responder (server that listens and serves a command profile)
//! - Initiator (client that connects and relays operator commands)

use std::net::Ipv4Addr;
use std::time::Duration;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use warren::commands;
use wr_core::{Endpoint, Profile, ResponderConfig};

#[derive(Parser)]
#[command(name = "warren")]
#[command(version, about = "Minimal command-and-control channel over plain TCP")]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Listen for connections and serve the chosen profile
    /// Alias: server
    #[command(alias = "server")]
    Serve {
        /// Port to listen on (all interfaces)
        #[arg(short, long)]
        port: u16,

        #[command(flatten)]
        profile: ProfileArgs,

        /// Identity shown in the shell banner (defaults to the local user)
        #[arg(long)]
        identity: Option<String>,

        /// Kill commands that run longer than this many seconds
        #[arg(long, value_name = "SECS")]
        command_timeout: Option<u64>,

        /// Maximum simultaneous connections (unbounded when omitted)
        #[arg(long, value_name = "N")]
        max_connections: Option<usize>,
    },

    /// Connect to a responder and relay commands interactively
    /// Alias: client
    #[command(alias = "client")]
    Connect {
        /// IPv4 address of the responder
        #[arg(short, long)]
        target: Ipv4Addr,

        /// Port the responder listens on
        #[arg(short, long)]
        port: u16,
    },
}

/// Exactly one profile must be chosen for the serve role
#[derive(Args)]
#[group(required = true, multiple = false)]
struct ProfileArgs {
    /// Run this command for every connection, send the output, and close
    #[arg(short, long, value_name = "COMMAND", value_parser = parse_nonempty_command)]
    execute: Option<String>,

    /// Serve an interactive remote-command loop
    #[arg(short, long)]
    shell: bool,
}

impl ProfileArgs {
    fn into_profile(self) -> Profile {
        match self.execute {
            Some(command) => Profile::Execute(command),
            None => Profile::Shell,
        }
    }
}

fn parse_nonempty_command(value: &str) -> Result<String, String> {
    if value.trim().is_empty() {
        Err("command must not be empty".to_string())
    } else {
        Ok(value.to_string())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_level = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Commands::Serve {
            port,
            profile,
            identity,
            command_timeout,
            max_connections,
        } => {
            let mut config = ResponderConfig::new(port, profile.into_profile());
            config.identity = identity;
            config.command_timeout = command_timeout.map(Duration::from_secs);
            config.max_connections = max_connections;
            commands::serve_command(config).await?;
        }

        Commands::Connect { target, port } => {
            commands::connect_command(Endpoint::new(target, port)).await?;
        }
    }

    Ok(())
}
