//! Serve command implementation

use anyhow::Result;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use wr_core::{Profile, ResponderConfig};
use wr_responder::{Responder, ResponderEvent};

use crate::output::{print_info, print_success, print_warning};

/// Execute the serve command - listen and serve the configured profile
/// until Ctrl+C or SIGTERM
pub async fn serve_command(config: ResponderConfig) -> Result<()> {
    // Create cancellation token for graceful shutdown
    let cancel = CancellationToken::new();

    // Setup signal handlers
    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        let terminate = async {
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to install signal handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                tracing::info!("Received Ctrl+C, initiating shutdown...");
            }
            _ = terminate => {
                tracing::info!("Received SIGTERM, initiating shutdown...");
            }
        }

        cancel_clone.cancel();
    });

    // Create event channel for connection lifecycle reporting
    let (event_tx, mut event_rx) = mpsc::channel::<ResponderEvent>(256);

    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            render_event(event);
        }
    });

    let identity = config.effective_identity();
    println!();
    println!("  \x1b[1;32mwarren responder\x1b[0m");
    println!();
    println!("  Profile: {}", config.profile.name());
    if matches!(config.profile, Profile::Shell) {
        println!("  Identity: {}", identity);
    }
    println!("  Listening on: 0.0.0.0:{}", config.port);
    println!();

    let responder = Responder::new(config, cancel.clone(), event_tx);
    responder.run().await?;

    print_warning("Server terminated");
    Ok(())
}

fn render_event(event: ResponderEvent) {
    match event {
        ResponderEvent::Connected { peer } => {
            print_success(&format!("{} connected", peer));
        }
        ResponderEvent::Disconnected { peer } => {
            print_warning(&format!("{} disconnected", peer));
        }
        ResponderEvent::CommandExecuted { peer, command } => {
            print_info(&format!("{} executed: {}", peer, command));
        }
    }
}
