//! Shutdown signal handling for the server

use colored::Colorize;
use tracing::warn;

/// Resolves on the first Ctrl+C or SIGTERM.
///
/// If a handler cannot be installed the failure is logged and that signal
/// is ignored, so the server keeps running.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => eprintln!("{} Received SIGINT (shutdown)", "↓".cyan()),
        _ = terminate => eprintln!("{} Received SIGTERM (shutdown)", "↓".cyan()),
    }
}
