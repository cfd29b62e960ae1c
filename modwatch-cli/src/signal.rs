//! Signal handling for graceful shutdown.

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Cancels `shutdown` when the process receives a termination signal.
pub fn spawn_shutdown_listener(shutdown: CancellationToken) {
    tokio::spawn(async move {
        if shutdown_signal().await {
            shutdown.cancel();
        }
    });
}

/// Waits for SIGINT, SIGTERM or SIGQUIT.
///
/// Returns false if the handlers could not be installed.
#[cfg(unix)]
async fn shutdown_signal() -> bool {
    use tokio::signal::unix::{SignalKind, signal};

    let handlers = (
        signal(SignalKind::interrupt()),
        signal(SignalKind::terminate()),
        signal(SignalKind::quit()),
    );
    let (mut sigint, mut sigterm, mut sigquit) = match handlers {
        (Ok(int), Ok(term), Ok(quit)) => (int, term, quit),
        (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => {
            warn!(error = %e, "Could not install signal handlers");
            return false;
        }
    };

    tokio::select! {
        _ = sigint.recv() => {
            info!(signal = "SIGINT", "Signal received, shutting down");
        }
        _ = sigterm.recv() => {
            info!(signal = "SIGTERM", "Signal received, shutting down");
        }
        _ = sigquit.recv() => {
            info!(signal = "SIGQUIT", "Signal received, shutting down");
        }
    }
    true
}

/// Waits for Ctrl+C.
#[cfg(not(unix))]
async fn shutdown_signal() -> bool {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            info!(signal = "ctrl-c", "Signal received, shutting down");
            true
        }
        Err(e) => {
            warn!(error = %e, "Could not install signal handler");
            false
        }
    }
}
