//! Shutdown signal handling.

use tokio::signal;

use crate::TRACING_TARGET_SERVER_SHUTDOWN;

/// Resolves on Ctrl+C, or on SIGTERM on unix.
///
/// If a handler cannot be installed, that signal source is ignored and the
/// other one still triggers shutdown.
pub async fn shutdown_signal() {
    let interrupt = async {
        match signal::ctrl_c().await {
            Ok(()) => log_signal("SIGINT"),
            Err(err) => {
                log_install_failure("SIGINT", &err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                log_signal("SIGTERM");
            }
            Err(err) => {
                log_install_failure("SIGTERM", &err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => {}
        () = terminate => {}
    }
}

fn log_signal(name: &str) {
    tracing::info!(
        target: TRACING_TARGET_SERVER_SHUTDOWN,
        signal = name,
        "Shutdown requested, draining in-flight requests"
    );
}

fn log_install_failure(name: &str, err: &std::io::Error) {
    tracing::error!(
        target: TRACING_TARGET_SERVER_SHUTDOWN,
        signal = name,
        error = %err,
        "Failed to install signal handler"
    );
}
