use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

/// Exit status used when a second signal forces termination
pub const FORCE_QUIT_EXIT_CODE: i32 = 130;

/// Cancel `token` on the first interrupt/terminate signal; a second one
/// exits the process immediately.
pub fn install_shutdown_handler(token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        match wait_for_signal().await {
            Ok(signal) => {
                warn!(signal, "Received shutdown signal. Finishing current tasks...");
                token.cancel();
            }
            Err(e) => {
                error!(error = %e, "Failed to install signal handler; graceful shutdown unavailable");
                return;
            }
        }

        if let Ok(signal) = wait_for_signal().await {
            warn!(signal, "Second signal received, forcing exit");
            std::process::exit(FORCE_QUIT_EXIT_CODE);
        }
    })
}

#[cfg(unix)]
async fn wait_for_signal() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result.map(|()| "interrupt"),
        _ = terminate.recv() => Ok("terminate"),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> std::io::Result<&'static str> {
    tokio::signal::ctrl_c().await.map(|()| "interrupt")
}
