//! OS signal handling.
//!
//! # Responsibilities
//! - Register signal handlers (SIGTERM, SIGINT)
//! - Translate signals into the graceful close path
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - Both signals lead to the same close-and-exit-0 path
//! - No SIGHUP handling: configuration is fixed for the process lifetime

/// Wait until the process receives an interrupt or terminate signal and
/// report which one fired.
#[cfg(unix)]
pub async fn wait_for_signal() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt =
        signal(SignalKind::interrupt()).expect("Failed to install SIGINT handler");
    let mut terminate =
        signal(SignalKind::terminate()).expect("Failed to install SIGTERM handler");

    tokio::select! {
        _ = interrupt.recv() => "SIGINT",
        _ = terminate.recv() => "SIGTERM",
    }
}

#[cfg(not(unix))]
pub async fn wait_for_signal() -> &'static str {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    "ctrl-c"
}
