//! Ctrl+C / SIGTERM become `Message::Quit`

use tokio::sync::mpsc;

use crate::message::Message;
use instancer_core::prelude::*;

/// Listen for the first termination signal in the background.
///
/// In raw mode the terminal delivers Ctrl+C as a key, so this mostly matters
/// for headless runs and `kill`.
pub fn spawn_signal_handler(tx: mpsc::Sender<Message>) {
    tokio::spawn(async move {
        match shutdown_signal().await {
            Ok(name) => {
                info!("Received {}, quitting", name);
                let _ = tx.send(Message::Quit).await;
            }
            Err(e) => error!("Signal handler error: {}", e),
        }
    });
}

#[cfg(unix)]
async fn shutdown_signal() -> Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| Error::terminal(format!("Failed to install SIGTERM handler: {}", e)))?;

    tokio::select! {
        res = tokio::signal::ctrl_c() => {
            res.map_err(|e| Error::terminal(format!("Failed to listen for SIGINT: {}", e)))?;
            Ok("SIGINT")
        }
        _ = sigterm.recv() => Ok("SIGTERM"),
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| Error::terminal(format!("Failed to listen for Ctrl+C: {}", e)))?;
    Ok("Ctrl+C")
}
