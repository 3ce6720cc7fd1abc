//! Cancellation helpers: racing futures against Ctrl+C, and against a stop
//! signal owned by whichever screen started a background task

use anyhow::Result;
use tokio::signal;
use tokio::sync::watch;
use tracing::warn;

/// Result of racing a future against a shutdown signal
pub enum ShutdownRace<T> {
    /// Shutdown signal received (Ctrl+C)
    Shutdown,
    /// The future completed with this result
    Completed(T),
}

/// Race a future against Ctrl+C shutdown signal
///
/// Returns `ShutdownRace::Shutdown` if SIGINT arrived, or
/// `ShutdownRace::Completed(T)` with the future's result. Inside the TUI the
/// terminal is in raw mode, so this only fires for signals sent from outside
/// (e.g. `kill -INT`).
pub async fn race_with_shutdown<F, T>(future: F) -> Result<ShutdownRace<T>>
where
    F: std::future::Future<Output = T>,
{
    tokio::select! {
        result = signal::ctrl_c() => {
            match result {
                Ok(()) => Ok(ShutdownRace::Shutdown),
                Err(err) => {
                    warn!("Unable to listen for shutdown signal: {}", err);
                    Err(err.into())
                }
            }
        }
        output = future => {
            Ok(ShutdownRace::Completed(output))
        }
    }
}

/// Owner side of a stop signal. Dropping it counts as stopping.
#[derive(Debug)]
pub struct StopHandle {
    tx: watch::Sender<bool>,
}

/// Task side of a stop signal
#[derive(Debug, Clone)]
pub struct StopSignal {
    rx: watch::Receiver<bool>,
}

pub fn stop_pair() -> (StopHandle, StopSignal) {
    let (tx, rx) = watch::channel(false);
    (StopHandle { tx }, StopSignal { rx })
}

impl StopHandle {
    pub fn stop(&self) {
        // No receivers left means the task is already gone
        let _ = self.tx.send(true);
    }
}

impl StopSignal {
    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow() || self.rx.has_changed().is_err()
    }

    /// Resolves once the owner stops or drops its handle
    pub async fn stopped(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                return;
            }
        }
    }
}

/// Result of racing a future against a [`StopSignal`]
#[derive(Debug, PartialEq, Eq)]
pub enum StopRace<T> {
    Stopped,
    Completed(T),
}

/// Race a future against a stop signal; the future is dropped (and any
/// request it was awaiting abandoned) as soon as the signal fires.
pub async fn race_with_stop<F, T>(signal: &mut StopSignal, future: F) -> StopRace<T>
where
    F: std::future::Future<Output = T>,
{
    if signal.is_stopped() {
        return StopRace::Stopped;
    }
    tokio::select! {
        biased;
        _ = signal.stopped() => StopRace::Stopped,
        output = future => StopRace::Completed(output),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_completes_when_not_stopped() {
        let (_handle, mut signal) = stop_pair();
        let race = race_with_stop(&mut signal, async { 7 }).await;
        assert_eq!(race, StopRace::Completed(7));
    }

    #[tokio::test]
    async fn test_stop_interrupts_pending_future() {
        let (handle, mut signal) = stop_pair();
        let task = tokio::spawn(async move {
            race_with_stop(&mut signal, tokio::time::sleep(Duration::from_secs(30))).await
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.stop();
        let race = tokio::time::timeout(Duration::from_secs(2), task)
            .await
            .expect("race should end promptly")
            .unwrap();
        assert_eq!(race, StopRace::Stopped);
    }

    #[tokio::test]
    async fn test_dropped_handle_counts_as_stop() {
        let (handle, mut signal) = stop_pair();
        drop(handle);
        assert!(signal.is_stopped());
        let race = race_with_stop(&mut signal, async { 1 }).await;
        assert_eq!(race, StopRace::Stopped);
    }
}
