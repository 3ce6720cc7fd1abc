use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::models::SensorStatus;
use crate::services::{FrameSource, PosApi};
use crate::shutdown::{race_with_stop, stop_pair, StopHandle, StopRace, StopSignal};

/// Something the status poller learned during one tick
#[derive(Debug, Clone, PartialEq)]
pub enum PollEventKind {
    Status(SensorStatus),
    StatusFailed(String),
    Classified(String),
    ClassifyFailed(String),
}

/// A poller result tagged with the poller instance that produced it, so a
/// screen can tell fresh results from ones a stopped poller left queued.
#[derive(Debug, Clone, PartialEq)]
pub struct PollEvent {
    pub generation: u64,
    pub kind: PollEventKind,
}

/// Handle to a running status poller. Stopping (or dropping) it cancels the
/// task, abandoning any request still in flight.
#[derive(Debug)]
pub struct PollerHandle {
    generation: u64,
    stop: StopHandle,
}

impl PollerHandle {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn stop(self) {
        self.stop.stop();
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.stop.stop();
    }
}

/// Spawn the Sell screen's polling task.
///
/// Every `interval` it fetches the scale status and, when the frame source
/// has a still, asks the backend to classify it. Status and classification
/// outcomes are reported as separate events.
pub fn spawn_status_poller<A: PosApi>(
    api: Arc<A>,
    frames: Arc<dyn FrameSource>,
    token: String,
    interval: Duration,
    generation: u64,
    events: UnboundedSender<PollEvent>,
) -> PollerHandle {
    let (stop, signal) = stop_pair();
    tokio::spawn(poll_status_loop(
        api, frames, token, interval, generation, events, signal,
    ));
    PollerHandle { generation, stop }
}

async fn poll_status_loop<A: PosApi>(
    api: Arc<A>,
    frames: Arc<dyn FrameSource>,
    token: String,
    interval: Duration,
    generation: u64,
    events: UnboundedSender<PollEvent>,
    mut signal: StopSignal,
) {
    info!(target: "veggie_pos", "Started status poller #{} every {:?}", generation, interval);
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        if let StopRace::Stopped = race_with_stop(&mut signal, ticker.tick()).await {
            break;
        }

        let tick = poll_once(api.as_ref(), frames.as_ref(), &token, generation, &events);
        match race_with_stop(&mut signal, tick).await {
            StopRace::Stopped => break,
            StopRace::Completed(true) => {}
            StopRace::Completed(false) => {
                debug!("Poller #{} has no listener left", generation);
                break;
            }
        }
    }

    info!(target: "veggie_pos", "Stopped status poller #{}", generation);
}

/// One poll tick. Returns false once nobody is listening.
async fn poll_once<A: PosApi + ?Sized>(
    api: &A,
    frames: &dyn FrameSource,
    token: &str,
    generation: u64,
    events: &UnboundedSender<PollEvent>,
) -> bool {
    let send = |kind: PollEventKind| events.send(PollEvent { generation, kind }).is_ok();

    let status_event = match api.status(token).await {
        Ok(status) => PollEventKind::Status(status),
        Err(e) => {
            warn!("Status poll failed: {}", e);
            PollEventKind::StatusFailed(e.to_string())
        }
    };
    if !send(status_event) {
        return false;
    }

    let frame = match frames.capture().await {
        Ok(Some(frame)) => frame,
        Ok(None) => return true,
        Err(e) => {
            warn!("Frame capture failed: {}", e);
            return send(PollEventKind::ClassifyFailed(e.to_string()));
        }
    };

    match api.predict(token, frame).await {
        Ok(label) => send(PollEventKind::Classified(label)),
        Err(e) => {
            warn!("Classification failed: {}", e);
            send(PollEventKind::ClassifyFailed(e.to_string()))
        }
    }
}
