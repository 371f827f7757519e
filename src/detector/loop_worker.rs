use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::Mutex;
use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::pose::PoseSource;

use super::counter::SessionCounter;
use super::state::RepDetector;

/// Tick-driven capture loop: pull at most one frame per tick, run detection,
/// fold completed reps into the shared counter.
///
/// Frames are processed strictly one at a time; the source is only polled
/// again once the previous frame (and its counter update) is done. The loop
/// runs until the token is cancelled.
pub async fn capture_loop(
    session_id: String,
    mut source: Box<dyn PoseSource>,
    mut detector: RepDetector,
    counter: Arc<Mutex<SessionCounter>>,
    tick_interval: Duration,
    cancel_token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let frame = match source.next_frame() {
                    Ok(Some(frame)) => frame,
                    Ok(None) => continue,
                    Err(err) => {
                        warn!("pose source failed for session {session_id}: {err:?}");
                        continue;
                    }
                };

                if let Some(event) = detector.observe(&frame) {
                    let mut guard = counter.lock().await;
                    guard.apply(&event);
                    info!(
                        "rep {} counted for session {} at {}",
                        guard.count(),
                        session_id,
                        event.timestamp
                    );
                } else {
                    debug!("frame at {} produced no event", frame.timestamp);
                }
            }
            _ = cancel_token.cancelled() => {
                info!("capture loop for session {session_id} shutting down");
                break;
            }
        }
    }
}
