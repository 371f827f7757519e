use std::sync::Arc;

use anyhow::{bail, Context, Result};
use log::info;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::db::models::DailyRecord;
use crate::pose::PoseSource;
use crate::service::{ServiceError, WorkoutService};
use crate::settings::DetectionSettings;

use super::counter::SessionCounter;
use super::loop_worker::capture_loop;
use super::state::RepDetector;

struct ActiveCapture {
    session_id: String,
    counter: Arc<Mutex<SessionCounter>>,
    cancel_token: CancellationToken,
    handle: JoinHandle<()>,
}

/// Owns the capture lifecycle: one session at a time, started against a
/// pose source, stopped (or torn down) at any point, committed explicitly.
pub struct CaptureController {
    settings: DetectionSettings,
    active: Mutex<Option<ActiveCapture>>,
}

impl CaptureController {
    pub fn new(settings: DetectionSettings) -> Self {
        Self {
            settings,
            active: Mutex::new(None),
        }
    }

    /// Spawn the capture loop against `source`. Returns the new session id;
    /// fails if a capture is already running.
    pub async fn start_capture(&self, source: Box<dyn PoseSource>) -> Result<String> {
        let mut guard = self.active.lock().await;
        if guard.is_some() {
            bail!("capture already active");
        }

        let session_id = Uuid::new_v4().to_string();
        let counter = Arc::new(Mutex::new(SessionCounter::new(session_id.clone())));
        let detector = RepDetector::new(session_id.clone(), self.settings.clone());
        let cancel_token = CancellationToken::new();

        let handle = tokio::spawn(capture_loop(
            session_id.clone(),
            source,
            detector,
            counter.clone(),
            Duration::from_millis(self.settings.tick_interval_ms),
            cancel_token.clone(),
        ));

        info!("capture session {session_id} started");
        *guard = Some(ActiveCapture {
            session_id: session_id.clone(),
            counter,
            cancel_token,
            handle,
        });
        Ok(session_id)
    }

    /// Current staged count, or None when no capture is running.
    pub async fn current_count(&self) -> Option<u32> {
        let guard = self.active.lock().await;
        match guard.as_ref() {
            Some(active) => Some(active.counter.lock().await.count()),
            None => None,
        }
    }

    /// Zero the staged count without stopping the capture (user-initiated).
    pub async fn reset_count(&self) {
        let guard = self.active.lock().await;
        if let Some(active) = guard.as_ref() {
            active.counter.lock().await.reset();
        }
    }

    /// Commit the staged count once through the service. On success only the
    /// committed amount is removed from the counter: the loop keeps applying
    /// reps while the storage round trip is in flight, and those stay staged
    /// for the next commit. The full count stays staged when the commit
    /// fails, so the user can retry.
    pub async fn commit(
        &self,
        service: &WorkoutService,
        user: Option<&str>,
    ) -> Result<DailyRecord, ServiceError> {
        let guard = self.active.lock().await;
        let active = guard
            .as_ref()
            .ok_or_else(|| ServiceError::InvalidInput("no active capture session".into()))?;

        let count = active.counter.lock().await.count();
        let record = service.submit_repetitions(user, count).await?;

        active.counter.lock().await.commit_staged(count);
        info!(
            "session {} committed {} reps for {}",
            active.session_id, count, record.date
        );
        Ok(record)
    }

    /// Stop the loop and discard the session. Idempotent; safe to call while
    /// a frame is mid-flight (the loop finishes it and exits at the next
    /// scheduling boundary).
    pub async fn stop_capture(&self) -> Result<()> {
        let active = self.active.lock().await.take();
        if let Some(active) = active {
            active.cancel_token.cancel();
            active
                .handle
                .await
                .context("capture loop task failed to join")?;
            info!("capture session {} stopped", active.session_id);
        }
        Ok(())
    }
}
