//! Spawned, cancellable driver for a single video conversion.
//!
//! [`Conversion::start`] spawns a task that submits the image, then (if
//! the backend answers with a job id) checks the job's status on a fixed
//! interval until it completes, fails, or runs out of attempts. The
//! returned [`Conversion`] handle is the capability to stop it: calling
//! [`Conversion::cancel`] or dropping the handle ends the task, and no
//! further backend calls are made after that.
//!
//! Status checks are not serialised. Each tick starts a new check even
//! if an earlier one is still in flight; the first check to come back
//! with a terminal status wins and the rest are dropped.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};
use studio_core::lifecycle::{
    ConversionState, FailureStage, TickAction, GENERIC_FAILURE_MESSAGE, MAX_POLL_ATTEMPTS,
    POLL_INTERVAL,
};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::backend::ConversionBackend;

/// Timing parameters for status polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Delay between status checks. The first check fires one interval
    /// after the job is accepted.
    pub interval: Duration,
    /// Checks issued before the conversion is declared timed out.
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: POLL_INTERVAL,
            max_attempts: MAX_POLL_ATTEMPTS,
        }
    }
}

/// Handle to a running conversion task.
pub struct Conversion {
    state: watch::Receiver<ConversionState>,
    cancel: CancellationToken,
    task: Option<JoinHandle<ConversionState>>,
}

impl Conversion {
    /// Spawn a conversion of `image_url` on the current tokio runtime.
    pub fn start<B>(backend: Arc<B>, image_url: impl Into<String>, config: PollConfig) -> Self
    where
        B: ConversionBackend + ?Sized + 'static,
    {
        let image_url = image_url.into();
        let (tx, rx) = watch::channel(ConversionState::Submitting);
        let cancel = CancellationToken::new();
        let task = tokio::spawn(run_conversion(backend, image_url, config, tx, cancel.clone()));

        Self {
            state: rx,
            cancel,
            task: Some(task),
        }
    }

    /// The most recently published state.
    pub fn state(&self) -> ConversionState {
        self.state.borrow().clone()
    }

    /// Receive every state the task publishes.
    pub fn subscribe(&self) -> watch::Receiver<ConversionState> {
        self.state.clone()
    }

    /// Stop the task. Any in-flight backend call is abandoned and no
    /// further calls are made.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Wait for the task to end and return its final state.
    ///
    /// A cancelled conversion ends in [`ConversionState::Idle`].
    pub async fn finish(mut self) -> ConversionState {
        let Some(task) = self.task.take() else {
            return self.state();
        };

        match task.await {
            Ok(state) => state,
            Err(e) => {
                tracing::error!(error = %e, "Conversion task aborted");
                ConversionState::Failed {
                    stage: FailureStage::Submission,
                    reason: GENERIC_FAILURE_MESSAGE.to_string(),
                }
            }
        }
    }
}

impl Drop for Conversion {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Submission followed, when needed, by status polling.
async fn run_conversion<B>(
    backend: Arc<B>,
    image_url: String,
    config: PollConfig,
    tx: watch::Sender<ConversionState>,
    cancel: CancellationToken,
) -> ConversionState
where
    B: ConversionBackend + ?Sized,
{
    tracing::info!(image_url = %image_url, "Starting video conversion");
    let state = ConversionState::Submitting;

    let submitted = tokio::select! {
        biased;
        _ = cancel.cancelled() => return discard(&tx),
        result = backend.submit(&image_url) => result,
    };

    let state = match submitted {
        Ok(reply) => state.on_submitted(reply),
        Err(e) => {
            tracing::warn!(error = %e, "Video conversion submission failed");
            state.on_submit_failed(e.server_message())
        }
    };
    tx.send_replace(state.clone());

    if let Some(job_id) = state.job_id() {
        tracing::info!(job_id, "Conversion accepted, polling for status");
        return poll_until_done(backend, state, config, &tx, &cancel).await;
    }

    match state.artifacts() {
        Some(artifacts) => tracing::info!(
            video_url = ?artifacts.video_url,
            gif_url = ?artifacts.gif_url,
            "Conversion completed immediately",
        ),
        None => tracing::info!(outcome = ?state, "Conversion did not start"),
    }
    state
}

/// Tick every `config.interval`, issuing one status check per tick,
/// until a terminal state or cancellation.
async fn poll_until_done<B>(
    backend: Arc<B>,
    mut state: ConversionState,
    config: PollConfig,
    tx: &watch::Sender<ConversionState>,
    cancel: &CancellationToken,
) -> ConversionState
where
    B: ConversionBackend + ?Sized,
{
    let mut ticker = tokio::time::interval_at(Instant::now() + config.interval, config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut in_flight = FuturesUnordered::new();

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!(job_id = ?state.job_id(), "Status polling cancelled");
                return discard(tx);
            }
            Some((attempt, result)) = in_flight.next(), if !in_flight.is_empty() => {
                state = match result {
                    Ok(report) => state.on_report(report),
                    Err(e) => {
                        // Transient poll failures are retried on the next tick.
                        tracing::warn!(attempt, error = %e, "Status check failed");
                        state
                    }
                };

                if state.is_terminal() {
                    tracing::info!(attempt, outcome = ?state, "Conversion finished");
                    tx.send_replace(state.clone());
                    return state;
                }
            }
            _ = ticker.tick() => {
                let (next, action) = state.on_tick(config.max_attempts);
                state = next;

                match action {
                    TickAction::Check { job_id, attempt } => {
                        tracing::debug!(job_id = %job_id, attempt, "Checking conversion status");
                        let backend = Arc::clone(&backend);
                        in_flight.push(async move { (attempt, backend.check(&job_id).await) });
                        tx.send_replace(state.clone());
                    }
                    TickAction::TimedOut => {
                        tracing::warn!(max_attempts = config.max_attempts, "Conversion timed out");
                        tx.send_replace(state.clone());
                        return state;
                    }
                    TickAction::Nothing => return state,
                }
            }
        }
    }
}

/// Abandon the lifecycle: the handle's owner has moved on.
fn discard(tx: &watch::Sender<ConversionState>) -> ConversionState {
    tx.send_replace(ConversionState::Idle);
    ConversionState::Idle
}
