//! Video conversion lifecycle for a single logo.
//!
//! [`ConversionState`] is a pure state machine: it performs no I/O and owns
//! no timers. The driver (see `studio-client`) feeds it backend replies and
//! timer ticks and acts on the [`TickAction`] it returns.
//!
//! ```text
//! Idle -> Submitting -> Completed
//!                    -> Failed (submission)
//!                    -> Polling(job, n) -> Polling(job, n+1)
//!                                       -> Completed
//!                                       -> Failed (job)
//!                                       -> TimedOut
//! ```

use std::time::Duration;

use serde::Serialize;

use crate::error::CoreError;
use crate::logo::ConversionArtifacts;
use crate::status::JobStatus;

/// Fixed delay between status checks.
pub const POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Status checks issued before the job is declared timed out
/// (20 * 30 seconds = 10 minutes).
pub const MAX_POLL_ATTEMPTS: u32 = 20;

/// Reason used when a submission fails without a server-provided message.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to convert logo to video. Please try again.";

/// Alert text shown when the attempt budget runs out.
pub const TIMEOUT_MESSAGE: &str = "Video conversion timed out. Please try again.";

/// Reason used when the backend reports a failed job without saying why.
pub const UNKNOWN_JOB_ERROR: &str = "unknown error";

/// Where a conversion failed. Decides how the failure is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    /// The submission call itself failed or was rejected.
    Submission,
    /// The backend accepted the job and later reported it failed.
    Job,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ConversionState {
    #[default]
    Idle,
    Submitting,
    Polling {
        job_id: String,
        attempts: u32,
    },
    Completed(ConversionArtifacts),
    Failed {
        stage: FailureStage,
        reason: String,
    },
    TimedOut,
}

/// Parsed reply to `POST /api/convert-to-video/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReply {
    pub status: JobStatus,
    pub job_id: Option<String>,
    pub artifacts: ConversionArtifacts,
    pub error: Option<String>,
}

/// Parsed reply to `GET /api/check-video-status/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub status: JobStatus,
    pub artifacts: ConversionArtifacts,
    pub error: Option<String>,
}

/// What the driver must do after a timer tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickAction {
    /// Issue status check number `attempt` for `job_id`.
    Check { job_id: String, attempt: u32 },
    /// The attempt budget is spent; stop the timer.
    TimedOut,
    /// Not polling; the timer should not be running.
    Nothing,
}

/// User-facing message for a terminal state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum Notice {
    /// Shown next to the convert control.
    Inline(String),
    /// Blocking alert.
    Alert(String),
}

impl ConversionState {
    /// Start a conversion. Allowed from `Idle`, as a retry after `Failed`
    /// or `TimedOut`, and after a completion that produced no output.
    pub fn begin(&self) -> Result<Self, CoreError> {
        match self {
            ConversionState::Idle | ConversionState::Failed { .. } | ConversionState::TimedOut => {
                Ok(ConversionState::Submitting)
            }
            ConversionState::Completed(artifacts) if artifacts.is_empty() => {
                Ok(ConversionState::Submitting)
            }
            ConversionState::Submitting | ConversionState::Polling { .. } => Err(
                CoreError::Conflict("A conversion is already in progress".to_string()),
            ),
            ConversionState::Completed(_) => Err(CoreError::Conflict(
                "This logo has already been converted".to_string(),
            )),
        }
    }

    /// Apply the backend's reply to the submission.
    pub fn on_submitted(self, reply: SubmitReply) -> Self {
        if self != ConversionState::Submitting {
            return self;
        }

        match (reply.status, reply.job_id) {
            (JobStatus::Completed, _) => ConversionState::Completed(reply.artifacts),
            (JobStatus::Processing, Some(job_id)) if !job_id.is_empty() => {
                ConversionState::Polling {
                    job_id,
                    attempts: 0,
                }
            }
            (JobStatus::Processing, _) => submission_failed(None),
            (JobStatus::Failed, _) => submission_failed(reply.error),
        }
    }

    /// The submission call failed. `server_message` is the backend's own
    /// explanation, if it gave one.
    pub fn on_submit_failed(self, server_message: Option<String>) -> Self {
        if self != ConversionState::Submitting {
            return self;
        }
        submission_failed(server_message)
    }

    /// Advance the poll timer by one tick.
    pub fn on_tick(self, max_attempts: u32) -> (Self, TickAction) {
        match self {
            ConversionState::Polling { job_id, attempts } if attempts < max_attempts => {
                let attempt = attempts + 1;
                let action = TickAction::Check {
                    job_id: job_id.clone(),
                    attempt,
                };
                (
                    ConversionState::Polling {
                        job_id,
                        attempts: attempt,
                    },
                    action,
                )
            }
            ConversionState::Polling { .. } => (ConversionState::TimedOut, TickAction::TimedOut),
            other => (other, TickAction::Nothing),
        }
    }

    /// Apply a status check result. Reports arriving after the lifecycle
    /// has left `Polling` are ignored.
    pub fn on_report(self, report: StatusReport) -> Self {
        if !matches!(self, ConversionState::Polling { .. }) {
            return self;
        }

        match report.status {
            JobStatus::Processing => self,
            JobStatus::Completed => ConversionState::Completed(report.artifacts),
            JobStatus::Failed => ConversionState::Failed {
                stage: FailureStage::Job,
                reason: report
                    .error
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| UNKNOWN_JOB_ERROR.to_string()),
            },
        }
    }

    pub fn job_id(&self) -> Option<&str> {
        match self {
            ConversionState::Polling { job_id, .. } => Some(job_id),
            _ => None,
        }
    }

    pub fn attempts(&self) -> u32 {
        match self {
            ConversionState::Polling { attempts, .. } => *attempts,
            _ => 0,
        }
    }

    pub fn artifacts(&self) -> Option<&ConversionArtifacts> {
        match self {
            ConversionState::Completed(artifacts) => Some(artifacts),
            _ => None,
        }
    }

    /// True while a conversion is submitting or polling.
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            ConversionState::Submitting | ConversionState::Polling { .. }
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ConversionState::Completed(_)
                | ConversionState::Failed { .. }
                | ConversionState::TimedOut
        )
    }

    /// The message to surface for this state, if any.
    pub fn notice(&self) -> Option<Notice> {
        match self {
            ConversionState::Failed {
                stage: FailureStage::Submission,
                reason,
            } => Some(Notice::Inline(reason.clone())),
            ConversionState::Failed {
                stage: FailureStage::Job,
                reason,
            } => Some(Notice::Alert(format!("Video conversion failed: {reason}"))),
            ConversionState::TimedOut => Some(Notice::Alert(TIMEOUT_MESSAGE.to_string())),
            _ => None,
        }
    }
}

fn submission_failed(server_message: Option<String>) -> ConversionState {
    ConversionState::Failed {
        stage: FailureStage::Submission,
        reason: server_message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
