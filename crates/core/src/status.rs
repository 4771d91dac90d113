//! Job status values reported by the conversion backend.
//!
//! The backend sends status as a free-form string. Only the three values
//! below carry meaning; anything else is surfaced as
//! [`CoreError::UnknownStatus`] instead of being silently ignored.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The conversion job is still running.
pub const STATUS_PROCESSING: &str = "processing";
/// The conversion job produced its output.
pub const STATUS_COMPLETED: &str = "completed";
/// The conversion job failed on the backend.
pub const STATUS_FAILED: &str = "failed";

/// Closed set of backend job statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Processing => STATUS_PROCESSING,
            JobStatus::Completed => STATUS_COMPLETED,
            JobStatus::Failed => STATUS_FAILED,
        }
    }

    /// Parse an optional wire value. A missing status is unknown too.
    pub fn parse_wire(raw: Option<&str>) -> Result<Self, CoreError> {
        match raw {
            Some(s) => s.parse(),
            None => Err(CoreError::UnknownStatus(String::new())),
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Processing)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            STATUS_PROCESSING => Ok(JobStatus::Processing),
            STATUS_COMPLETED => Ok(JobStatus::Completed),
            STATUS_FAILED => Ok(JobStatus::Failed),
            other => Err(CoreError::UnknownStatus(other.to_string())),
        }
    }
}
