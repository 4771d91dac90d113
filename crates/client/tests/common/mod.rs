#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use studio_client::api::StudioApiError;
use studio_client::backend::{ConversionBackend, GenerationBackend};
use studio_core::lifecycle::{StatusReport, SubmitReply};
use studio_core::logo::ConversionArtifacts;
use studio_core::request::LogoRequest;
use studio_core::status::JobStatus;
use tokio::time::Instant;

// ---------------------------------------------------------------------------
// In-memory backend
// ---------------------------------------------------------------------------

/// One scripted status check reply.
pub enum Check {
    Report(StatusReport),
    Error,
    /// Reply only after the given delay.
    Delayed(Duration, StatusReport),
}

/// Scripted backend that records every call it receives.
///
/// Submissions and status checks pop from their scripts in order. Once a
/// script runs out, submissions answer "processing" with job `J` and
/// status checks answer "processing".
#[derive(Default)]
pub struct FakeBackend {
    logos: Mutex<Option<Result<Vec<String>, u16>>>,
    submits: Mutex<VecDeque<Result<SubmitReply, StudioApiError>>>,
    checks: Mutex<VecDeque<Check>>,
    pub generate_calls: Mutex<Vec<LogoRequest>>,
    pub submit_calls: Mutex<Vec<String>>,
    pub check_calls: Mutex<Vec<(String, Instant)>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_logos(self, urls: &[&str]) -> Self {
        *self.logos.lock().unwrap() = Some(Ok(urls.iter().map(|u| u.to_string()).collect()));
        self
    }

    pub fn with_generate_failure(self, status: u16) -> Self {
        *self.logos.lock().unwrap() = Some(Err(status));
        self
    }

    pub fn with_submit(self, reply: Result<SubmitReply, StudioApiError>) -> Self {
        self.submits.lock().unwrap().push_back(reply);
        self
    }

    pub fn with_checks(self, checks: Vec<Check>) -> Self {
        self.checks.lock().unwrap().extend(checks);
        self
    }

    pub fn check_count(&self) -> usize {
        self.check_calls.lock().unwrap().len()
    }

    pub fn check_times(&self, since: Instant) -> Vec<Duration> {
        self.check_calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, at)| at.duration_since(since))
            .collect()
    }

    pub fn checked_job_ids(&self) -> Vec<String> {
        self.check_calls
            .lock()
            .unwrap()
            .iter()
            .map(|(id, _)| id.clone())
            .collect()
    }
}

#[async_trait]
impl GenerationBackend for FakeBackend {
    async fn generate(&self, request: &LogoRequest) -> Result<Vec<String>, StudioApiError> {
        self.generate_calls.lock().unwrap().push(request.clone());
        match self.logos.lock().unwrap().clone() {
            Some(Ok(urls)) => Ok(urls),
            Some(Err(status)) => Err(api_error(status, None)),
            None => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl ConversionBackend for FakeBackend {
    async fn submit(&self, image_url: &str) -> Result<SubmitReply, StudioApiError> {
        self.submit_calls.lock().unwrap().push(image_url.to_string());
        let next = self.submits.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(processing("J")))
    }

    async fn check(&self, job_id: &str) -> Result<StatusReport, StudioApiError> {
        self.check_calls
            .lock()
            .unwrap()
            .push((job_id.to_string(), Instant::now()));
        let next = self.checks.lock().unwrap().pop_front();
        match next {
            None => Ok(report(JobStatus::Processing)),
            Some(Check::Report(r)) => Ok(r),
            Some(Check::Error) => Err(api_error(503, None)),
            Some(Check::Delayed(delay, r)) => {
                tokio::time::sleep(delay).await;
                Ok(r)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Reply builders
// ---------------------------------------------------------------------------

pub fn api_error(status: u16, message: Option<&str>) -> StudioApiError {
    StudioApiError::ApiError {
        status,
        message: message.map(str::to_string),
        body: String::new(),
    }
}

pub fn processing(job_id: &str) -> SubmitReply {
    SubmitReply {
        status: JobStatus::Processing,
        job_id: Some(job_id.to_string()),
        artifacts: ConversionArtifacts::default(),
        error: None,
    }
}

pub fn completed_now(video_url: Option<&str>, gif_url: Option<&str>) -> SubmitReply {
    SubmitReply {
        status: JobStatus::Completed,
        job_id: None,
        artifacts: ConversionArtifacts::new(
            video_url.map(str::to_string),
            gif_url.map(str::to_string),
        ),
        error: None,
    }
}

pub fn report(status: JobStatus) -> StatusReport {
    StatusReport {
        status,
        artifacts: ConversionArtifacts::default(),
        error: None,
    }
}

pub fn report_completed(video_url: &str) -> StatusReport {
    StatusReport {
        status: JobStatus::Completed,
        artifacts: ConversionArtifacts::new(Some(video_url.to_string()), None),
        error: None,
    }
}

pub fn report_failed(error: &str) -> StatusReport {
    StatusReport {
        status: JobStatus::Failed,
        artifacts: ConversionArtifacts::default(),
        error: Some(error.to_string()),
    }
}

// ---------------------------------------------------------------------------
// HTTP stub server
// ---------------------------------------------------------------------------

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn spawn_stub(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}
