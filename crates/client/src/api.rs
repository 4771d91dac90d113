//! REST API client for the logo generation backend.
//!
//! Wraps the three backend endpoints (logo generation, video conversion
//! submission, conversion status) using [`reqwest`]. Request bodies are
//! form-encoded; replies are JSON.

use std::time::Duration;

use serde::Deserialize;
use studio_core::error::CoreError;
use studio_core::lifecycle::{StatusReport, SubmitReply};
use studio_core::logo::ConversionArtifacts;
use studio_core::request::LogoRequest;
use studio_core::status::JobStatus;

use crate::config::StudioConfig;

/// Logo generation endpoint.
pub const GENERATE_LOGOS_PATH: &str = "/api/generate-logos/";
/// Video conversion submission endpoint.
pub const CONVERT_TO_VIDEO_PATH: &str = "/api/convert-to-video/";
/// Video conversion status endpoint.
pub const CHECK_VIDEO_STATUS_PATH: &str = "/api/check-video-status/";

/// HTTP client for one backend origin.
#[derive(Clone)]
pub struct StudioApi {
    client: reqwest::Client,
    api_url: String,
    /// Overrides the client timeout for logo generation only.
    generate_timeout: Option<Duration>,
}

/// Reply body of `POST /api/generate-logos/`.
#[derive(Debug, Deserialize)]
pub struct GenerateLogosResponse {
    #[serde(default)]
    pub logos: Vec<String>,
}

/// Reply body shared by the convert and status endpoints.
///
/// Every field is optional: the backend is not trusted to send all of
/// them, and a missing field simply reads as absent.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoJobResponse {
    pub status: Option<String>,
    pub job_id: Option<String>,
    pub video_url: Option<String>,
    pub gif_url: Option<String>,
    pub error: Option<String>,
}

/// Errors from the backend REST layer.
#[derive(Debug, thiserror::Error)]
pub enum StudioApiError {
    /// The HTTP request itself failed (network, DNS, TLS, body decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("Backend API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// The `error` field of a JSON body, when present.
        message: Option<String>,
        /// Raw response body for debugging.
        body: String,
    },

    /// The backend replied with a status value outside the known set.
    #[error("Unexpected job status '{status}'")]
    UnknownStatus {
        status: String,
        /// The `error` field sent alongside the status, if any.
        message: Option<String>,
    },
}

impl StudioApiError {
    /// The backend's own explanation of the failure, if it sent one.
    pub fn server_message(&self) -> Option<String> {
        match self {
            StudioApiError::Request(_) => None,
            StudioApiError::ApiError { message, .. } => message.clone(),
            StudioApiError::UnknownStatus { message, .. } => message.clone(),
        }
    }
}

impl VideoJobResponse {
    fn parse_status(&self) -> Result<JobStatus, StudioApiError> {
        JobStatus::parse_wire(self.status.as_deref()).map_err(|e| match e {
            CoreError::UnknownStatus(status) => StudioApiError::UnknownStatus {
                status,
                message: self.error.clone(),
            },
            other => StudioApiError::UnknownStatus {
                status: other.to_string(),
                message: self.error.clone(),
            },
        })
    }

    /// Interpret this body as a submission reply.
    pub fn into_submit_reply(self) -> Result<SubmitReply, StudioApiError> {
        let status = self.parse_status()?;
        Ok(SubmitReply {
            status,
            job_id: self.job_id,
            artifacts: ConversionArtifacts::new(self.video_url, self.gif_url),
            error: self.error,
        })
    }

    /// Interpret this body as a status check reply.
    pub fn into_status_report(self) -> Result<StatusReport, StudioApiError> {
        let status = self.parse_status()?;
        Ok(StatusReport {
            status,
            artifacts: ConversionArtifacts::new(self.video_url, self.gif_url),
            error: self.error,
        })
    }
}

impl StudioApi {
    /// Create a new API client for a backend origin.
    ///
    /// * `api_url` - Base HTTP URL, e.g. `http://localhost:8000`.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_url)
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            api_url,
            generate_timeout: None,
        }
    }

    /// Let logo generation run for up to `timeout`, independent of the
    /// client's own timeout.
    pub fn with_generate_timeout(mut self, timeout: Duration) -> Self {
        self.generate_timeout = Some(timeout);
        self
    }

    /// Build a client with the configured origin and timeouts.
    pub fn from_config(config: &StudioConfig) -> Result<Self, StudioApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self::with_client(client, config.api_url.clone())
            .with_generate_timeout(config.generate_timeout))
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Ask the backend to generate logos for a request.
    ///
    /// Sends `POST /api/generate-logos/` with the composed prompt and
    /// dimensions. Returns the generated image URLs in backend order.
    pub async fn generate_logos(
        &self,
        request: &LogoRequest,
    ) -> Result<Vec<String>, StudioApiError> {
        let mut builder = self
            .client
            .post(self.endpoint(GENERATE_LOGOS_PATH))
            .form(&request.form_fields());
        if let Some(timeout) = self.generate_timeout {
            builder = builder.timeout(timeout);
        }
        let response = builder.send().await?;

        let body: GenerateLogosResponse = Self::parse_response(response).await?;
        tracing::debug!(count = body.logos.len(), "Logos generated");
        Ok(body.logos)
    }

    /// Submit an image for video conversion.
    ///
    /// Sends `POST /api/convert-to-video/` with the image URL. The reply
    /// either carries the finished artifacts or a job id to poll.
    pub async fn convert_to_video(&self, image_url: &str) -> Result<SubmitReply, StudioApiError> {
        let response = self
            .client
            .post(self.endpoint(CONVERT_TO_VIDEO_PATH))
            .form(&[("imageUrl", image_url)])
            .send()
            .await?;

        let body: VideoJobResponse = Self::parse_response(response).await?;
        tracing::debug!(
            status = ?body.status,
            job_id = ?body.job_id,
            "Conversion submitted",
        );
        body.into_submit_reply()
    }

    /// Check the status of a conversion job.
    ///
    /// Sends `GET /api/check-video-status/?jobId=<id>`.
    pub async fn check_video_status(&self, job_id: &str) -> Result<StatusReport, StudioApiError> {
        let response = self
            .client
            .get(self.endpoint(CHECK_VIDEO_STATUS_PATH))
            .query(&[("jobId", job_id)])
            .send()
            .await?;

        let body: VideoJobResponse = Self::parse_response(response).await?;
        tracing::debug!(job_id, status = ?body.status, "Status check response");
        body.into_status_report()
    }

    // ---- private helpers ----

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// Ensure the response has a success status code. On failure, the
    /// JSON body's `error` field (if any) is kept alongside the raw body.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, StudioApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            let message = serde_json::from_str::<VideoJobResponse>(&body)
                .ok()
                .and_then(|b| b.error);
            return Err(StudioApiError::ApiError {
                status: status.as_u16(),
                message,
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, StudioApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}
