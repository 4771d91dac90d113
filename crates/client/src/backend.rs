//! Backend seams the session and the conversion task are written against.
//!
//! [`StudioApi`] implements both traits over HTTP. Tests substitute
//! in-memory fakes.

use async_trait::async_trait;
use studio_core::lifecycle::{StatusReport, SubmitReply};
use studio_core::request::LogoRequest;

use crate::api::{StudioApi, StudioApiError};

/// Produces logo image URLs from a request.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate(&self, request: &LogoRequest) -> Result<Vec<String>, StudioApiError>;
}

/// Starts video conversions and reports on their progress.
#[async_trait]
pub trait ConversionBackend: Send + Sync {
    async fn submit(&self, image_url: &str) -> Result<SubmitReply, StudioApiError>;

    async fn check(&self, job_id: &str) -> Result<StatusReport, StudioApiError>;
}

#[async_trait]
impl GenerationBackend for StudioApi {
    async fn generate(&self, request: &LogoRequest) -> Result<Vec<String>, StudioApiError> {
        self.generate_logos(request).await
    }
}

#[async_trait]
impl ConversionBackend for StudioApi {
    async fn submit(&self, image_url: &str) -> Result<SubmitReply, StudioApiError> {
        self.convert_to_video(image_url).await
    }

    async fn check(&self, job_id: &str) -> Result<StatusReport, StudioApiError> {
        self.check_video_status(job_id).await
    }
}
