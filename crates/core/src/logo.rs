//! The logo record and the artifacts a conversion attaches to it.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{LogoId, Timestamp};

/// A generated logo held in the session gallery.
///
/// `id` and `url` are fixed at construction. The video and GIF URLs are
/// attached at most once through [`Logo::with_artifacts`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Logo {
    id: LogoId,
    url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    gif_url: Option<String>,
    generated_at: Timestamp,
}

/// Output of a finished conversion. Either URL may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionArtifacts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gif_url: Option<String>,
}

impl ConversionArtifacts {
    pub fn new(video_url: Option<String>, gif_url: Option<String>) -> Self {
        Self { video_url, gif_url }
    }

    /// True when the backend reported success without any playable output.
    pub fn is_empty(&self) -> bool {
        self.video_url.is_none() && self.gif_url.is_none()
    }
}

impl Logo {
    pub fn new(id: LogoId, url: impl Into<String>) -> Self {
        Self {
            id,
            url: url.into(),
            video_url: None,
            gif_url: None,
            generated_at: Utc::now(),
        }
    }

    /// Placeholder record used by the history panel before anything has
    /// been generated.
    pub fn placeholder(id: LogoId) -> Self {
        Self::new(
            id,
            format!("/placeholder.svg?height=200&width=200&text=Logo{id}"),
        )
    }

    pub fn id(&self) -> LogoId {
        self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn video_url(&self) -> Option<&str> {
        self.video_url.as_deref()
    }

    pub fn gif_url(&self) -> Option<&str> {
        self.gif_url.as_deref()
    }

    pub fn generated_at(&self) -> Timestamp {
        self.generated_at
    }

    pub fn has_artifacts(&self) -> bool {
        self.video_url.is_some() || self.gif_url.is_some()
    }

    /// A logo can be converted until it carries a video or a GIF.
    pub fn can_convert(&self) -> bool {
        !self.has_artifacts()
    }

    /// Return a copy of this record with the conversion output attached.
    ///
    /// Fails with [`CoreError::Conflict`] if artifacts were already set.
    pub fn with_artifacts(&self, artifacts: ConversionArtifacts) -> Result<Self, CoreError> {
        if self.has_artifacts() {
            return Err(CoreError::Conflict(format!(
                "Logo {} already has conversion output",
                self.id
            )));
        }
        Ok(Self {
            video_url: artifacts.video_url,
            gif_url: artifacts.gif_url,
            ..self.clone()
        })
    }
}
