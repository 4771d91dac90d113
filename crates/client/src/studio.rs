//! Logo studio session.
//!
//! [`Studio`] is the single owner of a session's gallery. It generates
//! logos into the [`LogoStore`], tracks which logo is selected, and runs
//! at most one [`Conversion`] at a time. Leaving a logo (selecting
//! another one, or going back to the gallery) drops its conversion, which
//! stops any status polling still in progress.

use std::sync::Arc;

use studio_core::error::CoreError;
use studio_core::lifecycle::ConversionState;
use studio_core::logo::{ConversionArtifacts, Logo};
use studio_core::request::LogoRequest;
use studio_core::store::{LogoSnapshot, LogoStore, LogoView};
use studio_core::types::LogoId;
use tokio::sync::watch;

use crate::api::StudioApiError;
use crate::backend::{ConversionBackend, GenerationBackend};
use crate::conversion::{Conversion, PollConfig};

/// Errors surfaced by [`Studio`] operations.
#[derive(Debug, thiserror::Error)]
pub enum StudioError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Failed to generate logos: {0}")]
    Generation(#[source] StudioApiError),

    #[error("No logo is selected")]
    NoSelection,

    #[error("No conversion is running for the selected logo")]
    NoConversion,
}

/// Outcome of a finished conversion, with the gallery record as it now
/// stands.
#[derive(Debug, Clone)]
pub struct ConversionOutcome {
    pub state: ConversionState,
    pub logo: Logo,
}

/// A conversion tied to the logo it was started for.
struct ActiveConversion {
    logo_id: LogoId,
    conversion: Conversion,
}

/// One user session: gallery, selection, and the active conversion.
pub struct Studio<B> {
    backend: Arc<B>,
    store: LogoStore,
    poll: PollConfig,
    selected: Option<LogoId>,
    active: Option<ActiveConversion>,
    /// Last terminal state per selection, kept so a failed conversion can
    /// be retried and its notice shown until the user moves on.
    last_outcome: Option<(LogoId, ConversionState)>,
}

impl<B> Studio<B>
where
    B: GenerationBackend + ConversionBackend + 'static,
{
    pub fn new(backend: Arc<B>, poll: PollConfig) -> Self {
        Self {
            backend,
            store: LogoStore::new(),
            poll,
            selected: None,
            active: None,
            last_outcome: None,
        }
    }

    pub fn logos(&self) -> LogoSnapshot {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> LogoView {
        self.store.subscribe()
    }

    pub fn selected(&self) -> Option<Logo> {
        self.selected.and_then(|id| self.store.get(id))
    }

    /// Generate logos and append them to the gallery.
    ///
    /// The gallery is left untouched if the request is invalid or the
    /// backend call fails.
    pub async fn generate(&mut self, request: &LogoRequest) -> Result<Vec<Logo>, StudioError> {
        request.validate()?;

        let urls = self
            .backend
            .generate(request)
            .await
            .map_err(StudioError::Generation)?;

        let added = self.store.append_generated(urls);
        tracing::info!(
            count = added.len(),
            total = self.store.len(),
            "Added generated logos to gallery",
        );
        Ok(added)
    }

    /// Append a placeholder logo to the gallery.
    pub fn add_sample(&mut self) -> Logo {
        self.store.add_sample()
    }

    /// Select a logo. Selecting a different logo discards the previous
    /// logo's conversion.
    pub fn select(&mut self, id: LogoId) -> Result<Logo, StudioError> {
        let logo = self.store.get(id).ok_or(CoreError::NotFound {
            entity: "Logo",
            id,
        })?;

        if self.selected != Some(id) {
            self.leave();
        }
        self.selected = Some(id);
        Ok(logo)
    }

    /// Return to the gallery, discarding any conversion.
    pub fn back(&mut self) {
        self.leave();
        self.selected = None;
    }

    /// Current conversion state of the selected logo.
    pub fn conversion_state(&self) -> ConversionState {
        let Some(id) = self.selected else {
            return ConversionState::Idle;
        };
        match (&self.active, &self.last_outcome) {
            (Some(active), _) if active.logo_id == id => active.conversion.state(),
            (_, Some((logo_id, state))) if *logo_id == id => state.clone(),
            _ => ConversionState::Idle,
        }
    }

    /// Start converting the selected logo into a video.
    pub fn convert_selected(&mut self) -> Result<watch::Receiver<ConversionState>, StudioError> {
        let logo = self.selected().ok_or(StudioError::NoSelection)?;
        if !logo.can_convert() {
            return Err(CoreError::Conflict(format!(
                "Logo {} has already been converted",
                logo.id()
            ))
            .into());
        }
        self.conversion_state().begin()?;

        let conversion = Conversion::start(Arc::clone(&self.backend), logo.url(), self.poll);
        let rx = conversion.subscribe();
        tracing::info!(logo_id = logo.id(), "Conversion started");

        self.last_outcome = None;
        self.active = Some(ActiveConversion {
            logo_id: logo.id(),
            conversion,
        });
        Ok(rx)
    }

    /// Wait for the selected logo's conversion to end.
    ///
    /// On completion the artifacts are written into the gallery record,
    /// and that updated record is returned.
    pub async fn finish_conversion(&mut self) -> Result<ConversionOutcome, StudioError> {
        let active = self.active.take().ok_or(StudioError::NoConversion)?;
        let logo_id = active.logo_id;
        let state = active.conversion.finish().await;

        let logo = match state.artifacts() {
            Some(artifacts) => self.attach_artifacts(logo_id, artifacts)?,
            None => self.store.get(logo_id).ok_or(CoreError::NotFound {
                entity: "Logo",
                id: logo_id,
            })?,
        };

        if let Some(notice) = state.notice() {
            tracing::warn!(logo_id, ?notice, "Conversion did not produce output");
        }

        self.last_outcome = Some((logo_id, state.clone()));
        Ok(ConversionOutcome { state, logo })
    }

    /// Empty the gallery and drop the selection and any conversion.
    pub fn reset(&mut self) {
        self.back();
        self.store.reset();
    }

    /// Drop the active conversion. A conversion that already completed
    /// still has its output written into the gallery.
    fn leave(&mut self) {
        if let Some(active) = self.active.take() {
            let state = active.conversion.state();
            match state.artifacts() {
                Some(artifacts) => {
                    if let Err(e) = self.attach_artifacts(active.logo_id, artifacts) {
                        tracing::warn!(
                            logo_id = active.logo_id,
                            error = %e,
                            "Failed to attach conversion output",
                        );
                    }
                }
                None if state.is_busy() => {
                    tracing::info!(logo_id = active.logo_id, "Discarding conversion");
                    active.conversion.cancel();
                }
                None => {}
            }
        }
        self.last_outcome = None;
    }

    /// Write a completed conversion's output into the gallery record.
    /// Output with neither URL leaves the record untouched.
    fn attach_artifacts(
        &mut self,
        logo_id: LogoId,
        artifacts: &ConversionArtifacts,
    ) -> Result<Logo, StudioError> {
        let logo = self.store.get(logo_id).ok_or(CoreError::NotFound {
            entity: "Logo",
            id: logo_id,
        })?;
        if artifacts.is_empty() {
            return Ok(logo);
        }

        let logo = logo.with_artifacts(artifacts.clone())?;
        self.store.update(logo.clone())?;
        tracing::info!(
            logo_id,
            video_url = ?logo.video_url(),
            gif_url = ?logo.gif_url(),
            "Conversion output attached to logo",
        );
        Ok(logo)
    }
}
