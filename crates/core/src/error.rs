use crate::types::LogoId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: LogoId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unknown job status: '{0}'")]
    UnknownStatus(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}
