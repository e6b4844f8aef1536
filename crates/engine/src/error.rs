use lorebound_core::error::CoreError;

pub type EngineResult<T> = Result<T, EngineError>;

/// Infrastructure and policy failures surfaced by engine operations.
///
/// Entity-level failures during bulk copies are not errors: they are
/// accumulated into a `CopyReport` and the operation continues.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(String),
}

impl EngineError {
    pub fn not_found(entity: &'static str, id: lorebound_core::types::DbId) -> Self {
        Self::Core(CoreError::NotFound { entity, id })
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Core(CoreError::Validation(message.into()))
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Core(CoreError::Conflict(message.into()))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Core(CoreError::Forbidden(message.into()))
    }
}
