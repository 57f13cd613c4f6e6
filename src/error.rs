use thiserror::Error;

/// Fixed user-facing message carried by every reported load failure
pub const FRIENDLY_LOAD_MESSAGE: &str =
    "Unable to load the sales agreement. Please try again or contact support.";

/// Failures that surface to the caller of a load.
///
/// Data-integrity warnings (a Change/Delete delta referencing an entity
/// absent from the baseline) never appear here; the resolver drops them and
/// logs at warn level.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("upstream call failed: {0}")]
    Upstream(#[from] anyhow::Error),
}

impl LoadError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }
}
