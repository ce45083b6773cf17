use thiserror::Error;
use tourgen_generation::GenerationError;

/// Result type for tour generation
pub type Result<T> = std::result::Result<T, TourError>;

/// Terminal outcomes that abort a run.
///
/// Individual batch or welcome failures never show up here; they are
/// recovered inside the pipeline.
#[derive(Error, Debug)]
pub enum TourError {
    /// The run was cancelled; partial results were discarded
    #[error("Tour generation cancelled")]
    Cancelled,

    /// No usable generation service (missing credential)
    #[error("Generation service not configured: {}", .0.user_message())]
    ServiceNotConfigured(GenerationError),

    #[error("Workspace error: {0}")]
    Workspace(#[from] tourgen_workspace::WorkspaceError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<GenerationError> for TourError {
    fn from(e: GenerationError) -> Self {
        Self::ServiceNotConfigured(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn not_configured_shows_the_user_message() {
        let err = TourError::from(GenerationError::MissingCredential("no key".into()));
        assert_eq!(
            err.to_string(),
            format!(
                "Generation service not configured: {}",
                GenerationError::MissingCredential(String::new()).user_message()
            )
        );
        assert!(err.to_string().contains("TOURGEN_API_KEY"));
    }
}
