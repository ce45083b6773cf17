use thiserror::Error;

/// Result type for generation operations
pub type Result<T> = std::result::Result<T, GenerationError>;

/// Classified failures of the generation service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// Credential rejected by the provider
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Connection refused, DNS failure or transport timeout
    #[error("Service unreachable: {0}")]
    Unreachable(String),

    /// Response arrived but carried no usable text
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Caller-side deadline elapsed before the service answered
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Generation failed: {0}")]
    Other(String),

    /// No API key configured
    #[error("Missing credential: {0}")]
    MissingCredential(String),
}

impl GenerationError {
    /// Sentence suitable for showing to the person running the tool
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Authentication(_) => {
                "The generation service rejected the API key. Check your credentials."
            }
            Self::RateLimited(_) => {
                "The generation service is rate limiting requests. Wait a moment and try again."
            }
            Self::Unreachable(_) => {
                "Could not reach the generation service. Check the base URL and your network."
            }
            Self::MalformedResponse(_) => {
                "The generation service returned an empty or unreadable response."
            }
            Self::Timeout(_) => "The generation service did not answer in time.",
            Self::Other(_) => "The generation service reported an unexpected error.",
            Self::MissingCredential(_) => {
                "No API key is configured. Set TOURGEN_API_KEY or OPENAI_API_KEY."
            }
        }
    }

    /// Whether the failure is a configuration problem rather than a call failure
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::MissingCredential(_))
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            Self::Unreachable(e.to_string())
        } else if e.is_decode() {
            Self::MalformedResponse(e.to_string())
        } else {
            Self::Other(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn user_messages_are_distinct() {
        let errors = [
            GenerationError::Authentication(String::new()),
            GenerationError::RateLimited(String::new()),
            GenerationError::Unreachable(String::new()),
            GenerationError::MalformedResponse(String::new()),
            GenerationError::Timeout(60),
            GenerationError::Other(String::new()),
            GenerationError::MissingCredential(String::new()),
        ];
        let messages: HashSet<&str> = errors.iter().map(GenerationError::user_message).collect();
        assert_eq!(messages.len(), errors.len());
    }

    #[test]
    fn only_missing_credential_is_configuration() {
        assert!(GenerationError::MissingCredential("x".into()).is_configuration());
        assert!(!GenerationError::Authentication("x".into()).is_configuration());
        assert!(!GenerationError::Timeout(1).is_configuration());
    }
}
