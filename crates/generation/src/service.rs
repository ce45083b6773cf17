use crate::error::Result;
use crate::message::{GenerationRequest, GenerationResponse};
use async_trait::async_trait;
use std::sync::Arc;

/// Black-box text generation capability.
///
/// Implementations must be cheap to share across concurrent batch tasks.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Send the conversation and return the generated text.
    ///
    /// # Errors
    ///
    /// Returns a classified [`crate::GenerationError`] when the call fails.
    async fn complete(&self, request: GenerationRequest) -> Result<GenerationResponse>;

    /// Model used when a request does not name one
    fn default_model(&self) -> &str {
        "default"
    }
}

#[async_trait]
impl<T: GenerationService + ?Sized> GenerationService for Arc<T> {
    async fn complete(&self, request: GenerationRequest) -> Result<GenerationResponse> {
        (**self).complete(request).await
    }

    fn default_model(&self) -> &str {
        (**self).default_model()
    }
}
