//! # Tourgen Generation
//!
//! Port to the external text-generation service plus an OpenAI-compatible
//! client.
//!
//! The service is untrusted: callers treat every failure as recoverable and
//! every response as unvalidated text. Errors are classified so that callers
//! can show a distinct message per failure kind.
//!
//! ```no_run
//! use tourgen_generation::{GenerationConfig, GenerationRequest, GenerationService, OpenAiClient};
//!
//! # async fn run() -> tourgen_generation::Result<()> {
//! let client = OpenAiClient::from_config(GenerationConfig::default().with_env_overrides())?;
//! let response = client
//!     .complete(GenerationRequest::with_system("Reply with []", "go"))
//!     .await?;
//! println!("{}", response.text);
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod message;
mod openai;
mod service;

pub use config::{parse_clamped, GenerationConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use error::{GenerationError, Result};
pub use message::{ChatMessage, GenerationRequest, GenerationResponse, Role, TokenUsage};
pub use openai::OpenAiClient;
pub use service::GenerationService;
