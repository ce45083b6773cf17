//! OpenAI-compatible chat completions client.

use crate::config::GenerationConfig;
use crate::error::{GenerationError, Result};
use crate::message::{ChatMessage, GenerationRequest, GenerationResponse, TokenUsage};
use crate::service::GenerationService;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Client for any endpoint speaking the `/chat/completions` protocol
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    config: GenerationConfig,
    api_key: String,
}

impl OpenAiClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// [`GenerationError::MissingCredential`] when no API key is set.
    pub fn from_config(config: GenerationConfig) -> Result<Self> {
        if !config.has_credential() {
            return Err(GenerationError::MissingCredential(
                "no API key configured".to_string(),
            ));
        }
        let api_key = config.api_key.as_deref().unwrap_or_default().trim().to_string();

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| GenerationError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Map a non-success HTTP status to a classified error
fn classify_status(status: StatusCode, body: &str) -> GenerationError {
    let detail = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().chars().take(200).collect());
    let detail = format!("HTTP {}: {detail}", status.as_u16());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GenerationError::Authentication(detail),
        StatusCode::TOO_MANY_REQUESTS => GenerationError::RateLimited(detail),
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
            GenerationError::Unreachable(detail)
        }
        _ => GenerationError::Other(detail),
    }
}

/// Extract the first choice's text from a successful body
fn parse_completion(body: &str) -> Result<GenerationResponse> {
    let parsed: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| GenerationError::MalformedResponse(format!("invalid JSON: {e}")))?;

    let text = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| GenerationError::MalformedResponse("empty completion".to_string()))?;

    Ok(GenerationResponse {
        text,
        usage: parsed.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
        }),
    })
}

#[async_trait]
impl GenerationService for OpenAiClient {
    async fn complete(&self, request: GenerationRequest) -> Result<GenerationResponse> {
        let model = request.model.as_deref().unwrap_or(&self.config.model);
        let body = ChatCompletionRequest {
            model,
            messages: &request.messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        log::debug!(
            "POST {} ({} messages, model {model})",
            self.config.completions_url(),
            request.messages.len()
        );

        let response = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let err = classify_status(status, &text);
            log::warn!("Generation request failed: {err}");
            return Err(err);
        }

        let parsed = parse_completion(&text)?;
        if let Some(usage) = parsed.usage {
            log::debug!(
                "Generation used {} tokens ({} prompt + {} completion)",
                usage.total(),
                usage.prompt_tokens,
                usage.completion_tokens
            );
        }
        Ok(parsed)
    }

    fn default_model(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_key_is_rejected() {
        let err = OpenAiClient::from_config(GenerationConfig::default()).unwrap_err();
        assert!(matches!(err, GenerationError::MissingCredential(_)));

        let blank = GenerationConfig {
            api_key: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(OpenAiClient::from_config(blank).is_err());
    }

    #[test]
    fn client_keeps_model() {
        let config = GenerationConfig {
            api_key: Some("sk-test".to_string()),
            model: "m1".to_string(),
            ..Default::default()
        };
        let client = OpenAiClient::from_config(config).unwrap();
        assert_eq!(client.default_model(), "m1");
    }

    #[test]
    fn status_classification() {
        let body = r#"{"error":{"message":"bad key"}}"#;
        match classify_status(StatusCode::UNAUTHORIZED, body) {
            GenerationError::Authentication(detail) => assert_eq!(detail, "HTTP 401: bad key"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            classify_status(StatusCode::FORBIDDEN, ""),
            GenerationError::Authentication(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, "slow down"),
            GenerationError::RateLimited(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::SERVICE_UNAVAILABLE, ""),
            GenerationError::Unreachable(_)
        ));
        match classify_status(StatusCode::BAD_REQUEST, "plain text") {
            GenerationError::Other(detail) => assert_eq!(detail, "HTTP 400: plain text"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parses_content_and_usage() {
        let body = r#"{
            "choices": [{"message": {"role": "assistant", "content": "[]"}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 3, "total_tokens": 15}
        }"#;
        let response = parse_completion(body).unwrap();
        assert_eq!(response.text, "[]");
        assert_eq!(
            response.usage,
            Some(TokenUsage {
                prompt_tokens: 12,
                completion_tokens: 3
            })
        );
    }

    #[test]
    fn empty_or_invalid_body_is_malformed() {
        for body in [
            r#"{"choices": []}"#,
            r#"{"choices": [{"message": {"content": "  "}}]}"#,
            r#"{"choices": [{"message": {"content": null}}]}"#,
            "not json",
        ] {
            assert!(
                matches!(parse_completion(body), Err(GenerationError::MalformedResponse(_))),
                "{body}"
            );
        }
    }
}
