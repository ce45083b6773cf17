use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 90;
const MAX_REQUEST_TIMEOUT_SECS: u64 = 600;
const DEFAULT_MAX_TOKENS: u32 = 2048;
const MAX_MAX_TOKENS: u32 = 32_768;

/// Connection settings for an OpenAI-compatible chat endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub base_url: String,
    pub model: String,

    /// Never serialized back out
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Transport timeout for one HTTP request
    pub request_timeout_secs: u64,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: 0.3,
        }
    }
}

impl GenerationConfig {
    /// Apply `TOURGEN_*` overrides from the process environment
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup (used by tests)
    #[must_use]
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(base_url) = non_empty("TOURGEN_BASE_URL") {
            self.base_url = base_url;
        }
        if let Some(model) = non_empty("TOURGEN_MODEL") {
            self.model = model;
        }
        if let Some(key) = non_empty("TOURGEN_API_KEY").or_else(|| non_empty("OPENAI_API_KEY")) {
            self.api_key = Some(key);
        }
        self.request_timeout_secs = parse_clamped(
            lookup("TOURGEN_REQUEST_TIMEOUT_SECS").as_deref(),
            self.request_timeout_secs,
            1,
            MAX_REQUEST_TIMEOUT_SECS,
        );
        self.max_tokens = parse_clamped(
            lookup("TOURGEN_MAX_TOKENS").as_deref(),
            self.max_tokens,
            1,
            MAX_MAX_TOKENS,
        );
        self
    }

    /// Chat completions URL for the configured base
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

/// Parse a numeric setting, falling back to `default` and clamping into range
pub fn parse_clamped<T>(raw: Option<&str>, default: T, min: T, max: T) -> T
where
    T: std::str::FromStr + Ord + Copy,
{
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
        .clamp(min, max)
}
