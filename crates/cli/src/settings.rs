use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tourgen_generation::{parse_clamped, GenerationConfig};
use tourgen_tour::{OrchestratorConfig, ValidationOptions};
use tourgen_workspace::DiscoveryOptions;

/// Settings file looked up at the workspace root
pub const SETTINGS_FILE: &str = "tourgen.toml";

const MAX_BATCH_SIZE: usize = 32;
const MAX_CONCURRENCY: usize = 16;
const MAX_TIMEOUT_SECS: u64 = 600;
const MAX_STEPS: usize = 500;

/// Everything configurable, merged as defaults < file < environment < flags
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub title: Option<String>,
    pub generation: GenerationConfig,
    pub discovery: DiscoveryOptions,
    pub orchestrator: OrchestratorConfig,
    pub validation: ValidationOptions,
}

impl Settings {
    /// Load `explicit` if given, else `<root>/tourgen.toml` when present, then
    /// apply environment overrides.
    pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        let settings = match explicit {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = root.join(SETTINGS_FILE);
                if default_path.is_file() {
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };
        Ok(settings.with_overrides_from(|key| std::env::var(key).ok()))
    }

    fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings {}", path.display()))?;
        let settings: Self = toml::from_str(&text)
            .with_context(|| format!("Invalid settings in {}", path.display()))?;
        log::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        self.generation = self.generation.with_overrides_from(&lookup);

        let orchestrator = &mut self.orchestrator;
        override_clamped(
            lookup("TOURGEN_BATCH_SIZE"),
            &mut orchestrator.batch_size,
            1,
            MAX_BATCH_SIZE,
        );
        override_clamped(
            lookup("TOURGEN_CONCURRENCY"),
            &mut orchestrator.concurrency,
            1,
            MAX_CONCURRENCY,
        );
        override_clamped(
            lookup("TOURGEN_BATCH_TIMEOUT_SECS"),
            &mut orchestrator.batch_timeout_secs,
            1,
            MAX_TIMEOUT_SECS,
        );
        override_clamped(
            lookup("TOURGEN_MAX_STEPS"),
            &mut self.validation.max_steps,
            1,
            MAX_STEPS,
        );
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.orchestrator
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid orchestrator settings: {e}"))?;
        if self.validation.max_steps == 0 {
            anyhow::bail!("max_steps must be > 0");
        }
        Ok(())
    }
}

/// Replace `field` only when the variable is set; file values are left for `validate`
fn override_clamped<T>(raw: Option<String>, field: &mut T, min: T, max: T)
where
    T: std::str::FromStr + Ord + Copy,
{
    if let Some(raw) = raw {
        *field = parse_clamped(Some(&raw), *field, min, max);
    }
}
