use crate::error::Result;
use crate::step::TourStep;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Directory (under the workspace root) that holds tour files
pub const TOURS_DIR: &str = ".tours";
pub const TOUR_EXTENSION: &str = "tour";
pub const CODETOUR_SCHEMA: &str = "https://aka.ms/codetour-schema";

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\s+").unwrap_or_else(|e| unreachable!("whitespace regex: {e}"))
    })
}

fn non_word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[^\w-]").unwrap_or_else(|e| unreachable!("non-word regex: {e}"))
    })
}

/// File-name slug: lowercase, whitespace runs to `-`, non-word characters removed
pub fn slugify(title: &str) -> String {
    let lowered = title.trim().to_lowercase();
    let dashed = whitespace_re().replace_all(&lowered, "-");
    let slug = non_word_re().replace_all(&dashed, "");
    if slug.is_empty() {
        "tour".to_string()
    } else {
        slug.into_owned()
    }
}

/// A persisted tour in CodeTour-compatible JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tour {
    #[serde(rename = "$schema", default = "default_schema")]
    pub schema: String,
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub steps: Vec<TourStep>,
}

fn default_schema() -> String {
    CODETOUR_SCHEMA.to_string()
}

impl Tour {
    pub fn new(title: impl Into<String>, description: impl Into<String>, steps: Vec<TourStep>) -> Self {
        let title = title.into();
        Self {
            schema: default_schema(),
            id: slugify(&title),
            title,
            description: description.into(),
            steps,
        }
    }

    /// `<root>/.tours/<id>.tour`
    pub fn path_in(&self, root: &Path) -> PathBuf {
        root.join(TOURS_DIR)
            .join(format!("{}.{TOUR_EXTENSION}", self.id))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Write the tour under the workspace root, creating `.tours/` if needed
pub async fn write_tour(root: &Path, tour: &Tour) -> Result<PathBuf> {
    let path = tour.path_in(root);
    if let Some(dir) = path.parent() {
        tokio::fs::create_dir_all(dir).await?;
    }
    tokio::fs::write(&path, tour.to_json()?).await?;
    log::info!("Wrote {} steps to {}", tour.steps.len(), path.display());
    Ok(path)
}
