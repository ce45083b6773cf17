use crate::readme::clean_readme;
use tourgen_workspace::WorkspaceFiles;

/// Root README names, probed in order
pub const README_CANDIDATES: &[&str] = &[
    "README.md",
    "readme.md",
    "Readme.md",
    "README.markdown",
    "README.rst",
    "README.txt",
    "README",
];

/// Manifests whose description is used as the project purpose line
pub const MANIFEST_CANDIDATES: &[&str] = &["package.json", "Cargo.toml", "pyproject.toml"];

/// The README found at the workspace root, already cleaned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadmeDocument {
    pub file: String,
    pub cleaned: String,
}

/// Project documentation gathered once per run for the welcome step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectContext {
    pub display_name: String,
    pub readme: Option<ReadmeDocument>,
    pub manifest_description: Option<String>,
}

impl ProjectContext {
    /// Probe the workspace root for a README and a manifest description
    pub async fn gather(workspace: &dyn WorkspaceFiles) -> Self {
        let mut readme = None;
        for candidate in README_CANDIDATES {
            if let Some(text) = workspace.read_joined(candidate).await {
                log::debug!("Using {candidate} for the welcome step");
                readme = Some(ReadmeDocument {
                    file: (*candidate).to_string(),
                    cleaned: clean_readme(&text),
                });
                break;
            }
        }

        let mut manifest_description = None;
        for candidate in MANIFEST_CANDIDATES {
            let Some(text) = workspace.read_joined(candidate).await else {
                continue;
            };
            if let Some(description) = manifest_description_from(candidate, &text) {
                manifest_description = Some(description);
                break;
            }
        }

        Self {
            display_name: workspace.display_name(),
            readme,
            manifest_description,
        }
    }
}

/// Read the `description` of a known manifest format
pub fn manifest_description_from(file_name: &str, text: &str) -> Option<String> {
    let description = match file_name {
        "package.json" => serde_json::from_str::<serde_json::Value>(text)
            .ok()?
            .get("description")?
            .as_str()?
            .to_string(),
        "Cargo.toml" => {
            let value = toml::from_str::<toml::Value>(text).ok()?;
            value
                .get("package")?
                .get("description")?
                .as_str()?
                .to_string()
        }
        "pyproject.toml" => {
            let value = toml::from_str::<toml::Value>(text).ok()?;
            value
                .get("project")
                .and_then(|project| project.get("description"))
                .or_else(|| {
                    value
                        .get("tool")
                        .and_then(|tool| tool.get("poetry"))
                        .and_then(|poetry| poetry.get("description"))
                })?
                .as_str()?
                .to_string()
        }
        _ => return None,
    };
    let description = description.trim();
    (!description.is_empty()).then(|| description.to_string())
}
