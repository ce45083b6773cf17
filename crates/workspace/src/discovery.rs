use crate::error::Result;
use crate::noise::{exclusion_set, inclusion_set, is_noise_path};
use crate::provider::WorkspaceFiles;
use serde::{Deserialize, Serialize};

/// Candidates enumerated per requested file when a limit is set
const CANDIDATE_POOL_FACTOR: usize = 3;

/// Source extensions discovered by default
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    "ts", "tsx", "js", "jsx", "mjs", "cjs", "py", "rs", "go", "java", "kt", "cs", "rb", "php",
    "swift", "c", "h", "cpp", "hpp",
];

const ENTRY_HINTS: &[&str] = &["index", "main", "app"];
const SOURCE_DIRS: &[&str] = &["src", "lib", "source", "sources", "core", "pkg"];
const TEST_HINTS: &[&str] = &["test", "spec", "__tests__", "__mocks__", "fixture"];
const BUILD_CONFIG_HINTS: &[&str] = &[
    "webpack", "rollup", "vite.config", "babel.config", "jest.config", "vitest.config",
    "tsconfig", "eslint", "prettier", "gulpfile", "gruntfile", "setup.py", "build.rs",
    ".config.",
];
const TYPE_HINTS: &[&str] = &["types", "typings", "interface", "model"];

/// Inputs of one discovery pass
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryOptions {
    /// Extensions to include, without the leading dot
    pub include_extensions: Vec<String>,

    /// Extra glob patterns to exclude
    pub exclude_patterns: Vec<String>,

    /// Maximum files to return (0 = unbounded)
    pub limit: usize,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            include_extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            exclude_patterns: Vec::new(),
            limit: 0,
        }
    }
}

impl DiscoveryOptions {
    /// Enumeration cap handed to the workspace provider
    #[must_use]
    pub fn candidate_cap(&self) -> Option<usize> {
        (self.limit > 0).then(|| self.limit.saturating_mul(CANDIDATE_POOL_FACTOR))
    }
}

/// Discover source files, most important first
pub async fn discover(
    workspace: &dyn WorkspaceFiles,
    options: &DiscoveryOptions,
) -> Result<Vec<String>> {
    let include = inclusion_set(&options.include_extensions)?;
    let exclude = exclusion_set(&options.exclude_patterns)?;

    let candidates = workspace
        .find_files(&include, &exclude, options.candidate_cap())
        .await?;
    let found = candidates.len();

    let mut files: Vec<String> = candidates
        .into_iter()
        .filter(|path| {
            let noisy = is_noise_path(path);
            if noisy {
                log::debug!("Skipping noisy path {path}");
            }
            !noisy
        })
        .collect();

    prioritize(&mut files);
    if options.limit > 0 {
        files.truncate(options.limit);
    }

    log::info!("Discovered {} files ({found} candidates)", files.len());
    Ok(files)
}

/// Stable sort by descending [`score_path`]
pub fn prioritize(files: &mut [String]) {
    files.sort_by_cached_key(|path| std::cmp::Reverse(score_path(path)));
}

/// Estimated importance of a path (higher = earlier in the tour)
pub fn score_path(path: &str) -> i64 {
    let lowered = path.replace('\\', "/").to_lowercase();
    let components: Vec<&str> = lowered.split('/').collect();
    let (dirs, file_name) = components.split_at(components.len().saturating_sub(1));
    let file_name = file_name.first().copied().unwrap_or_default();

    let mut score = 0i64;
    if ENTRY_HINTS.iter().any(|hint| lowered.contains(hint)) {
        score += 100;
    }
    if dirs.iter().any(|dir| SOURCE_DIRS.contains(dir)) {
        score += 50;
    }
    if TEST_HINTS.iter().any(|hint| lowered.contains(hint)) {
        score -= 50;
    }
    score -= 2 * dirs.len() as i64;
    if BUILD_CONFIG_HINTS.iter().any(|hint| file_name.contains(hint)) {
        score -= 30;
    }
    if TYPE_HINTS.iter().any(|hint| file_name.contains(hint)) {
        score += 10;
    }
    score
}
