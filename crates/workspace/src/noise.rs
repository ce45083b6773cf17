use crate::error::Result;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::sync::OnceLock;

/// Glob exclusions applied to every discovery
pub const NOISE_GLOBS: &[&str] = &[
    // dependencies / build outputs
    "**/node_modules/**",
    "**/bower_components/**",
    "**/dist/**",
    "**/build/**",
    "**/out/**",
    "**/target/**",
    "**/coverage/**",
    "**/.next/**",
    "**/.nuxt/**",
    "**/.output/**",
    "**/.turbo/**",
    "**/vendor/**",
    "**/third_party/**",
    "**/__pycache__/**",
    "**/.venv/**",
    "**/venv/**",
    // IDE / VCS
    "**/.git/**",
    "**/.hg/**",
    "**/.svn/**",
    "**/.vscode/**",
    "**/.idea/**",
    // tests
    "**/*.test.*",
    "**/*.spec.*",
    "**/*_test.*",
    "**/test_*.py",
    "**/__tests__/**",
    "**/__mocks__/**",
    // minified / generated / declarations
    "**/*.min.js",
    "**/*.min.css",
    "**/*.bundle.js",
    "**/*.map",
    "**/*.d.ts",
    "**/*.generated.*",
    "**/*.pb.go",
    "**/*_pb2.py",
];

/// Path fragments that mark noise even when glob exclusion missed them
const NOISE_FRAGMENTS: &[&str] = &[
    "/node_modules/",
    "/bower_components/",
    "/dist/",
    "/build/",
    "/out/",
    "/target/",
    "/coverage/",
    "/vendor/",
    "/__pycache__/",
    "/__tests__/",
    "/.git/",
    "/.vscode/",
    "/.idea/",
    ".min.",
    ".test.",
    ".spec.",
    ".d.ts",
    ".generated.",
];

/// Directory names pruned while walking
pub(crate) const IGNORED_SCOPES: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    ".idea",
    ".vscode",
    ".cache",
    "node_modules",
    "bower_components",
    ".next",
    ".nuxt",
    ".turbo",
    ".output",
    "dist",
    "build",
    "out",
    "coverage",
    "target",
    "vendor",
    "third_party",
    "__pycache__",
    ".venv",
    "venv",
    ".tours",
];

/// Build the exclusion set: fixed noise list plus caller patterns.
///
/// Invalid caller patterns are skipped with a warning.
pub fn exclusion_set(extra_patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in NOISE_GLOBS {
        builder.add(Glob::new(pattern)?);
    }
    for pattern in extra_patterns {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            continue;
        }
        match Glob::new(pattern) {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(e) => log::warn!("Ignoring invalid exclude pattern {pattern:?}: {e}"),
        }
    }
    Ok(builder.build()?)
}

/// Build the inclusion set `**/*.{ext,...}` from bare extensions
pub fn inclusion_set(extensions: &[String]) -> Result<GlobSet> {
    let mut exts: Vec<String> = extensions
        .iter()
        .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect();
    exts.dedup();

    let mut builder = GlobSetBuilder::new();
    match exts.len() {
        0 => {}
        1 => {
            builder.add(Glob::new(&format!("**/*.{}", exts[0]))?);
        }
        _ => {
            builder.add(Glob::new(&format!("**/*.{{{}}}", exts.join(",")))?);
        }
    }
    Ok(builder.build()?)
}

fn noise_globs() -> &'static GlobSet {
    static SET: OnceLock<GlobSet> = OnceLock::new();
    SET.get_or_init(|| {
        exclusion_set(&[]).unwrap_or_else(|e| unreachable!("noise globs are valid: {e}"))
    })
}

/// Noise check for paths that did not come through glob exclusion.
///
/// Applies [`NOISE_GLOBS`] plus path fragments that catch near misses.
pub fn is_noise_path(rel_path: &str) -> bool {
    let relative = rel_path.replace('\\', "/").to_lowercase();
    if noise_globs().is_match(relative.trim_start_matches("./")) {
        return true;
    }
    let anchored = format!("/{relative}");
    NOISE_FRAGMENTS
        .iter()
        .any(|fragment| anchored.contains(fragment))
}
