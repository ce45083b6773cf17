use crate::error::{Result, WorkspaceError};
use crate::noise::IGNORED_SCOPES;
use crate::provider::{Document, WorkspaceFiles};
use async_trait::async_trait;
use globset::GlobSet;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tourgen_analyzer::Language;

const MAX_FILE_SIZE_BYTES: u64 = 1_048_576; // 1 MB

/// Workspace backed by the local file system (.gitignore aware)
#[derive(Debug, Clone)]
pub struct FsWorkspace {
    root: PathBuf,
}

impl FsWorkspace {
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(WorkspaceError::InvalidRoot(root.display().to_string()));
        }
        let root = root.canonicalize()?;
        Ok(Self { root })
    }

    fn scan(root: &Path, include: &GlobSet, exclude: &GlobSet, cap: Option<usize>) -> Vec<String> {
        let mut files = Vec::new();

        let scope_root = root.to_path_buf();
        let mut builder = WalkBuilder::new(root);
        builder
            .hidden(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .sort_by_file_name(|a, b| a.cmp(b));
        builder.filter_entry(move |entry| !Self::is_ignored_scope(entry.path(), &scope_root));

        for result in builder.build() {
            if cap.is_some_and(|cap| files.len() >= cap) {
                break;
            }

            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Failed to read entry: {e}");
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }

            let path = entry.path();
            let Some(rel_path) = Self::relative(root, path) else {
                continue;
            };
            if exclude.is_match(&rel_path) || !include.is_match(&rel_path) {
                continue;
            }

            if let Ok(meta) = entry.metadata() {
                if meta.len() > MAX_FILE_SIZE_BYTES {
                    log::debug!(
                        "Skipping large file {} ({} bytes > {})",
                        path.display(),
                        meta.len(),
                        MAX_FILE_SIZE_BYTES
                    );
                    continue;
                }
            }

            files.push(rel_path);
        }

        log::info!("Found {} candidate files", files.len());
        files
    }

    fn relative(root: &Path, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(root).ok()?;
        let parts: Vec<String> = relative
            .components()
            .filter_map(|component| match component {
                std::path::Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        (!parts.is_empty()).then(|| parts.join("/"))
    }

    fn is_ignored_scope(path: &Path, root: &Path) -> bool {
        if let Ok(relative) = path.strip_prefix(root) {
            for component in relative.components() {
                if let std::path::Component::Normal(name) = component {
                    let lowered = name.to_string_lossy().to_lowercase();
                    if IGNORED_SCOPES.iter().any(|ignored| ignored == &lowered) {
                        return true;
                    }
                }
            }
        }
        false
    }
}

#[async_trait]
impl WorkspaceFiles for FsWorkspace {
    fn root(&self) -> &Path {
        &self.root
    }

    async fn find_files(
        &self,
        include: &GlobSet,
        exclude: &GlobSet,
        cap: Option<usize>,
    ) -> Result<Vec<String>> {
        let root = self.root.clone();
        let include = include.clone();
        let exclude = exclude.clone();
        tokio::task::spawn_blocking(move || Self::scan(&root, &include, &exclude, cap))
            .await
            .map_err(|e| WorkspaceError::Enumeration(e.to_string()))
    }

    async fn read_document(&self, rel_path: &str) -> Result<Document> {
        let text = tokio::fs::read_to_string(self.root.join(rel_path)).await?;
        Ok(Document {
            text,
            language: Language::from_path(rel_path).as_str().to_string(),
        })
    }

    async fn read_joined(&self, rel_path: &str) -> Option<String> {
        tokio::fs::read_to_string(self.root.join(rel_path)).await.ok()
    }
}
