use crate::error::Result;
use async_trait::async_trait;
use globset::GlobSet;
use std::path::Path;

/// Text of one workspace file with its language tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub text: String,
    pub language: String,
}

/// Read-only access to the files of one workspace.
///
/// Paths are workspace-relative and `/`-separated.
#[async_trait]
pub trait WorkspaceFiles: Send + Sync {
    /// Absolute workspace root
    fn root(&self) -> &Path;

    /// Name shown to users (the root folder name)
    fn display_name(&self) -> String {
        self.root()
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| "workspace".to_string())
    }

    /// Enumerate files matching `include` and not `exclude`, stopping after `cap` hits
    async fn find_files(
        &self,
        include: &GlobSet,
        exclude: &GlobSet,
        cap: Option<usize>,
    ) -> Result<Vec<String>>;

    /// Read file text and its language tag
    async fn read_document(&self, rel_path: &str) -> Result<Document>;

    /// Read a file by path joined onto the root; `None` when absent or unreadable
    async fn read_joined(&self, rel_path: &str) -> Option<String>;
}
