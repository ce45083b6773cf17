use thiserror::Error;

pub type Result<T> = std::result::Result<T, WorkspaceError>;

#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid glob pattern: {0}")]
    InvalidPattern(#[from] globset::Error),

    #[error("Invalid workspace root: {0}")]
    InvalidRoot(String),

    #[error("File enumeration task failed: {0}")]
    Enumeration(String),
}
