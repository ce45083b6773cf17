//! # Tourgen Workspace
//!
//! File discovery and project structure for tour generation.
//!
//! ## Pipeline
//!
//! ```text
//! Workspace root
//!     │
//!     ├──> Discovery (.gitignore aware, noise excluded)
//!     │      └─> Candidates (3× limit when bounded)
//!     │
//!     ├──> Prioritizer (path score, stable)
//!     │      └─> Ordered files
//!     │
//!     └──> Structure builder (read + analyze each file)
//!            └─> ProjectStructure
//! ```

mod discovery;
mod error;
mod fs_workspace;
mod noise;
mod provider;
mod structure;

pub use discovery::{discover, prioritize, score_path, DiscoveryOptions, DEFAULT_EXTENSIONS};
pub use error::{Result, WorkspaceError};
pub use fs_workspace::FsWorkspace;
pub use noise::{exclusion_set, inclusion_set, is_noise_path, NOISE_GLOBS};
pub use provider::{Document, WorkspaceFiles};
pub use structure::{build_structure, is_entry_point};
