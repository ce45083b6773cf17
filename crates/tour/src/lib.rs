//! # Tourgen Tour
//!
//! Turns a [`ProjectStructure`](tourgen_analyzer::ProjectStructure) into an
//! ordered, validated list of tour steps.
//!
//! ## Pipeline
//!
//! ```text
//! ProjectStructure ──┬──> WelcomeSynthesizer (README + manifest + digest)
//!                    │        └─> 1 step (fallback if the service fails)
//!                    │
//!                    └──> BatchOrchestrator
//!                             ├─> batches of `batch_size` files
//!                             ├─> groups of `concurrency` requests, each with a timeout
//!                             └─> steps in prioritization order (failed batch = no steps)
//!
//! [welcome] + [batch steps] ──> validate ──> Tour (.tours/<slug>.tour)
//! ```
//!
//! Service output is untrusted: steps are extracted from the first JSON
//! array in the text and reconciled against the analyzed file set before
//! they leave the crate.

mod artifact;
mod cancel;
mod context;
mod digest;
mod error;
mod generator;
mod orchestrator;
mod progress;
mod readme;
mod step;
mod validator;
mod welcome;
mod wire;

pub use artifact::{slugify, write_tour, Tour, CODETOUR_SCHEMA, TOURS_DIR};
pub use cancel::CancellationFlag;
pub use context::{manifest_description_from, ProjectContext, ReadmeDocument, README_CANDIDATES};
pub use digest::{digest_files, project_summary};
pub use error::{Result, TourError};
pub use generator::{GeneratorOptions, TourGenerator, TourReport};
pub use orchestrator::{
    importance_score, select_files, Batch, BatchOrchestrator, BatchOutcome, OrchestratorConfig,
    BATCH_SYSTEM_PROMPT,
};
pub use progress::{LogProgress, NoopProgress, ProgressEvent, ProgressSink};
pub use readme::{clean_readme, MAX_README_CHARS};
pub use step::{GeneratedTourStep, Position, Selection, TourStep};
pub use validator::{validate, ValidationOptions};
pub use welcome::{WelcomeSynthesizer, WELCOME_MARKER, WELCOME_SYSTEM_PROMPT};
pub use wire::{extract_json_array, parse_steps};
