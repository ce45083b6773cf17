use crate::cancel::CancellationFlag;
use crate::digest::digest_files;
use crate::progress::{ProgressEvent, ProgressSink};
use crate::step::GeneratedTourStep;
use crate::wire::parse_steps;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tourgen_analyzer::{FileAnalysis, ProjectStructure};
use tourgen_generation::{GenerationError, GenerationRequest, GenerationService};
use tourgen_workspace::is_noise_path;

const MAX_CONCURRENCY: usize = 16;
const MAX_BATCH_SIZE: usize = 32;

const SOURCE_DIRS: &[&str] = &["src", "lib", "app", "core", "source", "pkg"];
const TEST_HINTS: &[&str] = &["test", "spec", "__tests__", "__mocks__", "fixture"];

pub const BATCH_SYSTEM_PROMPT: &str = "\
You are writing a guided tour of a codebase for a developer who is new to it.
You receive a JSON digest of a few source files: their classes, functions, methods,
imports and exports, with 1-based line numbers.

Respond with ONLY a JSON array. Each element is an object:
{\"title\": string, \"file\": string, \"line\": number, \"description\": string}

Rules:
- Use only file paths that appear in the digest, exactly as written.
- Point `line` at the element you describe, using the digest's line numbers.
- Write one to three steps per file, for its most important elements.
- Descriptions are Markdown, two to four sentences: what the code does and how it
  fits into the rest of the project.
- Do not write a welcome or introduction step.";

/// Batch orchestration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Files per request
    pub batch_size: usize,

    /// Requests in flight per group
    pub concurrency: usize,

    /// Deadline for a single request
    pub batch_timeout_secs: u64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            batch_size: 4,
            concurrency: 3,
            batch_timeout_secs: 60,
        }
    }
}

impl OrchestratorConfig {
    pub fn batch_timeout(&self) -> Duration {
        Duration::from_secs(self.batch_timeout_secs)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.batch_size == 0 || self.batch_size > MAX_BATCH_SIZE {
            return Err(format!(
                "batch_size must be between 1 and {MAX_BATCH_SIZE} (got {})",
                self.batch_size
            ));
        }
        if self.concurrency == 0 || self.concurrency > MAX_CONCURRENCY {
            return Err(format!(
                "concurrency must be between 1 and {MAX_CONCURRENCY} (got {})",
                self.concurrency
            ));
        }
        if self.batch_timeout_secs == 0 {
            return Err("batch_timeout_secs must be > 0".to_string());
        }
        Ok(())
    }
}

/// Files sent together in one request, with their digest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    pub files: Vec<String>,
    pub digest: String,
}

/// Merged result of every batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Steps in prioritization order
    pub steps: Vec<GeneratedTourStep>,
    pub total_batches: usize,
    /// Batches that failed or timed out (their steps are empty)
    pub failed_batches: usize,
}

/// Importance of an analyzed file within the tour
pub fn importance_score(analysis: &FileAnalysis, structure: &ProjectStructure) -> i64 {
    let lowered = analysis.file.to_lowercase();
    let mut score = 0i64;

    if structure.is_entry_point(&analysis.file) {
        score += 100;
    }
    let in_source_dir = Path::new(&lowered)
        .parent()
        .into_iter()
        .flat_map(Path::components)
        .any(|c| SOURCE_DIRS.iter().any(|dir| c.as_os_str() == *dir));
    if in_source_dir {
        score += 20;
    }
    score += 2 * analysis.element_count().min(30) as i64;
    if TEST_HINTS.iter().any(|hint| lowered.contains(hint)) {
        score -= 50;
    }
    score
}

/// Files worth touring, most important first (stable)
pub fn select_files(structure: &ProjectStructure) -> Vec<String> {
    let mut ranked: Vec<(&FileAnalysis, i64)> = structure
        .files
        .iter()
        .filter(|analysis| !analysis.is_empty() && !is_noise_path(&analysis.file))
        .map(|analysis| (analysis, importance_score(analysis, structure)))
        .collect();
    ranked.sort_by_key(|(_, score)| std::cmp::Reverse(*score));
    ranked
        .into_iter()
        .map(|(analysis, _)| analysis.file.clone())
        .collect()
}

/// Runs batch requests against the generation service
pub struct BatchOrchestrator {
    service: Arc<dyn GenerationService>,
    config: OrchestratorConfig,
    model: Option<String>,
}

impl BatchOrchestrator {
    pub fn new(service: Arc<dyn GenerationService>, config: OrchestratorConfig) -> Self {
        Self {
            service,
            config,
            model: None,
        }
    }

    #[must_use]
    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Partition the selected files into batches and build their digests
    pub fn plan(&self, structure: &ProjectStructure) -> Vec<Batch> {
        let files = select_files(structure);
        files
            .chunks(self.config.batch_size.max(1))
            .map(|chunk| Batch {
                files: chunk.to_vec(),
                digest: digest_files(structure, chunk),
            })
            .collect()
    }

    fn request_for(&self, batch: &Batch, project_name: &str) -> GenerationRequest {
        let user = format!(
            "Project: {project_name}\n\nWrite tour steps for these {} files. Structural digest (JSON):\n{}",
            batch.files.len(),
            batch.digest
        );
        let request = GenerationRequest::with_system(BATCH_SYSTEM_PROMPT, user);
        match &self.model {
            Some(model) => request.model(model.clone()),
            None => request,
        }
    }

    /// Run every batch, `concurrency` at a time.
    ///
    /// A group starts only after every request of the previous group has
    /// settled. Failed or timed-out batches contribute no steps. No new group
    /// is started once `cancel` is set.
    pub async fn generate(
        &self,
        batches: Vec<Batch>,
        project_name: &str,
        cancel: &CancellationFlag,
        progress: &dyn ProgressSink,
    ) -> BatchOutcome {
        let concurrency = self.config.concurrency.max(1);
        let timeout = self.config.batch_timeout();
        let total_groups = batches.len().div_ceil(concurrency);
        let mut outcome = BatchOutcome {
            total_batches: batches.len(),
            ..Default::default()
        };

        for (index, group) in batches.chunks(concurrency).enumerate() {
            if cancel.is_cancelled() {
                log::info!("Cancelled before batch group {}", index + 1);
                break;
            }
            progress.report(ProgressEvent::BatchGroup {
                index: index + 1,
                total: total_groups,
            });

            let handles: Vec<JoinHandle<Result<Vec<GeneratedTourStep>, GenerationError>>> = group
                .iter()
                .map(|batch| {
                    let service = Arc::clone(&self.service);
                    let request = self.request_for(batch, project_name);
                    tokio::spawn(async move {
                        match tokio::time::timeout(timeout, service.complete(request)).await {
                            Ok(Ok(response)) => Ok(parse_steps(&response.text)),
                            Ok(Err(e)) => Err(e),
                            Err(_) => Err(GenerationError::Timeout(timeout.as_secs())),
                        }
                    })
                })
                .collect();

            for (batch, handle) in group.iter().zip(handles) {
                match handle.await {
                    Ok(Ok(steps)) => {
                        log::debug!("Batch {:?} produced {} steps", batch.files, steps.len());
                        outcome.steps.extend(steps);
                    }
                    Ok(Err(e)) => {
                        log::warn!(
                            "Batch {:?} failed: {} ({e})",
                            batch.files,
                            e.user_message()
                        );
                        outcome.failed_batches += 1;
                    }
                    Err(e) => {
                        log::warn!("Batch {:?} task aborted: {e}", batch.files);
                        outcome.failed_batches += 1;
                    }
                }
            }
        }

        log::info!(
            "Generated {} steps from {} batches ({} failed)",
            outcome.steps.len(),
            outcome.total_batches,
            outcome.failed_batches
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tourgen_analyzer::{CodeElement, ElementKind};

    fn analysis(file: &str, elements: usize) -> FileAnalysis {
        let mut analysis = FileAnalysis::empty(file, "typescript");
        analysis.elements = (0..elements)
            .map(|i| CodeElement::new(ElementKind::Function, format!("f{i}"), file, i + 1, i + 1))
            .collect();
        analysis
    }

    fn structure(files: Vec<FileAnalysis>) -> ProjectStructure {
        let entry_points = files
            .iter()
            .filter(|a| tourgen_workspace::is_entry_point(&a.file))
            .map(|a| a.file.clone())
            .collect();
        ProjectStructure {
            files,
            entry_points,
            ..Default::default()
        }
    }

    #[test]
    fn config_validation() {
        assert!(OrchestratorConfig::default().validate().is_ok());
        let zero = OrchestratorConfig {
            concurrency: 0,
            ..Default::default()
        };
        assert!(zero.validate().is_err());
        let no_timeout = OrchestratorConfig {
            batch_timeout_secs: 0,
            ..Default::default()
        };
        assert!(no_timeout.validate().is_err());
    }

    #[test]
    fn importance_ordering() {
        let s = structure(vec![
            analysis("scripts/tool.ts", 1),
            analysis("src/big.ts", 10),
            analysis("src/index.ts", 1),
            analysis("src/widget.test-utils.ts", 10),
        ]);
        let entry = importance_score(s.file("src/index.ts").unwrap(), &s);
        assert_eq!(entry, 100 + 20 + 2);
        assert_eq!(importance_score(s.file("src/big.ts").unwrap(), &s), 20 + 20);
        assert_eq!(importance_score(s.file("scripts/tool.ts").unwrap(), &s), 2);
        assert_eq!(
            select_files(&s),
            vec![
                "src/index.ts",
                "src/big.ts",
                "scripts/tool.ts",
                "src/widget.test-utils.ts"
            ]
        );
    }

    #[test]
    fn empty_and_noisy_files_are_not_batched() {
        let s = structure(vec![
            analysis("src/a.ts", 1),
            analysis("src/empty.ts", 0),
            analysis("src/a.spec.ts", 3),
            analysis("dist/bundle.js", 3),
            analysis("tests/test_models.py", 3),
            analysis("pkg/api_test.go", 3),
            analysis("proto/user_pb2.py", 3),
        ]);
        assert_eq!(select_files(&s), vec!["src/a.ts"]);
    }

    #[test]
    fn plan_chunks_by_batch_size() {
        struct Never;
        #[async_trait::async_trait]
        impl GenerationService for Never {
            async fn complete(
                &self,
                _request: GenerationRequest,
            ) -> tourgen_generation::Result<tourgen_generation::GenerationResponse> {
                Err(GenerationError::Other("unused".into()))
            }
        }

        let files = (0..9).map(|i| analysis(&format!("src/f{i}.ts"), 1)).collect();
        let s = structure(files);
        let orchestrator = BatchOrchestrator::new(Arc::new(Never), OrchestratorConfig::default());
        let plan = orchestrator.plan(&s);
        let sizes: Vec<usize> = plan.iter().map(|b| b.files.len()).collect();
        assert_eq!(sizes, vec![4, 4, 1]);
        assert!(plan[2].digest.contains("src/f8.ts"));
        assert!(!plan[2].digest.contains("src/f0.ts"));
    }
}
