use crate::artifact::Tour;
use crate::cancel::CancellationFlag;
use crate::context::ProjectContext;
use crate::error::Result;
use crate::orchestrator::{BatchOrchestrator, OrchestratorConfig};
use crate::progress::{ProgressEvent, ProgressSink};
use crate::validator::{validate, ValidationOptions};
use crate::welcome::WelcomeSynthesizer;
use std::sync::Arc;
use tourgen_analyzer::{GrammarRegistry, StructuralAnalyzer};
use tourgen_generation::{GenerationConfig, GenerationService, OpenAiClient};
use tourgen_workspace::{build_structure, discover, DiscoveryOptions, WorkspaceFiles};

/// Settings of one generation run
#[derive(Debug, Clone, Default)]
pub struct GeneratorOptions {
    /// Tour title; defaults to "<workspace> Tour"
    pub title: Option<String>,
    /// Model override for every request
    pub model: Option<String>,
    pub discovery: DiscoveryOptions,
    pub orchestrator: OrchestratorConfig,
    pub validation: ValidationOptions,
}

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct TourReport {
    pub tour: Tour,
    pub files_analyzed: usize,
    pub total_batches: usize,
    pub failed_batches: usize,
}

impl TourReport {
    pub fn step_count(&self) -> usize {
        self.tour.steps.len()
    }
}

/// End-to-end pipeline: discovery, analysis, welcome + batches, validation
pub struct TourGenerator {
    workspace: Arc<dyn WorkspaceFiles>,
    service: Arc<dyn GenerationService>,
    grammars: GrammarRegistry,
    options: GeneratorOptions,
}

impl TourGenerator {
    pub fn new(
        workspace: Arc<dyn WorkspaceFiles>,
        service: Arc<dyn GenerationService>,
        options: GeneratorOptions,
    ) -> Self {
        Self {
            workspace,
            service,
            grammars: GrammarRegistry::with_defaults(),
            options,
        }
    }

    /// Build with an [`OpenAiClient`]; a missing credential aborts here
    pub fn from_config(
        workspace: Arc<dyn WorkspaceFiles>,
        config: GenerationConfig,
        options: GeneratorOptions,
    ) -> Result<Self> {
        let client = OpenAiClient::from_config(config)?;
        Ok(Self::new(workspace, Arc::new(client), options))
    }

    #[must_use]
    pub fn with_grammars(mut self, grammars: GrammarRegistry) -> Self {
        self.grammars = grammars;
        self
    }

    pub fn workspace(&self) -> &Arc<dyn WorkspaceFiles> {
        &self.workspace
    }

    /// Run the pipeline.
    ///
    /// Only cancellation and workspace enumeration errors end the run early;
    /// batch and welcome failures are absorbed.
    pub async fn run(
        &self,
        cancel: &CancellationFlag,
        progress: &dyn ProgressSink,
    ) -> Result<TourReport> {
        cancel.checkpoint()?;

        progress.report(ProgressEvent::Discovering);
        let workspace = self.workspace.as_ref();
        let files = discover(workspace, &self.options.discovery).await?;
        cancel.checkpoint()?;

        let analyzer = StructuralAnalyzer::new(&self.grammars);
        let structure = build_structure(workspace, &analyzer, &files).await;
        progress.report(ProgressEvent::Analyzed {
            files: structure.files.len(),
        });

        let context = ProjectContext::gather(workspace).await;
        let orchestrator =
            BatchOrchestrator::new(Arc::clone(&self.service), self.options.orchestrator.clone())
                .with_model(self.options.model.clone());
        let batches = orchestrator.plan(&structure);
        cancel.checkpoint()?;

        progress.report(ProgressEvent::Welcome);
        let welcome = WelcomeSynthesizer::new(Some(Arc::clone(&self.service)))
            .with_model(self.options.model.clone())
            .with_timeout(self.options.orchestrator.batch_timeout());
        // awaited before the groups so the service never sees more than
        // `concurrency` requests at once
        let welcome_step = welcome.synthesize(&structure, &context).await;
        let outcome = orchestrator
            .generate(batches, &context.display_name, cancel, progress)
            .await;

        progress.report(ProgressEvent::Validating);
        let mut steps = Vec::with_capacity(outcome.steps.len() + 1);
        steps.push(welcome_step);
        steps.extend(outcome.steps);
        let steps = validate(steps, &structure, &self.options.validation);

        cancel.checkpoint()?;

        let title = self
            .options
            .title
            .clone()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| format!("{} Tour", context.display_name));
        let description = context
            .manifest_description
            .clone()
            .unwrap_or_else(|| format!("A guided tour of {}", context.display_name));

        log::info!(
            "Tour {title:?}: {} steps, {}/{} batches failed",
            steps.len(),
            outcome.failed_batches,
            outcome.total_batches
        );

        Ok(TourReport {
            tour: Tour::new(title, description, steps),
            files_analyzed: structure.files.len(),
            total_batches: outcome.total_batches,
            failed_batches: outcome.failed_batches,
        })
    }
}

impl std::fmt::Debug for TourGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TourGenerator")
            .field("root", &self.workspace.root())
            .field("grammars", &self.grammars)
            .field("options", &self.options)
            .finish()
    }
}
