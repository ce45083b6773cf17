use crate::context::ProjectContext;
use crate::digest::{digest_files, project_summary};
use crate::step::GeneratedTourStep;
use crate::wire::parse_steps;
use std::sync::Arc;
use std::time::Duration;
use tourgen_analyzer::ProjectStructure;
use tourgen_generation::{GenerationError, GenerationRequest, GenerationService};

/// Title marker that identifies the welcome step
pub const WELCOME_MARKER: &str = "Welcome";

/// File name the service tends to invent when it has nothing better
const GENERIC_WELCOME_FILE: &str = "README.md";
const FALLBACK_README_LINES: usize = 40;
const MAX_ENTRY_DIGESTS: usize = 3;

pub const WELCOME_SYSTEM_PROMPT: &str = "\
You are writing the first step of a guided tour of a codebase: the welcome.
You receive the project's README (cleaned), its declared purpose and a summary
of its structure.

Respond with ONLY a JSON array containing exactly one object:
[{\"title\": string, \"file\": string, \"line\": number, \"description\": string}]

Rules:
- The title starts with \"Welcome\".
- Use the requested file and line 1.
- The description is Markdown: what the project is for, how it is organized and
  where the tour will go next. Keep it under 200 words.";

/// Produces the mandatory first step of every tour.
///
/// Never fails: without a service, or when the service errors or answers
/// with something unusable, a deterministic step is built from the README
/// and structure.
pub struct WelcomeSynthesizer {
    service: Option<Arc<dyn GenerationService>>,
    model: Option<String>,
    timeout: Duration,
}

impl WelcomeSynthesizer {
    pub fn new(service: Option<Arc<dyn GenerationService>>) -> Self {
        Self {
            service,
            model: None,
            timeout: Duration::from_secs(60),
        }
    }

    #[must_use]
    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// README if one was found, else the first analyzed file
    pub fn welcome_file(structure: &ProjectStructure, context: &ProjectContext) -> String {
        context
            .readme
            .as_ref()
            .map(|readme| readme.file.clone())
            .or_else(|| structure.files.first().map(|f| f.file.clone()))
            .unwrap_or_default()
    }

    pub async fn synthesize(
        &self,
        structure: &ProjectStructure,
        context: &ProjectContext,
    ) -> GeneratedTourStep {
        let Some(service) = &self.service else {
            return Self::fallback(structure, context);
        };
        let welcome_file = Self::welcome_file(structure, context);
        let request = self.request(structure, context, &welcome_file);

        let response = match tokio::time::timeout(self.timeout, service.complete(request)).await {
            Ok(result) => result,
            Err(_) => Err(GenerationError::Timeout(self.timeout.as_secs())),
        };

        let step = match response {
            Ok(response) => parse_steps(&response.text).into_iter().next(),
            Err(e) => {
                log::warn!("Welcome generation failed: {} ({e})", e.user_message());
                None
            }
        };

        match step {
            Some(step) => Self::finalize(step, &welcome_file, structure, context),
            None => {
                log::info!("Using fallback welcome step");
                Self::fallback(structure, context)
            }
        }
    }

    fn request(
        &self,
        structure: &ProjectStructure,
        context: &ProjectContext,
        welcome_file: &str,
    ) -> GenerationRequest {
        let mut user = format!("Project: {}\n", context.display_name);
        if let Some(purpose) = &context.manifest_description {
            user.push_str(&format!("Purpose: {purpose}\n"));
        }
        user.push_str(&format!("Structure: {}\n", project_summary(structure)));

        let entries: Vec<String> = structure
            .entry_points
            .iter()
            .take(MAX_ENTRY_DIGESTS)
            .cloned()
            .collect();
        if !entries.is_empty() {
            user.push_str(&format!(
                "Entry points (JSON digest): {}\n",
                digest_files(structure, &entries)
            ));
        }
        match &context.readme {
            Some(readme) => {
                user.push_str(&format!("\nREADME ({}):\n{}\n", readme.file, readme.cleaned));
            }
            None => user.push_str("\nThe project has no README.\n"),
        }
        user.push_str(&format!("\nRequested file: {welcome_file}"));

        let request = GenerationRequest::with_system(WELCOME_SYSTEM_PROMPT, user);
        match &self.model {
            Some(model) => request.model(model.clone()),
            None => request,
        }
    }

    /// Repair a service-produced step so it is a usable welcome
    fn finalize(
        mut step: GeneratedTourStep,
        welcome_file: &str,
        structure: &ProjectStructure,
        context: &ProjectContext,
    ) -> GeneratedTourStep {
        let file = step.file.trim();
        if file.is_empty() || file == GENERIC_WELCOME_FILE {
            step.file = welcome_file.to_string();
        }

        let title = step.title.trim();
        step.title = if title.is_empty() {
            format!("{WELCOME_MARKER} to {}", context.display_name)
        } else if !title.contains(WELCOME_MARKER) {
            format!("{WELCOME_MARKER}: {title}")
        } else {
            title.to_string()
        };

        if step.description.trim().is_empty() {
            step.description = Self::fallback_description(structure, context);
        }
        if !matches!(step.line, Some(line) if line >= 1) {
            step.line = Some(1);
        }
        step
    }

    /// Deterministic welcome step built without the service
    pub fn fallback(structure: &ProjectStructure, context: &ProjectContext) -> GeneratedTourStep {
        GeneratedTourStep::new(
            format!("{WELCOME_MARKER} to {}", context.display_name),
            Self::welcome_file(structure, context),
            Some(1),
        )
        .with_description(Self::fallback_description(structure, context))
    }

    fn fallback_description(structure: &ProjectStructure, context: &ProjectContext) -> String {
        let mut sections = vec![format!("# {}", context.display_name)];
        if let Some(purpose) = &context.manifest_description {
            sections.push(purpose.clone());
        }
        match context.readme.as_ref().filter(|r| !r.cleaned.is_empty()) {
            Some(readme) => sections.push(
                readme
                    .cleaned
                    .lines()
                    .take(FALLBACK_README_LINES)
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            None => sections.push(format!("This project has {}", project_summary(structure))),
        }
        sections.join("\n\n")
    }
}
