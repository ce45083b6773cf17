#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tourgen_analyzer::{CodeElement, ElementKind, FileAnalysis, ProjectStructure};
use tourgen_generation::{GenerationError, GenerationRequest, GenerationResponse, GenerationService};
use tourgen_tour::{ProgressEvent, ProgressSink};

/// What the scripted service does for one request
pub enum Reply {
    Text(String),
    Fail(GenerationError),
    Hang,
    Delayed(Duration, String),
}

type Handler = Box<dyn Fn(&GenerationRequest) -> Reply + Send + Sync>;

/// In-process generation service driven by a closure
pub struct ScriptedService {
    handler: Handler,
    pub calls: AtomicUsize,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedService {
    pub fn new(handler: impl Fn(&GenerationRequest) -> Reply + Send + Sync + 'static) -> Self {
        Self {
            handler: Box::new(handler),
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl GenerationService for ScriptedService {
    async fn complete(
        &self,
        request: GenerationRequest,
    ) -> tourgen_generation::Result<GenerationResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = (self.handler)(&request);
        self.requests.lock().unwrap().push(request);

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let result = match reply {
            Reply::Text(text) => Ok(GenerationResponse::text(text)),
            Reply::Fail(e) => Err(e),
            Reply::Hang => std::future::pending().await,
            Reply::Delayed(delay, text) => {
                tokio::time::sleep(delay).await;
                Ok(GenerationResponse::text(text))
            }
        };
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

/// Records every progress event
#[derive(Default)]
pub struct RecordingProgress {
    pub events: Mutex<Vec<ProgressEvent>>,
}

impl ProgressSink for RecordingProgress {
    fn report(&self, event: ProgressEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Structure with one function per file, no entry points
pub fn flat_structure(files: &[&str]) -> ProjectStructure {
    ProjectStructure {
        files: files
            .iter()
            .map(|file| {
                let mut analysis = FileAnalysis::empty(*file, "typescript");
                analysis.line_count = 10;
                analysis.elements = vec![CodeElement::new(ElementKind::Function, "run", *file, 2, 5)];
                analysis
            })
            .collect(),
        ..Default::default()
    }
}

/// One step pointing at `file`, as the service would answer
pub fn step_json(file: &str) -> String {
    format!(r#"Here you go: [{{"title": "About {file}", "file": "{file}", "line": 2, "description": "d"}}]"#)
}

/// The batch file named in a request's user message
pub fn requested_file<'a>(request: &GenerationRequest, files: &[&'a str]) -> Option<&'a str> {
    let user = &request.messages.last()?.content;
    files.iter().copied().find(|file| user.contains(&format!("\"{file}\"")))
}
