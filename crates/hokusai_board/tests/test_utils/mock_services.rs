//! Mock generation services for testing.

use async_trait::async_trait;
use hokusai_board::{ImportMode, Workspace};
use hokusai_core::{DraftRequest, ImageData, ReferenceCatalog, ReferenceEntry, RenderRequest};
use hokusai_error::{GenerationError, GenerationErrorKind, HokusaiResult};
use hokusai_interface::{ImageRenderer, TextService};
use hokusai_script::AliasTable;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

type RenderFn = dyn Fn(&RenderRequest) -> HokusaiResult<ImageData> + Send + Sync;

/// A one-pixel stand-in image.
pub fn png() -> ImageData {
    ImageData::new(vec![0x89, 0x50, 0x4e, 0x47], "image/png")
}

/// Renderer whose behavior is a closure over the request.
///
/// Every request is recorded so tests can assert which scenes were attempted.
#[derive(Clone)]
pub struct MockRenderer {
    respond: Arc<RenderFn>,
    calls: Arc<Mutex<Vec<RenderRequest>>>,
}

impl MockRenderer {
    /// Renderer that answers with `respond`.
    pub fn new(
        respond: impl Fn(&RenderRequest) -> HokusaiResult<ImageData> + Send + Sync + 'static,
    ) -> Self {
        Self {
            respond: Arc::new(respond),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Renderer that always succeeds.
    pub fn always_ok() -> Self {
        Self::new(|_| Ok(png()))
    }

    /// Renderer that always fails with `kind`.
    pub fn always_err(kind: GenerationErrorKind) -> Self {
        Self::new(move |_| Err(GenerationError::new(kind.clone()).into()))
    }

    /// Every request received, in order.
    pub fn calls(&self) -> Vec<RenderRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of requests whose prompt contains `needle`.
    pub fn calls_mentioning(&self, needle: &str) -> usize {
        self.calls()
            .iter()
            .filter(|request| request.prompt.contains(needle))
            .count()
    }
}

#[async_trait]
impl ImageRenderer for MockRenderer {
    async fn render(&self, request: &RenderRequest) -> HokusaiResult<ImageData> {
        self.calls.lock().unwrap().push(request.clone());
        (self.respond)(request)
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-image"
    }
}

/// Text service answering from a queue of canned responses.
#[derive(Clone, Default)]
pub struct MockTextService {
    responses: Arc<Mutex<VecDeque<HokusaiResult<String>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockTextService {
    /// Service that returns `responses` in order, then empty strings.
    pub fn with_responses(responses: Vec<HokusaiResult<String>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Prompts received, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    fn next(&self, prompt: String) -> HokusaiResult<String> {
        self.prompts.lock().unwrap().push(prompt);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(String::new()))
    }
}

#[async_trait]
impl TextService for MockTextService {
    async fn rewrite(&self, text: &str, instruction: &str) -> HokusaiResult<String> {
        self.next(format!("{text} | {instruction}"))
    }

    async fn draft_script(&self, request: &DraftRequest) -> HokusaiResult<String> {
        self.next(request.prompt().clone())
    }

    fn model_name(&self) -> &str {
        "mock-text"
    }
}

/// Workspace with two characters and the given scenes imported.
pub fn fixture_workspace(script: &str) -> Workspace {
    let mut catalog = ReferenceCatalog::new();
    catalog
        .add(ReferenceEntry::character("auraayo", "Ayo", "Young man with red skin").with_image(png()))
        .unwrap();
    catalog
        .add(ReferenceEntry::character("rayneaura", "Rayne", "Silver hair"))
        .unwrap();
    let mut workspace = Workspace {
        catalog,
        ..Workspace::default()
    };
    workspace.import_script(script, ImportMode::Replace, &AliasTable::builtin());
    workspace
}
