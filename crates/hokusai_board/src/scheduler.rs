//! Single-scene generation.

use crate::SharedWorkspace;
use hokusai_core::{GenerationResult, RenderRequest, SceneKey};
use hokusai_error::{FailureClass, RetryableError};
use hokusai_interface::ImageRenderer;
use hokusai_rate_limit::{RequestLimiter, RetryPolicy, with_backoff};
use hokusai_script::AliasTable;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Message stored on a scene whose render was throttled.
pub const RATE_LIMITED_MESSAGE: &str = "Service busy or rate limited. Waiting...";

/// What happened to one generation attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationOutcome {
    /// An image was stored
    pub success: bool,
    /// The failure was a rate limit or overload
    pub is_rate_limited: bool,
}

impl GenerationOutcome {
    fn succeeded() -> Self {
        Self {
            success: true,
            is_rate_limited: false,
        }
    }

    fn failed(class: FailureClass) -> Self {
        Self {
            success: false,
            is_rate_limited: class == FailureClass::RateLimited,
        }
    }
}

/// Renders scenes and records the results on the shared storyboard.
///
/// Each attempt resolves the scene's references, compiles and sanitizes the
/// prompt, attaches every reference image and calls the renderer through
/// [`with_backoff`]. The workspace lock is released before the render call.
#[derive(Clone)]
pub struct GenerationScheduler {
    workspace: SharedWorkspace,
    renderer: Arc<dyn ImageRenderer>,
    aliases: Arc<AliasTable>,
    retry: RetryPolicy,
    limiter: RequestLimiter,
}

impl std::fmt::Debug for GenerationScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationScheduler")
            .field("provider", &self.renderer.provider_name())
            .field("model", &self.renderer.model_name())
            .field("retry", &self.retry)
            .field("limiter", &self.limiter)
            .finish()
    }
}

impl GenerationScheduler {
    /// Create a scheduler with the default retry policy and no pacing.
    pub fn new(workspace: SharedWorkspace, renderer: Arc<dyn ImageRenderer>) -> Self {
        Self {
            workspace,
            renderer,
            aliases: Arc::new(AliasTable::builtin()),
            retry: RetryPolicy::default(),
            limiter: RequestLimiter::unlimited(),
        }
    }

    /// Use a different alias table.
    pub fn with_aliases(mut self, aliases: Arc<AliasTable>) -> Self {
        self.aliases = aliases;
        self
    }

    /// Use a different retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Pace render calls.
    pub fn with_limiter(mut self, limiter: RequestLimiter) -> Self {
        self.limiter = limiter;
        self
    }

    /// The shared workspace.
    pub fn workspace(&self) -> &SharedWorkspace {
        &self.workspace
    }

    /// Generate the scene currently labelled `scene_id`.
    ///
    /// Unknown ids fail without touching any state.
    pub async fn generate_one(&self, scene_id: &str) -> GenerationOutcome {
        let key = self.workspace.read().await.storyboard.key_of(scene_id);
        match key {
            Some(key) => self.generate(key).await,
            None => {
                warn!(scene_id, "No scene with this id");
                GenerationOutcome::default()
            }
        }
    }

    /// Generate the scene with a stable key.
    #[instrument(skip(self), fields(provider = self.renderer.provider_name()))]
    pub async fn generate(&self, key: SceneKey) -> GenerationOutcome {
        let Some(request) = self.prepare(key).await else {
            warn!("Scene no longer exists");
            return GenerationOutcome::default();
        };

        self.limiter.acquire().await;
        let renderer = Arc::clone(&self.renderer);
        let request = &request;
        let rendered = with_backoff(&self.retry, "render", || {
            let renderer = Arc::clone(&renderer);
            async move { renderer.render(request).await }
        })
        .await;

        let mut workspace = self.workspace.write().await;
        match rendered {
            Ok(image) => {
                if workspace
                    .storyboard
                    .set_result(key, GenerationResult::succeeded(image))
                {
                    info!("Scene rendered");
                }
                GenerationOutcome::succeeded()
            }
            Err(e) => {
                let class = e.failure_class();
                let message = if class == FailureClass::RateLimited {
                    RATE_LIMITED_MESSAGE.to_string()
                } else {
                    e.user_message()
                };
                warn!(%class, error = %e, "Render failed");
                workspace.storyboard.fail(key, message);
                GenerationOutcome::failed(class)
            }
        }
    }

    /// Mark the scene pending and build its render request.
    async fn prepare(&self, key: SceneKey) -> Option<RenderRequest> {
        let mut workspace = self.workspace.write().await;
        let (ids, request) = workspace.render_request(key, &self.aliases)?;
        debug!(references = request.references.len(), ?ids, "Prepared render request");

        workspace.storyboard.set_referenced_ids(key, ids);
        workspace.storyboard.begin(key);
        Some(request)
    }
}
