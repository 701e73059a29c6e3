//! Text-model workflows: scene rewrites and script drafting.

use crate::SharedWorkspace;
use hokusai_core::{DraftRequest, SCENE_DURATION_SECS, SceneKey};
use hokusai_error::{HokusaiResult, ScriptError, ScriptErrorKind};
use hokusai_interface::TextService;
use hokusai_rate_limit::{RequestLimiter, RetryPolicy, with_backoff};
use hokusai_script::drafting::{
    DraftContext, breakdown_request, episode_request, idea_request, next_beat_request,
};
use hokusai_script::{AliasTable, ReferenceResolver, segment, toggle_no_music};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Rewrites scenes and drafts scripts with a text model.
#[derive(Clone)]
pub struct ScriptAssistant {
    workspace: SharedWorkspace,
    text: Arc<dyn TextService>,
    aliases: Arc<AliasTable>,
    retry: RetryPolicy,
    limiter: RequestLimiter,
}

impl std::fmt::Debug for ScriptAssistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptAssistant")
            .field("model", &self.text.model_name())
            .field("retry", &self.retry)
            .finish()
    }
}

impl ScriptAssistant {
    /// Create an assistant with the default retry policy and no pacing.
    pub fn new(workspace: SharedWorkspace, text: Arc<dyn TextService>) -> Self {
        Self {
            workspace,
            text,
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

    /// Pace text calls.
    pub fn with_limiter(mut self, limiter: RequestLimiter) -> Self {
        self.limiter = limiter;
        self
    }

    async fn draft(&self, request: &DraftRequest) -> HokusaiResult<String> {
        self.limiter.acquire().await;
        let text = Arc::clone(&self.text);
        with_backoff(&self.retry, "draft", || {
            let text = Arc::clone(&text);
            async move { text.draft_script(request).await }
        })
        .await
    }

    /// Rewrite one scene according to `instruction`.
    ///
    /// The scene's result is pending while the model runs. On success the
    /// content is replaced, the no-music setting re-applied and references
    /// rescanned. On failure the scene records `Refine failed: <reason>` and
    /// the error is returned.
    ///
    /// # Errors
    ///
    /// Returns `SceneNotFound` for unknown ids, or the text service error.
    #[instrument(skip(self, instruction))]
    pub async fn refine_scene(&self, scene_id: &str, instruction: &str) -> HokusaiResult<()> {
        let (key, content) = {
            let mut workspace = self.workspace.write().await;
            let key = workspace
                .storyboard
                .key_of(scene_id)
                .ok_or_else(|| {
                    ScriptError::new(ScriptErrorKind::SceneNotFound(scene_id.to_string()))
                })?;
            let content = workspace
                .storyboard
                .scene(key)
                .map(|scene| scene.content.clone())
                .unwrap_or_default();
            workspace.storyboard.begin(key);
            (key, content)
        };

        self.limiter.acquire().await;
        let text = Arc::clone(&self.text);
        let (content_ref, instruction_ref) = (content.as_str(), instruction);
        let rewritten = with_backoff(&self.retry, "refine", || {
            let text = Arc::clone(&text);
            async move { text.rewrite(content_ref, instruction_ref).await }
        })
        .await;

        let mut workspace = self.workspace.write().await;
        match rewritten {
            Ok(new_content) => {
                let new_content = toggle_no_music(&new_content, workspace.settings.no_music);
                let ids = ReferenceResolver::new(&workspace.catalog, &self.aliases)
                    .resolve(&new_content);
                workspace.storyboard.update_content(key, new_content);
                workspace.storyboard.set_referenced_ids(key, ids);
                workspace.storyboard.settle(key);
                info!("Scene refined");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Refine failed");
                workspace
                    .storyboard
                    .fail(key, format!("Refine failed: {}", e.user_message()));
                Err(e)
            }
        }
    }

    /// Draft the sequence after the last scene and append it.
    ///
    /// With an empty storyboard the model writes a cold open. Returns the keys
    /// of the appended scenes, empty if the model produced nothing usable.
    ///
    /// # Errors
    ///
    /// Returns the text service error.
    #[instrument(skip(self))]
    pub async fn next_beat(&self) -> HokusaiResult<Vec<SceneKey>> {
        let request = {
            let workspace = self.workspace.read().await;
            let previous = workspace
                .storyboard
                .last()
                .map(|scene| (scene.ordinal().unwrap_or(0), scene.content.as_str()));
            next_beat_request(&self.context(&workspace), previous)?
        };

        let drafted = self.draft(&request).await?;
        if drafted.trim().is_empty() {
            warn!("Text service returned an empty beat");
            return Ok(Vec::new());
        }

        let mut workspace = self.workspace.write().await;
        let start_ordinal = workspace
            .storyboard
            .last()
            .and_then(|scene| scene.ordinal())
            .unwrap_or(0);
        let start_time = workspace.storyboard.len() as u32 * SCENE_DURATION_SECS;
        let mut scenes = segment(
            &drafted,
            &workspace.catalog,
            &self.aliases,
            start_ordinal,
            start_time,
        );
        if scenes.is_empty() {
            warn!("Drafted beat contained no scenes");
            return Ok(Vec::new());
        }
        let no_music = workspace.settings.no_music;
        for scene in &mut scenes {
            scene.content = toggle_no_music(&scene.content, no_music);
        }
        let keys = workspace.storyboard.append(scenes);
        info!(count = keys.len(), "Appended next beat");
        Ok(keys)
    }

    /// Draft a script from a one-line idea.
    ///
    /// # Errors
    ///
    /// Returns `EmptyDraft` if the model returns nothing, or the text service error.
    #[instrument(skip(self, idea))]
    pub async fn draft_from_idea(&self, idea: &str) -> HokusaiResult<String> {
        let request = {
            let workspace = self.workspace.read().await;
            idea_request(&self.context(&workspace), idea)?
        };
        non_empty(self.draft(&request).await?)
    }

    /// Restructure a raw script into storyboard sequences.
    ///
    /// An empty model response falls back to the original script.
    ///
    /// # Errors
    ///
    /// Returns the text service error.
    #[instrument(skip(self, script), fields(chars = script.len()))]
    pub async fn break_down_script(&self, script: &str) -> HokusaiResult<String> {
        let request = {
            let workspace = self.workspace.read().await;
            breakdown_request(&self.context(&workspace), script)?
        };
        let drafted = self.draft(&request).await?;
        if drafted.trim().is_empty() {
            warn!("Empty breakdown, keeping original script");
            return Ok(script.to_string());
        }
        Ok(drafted)
    }

    /// Draft a full episode of `scene_count` sequences.
    ///
    /// # Errors
    ///
    /// Returns `EmptyDraft` if the model returns nothing, or the text service error.
    #[instrument(skip(self, idea))]
    pub async fn draft_episode(&self, idea: &str, scene_count: usize) -> HokusaiResult<String> {
        let request = {
            let workspace = self.workspace.read().await;
            episode_request(&self.context(&workspace), idea, scene_count)?
        };
        non_empty(self.draft(&request).await?)
    }

    fn context<'a>(&self, workspace: &'a crate::Workspace) -> DraftContext<'a> {
        DraftContext {
            lore: &workspace.lore,
            catalog: &workspace.catalog,
            voice_tags: workspace.settings.voice_tags,
            style: workspace.settings.style,
        }
    }
}

#[track_caller]
fn non_empty(text: String) -> HokusaiResult<String> {
    if text.trim().is_empty() {
        return Err(ScriptError::new(ScriptErrorKind::EmptyDraft).into());
    }
    Ok(text)
}
