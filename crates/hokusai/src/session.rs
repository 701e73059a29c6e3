//! A loaded project plus the configuration and store it came from.

use hokusai_board::{GenerationScheduler, ScriptAssistant, SharedWorkspace, Workspace};
use hokusai_core::{Project, StoryboardSettings};
use hokusai_error::HokusaiResult;
use hokusai_interface::{ImageRenderer, KeyValueStore, TextService};
use hokusai_rate_limit::{HokusaiConfig, RequestLimiter};
use hokusai_script::AliasTable;
use hokusai_storage::{FileSystemStore, ProjectStore, StorageKey};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// One open project.
///
/// The workspace is loaded once, shared with every scheduler and assistant
/// built from the session, and written back with [`Session::save`].
///
/// # Examples
///
/// ```no_run
/// use hokusai::{HokusaiConfig, Session};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let session = Session::open(HokusaiConfig::load()?).await?;
/// println!("{} scenes", session.workspace().read().await.storyboard.len());
/// session.save().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Session {
    config: HokusaiConfig,
    store: ProjectStore,
    workspace: SharedWorkspace,
    aliases: Arc<AliasTable>,
    limiter: RequestLimiter,
}

impl Session {
    /// Open the project in the configured storage directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created, a stored document
    /// cannot be decoded, or the alias table is invalid.
    pub async fn open(config: HokusaiConfig) -> HokusaiResult<Self> {
        let dir = config.storage.project_dir();
        debug!(dir = %dir.display(), "Opening project directory");
        let backend = FileSystemStore::new(dir)?;
        Self::with_backend(config, Arc::new(backend)).await
    }

    /// Open the project held by any key-value backend.
    ///
    /// A project without stored settings starts in the configured default style.
    ///
    /// # Errors
    ///
    /// Returns an error if a stored document cannot be decoded or the alias
    /// table is invalid.
    #[instrument(skip_all, fields(backend = backend.backend_name()))]
    pub async fn with_backend(
        config: HokusaiConfig,
        backend: Arc<dyn KeyValueStore>,
    ) -> HokusaiResult<Self> {
        let store = ProjectStore::new(backend);
        let mut project = store.load_project().await?;
        let stored_settings: Option<StoryboardSettings> = store.load(StorageKey::Settings).await?;
        if stored_settings.is_none() {
            project.settings.style = config.generation.default_style;
        }

        let aliases = if config.aliases.is_empty() {
            AliasTable::builtin()
        } else {
            AliasTable::from_map(&config.aliases)?
        };
        let limiter = RequestLimiter::new(config.generation.requests_per_minute);

        Ok(Self {
            workspace: Workspace::from_project(project).into_shared(),
            aliases: Arc::new(aliases),
            limiter,
            store,
            config,
        })
    }

    /// Loaded configuration.
    pub fn config(&self) -> &HokusaiConfig {
        &self.config
    }

    /// The shared workspace.
    pub fn workspace(&self) -> &SharedWorkspace {
        &self.workspace
    }

    /// Alias table in effect.
    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// Write the workspace back to storage.
    ///
    /// # Errors
    ///
    /// Returns the first storage error.
    pub async fn save(&self) -> HokusaiResult<()> {
        let project = self.workspace.read().await.to_project();
        self.store.save_project(&project).await
    }

    /// Wipe storage and start over from the starter project.
    ///
    /// # Errors
    ///
    /// Returns a storage error, or a decoding error for the bundled starter data.
    #[instrument(skip(self))]
    pub async fn reset(&self) -> HokusaiResult<()> {
        self.store.clear().await?;
        let mut project = Project::starter()?;
        project.settings.style = self.config.generation.default_style;
        *self.workspace.write().await = Workspace::from_project(project);
        info!("Project reset to starter content");
        Ok(())
    }

    /// Scheduler rendering through `renderer` with the configured retry and pacing.
    pub fn scheduler(&self, renderer: Arc<dyn ImageRenderer>) -> GenerationScheduler {
        GenerationScheduler::new(Arc::clone(&self.workspace), renderer)
            .with_aliases(Arc::clone(&self.aliases))
            .with_retry(self.config.retry)
            .with_limiter(self.limiter.clone())
    }

    /// Assistant drafting through `text` with the configured retry and pacing.
    pub fn assistant(&self, text: Arc<dyn TextService>) -> ScriptAssistant {
        ScriptAssistant::new(Arc::clone(&self.workspace), text)
            .with_aliases(Arc::clone(&self.aliases))
            .with_retry(self.config.retry)
            .with_limiter(self.limiter.clone())
    }
}
