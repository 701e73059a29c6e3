//! Layered TOML configuration.
//!
//! Sources, later overriding earlier:
//! 1. Bundled defaults (include_str! from hokusai.toml)
//! 2. `~/.config/hokusai/hokusai.toml`
//! 3. `./hokusai.toml`

use crate::RetryPolicy;
use config::{Config, File, FileFormat};
use hokusai_core::StyleMode;
use hokusai_error::{ConfigError, HokusaiError, HokusaiResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../../../hokusai.toml");

/// Generation service settings.
///
/// ```toml
/// [generation]
/// image_model = "gemini-2.5-flash-image"
/// text_model = "gemini-2.5-flash"
/// default_style = "anime"
/// requests_per_minute = 10
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Model used to render frames
    pub image_model: String,
    /// Model used to rewrite and draft scripts
    pub text_model: String,
    /// Style used when a project has none stored
    pub default_style: StyleMode,
    /// Aspect ratio requested for rendered frames
    pub aspect_ratio: String,
    /// REST endpoint root
    pub api_base_url: String,
    /// Optional pacing of outgoing requests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requests_per_minute: Option<u32>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            image_model: "gemini-2.5-flash-image".to_string(),
            text_model: "gemini-2.5-flash".to_string(),
            default_style: StyleMode::Anime,
            aspect_ratio: "16:9".to_string(),
            api_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            requests_per_minute: None,
        }
    }
}

/// Batch driver timings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Cooldown after a rate-limited attempt, counted down per second
    pub cooldown_secs: u64,
    /// Pause after each successful scene
    pub success_delay_ms: u64,
    /// Pause after skipping a scene that failed for another reason
    pub skip_delay_ms: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: 60,
            success_delay_ms: 2000,
            skip_delay_ms: 1000,
        }
    }
}

impl BatchConfig {
    /// Pause after a success.
    pub fn success_delay(&self) -> Duration {
        Duration::from_millis(self.success_delay_ms)
    }

    /// Pause after a skipped scene.
    pub fn skip_delay(&self) -> Duration {
        Duration::from_millis(self.skip_delay_ms)
    }
}

/// Where project state lives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Project directory; defaults to the platform data directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolve the project directory.
    pub fn project_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|dir| dir.join("hokusai"))
                .unwrap_or_else(|| PathBuf::from(".hokusai"))
        })
    }
}

/// Top-level Hokusai configuration.
///
/// # Example
///
/// ```no_run
/// use hokusai_rate_limit::HokusaiConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = HokusaiConfig::load()?;
/// println!("Cooldown: {}s", config.batch.cooldown_secs);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HokusaiConfig {
    /// Generation service settings
    pub generation: GenerationConfig,
    /// Backoff for transient failures
    pub retry: RetryPolicy,
    /// Batch driver timings
    pub batch: BatchConfig,
    /// Project storage
    pub storage: StorageConfig,
    /// Lowercase alias to reference handle
    pub aliases: BTreeMap<String, String>,
}

impl HokusaiConfig {
    /// Load configuration from a specific file path.
    ///
    /// Sections missing from the file take their built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> HokusaiResult<Self> {
        debug!("Loading configuration from file");

        let config: Self = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                HokusaiError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                HokusaiError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;

        config.retry.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text layered over the bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for this schema.
    ///
    /// # Examples
    ///
    /// ```
    /// use hokusai_rate_limit::HokusaiConfig;
    ///
    /// let config = HokusaiConfig::from_toml_str("[batch]\ncooldown_secs = 5\n").unwrap();
    /// assert_eq!(config.batch.cooldown_secs, 5);
    /// assert_eq!(config.batch.success_delay_ms, 2000);
    /// assert_eq!(config.aliases["ayo"], "auraayo");
    /// ```
    pub fn from_toml_str(toml: &str) -> HokusaiResult<Self> {
        Self::finish(
            Config::builder()
                .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
                .add_source(File::from_str(toml, FileFormat::Toml)),
        )
    }

    /// Load configuration with precedence: current dir > home dir > bundled defaults.
    ///
    /// User config files are optional and silently skipped if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if any present file fails to parse.
    #[instrument]
    pub fn load() -> HokusaiResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/hokusai/hokusai.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("hokusai").required(false));

        Self::finish(builder)
    }

    /// Build, deserialize and validate.
    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> HokusaiResult<Self> {
        let config: Self = builder
            .build()
            .map_err(|e| {
                HokusaiError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                HokusaiError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;

        config.retry.validate()?;
        Ok(config)
    }
}
