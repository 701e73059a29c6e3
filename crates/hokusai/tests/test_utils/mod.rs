//! Test utilities for session tests.

use async_trait::async_trait;
use hokusai::{HokusaiConfig, HokusaiResult, ImageData, ImageRenderer, RenderRequest};
use std::path::Path;

/// Renderer that answers every request with a tiny PNG.
pub struct StaticRenderer;

#[async_trait]
impl ImageRenderer for StaticRenderer {
    async fn render(&self, _request: &RenderRequest) -> HokusaiResult<ImageData> {
        Ok(ImageData::new(vec![0x89, 0x50, 0x4e, 0x47], "image/png"))
    }

    fn provider_name(&self) -> &'static str {
        "static"
    }

    fn model_name(&self) -> &str {
        "static-image"
    }
}

/// Configuration storing the project under `dir`.
pub fn config_in(dir: &Path) -> HokusaiConfig {
    let mut config = HokusaiConfig::default();
    config.storage.dir = Some(dir.to_path_buf());
    config
}
