//! Gemini REST client.
//!
//! One [`GeminiClient`] serves both capabilities: frames are rendered with the
//! configured image model and scripts are rewritten or drafted with the text
//! model. Retry and pacing are left to the caller; every failure comes back
//! as a classified `GenerationError`.

use super::conversion::{extract_image, extract_text, http_error, render_body, text_body};
use super::dto::{GenerateContentRequest, GenerateContentResponse};
use async_trait::async_trait;
use hokusai_core::{DraftRequest, ImageData, RenderRequest};
use hokusai_error::{GenerationError, GenerationErrorKind, HokusaiError, HokusaiResult};
use hokusai_interface::{ImageRenderer, TextService};
use hokusai_rate_limit::GenerationConfig;
use hokusai_script::drafting::rewrite_prompt;
use std::env;
use tracing::{debug, instrument, warn};

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Client for the Gemini `generateContent` endpoint.
///
/// # Examples
///
/// ```
/// use hokusai_interface::{ImageRenderer, TextService};
/// use hokusai_models::GeminiClient;
/// use hokusai_rate_limit::GenerationConfig;
///
/// let client = GeminiClient::with_api_key("test-key", &GenerationConfig::default());
/// assert_eq!(client.provider_name(), "gemini");
/// assert_eq!(ImageRenderer::model_name(&client), "gemini-2.5-flash-image");
/// assert_eq!(TextService::model_name(&client), "gemini-2.5-flash");
/// ```
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    image_model: String,
    text_model: String,
    aspect_ratio: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("image_model", &self.image_model)
            .field("text_model", &self.text_model)
            .field("aspect_ratio", &self.aspect_ratio)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create a client using the API key from `GEMINI_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns `MissingApiKey` if the variable is unset or blank.
    #[track_caller]
    pub fn new(config: &GenerationConfig) -> HokusaiResult<Self> {
        let api_key = env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| GenerationError::new(GenerationErrorKind::MissingApiKey))?;
        Ok(Self::with_api_key(api_key, config))
    }

    /// Create a client with an explicit API key.
    pub fn with_api_key(api_key: impl Into<String>, config: &GenerationConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            image_model: config.image_model.clone(),
            text_model: config.text_model.clone(),
            aspect_ratio: config.aspect_ratio.clone(),
        }
    }

    /// POST a request to `models/{model}:generateContent`.
    #[instrument(skip(self, body))]
    async fn generate_content(
        &self,
        model: &str,
        body: &GenerateContentRequest,
    ) -> HokusaiResult<GenerateContentResponse> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        debug!(url = %url, "Sending Gemini API request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| GenerationError::new(GenerationErrorKind::Request(e.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let err = http_error(status.as_u16(), &error_text);
            warn!(status = status.as_u16(), error = %err.kind, "Gemini API returned an error");
            return Err(err.into());
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            HokusaiError::from(GenerationError::new(GenerationErrorKind::InvalidResponse(
                format!("Failed to parse response: {e}"),
            )))
        })?;
        Ok(parsed)
    }
}

#[async_trait]
impl ImageRenderer for GeminiClient {
    #[instrument(skip_all, fields(style = %request.style, references = request.references.len()))]
    async fn render(&self, request: &RenderRequest) -> HokusaiResult<ImageData> {
        let body = render_body(request, &self.aspect_ratio)?;
        let response = self.generate_content(&self.image_model, &body).await?;
        let image = extract_image(&response)?;
        debug!(bytes = image.data.len(), mime = %image.mime_type, "Frame rendered");
        Ok(image)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.image_model
    }
}

#[async_trait]
impl TextService for GeminiClient {
    #[instrument(skip_all)]
    async fn rewrite(&self, text: &str, instruction: &str) -> HokusaiResult<String> {
        let body = text_body(&rewrite_prompt(text, instruction), None)?;
        let response = self.generate_content(&self.text_model, &body).await?;
        let rewritten = extract_text(&response)?;
        if rewritten.is_empty() {
            debug!("Empty rewrite, keeping original text");
            return Ok(text.to_string());
        }
        Ok(rewritten)
    }

    #[instrument(skip_all, fields(max_output_tokens = ?request.max_output_tokens()))]
    async fn draft_script(&self, request: &DraftRequest) -> HokusaiResult<String> {
        let body = text_body(request.prompt(), *request.max_output_tokens())?;
        let response = self.generate_content(&self.text_model, &body).await?;
        extract_text(&response)
    }

    fn model_name(&self) -> &str {
        &self.text_model
    }
}
