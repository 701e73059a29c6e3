//! Generation providers for Hokusai.
//!
//! Each provider lives behind its own feature flag and implements the
//! [`ImageRenderer`](hokusai_interface::ImageRenderer) and
//! [`TextService`](hokusai_interface::TextService) capability traits.
//!
//! # Available Providers
//!
//! - **Gemini** (Google) - Enable with `gemini` feature (on by default)
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "gemini")]
//! # {
//! use hokusai_core::{RenderRequest, StyleMode};
//! use hokusai_interface::ImageRenderer;
//! use hokusai_models::GeminiClient;
//! use hokusai_rate_limit::GenerationConfig;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GeminiClient::new(&GenerationConfig::default())?;
//! let frame = client
//!     .render(&RenderRequest {
//!         prompt: "ADD SHONEN ANIME, 4K, a forest at dawn".to_string(),
//!         references: vec![],
//!         style: StyleMode::Anime,
//!     })
//!     .await?;
//! println!("{} bytes of {}", frame.data.len(), frame.mime_type);
//! # Ok(())
//! # }
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

#[cfg(feature = "gemini")]
mod gemini;

#[cfg(feature = "gemini")]
pub use gemini::{
    API_KEY_ENV, CONSISTENCY_INSTRUCTION, GeminiClient, GenerateContentRequest,
    GenerateContentResponse, render_prompt_text,
};
