//! Google Gemini provider over the `generateContent` REST endpoint.

mod client;
mod conversion;
mod dto;

pub use client::{API_KEY_ENV, GeminiClient};
pub use conversion::{CONSISTENCY_INSTRUCTION, render_prompt_text};
pub use dto::{GenerateContentRequest, GenerateContentResponse};
