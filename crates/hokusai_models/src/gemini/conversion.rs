//! Conversion between Hokusai requests and Gemini wire types.

use super::dto::{
    ApiErrorBody, Content, GenerateContentRequest, GenerateContentResponse, GenerationSettings,
    HarmBlockThreshold, HarmCategory, ImageConfig, Part, SafetySetting,
};
use hokusai_core::{ImageData, RenderRequest, StyleMode};
use hokusai_error::{
    BuilderError, BuilderErrorKind, GenerationError, GenerationErrorKind, HokusaiError,
    HokusaiResult,
};

/// Appended to every render prompt so reference sheets are honored.
pub const CONSISTENCY_INSTRUCTION: &str = "IMPORTANT: Reference images are attached. You MUST COPY the character designs (FACE, HAIR, AND EXACT OUTFIT) from these images. \n- Do NOT invent new clothes. If the text does not describe clothing, USE THE OUTFIT FROM THE IMAGE.\n- If multiple characters are present, map them correctly based on their visual traits (e.g. Red skin = Ayo).";

const NO_OVERLAYS: &str = "CRITICAL: NO SPEECH BUBBLES. NO TEXT OVERLAYS. NO COMIC PANELS.";

const DEFAULT_MIME: &str = "image/png";

/// Finish reasons that mean the output was withheld by a safety filter.
const SAFETY_FINISH_REASONS: &[&str] = &[
    "SAFETY",
    "IMAGE_SAFETY",
    "PROHIBITED_CONTENT",
    "BLOCKLIST",
    "SPII",
];

const HARM_CATEGORIES: [HarmCategory; 4] = [
    HarmCategory::Harassment,
    HarmCategory::HateSpeech,
    HarmCategory::SexuallyExplicit,
    HarmCategory::DangerousContent,
];

/// Full text part sent with a render request.
///
/// # Examples
///
/// ```
/// use hokusai_core::StyleMode;
/// use hokusai_models::render_prompt_text;
///
/// let text = render_prompt_text("Ayo leaps", StyleMode::Pixar);
/// assert!(text.starts_with("Ayo leaps \n\nIMPORTANT: Reference images are attached."));
/// assert!(text.contains(StyleMode::Pixar.render_instruction()));
/// assert!(text.ends_with("NO COMIC PANELS."));
/// ```
pub fn render_prompt_text(prompt: &str, style: StyleMode) -> String {
    format!(
        "{prompt} \n\n{CONSISTENCY_INSTRUCTION}\n\n{} \n{NO_OVERLAYS}",
        style.render_instruction()
    )
}

/// Build the body for an image render: reference sheets first, then the prompt.
pub fn render_body(
    request: &RenderRequest,
    aspect_ratio: &str,
) -> HokusaiResult<GenerateContentRequest> {
    let mut parts: Vec<Part> = request
        .references
        .iter()
        .map(|image| {
            let mime = if image.mime_type.trim().is_empty() {
                DEFAULT_MIME
            } else {
                image.mime_type.as_str()
            };
            Part::inline(mime, image.to_base64())
        })
        .collect();
    parts.push(Part::text(render_prompt_text(&request.prompt, request.style)));

    let safety: Vec<SafetySetting> = HARM_CATEGORIES
        .iter()
        .map(|category| SafetySetting {
            category: *category,
            threshold: HarmBlockThreshold::BlockOnlyHigh,
        })
        .collect();

    GenerateContentRequest::builder()
        .contents(vec![Content::user(parts)])
        .generation_config(GenerationSettings {
            image_config: Some(ImageConfig {
                aspect_ratio: aspect_ratio.to_string(),
            }),
            max_output_tokens: None,
        })
        .safety_settings(safety)
        .build()
        .map_err(|e| {
            HokusaiError::from(BuilderError::new(BuilderErrorKind::ValidationFailed(
                e.to_string(),
            )))
        })
}

/// Build the body for a plain text prompt.
pub fn text_body(
    prompt: &str,
    max_output_tokens: Option<u32>,
) -> HokusaiResult<GenerateContentRequest> {
    let mut builder = GenerateContentRequest::builder();
    builder.contents(vec![Content::user(vec![Part::text(prompt)])]);
    if max_output_tokens.is_some() {
        builder.generation_config(GenerationSettings {
            image_config: None,
            max_output_tokens,
        });
    }
    builder
        .build()
        .map_err(|e| {
            HokusaiError::from(BuilderError::new(BuilderErrorKind::ValidationFailed(
                e.to_string(),
            )))
        })
}

/// Fail if the prompt was blocked or nothing came back.
fn ensure_candidates(response: &GenerateContentResponse, what: &str) -> HokusaiResult<()> {
    if !response.candidates().is_empty() {
        return Ok(());
    }
    if let Some(reason) = response
        .prompt_feedback()
        .as_ref()
        .and_then(|feedback| feedback.block_reason().clone())
    {
        return Err(GenerationError::new(GenerationErrorKind::SafetyBlocked(reason)).into());
    }
    Err(GenerationError::new(GenerationErrorKind::EmptyResponse(format!(
        "No {what} candidates returned by API."
    )))
    .into())
}

/// The first candidate's finish reason, if it is a safety stop.
fn safety_stop(response: &GenerateContentResponse) -> Option<String> {
    response
        .candidates()
        .first()
        .and_then(|candidate| candidate.finish_reason().clone())
        .filter(|reason| SAFETY_FINISH_REASONS.contains(&reason.as_str()))
}

/// Pull the first inline image out of a response.
pub fn extract_image(response: &GenerateContentResponse) -> HokusaiResult<ImageData> {
    ensure_candidates(response, "image")?;

    let inline = response
        .candidates()
        .first()
        .and_then(|candidate| candidate.content().as_ref())
        .and_then(|content| {
            content
                .parts
                .iter()
                .filter_map(|part| part.inline_data.as_ref())
                .find(|data| !data.data.is_empty())
        });

    match inline {
        Some(data) => ImageData::from_base64(&data.data, data.mime_type.clone()).map_err(|e| {
            HokusaiError::from(GenerationError::new(GenerationErrorKind::InvalidResponse(
                format!("Image data is not valid base64: {e}"),
            )))
        }),
        None => match safety_stop(response) {
            Some(reason) => {
                Err(GenerationError::new(GenerationErrorKind::SafetyBlocked(reason)).into())
            }
            None => Err(GenerationError::new(GenerationErrorKind::EmptyResponse(
                "Model returned no image data.".to_string(),
            ))
            .into()),
        },
    }
}

/// Concatenate the first candidate's text parts, trimmed.
///
/// A candidate with no text yields an empty string unless it was stopped by
/// a safety filter.
pub fn extract_text(response: &GenerateContentResponse) -> HokusaiResult<String> {
    ensure_candidates(response, "text")?;

    let text: String = response
        .candidates()
        .first()
        .and_then(|candidate| candidate.content().as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|part| part.text.as_deref())
                .collect()
        })
        .unwrap_or_default();

    let text = text.trim();
    if text.is_empty() {
        if let Some(reason) = safety_stop(response) {
            return Err(GenerationError::new(GenerationErrorKind::SafetyBlocked(reason)).into());
        }
    }
    Ok(text.to_string())
}

/// Map a non-success HTTP response to a generation error.
pub fn http_error(status_code: u16, body: &str) -> GenerationError {
    let message = match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(envelope) if !envelope.error.message.is_empty() => envelope.error.message,
        Ok(envelope) => envelope.error.status.unwrap_or_default(),
        Err(_) => body.trim().to_string(),
    };
    GenerationError::new(GenerationErrorKind::Http {
        status_code,
        message,
    })
}
