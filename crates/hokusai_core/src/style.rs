//! Visual styles and their prompt fragments.

use hokusai_error::{ScriptError, ScriptErrorKind};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const ANIME_PREFIX: &str = "ADD SHONEN ANIME, 4K, ";
const AAA_PREFIX: &str = "CINEMATIC, AAAA PHOTOREALISTIC MOVIE, UNLIMITED VFX BUDGET, 8K RESOLUTION, HYPER-DETAILED TEXTURES, VOLUMETRIC LIGHTING, SHOT ON ARRI ALEXA 65 WITH 2.39:1 ASPECT RATIO, STEVEN SPIELBERG/JAMES CAMERON STYLE, ";
const PIXAR_PREFIX: &str = "PIXAR STYLE 3D ANIMATION, DISNEY ANIMATION STUDIOS STYLE, 8K RENDER, OCTANE RENDER, VOLUMETRIC LIGHTING, SUBSURFACE SCATTERING, VIBRANT COLOR PALETTE, EXPRESSIVE FACIAL FEATURES, CUTE STYLIZED PROPORTIONS, 3D CGI, ";

/// One of the three fixed visual styles.
///
/// # Examples
///
/// ```
/// use hokusai_core::StyleMode;
///
/// let style = StyleMode::parse("Pixar").unwrap();
/// assert_eq!(style, StyleMode::Pixar);
/// assert!(style.prefix().starts_with("PIXAR STYLE 3D ANIMATION"));
/// assert!(StyleMode::parse("noir").is_err());
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StyleMode {
    /// Shonen anime screencap
    #[default]
    Anime,
    /// Photorealistic blockbuster frame
    Aaa,
    /// Stylized 3D animated feature
    Pixar,
}

impl StyleMode {
    /// Parse a style name case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns `UnknownStyle` for anything but `anime`, `aaa` or `pixar`.
    #[track_caller]
    pub fn parse(name: &str) -> Result<Self, ScriptError> {
        Self::from_str(name.trim())
            .map_err(|_| ScriptError::new(ScriptErrorKind::UnknownStyle(name.to_string())))
    }

    /// Prefix injected at the start of every compiled prompt.
    pub fn prefix(&self) -> &'static str {
        match self {
            StyleMode::Anime => ANIME_PREFIX,
            StyleMode::Aaa => AAA_PREFIX,
            StyleMode::Pixar => PIXAR_PREFIX,
        }
    }

    /// Style direction appended to render requests.
    pub fn render_instruction(&self) -> &'static str {
        match self {
            StyleMode::Anime => {
                "Style: High quality anime screencap, 4k, cinematic lighting, cel shaded, highly detailed, dramatic composition."
            }
            StyleMode::Aaa => {
                "Style: PHOTOREALISTIC MOVIE FRAME. Highly detailed, cinematic, 8k, volumetric lighting. Do NOT use anime cel-shading. This is a high-budget live action film."
            }
            StyleMode::Pixar => {
                "Style: 3D ANIMATED MOVIE FRAME (Pixar/Disney Style). High quality 3D render, expressive features, vibrant colors, soft volumetric lighting, subsurface scattering on skin, Octane render. Do NOT use 2D anime style. Do NOT use photorealism. Cute but detailed 3D CGI."
            }
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            StyleMode::Anime => "Anime",
            StyleMode::Aaa => "AAA Cinematic",
            StyleMode::Pixar => "Pixar 3D",
        }
    }

    /// The style after this one, wrapping around.
    pub fn cycle(&self) -> Self {
        match self {
            StyleMode::Anime => StyleMode::Aaa,
            StyleMode::Aaa => StyleMode::Pixar,
            StyleMode::Pixar => StyleMode::Anime,
        }
    }
}
