//! Image payloads for reference sheets and rendered frames.

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

/// Raw image bytes with their MIME type.
///
/// Bytes are stored decoded in memory and serialized as base64 inside JSON.
///
/// # Examples
///
/// ```
/// use hokusai_core::ImageData;
///
/// let image = ImageData::new(vec![0x89, 0x50, 0x4E, 0x47], "image/png");
/// let json = serde_json::to_value(&image).unwrap();
/// assert_eq!(json["data"], "iVBORw==");
/// assert_eq!(json["mimeType"], "image/png");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageData {
    /// Decoded image bytes
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
    /// MIME type such as `image/png`
    pub mime_type: String,
}

impl ImageData {
    /// Create image data from raw bytes.
    pub fn new(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            data,
            mime_type: mime_type.into(),
        }
    }

    /// Decode image data from a base64 string.
    ///
    /// # Errors
    ///
    /// Returns the decoder error if `encoded` is not valid standard base64.
    pub fn from_base64(
        encoded: &str,
        mime_type: impl Into<String>,
    ) -> Result<Self, base64::DecodeError> {
        Ok(Self::new(STANDARD.decode(encoded.trim())?, mime_type))
    }

    /// Encode the bytes as standard base64.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.data)
    }

    /// Guess a MIME type from a file extension, defaulting to PNG.
    ///
    /// # Examples
    ///
    /// ```
    /// use hokusai_core::ImageData;
    ///
    /// assert_eq!(ImageData::mime_for_extension("JPG"), "image/jpeg");
    /// assert_eq!(ImageData::mime_for_extension("bin"), "image/png");
    /// ```
    pub fn mime_for_extension(extension: &str) -> &'static str {
        match extension.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => "image/jpeg",
            "webp" => "image/webp",
            "gif" => "image/gif",
            _ => "image/png",
        }
    }

    /// File extension matching the MIME type.
    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/jpeg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "png",
        }
    }
}

mod base64_bytes {
    use base64::{Engine, engine::general_purpose::STANDARD};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded.trim()).map_err(D::Error::custom)
    }
}
