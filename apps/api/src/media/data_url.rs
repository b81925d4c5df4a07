use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::media::MediaError;

const DEFAULT_MIME: &str = "image/png";

/// A base64 image with its MIME type, as exchanged with browsers and the
/// image generation API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineImage {
    pub mime_type: String,
    /// Standard base64, no `data:` prefix.
    pub data: String,
}

impl InlineImage {
    /// Parses `data:<mime>;base64,<payload>` or a bare base64 payload
    /// (assumed PNG). The payload is validated but kept encoded.
    pub fn parse(input: &str) -> Result<Self, MediaError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(MediaError::InvalidImage("image payload is empty".to_string()));
        }

        let (mime_type, data) = match input.strip_prefix("data:") {
            Some(rest) => {
                let (header, data) = rest.split_once(',').ok_or_else(|| {
                    MediaError::InvalidImage("data URL has no payload".to_string())
                })?;
                let mime = header.strip_suffix(";base64").ok_or_else(|| {
                    MediaError::InvalidImage("data URL must be base64 encoded".to_string())
                })?;
                if !mime.starts_with("image/") {
                    return Err(MediaError::InvalidImage(format!(
                        "expected an image, got '{mime}'"
                    )));
                }
                (mime.to_string(), data)
            }
            None => (DEFAULT_MIME.to_string(), input),
        };

        // Browsers sometimes wrap long payloads
        let data: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        if data.is_empty() {
            return Err(MediaError::InvalidImage("image payload is empty".to_string()));
        }
        STANDARD
            .decode(&data)
            .map_err(|e| MediaError::InvalidImage(format!("image is not valid base64: {e}")))?;

        Ok(Self { mime_type, data })
    }

    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: STANDARD.encode(bytes),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, MediaError> {
        STANDARD
            .decode(&self.data)
            .map_err(|e| MediaError::InvalidImage(format!("image is not valid base64: {e}")))
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    pub fn extension(&self) -> &'static str {
        extension_for_mime(&self.mime_type)
    }
}

pub fn extension_for_mime(mime: &str) -> &'static str {
    match mime {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "png",
    }
}

pub fn mime_for_extension(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => DEFAULT_MIME,
    }
}
