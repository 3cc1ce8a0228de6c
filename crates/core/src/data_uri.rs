//! Decoding of `data:` URIs returned by the image model.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::CoreError;

/// Image bytes decoded from a data URI, with the detected format.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub extension: &'static str,
}

/// Decode a base64 `data:image/...;base64,` URI.
///
/// The declared MIME type is ignored; the format is sniffed from the
/// decoded bytes and anything that is not PNG, JPEG or WebP is rejected.
pub fn decode_image_data_uri(uri: &str) -> Result<DecodedImage, CoreError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| CoreError::Validation("Image payload is not a data URI".into()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| CoreError::Validation("Data URI has no payload".into()))?;
    if !header.ends_with(";base64") {
        return Err(CoreError::Validation("Data URI is not base64 encoded".into()));
    }

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| CoreError::Validation(format!("Invalid base64 image payload: {e}")))?;

    let (content_type, extension) = match image::guess_format(&bytes) {
        Ok(image::ImageFormat::Png) => ("image/png", "png"),
        Ok(image::ImageFormat::Jpeg) => ("image/jpeg", "jpg"),
        Ok(image::ImageFormat::WebP) => ("image/webp", "webp"),
        _ => {
            return Err(CoreError::Validation(
                "Image payload is not a PNG, JPEG or WebP image".into(),
            ))
        }
    };

    Ok(DecodedImage {
        bytes,
        content_type,
        extension,
    })
}
