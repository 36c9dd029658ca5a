use bs_core::{Error, InferenceResult, Result};
use bs_models::LoadedModel;
use image::ImageFormat;
use tracing::debug;

use crate::preprocess;

const SUPPORTED_FORMATS: [ImageFormat; 2] = [ImageFormat::Jpeg, ImageFormat::Png];

/// Determine the actual encoding from the payload's magic bytes. Uploads
/// are JPEG or PNG only; a declared content type is not trusted and a
/// missing one is not an excuse.
pub fn sniff_format(image_bytes: &[u8]) -> Result<ImageFormat> {
    let format = image::guess_format(image_bytes)
        .map_err(|_| Error::UnsupportedMedia("unrecognized image data".to_string()))?;
    if !SUPPORTED_FORMATS.contains(&format) {
        return Err(Error::UnsupportedMedia(format!("{:?}", format)));
    }
    Ok(format)
}

/// Decode an uploaded image, run a single forward pass and map the sigmoid
/// output through the classification policy. Any decode, resize or inference
/// failure propagates to the caller; there is no retry or fallback.
pub fn analyze(model: &LoadedModel, image_bytes: &[u8]) -> Result<InferenceResult> {
    let format = sniff_format(image_bytes)?;
    let image = image::load_from_memory_with_format(image_bytes, format)?;
    let (height, width) = model.input_dims();
    debug!("preprocessing image to {}x{} for {}", height, width, model.name());
    let tensor = preprocess::to_tensor(&image, height, width);
    let raw_score = model.predict(tensor)?;
    Ok(InferenceResult::from_score(raw_score))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";
    const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0];

    #[test]
    fn png_and_jpeg_magic_are_accepted() {
        assert_eq!(sniff_format(PNG_MAGIC).unwrap(), ImageFormat::Png);
        assert_eq!(sniff_format(JPEG_MAGIC).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn gif_payload_is_refused_whatever_the_headers_claimed() {
        assert!(matches!(
            sniff_format(b"GIF89a trailing data"),
            Err(Error::UnsupportedMedia(_))
        ));
    }

    #[test]
    fn unrecognizable_payload_is_refused() {
        assert!(matches!(
            sniff_format(b"not an image at all"),
            Err(Error::UnsupportedMedia(_))
        ));
    }
}
