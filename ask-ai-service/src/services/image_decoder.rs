//! Data URL decoding for uploaded images.
//!
//! A data URL is `"<header>,<base64 payload>"`. The header is not trusted;
//! the image format is sniffed from the decoded bytes. ASCII whitespace in
//! the payload (line-wrapped base64) is ignored.

use crate::models::DecodedImage;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("data URL is missing the ',' between header and payload")]
    MissingSeparator,

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("unrecognized image data: {0}")]
    Format(#[from] image::ImageError),

    #[error("could not re-encode image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("image decoding did not complete: {0}")]
    Interrupted(String),
}

/// Split, base64-decode and decode a data URL into an RGB image, ready to
/// send.
pub fn decode_data_url(data_url: &str) -> Result<DecodedImage, ImageError> {
    let (_header, encoded) = data_url
        .split_once(',')
        .ok_or(ImageError::MissingSeparator)?;

    let compact: Vec<u8> = encoded
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    let bytes = STANDARD.decode(compact)?;
    let pixels = image::load_from_memory(&bytes)?.to_rgb8();

    DecodedImage::new(pixels).map_err(ImageError::Encode)
}

/// Run [`decode_data_url`] on the blocking pool so large images don't stall
/// the async workers. This covers the PNG re-encode as well.
pub async fn decode_data_url_blocking(data_url: String) -> Result<DecodedImage, ImageError> {
    tokio::task::spawn_blocking(move || decode_data_url(&data_url))
        .await
        .map_err(|e| ImageError::Interrupted(e.to_string()))?
}
