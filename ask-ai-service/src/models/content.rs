use image::{ImageOutputFormat, RgbImage};
use std::io::Cursor;

/// An uploaded image, normalized to 8-bit RGB, with the PNG encoding that is
/// sent to providers.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pixels: RgbImage,
    png: Vec<u8>,
}

impl DecodedImage {
    /// Wrap normalized pixels, encoding them as PNG. CPU-bound; callers on
    /// the async runtime go through the blocking pool.
    pub fn new(pixels: RgbImage) -> image::ImageResult<Self> {
        let mut png = Vec::new();
        pixels.write_to(&mut Cursor::new(&mut png), ImageOutputFormat::Png)?;
        Ok(Self { pixels, png })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }

    /// MIME type of [`DecodedImage::png`].
    pub fn mime_type(&self) -> &'static str {
        "image/png"
    }

    pub fn png(&self) -> &[u8] {
        &self.png
    }
}

/// One unit of model input. A request's parts are ordered; providers must
/// forward them in sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentPart {
    Text(String),
    Image(DecodedImage),
}

impl ContentPart {
    pub fn kind(&self) -> &'static str {
        match self {
            ContentPart::Text(_) => "text",
            ContentPart::Image(_) => "image",
        }
    }

    /// Build the ordered content sequence: text first, then the image.
    ///
    /// Returns `None` when there is nothing to send.
    pub fn assemble(prompt: &str, image: Option<DecodedImage>) -> Option<Vec<ContentPart>> {
        let mut parts = Vec::with_capacity(2);
        if !prompt.is_empty() {
            parts.push(ContentPart::Text(prompt.to_string()));
        }
        if let Some(image) = image {
            parts.push(ContentPart::Image(image));
        }

        if parts.is_empty() { None } else { Some(parts) }
    }
}
