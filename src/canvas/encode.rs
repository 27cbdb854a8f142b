//! PNG export of the raster and the data-URL wrapping the endpoint expects.

use base64::Engine as _;
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder};

use super::raster::Raster;
use crate::{Error, Result};

const DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// A self-contained, lossless image of the canvas
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub width: u32,
    pub height: u32,
    pub png_data: Vec<u8>,
}

impl ImagePayload {
    /// `data:image/png;base64,...`
    pub fn to_data_url(&self) -> String {
        let b64 = base64::engine::general_purpose::STANDARD.encode(&self.png_data);
        let mut url = String::with_capacity(DATA_URL_PREFIX.len() + b64.len());
        url.push_str(DATA_URL_PREFIX);
        url.push_str(&b64);
        url
    }
}

/// Encode a raster as an RGBA8 PNG
pub fn encode_png(raster: &Raster) -> Result<ImagePayload> {
    let mut png_data = Vec::new();
    PngEncoder::new(&mut png_data).write_image(
        raster.as_bytes(),
        raster.width(),
        raster.height(),
        ColorType::Rgba8,
    )?;
    Ok(ImagePayload {
        width: raster.width(),
        height: raster.height(),
        png_data,
    })
}

/// Extract the PNG bytes from a `data:image/png;base64,` URL.
///
/// Mirrors what a receiving endpoint does: everything after the first comma
/// is base64.
pub fn decode_data_url(url: &str) -> Result<Vec<u8>> {
    let (header, body) = url
        .split_once(',')
        .ok_or_else(|| Error::EncodeError("data URL has no ',' separator".into()))?;
    if !header.starts_with("data:image/png") || !header.ends_with(";base64") {
        return Err(Error::EncodeError(format!(
            "unsupported data URL header: {}",
            header
        )));
    }
    base64::engine::general_purpose::STANDARD
        .decode(body)
        .map_err(|e| Error::EncodeError(format!("invalid base64 payload: {}", e)))
}
