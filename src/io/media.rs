// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Raster media helpers.
//!
//! This module decodes uploaded image bytes and `data:` URLs, and encodes
//! rasterized masks as PNG for the remote image services.

use anyhow::{anyhow, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, GrayImage, ImageFormat};
use std::io::Cursor;

/// Natural dimensions of an encoded image.
pub fn image_dimensions(bytes: &[u8]) -> Result<(u32, u32)> {
    let img = image::load_from_memory(bytes).context("Failed to decode image")?;
    Ok((img.width(), img.height()))
}

/// Extract the payload of a base64 `data:` URL.
pub fn decode_data_url(url: &str) -> Result<Vec<u8>> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| anyhow!("not a data URL"))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| anyhow!("data URL has no payload"))?;
    if !header.ends_with(";base64") {
        return Err(anyhow!("only base64 data URLs are supported"));
    }
    let bytes = STANDARD.decode(payload.trim()).context("Invalid base64 payload")?;
    Ok(bytes)
}

/// Build a `data:image/png;base64,...` URL.
pub fn png_data_url(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png))
}

/// Encode a grayscale mask as PNG bytes.
pub fn encode_png(mask: &GrayImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    DynamicImage::ImageLuma8(mask.clone())
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .context("Failed to encode PNG")?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_png_roundtrip_through_data_url() {
        let mut mask = GrayImage::new(7, 3);
        mask.put_pixel(1, 1, Luma([255]));
        let png = encode_png(&mask).unwrap();
        let url = png_data_url(&png);

        let bytes = decode_data_url(&url).unwrap();
        assert_eq!(image_dimensions(&bytes).unwrap(), (7, 3));
    }

    #[test]
    fn test_non_data_url_rejected() {
        assert!(decode_data_url("https://example.com/a.png").is_err());
        assert!(decode_data_url("data:text/plain,hello").is_err());
    }
}
