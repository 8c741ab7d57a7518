//! QR code rasterization
//!
//! This crate turns a payload string (typically a booking URL) into a
//! square, zero-margin QR raster at an exact pixel size, with configurable
//! foreground/background colors.
//!
//! # Example
//!
//! ```ignore
//! use qr_gen::{encode, Rgba};
//!
//! let img = encode("https://example.com/booking/x", 256, Rgba([0, 0, 0, 255]), Rgba([255, 255, 255, 255]))?;
//! assert_eq!((img.width(), img.height()), (256, 256));
//! ```

use image::{imageops::FilterType, Luma, Rgba, RgbaImage};
use qrcode::{EcLevel, QrCode};
use thiserror::Error;

/// Errors that can occur during QR encoding
#[derive(Debug, Error)]
pub enum QrError {
    #[error("QR payload is empty")]
    EmptyPayload,

    #[error("Requested QR size is zero")]
    ZeroSize,

    #[error("Failed to encode QR payload: {0}")]
    Encoding(#[from] qrcode::types::QrError),

    #[error("Failed to serialize QR image: {0}")]
    Serialize(String),
}

/// Result type for QR operations
pub type Result<T> = std::result::Result<T, QrError>;

/// Foreground color used when none is specified
pub const DEFAULT_FOREGROUND: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Background color used when none is specified
pub const DEFAULT_BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Encode `data` as a square QR raster of exactly `size_pixels` per side.
///
/// The code is rendered without a quiet zone (zero margin) at error
/// correction level M, then scaled to the requested size with
/// nearest-neighbor filtering so module edges stay crisp. Output is
/// deterministic: identical inputs produce byte-identical pixel buffers.
///
/// # Arguments
/// * `data` - Payload string; must be non-empty and within EC-M capacity
/// * `size_pixels` - Output side length in pixels (must be > 0)
/// * `foreground` - Module color
/// * `background` - Gap color
pub fn encode(
    data: &str,
    size_pixels: u32,
    foreground: Rgba<u8>,
    background: Rgba<u8>,
) -> Result<RgbaImage> {
    if data.is_empty() {
        return Err(QrError::EmptyPayload);
    }
    if size_pixels == 0 {
        return Err(QrError::ZeroSize);
    }

    let code = QrCode::with_error_correction_level(data.as_bytes(), EcLevel::M)?;

    // Render each module at an integral scale before the final resize,
    // so the nearest-neighbor pass never has to invent sub-module pixels.
    let modules = code.width() as u32;
    let scale = (size_pixels / modules).max(1);

    let mono = code
        .render::<Luma<u8>>()
        .quiet_zone(false)
        .module_dimensions(scale, scale)
        .build();

    let mono = if mono.width() != size_pixels || mono.height() != size_pixels {
        image::imageops::resize(&mono, size_pixels, size_pixels, FilterType::Nearest)
    } else {
        mono
    };

    let mut out = RgbaImage::new(size_pixels, size_pixels);
    for (x, y, px) in mono.enumerate_pixels() {
        // The Luma renderer emits 0 for dark modules and 255 for light.
        let color = if px.0[0] < 128 { foreground } else { background };
        out.put_pixel(x, y, color);
    }

    Ok(out)
}

/// Encode `data` with the default black-on-white palette.
pub fn encode_default(data: &str, size_pixels: u32) -> Result<RgbaImage> {
    encode(data, size_pixels, DEFAULT_FOREGROUND, DEFAULT_BACKGROUND)
}

/// Encode `data` and serialize the result as lossless PNG bytes.
pub fn encode_png(data: &str, size_pixels: u32) -> Result<Vec<u8>> {
    let img = encode_default(data, size_pixels)?;
    let mut bytes = Vec::new();
    img.write_to(
        &mut std::io::Cursor::new(&mut bytes),
        image::ImageFormat::Png,
    )
    .map_err(|e| QrError::Serialize(e.to_string()))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_encode_square_at_requested_size() {
        let img = encode_default("https://example.com", 256).unwrap();
        assert_eq!(img.width(), 256);
        assert_eq!(img.height(), 256);
    }

    #[test]
    fn test_encode_small_size_still_square() {
        // 64px is below one pixel per module for some payloads; the
        // nearest-neighbor pass must still hit the exact size.
        let img = encode_default("https://example.com/booking/x", 64).unwrap();
        assert_eq!(img.width(), 64);
        assert_eq!(img.height(), 64);
    }

    #[test]
    fn test_encode_deterministic() {
        let a = encode_default("https://example.com/booking/x", 200).unwrap();
        let b = encode_default("https://example.com/booking/x", 200).unwrap();
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn test_encode_empty_payload() {
        let result = encode_default("", 128);
        assert!(matches!(result, Err(QrError::EmptyPayload)));
    }

    #[test]
    fn test_encode_zero_size() {
        let result = encode_default("https://example.com", 0);
        assert!(matches!(result, Err(QrError::ZeroSize)));
    }

    #[test]
    fn test_encode_over_capacity() {
        // EC-M byte-mode capacity tops out well below 3000 bytes.
        let payload = "x".repeat(3000);
        let result = encode_default(&payload, 128);
        assert!(matches!(result, Err(QrError::Encoding(_))));
    }

    #[test]
    fn test_encode_custom_colors() {
        let fg = Rgba([10, 20, 30, 255]);
        let bg = Rgba([200, 210, 220, 255]);
        let img = encode("https://example.com", 128, fg, bg).unwrap();

        let mut seen_fg = false;
        let mut seen_bg = false;
        for px in img.pixels() {
            if *px == fg {
                seen_fg = true;
            } else if *px == bg {
                seen_bg = true;
            } else {
                panic!("unexpected pixel color: {:?}", px);
            }
        }
        assert!(seen_fg && seen_bg);
    }

    #[test]
    fn test_encode_png_has_png_magic() {
        let bytes = encode_png("https://example.com", 128).unwrap();
        assert_eq!(&bytes[0..8], &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn test_decode_roundtrip() {
        let url = "https://example.com/booking/x";
        let img = encode_default(url, 256).unwrap();

        let gray = image::DynamicImage::ImageRgba8(img).to_luma8();
        let mut prepared = rqrr::PreparedImage::prepare(gray);
        let grids = prepared.detect_grids();
        assert_eq!(grids.len(), 1);

        let (_meta, content) = grids[0].decode().unwrap();
        assert_eq!(content, url);
    }
}
