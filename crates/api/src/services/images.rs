//! Profile picture processing.
//!
//! Uploads arrive in whatever format the client had; they leave as a
//! centered square JPEG of a fixed size. Processing is pure (bytes in,
//! bytes out), storage is a separate concern.

use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use thiserror::Error;

/// Errors from profile picture processing.
#[derive(Debug, Error)]
pub enum ImageError {
    /// The upload could not be decoded as an image.
    #[error("could not decode image: {0}")]
    Decode(image::ImageError),

    /// Re-encoding to JPEG failed.
    #[error("could not encode image: {0}")]
    Encode(image::ImageError),
}

/// Normalize an uploaded image to a `size` x `size` JPEG.
///
/// Crops the largest centered square, resizes it, and re-encodes as JPEG.
/// Alpha is dropped since JPEG has no transparency.
///
/// # Errors
///
/// Returns [`ImageError::Decode`] for undecodable input and
/// [`ImageError::Encode`] if JPEG encoding fails.
pub fn to_profile_jpeg(bytes: &[u8], size: u32) -> Result<Vec<u8>, ImageError> {
    let decoded = image::load_from_memory(bytes).map_err(ImageError::Decode)?;

    let square = crop_centered_square(&decoded);
    let resized = square.resize_exact(size, size, FilterType::Lanczos3);
    let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());

    let mut out = Cursor::new(Vec::new());
    rgb.write_to(&mut out, ImageFormat::Jpeg)
        .map_err(ImageError::Encode)?;
    Ok(out.into_inner())
}

/// The largest centered square crop of the image.
fn crop_centered_square(img: &DynamicImage) -> DynamicImage {
    let (width, height) = (img.width(), img.height());
    let side = width.min(height);
    let x = (width - side) / 2;
    let y = (height - side) / 2;
    img.crop_imm(x, y, side, side)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(width, height));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_landscape_becomes_square_jpeg() {
        let jpeg = to_profile_jpeg(&png_bytes(400, 300), 200).unwrap();

        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!(decoded.width(), 200);
        assert_eq!(decoded.height(), 200);
        assert_eq!(
            image::guess_format(&jpeg).unwrap(),
            ImageFormat::Jpeg
        );
    }

    #[test]
    fn test_portrait_becomes_square_jpeg() {
        let jpeg = to_profile_jpeg(&png_bytes(120, 500), 64).unwrap();

        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!(decoded.width(), 64);
        assert_eq!(decoded.height(), 64);
    }

    #[test]
    fn test_alpha_input_survives_jpeg_encode() {
        // RGBA source must be flattened before JPEG encoding.
        assert!(to_profile_jpeg(&png_bytes(50, 50), 32).is_ok());
    }

    #[test]
    fn test_garbage_input_rejected() {
        let result = to_profile_jpeg(b"definitely not an image", 200);
        assert!(matches!(result, Err(ImageError::Decode(_))));
    }
}
