use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use image::ImageFormat;
use std::io::Cursor;

/// Longer side of a produced thumbnail never exceeds this.
pub const MAX_DIMENSION: u32 = 100;

/// Proportional thumbnail dimensions: the longer side is bounded by `limit`
/// and images already inside the bound are left at their original size.
pub fn small_width_height(width: u32, height: u32, limit: u32) -> (u32, u32) {
    let scale = (limit as f32 / width as f32)
        .min(limit as f32 / height as f32)
        .min(1.0);
    let scaled_width = ((scale * width as f32) as u32).max(1);
    let scaled_height = ((scale * height as f32) as u32).max(1);
    (scaled_width, scaled_height)
}

/// Downscale base64-encoded image content to a JPEG thumbnail, returned
/// base64-encoded. Pure function; callers run it on a blocking task.
pub fn shrink_to_thumbnail(content_base64: &str) -> Result<String> {
    let content = BASE64_STANDARD
        .decode(content_base64.trim())
        .context("image content is not valid base64")?;
    let source = image::load_from_memory(&content).context("failed to decode image content")?;

    let (width, height) = small_width_height(source.width(), source.height(), MAX_DIMENSION);
    let thumbnail = source.thumbnail_exact(width, height).to_rgb8();

    let mut encoded = Cursor::new(Vec::new());
    thumbnail
        .write_to(&mut encoded, ImageFormat::Jpeg)
        .context("failed to encode JPEG thumbnail")?;
    Ok(BASE64_STANDARD.encode(encoded.into_inner()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};

    fn png_base64(width: u32, height: u32) -> String {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(
            width,
            height,
            image::Rgb([120, 40, 200]),
        ));
        let mut bytes = Cursor::new(Vec::new());
        image.write_to(&mut bytes, ImageFormat::Png).unwrap();
        BASE64_STANDARD.encode(bytes.into_inner())
    }

    #[test]
    fn dimensions_scale_proportionally() {
        assert_eq!(small_width_height(200, 100, 100), (100, 50));
        assert_eq!(small_width_height(100, 400, 100), (25, 100));
        assert_eq!(small_width_height(3000, 3000, 100), (100, 100));
    }

    #[test]
    fn small_images_are_not_upscaled() {
        assert_eq!(small_width_height(50, 40, 100), (50, 40));
    }

    #[test]
    fn degenerate_dimensions_stay_positive() {
        let (width, height) = small_width_height(10_000, 3, 100);
        assert_eq!(width, 100);
        assert_eq!(height, 1);
    }

    #[test]
    fn thumbnail_preserves_aspect_ratio() {
        let encoded = shrink_to_thumbnail(&png_base64(200, 100)).unwrap();
        let bytes = BASE64_STANDARD.decode(encoded).unwrap();
        let thumbnail = image::load_from_memory(&bytes).unwrap();
        assert_eq!((thumbnail.width(), thumbnail.height()), (100, 50));
    }

    #[test]
    fn output_is_jpeg() {
        let encoded = shrink_to_thumbnail(&png_base64(300, 300)).unwrap();
        let bytes = BASE64_STANDARD.decode(encoded).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn invalid_base64_is_rejected() {
        assert!(shrink_to_thumbnail("!!not base64!!").is_err());
    }

    #[test]
    fn non_image_bytes_are_rejected() {
        let encoded = BASE64_STANDARD.encode(b"plain text, not an image");
        assert!(shrink_to_thumbnail(&encoded).is_err());
    }
}
