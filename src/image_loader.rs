use std::io::Cursor;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use image::codecs::gif::GifDecoder;
use image::AnimationDecoder;
use image::{DynamicImage, ImageFormat};

/// RGBA8 pixels ready to be uploaded as a texture.
#[derive(Debug)]
pub struct DecodedImage {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

pub fn open_image(path: &Path) -> Result<DynamicImage> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read image: {:?}", path))?;
    let format = image::guess_format(&bytes).ok();

    // Animated GIFs show their first frame.
    if format == Some(ImageFormat::Gif) {
        let decoder = GifDecoder::new(Cursor::new(bytes))
            .with_context(|| format!("Failed to decode GIF: {:?}", path))?;
        let frame = decoder
            .into_frames()
            .next()
            .ok_or_else(|| anyhow!("GIF has no frames: {:?}", path))?
            .context("Failed to decode GIF frame")?;
        return Ok(DynamicImage::ImageRgba8(frame.into_buffer()));
    }

    match format {
        Some(fmt) => image::load_from_memory_with_format(&bytes, fmt)
            .with_context(|| format!("Failed to decode image: {:?}", path)),
        None => image::load_from_memory(&bytes)
            .with_context(|| format!("Failed to decode image: {:?}", path)),
    }
}

/// Decodes an image and downsizes it to fit within `max_side` on both axes.
pub fn decode_preview(path: &Path, max_side: u32) -> Result<DecodedImage> {
    let img = open_image(path)?;
    let resized = if img.width() > max_side || img.height() > max_side {
        img.thumbnail(max_side, max_side)
    } else {
        img
    };
    let rgba = resized.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(anyhow!("Image has no pixels: {:?}", path));
    }
    Ok(DecodedImage {
        rgba: rgba.into_raw(),
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};
    use tempfile::TempDir;

    #[test]
    fn test_decode_preview_downsizes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wide.png");
        ImageBuffer::from_pixel(400, 100, Rgba([10u8, 20, 30, 255]))
            .save(&path)
            .unwrap();

        let decoded = decode_preview(&path, 200).unwrap();
        assert_eq!((decoded.width, decoded.height), (200, 50));
        assert_eq!(decoded.rgba.len(), 200 * 50 * 4);
    }

    #[test]
    fn test_small_image_is_not_upscaled() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("small.png");
        ImageBuffer::from_pixel(16, 8, Rgba([0u8, 0, 0, 255]))
            .save(&path)
            .unwrap();

        let decoded = decode_preview(&path, 200).unwrap();
        assert_eq!((decoded.width, decoded.height), (16, 8));
    }

    #[test]
    fn test_missing_and_corrupt_files_fail() {
        let dir = TempDir::new().unwrap();
        assert!(decode_preview(&dir.path().join("missing.jpg"), 64).is_err());

        let corrupt = dir.path().join("corrupt.jpg");
        std::fs::write(&corrupt, b"not an image").unwrap();
        assert!(decode_preview(&corrupt, 64).is_err());
    }
}
