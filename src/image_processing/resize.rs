use fast_image_resize::{images::Image, PixelType, ResizeOptions, Resizer};
use image::RgbImage;

use crate::error::{FramerError, Result};

/// Resize an image to exact dimensions using fast_image_resize's default
/// convolution filter.
///
/// Aspect ratio is not touched here; callers pass dimensions that already
/// preserve it (see [`super::layout::compute_fit`]).
pub fn resize_image(img: &RgbImage, width: u32, height: u32) -> Result<RgbImage> {
    let (src_width, src_height) = img.dimensions();

    if width == 0 || height == 0 {
        return Err(FramerError::geometry(format!(
            "cannot resize to {}x{}",
            width, height
        )));
    }
    if src_width == 0 || src_height == 0 {
        return Err(FramerError::geometry("cannot resize an empty image"));
    }

    if src_width == width && src_height == height {
        return Ok(img.clone());
    }

    let src_image = Image::from_vec_u8(src_width, src_height, img.as_raw().clone(), PixelType::U8x3)
        .map_err(|e| FramerError::geometry(format!("invalid source buffer: {}", e)))?;

    let mut dst_image = Image::new(width, height, PixelType::U8x3);

    let mut resizer = Resizer::new();
    resizer
        .resize(&src_image, &mut dst_image, Some(&ResizeOptions::default()))
        .map_err(|e| {
            FramerError::geometry(format!("resize to {}x{} failed: {}", width, height, e))
        })?;

    RgbImage::from_raw(width, height, dst_image.into_vec())
        .ok_or_else(|| FramerError::geometry("resized buffer does not match target dimensions"))
}
