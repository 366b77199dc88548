use image::{imageops, DynamicImage, RgbImage, RgbaImage};

/// Paste `content` onto `canvas` with its top-left corner at `(x, y)`.
///
/// Content is opaque, so it replaces whatever is underneath. Pixels falling
/// outside the canvas are clipped; the anchor may be negative.
pub fn paste(canvas: &mut RgbaImage, content: RgbImage, x: i64, y: i64) {
    let content = DynamicImage::ImageRgb8(content).into_rgba8();
    imageops::replace(canvas, &content, x, y);
}

/// Blend `overlay` onto `canvas` at `(x, y)` using the overlay's own alpha
/// channel as the mask.
///
/// Fully transparent overlay pixels leave the canvas untouched, fully opaque
/// ones replace it.
pub fn paste_masked(canvas: &mut RgbaImage, overlay: &RgbaImage, x: i64, y: i64) {
    imageops::overlay(canvas, overlay, x, y);
}

/// Drop the alpha channel of a finished composite
pub fn flatten(canvas: RgbaImage) -> RgbImage {
    DynamicImage::ImageRgba8(canvas).into_rgb8()
}
