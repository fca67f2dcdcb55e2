//! PNG output for a rendered [`Frame`].
//!
//! One pixel per natural unit, multiplied by the fit scale. Rectangle edges
//! are rounded to whole pixels. The label is not drawn; hosts that need it
//! should use the SVG output.

use std::io::Cursor;

use image::{Rgb, RgbImage};

use super::svg::{PADDING, natural_size};
use crate::barcode::Frame;
use crate::error::BarcodeError;

/// Largest image `to_image` will allocate, in pixels.
pub const MAX_PIXELS: u64 = 4096 * 4096;

/// Pixel size of one side, or `None` when it is not finite or exceeds `u32`.
fn pixel_extent(natural: f64, scale: f64) -> Option<u64> {
    let px = (natural * scale).round().max(1.0);
    if !px.is_finite() || px > f64::from(u32::MAX) {
        return None;
    }
    Some(px as u64)
}

/// Rasterize the bars into an RGB image.
///
/// Fails with [`BarcodeError::Image`] before allocating when the scaled
/// frame would exceed [`MAX_PIXELS`].
pub fn to_image(frame: &Frame) -> Result<RgbImage, BarcodeError> {
    let scale = frame.fit.scale;
    let (natural_width, natural_height) = natural_size(frame);
    let too_large = || {
        BarcodeError::Image(format!(
            "{}x{} at scale {} exceeds the {} pixel limit",
            natural_width, natural_height, scale, MAX_PIXELS
        ))
    };
    let width = pixel_extent(natural_width, scale).ok_or_else(too_large)?;
    let height = pixel_extent(natural_height, scale).ok_or_else(too_large)?;
    match width.checked_mul(height) {
        Some(pixels) if pixels <= MAX_PIXELS => {}
        _ => return Err(too_large()),
    }
    let (width, height) = (width as u32, height as u32);

    let mut img = RgbImage::from_pixel(width, height, Rgb(frame.style.background.rgb()));
    let ink = Rgb(frame.style.line_color.rgb());

    let to_px = |v: f64, limit: u32| ((v * scale).round().max(0.0) as u32).min(limit);
    for rect in &frame.geometry.rects {
        let x0 = to_px(PADDING + rect.x, width);
        let x1 = to_px(PADDING + rect.x + rect.width, width);
        let y0 = to_px(PADDING + rect.y, height);
        let y1 = to_px(PADDING + rect.y + rect.height, height);
        for y in y0..y1 {
            for x in x0..x1 {
                img.put_pixel(x, y, ink);
            }
        }
    }

    Ok(img)
}

/// Rasterize and encode as PNG bytes.
pub fn to_png(frame: &Frame) -> Result<Vec<u8>, BarcodeError> {
    let img = to_image(frame)?;
    let mut png_bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut png_bytes), image::ImageFormat::Png)
        .map_err(|e| BarcodeError::Image(e.to_string()))?;
    Ok(png_bytes)
}
