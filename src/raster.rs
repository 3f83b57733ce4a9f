//! Raster compositor: paints a composition into an RGBA buffer.
//!
//! Rendering at a requested size re-lays the configuration out at that size
//! (see [`StyleConfig::at_size`]) instead of scaling a finished bitmap, so
//! corner radii, footprints and overlay geometry stay proportional.

use crate::icon::IconCatalog;
use crate::layer::{LayerEffect, LayerKind, LayerStack};
use crate::layout::{compute_layout, Layout};
use crate::style::StyleConfig;
use image::{ImageFormat, Rgba, RgbaImage};
use resvg::tiny_skia::Pixmap;
use std::io::Cursor;
use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================

/// Failures while painting a single layer or encoding the result.
///
/// Layer failures are logged and swallowed by [`render_layers`]: the layer
/// contributes nothing and the rest of the composition proceeds.
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("failed to decode {layer}: {message}")]
    Decode { layer: LayerKind, message: String },

    #[error("{0} has no area")]
    EmptyShape(LayerKind),

    #[error("cannot allocate a {0}x{0} pixmap")]
    Allocation(u32),

    #[error("failed to encode PNG: {0}")]
    Encode(#[from] image::ImageError),
}

// ============================================================================
// Rendering
// ============================================================================

/// Paints every layer of `config` laid out as `layout`, bottom first.
///
/// Each layer is fully painted before the next one starts. A layer that
/// fails is skipped with a warning.
pub fn render_layers(
    config: &StyleConfig,
    layout: &Layout,
    catalog: &IconCatalog,
) -> Result<Pixmap, RasterError> {
    let size = layout.canvas_size;
    let mut pixmap = Pixmap::new(size, size).ok_or(RasterError::Allocation(size))?;

    let stack = LayerStack::build(config, layout, catalog);
    paint_layers(&mut pixmap, stack.iter());

    log::debug!("rasterized {} layers at {size}px", stack.len());
    Ok(pixmap)
}

fn paint_layers<'l, L>(pixmap: &mut Pixmap, layers: impl IntoIterator<Item = &'l L>)
where
    L: LayerEffect + ?Sized + 'l,
{
    let size = pixmap.width();
    for layer in layers {
        if let Err(err) = layer.rasterize(pixmap) {
            log::warn!("skipping {} at {size}px: {err}", layer.kind());
        }
    }
}

/// Renders `config` at `size` pixels against the bundled catalog.
///
/// A zero size yields an empty image.
pub fn render_raster(config: &StyleConfig, size: u32) -> RgbaImage {
    render_raster_with(config, size, IconCatalog::bundled())
}

/// Renders `config` at `size` pixels against `catalog`.
///
/// A size that cannot be allocated yields an empty image; use
/// [`try_render_raster_with`] to see the error.
pub fn render_raster_with(config: &StyleConfig, size: u32, catalog: &IconCatalog) -> RgbaImage {
    try_render_raster_with(config, size, catalog).unwrap_or_else(|err| {
        log::warn!("{err}, returning an empty image");
        RgbaImage::new(0, 0)
    })
}

/// Renders `config` at `size` pixels against `catalog`, failing if the
/// canvas cannot be allocated.
pub fn try_render_raster_with(
    config: &StyleConfig,
    size: u32,
    catalog: &IconCatalog,
) -> Result<RgbaImage, RasterError> {
    if size == 0 {
        return Ok(RgbaImage::new(0, 0));
    }

    let sized = config.at_size(size);
    let layout = compute_layout(&sized);
    let pixmap = render_layers(&sized, &layout, catalog)?;
    Ok(pixmap_to_rgba_image(&pixmap))
}

/// Encodes an image as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, RasterError> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

// ============================================================================
// Pixel conversion
// ============================================================================

/// Converts a tiny_skia Pixmap to an image::RgbaImage.
fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let width = pixmap.width();
    let mut img = RgbaImage::new(width, pixmap.height());

    // tiny_skia stores premultiplied alpha
    for (index, pixel) in pixmap.pixels().iter().enumerate() {
        let x = index as u32 % width;
        let y = index as u32 / width;
        let (r, g, b, a) = unpremultiply(pixel.red(), pixel.green(), pixel.blue(), pixel.alpha());
        img.put_pixel(x, y, Rgba([r, g, b, a]));
    }

    img
}

fn unpremultiply(r: u8, g: u8, b: u8, a: u8) -> (u8, u8, u8, u8) {
    if a == 0 {
        return (0, 0, 0, 0);
    }
    let a_f = a as f32 / 255.0;
    (
        (r as f32 / a_f).round().min(255.0) as u8,
        (g as f32 / a_f).round().min(255.0) as u8,
        (b as f32 / a_f).round().min(255.0) as u8,
        a,
    )
}
