//! Compositing resolved modules onto the canvas.

use image::imageops::FilterType;

use crate::assets::font::FontResolver;
use crate::assets::store::ResourceStore;
use crate::content::ResolvedContent;
use crate::foundation::error::{InkframeError, InkframeResult};
use crate::foundation::geometry::Viewport;
use crate::model::{ImageOptions, Module};
use crate::render::canvas::{Canvas, PixelFormat};
use crate::render::text;

/// Draw one module's resolved content at its viewport-translated position.
///
/// Fully off-canvas modules are culled before any font or image work.
pub fn composite_module(
    canvas: &mut Canvas,
    viewport: &Viewport,
    module: &Module,
    resolved: &ResolvedContent,
    fonts: &mut FontResolver<'_>,
    images: &dyn ResourceStore,
) -> InkframeResult<()> {
    let (x, y) = viewport.translate(module.position);
    if !viewport.is_visible(x, y, module.size) {
        tracing::debug!(x, y, "module outside viewport, culled");
        return Ok(());
    }

    match resolved {
        ResolvedContent::Text(content) => {
            let opts = &module.text;
            let font = fonts.resolve(&opts.font, opts.size);
            let placed = text::layout_block(
                content,
                &font,
                opts.align,
                module.size.width,
                module.size.height,
            );
            for line in &placed {
                // Italic is faked as a 1px slant shift, bold as a doubled
                // pass offset by 1px.
                let lx = x + line.x + if opts.italic { 1 } else { 0 };
                let ly = y + line.y;
                text::draw_line(canvas, &font, &line.text, lx, ly, opts.color);
                if opts.bold {
                    text::draw_line(canvas, &font, &line.text, lx + 1, ly, opts.color);
                }
                if opts.strike {
                    let sy = ly + (font.size / 2.0) as i64;
                    canvas.fill_rect(lx, sy, line.width as u32, 1, opts.color);
                }
            }
        }
        ResolvedContent::Image(opts) => {
            composite_image(canvas, x, y, module, opts, images);
        }
        ResolvedContent::Rule => {
            canvas.fill_rect(x, y, module.size.width, module.size.height, module.text.color);
        }
    }
    Ok(())
}

fn composite_image(
    canvas: &mut Canvas,
    x: i64,
    y: i64,
    module: &Module,
    opts: &ImageOptions,
    images: &dyn ResourceStore,
) {
    let bytes = match images.get_image(&opts.image) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            tracing::warn!(image = %opts.image, "image not in store, skipping module");
            return;
        }
        Err(e) => {
            tracing::warn!(image = %opts.image, error = %e, "image store lookup failed");
            return;
        }
    };
    let decoded = match image::load_from_memory(&bytes) {
        Ok(img) => img,
        Err(e) => {
            tracing::warn!(image = %opts.image, error = %e, "undecodable image, skipping module");
            return;
        }
    };
    let prepared = match prepare_image(&decoded, opts, module.size.width, module.size.height, canvas.format) {
        Ok(img) => img,
        Err(e) => {
            tracing::warn!(image = %opts.image, error = %e, "image prepare failed");
            return;
        }
    };
    let rgb = prepared.to_rgb8();
    for (px, py, pixel) in rgb.enumerate_pixels() {
        canvas.put_pixel(x + px as i64, y + py as i64, pixel.0);
    }
}

/// Crop an image to its configured source rectangle (full bounds when unset)
/// and scale it to the module size.
///
/// A crop wider or taller than the image is clamped to the image edge, so a
/// design whose crop went stale after an image swap still renders. Only a
/// crop whose origin lies outside the image is an error.
///
/// Mono targets use nearest-neighbor scaling so pre-dithered icon art keeps
/// hard edges; RGB targets get a smoothing filter.
pub fn prepare_image(
    img: &image::DynamicImage,
    opts: &ImageOptions,
    width: u32,
    height: u32,
    format: PixelFormat,
) -> InkframeResult<image::DynamicImage> {
    if width == 0 || height == 0 {
        return Err(InkframeError::render("image module has zero size"));
    }
    let (cx, cy, cw, ch) = match &opts.crop {
        Some(c) => (c.x, c.y, c.width, c.height),
        None => (0, 0, img.width(), img.height()),
    };
    if cw == 0 || ch == 0 || cx >= img.width() || cy >= img.height() {
        return Err(InkframeError::render(format!(
            "crop rect {cx},{cy} {cw}x{ch} outside image bounds {}x{}",
            img.width(),
            img.height()
        )));
    }
    let cw = cw.min(img.width() - cx);
    let ch = ch.min(img.height() - cy);
    let cropped = img.crop_imm(cx, cy, cw, ch);
    let filter = match format {
        PixelFormat::Mono => FilterType::Nearest,
        PixelFormat::Rgb => FilterType::CatmullRom,
    };
    Ok(cropped.resize_exact(width, height, filter))
}
