//! Text layout and glyph rasterization.
//!
//! Layout is greedy word wrap against measured advances, one block per module:
//! explicit newlines start paragraphs, paragraphs wrap to the module width,
//! and lines that would overflow the module bottom are dropped.

use ab_glyph::{Font, PxScale, ScaleFont, point};

use crate::assets::font::ResolvedFont;
use crate::model::Align;
use crate::render::canvas::Canvas;

/// Extra pixels between baselines on top of the font size.
pub const LINE_SPACING: u32 = 2;

/// Greedy wrap of `text` into lines no wider than `max_width` pixels.
///
/// A word wider than the module still gets a line of its own rather than
/// being dropped or split mid-word.
pub fn wrap_text(text: &str, font: &ResolvedFont, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split(' ') {
            if current.is_empty() {
                current = word.to_string();
                continue;
            }
            let candidate = format!("{current} {word}");
            if font.advance(&candidate) <= max_width {
                current = candidate;
            } else {
                lines.push(current);
                current = word.to_string();
            }
        }
        lines.push(current);
    }
    lines
}

/// One laid-out line, positioned relative to the module origin.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub x: i64,
    pub y: i64,
    pub width: f32,
}

/// Wrap and place a text block inside a module of `width` x `height` pixels.
pub fn layout_block(
    text: &str,
    font: &ResolvedFont,
    align: Align,
    width: u32,
    height: u32,
) -> Vec<PlacedLine> {
    let line_height = font.size as i64 + LINE_SPACING as i64;
    let mut placed = Vec::new();
    for (i, line) in wrap_text(text, font, width as f32).into_iter().enumerate() {
        let y = i as i64 * line_height;
        if y + line_height > height as i64 {
            break;
        }
        let line_width = font.advance(&line);
        let x = match align {
            Align::Left => 0,
            Align::Center => ((width as f32 - line_width) / 2.0) as i64,
            Align::Right => (width as f32 - line_width) as i64,
        };
        placed.push(PlacedLine {
            text: line,
            x,
            y,
            width: line_width,
        });
    }
    placed
}

/// Rasterize one line of text with its top-left corner at (x, y).
///
/// Without a loaded face the built-in fallback draws a filled box per
/// non-space character, which keeps layout visible even with no font files
/// on the machine.
pub fn draw_line(canvas: &mut Canvas, font: &ResolvedFont, text: &str, x: i64, y: i64, color: [u8; 3]) {
    match font.face() {
        Some(face) => {
            let scaled = face.as_scaled(PxScale::from(font.size));
            let baseline = y as f32 + scaled.ascent();
            let mut caret = x as f32;
            let mut prev = None;
            for ch in text.chars() {
                let id = scaled.glyph_id(ch);
                if let Some(p) = prev {
                    caret += scaled.kern(p, id);
                }
                let glyph = id.with_scale_and_position(scaled.scale(), point(caret, baseline));
                if let Some(outline) = face.outline_glyph(glyph) {
                    let bounds = outline.px_bounds();
                    outline.draw(|gx, gy, coverage| {
                        canvas.blend_ink(
                            bounds.min.x as i64 + gx as i64,
                            bounds.min.y as i64 + gy as i64,
                            color,
                            coverage,
                        );
                    });
                }
                caret += scaled.h_advance(id);
                prev = Some(id);
            }
        }
        None => {
            let advance = font.size * 0.6;
            let glyph_w = (advance * 0.8).max(1.0) as u32;
            let glyph_h = font.ascent().max(1.0) as u32;
            let mut caret = x as f32;
            for ch in text.chars() {
                if !ch.is_whitespace() {
                    canvas.fill_rect(caret as i64, y, glyph_w, glyph_h, color);
                }
                caret += advance;
            }
        }
    }
}
