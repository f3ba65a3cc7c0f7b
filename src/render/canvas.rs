//! The target pixel buffer.
//!
//! E-ink panels want either a 1-bit-per-pixel plane (stored here as one byte
//! per pixel, 0 or 255) or packed RGB. The canvas starts white (paper) and
//! modules ink onto it.

use std::io::Cursor;
use std::path::Path;

use image::{GrayImage, ImageFormat, RgbImage};

use crate::foundation::error::{InkframeError, InkframeResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    /// One byte per pixel, 0 (ink) or 255 (paper).
    Mono,
    /// Three bytes per pixel.
    Rgb,
}

impl PixelFormat {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Mono => 1,
            Self::Rgb => 3,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    data: Vec<u8>,
}

impl Canvas {
    /// A white canvas of the given dimensions.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        let len = width as usize * height as usize * format.bytes_per_pixel();
        Self {
            width,
            height,
            format,
            data: vec![255u8; len],
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * self.format.bytes_per_pixel()
    }

    fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    /// Set a pixel to a color, overwriting. Out-of-bounds writes are dropped.
    /// Mono targets threshold the color's luma.
    pub fn put_pixel(&mut self, x: i64, y: i64, color: [u8; 3]) {
        if !self.in_bounds(x, y) {
            return;
        }
        let i = self.index(x as u32, y as u32);
        match self.format {
            PixelFormat::Mono => {
                let luma =
                    (299 * color[0] as u32 + 587 * color[1] as u32 + 114 * color[2] as u32) / 1000;
                self.data[i] = if luma < 128 { 0 } else { 255 };
            }
            PixelFormat::Rgb => {
                self.data[i..i + 3].copy_from_slice(&color);
            }
        }
    }

    /// Blend ink onto a pixel with fractional coverage (glyph antialiasing).
    /// Mono targets have no gray: at least half coverage inks the pixel,
    /// anything less leaves it alone.
    pub fn blend_ink(&mut self, x: i64, y: i64, color: [u8; 3], coverage: f32) {
        if !self.in_bounds(x, y) || coverage <= 0.0 {
            return;
        }
        let i = self.index(x as u32, y as u32);
        match self.format {
            PixelFormat::Mono => {
                if coverage >= 0.5 {
                    self.data[i] = 0;
                }
            }
            PixelFormat::Rgb => {
                let a = coverage.min(1.0);
                for c in 0..3 {
                    let bg = self.data[i + c] as f32;
                    self.data[i + c] = (bg + (color[c] as f32 - bg) * a).round() as u8;
                }
            }
        }
    }

    /// Fill a rectangle, clipped to the canvas.
    pub fn fill_rect(&mut self, x: i64, y: i64, width: u32, height: u32, color: [u8; 3]) {
        for dy in 0..height as i64 {
            for dx in 0..width as i64 {
                self.put_pixel(x + dx, y + dy, color);
            }
        }
    }

    /// Whether a pixel is darker than paper. Out of bounds reads as false.
    pub fn is_ink(&self, x: i64, y: i64) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let i = self.index(x as u32, y as u32);
        match self.format {
            PixelFormat::Mono => self.data[i] == 0,
            PixelFormat::Rgb => self.data[i..i + 3].iter().any(|&c| c < 255),
        }
    }

    pub fn encode_png(&self) -> InkframeResult<Vec<u8>> {
        let mut out = Cursor::new(Vec::new());
        match self.format {
            PixelFormat::Mono => {
                let img = GrayImage::from_raw(self.width, self.height, self.data.clone())
                    .ok_or_else(|| InkframeError::render("canvas buffer size mismatch"))?;
                img.write_to(&mut out, ImageFormat::Png)
                    .map_err(|e| InkframeError::render(format!("png encode failed: {e}")))?;
            }
            PixelFormat::Rgb => {
                let img = RgbImage::from_raw(self.width, self.height, self.data.clone())
                    .ok_or_else(|| InkframeError::render("canvas buffer size mismatch"))?;
                img.write_to(&mut out, ImageFormat::Png)
                    .map_err(|e| InkframeError::render(format!("png encode failed: {e}")))?;
            }
        }
        Ok(out.into_inner())
    }

    pub fn save_png(&self, path: &Path) -> InkframeResult<()> {
        let png = self.encode_png()?;
        std::fs::write(path, png).map_err(|e| {
            InkframeError::render(format!("failed to write '{}': {e}", path.display()))
        })
    }
}
