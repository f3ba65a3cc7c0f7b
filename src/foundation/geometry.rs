//! Canvas geometry and the document-to-canvas coordinate translation.
//!
//! Module geometry in a design document is expressed in *document* coordinates
//! (the admin UI's drawing surface). The physical panel addresses a smaller
//! window into that surface, so every position is translated by a fixed
//! viewport offset before any bounds comparison or paint call.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i64,
    pub y: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

/// The panel's addressable area plus the fixed offset subtracted from document
/// coordinates to obtain canvas coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub offset_x: i64,
    pub offset_y: i64,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            offset_x: 0,
            offset_y: 0,
        }
    }

    pub fn with_offset(mut self, offset_x: i64, offset_y: i64) -> Self {
        self.offset_x = offset_x;
        self.offset_y = offset_y;
        self
    }

    /// The 7.5" panel geometry the original signage hardware uses.
    pub fn panel_7in5() -> Self {
        Self::new(800, 480).with_offset(200, 160)
    }

    /// Translate a document-coordinate position into canvas coordinates.
    pub fn translate(&self, pos: Position) -> (i64, i64) {
        (pos.x - self.offset_x, pos.y - self.offset_y)
    }

    /// Whether a module box at translated canvas coordinates touches the
    /// visible canvas at all. Fully offscreen modules are skipped before any
    /// layout or asset loading happens.
    pub fn is_visible(&self, x: i64, y: i64, size: Size) -> bool {
        !(x + i64::from(size.width) < 0
            || x > i64::from(self.width)
            || y + i64::from(size.height) < 0
            || y > i64::from(self.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_subtracts_offset() {
        let vp = Viewport::panel_7in5();
        let (x, y) = vp.translate(Position { x: 250, y: 200 });
        assert_eq!((x, y), (50, 40));
    }

    #[test]
    fn visible_inside_and_partial() {
        let vp = Viewport::new(800, 480);
        let sz = Size {
            width: 100,
            height: 50,
        };
        assert!(vp.is_visible(0, 0, sz));
        assert!(vp.is_visible(-50, -20, sz)); // partially overlapping
        assert!(vp.is_visible(750, 440, sz));
    }

    #[test]
    fn invisible_when_fully_outside() {
        let vp = Viewport::new(800, 480);
        let sz = Size {
            width: 100,
            height: 50,
        };
        assert!(!vp.is_visible(-101, 0, sz));
        assert!(!vp.is_visible(801, 0, sz));
        assert!(!vp.is_visible(0, -51, sz));
        assert!(!vp.is_visible(0, 481, sz));
    }
}
