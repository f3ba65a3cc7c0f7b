//! Font resolution with a layered fallback chain.
//!
//! A named font is looked up in the resource store first, then the configured
//! default font file, then a built-in fixed-metric face. Resolution never
//! fails: text must render even on a box with no fonts installed, just not
//! prettily.

use std::collections::HashMap;
use std::path::PathBuf;

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};

use crate::assets::store::ResourceStore;

/// The conventional default face on the target panels.
pub const DEFAULT_FONT_PATH: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf";

/// Built-in face metrics, expressed as fractions of the point size.
const BUILTIN_ADVANCE: f32 = 0.6;
const BUILTIN_ASCENT: f32 = 0.8;

/// Which tier of the fallback chain produced a font.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontOrigin {
    /// The requested named resource.
    Named,
    /// The configured default font file.
    Default,
    /// The built-in fixed-metric face.
    Builtin,
}

/// A loaded face pinned to one pixel size.
#[derive(Clone, Debug)]
pub struct ResolvedFont {
    face: Option<FontArc>,
    pub size: f32,
    pub origin: FontOrigin,
}

impl ResolvedFont {
    pub fn builtin(size: f32) -> Self {
        Self {
            face: None,
            size,
            origin: FontOrigin::Builtin,
        }
    }

    pub fn face(&self) -> Option<&FontArc> {
        self.face.as_ref()
    }

    /// Horizontal advance of a string at this font's size, with kerning.
    pub fn advance(&self, text: &str) -> f32 {
        match &self.face {
            Some(face) => {
                let scaled = face.as_scaled(PxScale::from(self.size));
                let mut width = 0.0;
                let mut prev = None;
                for ch in text.chars() {
                    let id = scaled.glyph_id(ch);
                    if let Some(p) = prev {
                        width += scaled.kern(p, id);
                    }
                    width += scaled.h_advance(id);
                    prev = Some(id);
                }
                width
            }
            None => text.chars().count() as f32 * self.size * BUILTIN_ADVANCE,
        }
    }

    pub fn ascent(&self) -> f32 {
        match &self.face {
            Some(face) => face.as_scaled(PxScale::from(self.size)).ascent(),
            None => self.size * BUILTIN_ASCENT,
        }
    }
}

/// Resolves named fonts through the store, caching per (name, size).
pub struct FontResolver<'a> {
    store: &'a dyn ResourceStore,
    default_font_path: Option<PathBuf>,
    cache: HashMap<(String, u32), ResolvedFont>,
}

impl<'a> FontResolver<'a> {
    pub fn new(store: &'a dyn ResourceStore, default_font_path: Option<PathBuf>) -> Self {
        Self {
            store,
            default_font_path,
            cache: HashMap::new(),
        }
    }

    /// Resolve `name` at `size` pixels, walking the fallback chain. An empty
    /// name skips straight to the default tier.
    pub fn resolve(&mut self, name: &str, size: u32) -> ResolvedFont {
        let key = (name.to_string(), size);
        if let Some(cached) = self.cache.get(&key) {
            return cached.clone();
        }
        let resolved = self.load(name, size);
        self.cache.insert(key, resolved.clone());
        resolved
    }

    fn load(&self, name: &str, size: u32) -> ResolvedFont {
        let size = size as f32;
        if !name.is_empty() {
            match self.store.get_font(name) {
                Ok(Some(bytes)) => match FontArc::try_from_vec(bytes) {
                    Ok(face) => {
                        return ResolvedFont {
                            face: Some(face),
                            size,
                            origin: FontOrigin::Named,
                        };
                    }
                    Err(e) => {
                        tracing::warn!(font = name, error = %e, "font bytes unparsable");
                    }
                },
                Ok(None) => {
                    tracing::debug!(font = name, "font not in store, falling back");
                }
                Err(e) => {
                    tracing::warn!(font = name, error = %e, "font store lookup failed");
                }
            }
        }

        if let Some(path) = &self.default_font_path {
            match std::fs::read(path) {
                Ok(bytes) => match FontArc::try_from_vec(bytes) {
                    Ok(face) => {
                        return ResolvedFont {
                            face: Some(face),
                            size,
                            origin: FontOrigin::Default,
                        };
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "default font unparsable");
                    }
                },
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "default font unreadable");
                }
            }
        }

        ResolvedFont::builtin(size)
    }
}
