//! The design document model.
//!
//! A design is the full layout description for one display frame: a list of
//! positioned modules plus the document resolution. Module kinds form a closed
//! enum so that each kind's configuration is structurally checked instead of
//! being fished out of a string map at render time.

use serde::{Deserialize, Serialize};

use crate::foundation::error::{InkframeError, InkframeResult};
use crate::foundation::geometry::{Position, Size};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Design {
    pub modules: Vec<Module>,
    /// Document surface size as (width, height).
    pub resolution: (u32, u32),
    pub name: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub keep_alive: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Module {
    #[serde(flatten)]
    pub kind: ModuleKind,
    pub position: Position,
    pub size: Size,
    /// The last authoritative resolution of this module, as baked into the
    /// document by the serving side. Input only: a render pass never writes
    /// it back, and for locally computable kinds it is ignored entirely.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub text: TextOptions,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModuleKind {
    Text,
    News,
    Datetime(DatetimeOptions),
    Timer(TimerOptions),
    Weather(WeatherOptions),
    Calendar(CalendarOptions),
    Image(ImageOptions),
    Line,
}

impl ModuleKind {
    /// Kinds whose resolved content is a display string laid out as text.
    pub fn is_text(&self) -> bool {
        !matches!(self, Self::Image(_) | Self::Line)
    }
}

/// Text presentation shared by every text-bearing module kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextOptions {
    /// Named font resource; empty selects the configured default font.
    pub font: String,
    pub size: u32,
    pub bold: bool,
    pub italic: bool,
    pub strike: bool,
    pub align: Align,
    /// Text color, used by RGB targets; monochrome targets always ink black.
    pub color: [u8; 3],
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            font: String::new(),
            size: 18,
            bold: false,
            italic: false,
            strike: false,
            align: Align::Left,
            color: [0, 0, 0],
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatetimeOptions {
    /// Template with `YYYY`, `MM`, `DD`, `HH`, `mm`, `ss` tokens.
    pub format: String,
    /// Recompute from the local clock on an edge renderer regardless of
    /// source reachability.
    pub offline_sync: bool,
}

impl Default for DatetimeOptions {
    fn default() -> Self {
        Self {
            format: "YYYY-MM-DD HH:mm".to_string(),
            offline_sync: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerOptions {
    /// Countdown target, `YYYY-MM-DD HH:mm:ss` in local time.
    pub target: String,
    /// Template with `D` (whole days), `HH`, `MM`, `SS` tokens.
    pub format: String,
    pub offline_sync: bool,
}

impl Default for TimerOptions {
    fn default() -> Self {
        Self {
            target: "2025-01-01 00:00:00".to_string(),
            format: "D days, HH:MM:SS".to_string(),
            offline_sync: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherOptions {
    pub latitude: f64,
    pub longitude: f64,
    /// Named style template from the style catalog.
    pub style: String,
    pub offline_sync: bool,
}

impl Default for WeatherOptions {
    fn default() -> Self {
        Self {
            latitude: 52.52,
            longitude: 13.41,
            style: "default".to_string(),
            offline_sync: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarOptions {
    pub url: String,
    pub max_events: usize,
}

impl Default for CalendarOptions {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_events: 5,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageOptions {
    /// Named raster resource in the resource store.
    pub image: String,
    /// Source crop rectangle; `None` means the image's full bounds.
    pub crop: Option<CropRect>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Design {
    pub fn from_json(json: &str) -> InkframeResult<Self> {
        let design: Design = serde_json::from_str(json)
            .map_err(|e| InkframeError::validation(format!("invalid design json: {e}")))?;
        design.validate()?;
        Ok(design)
    }

    pub fn from_path(path: &std::path::Path) -> InkframeResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            InkframeError::source(format!("failed to read design '{}': {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> InkframeResult<()> {
        if self.resolution.0 == 0 || self.resolution.1 == 0 {
            return Err(InkframeError::validation(
                "design resolution width/height must be > 0",
            ));
        }
        for (i, m) in self.modules.iter().enumerate() {
            if let ModuleKind::Weather(w) = &m.kind {
                if !(-90.0..=90.0).contains(&w.latitude)
                    || !(-180.0..=180.0).contains(&w.longitude)
                {
                    return Err(InkframeError::validation(format!(
                        "module {i}: weather coordinates out of range"
                    )));
                }
            }
            if m.text.size == 0 && m.kind.is_text() {
                return Err(InkframeError::validation(format!(
                    "module {i}: font size must be > 0"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic_design() -> Design {
        Design {
            modules: vec![
                Module {
                    kind: ModuleKind::Text,
                    position: Position { x: 210, y: 170 },
                    size: Size {
                        width: 200,
                        height: 60,
                    },
                    content: "hello panel".to_string(),
                    text: TextOptions::default(),
                },
                Module {
                    kind: ModuleKind::Datetime(DatetimeOptions::default()),
                    position: Position { x: 210, y: 240 },
                    size: Size {
                        width: 200,
                        height: 30,
                    },
                    content: String::new(),
                    text: TextOptions {
                        align: Align::Center,
                        ..TextOptions::default()
                    },
                },
            ],
            resolution: (800, 480),
            name: "Default Design".to_string(),
            timestamp: "initial".to_string(),
            active: true,
            keep_alive: false,
        }
    }

    #[test]
    fn json_roundtrip() {
        let design = basic_design();
        let s = serde_json::to_string_pretty(&design).unwrap();
        let de = Design::from_json(&s).unwrap();
        assert_eq!(de.modules.len(), 2);
        assert_eq!(de.resolution, (800, 480));
        assert!(matches!(de.modules[1].kind, ModuleKind::Datetime(_)));
    }

    #[test]
    fn kind_tag_and_defaults_deserialize() {
        let json = r#"{
            "modules": [
                {
                    "type": "timer",
                    "position": {"x": 0, "y": 0},
                    "size": {"width": 100, "height": 20}
                },
                {
                    "type": "line",
                    "position": {"x": 0, "y": 30},
                    "size": {"width": 100, "height": 2}
                }
            ],
            "resolution": [800, 480],
            "name": "t"
        }"#;
        let de = Design::from_json(json).unwrap();
        let ModuleKind::Timer(opts) = &de.modules[0].kind else {
            panic!("expected timer module");
        };
        assert_eq!(opts.format, "D days, HH:MM:SS");
        assert!(!opts.offline_sync);
        assert_eq!(de.modules[0].text.size, 18);
        assert!(matches!(de.modules[1].kind, ModuleKind::Line));
    }

    #[test]
    fn validate_rejects_zero_resolution() {
        let mut design = basic_design();
        design.resolution = (0, 480);
        assert!(design.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_coordinates() {
        let mut design = basic_design();
        design.modules[0].kind = ModuleKind::Weather(WeatherOptions {
            latitude: 123.0,
            ..WeatherOptions::default()
        });
        assert!(design.validate().is_err());
    }
}
