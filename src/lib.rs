//! Inkframe drives a fixed-resolution e-ink signage panel from a declarative
//! "design" document: a list of rectangular content modules (text, weather,
//! clock, countdown, calendar, image, divider) positioned on a canvas.
//!
//! The public API is a pure render pass:
//!
//! - Load and validate a [`Design`]
//! - Build a [`RenderContext`] carrying connectivity state, resource stores and
//!   data providers
//! - Call [`render`] to obtain a panel-ready [`Canvas`]
//!
//! Content for each module is resolved fresh on every pass and degrades
//! per-module when a data source is unreachable or its input is malformed; a
//! single bad module never aborts the frame.
#![forbid(unsafe_code)]

pub mod assets;
pub mod content;
pub mod foundation;
pub mod net;
pub mod render;
pub mod sync;

pub mod model;

pub use crate::foundation::error::{InkframeError, InkframeResult};
pub use crate::foundation::geometry::{Position, Size, Viewport};

pub use crate::assets::font::{FontOrigin, FontResolver, ResolvedFont};
pub use crate::assets::store::{DirResourceStore, MemoryResourceStore, ResourceStore};
pub use crate::content::calendar::CalendarProvider;
pub use crate::content::weather::{StyleCatalog, WeatherProvider, WeatherReport};
pub use crate::content::{
    Clock, Connectivity, FixedClock, ResolveContext, ResolveMode, ResolvedContent, SystemClock,
    resolve,
};
pub use crate::model::{
    Align, CalendarOptions, CropRect, DatetimeOptions, Design, ImageOptions, Module, ModuleKind,
    TextOptions, TimerOptions, WeatherOptions,
};
pub use crate::render::canvas::{Canvas, PixelFormat};
pub use crate::render::pipeline::{RenderContext, render};
pub use crate::sync::{DesignFetcher, DesignOrigin, DocumentSource};
