//! End-to-end render passes over small in-memory designs.

use std::cell::Cell;

use chrono::{Local, TimeZone};

use inkframe::content::calendar::CalendarProvider;
use inkframe::content::weather::{StyleCatalog, WeatherProvider, WeatherReport};
use inkframe::content::{FixedClock, ResolveMode};
use inkframe::{
    Align, Canvas, Design, InkframeError, InkframeResult, MemoryResourceStore, Module, ModuleKind,
    PixelFormat, Position, RenderContext, ResourceStore, Size, TextOptions, Viewport, render,
};

struct NoWeather;

impl WeatherProvider for NoWeather {
    fn forecast(&self, _lat: f64, _lon: f64) -> InkframeResult<WeatherReport> {
        Err(InkframeError::source("unavailable"))
    }
}

struct NoCalendar;

impl CalendarProvider for NoCalendar {
    fn fetch_ics(&self, _url: &str) -> InkframeResult<String> {
        Err(InkframeError::source("unavailable"))
    }
}

/// Wraps a store and counts font lookups, to assert culling short-circuits.
struct CountingStore<'a> {
    inner: &'a MemoryResourceStore,
    font_lookups: Cell<u32>,
}

impl<'a> CountingStore<'a> {
    fn new(inner: &'a MemoryResourceStore) -> Self {
        Self {
            inner,
            font_lookups: Cell::new(0),
        }
    }
}

impl ResourceStore for CountingStore<'_> {
    fn get_font(&self, name: &str) -> InkframeResult<Option<Vec<u8>>> {
        self.font_lookups.set(self.font_lookups.get() + 1);
        self.inner.get_font(name)
    }

    fn get_image(&self, name: &str) -> InkframeResult<Option<Vec<u8>>> {
        self.inner.get_image(name)
    }
}

fn text_module(content: &str, x: i64, y: i64, w: u32, h: u32) -> Module {
    Module {
        kind: ModuleKind::Text,
        position: Position { x, y },
        size: Size {
            width: w,
            height: h,
        },
        content: content.to_string(),
        text: TextOptions::default(),
    }
}

fn design(modules: Vec<Module>) -> Design {
    Design {
        modules,
        resolution: (200, 100),
        name: "test".to_string(),
        timestamp: String::new(),
        active: true,
        keep_alive: false,
    }
}

fn ctx<'a>(
    resources: &'a dyn ResourceStore,
    styles: &'a StyleCatalog,
    clock: &'a FixedClock,
) -> RenderContext<'a> {
    RenderContext {
        viewport: Viewport::new(200, 100),
        format: PixelFormat::Mono,
        mode: ResolveMode::Authoritative,
        resources,
        weather: &NoWeather,
        calendar: &NoCalendar,
        styles,
        clock,
        default_font_path: None,
    }
}

fn clock() -> FixedClock {
    FixedClock(Local.with_ymd_and_hms(2026, 8, 31, 9, 30, 0).unwrap())
}

fn has_ink_in(canvas: &Canvas, x0: i64, y0: i64, w: i64, h: i64) -> bool {
    (y0..y0 + h).any(|y| (x0..x0 + w).any(|x| canvas.is_ink(x, y)))
}

#[test]
fn text_modules_ink_inside_their_boxes() {
    let store = MemoryResourceStore::new();
    let styles = StyleCatalog::default();
    let clock = clock();
    let design = design(vec![
        text_module("hello", 10, 10, 120, 25),
        text_module("world", 10, 50, 120, 25),
    ]);
    let canvas = render(&design, &ctx(&store, &styles, &clock)).unwrap();
    assert!(has_ink_in(&canvas, 10, 10, 120, 25));
    assert!(has_ink_in(&canvas, 10, 50, 120, 25));
    assert!(!has_ink_in(&canvas, 140, 0, 60, 100));
}

#[test]
fn later_modules_paint_over_earlier_ones() {
    let store = MemoryResourceStore::new();
    let styles = StyleCatalog::default();
    let clock = clock();
    let rule = |color: [u8; 3]| Module {
        kind: ModuleKind::Line,
        position: Position { x: 0, y: 0 },
        size: Size {
            width: 10,
            height: 10,
        },
        content: String::new(),
        text: TextOptions {
            color,
            ..TextOptions::default()
        },
    };
    let design = design(vec![rule([0, 0, 0]), rule([255, 255, 255])]);

    let mut ctx = ctx(&store, &styles, &clock);
    ctx.format = PixelFormat::Rgb;
    let canvas = render(&design, &ctx).unwrap();
    // The white rule drawn second wins.
    assert!(!canvas.is_ink(5, 5));
}

#[test]
fn offscreen_modules_never_touch_the_font_store() {
    let inner = MemoryResourceStore::new();
    let store = CountingStore::new(&inner);
    let styles = StyleCatalog::default();
    let clock = clock();
    let mut offscreen = text_module("invisible", 500, 500, 50, 20);
    offscreen.text.font = "custom.ttf".to_string();
    let design = design(vec![offscreen]);

    let canvas = render(&design, &ctx(&store, &styles, &clock)).unwrap();
    assert_eq!(store.font_lookups.get(), 0);
    assert!(canvas.data().iter().all(|&b| b == 255));
}

#[test]
fn datetime_module_renders_from_the_clock() {
    let store = MemoryResourceStore::new();
    let styles = StyleCatalog::default();
    let clock = clock();
    let design = design(vec![Module {
        kind: ModuleKind::Datetime(Default::default()),
        position: Position { x: 0, y: 0 },
        size: Size {
            width: 200,
            height: 25,
        },
        content: String::new(),
        text: TextOptions::default(),
    }]);
    let canvas = render(&design, &ctx(&store, &styles, &clock)).unwrap();
    assert!(has_ink_in(&canvas, 0, 0, 200, 25));
}

#[test]
fn invalid_design_is_rejected_up_front() {
    let store = MemoryResourceStore::new();
    let styles = StyleCatalog::default();
    let clock = clock();
    let mut bad = design(vec![text_module("x", 0, 0, 10, 10)]);
    bad.resolution = (0, 0);
    assert!(render(&bad, &ctx(&store, &styles, &clock)).is_err());
}

#[test]
fn weather_failure_degrades_to_no_data_text() {
    let store = MemoryResourceStore::new();
    let styles = StyleCatalog::default();
    let clock = clock();
    let design = design(vec![Module {
        kind: ModuleKind::Weather(Default::default()),
        position: Position { x: 0, y: 0 },
        size: Size {
            width: 200,
            height: 25,
        },
        content: String::new(),
        text: TextOptions {
            align: Align::Center,
            ..TextOptions::default()
        },
    }]);
    // The provider errors; the module still paints "No data" instead of
    // failing the pass.
    let canvas = render(&design, &ctx(&store, &styles, &clock)).unwrap();
    assert!(has_ink_in(&canvas, 0, 0, 200, 25));
}
