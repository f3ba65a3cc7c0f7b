//! Resolution behavior of an edge renderer across the connectivity matrix.

use std::cell::Cell;

use chrono::{Local, TimeZone};

use inkframe::content::calendar::CalendarProvider;
use inkframe::content::weather::{
    DailyForecast, StyleCatalog, WEATHER_NO_DATA, WeatherProvider, WeatherReport,
};
use inkframe::content::{Connectivity, FixedClock, ResolveContext, ResolveMode, ResolvedContent, resolve};
use inkframe::{
    DatetimeOptions, InkframeError, InkframeResult, Module, ModuleKind, Position, Size,
    TextOptions, TimerOptions, WeatherOptions,
};

/// A provider that records whether it was called and answers with a fixed
/// report.
struct RecordingWeather {
    called: Cell<bool>,
}

impl RecordingWeather {
    fn new() -> Self {
        Self {
            called: Cell::new(false),
        }
    }

    fn report() -> WeatherReport {
        WeatherReport {
            current_temp: 17.0,
            current_code: 0,
            current_desc: "Clear sky".to_string(),
            current_icon: "clear_day.png".to_string(),
            daily: vec![DailyForecast {
                date: "2026-09-01".to_string(),
                weekday: "Tuesday".to_string(),
                min: 10.0,
                max: 20.0,
                desc: "Clear sky".to_string(),
                icon: "clear_day.png".to_string(),
            }],
            hourly: Vec::new(),
            sunrise: String::new(),
            sunset: String::new(),
        }
    }
}

impl WeatherProvider for RecordingWeather {
    fn forecast(&self, _lat: f64, _lon: f64) -> InkframeResult<WeatherReport> {
        self.called.set(true);
        Ok(Self::report())
    }
}

struct NoCalendar;

impl CalendarProvider for NoCalendar {
    fn fetch_ics(&self, _url: &str) -> InkframeResult<String> {
        Err(InkframeError::source("unavailable"))
    }
}

fn module(kind: ModuleKind) -> Module {
    Module {
        kind,
        position: Position { x: 0, y: 0 },
        size: Size {
            width: 100,
            height: 20,
        },
        content: "baked".to_string(),
        text: TextOptions::default(),
    }
}

fn clock() -> FixedClock {
    FixedClock(Local.with_ymd_and_hms(2026, 8, 31, 10, 0, 0).unwrap())
}

fn resolve_with(
    m: &Module,
    mode: ResolveMode,
    weather: &RecordingWeather,
    clock: &FixedClock,
) -> String {
    let styles = StyleCatalog::default();
    let ctx = ResolveContext {
        mode,
        weather,
        calendar: &NoCalendar,
        styles: &styles,
        clock,
    };
    match resolve(m, &ctx) {
        ResolvedContent::Text(s) => s,
        other => panic!("expected text content, got {other:?}"),
    }
}

fn weather_module(offline_sync: bool) -> Module {
    module(ModuleKind::Weather(WeatherOptions {
        offline_sync,
        ..WeatherOptions::default()
    }))
}

#[test]
fn flagged_weather_with_reachable_source_uses_baked_content() {
    let weather = RecordingWeather::new();
    let clock = clock();
    let mode = ResolveMode::Replica(Connectivity {
        source_reachable: true,
        internet_reachable: true,
    });
    let out = resolve_with(&weather_module(true), mode, &weather, &clock);
    assert_eq!(out, "baked");
    assert!(!weather.called.get());
}

#[test]
fn flagged_weather_fetches_directly_when_only_internet_is_up() {
    let weather = RecordingWeather::new();
    let clock = clock();
    let mode = ResolveMode::Replica(Connectivity {
        source_reachable: false,
        internet_reachable: true,
    });
    let out = resolve_with(&weather_module(true), mode, &weather, &clock);
    assert_eq!(out, "Temp: 17.0°C");
    assert!(weather.called.get());
}

#[test]
fn flagged_weather_fully_offline_is_no_data() {
    let weather = RecordingWeather::new();
    let clock = clock();
    let mode = ResolveMode::Replica(Connectivity::offline());
    let out = resolve_with(&weather_module(true), mode, &weather, &clock);
    assert_eq!(out, WEATHER_NO_DATA);
    assert!(!weather.called.get());
}

#[test]
fn unflagged_weather_always_uses_baked_content() {
    let weather = RecordingWeather::new();
    let clock = clock();
    for mode in [
        ResolveMode::Replica(Connectivity::online()),
        ResolveMode::Replica(Connectivity::offline()),
        ResolveMode::Replica(Connectivity {
            source_reachable: false,
            internet_reachable: true,
        }),
    ] {
        let out = resolve_with(&weather_module(false), mode, &weather, &clock);
        assert_eq!(out, "baked");
    }
    assert!(!weather.called.get());
}

#[test]
fn authoritative_weather_fetches_and_styles() {
    let weather = RecordingWeather::new();
    let clock = clock();
    let out = resolve_with(
        &weather_module(false),
        ResolveMode::Authoritative,
        &weather,
        &clock,
    );
    assert_eq!(out, "17.0°C Clear sky\nTuesday: 10-20°C Clear sky");
    assert!(weather.called.get());
}

#[test]
fn flagged_clock_modules_track_local_time_even_fully_offline() {
    let weather = RecordingWeather::new();
    let clock = clock();
    let mode = ResolveMode::Replica(Connectivity::offline());

    let dt = module(ModuleKind::Datetime(DatetimeOptions {
        format: "YYYY-MM-DD HH:mm".to_string(),
        offline_sync: true,
    }));
    assert_eq!(resolve_with(&dt, mode, &weather, &clock), "2026-08-31 10:00");

    let timer = module(ModuleKind::Timer(TimerOptions {
        target: "2026-09-01 10:00:00".to_string(),
        format: "D days, HH:MM:SS".to_string(),
        offline_sync: true,
    }));
    assert_eq!(
        resolve_with(&timer, mode, &weather, &clock),
        "1 days, 00:00:00"
    );
}

#[test]
fn unflagged_clock_modules_show_baked_content_on_a_replica() {
    let weather = RecordingWeather::new();
    let clock = clock();
    let mode = ResolveMode::Replica(Connectivity::online());

    let dt = module(ModuleKind::Datetime(DatetimeOptions::default()));
    assert_eq!(resolve_with(&dt, mode, &weather, &clock), "baked");

    let timer = module(ModuleKind::Timer(TimerOptions::default()));
    assert_eq!(resolve_with(&timer, mode, &weather, &clock), "baked");
}

#[test]
fn calendar_on_a_replica_always_uses_baked_content() {
    let weather = RecordingWeather::new();
    let clock = clock();
    let cal = module(ModuleKind::Calendar(Default::default()));
    for mode in [
        ResolveMode::Replica(Connectivity::online()),
        ResolveMode::Replica(Connectivity::offline()),
    ] {
        assert_eq!(resolve_with(&cal, mode, &weather, &clock), "baked");
    }
}
