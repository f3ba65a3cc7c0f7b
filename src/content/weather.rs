//! Weather module resolution.
//!
//! A provider returns the raw forecast; a numeric weather code is mapped to a
//! (description, icon) pair via fixed day/night tables; a named style template
//! turns the report into display text. Every failure mode collapses to the
//! fixed [`WEATHER_NO_DATA`] string for this module only.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::content::{Connectivity, ResolveMode};
use crate::foundation::error::{InkframeError, InkframeResult};
use crate::model::WeatherOptions;

pub const WEATHER_NO_DATA: &str = "No data";

/// Forecast fields the render core consumes, provider-agnostic.
#[derive(Clone, Debug, PartialEq)]
pub struct WeatherReport {
    pub current_temp: f64,
    pub current_code: u32,
    pub current_desc: String,
    pub current_icon: String,
    pub daily: Vec<DailyForecast>,
    pub hourly: Vec<HourlySample>,
    pub sunrise: String,
    pub sunset: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DailyForecast {
    pub date: String,
    pub weekday: String,
    pub min: f64,
    pub max: f64,
    pub desc: String,
    pub icon: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HourlySample {
    pub time: String,
    pub temp: f64,
    pub desc: String,
    pub icon: String,
    pub precipitation: f64,
}

pub trait WeatherProvider {
    fn forecast(&self, latitude: f64, longitude: f64) -> InkframeResult<WeatherReport>;
}

/// Map a WMO weather code to a (description, icon) pair.
pub fn code_to_desc_icon(code: u32, night: bool) -> (&'static str, &'static str) {
    let day: &[(u32, (&str, &str))] = &[
        (0, ("Clear sky", "clear_day.png")),
        (1, ("Mainly clear", "clear_day.png")),
        (2, ("Partly cloudy", "cloudy_day.png")),
        (3, ("Overcast", "cloudy_day.png")),
        (45, ("Fog", "fog_day.png")),
        (48, ("Rime fog", "fog_day.png")),
        (51, ("Light drizzle", "drizzle_day.png")),
        (61, ("Slight rain", "rain_day.png")),
        (63, ("Moderate rain", "rain_day.png")),
        (65, ("Heavy rain", "rain_day.png")),
        (80, ("Rain showers", "shower_day.png")),
    ];
    let night_table: &[(u32, (&str, &str))] = &[
        (0, ("Clear sky", "clear_night.png")),
        (1, ("Mainly clear", "clear_night.png")),
        (2, ("Partly cloudy", "cloudy_night.png")),
        (3, ("Overcast", "cloudy_night.png")),
        (45, ("Fog", "fog_night.png")),
        (48, ("Rime fog", "fog_night.png")),
        (51, ("Light drizzle", "drizzle_night.png")),
        (61, ("Slight rain", "rain_night.png")),
        (63, ("Moderate rain", "rain_night.png")),
        (65, ("Heavy rain", "rain_night.png")),
        (80, ("Rain showers", "shower_night.png")),
    ];

    if night {
        if let Some((_, pair)) = night_table.iter().find(|(c, _)| *c == code) {
            return *pair;
        }
    }
    day.iter()
        .find(|(c, _)| *c == code)
        .map(|(_, pair)| *pair)
        .unwrap_or(("Unknown", "cloudy_day.png"))
}

/// Wire shape of the open-meteo forecast endpoint (the fields we request).
#[derive(Clone, Debug, Deserialize)]
pub struct ForecastResponse {
    pub current_weather: Option<CurrentWeather>,
    pub daily: Option<DailyBlock>,
    pub hourly: Option<HourlyBlock>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CurrentWeather {
    pub temperature: f64,
    pub weathercode: u32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DailyBlock {
    pub time: Vec<String>,
    pub weathercode: Vec<u32>,
    pub temperature_2m_max: Vec<f64>,
    pub temperature_2m_min: Vec<f64>,
    #[serde(default)]
    pub sunrise: Vec<String>,
    #[serde(default)]
    pub sunset: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct HourlyBlock {
    pub time: Vec<String>,
    pub temperature_2m: Vec<f64>,
    pub weathercode: Vec<u32>,
    pub precipitation: Vec<f64>,
}

/// Reshape a raw forecast response into a [`WeatherReport`].
///
/// Hourly samples are thinned to every second hour, matching what the panel
/// styles can actually show.
pub fn report_from_response(resp: &ForecastResponse) -> InkframeResult<WeatherReport> {
    let current = resp
        .current_weather
        .as_ref()
        .ok_or_else(|| InkframeError::content("forecast response missing current_weather"))?;
    let daily_block = resp
        .daily
        .as_ref()
        .ok_or_else(|| InkframeError::content("forecast response missing daily block"))?;

    let (desc, icon) = code_to_desc_icon(current.weathercode, false);

    let days = daily_block
        .time
        .len()
        .min(daily_block.weathercode.len())
        .min(daily_block.temperature_2m_max.len())
        .min(daily_block.temperature_2m_min.len());
    let mut daily = Vec::with_capacity(days);
    for i in 0..days {
        let date = &daily_block.time[i];
        let weekday = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map(|d| d.format("%A").to_string())
            .map_err(|e| InkframeError::content(format!("bad daily date '{date}': {e}")))?;
        let (d, ic) = code_to_desc_icon(daily_block.weathercode[i], false);
        daily.push(DailyForecast {
            date: date.clone(),
            weekday,
            min: daily_block.temperature_2m_min[i],
            max: daily_block.temperature_2m_max[i],
            desc: d.to_string(),
            icon: ic.to_string(),
        });
    }

    let mut hourly = Vec::new();
    if let Some(h) = &resp.hourly {
        let n = h
            .time
            .len()
            .min(h.temperature_2m.len())
            .min(h.weathercode.len())
            .min(h.precipitation.len());
        for i in (0..n).step_by(2) {
            let (d, ic) = code_to_desc_icon(h.weathercode[i], false);
            // ISO stamps like "2026-08-30T14:00"; keep the HH:MM tail.
            let time = h.time[i].get(11..16).unwrap_or(&h.time[i]).to_string();
            hourly.push(HourlySample {
                time,
                temp: h.temperature_2m[i],
                desc: d.to_string(),
                icon: ic.to_string(),
                precipitation: h.precipitation[i],
            });
        }
    }

    Ok(WeatherReport {
        current_temp: current.temperature,
        current_code: current.weathercode,
        current_desc: desc.to_string(),
        current_icon: icon.to_string(),
        daily,
        hourly,
        sunrise: daily_block.sunrise.first().cloned().unwrap_or_default(),
        sunset: daily_block.sunset.first().cloned().unwrap_or_default(),
    })
}

/// Named display templates for the weather module. A template substitutes
/// `{current_temp}`, `{current_desc}` and `{daily_forecast}`.
#[derive(Clone, Debug)]
pub struct StyleCatalog {
    styles: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize, Serialize)]
struct StyleFile {
    format: String,
}

impl Default for StyleCatalog {
    fn default() -> Self {
        let mut styles = BTreeMap::new();
        styles.insert(
            "default".to_string(),
            "{current_temp}°C {current_desc}\n{daily_forecast}".to_string(),
        );
        Self { styles }
    }
}

impl StyleCatalog {
    /// Load `<name>.json` style files (`{"format": "..."}`) from a directory,
    /// layered over the built-in default style.
    pub fn from_dir(dir: &Path) -> InkframeResult<Self> {
        let mut catalog = Self::default();
        let entries = std::fs::read_dir(dir).map_err(|e| {
            InkframeError::source(format!("failed to read style dir '{}': {e}", dir.display()))
        })?;
        for entry in entries {
            let entry = entry.map_err(|e| InkframeError::source(e.to_string()))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let raw = std::fs::read_to_string(&path)
                .map_err(|e| InkframeError::source(format!("read '{}': {e}", path.display())))?;
            match serde_json::from_str::<StyleFile>(&raw) {
                Ok(style) => {
                    catalog.styles.insert(name.to_string(), style.format);
                }
                Err(e) => {
                    tracing::warn!(file = %path.display(), error = %e, "skipping bad style file");
                }
            }
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, name: impl Into<String>, template: impl Into<String>) {
        self.styles.insert(name.into(), template.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.styles.get(name).map(String::as_str)
    }
}

/// Current-temperature display form: whole-degree readings keep one decimal
/// ("17.0"), fractional readings print as-is.
fn display_temp(t: f64) -> String {
    if t.fract() == 0.0 {
        format!("{t:.1}")
    } else {
        t.to_string()
    }
}

/// Apply a named style template to a report. An unknown style name yields
/// [`WEATHER_NO_DATA`], same as a failed fetch.
pub fn apply_style(catalog: &StyleCatalog, name: &str, report: &WeatherReport) -> String {
    let Some(template) = catalog.get(name) else {
        tracing::warn!(style = name, "unknown weather style");
        return WEATHER_NO_DATA.to_string();
    };

    let daily_forecast = report
        .daily
        .iter()
        .map(|d| format!("{}: {}-{}°C {}", d.weekday, d.min as i64, d.max as i64, d.desc))
        .collect::<Vec<_>>()
        .join("\n");

    template
        .replace("{current_temp}", &display_temp(report.current_temp))
        .replace("{current_desc}", &report.current_desc)
        .replace("{daily_forecast}", &daily_forecast)
}

/// Resolve a weather module's display text under the connectivity matrix.
///
/// Flagged modules on a replica fall back to a direct provider fetch only when
/// the authoritative source is down but the internet is independently
/// reachable; with no internet they show [`WEATHER_NO_DATA`]. Unflagged
/// modules always render the baked (possibly cached) content.
pub fn resolve_weather(
    opts: &WeatherOptions,
    baked_content: &str,
    mode: ResolveMode,
    provider: &dyn WeatherProvider,
    styles: &StyleCatalog,
) -> String {
    match mode {
        ResolveMode::Authoritative => {
            match provider.forecast(opts.latitude, opts.longitude) {
                Ok(report) => apply_style(styles, &opts.style, &report),
                Err(e) => {
                    tracing::warn!(error = %e, "weather fetch failed");
                    WEATHER_NO_DATA.to_string()
                }
            }
        }
        ResolveMode::Replica(Connectivity {
            source_reachable: true,
            ..
        }) => baked_content.to_string(),
        ResolveMode::Replica(Connectivity {
            source_reachable: false,
            internet_reachable,
        }) => {
            if !opts.offline_sync {
                return baked_content.to_string();
            }
            if !internet_reachable {
                return WEATHER_NO_DATA.to_string();
            }
            // Simplified direct-fetch rendition: the replica has no style
            // catalog of its own.
            match provider.forecast(opts.latitude, opts.longitude) {
                Ok(report) => format!("Temp: {}°C", display_temp(report.current_temp)),
                Err(e) => {
                    tracing::warn!(error = %e, "direct weather fetch failed");
                    WEATHER_NO_DATA.to_string()
                }
            }
        }
    }
}
