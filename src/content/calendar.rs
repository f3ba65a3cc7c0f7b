//! Calendar module resolution.
//!
//! An ICS feed is fetched, timed events are filtered to the future, sorted and
//! truncated, then flattened to one line per event. Feeds in the wild are
//! messy; the parser here reads only what the agenda line needs (DTSTART and
//! SUMMARY of timed VEVENTs) and skips everything else.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

use crate::foundation::error::InkframeResult;
use crate::model::CalendarOptions;

pub const CALENDAR_NO_EVENTS: &str = "No events";

pub trait CalendarProvider {
    fn fetch_ics(&self, url: &str) -> InkframeResult<String>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct CalendarEvent {
    pub start: DateTime<Local>,
    pub summary: String,
}

/// Rewrite the `webcal://` subscription scheme to plain HTTPS.
pub fn normalize_webcal(url: &str) -> String {
    let prefix_len = "webcal://".len();
    if url.len() >= prefix_len && url[..prefix_len].eq_ignore_ascii_case("webcal://") {
        format!("https://{}", &url[prefix_len..])
    } else {
        url.to_string()
    }
}

/// Unfold RFC 5545 continuation lines (a line starting with space or tab
/// continues the previous line).
fn unfold(ics: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for raw in ics.lines() {
        if (raw.starts_with(' ') || raw.starts_with('\t')) && !lines.is_empty() {
            let cont = &raw[1..];
            if let Some(last) = lines.last_mut() {
                last.push_str(cont);
            }
        } else {
            lines.push(raw.trim_end_matches('\r').to_string());
        }
    }
    lines
}

fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(escaped) => out.push(escaped),
            None => out.push('\\'),
        }
    }
    out
}

/// Parse one DTSTART property value into a local timestamp.
///
/// Date-only starts (all-day events) return `None`: without a time of day they
/// cannot be slotted into the agenda line format. A TZID parameter is ignored
/// and the naive value read as local time, which is correct for feeds in the
/// panel's own zone and a bounded error elsewhere.
fn parse_dtstart(params: &str, value: &str) -> Option<DateTime<Local>> {
    if params.contains("VALUE=DATE") && !params.contains("VALUE=DATE-TIME") {
        return None;
    }
    if value.len() == 8 && value.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if let Some(stripped) = value.strip_suffix('Z') {
        let naive = NaiveDateTime::parse_from_str(stripped, "%Y%m%dT%H%M%S").ok()?;
        return Some(Utc.from_utc_datetime(&naive).with_timezone(&Local));
    }
    let naive = NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%S").ok()?;
    Local.from_local_datetime(&naive).earliest()
}

/// Extract timed events from an ICS document.
pub fn parse_events(ics: &str) -> Vec<CalendarEvent> {
    let mut events = Vec::new();
    let mut in_event = false;
    let mut start: Option<DateTime<Local>> = None;
    let mut summary: Option<String> = None;

    for line in unfold(ics) {
        if line == "BEGIN:VEVENT" {
            in_event = true;
            start = None;
            summary = None;
            continue;
        }
        if line == "END:VEVENT" {
            if let Some(s) = start.take() {
                events.push(CalendarEvent {
                    start: s,
                    summary: summary.take().unwrap_or_default(),
                });
            }
            in_event = false;
            continue;
        }
        if !in_event {
            continue;
        }
        let Some((name_params, value)) = line.split_once(':') else {
            continue;
        };
        let (name, params) = match name_params.split_once(';') {
            Some((n, p)) => (n, p),
            None => (name_params, ""),
        };
        match name {
            "DTSTART" => start = parse_dtstart(params, value),
            "SUMMARY" => summary = Some(unescape_text(value)),
            _ => {}
        }
    }
    events
}

/// Filter to events starting at or after `now`, soonest first, at most `max`.
pub fn upcoming_events(ics: &str, now: DateTime<Local>, max: usize) -> Vec<CalendarEvent> {
    let mut events: Vec<CalendarEvent> = parse_events(ics)
        .into_iter()
        .filter(|e| e.start >= now)
        .collect();
    events.sort_by_key(|e| e.start);
    events.truncate(max);
    events
}

pub fn format_events(events: &[CalendarEvent]) -> String {
    events
        .iter()
        .map(|e| format!("{} - {}", e.start.format("%Y-%m-%d %H:%M"), e.summary))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Resolve a calendar module's agenda text. A fetch failure, unparsable feed
/// or empty upcoming window all collapse to [`CALENDAR_NO_EVENTS`].
pub fn resolve_calendar(
    opts: &CalendarOptions,
    provider: &dyn CalendarProvider,
    now: DateTime<Local>,
) -> String {
    let url = normalize_webcal(&opts.url);
    let ics = match provider.fetch_ics(&url) {
        Ok(ics) => ics,
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "calendar fetch failed");
            return CALENDAR_NO_EVENTS.to_string();
        }
    };
    let events = upcoming_events(&ics, now, opts.max_events);
    if events.is_empty() {
        return CALENDAR_NO_EVENTS.to_string();
    }
    format_events(&events)
}
