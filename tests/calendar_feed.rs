//! Agenda resolution against a realistic ICS feed.

use chrono::{Local, TimeZone};

use inkframe::content::calendar::{
    CALENDAR_NO_EVENTS, CalendarProvider, resolve_calendar, upcoming_events,
};
use inkframe::{CalendarOptions, InkframeResult};

const FEED: &str = "\
BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//Test//Test//EN\r\n\
BEGIN:VEVENT\r\n\
UID:1@test\r\n\
DTSTART:20261005T183000\r\n\
DTEND:20261005T200000\r\n\
SUMMARY:Band practice\r\n\
LOCATION:Rehearsal room B\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:2@test\r\n\
DTSTART:20261003T091500\r\n\
SUMMARY:Standup with a very long title that\r\n\
\x20 folds across lines\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:3@test\r\n\
DTSTART;VALUE=DATE:20261004\r\n\
SUMMARY:Company holiday\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:4@test\r\n\
DTSTART:20250101T000000\r\n\
SUMMARY:Old event\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:5@test\r\n\
DTSTART:20261010T120000\r\n\
SUMMARY:Lunch\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:6@test\r\n\
DTSTART:20261011T120000\r\n\
SUMMARY:Review\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

struct Feed(&'static str);

impl CalendarProvider for Feed {
    fn fetch_ics(&self, _url: &str) -> InkframeResult<String> {
        Ok(self.0.to_string())
    }
}

fn now() -> chrono::DateTime<Local> {
    Local.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap()
}

#[test]
fn agenda_is_future_only_sorted_and_capped() {
    let events = upcoming_events(FEED, now(), 5);
    let summaries: Vec<&str> = events.iter().map(|e| e.summary.as_str()).collect();
    assert_eq!(
        summaries,
        [
            "Standup with a very long title that folds across lines",
            "Band practice",
            "Lunch",
            "Review",
        ]
    );

    let capped = upcoming_events(FEED, now(), 2);
    assert_eq!(capped.len(), 2);
    assert_eq!(capped[1].summary, "Band practice");
}

#[test]
fn resolved_agenda_lines_have_timestamp_prefix() {
    let opts = CalendarOptions {
        url: "https://example.com/team.ics".to_string(),
        max_events: 3,
    };
    let out = resolve_calendar(&opts, &Feed(FEED), now());
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("2026-10-03 09:15 - "));
    assert!(lines[1].starts_with("2026-10-05 18:30 - "));
    assert!(lines[2].starts_with("2026-10-10 12:00 - "));
}

#[test]
fn feed_with_only_past_or_all_day_events_is_no_events() {
    const QUIET: &str = "\
BEGIN:VCALENDAR\r\n\
BEGIN:VEVENT\r\n\
DTSTART:20200101T000000\r\n\
SUMMARY:Past\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
DTSTART;VALUE=DATE:20991231\r\n\
SUMMARY:All day\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";
    let opts = CalendarOptions::default();
    assert_eq!(resolve_calendar(&opts, &Feed(QUIET), now()), CALENDAR_NO_EVENTS);
}
