//! Countdown module resolution.

use chrono::{Local, NaiveDateTime, TimeZone};

use crate::content::Clock;
use crate::foundation::error::{InkframeError, InkframeResult};
use crate::model::TimerOptions;

pub const TIMER_EXPIRED: &str = "Time's up!";
pub const TIMER_INVALID: &str = "Invalid timer target";

const TARGET_PATTERN: &str = "%Y-%m-%d %H:%M:%S";
const SECS_PER_DAY: i64 = 86_400;

/// A malformed target or format is substituted with [`TIMER_INVALID`]; the
/// failure never escapes the module boundary.
pub fn resolve_timer(opts: &TimerOptions, clock: &dyn Clock) -> String {
    match countdown(opts, clock) {
        Ok(display) => display,
        Err(e) => {
            tracing::warn!(target = %opts.target, error = %e, "timer resolution failed");
            TIMER_INVALID.to_string()
        }
    }
}

fn countdown(opts: &TimerOptions, clock: &dyn Clock) -> InkframeResult<String> {
    let naive = NaiveDateTime::parse_from_str(&opts.target, TARGET_PATTERN)
        .map_err(|e| InkframeError::content(format!("bad timer target: {e}")))?;
    let target = Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| InkframeError::content("timer target not representable in local time"))?;

    let diff = target - clock.now();
    if diff.num_seconds() < 0 {
        return Ok(TIMER_EXPIRED.to_string());
    }

    let days = diff.num_seconds() / SECS_PER_DAY;
    let rem = diff.num_seconds() % SECS_PER_DAY;
    let hours = rem / 3600;
    let minutes = (rem % 3600) / 60;
    let seconds = rem % 60;

    // Days are unpadded; the intra-day fields are zero padded. `D` must be
    // substituted first so the digits it expands to are left alone.
    let display = opts
        .format
        .replace('D', &days.to_string())
        .replace("HH", &format!("{hours:02}"))
        .replace("MM", &format!("{minutes:02}"))
        .replace("SS", &format!("{seconds:02}"));
    Ok(display)
}
