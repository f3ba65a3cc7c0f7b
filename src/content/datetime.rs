//! Clock module resolution: a small token template over the local time.

use chrono::format::{Item, StrftimeItems};

use crate::content::Clock;
use crate::model::DatetimeOptions;

const FALLBACK_PATTERN: &str = "%Y-%m-%d %H:%M";

/// Translate the document template tokens into a strftime pattern.
///
/// Token order matters: `MM` must be consumed before `mm` so month and minute
/// stay distinct.
pub fn template_to_strftime(template: &str) -> String {
    template
        .replace("YYYY", "%Y")
        .replace("MM", "%m")
        .replace("DD", "%d")
        .replace("HH", "%H")
        .replace("mm", "%M")
        .replace("ss", "%S")
}

/// Always computable, never fails: an untranslatable pattern (stray `%` from
/// user input, unknown specifier) falls back to the default pattern instead of
/// erroring out of the render pass.
pub fn resolve_datetime(opts: &DatetimeOptions, clock: &dyn Clock) -> String {
    let pattern = template_to_strftime(&opts.format);
    let pattern = if StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error)) {
        tracing::warn!(template = %opts.format, "invalid datetime template, using default");
        FALLBACK_PATTERN.to_string()
    } else {
        pattern
    };
    clock.now().format(&pattern).to_string()
}
