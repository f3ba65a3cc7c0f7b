//! Content resolution: one strategy per module kind.
//!
//! Resolution is a pure function from a module plus a [`ResolveContext`] to a
//! [`ResolvedContent`]; the document is never mutated. Every strategy degrades
//! to a fixed fallback string on failure; a module's data source being down
//! or its configuration being malformed must never abort the render pass.

pub mod calendar;
pub mod datetime;
pub mod timer;
pub mod weather;

use chrono::{DateTime, Local};

use crate::content::calendar::CalendarProvider;
use crate::content::weather::{StyleCatalog, WeatherProvider};
use crate::model::{ImageOptions, Module, ModuleKind};

/// Wall clock seam so resolvers are deterministic under test.
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock pinned to one instant.
pub struct FixedClock(pub DateTime<Local>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

/// Reachability of the two networks an edge renderer cares about: its
/// authoritative document source, and the internet at large. The two are
/// probed independently; a panel on a LAN can see its server without
/// internet, and vice versa.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Connectivity {
    pub source_reachable: bool,
    pub internet_reachable: bool,
}

impl Connectivity {
    pub fn online() -> Self {
        Self {
            source_reachable: true,
            internet_reachable: true,
        }
    }

    pub fn offline() -> Self {
        Self {
            source_reachable: false,
            internet_reachable: false,
        }
    }
}

/// Which side of the document pipeline this render pass sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolveMode {
    /// The serving side (or a connected preview): compute datetime/timer from
    /// the local clock and fetch weather/calendar live.
    Authoritative,
    /// An edge renderer consuming a served or cached document: render the
    /// baked `content`, except where a module's offline-sync flag and the
    /// connectivity state select a local or direct-fetch path.
    Replica(Connectivity),
}

/// Freshly resolved module content, discarded after compositing.
#[derive(Clone, Debug, PartialEq)]
pub enum ResolvedContent {
    Text(String),
    Image(ImageOptions),
    Rule,
}

pub struct ResolveContext<'a> {
    pub mode: ResolveMode,
    pub weather: &'a dyn WeatherProvider,
    pub calendar: &'a dyn CalendarProvider,
    pub styles: &'a StyleCatalog,
    pub clock: &'a dyn Clock,
}

/// Resolve one module's displayable content. Infallible by design: all
/// degradations happen inside the per-kind strategies.
pub fn resolve(module: &Module, ctx: &ResolveContext<'_>) -> ResolvedContent {
    match &module.kind {
        ModuleKind::Text | ModuleKind::News => ResolvedContent::Text(module.content.clone()),
        ModuleKind::Line => ResolvedContent::Rule,
        ModuleKind::Image(opts) => ResolvedContent::Image(opts.clone()),
        ModuleKind::Datetime(opts) => {
            let local = match ctx.mode {
                ResolveMode::Authoritative => true,
                // Offline-synced clocks always track the local system time;
                // a stale baked timestamp is worse than a slightly drifted one.
                ResolveMode::Replica(_) => opts.offline_sync,
            };
            if local {
                ResolvedContent::Text(datetime::resolve_datetime(opts, ctx.clock))
            } else {
                ResolvedContent::Text(module.content.clone())
            }
        }
        ModuleKind::Timer(opts) => {
            let local = match ctx.mode {
                ResolveMode::Authoritative => true,
                ResolveMode::Replica(_) => opts.offline_sync,
            };
            if local {
                ResolvedContent::Text(timer::resolve_timer(opts, ctx.clock))
            } else {
                ResolvedContent::Text(module.content.clone())
            }
        }
        ModuleKind::Weather(opts) => ResolvedContent::Text(weather::resolve_weather(
            opts,
            &module.content,
            ctx.mode,
            ctx.weather,
            ctx.styles,
        )),
        ModuleKind::Calendar(opts) => match ctx.mode {
            ResolveMode::Authoritative => ResolvedContent::Text(calendar::resolve_calendar(
                opts,
                ctx.calendar,
                ctx.clock.now(),
            )),
            ResolveMode::Replica(_) => ResolvedContent::Text(module.content.clone()),
        },
    }
}
