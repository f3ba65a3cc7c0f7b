//! Document acquisition for edge renderers.
//!
//! A replica fetches its design from the authoritative source with retries,
//! caches the last good document on disk, and falls back to that cache when
//! the source is unreachable.

use std::path::PathBuf;
use std::time::Duration;

use crate::foundation::error::{InkframeError, InkframeResult};
use crate::model::Design;

/// Where a design can be loaded from.
pub trait DocumentSource {
    /// The currently active design.
    fn load_active(&self) -> InkframeResult<Design>;
    /// A specific design by name.
    fn load_by_name(&self, name: &str) -> InkframeResult<Design>;
}

/// Where the design a render pass consumed actually came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DesignOrigin {
    /// Fresh from the authoritative source.
    Live,
    /// The last cached document; the source was unreachable.
    Cache,
}

pub struct DesignFetcher<'a> {
    source: &'a dyn DocumentSource,
    cache_path: PathBuf,
    attempts: u32,
    retry_delay: Duration,
}

impl<'a> DesignFetcher<'a> {
    pub fn new(source: &'a dyn DocumentSource, cache_path: impl Into<PathBuf>) -> Self {
        Self {
            source,
            cache_path: cache_path.into(),
            attempts: 3,
            retry_delay: Duration::from_secs(5),
        }
    }

    pub fn with_retry(mut self, attempts: u32, retry_delay: Duration) -> Self {
        self.attempts = attempts.max(1);
        self.retry_delay = retry_delay;
        self
    }

    /// Fetch the active design, retrying on failure, then falling back to the
    /// on-disk cache. A successful fetch refreshes the cache.
    pub fn load(&self) -> InkframeResult<(Design, DesignOrigin)> {
        let mut last_err = None;
        for attempt in 1..=self.attempts {
            match self.source.load_active() {
                Ok(design) => {
                    self.write_cache(&design);
                    return Ok((design, DesignOrigin::Live));
                }
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "design fetch failed");
                    last_err = Some(e);
                    if attempt < self.attempts {
                        std::thread::sleep(self.retry_delay);
                    }
                }
            }
        }

        match Design::from_path(&self.cache_path) {
            Ok(design) => {
                tracing::info!(cache = %self.cache_path.display(), "using cached design");
                Ok((design, DesignOrigin::Cache))
            }
            Err(cache_err) => {
                tracing::error!(error = %cache_err, "design cache unusable");
                Err(last_err.unwrap_or(cache_err))
            }
        }
    }

    fn write_cache(&self, design: &Design) {
        let result = serde_json::to_string_pretty(design)
            .map_err(|e| InkframeError::source(format!("cache serialize failed: {e}")))
            .and_then(|json| {
                std::fs::write(&self.cache_path, json).map_err(|e| {
                    InkframeError::source(format!(
                        "cache write '{}' failed: {e}",
                        self.cache_path.display()
                    ))
                })
            });
        if let Err(e) = result {
            // Cache refresh failure degrades future offline runs but does not
            // block this one.
            tracing::warn!(error = %e, "design cache not refreshed");
        }
    }
}
