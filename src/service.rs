//! Cached access to the hardware summary with background refresh
//!
//! A cold read collects synchronously. A warm read returns the cached value
//! at once and schedules a refresh on the rayon pool; at most one refresh
//! per service is in flight.

use crate::aggregate::collect_summary;
use crate::cache::TtlCache;
use crate::collectors::Provider;
use crate::data::HardwareSummary;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const SUMMARY_KEY: &str = "hardware_summary";
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

pub struct SummaryService {
    cache: Arc<TtlCache>,
    provider: Arc<dyn Provider>,
    ttl: Duration,
    refreshing: Arc<AtomicBool>,
}

impl SummaryService {
    pub fn new(cache: Arc<TtlCache>, provider: Arc<dyn Provider>, ttl: Duration) -> Self {
        Self {
            cache,
            provider,
            ttl,
            refreshing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Current summary. Blocks only when nothing is cached.
    pub fn summary(&self) -> Arc<HardwareSummary> {
        match self.cache.get::<HardwareSummary>(SUMMARY_KEY) {
            Some(cached) => {
                self.spawn_refresh();
                cached
            }
            None => {
                info!("summary cache cold, collecting");
                self.refresh()
            }
        }
    }

    /// Collect synchronously and store the result unconditionally
    pub fn refresh(&self) -> Arc<HardwareSummary> {
        let fresh = Arc::new(collect_summary(self.provider.as_ref()));
        self.cache
            .set_shared(SUMMARY_KEY, Arc::clone(&fresh), Some(self.ttl));
        fresh
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing.load(Ordering::Acquire)
    }

    /// Schedule a background collection unless one is already running.
    /// Returns whether a new refresh was scheduled.
    pub fn spawn_refresh(&self) -> bool {
        if self
            .refreshing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("refresh already in flight");
            return false;
        }

        let cache = Arc::clone(&self.cache);
        let provider = Arc::clone(&self.provider);
        let refreshing = Arc::clone(&self.refreshing);
        let ttl = self.ttl;

        rayon::spawn(move || {
            let _in_flight = InFlightGuard(refreshing);
            let fresh = collect_summary(provider.as_ref());
            store_refreshed(&cache, fresh, ttl);
        });
        true
    }
}

/// Clears the in-flight flag when the refresh task ends, even by unwinding
struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Write a background result unless it would replace a clean summary with a
/// degraded one.
fn store_refreshed(cache: &TtlCache, fresh: HardwareSummary, ttl: Duration) {
    if fresh.is_degraded() {
        let cached_is_clean = cache
            .get::<HardwareSummary>(SUMMARY_KEY)
            .is_some_and(|cached| !cached.is_degraded());
        if cached_is_clean {
            warn!(
                failed = ?fresh.failed_domains(),
                "background refresh degraded, keeping cached summary"
            );
            return;
        }
    }
    cache.set(SUMMARY_KEY, fresh, Some(ttl));
    debug!("summary refreshed in background");
}
