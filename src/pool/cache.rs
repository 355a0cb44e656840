//! TTL cache over a balance source

use std::time::{Duration, Instant};
use tracing::warn;

use super::BalanceSource;

/// Owns the single `(value, last_fetch)` pair the composer reads each
/// tick.
///
/// A refresh happens when nothing has been fetched yet or the last
/// attempt is older than the TTL. A failed refresh keeps the previous
/// value but still advances the fetch clock, so an unreachable pool is
/// retried at TTL cadence rather than every tick.
pub struct BalanceCache<S> {
    source: S,
    ttl: Duration,
    value: Option<f64>,
    last_fetch: Option<Instant>,
}

impl<S: BalanceSource> BalanceCache<S> {
    pub fn new(source: S, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            value: None,
            last_fetch: None,
        }
    }

    /// Latest balance, refreshing first if the cache has expired.
    /// Absent until a fetch has ever succeeded.
    pub fn get(&mut self, address: &str) -> Option<f64> {
        self.get_at(address, Instant::now())
    }

    /// Clock-injected variant of [`BalanceCache::get`].
    pub fn get_at(&mut self, address: &str, now: Instant) -> Option<f64> {
        let stale = match self.last_fetch {
            None => true,
            Some(at) => now.duration_since(at) > self.ttl,
        };

        if stale {
            match self.source.fetch(address) {
                Ok(value) => self.value = Some(value),
                Err(e) => warn!("Balance fetch failed, serving cached value: {e:#}"),
            }
            self.last_fetch = Some(now);
        }

        self.value
    }
}
