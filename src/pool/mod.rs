//! Pool API access
//!
//! Fetches the miner's pending balance from the pool, behind a TTL
//! cache so the dashboard never hammers the endpoint at frame rate.

pub mod api;
pub mod cache;

use anyhow::Result;

/// Source of pending-balance values for a miner address.
///
/// The HTTP client implements this for production; tests substitute
/// fakes to exercise the cache policy.
pub trait BalanceSource {
    fn fetch(&self, address: &str) -> Result<f64>;
}

pub use api::PoolApi;
pub use cache::BalanceCache;
