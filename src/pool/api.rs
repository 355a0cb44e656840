//! HTTP client for the pool miner-status endpoint

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::BalanceSource;

/// Miner status payload returned by the pool API. Only the pending
/// balance is consumed; depending on pool version the field arrives as
/// a JSON number or a numeric string.
#[derive(Debug, Deserialize)]
struct MinerStatus {
    #[serde(rename = "pendingBalance")]
    pending_balance: Option<serde_json::Value>,
}

/// Blocking client for `GET <base>/api/pools/verus/miners/<address>`.
pub struct PoolApi {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl PoolApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .context("building pool API client")?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }
}

impl BalanceSource for PoolApi {
    fn fetch(&self, address: &str) -> Result<f64> {
        let url = format!("{}/api/pools/verus/miners/{}", self.base_url, address);
        debug!("Fetching balance from {}", url);

        let resp = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("requesting {url}"))?
            .error_for_status()
            .context("pool API returned error status")?;

        let status: MinerStatus = resp.json().context("decoding pool API response")?;
        let value = status
            .pending_balance
            .ok_or_else(|| anyhow!("response missing pendingBalance"))?;
        numeric_value(&value)
            .ok_or_else(|| anyhow!("pendingBalance is not numeric: {value}"))
    }
}

fn numeric_value(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
