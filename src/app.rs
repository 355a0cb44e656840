//! Dashboard orchestration

use anyhow::Result;
use std::time::Instant;
use tracing::warn;

use crate::config::Config;
use crate::miner::LogTail;
use crate::pool::{BalanceCache, PoolApi};
use crate::ui::compose::{FrameComposer, FrameSnapshot};
use crate::ui::encode::encode_rgb565;
use crate::ui::DisplayBackend;

/// Owns the per-process state and produces exactly one frame per tick.
pub struct Dashboard {
    config: Config,
    started: Instant,
    tail: LogTail,
    balance: BalanceCache<PoolApi>,
    composer: FrameComposer,
    display: Box<dyn DisplayBackend>,
}

impl Dashboard {
    pub fn new(config: Config, display: Box<dyn DisplayBackend>) -> Result<Self> {
        let api = PoolApi::new(config.pool_url.as_str(), config.fetch_timeout())?;
        let composer = FrameComposer::new(&config)?;
        let tail = LogTail::new(&config.log_path);
        let balance = BalanceCache::new(api, config.balance_ttl());

        Ok(Self {
            started: Instant::now(),
            tail,
            balance,
            composer,
            display,
            config,
        })
    }

    /// One refresh cycle: gather inputs, compose, encode, write.
    pub fn tick(&mut self) {
        let snapshot = FrameSnapshot {
            uptime_secs: self.started.elapsed().as_secs(),
            lines: self.tail.recent_accepted_lines(self.config.scrollback),
            balance: self.pending_balance(),
        };

        let canvas = self.composer.compose(&snapshot);
        let frame = encode_rgb565(&canvas);

        // A missing or busy display must not take the dashboard down;
        // the next tick retries with a fresh handle.
        if let Err(e) = self.display.write_frame(&frame) {
            warn!("Display write failed: {e:#}");
        }
    }

    /// Cached pool balance; permanently absent without a payout
    /// address to query for.
    fn pending_balance(&mut self) -> Option<f64> {
        let address = self.config.address.as_deref()?;
        self.balance.get(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct CapturingDisplay {
        frames: Rc<RefCell<Vec<Vec<u8>>>>,
    }

    impl DisplayBackend for CapturingDisplay {
        fn write_frame(&mut self, frame: &[u8]) -> Result<()> {
            self.frames.borrow_mut().push(frame.to_vec());
            Ok(())
        }
    }

    fn test_dashboard(log_path: &std::path::Path) -> (Dashboard, Rc<RefCell<Vec<Vec<u8>>>>) {
        let mut config = Config::parse_from(["verus-fbmon"]);
        config.log_path = log_path.to_path_buf();
        // No address: the balance path never goes near the network.
        config.address = None;

        let frames = Rc::new(RefCell::new(Vec::new()));
        let display = Box::new(CapturingDisplay {
            frames: Rc::clone(&frames),
        });
        let dashboard = Dashboard::new(config, display).unwrap();
        (dashboard, frames)
    }

    #[test]
    fn tick_writes_one_exact_length_frame() {
        let temp = tempfile::tempdir().unwrap();
        let (mut dashboard, frames) = test_dashboard(&temp.path().join("absent.log"));

        dashboard.tick();
        let frames = frames.borrow();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].len(), 480 * 320 * 2);
    }

    #[test]
    fn every_tick_writes_a_frame() {
        let temp = tempfile::tempdir().unwrap();
        let log = temp.path().join("miner.log");
        std::fs::write(&log, "accepted: 1/1 (diff 1.0), 10.0 kH/s yes!\n").unwrap();
        let (mut dashboard, frames) = test_dashboard(&log);

        dashboard.tick();
        dashboard.tick();
        dashboard.tick();
        assert_eq!(frames.borrow().len(), 3);
    }

    #[test]
    fn display_failure_does_not_panic() {
        struct FailingDisplay;
        impl DisplayBackend for FailingDisplay {
            fn write_frame(&mut self, _frame: &[u8]) -> Result<()> {
                anyhow::bail!("device unplugged")
            }
        }

        let mut config = Config::parse_from(["verus-fbmon"]);
        config.address = None;
        let mut dashboard = Dashboard::new(config, Box::new(FailingDisplay)).unwrap();
        dashboard.tick();
    }
}
