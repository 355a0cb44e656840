//! Runtime configuration
//!
//! Everything the reference hard-coded (paths, geometry, cadence,
//! palette) lives here so alternate displays and pools need no code
//! changes.

use clap::Parser;
use embedded_graphics::pixelcolor::Rgb888;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Error type for config validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("canvas geometry must be non-zero, got {0}x{1}")]
    ZeroGeometry(u32, u32),
    #[error("refresh interval must be non-zero")]
    ZeroInterval,
    #[error("scrollback line budget must be non-zero")]
    ZeroScrollback,
}

/// Dashboard configuration, parsed from the command line.
#[derive(Debug, Clone, Parser)]
#[command(name = "verus-fbmon", about = "Verus miner framebuffer dashboard")]
pub struct Config {
    /// Framebuffer device to write frames to
    #[arg(long, default_value = "/dev/fb0")]
    pub fb_device: PathBuf,

    /// Miner log file to tail (ccminer output, e.g. via tee)
    #[arg(long, default_value = "/tmp/verus_raw.log")]
    pub log_path: PathBuf,

    /// Canvas width in pixels
    #[arg(long, default_value_t = 480)]
    pub width: u32,

    /// Canvas height in pixels
    #[arg(long, default_value_t = 320)]
    pub height: u32,

    /// Refresh interval in milliseconds
    #[arg(long, default_value_t = 500)]
    pub interval_ms: u64,

    /// Pool balance cache lifetime in seconds
    #[arg(long, default_value_t = 300)]
    pub balance_ttl_secs: u64,

    /// Pool balance request timeout in seconds
    #[arg(long, default_value_t = 5)]
    pub fetch_timeout_secs: u64,

    /// Pool API base URL
    #[arg(long, default_value = "https://sg.vipor.net")]
    pub pool_url: String,

    /// Miner payout address; without one the balance row shows "--"
    #[arg(long)]
    pub address: Option<String>,

    /// Number of recent accepted-share lines kept for the scrollback
    #[arg(long, default_value_t = 11)]
    pub scrollback: usize,

    /// Character budget per scrollback line before truncation
    #[arg(long, default_value_t = 60)]
    pub line_chars: usize,

    /// Header title line
    #[arg(long, default_value = "VERUS MINER // PI5")]
    pub title: String,

    /// Header pool label line
    #[arg(long, default_value = "POOL: sg.vipor.net")]
    pub pool_label: String,

    /// Canvas colors; not flag-exposed, override in code if embedding.
    #[arg(skip)]
    pub palette: Palette,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroGeometry(self.width, self.height));
        }
        if self.interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if self.scrollback == 0 {
            return Err(ConfigError::ZeroScrollback);
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn balance_ttl(&self) -> Duration {
        Duration::from_secs(self.balance_ttl_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

/// Canvas color palette.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub background: Rgb888,
    pub main: Rgb888,
    pub dim: Rgb888,
    pub gray: Rgb888,
    pub warn: Rgb888,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Rgb888::new(0, 0, 0),
            main: Rgb888::new(0, 255, 0),
            dim: Rgb888::new(0, 160, 0),
            gray: Rgb888::new(100, 100, 100),
            warn: Rgb888::new(255, 165, 0),
        }
    }
}
