//! Miner log handling
//!
//! Reads the ccminer log artifact and turns its accepted-share lines
//! into display-ready stats.

pub mod log_tail;
pub mod stats;

pub use log_tail::LogTail;
pub use stats::{LineSanitizer, ShareStats, StatParser};
