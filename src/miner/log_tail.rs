//! Tail extraction from the miner log artifact

use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Lines of interest contain this literal substring.
pub const ACCEPTED_MARKER: &str = "accepted:";

/// Reads the tail of the miner log.
///
/// The log is appended to concurrently by the miner process; we only
/// ever perform whole-file reads, so a partially flushed line is
/// simply not visible yet. There is no persisted read offset and no
/// rotation awareness.
#[derive(Debug, Clone)]
pub struct LogTail {
    path: PathBuf,
}

impl LogTail {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Return at most the last `n` lines containing the accepted-share
    /// marker, in file order (most recent last).
    ///
    /// Any read failure (missing file, permission, I/O fault) yields an
    /// empty vec; the miner may simply not have started yet.
    pub fn recent_accepted_lines(&self, n: usize) -> Vec<String> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                debug!("Log not readable at {}: {}", self.path.display(), e);
                return Vec::new();
            }
        };

        let matching: Vec<&str> = content
            .lines()
            .filter(|line| line.contains(ACCEPTED_MARKER))
            .collect();

        let skip = matching.len().saturating_sub(n);
        matching[skip..].iter().map(|s| s.to_string()).collect()
    }
}
