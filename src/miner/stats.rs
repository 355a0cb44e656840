//! Share-stat parsing from accepted-share lines

use anyhow::{Context, Result};
use regex::Regex;

/// Stats extracted from the most recent accepted-share line.
///
/// The zero value doubles as the safe fallback for malformed lines;
/// the dashboard must never fail on miner output format drift.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ShareStats {
    /// Hashrate in H/s (the log reports kH/s).
    pub hashrate_hs: f64,
    pub accepted: u64,
    pub total: u64,
}

impl ShareStats {
    pub fn rejected(&self) -> u64 {
        self.total.saturating_sub(self.accepted)
    }

    pub fn hashrate_mhs(&self) -> f64 {
        self.hashrate_hs / 1_000_000.0
    }

    /// Accepted shares per minute over the process uptime. Zero while
    /// uptime is zero to avoid dividing at startup.
    pub fn shares_per_minute(&self, uptime_secs: u64) -> f64 {
        if uptime_secs == 0 {
            return 0.0;
        }
        self.accepted as f64 / (uptime_secs as f64 / 60.0)
    }
}

/// Strips terminal noise from raw log lines.
#[derive(Debug)]
pub struct LineSanitizer {
    ansi: Regex,
}

impl LineSanitizer {
    pub fn new() -> Result<Self> {
        let ansi = Regex::new(r"\x1b\[[0-9;]*m").context("compiling ANSI escape pattern")?;
        Ok(Self { ansi })
    }

    /// Remove ANSI color escapes, then an optional leading
    /// `[timestamp] ` bracket. Escape stripping must come first since
    /// color codes may sit next to the bracket. Unmatched patterns pass
    /// through unchanged, so the function is idempotent.
    pub fn sanitize(&self, raw: &str) -> String {
        let stripped = self.ansi.replace_all(raw, "");
        strip_timestamp(&stripped).to_string()
    }
}

/// Remove a leading `[...]` prefix plus one following space if present.
fn strip_timestamp(line: &str) -> &str {
    if !line.starts_with('[') {
        return line;
    }
    match line.find(']') {
        Some(idx) => {
            let rest = &line[idx + 1..];
            rest.strip_prefix(' ').unwrap_or(rest)
        }
        None => line,
    }
}

/// Extracts share counts and hashrate from sanitized accepted lines.
#[derive(Debug)]
pub struct StatParser {
    pattern: Regex,
}

impl StatParser {
    pub fn new() -> Result<Self> {
        let pattern = Regex::new(r"accepted:\s+(\d+)/(\d+).*?,\s+([\d.]+)\s+kH/s")
            .context("compiling accepted-share pattern")?;
        Ok(Self { pattern })
    }

    /// Parse a line of the shape
    /// `accepted: 252/253 (diff 1.0), 3679.97 kH/s yes!`.
    ///
    /// Anything that does not match cleanly, including a count pair
    /// with accepted > total, yields the zero stats rather than a
    /// partial parse.
    pub fn parse(&self, line: &str) -> ShareStats {
        let Some(caps) = self.pattern.captures(line) else {
            return ShareStats::default();
        };

        let accepted = caps[1].parse::<u64>();
        let total = caps[2].parse::<u64>();
        let rate_khs = caps[3].parse::<f64>();

        match (accepted, total, rate_khs) {
            (Ok(accepted), Ok(total), Ok(rate_khs)) if accepted <= total => ShareStats {
                hashrate_hs: rate_khs * 1000.0,
                accepted,
                total,
            },
            _ => ShareStats::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sanitizer() -> LineSanitizer {
        LineSanitizer::new().unwrap()
    }

    fn parser() -> StatParser {
        StatParser::new().unwrap()
    }

    #[test]
    fn sanitize_strips_ansi_and_timestamp() {
        let s = sanitizer();
        let raw = "\x1b[32m[2025-12-09 11:37:41]\x1b[0m accepted: 252/253 (diff 1.0), 3679.97 kH/s \x1b[1;32myes!\x1b[0m";
        assert_eq!(
            s.sanitize(raw),
            "accepted: 252/253 (diff 1.0), 3679.97 kH/s yes!"
        );
    }

    #[test]
    fn sanitize_is_idempotent() {
        let s = sanitizer();
        let raw = "[2025-12-09 11:37:41] \x1b[32maccepted: 1/1, 10.0 kH/s\x1b[0m";
        let once = s.sanitize(raw);
        assert_eq!(s.sanitize(&once), once);
    }

    #[test]
    fn sanitize_passes_through_unmatched_bracket() {
        let s = sanitizer();
        assert_eq!(s.sanitize("[no closing bracket"), "[no closing bracket");
        assert_eq!(s.sanitize("plain line"), "plain line");
    }

    #[test]
    fn sanitize_bracket_without_trailing_space() {
        let s = sanitizer();
        assert_eq!(s.sanitize("[ts]accepted: 1/1"), "accepted: 1/1");
    }

    #[test]
    fn parse_reference_line() {
        let stats =
            parser().parse("accepted: 252/253 (diff 1.0), 3679.97 kH/s yes!");
        assert_eq!(stats.hashrate_hs, 3_679_970.0);
        assert_eq!(stats.accepted, 252);
        assert_eq!(stats.total, 253);
        assert_eq!(stats.rejected(), 1);
    }

    #[test]
    fn parse_non_matching_yields_zero() {
        let stats = parser().parse("accepted: garbage");
        assert_eq!(stats, ShareStats::default());
        let stats = parser().parse("stratum difficulty set to 1.0");
        assert_eq!(stats, ShareStats::default());
    }

    #[test]
    fn parse_rejects_accepted_above_total() {
        // A count pair violating accepted <= total is dropped whole,
        // never partially parsed.
        let stats = parser().parse("accepted: 5/3 (diff 1.0), 100.0 kH/s yes!");
        assert_eq!(stats, ShareStats::default());
    }

    #[test]
    fn parse_rejects_malformed_rate() {
        let stats = parser().parse("accepted: 1/2 (diff 1.0), 1.2.3.4 kH/s yes!");
        assert_eq!(stats, ShareStats::default());
    }

    #[test]
    fn rejected_never_underflows() {
        let stats = ShareStats {
            hashrate_hs: 0.0,
            accepted: 3,
            total: 3,
        };
        assert_eq!(stats.rejected(), 0);
    }

    #[test]
    fn shares_per_minute_handles_zero_uptime() {
        let stats = ShareStats {
            hashrate_hs: 0.0,
            accepted: 10,
            total: 10,
        };
        assert_eq!(stats.shares_per_minute(0), 0.0);
        assert_eq!(stats.shares_per_minute(120), 5.0);
    }
}
