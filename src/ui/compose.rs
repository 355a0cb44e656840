//! Frame composition
//!
//! Lays out the header, stats block, and scrollback log onto a fresh
//! canvas each tick. The screen has two shapes, re-derived every tick
//! from the current log tail with no hysteresis: NO_DATA (waiting
//! placeholder) and LIVE (stats + scrollback).

use anyhow::Result;
use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X13, FONT_9X15};
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle};
use embedded_graphics::text::renderer::TextRenderer;
use embedded_graphics::text::{Baseline, Text};

use crate::config::{Config, Palette};
use crate::miner::{LineSanitizer, ShareStats, StatParser};

use super::canvas::Canvas;

const EDGE_MARGIN: i32 = 10;
const TITLE_Y: i32 = 2;
const POOL_LABEL_Y: i32 = 20;
const HEADER_DIVIDER_Y: i32 = 36;
const WAITING_Y: i32 = 80;
const HINT_Y: i32 = 100;
const STATS_TOP_Y: i32 = 40;
const ROW_STEP: i32 = 16;
const LOG_DIVIDER_Y: i32 = 122;
const LOG_LABEL_Y: i32 = 126;
const LOG_TOP_Y: i32 = 142;
const BOTTOM_MARGIN: i32 = 8;

const TRUNCATION_MARKER: &str = "...";
const LINE_PREFIX: &str = "> ";

/// Inputs gathered for one frame.
#[derive(Debug, Clone, Default)]
pub struct FrameSnapshot {
    pub uptime_secs: u64,
    /// Raw accepted-share lines in file order, most recent last.
    pub lines: Vec<String>,
    pub balance: Option<f64>,
}

/// Composes one canvas per tick from a [`FrameSnapshot`].
pub struct FrameComposer {
    width: u32,
    height: u32,
    line_chars: usize,
    title: String,
    pool_label: String,
    log_hint: String,
    palette: Palette,
    sanitizer: LineSanitizer,
    parser: StatParser,
}

impl FrameComposer {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            width: config.width,
            height: config.height,
            line_chars: config.line_chars,
            title: config.title.clone(),
            pool_label: config.pool_label.clone(),
            log_hint: format!("Start ccminer with tee {}", config.log_path.display()),
            palette: config.palette,
            sanitizer: LineSanitizer::new()?,
            parser: StatParser::new()?,
        })
    }

    pub fn compose(&self, snapshot: &FrameSnapshot) -> Canvas {
        let mut canvas = Canvas::new(self.width, self.height, self.palette.background);

        self.draw_centered(
            &mut canvas,
            TITLE_Y,
            &self.title,
            MonoTextStyle::new(&FONT_10X20, self.palette.main),
        );
        self.draw_centered(
            &mut canvas,
            POOL_LABEL_Y,
            &self.pool_label,
            MonoTextStyle::new(&FONT_6X13, self.palette.dim),
        );
        self.divider(&mut canvas, HEADER_DIVIDER_Y);

        if snapshot.lines.is_empty() {
            self.draw_no_data(&mut canvas);
        } else {
            self.draw_live(&mut canvas, snapshot);
        }

        canvas
    }

    fn draw_no_data(&self, canvas: &mut Canvas) {
        self.draw_centered(
            canvas,
            WAITING_Y,
            "WAITING FOR MINER OUTPUT",
            MonoTextStyle::new(&FONT_9X15, self.palette.warn),
        );
        self.draw_centered(
            canvas,
            HINT_Y,
            &self.log_hint,
            MonoTextStyle::new(&FONT_6X13, self.palette.gray),
        );
    }

    fn draw_live(&self, canvas: &mut Canvas, snapshot: &FrameSnapshot) {
        // Stats come from the newest accepted line only.
        let newest = snapshot
            .lines
            .last()
            .map(|line| self.sanitizer.sanitize(line))
            .unwrap_or_default();
        let stats = self.parser.parse(&newest);

        let data_style = MonoTextStyle::new(&FONT_9X15, self.palette.main);
        for (i, row) in live_rows(&stats, snapshot.uptime_secs, snapshot.balance)
            .iter()
            .enumerate()
        {
            self.draw_left(canvas, STATS_TOP_Y + i as i32 * ROW_STEP, row, data_style);
        }

        self.divider(canvas, LOG_DIVIDER_Y);
        self.draw_left(
            canvas,
            LOG_LABEL_Y,
            "LOG:",
            MonoTextStyle::new(&FONT_6X13, self.palette.gray),
        );

        let log_style = MonoTextStyle::new(&FONT_6X13, self.palette.main);
        let mut y = LOG_TOP_Y;
        for raw in snapshot.lines.iter().rev() {
            let clean = self.sanitizer.sanitize(raw);
            let text = format!("{}{}", LINE_PREFIX, truncate(&clean, self.line_chars));
            self.draw_left(canvas, y, &text, log_style);
            y += ROW_STEP;
            if y > self.height as i32 - BOTTOM_MARGIN {
                break;
            }
        }
    }

    fn draw_left(
        &self,
        canvas: &mut Canvas,
        y: i32,
        text: &str,
        style: MonoTextStyle<'_, Rgb888>,
    ) {
        let _ = Text::with_baseline(text, Point::new(EDGE_MARGIN, y), style, Baseline::Top)
            .draw(canvas);
    }

    /// Center using the measured width of this exact string; the font
    /// is an implementation detail and is not assumed monospaced.
    fn draw_centered(
        &self,
        canvas: &mut Canvas,
        y: i32,
        text: &str,
        style: MonoTextStyle<'_, Rgb888>,
    ) {
        let text_w = style
            .measure_string(text, Point::zero(), Baseline::Top)
            .bounding_box
            .size
            .width;
        let x = (self.width.saturating_sub(text_w) / 2) as i32;
        let _ = Text::with_baseline(text, Point::new(x, y), style, Baseline::Top).draw(canvas);
    }

    fn divider(&self, canvas: &mut Canvas, y: i32) {
        let _ = Line::new(
            Point::new(EDGE_MARGIN, y),
            Point::new(self.width as i32 - EDGE_MARGIN, y),
        )
        .into_styled(PrimitiveStyle::with_stroke(self.palette.dim, 1))
        .draw(canvas);
    }
}

fn live_rows(stats: &ShareStats, uptime_secs: u64, balance: Option<f64>) -> [String; 5] {
    [
        format!("HR: {:.2} MH/s", stats.hashrate_mhs()),
        format!(
            "SH: {}/{} / REJ: {}",
            stats.accepted,
            stats.total,
            stats.rejected()
        ),
        format!("UP: {}", format_uptime(uptime_secs)),
        format!(
            "SPM: {:.2} shares/min",
            stats.shares_per_minute(uptime_secs)
        ),
        format!("BAL: {}", format_balance(balance)),
    ]
}

fn format_uptime(secs: u64) -> String {
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    format!("{h:02}:{m:02}:{s:02}")
}

/// Balance to six decimals with trailing zeros and point trimmed, or
/// the absent placeholder.
fn format_balance(balance: Option<f64>) -> String {
    match balance {
        Some(value) => {
            let fixed = format!("{value:.6}");
            let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
            format!("{trimmed} VRSC (unpaid)")
        }
        None => "--".to_string(),
    }
}

fn truncate(line: &str, budget: usize) -> String {
    if line.chars().count() <= budget {
        return line.to_string();
    }
    let mut out: String = line.chars().take(budget).collect();
    out.push_str(TRUNCATION_MARKER);
    out
}
