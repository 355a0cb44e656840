//! Display output
//!
//! The composer renders onto a canvas; the encoder packs it; a
//! [`DisplayBackend`] owns getting the packed bytes onto a physical
//! display.

pub mod canvas;
pub mod compose;
pub mod encode;
pub mod fb;

use anyhow::Result;

use crate::config::Config;

/// Sink for encoded frames.
pub trait DisplayBackend {
    /// Write one whole frame to the display.
    fn write_frame(&mut self, frame: &[u8]) -> Result<()>;
}

/// Create the framebuffer-backed display for the configured device.
pub fn create_backend(config: &Config) -> Box<dyn DisplayBackend> {
    Box::new(fb::FramebufferDevice::new(config))
}
