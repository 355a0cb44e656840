//! Linux framebuffer device backend

use anyhow::{ensure, Context, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::Config;

use super::DisplayBackend;

const FBIOGET_VSCREENINFO: libc::c_ulong = 0x4600;

/// Linux framebuffer variable screen info
#[repr(C)]
#[derive(Debug, Clone, Copy)]
struct FbVarScreeninfo {
    xres: u32,
    yres: u32,
    xres_virtual: u32,
    yres_virtual: u32,
    xoffset: u32,
    yoffset: u32,
    bits_per_pixel: u32,
    grayscale: u32,
    red: FbBitfield,
    green: FbBitfield,
    blue: FbBitfield,
    transp: FbBitfield,
    nonstd: u32,
    activate: u32,
    height: u32,
    width: u32,
    accel_flags: u32,
    pixclock: u32,
    left_margin: u32,
    right_margin: u32,
    upper_margin: u32,
    lower_margin: u32,
    hsync_len: u32,
    vsync_len: u32,
    sync: u32,
    vmode: u32,
    rotate: u32,
    colorspace: u32,
    reserved: [u32; 4],
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
struct FbBitfield {
    offset: u32,
    length: u32,
    msb_right: u32,
}

/// Writes encoded frames to a framebuffer device.
///
/// The device is not held open between ticks; every frame reopens it,
/// so a hot-unplugged display heals on a later write attempt.
pub struct FramebufferDevice {
    path: PathBuf,
    frame_len: usize,
}

impl FramebufferDevice {
    pub fn new(config: &Config) -> Self {
        let device = Self {
            path: config.fb_device.clone(),
            frame_len: (config.width * config.height * 2) as usize,
        };
        device.probe(config);
        device
    }

    /// Best-effort startup check that the device mode matches the
    /// configured canvas. A mismatch (or an unreachable device) only
    /// warns; writes are attempted regardless.
    fn probe(&self, config: &Config) {
        match read_screeninfo(&self.path) {
            Ok(vinfo) => {
                info!(
                    "Framebuffer {}: {}x{} @ {} bpp",
                    self.path.display(),
                    vinfo.xres,
                    vinfo.yres,
                    vinfo.bits_per_pixel
                );
                if vinfo.xres != config.width
                    || vinfo.yres != config.height
                    || vinfo.bits_per_pixel != 16
                {
                    warn!(
                        "Device mode differs from configured {}x{} @ 16 bpp; frames may render garbled",
                        config.width, config.height
                    );
                }
            }
            Err(e) => {
                warn!("Framebuffer probe failed (writes will still be attempted): {e:#}");
            }
        }
    }
}

fn read_screeninfo(path: &Path) -> Result<FbVarScreeninfo> {
    let file = OpenOptions::new()
        .read(true)
        .open(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let mut vinfo: FbVarScreeninfo = unsafe { std::mem::zeroed() };
    let ret = unsafe { libc::ioctl(file.as_raw_fd(), FBIOGET_VSCREENINFO, &mut vinfo as *mut _) };
    if ret != 0 {
        return Err(std::io::Error::last_os_error())
            .with_context(|| format!("FBIOGET_VSCREENINFO on {}", path.display()));
    }
    Ok(vinfo)
}

impl DisplayBackend for FramebufferDevice {
    fn write_frame(&mut self, frame: &[u8]) -> Result<()> {
        ensure!(
            frame.len() == self.frame_len,
            "frame is {} bytes, device expects {}",
            frame.len(),
            self.frame_len
        );

        let mut file = OpenOptions::new()
            .write(true)
            .open(&self.path)
            .with_context(|| format!("opening {}", self.path.display()))?;
        file.write_all(frame)
            .with_context(|| format!("writing frame to {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn config_for(path: &Path) -> Config {
        let mut config = Config::parse_from(["verus-fbmon"]);
        config.fb_device = path.to_path_buf();
        config
    }

    #[test]
    fn writes_whole_frame_to_device_path() {
        let temp = tempfile::tempdir().unwrap();
        let dev = temp.path().join("fb0");
        std::fs::write(&dev, b"").unwrap();

        // Probe warns (regular files reject the ioctl) but never fails.
        let mut backend = FramebufferDevice::new(&config_for(&dev));
        let frame = vec![0xA5u8; 480 * 320 * 2];
        backend.write_frame(&frame).unwrap();
        assert_eq!(std::fs::read(&dev).unwrap(), frame);
    }

    #[test]
    fn wrong_frame_length_is_rejected() {
        let temp = tempfile::tempdir().unwrap();
        let dev = temp.path().join("fb0");
        std::fs::write(&dev, b"").unwrap();

        let mut backend = FramebufferDevice::new(&config_for(&dev));
        assert!(backend.write_frame(&[0u8; 16]).is_err());
    }

    #[test]
    fn missing_device_errors_per_write() {
        let temp = tempfile::tempdir().unwrap();
        let dev = temp.path().join("gone");

        // Construction stays infallible; the failure surfaces on write
        // so a later hotplug can succeed.
        let mut backend = FramebufferDevice::new(&config_for(&dev));
        assert!(backend.write_frame(&vec![0u8; 480 * 320 * 2]).is_err());
    }
}
