//! RGB888 to RGB565 frame encoding

use embedded_graphics::prelude::*;

use super::canvas::Canvas;

/// Pack a canvas into the display's native 16-bit format: top 5 bits
/// of red, top 6 of green, top 5 of blue, `(r<<11)|(g<<5)|b`, each
/// word written little-endian. Output length is exactly
/// `width * height * 2` bytes, which the device write relies on.
pub fn encode_rgb565(canvas: &Canvas) -> Vec<u8> {
    let mut frame = Vec::with_capacity(canvas.pixels().len() * 2);
    for px in canvas.pixels() {
        let word = (u16::from(px.r() >> 3) << 11)
            | (u16::from(px.g() >> 2) << 5)
            | u16::from(px.b() >> 3);
        frame.extend_from_slice(&word.to_le_bytes());
    }
    frame
}
