use std::io::Write;

use log::{trace, warn};

use chip8_vm::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use chip8_vm::{FrameBuffer, FrameSink};

const LIT: char = '█';
const UNLIT: char = ' ';
/// Moves the terminal cursor back to the top left corner
const CURSOR_HOME: &str = "\x1b[H";

/// Formats a Chip-8 FrameBuffer as text.
///
/// Each row of the frame buffer becomes one line, with a block for every lit
/// pixel and a space for every unlit one.
///
/// # Arguments
/// * `frame` a Chip-8 FrameBuffer
pub fn frame_to_text(frame: &FrameBuffer) -> String {
    let mut text = String::with_capacity(DISPLAY_HEIGHT * (DISPLAY_WIDTH * LIT.len_utf8() + 1));
    for row in frame.iter() {
        text.extend(row.iter().map(|&lit| if lit { LIT } else { UNLIT }));
        text.push('\n');
    }
    text
}

/// # Display
/// The Chip-8 display is composed of 64x32 black/white pixels.
/// The display only gets a call to `flush` when the Chip-8 FrameBuffer is updated,
/// and redraws the whole frame over the previous one.
pub struct TextDisplay<W: Write> {
    out: W,
}

impl<W: Write> TextDisplay<W> {
    /// # Arguments
    /// * `out` where frames are written, typically stdout
    pub fn new(out: W) -> Self {
        TextDisplay { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn render(&mut self, frame: &FrameBuffer) -> std::io::Result<()> {
        write!(self.out, "{}{}", CURSOR_HOME, frame_to_text(frame))?;
        self.out.flush()
    }
}

impl<W: Write> FrameSink for TextDisplay<W> {
    fn flush(&mut self, frame: &FrameBuffer) {
        trace!("Rendering frame");
        if let Err(e) = self.render(frame) {
            warn!("Failed to render frame: {}", e);
        }
    }
}
