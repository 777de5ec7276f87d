//! Text output with the built-in font at the text cursor.
//!
//! Bytes are taken one at a time, so UTF-8 Cyrillic arrives as a lead byte followed by a
//! continuation byte. The lead byte draws nothing and is remembered; the continuation byte picks
//! the glyph. Characters are 6 columns wide (5 glyph columns and one blank) and 8 rows tall, both
//! multiplied by the scale.

use core::fmt;

use crate::command::consts::*;
use crate::font;
use crate::interface;

use super::window::in_range;
use super::Display;

/// How drawn glyphs and bitmaps combine with what is already on the display.
///
/// Display RAM cannot be read back over I2C and nothing is buffered locally, so every mode is
/// applied against a blank background: the bytes a glyph covers are always rewritten.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TextMode {
    /// Lit pixels are drawn.
    Add,
    /// Lit pixels erase; the covered cells end up blank.
    Subtract,
    /// The cell is overwritten with the glyph.
    Replace,
}

impl Default for TextMode {
    fn default() -> Self {
        TextMode::Replace
    }
}

impl TextMode {
    /// The byte written for a glyph byte `bits` on a blank background.
    pub fn compose(self, bits: u8) -> u8 {
        match self {
            TextMode::Add | TextMode::Replace => bits,
            TextMode::Subtract => 0,
        }
    }
}

/// Spread each bit of `bits` over `scale` adjacent bits.
fn stretch(bits: u8, scale: u8) -> u32 {
    let run = (1u32 << scale) - 1;
    (0..8)
        .filter(|&bit| bits & (1 << bit) != 0)
        .fold(0, |acc, bit| acc | run << (bit * scale as u32))
}

impl<DI> Display<DI>
where
    DI: interface::DisplayInterface,
{
    /// Print a string at the cursor. Returns the number of bytes consumed, which is always the
    /// length of `s`; bytes without a glyph are dropped silently.
    pub fn print(&mut self, s: &str) -> Result<usize, DI::Error> {
        self.write_bytes(s.as_bytes())
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<usize, DI::Error> {
        for &byte in bytes {
            self.write_byte(byte)?;
        }
        Ok(bytes.len())
    }

    /// Feed one byte of text.
    pub fn write_byte(&mut self, byte: u8) -> Result<(), DI::Error> {
        let byte = if self.cursor.auto_println {
            match self.line_control(byte)? {
                Some(byte) => byte,
                None => return Ok(()),
            }
        } else {
            byte
        };

        let scale = self.cursor.scale as i16;
        let bottom = self.cursor.y.saturating_add(PAGE_HEIGHT as i16 * scale);
        if self.cursor.y < 0 || bottom > self.max_y + 1 {
            return Ok(());
        }

        match self.decode(byte).and_then(font::glyph_index) {
            Some(index) => {
                self.cursor.line_start = false;
                self.draw_glyph(index)
            }
            None => Ok(()),
        }
    }

    /// Carriage return, line feed, wrapping at the right edge and dropping a leading space. Returns
    /// the byte left to draw, if any.
    fn line_control(&mut self, byte: u8) -> Result<Option<u8>, DI::Error> {
        let line_height = PAGE_HEIGHT as i16 * self.cursor.scale as i16;
        let mut moved = false;
        let mut byte = Some(byte);
        match byte {
            Some(b'\r') => {
                self.cursor.x = 0;
                moved = true;
                byte = None;
            }
            Some(b'\n') => {
                self.cursor.y = self.cursor.y.saturating_add(line_height);
                self.cursor.line_start = true;
                moved = true;
                byte = None;
            }
            _ => (),
        }
        if self.cursor.x.saturating_add(6 * self.cursor.scale as i16) >= COL_MAX as i16 {
            self.cursor.x = 0;
            self.cursor.y = self.cursor.y.saturating_add(line_height);
            self.cursor.line_start = true;
            moved = true;
        }
        if moved {
            self.select_cursor_window()?;
        }
        if self.cursor.line_start && self.cursor.x == 0 && byte == Some(b' ') {
            self.cursor.line_start = false;
            byte = None;
        }
        Ok(byte)
    }

    /// Turn a text byte into an internal font code, tracking two-byte UTF-8 sequences.
    fn decode(&mut self, byte: u8) -> Option<u8> {
        if byte < 0x80 {
            return Some(byte);
        }
        let last = core::mem::replace(&mut self.cursor.last_byte, byte);
        match (last, byte) {
            // Lead bytes.
            (_, 0xC0..=0xFF) => None,
            (0xD1, 0x91) => Some(font::CODE_YO),
            // Ё is drawn as Е.
            (0xD0, 0x81) => Some(0x95),
            // General punctuation: E2 80 xx.
            (0xE2, 0x80) => None,
            // Em dash.
            (0x80, 0x94) => Some(b'-'),
            _ => Some(byte),
        }
    }

    fn draw_glyph(&mut self, index: usize) -> Result<(), DI::Error> {
        let scale = self.cursor.scale;
        let width = 6 * scale as i16;
        if self.cursor.x.saturating_add(width) < 0 || self.cursor.x > COL_MAX as i16 {
            self.cursor.x = self.cursor.x.saturating_add(width);
            return Ok(());
        }

        self.ensure_cursor_window()?;
        let top = self.cursor.y.div_euclid(PAGE_HEIGHT as i16);
        let mode = self.cursor.mode;
        let invert = if self.cursor.invert { 0xFF } else { 0 };
        self.tx.begin_data()?;
        for col in 0..=font::GLYPH_WIDTH {
            let bits = font::glyph_column(index, col) ^ invert;
            let tall = stretch(bits, scale);
            for _ in 0..scale {
                if in_range(self.cursor.x, 0, NUM_PIXEL_COLS as i16) {
                    let strips = (0..scale).map(|strip| (tall >> (8 * strip as u32)) as u8);
                    self.emit_column(strips, top, mode)?;
                }
                self.cursor.x += 1;
            }
        }
        self.tx.end()
    }
}

impl<DI> fmt::Write for Display<DI>
where
    DI: interface::DisplayInterface,
{
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.print(s).map(|_| ()).map_err(|_| fmt::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Geometry};
    use crate::display::PixelCoord;
    use crate::interface::test_spy::TestSpyInterface;
    use core::fmt::Write;

    fn display(di: &TestSpyInterface, geometry: Geometry) -> Display<TestSpyInterface> {
        let mut disp = Display::new(di.split(), geometry);
        disp.init(Config::new()).unwrap();
        disp
    }

    const A: [u8; 6] = [0x7E, 0x09, 0x09, 0x09, 0x7E, 0x00];

    #[test]
    fn stretch_bits() {
        assert_eq!(stretch(0b101, 1), 0b101);
        assert_eq!(stretch(0b101, 2), 0b11_00_11);
        assert_eq!(stretch(0x80, 4), 0xF000_0000);
        assert_eq!(stretch(0xFF, 3), 0xFF_FFFF);
    }

    #[test]
    fn compose_modes() {
        assert_eq!(TextMode::default(), TextMode::Replace);
        assert_eq!(TextMode::Add.compose(0x3C), 0x3C);
        assert_eq!(TextMode::Replace.compose(0x3C), 0x3C);
        assert_eq!(TextMode::Subtract.compose(0x3C), 0);
    }

    #[test]
    fn letter_a() {
        let mut di = TestSpyInterface::new();
        let mut disp = display(&di, Geometry::Rows64);
        di.clear();
        assert_eq!(disp.print("A").unwrap(), 1);
        // The cursor window is still selected since init.
        di.check_multi(&[&[0x40, 0x7E, 0x09, 0x09, 0x09, 0x7E, 0x00]]);
        assert_eq!(disp.cursor(), PixelCoord(6, 0));
    }

    #[test]
    fn cursor_window_reselected_after_primitive() {
        let mut di = TestSpyInterface::new();
        let mut disp = display(&di, Geometry::Rows64);
        disp.set_cursor(12, 1).unwrap();
        disp.dot(100, 50, true).unwrap();
        di.clear();
        disp.print("A").unwrap();
        #[cfg_attr(rustfmt, rustfmt_skip)]
        di.check_multi(&[
            &[0x00, 0x21, 12, 127, 0x22, 1, 1],
            &[0x40, 0x7E, 0x09, 0x09, 0x09, 0x7E, 0x00],
        ]);
        assert_eq!(di.byte(12, 1), 0x7E);
        assert!(di.pixel(100, 50));
    }

    #[test]
    fn shifted_letter() {
        let mut di = TestSpyInterface::new();
        let mut disp = display(&di, Geometry::Rows64);
        disp.set_cursor_xy(0, 4).unwrap();
        di.clear();
        disp.print("A").unwrap();
        assert_eq!(
            di.data(),
            [0xE0, 0x07, 0x90, 0x00, 0x90, 0x00, 0x90, 0x00, 0xE0, 0x07, 0x00, 0x00]
        );
        assert!(di.pixel(0, 5));
        assert!(di.pixel(0, 10));
    }

    #[test]
    fn scaled_letter() {
        let mut di = TestSpyInterface::new();
        let mut disp = display(&di, Geometry::Rows64);
        disp.set_scale(2).unwrap();
        di.clear();
        disp.write_byte(b'A').unwrap();
        // 0x7E stretched is 0x3FFC, 0x09 is 0x00C3.
        #[cfg_attr(rustfmt, rustfmt_skip)]
        assert_eq!(di.data(), [
            0xFC, 0x3F, 0xFC, 0x3F,
            0xC3, 0x00, 0xC3, 0x00,
            0xC3, 0x00, 0xC3, 0x00,
            0xC3, 0x00, 0xC3, 0x00,
            0xFC, 0x3F, 0xFC, 0x3F,
            0x00, 0x00, 0x00, 0x00,
        ]);
        assert_eq!(disp.cursor(), PixelCoord(12, 0));
    }

    #[test]
    fn scaled_and_shifted_spills() {
        let mut di = TestSpyInterface::new();
        let mut disp = display(&di, Geometry::Rows64);
        disp.set_cursor_xy(0, 4).unwrap();
        disp.set_scale(3).unwrap();
        di.clear();
        disp.write_byte(b'A').unwrap();
        // 6 columns x 3 repeats x (3 strips + spill).
        assert_eq!(di.data().len(), 6 * 3 * 4);
        assert!(di.pixel(0, 4 + 3));
        assert!(di.pixel(2, 4 + 20));
        assert!(!di.pixel(0, 4 + 2));
    }

    #[test]
    fn inverted_text() {
        let mut di = TestSpyInterface::new();
        let mut disp = display(&di, Geometry::Rows64);
        disp.invert_text(true);
        di.clear();
        disp.print("A").unwrap();
        let inverted: Vec<u8> = A.iter().map(|b| !b).collect();
        assert_eq!(di.data(), inverted);
    }

    #[test]
    fn subtract_blanks_cells() {
        let mut di = TestSpyInterface::new();
        let mut disp = display(&di, Geometry::Rows64);
        disp.fill(0xFF).unwrap();
        disp.text_mode(TextMode::Subtract);
        disp.print("A").unwrap();
        assert!((0..6).all(|col| di.byte(col, 0) == 0));
        assert_eq!(di.byte(6, 0), 0xFF);
    }

    #[test]
    fn cyrillic() {
        let mut di = TestSpyInterface::new();
        let mut disp = display(&di, Geometry::Rows64);
        di.clear();
        assert_eq!(disp.print("Яё").unwrap(), 4);
        #[cfg_attr(rustfmt, rustfmt_skip)]
        assert_eq!(di.data(), [
            0x46, 0x29, 0x19, 0x09, 0x7F, 0x00,
            0x38, 0x55, 0x54, 0x55, 0x18, 0x00,
        ]);
        assert_eq!(disp.cursor(), PixelCoord(12, 0));
    }

    #[test]
    fn capital_yo_draws_ye() {
        let mut di = TestSpyInterface::new();
        let mut disp = display(&di, Geometry::Rows64);
        di.clear();
        disp.print("Ё").unwrap();
        assert_eq!(di.data(), [0x7F, 0x49, 0x49, 0x49, 0x41, 0x00]);
    }

    #[test]
    fn em_dash() {
        let mut di = TestSpyInterface::new();
        let mut disp = display(&di, Geometry::Rows64);
        di.clear();
        assert_eq!(disp.print("\u{2014}").unwrap(), 3);
        assert_eq!(di.data(), [0x08, 0x08, 0x08, 0x08, 0x08, 0x00]);
    }

    #[test]
    fn control_codes_draw_nothing() {
        let mut di = TestSpyInterface::new();
        let mut disp = display(&di, Geometry::Rows64);
        di.clear();
        disp.write_bytes(&[0x01, b'\n', 0x7F]).unwrap();
        di.check_multi(&[]);
        assert_eq!(disp.cursor(), PixelCoord(0, 0));
    }

    #[test]
    fn off_bottom_does_not_advance() {
        let mut di = TestSpyInterface::new();
        let mut disp = display(&di, Geometry::Rows32);
        disp.set_cursor(0, 3).unwrap();
        disp.set_scale(2).unwrap();
        di.clear();
        disp.print("AB").unwrap();
        di.check_multi(&[]);
        assert_eq!(disp.cursor(), PixelCoord(0, 24));
        disp.set_cursor_xy(0, -1).unwrap();
        disp.set_scale(1).unwrap();
        di.clear();
        disp.print("A").unwrap();
        di.check_multi(&[]);
    }

    #[test]
    fn partly_visible_character() {
        let mut di = TestSpyInterface::new();
        let mut disp = display(&di, Geometry::Rows64);
        disp.set_cursor(-3, 0).unwrap();
        di.clear();
        disp.print("A").unwrap();
        assert_eq!(di.data(), [0x09, 0x7E, 0x00]);
        assert_eq!(disp.cursor(), PixelCoord(3, 0));
        disp.set_cursor(125, 0).unwrap();
        di.clear();
        disp.print("A").unwrap();
        assert_eq!(di.data(), [0x7E, 0x09, 0x09]);
        assert_eq!(disp.cursor(), PixelCoord(131, 0));
        di.clear();
        disp.print("A").unwrap();
        di.check_multi(&[]);
        assert_eq!(disp.cursor(), PixelCoord(137, 0));
    }

    #[test]
    fn auto_println() {
        let mut di = TestSpyInterface::new();
        let mut disp = display(&di, Geometry::Rows64);
        disp.auto_println(true);
        disp.print("A\r\n B").unwrap();
        assert_eq!(di.byte(0, 0), 0x7E);
        // The space after the line break is dropped, so "B" starts the second line.
        assert_eq!(di.byte(0, 1), 0x7F);
        assert_eq!(disp.cursor(), PixelCoord(6, 8));

        // A line feed alone keeps the column.
        disp.print("\nC").unwrap();
        assert_eq!(di.byte(6, 2), 0x3E);
        assert_eq!(disp.cursor(), PixelCoord(12, 16));
    }

    #[test]
    fn auto_wrap() {
        let mut di = TestSpyInterface::new();
        let mut disp = display(&di, Geometry::Rows64);
        disp.auto_println(true);
        for _ in 0..21 {
            disp.write_byte(b'-').unwrap();
        }
        assert_eq!(disp.cursor(), PixelCoord(126, 0));
        disp.write_byte(b'-').unwrap();
        assert_eq!(disp.cursor(), PixelCoord(6, 8));
        assert_eq!(di.byte(0, 1), 0x08);

        disp.write_bytes(b"\r\n\n").unwrap();
        assert_eq!(disp.cursor(), PixelCoord(0, 24));
        assert!(!disp.is_end());
    }

    #[test]
    fn line_control_only_when_enabled() {
        let mut di = TestSpyInterface::new();
        let mut disp = display(&di, Geometry::Rows64);
        disp.set_cursor(126, 0).unwrap();
        di.clear();
        disp.print("A").unwrap();
        assert_eq!(disp.cursor(), PixelCoord(132, 0));
    }

    #[test]
    fn formatted_output() {
        let mut di = TestSpyInterface::new();
        let mut disp = display(&di, Geometry::Rows64);
        di.clear();
        write!(disp, "{}", 7).unwrap();
        assert_eq!(di.data(), [0x01, 0x71, 0x09, 0x05, 0x03, 0x00]);
    }
}
