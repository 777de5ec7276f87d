//! Geometric primitives and raw image data. Every primitive selects the smallest window covering
//! what it draws and streams the covered bytes straight to display RAM. Since the controller
//! cannot be read back, bits sharing a byte with a drawn pixel but outside the shape are
//! overwritten with 0.
//!
//! Coordinates may lie partly or wholly off the display; whatever falls outside is dropped.

use itertools::{iproduct, repeat_n};

use crate::command::consts::*;
use crate::interface;

use super::text::TextMode;
use super::window::{clip, in_range, ordered, ColumnSpan};
use super::Display;

/// How closed shapes are drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FillMode {
    /// Blank the whole area of the shape.
    Clear,
    /// Light the whole area of the shape.
    Fill,
    /// Light the outline only.
    Stroke,
}

const WIDTH: i16 = NUM_PIXEL_COLS as i16;

/// Narrow a coordinate computed in `i32` back to `i16`. Values that do not fit are far off the
/// display either way.
fn coord(v: i32) -> i16 {
    v.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}

fn nudge(v: i16, by: i16) -> i16 {
    v.saturating_add(by)
}

impl<DI> Display<DI>
where
    DI: interface::DisplayInterface,
{
    /// Whether a row lies on the display.
    fn row_visible(&self, y: i16) -> bool {
        in_range(y, 0, self.max_y + 1)
    }

    /// Light (`fill`) or blank a single pixel. The other 7 pixels sharing its byte are blanked.
    pub fn dot(&mut self, x: i16, y: i16, fill: bool) -> Result<(), DI::Error> {
        if !in_range(x, 0, WIDTH) || !self.row_visible(y) {
            return Ok(());
        }
        let page = y / PAGE_HEIGHT as i16;
        self.set_window(x, page, x, page)?;
        self.tx.begin_one_data()?;
        self.tx.emit((fill as u8) << (y % PAGE_HEIGHT as i16))?;
        self.tx.end()
    }

    /// Draw a straight line between two points, both inclusive.
    pub fn line(
        &mut self,
        x0: i16,
        y0: i16,
        x1: i16,
        y1: i16,
        fill: bool,
    ) -> Result<(), DI::Error> {
        if x0 == x1 {
            return self.fast_line_v(x0, y0, y1, fill);
        }
        if y0 == y1 {
            return self.fast_line_h(y0, x0, x1, fill);
        }
        let (x1, y1) = (i32::from(x1), i32::from(y1));
        let (mut x, mut y) = (i32::from(x0), i32::from(y0));
        let dx = (x1 - x).abs();
        let dy = (y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx - dy;
        loop {
            self.dot(x as i16, y as i16, fill)?;
            if x == x1 && y == y1 {
                return Ok(());
            }
            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x += sx;
            }
            if e2 < dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Draw a horizontal line on row `y` from column `x0` to `x1` inclusive. With `fill` false
    /// the covered bytes are blanked.
    pub fn fast_line_h(&mut self, y: i16, x0: i16, x1: i16, fill: bool) -> Result<(), DI::Error> {
        let (x0, x1) = ordered(x0, x1);
        if !self.row_visible(y) || x1 < 0 || x0 > COL_MAX as i16 {
            return Ok(());
        }
        if x0 == x1 {
            return self.dot(x0, y, fill);
        }
        let byte = if fill { 1 << (y % PAGE_HEIGHT as i16) } else { 0 };
        self.page_run(y / PAGE_HEIGHT as i16, x0, x1, byte)
    }

    /// Write `byte` into columns `x0..=x1` of `page`. The columns must overlap the display.
    fn page_run(&mut self, page: i16, x0: i16, x1: i16, byte: u8) -> Result<(), DI::Error> {
        let (x0, x1) = (clip(0, x0, COL_MAX as i16), clip(0, x1, COL_MAX as i16));
        self.set_window(x0, page, x1, page)?;
        self.tx.begin_data()?;
        self.tx.emit_all(repeat_n(byte, (x1 - x0 + 1) as usize))?;
        self.tx.end()
    }

    /// Draw a vertical line in column `x` from row `y0` to `y1` inclusive. With `fill` false the
    /// run is blanked, along with the rest of the bytes it touches.
    pub fn fast_line_v(&mut self, x: i16, y0: i16, y1: i16, fill: bool) -> Result<(), DI::Error> {
        let (y0, y1) = ordered(y0, y1);
        if y0 == y1 {
            return self.dot(x, y0, fill);
        }
        if !in_range(x, 0, WIDTH) || y1 < 0 || y0 > self.max_y {
            return Ok(());
        }
        let span = ColumnSpan::new(clip(0, y0, self.max_y), clip(0, y1, self.max_y));
        self.set_window(x, span.first, x, span.last)?;
        self.tx.begin_data()?;
        for page in span.pages() {
            self.tx.emit(if fill { span.mask(page) } else { 0 })?;
        }
        self.tx.end()
    }

    /// Draw a rectangle with corners (`x0`, `y0`) and (`x1`, `y1`), both inclusive.
    pub fn rect(
        &mut self,
        x0: i16,
        y0: i16,
        x1: i16,
        y1: i16,
        mode: FillMode,
    ) -> Result<(), DI::Error> {
        let (x0, x1) = ordered(x0, x1);
        let (y0, y1) = ordered(y0, y1);
        if mode == FillMode::Stroke {
            if i32::from(x1) - i32::from(x0) >= 2 {
                let (xa, xb) = (x0 + 1, x1 - 1);
                let page = y0.div_euclid(PAGE_HEIGHT as i16);
                let shared = y0 != y1 && page == y1.div_euclid(PAGE_HEIGHT as i16);
                if shared && self.row_visible(y0) && xb >= 0 && xa <= COL_MAX as i16 {
                    // Both edges live in the same bytes.
                    let rows = PAGE_HEIGHT as i16;
                    let byte = (1 << (y0 % rows)) | (1 << (y1 % rows));
                    self.page_run(page, xa, xb, byte)?;
                } else {
                    self.fast_line_h(y0, xa, xb, true)?;
                    self.fast_line_h(y1, xa, xb, true)?;
                }
            }
            self.fast_line_v(x0, y0, y1, true)?;
            return self.fast_line_v(x1, y0, y1, true);
        }

        let fill = mode == FillMode::Fill;
        if x0 == x1 {
            return self.fast_line_v(x0, y0, y1, fill);
        }
        if y0 == y1 {
            return self.fast_line_h(y0, x0, x1, fill);
        }
        if !fill {
            return self.clear_region(x0, y0, x1, y1);
        }
        if x1 < 0 || x0 > COL_MAX as i16 || y1 < 0 || y0 > self.max_y {
            return Ok(());
        }
        let (x0, x1) = (clip(0, x0, COL_MAX as i16), clip(0, x1, COL_MAX as i16));
        let span = ColumnSpan::new(clip(0, y0, self.max_y), clip(0, y1, self.max_y));
        self.set_window(x0, span.first, x1, span.last)?;
        self.tx.begin_data()?;
        for (_, page) in iproduct!(x0..=x1, span.pages()) {
            self.tx.emit(span.mask(page))?;
        }
        self.tx.end()
    }

    /// Blank every byte touched by the rectangle with corners (`x0`, `y0`) and (`x1`, `y1`).
    /// Whole pages are cleared, so pixels up to 7 rows above and below the rectangle go too.
    pub fn clear_region(&mut self, x0: i16, y0: i16, x1: i16, y1: i16) -> Result<(), DI::Error> {
        let (x0, x1) = ordered(x0, x1);
        let (y0, y1) = ordered(y0, y1);
        if x1 < 0 || x0 > COL_MAX as i16 || y1 < 0 || y0 > self.max_y {
            return Ok(());
        }
        let (x0, x1) = (clip(0, x0, COL_MAX as i16), clip(0, x1, COL_MAX as i16));
        let page_height = PAGE_HEIGHT as i16;
        let page0 = clip(0, y0, self.max_y) / page_height;
        let page1 = clip(0, y1, self.max_y) / page_height;
        self.set_window(x0, page0, x1, page1)?;
        let count = (x1 - x0 + 1) as usize * (page1 - page0 + 1) as usize;
        self.tx.begin_data()?;
        self.tx.emit_all(repeat_n(0, count))?;
        self.tx.end()
    }

    /// Draw a rectangle with the corners cut by two pixels.
    pub fn round_rect(
        &mut self,
        x0: i16,
        y0: i16,
        x1: i16,
        y1: i16,
        mode: FillMode,
    ) -> Result<(), DI::Error> {
        let (x0, x1) = ordered(x0, x1);
        let (y0, y1) = ordered(y0, y1);
        match mode {
            FillMode::Stroke => {
                self.fast_line_v(x0, nudge(y0, 2), nudge(y1, -2), true)?;
                self.fast_line_v(x1, nudge(y0, 2), nudge(y1, -2), true)?;
                self.fast_line_h(y0, nudge(x0, 2), nudge(x1, -2), true)?;
                self.fast_line_h(y1, nudge(x0, 2), nudge(x1, -2), true)?;
                self.dot(nudge(x0, 1), nudge(y0, 1), true)?;
                self.dot(nudge(x1, -1), nudge(y0, 1), true)?;
                self.dot(nudge(x1, -1), nudge(y1, -1), true)?;
                self.dot(nudge(x0, 1), nudge(y1, -1), true)
            }
            FillMode::Fill | FillMode::Clear => {
                let fill = mode == FillMode::Fill;
                self.fast_line_v(x0, nudge(y0, 2), nudge(y1, -2), fill)?;
                self.fast_line_v(nudge(x0, 1), nudge(y0, 1), nudge(y1, -1), fill)?;
                self.fast_line_v(nudge(x1, -1), nudge(y0, 1), nudge(y1, -1), fill)?;
                self.fast_line_v(x1, nudge(y0, 2), nudge(y1, -2), fill)?;
                self.rect(nudge(x0, 2), y0, nudge(x1, -2), y1, mode)
            }
        }
    }

    /// Draw a circle around (`x`, `y`). Filled circles are drawn as vertical lines.
    pub fn circle(&mut self, x: i16, y: i16, radius: i16, mode: FillMode) -> Result<(), DI::Error> {
        let fill = mode != FillMode::Clear;
        let (x, y, radius) = (i32::from(x), i32::from(y), i32::from(radius));
        let at = |dx: i32, dy: i32| (coord(x + dx), coord(y + dy));
        let mut f = 1 - radius;
        let mut ddf_x = 1;
        let mut ddf_y = -2 * radius;
        let mut x1 = 0;
        let mut y1 = radius;

        for &(dx, dy) in [(0, radius), (0, -radius), (radius, 0), (-radius, 0)].iter() {
            let (px, py) = at(dx, dy);
            self.dot(px, py, fill)?;
        }
        if mode != FillMode::Stroke {
            self.fast_line_v(coord(x), coord(y - radius), coord(y + radius - 1), fill)?;
        }
        while x1 < y1 {
            if f >= 0 {
                y1 -= 1;
                ddf_y += 2;
                f += ddf_y;
            }
            x1 += 1;
            ddf_x += 2;
            f += ddf_x;
            if mode == FillMode::Stroke {
                for &(dx, dy) in [
                    (x1, y1),
                    (-x1, y1),
                    (x1, -y1),
                    (-x1, -y1),
                    (y1, x1),
                    (-y1, x1),
                    (y1, -x1),
                    (-y1, -x1),
                ]
                .iter()
                {
                    let (px, py) = at(dx, dy);
                    self.dot(px, py, true)?;
                }
            } else {
                let (near, far) = (coord(y - y1), coord(y + y1));
                self.fast_line_v(coord(x + x1), near, far, fill)?;
                self.fast_line_v(coord(x - x1), near, far, fill)?;
                let (near, far) = (coord(y - x1), coord(y + x1));
                self.fast_line_v(coord(x + y1), near, far, fill)?;
                self.fast_line_v(coord(x - y1), near, far, fill)?;
            }
        }
        Ok(())
    }

    /// Draw a `width` x `height` pixel bitmap with its top left corner at (`x`, `y`).
    ///
    /// `frame` is laid out like display RAM: `ceil(height / 8)` strips, each holding `width`
    /// column bytes with the least significant bit on top. Bytes missing from a short `frame`
    /// are drawn blank. With `invert` every byte is complemented; `mode` selects how the bitmap
    /// combines with the display, see `TextMode`.
    pub fn draw_bitmap(
        &mut self,
        x: i16,
        y: i16,
        frame: &[u8],
        width: i16,
        height: i16,
        invert: bool,
        mode: TextMode,
    ) -> Result<(), DI::Error> {
        if width <= 0 || height <= 0 {
            return Ok(());
        }
        let (left, right) = (i32::from(x), i32::from(x) + i32::from(width));
        let (upper, lower) = (i32::from(y), i32::from(y) + i32::from(height));
        if right <= 0 || left >= i32::from(WIDTH) || lower <= 0 || upper > i32::from(self.max_y) {
            return Ok(());
        }
        let strips = (height as usize + 7) / 8;
        let padded = (strips * 8).min(i16::MAX as usize) as i16;
        let mask = if invert { 0xFF } else { 0 };
        let top = y.div_euclid(PAGE_HEIGHT as i16);
        self.set_window_shift(x, y, width, padded)?;
        self.tx.begin_data()?;
        for col in 0..width as usize {
            if !in_range(i32::from(x) + col as i32, 0, i32::from(WIDTH)) {
                continue;
            }
            let column = (0..strips)
                .map(|strip| frame.get(strip * width as usize + col).copied().unwrap_or(0) ^ mask);
            self.emit_column(column, top, mode)?;
        }
        self.tx.end()
    }

    /// Draw one raw byte as an 8-pixel column at the cursor, which moves one column right.
    pub fn draw_byte(&mut self, byte: u8) -> Result<(), DI::Error> {
        self.draw_bytes(&[byte])
    }

    /// Draw raw bytes as consecutive 8-pixel columns starting at the cursor, which moves one
    /// column right per byte. Columns off the display are skipped.
    pub fn draw_bytes(&mut self, bytes: &[u8]) -> Result<(), DI::Error> {
        let (x, y) = (self.cursor.x, self.cursor.y);
        let top = y.div_euclid(PAGE_HEIGHT as i16);
        self.set_window_shift(x, y, COL_MAX as i16, PAGE_HEIGHT as i16)?;
        self.tx.begin_data()?;
        for byte in bytes {
            if in_range(self.cursor.x, 0, WIDTH) {
                self.emit_column(Some(*byte), top, TextMode::Replace)?;
            }
            self.cursor.x = self.cursor.x.saturating_add(1);
        }
        self.tx.end()
    }
}
