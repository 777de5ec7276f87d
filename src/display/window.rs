//! RAM window selection and the page-aware byte emitters every primitive draws through.
//!
//! A window is a rectangle of columns and pages on the controller. With vertical addressing each
//! data byte lands in the next page of the current column, moving on to the next column after
//! the last page, so a drawing op only has to produce its bytes column by column in that order.
//!
//! Drawing at a row that is not a multiple of 8 splits every 8-pixel strip over two pages. The
//! window then spans one extra page, and the strip is written as `data << shift` into the upper
//! page and `data >> (8 - shift)` into the lower one, merged with the tail of the strip above.

use core::ops::RangeInclusive;

use crate::command::consts::*;
use crate::command::*;
use crate::interface;

use super::text::TextMode;
use super::Display;

pub(crate) use crate::command::clip;

pub(crate) fn in_range<T: PartialOrd>(x: T, lo: T, hi: T) -> bool {
    x >= lo && x < hi
}

/// Order a pair so the smaller value comes first.
pub(crate) fn ordered<T: PartialOrd>(a: T, b: T) -> (T, T) {
    if a > b {
        (b, a)
    } else {
        (a, b)
    }
}

/// The pages a vertical run of pixels `y0..=y1` covers, and the bit mask of the run within each
/// page. Both ends must already lie on the display.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ColumnSpan {
    pub first: i16,
    pub last: i16,
    top: u8,
    bottom: u8,
}

impl ColumnSpan {
    pub fn new(y0: i16, y1: i16) -> Self {
        let first = y0.div_euclid(PAGE_HEIGHT as i16);
        let last = y1.div_euclid(PAGE_HEIGHT as i16);
        let head = y0.rem_euclid(PAGE_HEIGHT as i16) as u32;
        let tail = 7 - y1.rem_euclid(PAGE_HEIGHT as i16) as u32;
        let (top, bottom) = if first == last {
            let mask = (0xFFu8 << head) & (0xFFu8 >> tail);
            (mask, mask)
        } else {
            (0xFFu8 << head, 0xFFu8 >> tail)
        };
        ColumnSpan {
            first,
            last,
            top,
            bottom,
        }
    }

    pub fn pages(&self) -> RangeInclusive<i16> {
        self.first..=self.last
    }

    /// The bits of `page` covered by the run.
    pub fn mask(&self, page: i16) -> u8 {
        if page == self.first {
            self.top
        } else if page == self.last {
            self.bottom
        } else {
            0xFF
        }
    }
}

impl<DI> Display<DI>
where
    DI: interface::DisplayInterface,
{
    /// Select the RAM window from column `col0` to `col1` and page `page0` to `page1`, inclusive.
    /// Out-of-range addresses are clamped to the display. The following data bytes fill the
    /// window column by column, top page first.
    pub fn set_window(
        &mut self,
        col0: i16,
        page0: i16,
        col1: i16,
        page1: i16,
    ) -> Result<(), DI::Error> {
        let col = |c: i16| clip(0, c, COL_MAX as i16) as u8;
        let page = |p: i16| clip(0, p, self.max_page) as u8;
        let (c0, c1, p0, p1) = (col(col0), col(col1), page(page0), page(page1));
        #[cfg(feature = "defmt")]
        defmt::trace!("ssd1306: window cols {}..={} pages {}..={}", c0, c1, p0, p1);
        self.shift = 0;
        self.cursor_window = false;
        self.tx.begin_command()?;
        Command::SetColumnAddress(c0, c1).append(&mut self.tx)?;
        Command::SetPageAddress(p0, p1).append(&mut self.tx)?;
        self.tx.end()
    }

    /// Select the window for a `width` x `height` pixel block with its top left corner at
    /// (`x`, `y`), where `y` need not be page-aligned. Records `y mod 8` as the active shift, and
    /// includes the extra page that shifted strips spill into.
    pub fn set_window_shift(
        &mut self,
        x: i16,
        y: i16,
        width: i16,
        height: i16,
    ) -> Result<(), DI::Error> {
        let page_height = PAGE_HEIGHT as i16;
        let bottom = y.saturating_add(height).saturating_sub(1);
        self.set_window(
            x,
            y.div_euclid(page_height),
            x.saturating_add(width),
            bottom.div_euclid(page_height),
        )?;
        self.shift = y.rem_euclid(page_height) as u8;
        Ok(())
    }

    /// The sub-page row offset of the active window.
    pub fn shift(&self) -> u8 {
        self.shift
    }

    /// Point the controller at the text cursor: from the cursor column to the right edge, one
    /// glyph row tall at the current scale.
    pub(crate) fn select_cursor_window(&mut self) -> Result<(), DI::Error> {
        let rows = PAGE_HEIGHT as i16 * self.cursor.scale as i16;
        self.set_window_shift(self.cursor.x, self.cursor.y, COL_MAX as i16, rows)?;
        self.cursor_window = true;
        Ok(())
    }

    /// Re-select the cursor window if a primitive has moved the controller elsewhere since.
    pub(crate) fn ensure_cursor_window(&mut self) -> Result<(), DI::Error> {
        if self.cursor_window {
            Ok(())
        } else {
            self.select_cursor_window()
        }
    }

    /// Emit one byte destined for `page`. Bytes for pages off the display are dropped, matching
    /// the clamped window.
    pub(crate) fn emit_page(&mut self, byte: u8, page: i16) -> Result<(), DI::Error> {
        if in_range(page, 0, self.max_page + 1) {
            self.tx.emit(byte)
        } else {
            Ok(())
        }
    }

    /// Emit one column of vertically stacked 8-pixel strips whose top strip belongs at `top`,
    /// applying the active shift. With a nonzero shift one more byte than there are strips is
    /// produced, carrying the bottom of the last strip.
    pub(crate) fn emit_column<I>(
        &mut self,
        strips: I,
        top: i16,
        mode: TextMode,
    ) -> Result<(), DI::Error>
    where
        I: IntoIterator<Item = u8>,
    {
        let shift = self.shift as u32;
        let mut prev = 0u8;
        let mut page = top;
        for data in strips {
            let merged = if shift == 0 {
                data
            } else {
                (prev >> (8 - shift)) | (data << shift)
            };
            self.emit_page(mode.compose(merged), page)?;
            prev = data;
            page += 1;
        }
        if shift != 0 {
            self.emit_page(mode.compose(prev >> (8 - shift)), page)?;
        }
        Ok(())
    }
}
