//! The main API to the display driver. It provides initialization and display control, the text
//! cursor, and the drawing primitives implemented in the submodules.
//!
//! Nothing is buffered locally: each call streams its bytes straight into the display RAM of the
//! SSD1306, so what was drawn before is overwritten at byte (8 pixel column) granularity wherever
//! a primitive touches it.

pub mod raster;
pub mod text;
pub mod window;

use crate::command::consts::*;
use crate::command::*;
use crate::config::{Config, Geometry};
use crate::interface;
use crate::transaction::TransactionBuffer;

pub use self::raster::FillMode;
pub use self::text::TextMode;

/// A pixel coordinate pair of `column` and `row`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PixelCoord(pub i16, pub i16);

/// Text cursor and rendering state. Only text output and the cursor setters change it.
#[derive(Clone, Copy, Debug)]
struct Cursor {
    x: i16,
    y: i16,
    /// Glyph magnification, 1-4.
    scale: u8,
    mode: TextMode,
    invert: bool,
    /// The previous byte above 0x7F, for decoding two-byte sequences.
    last_byte: u8,
    auto_println: bool,
    /// Set by a line break; a space printed at the start of the new line is swallowed.
    line_start: bool,
}

impl Default for Cursor {
    fn default() -> Self {
        Cursor {
            x: 0,
            y: 0,
            scale: 1,
            mode: TextMode::Replace,
            invert: false,
            last_byte: 0,
            auto_println: false,
            line_start: false,
        }
    }
}

/// A driver for an SSD1306 display.
pub struct Display<DI>
where
    DI: interface::DisplayInterface,
{
    tx: TransactionBuffer<DI>,
    geometry: Geometry,
    max_page: i16,
    max_y: i16,
    /// Sub-page row offset (0-7) of the window last selected on the controller.
    shift: u8,
    /// Whether the window selected on the controller is the one belonging to the text cursor.
    /// Primitives select their own windows; text output re-selects the cursor's when needed.
    cursor_window: bool,
    cursor: Cursor,
}

impl<DI> Display<DI>
where
    DI: interface::DisplayInterface,
{
    /// Construct a new display driver for a panel of the given height, which is connected to the
    /// interface `iface`. Nothing is sent until `init`.
    pub fn new(iface: DI, geometry: Geometry) -> Self {
        Display {
            tx: TransactionBuffer::new(iface),
            geometry,
            max_page: geometry.max_page() as i16,
            max_y: geometry.max_y() as i16,
            shift: 0,
            cursor_window: false,
            cursor: Cursor::default(),
        }
    }

    /// Initialize the display with a config message, then home the cursor. Display RAM is not
    /// cleared; call `clear` if the panel may hold garbage.
    pub fn init(&mut self, config: Config) -> Result<(), DI::Error> {
        #[cfg(feature = "defmt")]
        defmt::debug!("ssd1306: init 128x{}", self.geometry.height());
        config.send(&mut self.tx)?;
        self.geometry.send(&mut self.tx)?;
        self.cursor = Cursor::default();
        self.home()
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Give back the bus interface.
    pub fn release(self) -> DI {
        self.tx.release()
    }

    /// Switch the panel on or off. Display RAM is retained while off.
    pub fn set_power(&mut self, on: bool) -> Result<(), DI::Error> {
        Command::SetDisplayOn(on).send(&mut self.tx)
    }

    /// Control the contrast, 0-255.
    pub fn set_contrast(&mut self, contrast: u8) -> Result<(), DI::Error> {
        Command::SetContrast(contrast).send(&mut self.tx)
    }

    /// Mirror the image horizontally.
    pub fn flip_h(&mut self, flip: bool) -> Result<(), DI::Error> {
        Command::SetSegmentRemap(flip).send(&mut self.tx)
    }

    /// Mirror the image vertically.
    pub fn flip_v(&mut self, flip: bool) -> Result<(), DI::Error> {
        Command::SetComScanReverse(flip).send(&mut self.tx)
    }

    /// Invert the whole panel in hardware, without touching display RAM.
    pub fn invert_display(&mut self, invert: bool) -> Result<(), DI::Error> {
        let mode = if invert {
            DisplayMode::Inverse
        } else {
            DisplayMode::Normal
        };
        Command::SetDisplayMode(mode).send(&mut self.tx)
    }

    /// Write `byte` to every column of every page.
    pub fn fill(&mut self, byte: u8) -> Result<(), DI::Error> {
        self.set_window(0, 0, COL_MAX as i16, self.max_page)?;
        let count = NUM_PIXEL_COLS as usize * self.geometry.pages() as usize;
        self.tx.begin_data()?;
        self.tx.emit_all(itertools::repeat_n(byte, count))?;
        self.tx.end()
    }

    /// Blank the whole display.
    pub fn clear(&mut self) -> Result<(), DI::Error> {
        self.fill(0)
    }

    /// Move the text cursor to the top left corner.
    pub fn home(&mut self) -> Result<(), DI::Error> {
        self.set_cursor_xy(0, 0)
    }

    /// Move the text cursor to pixel column `x` of text row `row` (8 pixel rows each).
    pub fn set_cursor(&mut self, x: i16, row: i16) -> Result<(), DI::Error> {
        self.set_cursor_xy(x, row.saturating_mul(PAGE_HEIGHT as i16))
    }

    /// Move the text cursor to an arbitrary pixel. Rows that are not a multiple of 8 are drawn
    /// with the sub-page shift.
    pub fn set_cursor_xy(&mut self, x: i16, y: i16) -> Result<(), DI::Error> {
        self.cursor.x = x;
        self.cursor.y = y;
        self.select_cursor_window()
    }

    pub fn cursor(&self) -> PixelCoord {
        PixelCoord(self.cursor.x, self.cursor.y)
    }

    /// Set the glyph magnification. Values outside 1-4 are clipped.
    pub fn set_scale(&mut self, scale: u8) -> Result<(), DI::Error> {
        self.cursor.scale = clip(1, scale, 4);
        self.select_cursor_window()
    }

    pub fn scale(&self) -> u8 {
        self.cursor.scale
    }

    /// Draw text light-on-dark (`false`) or dark-on-light (`true`).
    pub fn invert_text(&mut self, invert: bool) {
        self.cursor.invert = invert;
    }

    /// Select how glyphs and bitmaps combine with what is already on the display.
    pub fn text_mode(&mut self, mode: TextMode) {
        self.cursor.mode = mode;
    }

    /// Enable interpretation of `\r` and `\n`, wrapping at the right edge, and dropping a
    /// leading space after a line break.
    pub fn auto_println(&mut self, enabled: bool) {
        self.cursor.auto_println = enabled;
    }

    /// Whether the cursor has run off the bottom of the display.
    pub fn is_end(&self) -> bool {
        self.cursor.y > self.max_y
    }
}
