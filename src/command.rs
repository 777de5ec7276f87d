//! The command set for the SSD1306.
//!
//! Note 1: The display RAM of the SSD1306 is arranged in 128 columns and 8 pages, where each page
//! is a horizontal band 8 pixels tall. One byte of display RAM is one column of one page, with the
//! least significant bit at the top. Anywhere there is a "page" address, it refers to such a band,
//! not to a pixel row.

use crate::interface::DisplayInterface;
use crate::transaction::TransactionBuffer;

pub mod consts {
    //! Bus and geometry constants.

    /// Control byte: the rest of the transaction is a stream of commands.
    pub const COMMAND_STREAM: u8 = 0x00;
    /// Control byte: exactly one command byte follows.
    pub const ONE_COMMAND: u8 = 0x80;
    /// Control byte: the rest of the transaction is written to display RAM.
    pub const DATA_STREAM: u8 = 0x40;
    /// Control byte: exactly one display RAM byte follows.
    pub const ONE_DATA: u8 = 0xC0;

    pub const NUM_PIXEL_COLS: u8 = 128;
    pub const COL_MAX: u8 = NUM_PIXEL_COLS - 1;
    /// Pixel rows per page.
    pub const PAGE_HEIGHT: u8 = 8;
    /// The largest number of pages any supported panel has.
    pub const NUM_PAGES_MAX: u8 = 8;
}

use self::consts::*;

/// How the RAM write pointer advances as image data is written.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddressingMode {
    /// Column first, then page, within the column and page ranges.
    Horizontal,
    /// Page first, then column, within the column and page ranges. The driver relies on this:
    /// each data byte fills the next page of the current column before moving right.
    Vertical,
    /// Column only; the page is set separately. Ranges are ignored.
    Page,
}

/// Setting of the display mode.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayMode {
    /// A set RAM bit lights the pixel.
    Normal,
    /// A set RAM bit darkens the pixel.
    Inverse,
}

/// How the COM lines are wired to the panel rows. Dictated by the display module; 128x32 modules
/// use the sequential layout, 128x64 modules the alternative one.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ComPins {
    Sequential,
    Alternative,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Turn the panel on (leave sleep) or off (sleep). Display RAM is retained while off.
    SetDisplayOn(bool),
    /// Set the oscillator frequency Fosc (0-15) and the display clock divide ratio (1-16).
    SetClockDivider(u8, u8),
    /// Enable or disable the internal charge pump. Needed when the module has no external VCC.
    SetChargePump(bool),
    /// Select how the RAM pointer advances. See `AddressingMode`.
    SetAddressingMode(AddressingMode),
    /// Mirror the column addresses, flipping the image horizontally.
    SetSegmentRemap(bool),
    /// Scan COM lines in reverse, flipping the image vertically.
    SetComScanReverse(bool),
    /// Set the contrast. Range 0-255.
    SetContrast(u8),
    /// Set the VCOMH deselect level. Range 0-7, where 4 is about 0.83 * VCC.
    SetVcomDeselect(u8),
    /// Set the display operating mode. See enum for details.
    SetDisplayMode(DisplayMode),
    /// Set the COM pins hardware configuration. See enum for details.
    SetComPins(ComPins),
    /// Set the multiplex ratio, i.e. the number of active COM lines. Range 16-64.
    SetMuxRatio(u8),
    /// Set the column start and end address of the RAM window. Range 0-127. The write pointer is
    /// reset to the start column.
    SetColumnAddress(u8, u8),
    /// Set the page start and end address of the RAM window. Range 0-7. The write pointer is
    /// reset to the start page. (Note 1)
    SetPageAddress(u8, u8),
}

/// Clip a value between some low and high limit.
pub(crate) fn clip<T: PartialOrd>(lo: T, x: T, hi: T) -> T {
    match () {
        _ if x > hi => hi,
        _ if x < lo => lo,
        _ => x,
    }
}

macro_rules! encoded {
    ($buf:ident, [$b0:expr]) => {{
        $buf[0] = $b0;
        &$buf[..1]
    }};
    ($buf:ident, [$b0:expr, $b1:expr]) => {{
        $buf[0] = $b0;
        $buf[1] = $b1;
        &$buf[..2]
    }};
    ($buf:ident, [$b0:expr, $b1:expr, $b2:expr]) => {{
        $buf[0] = $b0;
        $buf[1] = $b1;
        $buf[2] = $b2;
        &$buf[..3]
    }};
}

impl Command {
    /// Encode the command and its arguments into `buf`, returning the used prefix. Arguments
    /// outside their valid range are clipped into it.
    pub fn encode(self, buf: &mut [u8; 3]) -> &[u8] {
        match self {
            Command::SetDisplayOn(on) => encoded!(buf, [if on { 0xAF } else { 0xAE }]),
            Command::SetClockDivider(fosc, divide) => {
                let fosc = clip(0, fosc, 15);
                let divide = clip(1, divide, 16);
                encoded!(buf, [0xD5, fosc << 4 | (divide - 1)])
            }
            Command::SetChargePump(on) => encoded!(buf, [0x8D, if on { 0x14 } else { 0x10 }]),
            Command::SetAddressingMode(mode) => {
                let m = match mode {
                    AddressingMode::Horizontal => 0x00,
                    AddressingMode::Vertical => 0x01,
                    AddressingMode::Page => 0x02,
                };
                encoded!(buf, [0x20, m])
            }
            Command::SetSegmentRemap(remap) => encoded!(buf, [if remap { 0xA1 } else { 0xA0 }]),
            Command::SetComScanReverse(rev) => encoded!(buf, [if rev { 0xC8 } else { 0xC0 }]),
            Command::SetContrast(contrast) => encoded!(buf, [0x81, contrast]),
            Command::SetVcomDeselect(level) => encoded!(buf, [0xDB, clip(0, level, 7) << 4]),
            Command::SetDisplayMode(mode) => encoded!(
                buf,
                [match mode {
                    DisplayMode::Normal => 0xA6,
                    DisplayMode::Inverse => 0xA7,
                }]
            ),
            Command::SetComPins(pins) => {
                let p = match pins {
                    ComPins::Sequential => 0x02,
                    ComPins::Alternative => 0x12,
                };
                encoded!(buf, [0xDA, p])
            }
            Command::SetMuxRatio(ratio) => {
                encoded!(buf, [0xA8, clip(16, ratio, NUM_PAGES_MAX * PAGE_HEIGHT) - 1])
            }
            Command::SetColumnAddress(start, end) => {
                encoded!(buf, [0x21, clip(0, start, COL_MAX), clip(0, end, COL_MAX)])
            }
            Command::SetPageAddress(start, end) => {
                let page_max = NUM_PAGES_MAX - 1;
                encoded!(buf, [0x22, clip(0, start, page_max), clip(0, end, page_max)])
            }
        }
    }

    /// Send the command in a transaction of its own. Single-byte commands use the one-shot
    /// control byte, longer ones a command stream.
    pub fn send<DI>(self, tx: &mut TransactionBuffer<DI>) -> Result<(), DI::Error>
    where
        DI: DisplayInterface,
    {
        let mut buf = [0u8; 3];
        let bytes = self.encode(&mut buf);
        if bytes.len() == 1 {
            tx.begin_one_command()?;
        } else {
            tx.begin_command()?;
        }
        tx.emit_all(bytes.iter().cloned())?;
        tx.end()
    }

    /// Append the command to a command stream that the caller has already opened.
    pub fn append<DI>(self, tx: &mut TransactionBuffer<DI>) -> Result<(), DI::Error>
    where
        DI: DisplayInterface,
    {
        let mut buf = [0u8; 3];
        tx.emit_all(self.encode(&mut buf).iter().cloned())
    }
}
