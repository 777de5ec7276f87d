//! Defines the panel geometry and the register values sent once at initialization.

use crate::command::consts::*;
use crate::command::*;
use crate::interface::DisplayInterface;
use crate::transaction::TransactionBuffer;

/// The panel height. Width is always 128 columns.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Geometry {
    /// 128x32 modules, 4 pages.
    Rows32,
    /// 128x64 modules, 8 pages.
    Rows64,
}

impl Geometry {
    pub fn height(self) -> u8 {
        match self {
            Geometry::Rows32 => 32,
            Geometry::Rows64 => 64,
        }
    }

    pub fn pages(self) -> u8 {
        self.height() / PAGE_HEIGHT
    }

    /// The last valid page address.
    pub fn max_page(self) -> u8 {
        self.pages() - 1
    }

    /// The last valid pixel row.
    pub fn max_y(self) -> u8 {
        self.height() - 1
    }

    fn com_pins(self) -> ComPins {
        match self {
            Geometry::Rows32 => ComPins::Sequential,
            Geometry::Rows64 => ComPins::Alternative,
        }
    }

    /// Transmit the commands that depend on the panel height.
    pub(crate) fn send<DI>(self, tx: &mut TransactionBuffer<DI>) -> Result<(), DI::Error>
    where
        DI: DisplayInterface,
    {
        tx.begin_command()?;
        Command::SetComPins(self.com_pins()).append(tx)?;
        Command::SetMuxRatio(self.height()).append(tx)?;
        tx.end()
    }
}

/// A configuration for the display. Builder methods offer a declarative way to override the
/// values sent at init time; anything not overridden uses the defaults below, which suit common
/// 3.3V modules without external VCC.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    fosc: u8,
    divide: u8,
    charge_pump: bool,
    flip_h: bool,
    flip_v: bool,
    contrast: u8,
    vcom_deselect: u8,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            fosc: 8,
            divide: 1,
            charge_pump: true,
            flip_h: false,
            flip_v: false,
            contrast: 0x7F,
            vcom_deselect: 4,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extend this `Config` to set the contrast. See `Command::SetContrast`.
    pub fn contrast(self, contrast: u8) -> Self {
        Self { contrast, ..self }
    }

    /// Extend this `Config` to set the oscillator frequency and clock divide ratio. See
    /// `Command::SetClockDivider`.
    pub fn clock_divider(self, fosc: u8, divide: u8) -> Self {
        Self {
            fosc,
            divide,
            ..self
        }
    }

    /// Extend this `Config` to enable or disable the internal charge pump. Disable it only for
    /// modules that supply VCC externally.
    pub fn charge_pump(self, charge_pump: bool) -> Self {
        Self {
            charge_pump,
            ..self
        }
    }

    /// Extend this `Config` to set the VCOMH deselect level. See `Command::SetVcomDeselect`.
    pub fn vcom_deselect(self, level: u8) -> Self {
        Self {
            vcom_deselect: level,
            ..self
        }
    }

    /// Extend this `Config` to start with the image mirrored horizontally.
    pub fn flip_h(self, flip_h: bool) -> Self {
        Self { flip_h, ..self }
    }

    /// Extend this `Config` to start with the image mirrored vertically.
    pub fn flip_v(self, flip_v: bool) -> Self {
        Self { flip_v, ..self }
    }

    /// Transmit the bring-up command sequence in a single command stream. The panel is switched
    /// off first and back on last, so nothing half-configured is ever shown.
    pub(crate) fn send<DI>(&self, tx: &mut TransactionBuffer<DI>) -> Result<(), DI::Error>
    where
        DI: DisplayInterface,
    {
        let sequence = [
            Command::SetDisplayOn(false),
            Command::SetClockDivider(self.fosc, self.divide),
            Command::SetChargePump(self.charge_pump),
            Command::SetAddressingMode(AddressingMode::Vertical),
            Command::SetSegmentRemap(self.flip_h),
            Command::SetComScanReverse(self.flip_v),
            Command::SetContrast(self.contrast),
            Command::SetVcomDeselect(self.vcom_deselect),
            Command::SetDisplayMode(DisplayMode::Normal),
            Command::SetDisplayOn(true),
        ];
        tx.begin_command()?;
        for cmd in sequence.iter() {
            cmd.append(tx)?;
        }
        tx.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::test_spy::TestSpyInterface;

    #[test]
    fn geometry_bounds() {
        assert_eq!(Geometry::Rows32.pages(), 4);
        assert_eq!(Geometry::Rows32.max_page(), 3);
        assert_eq!(Geometry::Rows32.max_y(), 31);
        assert_eq!(Geometry::Rows64.pages(), 8);
        assert_eq!(Geometry::Rows64.max_page(), 7);
        assert_eq!(Geometry::Rows64.max_y(), 63);
    }

    #[test]
    fn geometry_commands() {
        let di = TestSpyInterface::new();
        let mut tx = TransactionBuffer::new(di.split());
        Geometry::Rows32.send(&mut tx).unwrap();
        Geometry::Rows64.send(&mut tx).unwrap();
        di.check_multi(&[&[0x00, 0xDA, 0x02, 0xA8, 0x1F], &[0x00, 0xDA, 0x12, 0xA8, 0x3F]]);
    }

    #[test]
    fn config_overrides() {
        let di = TestSpyInterface::new();
        let mut tx = TransactionBuffer::new(di.split());
        Config::new()
            .contrast(0x20)
            .clock_divider(15, 2)
            .charge_pump(false)
            .vcom_deselect(2)
            .flip_h(true)
            .flip_v(true)
            .send(&mut tx)
            .unwrap();
        #[cfg_attr(rustfmt, rustfmt_skip)]
        di.check_multi(&[&[
            0x00,
            0xAE, // display off
            0xD5, 0xF1, // clock
            0x8D, 0x10, // charge pump off
            0x20, 0x01, // vertical addressing
            0xA1, // flipped horizontally
            0xC8, // flipped vertically
            0x81, 0x20, // contrast
            0xDB, 0x20, // vcom deselect
            0xA6, // normal display
            0xAF, // display on
        ]]);
    }
}
