//! Driver library for the Solomon Systech SSD1306 monochrome OLED display driver, connected over
//! I2C.
//!
//! The driver keeps no framebuffer. Every drawing primitive is streamed straight into the display
//! RAM of the controller, which runs in vertical addressing mode, so memory use stays at a few
//! bytes of cursor state plus one bus transaction buffer.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate embedded_hal as hal;

pub mod command;
pub mod config;
pub mod display;
pub mod font;
pub mod interface;
pub mod transaction;

// Re-exports for primary API.
pub use command::{consts, Command, ComPins};
pub use config::{Config, Geometry};
pub use display::{Display, FillMode, PixelCoord, TextMode};
pub use interface::i2c::{I2cError, I2cInterface};
pub use interface::DisplayInterface;
