//! The bus interface. The driver only needs to open a transaction, push bytes into it, and close
//! it; how the bytes reach the controller is up to the implementation.

/// A transaction-scoped byte sink addressed to a single SSD1306.
pub trait DisplayInterface {
    type Error;

    /// The largest number of bytes, including the leading mode byte, that fit into one
    /// transaction.
    fn max_transaction_len(&self) -> usize;

    /// Open a transaction to the display.
    fn begin(&mut self) -> Result<(), Self::Error>;

    /// Queue one byte in the open transaction.
    fn write(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Close the open transaction, transmitting whatever was queued.
    fn end(&mut self) -> Result<(), Self::Error>;
}

pub mod i2c {
    //! The I2C interface. Bytes are collected in a fixed buffer between `begin` and `end` and sent
    //! as a single bus write, the same way Arduino-style `Wire` transmit buffers behave.

    use core::fmt;

    use crate::hal;

    use super::DisplayInterface;

    /// The 7-bit address of most SSD1306 modules. Modules with the SA0 pin pulled high answer on
    /// `0x3D` instead.
    pub const DEFAULT_ADDRESS: u8 = 0x3C;

    /// Transmit buffer length used when none is given explicitly.
    pub const DEFAULT_BUFFER_LEN: usize = 32;

    /// Errors reported by `I2cInterface`.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub enum I2cError<E> {
        /// The underlying I2C peripheral failed the write.
        Bus(E),
        /// More bytes were queued than the transmit buffer holds.
        BufferFull,
    }

    impl<E: fmt::Debug> fmt::Display for I2cError<E> {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            match self {
                I2cError::Bus(e) => write!(f, "I2C bus error: {:?}", e),
                I2cError::BufferFull => f.write_str("I2C transmit buffer full"),
            }
        }
    }

    #[cfg(feature = "std")]
    impl<E: fmt::Debug> std::error::Error for I2cError<E> {}

    pub struct I2cInterface<I2C, const N: usize = DEFAULT_BUFFER_LEN> {
        /// The I2C master device connected to the SSD1306.
        i2c: I2C,
        /// 7-bit device address.
        address: u8,
        buf: [u8; N],
        len: usize,
    }

    impl<I2C> I2cInterface<I2C> {
        /// Create a new I2C interface with the default 32-byte transmit buffer. `i2c` is the I2C
        /// master device and `address` the 7-bit address of the display.
        pub fn new(i2c: I2C, address: u8) -> Self {
            Self::with_buffer(i2c, address)
        }
    }

    impl<I2C, const N: usize> I2cInterface<I2C, N> {
        /// Create a new I2C interface whose transmit buffer holds `N` bytes. Use this when the
        /// HAL can take larger writes than 32 bytes, to cut down on addressing overhead.
        pub fn with_buffer(i2c: I2C, address: u8) -> Self {
            Self {
                i2c,
                address,
                buf: [0; N],
                len: 0,
            }
        }

        /// Give back the I2C peripheral.
        pub fn release(self) -> I2C {
            self.i2c
        }
    }

    impl<I2C, E, const N: usize> DisplayInterface for I2cInterface<I2C, N>
    where
        I2C: hal::blocking::i2c::Write<Error = E>,
    {
        type Error = I2cError<E>;

        fn max_transaction_len(&self) -> usize {
            N
        }

        fn begin(&mut self) -> Result<(), Self::Error> {
            self.len = 0;
            Ok(())
        }

        fn write(&mut self, byte: u8) -> Result<(), Self::Error> {
            let slot = self.buf.get_mut(self.len).ok_or(I2cError::BufferFull)?;
            *slot = byte;
            self.len += 1;
            Ok(())
        }

        fn end(&mut self) -> Result<(), Self::Error> {
            let len = core::mem::replace(&mut self.len, 0);
            if len == 0 {
                return Ok(());
            }
            self.i2c
                .write(self.address, &self.buf[..len])
                .map_err(I2cError::Bus)
        }
    }

}
