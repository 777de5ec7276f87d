//! Chunking of the controller byte stream into bus transactions.
//!
//! The SSD1306 expects every I2C transaction to start with a control ("mode") byte that says how
//! the rest of the transaction is interpreted. Bus implementations have a small transmit buffer,
//! so a long data stream has to be cut into several transactions. Since the controller keeps its
//! own RAM write pointer, reopening a transaction in the same mode continues exactly where the
//! previous one stopped.

use crate::command::consts::*;
use crate::interface::DisplayInterface;

#[derive(Clone, Copy, Debug, PartialEq)]
enum State {
    /// No transaction is open.
    Idle,
    /// A transaction in the given mode is open.
    Open(u8),
    /// The last transaction in the given mode was closed because it ran full. The next `emit`
    /// reopens it.
    Spilled(u8),
}

/// Wraps a `DisplayInterface` and counts payload bytes, splitting the stream at the interface's
/// transaction length.
pub struct TransactionBuffer<DI> {
    iface: DI,
    state: State,
    writes: usize,
}

impl<DI> TransactionBuffer<DI>
where
    DI: DisplayInterface,
{
    pub fn new(iface: DI) -> Self {
        TransactionBuffer {
            iface,
            state: State::Idle,
            writes: 0,
        }
    }

    /// Start a command stream.
    pub fn begin_command(&mut self) -> Result<(), DI::Error> {
        self.begin(COMMAND_STREAM)
    }

    /// Start a transaction carrying exactly one single-byte command.
    pub fn begin_one_command(&mut self) -> Result<(), DI::Error> {
        self.begin(ONE_COMMAND)
    }

    /// Start a display RAM data stream.
    pub fn begin_data(&mut self) -> Result<(), DI::Error> {
        self.begin(DATA_STREAM)
    }

    /// Start a transaction carrying exactly one display RAM byte.
    pub fn begin_one_data(&mut self) -> Result<(), DI::Error> {
        self.begin(ONE_DATA)
    }

    fn begin(&mut self, mode: u8) -> Result<(), DI::Error> {
        self.end()?;
        self.open(mode)
    }

    fn open(&mut self, mode: u8) -> Result<(), DI::Error> {
        self.iface.begin()?;
        self.iface.write(mode)?;
        self.state = State::Open(mode);
        Ok(())
    }

    /// Append one payload byte to the current stream.
    pub fn emit(&mut self, byte: u8) -> Result<(), DI::Error> {
        if let State::Spilled(mode) = self.state {
            self.open(mode)?;
        }
        self.iface.write(byte)?;
        self.writes += 1;

        // The mode byte takes one slot of the transaction.
        if self.writes >= self.payload_limit() {
            let mode = match self.state {
                State::Open(mode) => mode,
                _ => DATA_STREAM,
            };
            self.end()?;
            self.state = State::Spilled(mode);
        }
        Ok(())
    }

    /// Emit every byte of `bytes` in order.
    pub fn emit_all<I>(&mut self, bytes: I) -> Result<(), DI::Error>
    where
        I: IntoIterator<Item = u8>,
    {
        bytes.into_iter().try_for_each(|b| self.emit(b))
    }

    /// Close the open transaction, if any.
    pub fn end(&mut self) -> Result<(), DI::Error> {
        let was = core::mem::replace(&mut self.state, State::Idle);
        self.writes = 0;
        match was {
            State::Open(_) => self.iface.end(),
            _ => Ok(()),
        }
    }

    fn payload_limit(&self) -> usize {
        // At least one payload byte per transaction.
        self.iface.max_transaction_len().saturating_sub(1).max(1)
    }

    pub fn release(self) -> DI {
        self.iface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::test_spy::{SpyError, TestSpyInterface};
    use proptest::prelude::*;

    #[test]
    fn short_stream_is_one_transaction() {
        let di = TestSpyInterface::new();
        let mut tx = TransactionBuffer::new(di.split());
        tx.begin_command().unwrap();
        tx.emit_all(vec![0x20, 0x01]).unwrap();
        tx.end().unwrap();
        di.check_multi(&[&[0x00, 0x20, 0x01]]);
    }

    #[test]
    fn long_data_stream_splits_at_limit() {
        let di = TestSpyInterface::with_max_len(4);
        let mut tx = TransactionBuffer::new(di.split());
        tx.begin_command().unwrap();
        tx.emit_all(vec![0x20, 0x01]).unwrap();
        tx.end().unwrap();
        tx.begin_data().unwrap();
        tx.emit_all(1..=7).unwrap();
        tx.end().unwrap();
        #[cfg_attr(rustfmt, rustfmt_skip)]
        di.check_multi(&[
            &[0x00, 0x20, 0x01],
            &[0x40, 1, 2, 3],
            &[0x40, 4, 5, 6],
            &[0x40, 7],
        ]);
    }

    #[test]
    fn exact_fill_leaves_no_empty_transaction() {
        let di = TestSpyInterface::with_max_len(4);
        let mut tx = TransactionBuffer::new(di.split());
        tx.begin_command().unwrap();
        tx.emit_all(vec![0x20, 0x01]).unwrap();
        tx.end().unwrap();
        tx.begin_data().unwrap();
        tx.emit_all(vec![9, 8, 7]).unwrap();
        tx.end().unwrap();
        di.check_multi(&[&[0x00, 0x20, 0x01], &[0x40, 9, 8, 7]]);
    }

    #[test]
    fn command_stream_reopens_as_command() {
        let di = TestSpyInterface::with_max_len(3);
        let mut tx = TransactionBuffer::new(di.split());
        tx.begin_command().unwrap();
        tx.emit_all(vec![0x81, 0x10, 0xA6]).unwrap();
        tx.end().unwrap();
        di.check_multi(&[&[0x00, 0x81, 0x10], &[0x00, 0xA6]]);
    }

    #[test]
    fn begin_closes_previous() {
        let di = TestSpyInterface::new();
        let mut tx = TransactionBuffer::new(di.split());
        tx.begin_one_command().unwrap();
        tx.emit(0xAF).unwrap();
        tx.begin_command().unwrap();
        tx.emit_all(vec![0x20, 0x01]).unwrap();
        tx.end().unwrap();
        tx.end().unwrap();
        di.check_multi(&[&[0x80, 0xAF], &[0x00, 0x20, 0x01]]);
    }

    #[test]
    fn transport_error_propagates() {
        let mut di = TestSpyInterface::new();
        di.fail_after(0);
        let mut tx = TransactionBuffer::new(di.split());
        tx.begin_one_command().unwrap();
        tx.emit(0xAE).unwrap();
        assert_eq!(tx.end(), Err(SpyError));
    }

    proptest! {
        // The spy asserts on any transaction longer than its limit, so streaming through it is
        // the check; the counts confirm nothing was lost or duplicated.
        #[test]
        fn transactions_never_exceed_limit(
            max_len in 4usize..40,
            lens in prop::collection::vec(0usize..200, 1..6),
        ) {
            let di = TestSpyInterface::with_max_len(max_len);
            let mut tx = TransactionBuffer::new(di.split());
            tx.begin_command().unwrap();
            tx.emit_all(vec![0x20, 0x01]).unwrap();
            tx.end().unwrap();
            for len in &lens {
                tx.begin_data().unwrap();
                tx.emit_all((0..*len).map(|i| i as u8)).unwrap();
                tx.end().unwrap();
            }
            let txs = di.transactions();
            prop_assert!(txs.iter().all(|t| t.len() <= max_len));
            prop_assert_eq!(di.data().len(), lens.iter().sum::<usize>());
        }
    }
}
