//! Serial port capability trait

use core::convert::Infallible;

use crate::status::{IrqLine, IrqStatus};

/// Serial data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataBits {
    Five,
    Six,
    Seven,
    Eight,
}

/// Serial stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopBits {
    One,
    Two,
}

/// Serial parity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Serial frame configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialConfig {
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub stop_bits: StopBits,
    pub parity: Parity,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud_rate: 115_200,
            data_bits: DataBits::Eight,
            stop_bits: StopBits::One,
            parity: Parity::None,
        }
    }
}

/// One serial port
///
/// Byte transfer is exposed through [`nb`]: `WouldBlock` means the
/// receive register is empty or the transmit register is full. The
/// adapter layer builds the blocking calls on top of these.
pub trait SerialHw: IrqStatus + IrqLine {
    /// Program the frame configuration
    fn configure(&mut self, config: &SerialConfig);

    /// Take one received byte, if any
    fn read_byte(&mut self) -> nb::Result<u8, Infallible>;

    /// Push one byte into the transmitter, if it has room
    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Infallible>;
}
