//! Pin bank capability traits

use irq_core::TriggerBits;

use crate::status::{IrqLine, IrqStatus};

/// Pin direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

/// Pin logic level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Low level (0V)
    Low,
    /// High level (VCC)
    High,
}

impl Level {
    /// The opposite level
    pub const fn toggled(self) -> Self {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

/// One bank of interrupt-capable pins
///
/// Pin numbers index the bank's status register bits, so a bank holds
/// at most 32 pins. Implementations may expose fewer via
/// [`pin_count`](PinBankHw::pin_count); callers validate the range
/// before calling down.
pub trait PinBankHw: IrqStatus + IrqLine {
    /// Number of pins in this bank
    fn pin_count(&self) -> u8;

    /// Configure a pin as input or output
    fn set_direction(&mut self, pin: u8, direction: Direction);

    /// Current direction of a pin
    fn direction(&self, pin: u8) -> Direction;

    /// Drive an output pin
    fn write_level(&mut self, pin: u8, level: Level);

    /// Sample a pin
    fn read_level(&self, pin: u8) -> Level;

    /// Release a pin to high impedance
    fn release(&mut self, pin: u8);

    /// Program the pin's trigger condition registers
    ///
    /// Per-pin interrupt enables go through
    /// [`IrqStatus::enable_source`] with the pin's bit mask.
    fn apply_trigger(&mut self, pin: u8, bits: TriggerBits);
}
