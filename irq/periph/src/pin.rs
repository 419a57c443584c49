//! Pin bank adapter and trigger configurator

use core::fmt;

use embedded_hal::digital;
use irq_core::{Error, EventId, Result, TriggerPolicy};
use irq_hal::{Direction, IrqStatus, Level, PinBankHw};

/// Adapter over one bank of interrupt-capable pins
///
/// Validates pin numbers against the bank size before calling down,
/// and owns the trigger configuration sequence.
pub struct PinBank<P: PinBankHw> {
    hw: P,
}

impl<P: PinBankHw> PinBank<P> {
    /// Wrap a pin bank
    pub fn new(hw: P) -> Self {
        Self { hw }
    }

    fn check(&self, pin: EventId) -> Result<()> {
        if pin.bit() < self.hw.pin_count() {
            Ok(())
        } else {
            Err(Error::InvalidArgument)
        }
    }

    /// Configure a pin as input or output
    pub fn set_direction(&mut self, pin: EventId, direction: Direction) -> Result<()> {
        self.check(pin)?;
        self.hw.set_direction(pin.bit(), direction);
        Ok(())
    }

    /// Current direction of a pin
    pub fn direction(&self, pin: EventId) -> Result<Direction> {
        self.check(pin)?;
        Ok(self.hw.direction(pin.bit()))
    }

    /// Drive an output pin
    pub fn write_level(&mut self, pin: EventId, level: Level) -> Result<()> {
        self.check(pin)?;
        self.hw.write_level(pin.bit(), level);
        Ok(())
    }

    /// Sample a pin
    pub fn read_level(&self, pin: EventId) -> Result<Level> {
        self.check(pin)?;
        Ok(self.hw.read_level(pin.bit()))
    }

    /// Release a pin to high impedance
    pub fn release(&mut self, pin: EventId) -> Result<()> {
        self.check(pin)?;
        self.hw.release(pin.bit());
        Ok(())
    }

    /// Set the trigger condition for a pin's interrupt
    ///
    /// The pin's interrupt is held off and its pending flag cleared
    /// while the trigger registers are reprogrammed, so configuration
    /// cannot itself raise a dispatch. Whether the interrupt was
    /// enabled before the call is restored afterwards.
    pub fn set_trigger(&mut self, pin: EventId, policy: TriggerPolicy) -> Result<()> {
        self.check(pin)?;
        let was_enabled = self.hw.enabled_mask() & pin.bit_mask() != 0;
        self.hw.disable_source(pin.bit_mask());
        self.hw.clear_pending(pin.bit_mask());
        self.hw.apply_trigger(pin.bit(), policy.encode());
        if was_enabled {
            self.hw.enable_source(pin.bit_mask());
        }
        Ok(())
    }

    /// Enable a pin's interrupt
    pub fn enable_irq(&mut self, pin: EventId) -> Result<()> {
        self.check(pin)?;
        self.hw.enable_source(pin.bit_mask());
        Ok(())
    }

    /// Disable a pin's interrupt and drop any latched flag
    ///
    /// Clearing the flag here keeps a stale interrupt from firing the
    /// moment the pin is re-enabled.
    pub fn disable_irq(&mut self, pin: EventId) -> Result<()> {
        self.check(pin)?;
        self.hw.disable_source(pin.bit_mask());
        self.hw.clear_pending(pin.bit_mask());
        Ok(())
    }

    /// Borrow one pin as an [`embedded-hal`](embedded_hal) digital pin
    pub fn pin(&mut self, pin: EventId) -> Result<Pin<'_, P>> {
        self.check(pin)?;
        Ok(Pin { bank: self, pin })
    }

    /// Access the underlying hardware
    pub fn hw(&self) -> &P {
        &self.hw
    }

    /// Mutable access to the underlying hardware
    pub fn hw_mut(&mut self) -> &mut P {
        &mut self.hw
    }

    /// Unwrap the adapter
    pub fn into_inner(self) -> P {
        self.hw
    }
}

/// Error wrapper for the [`embedded-hal`](embedded_hal) digital traits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinError(pub Error);

impl fmt::Display for PinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl digital::Error for PinError {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

/// One pin of a [`PinBank`], exposed through the `embedded-hal`
/// digital traits
pub struct Pin<'a, P: PinBankHw> {
    bank: &'a mut PinBank<P>,
    pin: EventId,
}

impl<P: PinBankHw> digital::ErrorType for Pin<'_, P> {
    type Error = PinError;
}

impl<P: PinBankHw> digital::OutputPin for Pin<'_, P> {
    fn set_low(&mut self) -> core::result::Result<(), PinError> {
        self.bank.write_level(self.pin, Level::Low).map_err(PinError)
    }

    fn set_high(&mut self) -> core::result::Result<(), PinError> {
        self.bank.write_level(self.pin, Level::High).map_err(PinError)
    }
}

impl<P: PinBankHw> digital::InputPin for Pin<'_, P> {
    fn is_high(&mut self) -> core::result::Result<bool, PinError> {
        Ok(self.bank.read_level(self.pin).map_err(PinError)? == Level::High)
    }

    fn is_low(&mut self) -> core::result::Result<bool, PinError> {
        Ok(self.bank.read_level(self.pin).map_err(PinError)? == Level::Low)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::digital::{InputPin, OutputPin};
    use irq_core::{TriggerBits, TriggerMode, Polarity};
    use irq_hal::mock::MockPins;

    fn pin(n: u8) -> EventId {
        EventId::new_unchecked(n)
    }

    #[test]
    fn test_out_of_range_pin_rejected_before_hw() {
        let mut bank = PinBank::new(MockPins::new(4));
        assert_eq!(bank.set_direction(pin(4), Direction::Output), Err(Error::InvalidArgument));
        assert_eq!(bank.set_trigger(pin(4), TriggerPolicy::RisingEdge), Err(Error::InvalidArgument));
        assert_eq!(bank.hw().trigger[4], None);
        assert_eq!(bank.hw().outputs, 0);
    }

    #[test]
    fn test_set_trigger_programs_policy_table() {
        let mut bank = PinBank::new(MockPins::new(8));
        bank.set_trigger(pin(2), TriggerPolicy::FallingEdge).unwrap();
        assert_eq!(
            bank.hw().trigger[2],
            Some(TriggerBits::Single {
                mode: TriggerMode::Edge,
                polarity: Polarity::High
            })
        );

        bank.set_trigger(pin(2), TriggerPolicy::BothEdges).unwrap();
        assert_eq!(bank.hw().trigger[2], Some(TriggerBits::DualEdge));
    }

    #[test]
    fn test_set_trigger_preserves_enabled_state() {
        let mut bank = PinBank::new(MockPins::new(8));

        bank.enable_irq(pin(5)).unwrap();
        bank.set_trigger(pin(5), TriggerPolicy::RisingEdge).unwrap();
        assert_ne!(bank.hw().enabled & (1 << 5), 0);
        bank.set_trigger(pin(5), TriggerPolicy::LevelLow).unwrap();
        assert_ne!(bank.hw().enabled & (1 << 5), 0);

        bank.disable_irq(pin(5)).unwrap();
        bank.set_trigger(pin(5), TriggerPolicy::RisingEdge).unwrap();
        assert_eq!(bank.hw().enabled & (1 << 5), 0);
    }

    #[test]
    fn test_set_trigger_clears_pending_flag() {
        let mut bank = PinBank::new(MockPins::new(8));
        bank.hw_mut().pending = 0b1010;
        bank.set_trigger(pin(1), TriggerPolicy::LevelHigh).unwrap();
        // Only pin 1's flag is dropped; pin 3 stays latched.
        assert_eq!(bank.hw().pending, 0b1000);
    }

    #[test]
    fn test_disable_irq_clears_latched_flag() {
        let mut bank = PinBank::new(MockPins::new(8));
        bank.enable_irq(pin(3)).unwrap();
        bank.hw_mut().pending = 0b1000;
        bank.disable_irq(pin(3)).unwrap();
        assert_eq!(bank.hw().pending, 0);
        assert_eq!(bank.hw().enabled & (1 << 3), 0);
    }

    #[test]
    fn test_disable_irq_idempotent() {
        let mut bank = PinBank::new(MockPins::new(8));
        bank.enable_irq(pin(2)).unwrap();
        bank.disable_irq(pin(2)).unwrap();
        let after_once = (bank.hw().enabled, bank.hw().pending);
        bank.disable_irq(pin(2)).unwrap();
        assert_eq!((bank.hw().enabled, bank.hw().pending), after_once);
    }

    #[test]
    fn test_level_ops() {
        let mut bank = PinBank::new(MockPins::new(8));
        bank.set_direction(pin(0), Direction::Output).unwrap();
        bank.write_level(pin(0), Level::High).unwrap();
        assert_eq!(bank.read_level(pin(0)), Ok(Level::High));
        bank.release(pin(0)).unwrap();
        assert_eq!(bank.hw().released, 1);
    }

    #[test]
    fn test_embedded_hal_pin() {
        let mut bank = PinBank::new(MockPins::new(8));
        let mut p = bank.pin(pin(6)).unwrap();
        p.set_high().unwrap();
        assert!(p.is_high().unwrap());
        p.set_low().unwrap();
        assert!(p.is_low().unwrap());
    }
}
