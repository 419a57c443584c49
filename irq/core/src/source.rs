//! Interrupt source identifiers

use core::fmt;
use crate::{Error, Result};

/// Number of event bits a peripheral status register can carry
pub const MAX_EVENTS: usize = 32;

/// Peripheral classes recognized by the controller facade
///
/// The discriminants double as the controller-level source ids. The
/// `global_enable`/`global_disable` operations walk these in ascending
/// discriminant order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum PeripheralClass {
    /// First serial port
    Serial0 = 0,
    /// Second serial port
    Serial1 = 1,
    /// Pin bank aggregate interrupt
    PinBank = 2,
    /// Clock alarm interrupt
    ClockAlarm = 3,
}

impl PeripheralClass {
    /// All recognized classes, in ascending id order
    pub const ALL: [PeripheralClass; 4] = [
        PeripheralClass::Serial0,
        PeripheralClass::Serial1,
        PeripheralClass::PinBank,
        PeripheralClass::ClockAlarm,
    ];

    /// Controller-level numeric id of this class
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Look up a class by its numeric id
    pub fn from_id(id: u8) -> Result<Self> {
        match id {
            0 => Ok(PeripheralClass::Serial0),
            1 => Ok(PeripheralClass::Serial1),
            2 => Ok(PeripheralClass::PinBank),
            3 => Ok(PeripheralClass::ClockAlarm),
            _ => Err(Error::InvalidArgument),
        }
    }
}

impl fmt::Display for PeripheralClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeripheralClass::Serial0 => write!(f, "serial0"),
            PeripheralClass::Serial1 => write!(f, "serial1"),
            PeripheralClass::PinBank => write!(f, "pins"),
            PeripheralClass::ClockAlarm => write!(f, "clock"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PeripheralClass {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            PeripheralClass::Serial0 => defmt::write!(fmt, "serial0"),
            PeripheralClass::Serial1 => defmt::write!(fmt, "serial1"),
            PeripheralClass::PinBank => defmt::write!(fmt, "pins"),
            PeripheralClass::ClockAlarm => defmt::write!(fmt, "clock"),
        }
    }
}

/// Bit position within a peripheral's status register (0..=31)
///
/// For the pin bank this is the pin number; for serial ports and the
/// clock it names one interrupt condition of the peripheral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventId(u8);

impl EventId {
    /// Create an event id, rejecting out-of-range bit positions
    pub fn new(bit: u8) -> Result<Self> {
        if (bit as usize) < MAX_EVENTS {
            Ok(EventId(bit))
        } else {
            Err(Error::InvalidArgument)
        }
    }

    /// Create an event id without validation (const fn)
    pub const fn new_unchecked(bit: u8) -> Self {
        EventId(bit)
    }

    /// Bit position of this event
    pub const fn bit(self) -> u8 {
        self.0
    }

    /// Single-bit mask for this event
    pub const fn bit_mask(self) -> u32 {
        1 << self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bit{}", self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for EventId {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "bit{}", self.0);
    }
}

/// One interrupt-capable event: a (peripheral class, bit index) pair
///
/// Identifiers are stable for the process lifetime; at most one live
/// callback registration exists per `SourceId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId {
    /// Peripheral owning the event
    pub class: PeripheralClass,
    /// Status register bit within the peripheral
    pub event: EventId,
}

impl SourceId {
    /// Create a source id from its parts
    pub const fn new(class: PeripheralClass, event: EventId) -> Self {
        Self { class, event }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.class, self.event)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SourceId {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}/{}", self.class, self.event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_ids_ascending() {
        let mut last = None;
        for class in PeripheralClass::ALL {
            if let Some(prev) = last {
                assert!(class.id() > prev);
            }
            last = Some(class.id());
        }
    }

    #[test]
    fn test_class_from_id() {
        for class in PeripheralClass::ALL {
            assert_eq!(PeripheralClass::from_id(class.id()), Ok(class));
        }
        assert_eq!(PeripheralClass::from_id(4), Err(Error::InvalidArgument));
    }

    #[test]
    fn test_event_id_range() {
        assert!(EventId::new(0).is_ok());
        assert!(EventId::new(31).is_ok());
        assert_eq!(EventId::new(32), Err(Error::InvalidArgument));
    }

    #[test]
    fn test_event_id_mask() {
        assert_eq!(EventId::new_unchecked(0).bit_mask(), 1);
        assert_eq!(EventId::new_unchecked(3).bit_mask(), 0b1000);
        assert_eq!(EventId::new_unchecked(31).bit_mask(), 1 << 31);
    }
}
