//! Trigger-policy encoding for pin-bank interrupts

use core::fmt;
use crate::{Error, Result};

/// Condition under which a pin interrupt fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerPolicy {
    /// Fire on a low-to-high transition
    RisingEdge,
    /// Fire on a high-to-low transition
    FallingEdge,
    /// Fire on either transition
    BothEdges,
    /// Fire while the pin reads high
    LevelHigh,
    /// Fire while the pin reads low
    LevelLow,
}

impl TriggerPolicy {
    /// All recognized policies
    pub const ALL: [TriggerPolicy; 5] = [
        TriggerPolicy::RisingEdge,
        TriggerPolicy::FallingEdge,
        TriggerPolicy::BothEdges,
        TriggerPolicy::LevelHigh,
        TriggerPolicy::LevelLow,
    ];

    /// Register bit pattern for this policy
    ///
    /// Each policy maps to exactly one pattern. Both-edges triggering
    /// sets the dual-edge flag; the hardware ignores the mode and
    /// polarity bits while that flag is set.
    pub const fn encode(self) -> TriggerBits {
        match self {
            TriggerPolicy::RisingEdge => TriggerBits::Single {
                mode: TriggerMode::Edge,
                polarity: Polarity::Low,
            },
            TriggerPolicy::FallingEdge => TriggerBits::Single {
                mode: TriggerMode::Edge,
                polarity: Polarity::High,
            },
            TriggerPolicy::LevelHigh => TriggerBits::Single {
                mode: TriggerMode::Level,
                polarity: Polarity::Low,
            },
            TriggerPolicy::LevelLow => TriggerBits::Single {
                mode: TriggerMode::Level,
                polarity: Polarity::High,
            },
            TriggerPolicy::BothEdges => TriggerBits::DualEdge,
        }
    }
}

impl TryFrom<u8> for TriggerPolicy {
    type Error = Error;

    /// Decode a raw policy value, as carried in configuration blobs
    fn try_from(raw: u8) -> Result<Self> {
        match raw {
            0 => Ok(TriggerPolicy::RisingEdge),
            1 => Ok(TriggerPolicy::FallingEdge),
            2 => Ok(TriggerPolicy::BothEdges),
            3 => Ok(TriggerPolicy::LevelHigh),
            4 => Ok(TriggerPolicy::LevelLow),
            _ => Err(Error::InvalidArgument),
        }
    }
}

impl fmt::Display for TriggerPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerPolicy::RisingEdge => write!(f, "rising-edge"),
            TriggerPolicy::FallingEdge => write!(f, "falling-edge"),
            TriggerPolicy::BothEdges => write!(f, "both-edges"),
            TriggerPolicy::LevelHigh => write!(f, "level-high"),
            TriggerPolicy::LevelLow => write!(f, "level-low"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TriggerPolicy {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            TriggerPolicy::RisingEdge => defmt::write!(fmt, "rising-edge"),
            TriggerPolicy::FallingEdge => defmt::write!(fmt, "falling-edge"),
            TriggerPolicy::BothEdges => defmt::write!(fmt, "both-edges"),
            TriggerPolicy::LevelHigh => defmt::write!(fmt, "level-high"),
            TriggerPolicy::LevelLow => defmt::write!(fmt, "level-low"),
        }
    }
}

/// Interrupt detection mode bit of a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerMode {
    /// Edge-sensitive detection
    Edge,
    /// Level-sensitive detection
    Level,
}

/// Polarity bit of a pin trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Low,
    High,
}

/// Register bit pattern a trigger policy programs into the pin bank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerBits {
    /// Mode and polarity bits for single-condition triggering
    Single {
        mode: TriggerMode,
        polarity: Polarity,
    },
    /// Dual-edge flag set; mode and polarity bits left untouched
    DualEdge,
}
