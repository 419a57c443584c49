//! Clock alarm time representation
//!
//! The clock peripheral keeps two counters: whole seconds (monotonic,
//! wrapping at the hardware width) and a sub-second fraction counted in
//! hardware units of 1/256 second. Conversions to and from milliseconds
//! truncate toward zero and never overshoot.

use core::fmt;

/// Sub-second hardware units per second
pub const SUBSEC_UNITS_PER_SEC: u32 = 256;

/// Convert milliseconds to sub-second hardware units, truncating
pub const fn subsec_units_from_ms(ms: u32) -> u32 {
    (ms as u64 * SUBSEC_UNITS_PER_SEC as u64 / 1000) as u32
}

/// Convert sub-second hardware units to milliseconds, truncating
pub const fn ms_from_subsec_units(units: u32) -> u32 {
    (units as u64 * 1000 / SUBSEC_UNITS_PER_SEC as u64) as u32
}

/// The two one-shot alarms of the clock peripheral
///
/// Both may be armed concurrently; arming one does not disarm the
/// other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AlarmKind {
    /// Fires when the seconds counter reaches the armed value
    TimeOfDay = 0,
    /// Fires when the sub-second counter reaches the armed value
    Subsecond = 1,
}

impl AlarmKind {
    /// Both alarm kinds, in id order
    pub const ALL: [AlarmKind; 2] = [AlarmKind::TimeOfDay, AlarmKind::Subsecond];

    /// Numeric id of this alarm
    pub const fn id(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for AlarmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlarmKind::TimeOfDay => write!(f, "time-of-day"),
            AlarmKind::Subsecond => write!(f, "subsecond"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for AlarmKind {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            AlarmKind::TimeOfDay => defmt::write!(fmt, "time-of-day"),
            AlarmKind::Subsecond => defmt::write!(fmt, "subsecond"),
        }
    }
}

/// A clock reading: whole seconds plus millisecond-resolution fraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime {
    /// Whole seconds
    pub seconds: u32,
    /// Sub-second fraction in milliseconds (0..1000)
    pub subsec_ms: u32,
}

impl ClockTime {
    /// Build a reading from the raw hardware counters
    pub const fn from_counters(seconds: u32, subsec_units: u32) -> Self {
        Self {
            seconds,
            subsec_ms: ms_from_subsec_units(subsec_units),
        }
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:03}s", self.seconds, self.subsec_ms)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ClockTime {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}.{:03}s", self.seconds, self.subsec_ms);
    }
}
