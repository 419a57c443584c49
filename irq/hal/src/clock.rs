//! Clock/counter capability trait

use irq_core::AlarmKind;

use crate::status::{IrqLine, IrqStatus};

/// The clock peripheral: a seconds counter, a sub-second counter, and
/// two one-shot alarms
pub trait ClockHw: IrqStatus + IrqLine {
    /// Start the counter
    fn start(&mut self);

    /// Stop the counter
    fn stop(&mut self);

    /// Whether the counter is still settling after a prior write
    ///
    /// While busy, counter reads and writes are unreliable and callers
    /// report [`irq_core::Error::Busy`] instead of touching the
    /// registers.
    fn busy(&self) -> bool;

    /// Whole-seconds counter
    fn seconds(&self) -> u32;

    /// Sub-second counter, in hardware units of 1/256 second
    fn subsec_units(&self) -> u32;

    /// Load the whole-seconds counter
    fn set_seconds(&mut self, seconds: u32);

    /// Arm a one-shot alarm at the given counter value
    ///
    /// Arming one alarm kind leaves the other untouched.
    fn arm_alarm(&mut self, kind: AlarmKind, value: u32);

    /// Disarm one alarm kind
    fn disarm_alarm(&mut self, kind: AlarmKind);

    /// Whether an alarm kind is currently armed
    fn alarm_armed(&self, kind: AlarmKind) -> bool;
}
