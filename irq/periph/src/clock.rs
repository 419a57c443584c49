//! Clock adapter: counter access, time reading, alarm arming

use irq_core::{AlarmKind, ClockTime, Error, Result};
use irq_hal::ClockHw;

/// Adapter over the clock/counter peripheral
///
/// Counter reads and writes report [`Error::Busy`] while the hardware
/// counter is settling after a prior write; the condition is never
/// retried here, the caller decides when to come back.
pub struct Clock<C: ClockHw> {
    hw: C,
}

impl<C: ClockHw> Clock<C> {
    /// Wrap a clock peripheral
    pub fn new(hw: C) -> Self {
        Self { hw }
    }

    fn sync(&self) -> Result<()> {
        if self.hw.busy() {
            Err(Error::Busy)
        } else {
            Ok(())
        }
    }

    /// Start the counter
    pub fn start(&mut self) -> Result<()> {
        self.hw.start();
        self.sync()
    }

    /// Stop the counter
    pub fn stop(&mut self) {
        self.hw.stop();
    }

    /// Whole-seconds counter value
    pub fn counter(&self) -> Result<u32> {
        self.sync()?;
        Ok(self.hw.seconds())
    }

    /// Load the whole-seconds counter
    ///
    /// The counter is stopped for the write and restarted afterwards,
    /// with a synchronization check at each step.
    pub fn set_counter(&mut self, seconds: u32) -> Result<()> {
        self.sync()?;
        self.hw.stop();
        self.hw.set_seconds(seconds);
        self.hw.start();
        self.sync()
    }

    /// Read seconds plus millisecond-resolution subseconds
    pub fn time(&self) -> Result<ClockTime> {
        self.sync()?;
        let seconds = self.hw.seconds();
        self.sync()?;
        let units = self.hw.subsec_units();
        Ok(ClockTime::from_counters(seconds, units))
    }

    /// Arm a one-shot alarm at the given counter value
    ///
    /// The other alarm kind is left as it was.
    pub fn arm(&mut self, kind: AlarmKind, value: u32) {
        self.hw.arm_alarm(kind, value);
    }

    /// Disarm one alarm kind
    pub fn disarm(&mut self, kind: AlarmKind) {
        self.hw.disarm_alarm(kind);
    }

    /// Whether an alarm kind is armed
    pub fn armed(&self, kind: AlarmKind) -> bool {
        self.hw.alarm_armed(kind)
    }

    /// Access the underlying hardware
    pub fn hw(&self) -> &C {
        &self.hw
    }

    /// Mutable access to the underlying hardware
    pub fn hw_mut(&mut self) -> &mut C {
        &mut self.hw
    }

    /// Unwrap the adapter
    pub fn into_inner(self) -> C {
        self.hw
    }
}
