//! In-memory peripheral fakes for host-side tests
//!
//! Each mock keeps its register state in public fields so tests can
//! seed pending flags and inspect what the routing layer programmed.

use core::cell::Cell;
use core::convert::Infallible;

use heapless::{Deque, Vec};
use irq_core::{AlarmKind, TriggerBits};

use crate::clock::ClockHw;
use crate::pin::{Direction, Level, PinBankHw};
use crate::serial::{SerialConfig, SerialHw};
use crate::status::{IrqLine, IrqStatus};

/// A serial port backed by in-memory queues
#[derive(Debug, Default)]
pub struct MockSerial {
    pub pending: u32,
    pub enabled: u32,
    pub line: bool,
    pub config: Option<SerialConfig>,
    pub rx: Deque<u8, 64>,
    pub tx: Vec<u8, 64>,
}

impl MockSerial {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IrqStatus for MockSerial {
    fn read_and_clear_status(&mut self) -> u32 {
        core::mem::take(&mut self.pending)
    }

    fn enabled_mask(&self) -> u32 {
        self.enabled
    }

    fn enable_source(&mut self, mask: u32) {
        self.enabled |= mask;
    }

    fn disable_source(&mut self, mask: u32) {
        self.enabled &= !mask;
    }

    fn clear_pending(&mut self, mask: u32) {
        self.pending &= !mask;
    }
}

impl IrqLine for MockSerial {
    fn enable_line(&mut self) {
        self.line = true;
    }

    fn disable_line(&mut self) {
        self.line = false;
    }

    fn line_enabled(&self) -> bool {
        self.line
    }
}

impl SerialHw for MockSerial {
    fn configure(&mut self, config: &SerialConfig) {
        self.config = Some(config.clone());
    }

    fn read_byte(&mut self) -> nb::Result<u8, Infallible> {
        self.rx.pop_front().ok_or(nb::Error::WouldBlock)
    }

    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Infallible> {
        self.tx.push(byte).map_err(|_| nb::Error::WouldBlock)
    }
}

/// A pin bank with per-pin registers held as bitmasks
#[derive(Debug)]
pub struct MockPins {
    pub pin_count: u8,
    pub pending: u32,
    /// Per-pin interrupt enables; doubles as the enabled mask
    pub enabled: u32,
    /// Bit set = output, clear = input
    pub outputs: u32,
    pub levels: u32,
    /// Pins released to high impedance
    pub released: u32,
    pub trigger: [Option<TriggerBits>; 32],
    pub line: bool,
}

impl MockPins {
    pub fn new(pin_count: u8) -> Self {
        Self {
            pin_count,
            pending: 0,
            enabled: 0,
            outputs: 0,
            levels: 0,
            released: 0,
            trigger: [None; 32],
            line: false,
        }
    }
}

impl Default for MockPins {
    fn default() -> Self {
        Self::new(14)
    }
}

impl IrqStatus for MockPins {
    fn read_and_clear_status(&mut self) -> u32 {
        core::mem::take(&mut self.pending)
    }

    fn enabled_mask(&self) -> u32 {
        self.enabled
    }

    fn enable_source(&mut self, mask: u32) {
        self.enabled |= mask;
    }

    fn disable_source(&mut self, mask: u32) {
        self.enabled &= !mask;
    }

    fn clear_pending(&mut self, mask: u32) {
        self.pending &= !mask;
    }
}

impl IrqLine for MockPins {
    fn enable_line(&mut self) {
        self.line = true;
    }

    fn disable_line(&mut self) {
        self.line = false;
    }

    fn line_enabled(&self) -> bool {
        self.line
    }
}

impl PinBankHw for MockPins {
    fn pin_count(&self) -> u8 {
        self.pin_count
    }

    fn set_direction(&mut self, pin: u8, direction: Direction) {
        let mask = 1 << pin;
        self.released &= !mask;
        match direction {
            Direction::Output => self.outputs |= mask,
            Direction::Input => self.outputs &= !mask,
        }
    }

    fn direction(&self, pin: u8) -> Direction {
        if self.outputs & (1 << pin) != 0 {
            Direction::Output
        } else {
            Direction::Input
        }
    }

    fn write_level(&mut self, pin: u8, level: Level) {
        let mask = 1 << pin;
        match level {
            Level::High => self.levels |= mask,
            Level::Low => self.levels &= !mask,
        }
    }

    fn read_level(&self, pin: u8) -> Level {
        if self.levels & (1 << pin) != 0 {
            Level::High
        } else {
            Level::Low
        }
    }

    fn release(&mut self, pin: u8) {
        self.released |= 1 << pin;
    }

    fn apply_trigger(&mut self, pin: u8, bits: TriggerBits) {
        self.trigger[pin as usize] = Some(bits);
    }
}

/// A clock whose busy flag clears after a configurable number of polls
#[derive(Debug, Default)]
pub struct MockClock {
    pub pending: u32,
    pub enabled: u32,
    pub line: bool,
    pub running: bool,
    pub seconds: u32,
    pub subsec_units: u32,
    /// Armed value per alarm kind, indexed by [`AlarmKind::id`]
    pub armed: [Option<u32>; 2],
    /// How many busy polls a counter write costs
    pub settle_polls: u8,
    busy_polls: Cell<u8>,
}

impl MockClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force the busy flag for the next `polls` queries
    pub fn set_busy(&mut self, polls: u8) {
        self.busy_polls.set(polls);
    }
}

impl IrqStatus for MockClock {
    fn read_and_clear_status(&mut self) -> u32 {
        core::mem::take(&mut self.pending)
    }

    fn enabled_mask(&self) -> u32 {
        self.enabled
    }

    fn enable_source(&mut self, mask: u32) {
        self.enabled |= mask;
    }

    fn disable_source(&mut self, mask: u32) {
        self.enabled &= !mask;
    }

    fn clear_pending(&mut self, mask: u32) {
        self.pending &= !mask;
    }
}

impl IrqLine for MockClock {
    fn enable_line(&mut self) {
        self.line = true;
    }

    fn disable_line(&mut self) {
        self.line = false;
    }

    fn line_enabled(&self) -> bool {
        self.line
    }
}

impl ClockHw for MockClock {
    fn start(&mut self) {
        self.running = true;
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn busy(&self) -> bool {
        let polls = self.busy_polls.get();
        if polls > 0 {
            self.busy_polls.set(polls - 1);
            true
        } else {
            false
        }
    }

    fn seconds(&self) -> u32 {
        self.seconds
    }

    fn subsec_units(&self) -> u32 {
        self.subsec_units
    }

    fn set_seconds(&mut self, seconds: u32) {
        self.seconds = seconds;
        self.busy_polls.set(self.settle_polls);
    }

    fn arm_alarm(&mut self, kind: AlarmKind, value: u32) {
        self.armed[kind.id() as usize] = Some(value);
    }

    fn disarm_alarm(&mut self, kind: AlarmKind) {
        self.armed[kind.id() as usize] = None;
    }

    fn alarm_armed(&self, kind: AlarmKind) -> bool {
        self.armed[kind.id() as usize].is_some()
    }
}
