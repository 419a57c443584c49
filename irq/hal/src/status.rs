//! Status/enable register access shared by all peripheral classes

/// The status/enable register pair of one peripheral
///
/// Each peripheral's registers are exclusively owned by that
/// peripheral's dispatcher and configurator; no two implementors may
/// alias the same hardware block.
pub trait IrqStatus {
    /// Read the pending-interrupt bitmask and clear it in the same
    /// access
    ///
    /// A flag asserted after this read is latched by hardware and
    /// observed on the next dispatch cycle, not lost.
    fn read_and_clear_status(&mut self) -> u32;

    /// Bitmask of currently enabled interrupt sources
    fn enabled_mask(&self) -> u32;

    /// Enable the sources in `mask` at the peripheral level
    fn enable_source(&mut self, mask: u32);

    /// Disable the sources in `mask` at the peripheral level
    fn disable_source(&mut self, mask: u32);

    /// Clear the given pending flags without dispatching them
    fn clear_pending(&mut self, mask: u32);
}

/// The controller-level interrupt line of one peripheral
///
/// Gates delivery of the peripheral's aggregate interrupt; the per-bit
/// enables behind [`IrqStatus::enabled_mask`] are unaffected.
pub trait IrqLine {
    /// Allow the peripheral's interrupt to be delivered
    fn enable_line(&mut self);

    /// Block delivery of the peripheral's interrupt
    fn disable_line(&mut self);

    /// Whether the line currently delivers interrupts
    fn line_enabled(&self) -> bool;
}
