//! Peripheral dispatcher: one decode-and-invoke pass per interrupt

use heapless::Vec;
use irq_core::{decode, EventId, PeripheralClass, SourceId, MAX_EVENTS};
use irq_hal::IrqStatus;

use crate::registry::{Callback, CallbackRegistry};

/// Snapshot the peripheral's status and collect the ready callbacks
///
/// The status register is cleared in the same access that reads it, so
/// a flag asserted while the collected handlers run is latched for the
/// next cycle rather than lost. Returns an empty batch without touching
/// the hardware while the registry has never seen a registration.
pub(crate) fn collect_ready<H: IrqStatus, const N: usize>(
    hw: &mut H,
    registry: &CallbackRegistry<N>,
) -> Vec<(Callback, EventId), MAX_EVENTS> {
    let mut batch = Vec::new();
    if !registry.ever_registered() {
        return batch;
    }
    let pending = hw.read_and_clear_status();
    let enabled = hw.enabled_mask();
    for event in decode(pending, enabled) {
        // Enabled-but-unconsumed bits are skipped, not errors; keep
        // decoding so one unregistered bit cannot starve the rest.
        if let Some(callback) = registry.lookup(event) {
            // Capacity equals the register width, cannot overflow.
            let _ = batch.push((callback, event));
        }
    }
    batch
}

/// Run one dispatch cycle for a peripheral
///
/// Decodes the pending-and-enabled bits of `hw` and synchronously
/// invokes the registered callback for each, passing the bit index as
/// the logical event id. Returns the number of callbacks invoked.
///
/// Callers that share the registry with thread-context code should go
/// through [`IrqController`](crate::IrqController), which brackets the
/// snapshot in a critical section; this free function is for glue that
/// owns both the hardware and the registry.
pub fn dispatch<H: IrqStatus, const N: usize>(
    class: PeripheralClass,
    hw: &mut H,
    registry: &CallbackRegistry<N>,
) -> usize {
    let batch = collect_ready(hw, registry);
    for (callback, event) in &batch {
        callback.invoke(SourceId::new(class, *event));
    }
    batch.len()
}
