//! Callback registry: one handler slot per event bit

use core::fmt;

use irq_core::{Error, EventId, Result, SourceId, MAX_EVENTS};

/// Handler invoked when a decoded event is dispatched
///
/// The handler's captured state plays the role of the context and
/// configuration blobs a C callback descriptor would carry. Handlers
/// run on the interrupt execution context, outside the controller's
/// critical section, so captures must be `Sync`.
pub type Handler = &'static (dyn Fn(SourceId) + Sync);

/// One registered callback
#[derive(Clone, Copy)]
pub struct Callback {
    handler: Handler,
}

impl Callback {
    /// Wrap a handler
    pub const fn new(handler: Handler) -> Self {
        Self { handler }
    }

    /// Run the handler for one decoded event
    pub fn invoke(&self, source: SourceId) {
        (self.handler)(source);
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback")
    }
}

/// Bounded map from event bit to registered callback
///
/// Owned by the controller facade, one registry per peripheral class;
/// passed by reference into the dispatch routine so that independent
/// controller instances stay independent.
#[derive(Debug)]
pub struct CallbackRegistry<const N: usize = MAX_EVENTS> {
    slots: [Option<Callback>; N],
    /// Whether any registration has ever happened; dispatch keeps its
    /// hands off the hardware until this is set
    touched: bool,
    live: usize,
}

impl<const N: usize> CallbackRegistry<N> {
    /// Create an empty registry
    pub const fn new() -> Self {
        const NONE: Option<Callback> = None;
        Self {
            slots: [NONE; N],
            touched: false,
            live: 0,
        }
    }

    /// Register a callback for an event bit
    ///
    /// An existing entry for the same bit is replaced in place; the
    /// replacement is atomic from the dispatcher's point of view since
    /// all registry access happens under the controller's critical
    /// section. Fails with [`Error::AllocationFailure`] only when no
    /// slot can back the bit.
    pub fn register(&mut self, event: EventId, callback: Callback) -> Result<()> {
        let slot = self
            .slots
            .get_mut(event.bit() as usize)
            .ok_or(Error::AllocationFailure)?;
        if slot.is_none() {
            self.live += 1;
        }
        *slot = Some(callback);
        self.touched = true;
        Ok(())
    }

    /// Drop the registration for an event bit
    pub fn unregister(&mut self, event: EventId) -> Result<()> {
        let slot = self
            .slots
            .get_mut(event.bit() as usize)
            .ok_or(Error::NotFound)?;
        if slot.take().is_none() {
            return Err(Error::NotFound);
        }
        self.live -= 1;
        Ok(())
    }

    /// Current callback for an event bit, if any
    pub fn lookup(&self, event: EventId) -> Option<Callback> {
        self.slots.get(event.bit() as usize).copied().flatten()
    }

    /// Whether any registration has ever happened
    pub fn ever_registered(&self) -> bool {
        self.touched
    }

    /// Number of live registrations
    pub fn len(&self) -> usize {
        self.live
    }

    /// Whether no registration is live
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }
}

impl<const N: usize> Default for CallbackRegistry<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicUsize, Ordering};

    fn event(bit: u8) -> EventId {
        EventId::new_unchecked(bit)
    }

    fn noop(_: SourceId) {}

    #[test]
    fn test_register_and_lookup() {
        let mut registry: CallbackRegistry = CallbackRegistry::new();
        assert!(!registry.ever_registered());
        assert!(registry.lookup(event(4)).is_none());

        registry.register(event(4), Callback::new(&noop)).unwrap();
        assert!(registry.ever_registered());
        assert!(registry.lookup(event(4)).is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_overwrite_replaces_entry() {
        static OLD: AtomicUsize = AtomicUsize::new(0);
        static NEW: AtomicUsize = AtomicUsize::new(0);
        fn old(_: SourceId) {
            OLD.fetch_add(1, Ordering::Relaxed);
        }
        fn new(_: SourceId) {
            NEW.fetch_add(1, Ordering::Relaxed);
        }

        let mut registry: CallbackRegistry = CallbackRegistry::new();
        registry.register(event(7), Callback::new(&old)).unwrap();
        registry.register(event(7), Callback::new(&new)).unwrap();
        assert_eq!(registry.len(), 1);

        let cb = registry.lookup(event(7)).unwrap();
        cb.invoke(SourceId::new(
            irq_core::PeripheralClass::Serial0,
            event(7),
        ));
        assert_eq!(OLD.load(Ordering::Relaxed), 0);
        assert_eq!(NEW.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_unregister_not_found() {
        let mut registry: CallbackRegistry = CallbackRegistry::new();
        assert_eq!(registry.unregister(event(3)), Err(Error::NotFound));

        registry.register(event(3), Callback::new(&noop)).unwrap();
        assert!(registry.unregister(event(3)).is_ok());
        assert_eq!(registry.unregister(event(3)), Err(Error::NotFound));
        assert!(registry.is_empty());
        // Unregistering everything does not reset the history flag.
        assert!(registry.ever_registered());
    }

    #[test]
    fn test_allocation_failure_on_undersized_backing() {
        let mut registry: CallbackRegistry<4> = CallbackRegistry::new();
        assert_eq!(
            registry.register(event(4), Callback::new(&noop)),
            Err(Error::AllocationFailure)
        );
        // Overwrite of an existing slot never fails.
        registry.register(event(3), Callback::new(&noop)).unwrap();
        assert!(registry.register(event(3), Callback::new(&noop)).is_ok());
    }
}
