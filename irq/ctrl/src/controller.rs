//! Controller facade routing registration and enable state by source id

use core::cell::RefCell;

use critical_section::Mutex;
use irq_core::{
    AlarmKind, Error, EventId, PeripheralClass, Result, SourceId, TriggerPolicy, MAX_EVENTS,
};
use irq_hal::{ClockHw, IrqLine, IrqStatus, PinBankHw, SerialConfig, SerialHw};
use irq_periph::{Clock, PinBank, SerialPort};

use crate::dispatch::collect_ready;
use crate::registry::{Callback, CallbackRegistry, Handler};

/// Startup configuration for [`IrqController::new`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Frame configuration for serial port 0
    pub serial0: SerialConfig,
    /// Frame configuration for serial port 1
    pub serial1: SerialConfig,
}

struct Inner<S0, S1, P, C>
where
    S0: SerialHw,
    S1: SerialHw,
    P: PinBankHw,
    C: ClockHw,
{
    serial0: SerialPort<S0>,
    serial0_callbacks: CallbackRegistry,
    serial1: SerialPort<S1>,
    serial1_callbacks: CallbackRegistry,
    pins: PinBank<P>,
    pin_callbacks: CallbackRegistry,
    pin_policies: [Option<TriggerPolicy>; MAX_EVENTS],
    clock: Clock<C>,
    clock_callbacks: CallbackRegistry<ALARM_SLOTS>,
    alarm_values: [Option<u32>; ALARM_SLOTS],
}

const ALARM_SLOTS: usize = AlarmKind::ALL.len();

/// One routing core over the four peripheral classes
///
/// Owns the callback registry of every peripheral and is the only
/// component that creates or destroys registry slots. All state sits
/// behind a `critical_section::Mutex`, so registration from thread
/// context and dispatch from interrupt context observe each other's
/// writes whole, never torn. Independent instances share nothing,
/// which is what lets tests run several controllers side by side.
pub struct IrqController<S0, S1, P, C>
where
    S0: SerialHw,
    S1: SerialHw,
    P: PinBankHw,
    C: ClockHw,
{
    state: Mutex<RefCell<Inner<S0, S1, P, C>>>,
}

impl<S0, S1, P, C> IrqController<S0, S1, P, C>
where
    S0: SerialHw,
    S1: SerialHw,
    P: PinBankHw,
    C: ClockHw,
{
    /// Bring up a controller over the given peripheral hardware
    ///
    /// Programs both serial frame configurations; everything else is
    /// left disabled until [`enable`](Self::enable) is called.
    pub fn new(config: &ControllerConfig, serial0: S0, serial1: S1, pins: P, clock: C) -> Self {
        Self {
            state: Mutex::new(RefCell::new(Inner {
                serial0: SerialPort::new(serial0, &config.serial0),
                serial0_callbacks: CallbackRegistry::new(),
                serial1: SerialPort::new(serial1, &config.serial1),
                serial1_callbacks: CallbackRegistry::new(),
                pins: PinBank::new(pins),
                pin_callbacks: CallbackRegistry::new(),
                pin_policies: [None; MAX_EVENTS],
                clock: Clock::new(clock),
                clock_callbacks: CallbackRegistry::new(),
                alarm_values: [None; ALARM_SLOTS],
            })),
        }
    }

    /// Register a handler for one interrupt source
    ///
    /// A handler already registered for the same source is replaced
    /// whole. Out-of-range events for the owning peripheral fail with
    /// [`Error::InvalidArgument`] before any slot is written.
    pub fn register(&self, source: SourceId, handler: Handler) -> Result<()> {
        let callback = Callback::new(handler);
        critical_section::with(|cs| {
            let mut inner = self.state.borrow_ref_mut(cs);
            let inner = &mut *inner;
            match source.class {
                PeripheralClass::Serial0 => inner.serial0_callbacks.register(source.event, callback),
                PeripheralClass::Serial1 => inner.serial1_callbacks.register(source.event, callback),
                PeripheralClass::PinBank => {
                    check_pin(&inner.pins, source.event)?;
                    inner.pin_callbacks.register(source.event, callback)
                }
                PeripheralClass::ClockAlarm => {
                    alarm_kind(source.event)?;
                    inner.clock_callbacks.register(source.event, callback)
                }
            }
        })
    }

    /// Drop the handler registered for one interrupt source
    pub fn unregister(&self, source: SourceId) -> Result<()> {
        critical_section::with(|cs| {
            let mut inner = self.state.borrow_ref_mut(cs);
            let inner = &mut *inner;
            match source.class {
                PeripheralClass::Serial0 => inner.serial0_callbacks.unregister(source.event),
                PeripheralClass::Serial1 => inner.serial1_callbacks.unregister(source.event),
                PeripheralClass::PinBank => {
                    check_pin(&inner.pins, source.event)?;
                    inner.pin_callbacks.unregister(source.event)
                }
                PeripheralClass::ClockAlarm => {
                    alarm_kind(source.event)?;
                    inner.clock_callbacks.unregister(source.event)
                }
            }
        })
    }

    /// Record the trigger policy for one pin and program it now
    ///
    /// The pin's pre-call enable state is preserved across the
    /// reprogramming; the recorded policy is re-applied on every later
    /// [`enable`](Self::enable) of that pin.
    pub fn set_trigger(&self, pin: EventId, policy: TriggerPolicy) -> Result<()> {
        critical_section::with(|cs| {
            let mut inner = self.state.borrow_ref_mut(cs);
            inner.pins.set_trigger(pin, policy)?;
            inner.pin_policies[pin.bit() as usize] = Some(policy);
            Ok(())
        })
    }

    /// Record the counter value one alarm kind arms at
    ///
    /// The alarm is armed when its source is enabled, not here. The
    /// subsecond kind takes hardware units; convert milliseconds with
    /// [`irq_core::subsec_units_from_ms`].
    pub fn set_alarm(&self, kind: AlarmKind, value: u32) {
        critical_section::with(|cs| {
            self.state.borrow_ref_mut(cs).alarm_values[kind.id() as usize] = Some(value);
        });
    }

    /// Forget one alarm kind's configured value and disarm it
    pub fn clear_alarm(&self, kind: AlarmKind) {
        critical_section::with(|cs| {
            let mut inner = self.state.borrow_ref_mut(cs);
            inner.alarm_values[kind.id() as usize] = None;
            inner.clock.disarm(kind);
        });
    }

    /// Enable delivery of one interrupt source
    ///
    /// Pin sources get their recorded trigger policy re-applied first;
    /// alarm sources are armed at their configured value and fail with
    /// [`Error::InvalidArgument`] if none was set. Enabling any source
    /// also unmasks the owning peripheral's controller line.
    pub fn enable(&self, source: SourceId) -> Result<()> {
        critical_section::with(|cs| {
            let mut inner = self.state.borrow_ref_mut(cs);
            let inner = &mut *inner;
            match source.class {
                PeripheralClass::Serial0 => {
                    let hw = inner.serial0.hw_mut();
                    hw.enable_source(source.event.bit_mask());
                    hw.enable_line();
                    Ok(())
                }
                PeripheralClass::Serial1 => {
                    let hw = inner.serial1.hw_mut();
                    hw.enable_source(source.event.bit_mask());
                    hw.enable_line();
                    Ok(())
                }
                PeripheralClass::PinBank => {
                    if let Some(policy) = inner.pin_policies[source.event.bit() as usize] {
                        inner.pins.set_trigger(source.event, policy)?;
                    }
                    inner.pins.enable_irq(source.event)?;
                    inner.pins.hw_mut().enable_line();
                    Ok(())
                }
                PeripheralClass::ClockAlarm => {
                    let kind = alarm_kind(source.event)?;
                    let value = inner.alarm_values[kind.id() as usize]
                        .ok_or(Error::InvalidArgument)?;
                    inner.clock.arm(kind, value);
                    let hw = inner.clock.hw_mut();
                    hw.enable_source(source.event.bit_mask());
                    hw.enable_line();
                    Ok(())
                }
            }
        })
    }

    /// Disable delivery of one interrupt source
    ///
    /// Clears the source's latched pending flag so a stale interrupt
    /// cannot fire on a later enable. Alarm sources are disarmed. The
    /// peripheral's controller line is masked once no source on it
    /// remains enabled. Idempotent.
    pub fn disable(&self, source: SourceId) -> Result<()> {
        critical_section::with(|cs| {
            let mut inner = self.state.borrow_ref_mut(cs);
            let inner = &mut *inner;
            match source.class {
                PeripheralClass::Serial0 => {
                    disable_on(inner.serial0.hw_mut(), source.event);
                    Ok(())
                }
                PeripheralClass::Serial1 => {
                    disable_on(inner.serial1.hw_mut(), source.event);
                    Ok(())
                }
                PeripheralClass::PinBank => {
                    inner.pins.disable_irq(source.event)?;
                    let hw = inner.pins.hw_mut();
                    if hw.enabled_mask() == 0 {
                        hw.disable_line();
                    }
                    Ok(())
                }
                PeripheralClass::ClockAlarm => {
                    let kind = alarm_kind(source.event)?;
                    inner.clock.disarm(kind);
                    disable_on(inner.clock.hw_mut(), source.event);
                    Ok(())
                }
            }
        })
    }

    /// Unmask every peripheral's controller line, in ascending class id
    /// order
    ///
    /// Source-level enables are untouched, so sources enabled before a
    /// [`global_disable`](Self::global_disable) deliver again.
    pub fn global_enable(&self) {
        critical_section::with(|cs| {
            let mut inner = self.state.borrow_ref_mut(cs);
            let inner = &mut *inner;
            for class in PeripheralClass::ALL {
                line_of(inner, class).enable_line();
            }
        });
    }

    /// Mask every peripheral's controller line and clear all pending
    /// flags, in ascending class id order
    pub fn global_disable(&self) {
        critical_section::with(|cs| {
            let mut inner = self.state.borrow_ref_mut(cs);
            let inner = &mut *inner;
            for class in PeripheralClass::ALL {
                let hw = line_of(inner, class);
                hw.disable_line();
                hw.clear_pending(u32::MAX);
            }
        });
    }

    /// Tear the controller down and hand the hardware back
    ///
    /// Every source is disabled, both alarms disarmed, every line
    /// masked and pending flag cleared, in ascending class id order.
    /// Never fails, whether or not anything was registered.
    pub fn remove(self) -> (S0, S1, P, C) {
        let mut inner = self.state.into_inner().into_inner();
        for kind in AlarmKind::ALL {
            inner.clock.disarm(kind);
        }
        for class in PeripheralClass::ALL {
            let hw = line_of(&mut inner, class);
            hw.disable_source(u32::MAX);
            hw.clear_pending(u32::MAX);
            hw.disable_line();
        }
        (
            inner.serial0.into_inner(),
            inner.serial1.into_inner(),
            inner.pins.into_inner(),
            inner.clock.into_inner(),
        )
    }

    /// Run one dispatch cycle for a peripheral class
    ///
    /// Snapshots and clears the peripheral's status under the critical
    /// section, then invokes the matched handlers outside it, so a
    /// handler may re-enter the controller. Returns the number of
    /// handlers invoked. Call from the peripheral's interrupt handler.
    pub fn dispatch(&self, class: PeripheralClass) -> usize {
        let batch = critical_section::with(|cs| {
            let mut inner = self.state.borrow_ref_mut(cs);
            let inner = &mut *inner;
            match class {
                PeripheralClass::Serial0 => {
                    collect_ready(inner.serial0.hw_mut(), &inner.serial0_callbacks)
                }
                PeripheralClass::Serial1 => {
                    collect_ready(inner.serial1.hw_mut(), &inner.serial1_callbacks)
                }
                PeripheralClass::PinBank => {
                    collect_ready(inner.pins.hw_mut(), &inner.pin_callbacks)
                }
                PeripheralClass::ClockAlarm => {
                    collect_ready(inner.clock.hw_mut(), &inner.clock_callbacks)
                }
            }
        });
        for (callback, event) in &batch {
            callback.invoke(SourceId::new(class, *event));
        }
        batch.len()
    }

    /// Borrow serial port 0 for data transfer
    pub fn with_serial0<R>(&self, f: impl FnOnce(&mut SerialPort<S0>) -> R) -> R {
        critical_section::with(|cs| f(&mut self.state.borrow_ref_mut(cs).serial0))
    }

    /// Borrow serial port 1 for data transfer
    pub fn with_serial1<R>(&self, f: impl FnOnce(&mut SerialPort<S1>) -> R) -> R {
        critical_section::with(|cs| f(&mut self.state.borrow_ref_mut(cs).serial1))
    }

    /// Borrow the pin bank for direction and level operations
    pub fn with_pins<R>(&self, f: impl FnOnce(&mut PinBank<P>) -> R) -> R {
        critical_section::with(|cs| f(&mut self.state.borrow_ref_mut(cs).pins))
    }

    /// Borrow the clock for counter and time operations
    pub fn with_clock<R>(&self, f: impl FnOnce(&mut Clock<C>) -> R) -> R {
        critical_section::with(|cs| f(&mut self.state.borrow_ref_mut(cs).clock))
    }
}

fn check_pin<P: PinBankHw>(pins: &PinBank<P>, pin: EventId) -> Result<()> {
    if pin.bit() < pins.hw().pin_count() {
        Ok(())
    } else {
        Err(Error::InvalidArgument)
    }
}

fn alarm_kind(event: EventId) -> Result<AlarmKind> {
    match event.bit() {
        0 => Ok(AlarmKind::TimeOfDay),
        1 => Ok(AlarmKind::Subsecond),
        _ => Err(Error::InvalidArgument),
    }
}

fn disable_on<H: IrqStatus + IrqLine>(hw: &mut H, event: EventId) {
    hw.disable_source(event.bit_mask());
    hw.clear_pending(event.bit_mask());
    if hw.enabled_mask() == 0 {
        hw.disable_line();
    }
}

fn line_of<'a, S0, S1, P, C>(
    inner: &'a mut Inner<S0, S1, P, C>,
    class: PeripheralClass,
) -> &'a mut (dyn LineOps + 'a)
where
    S0: SerialHw,
    S1: SerialHw,
    P: PinBankHw,
    C: ClockHw,
{
    match class {
        PeripheralClass::Serial0 => inner.serial0.hw_mut(),
        PeripheralClass::Serial1 => inner.serial1.hw_mut(),
        PeripheralClass::PinBank => inner.pins.hw_mut(),
        PeripheralClass::ClockAlarm => inner.clock.hw_mut(),
    }
}

/// Object-safe view of the register access the global operations need
trait LineOps: IrqStatus + IrqLine {}

impl<T: IrqStatus + IrqLine> LineOps for T {}
