//! End-to-end tests for the controller facade over the hardware mocks

use core::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

use irq_core::{
    subsec_units_from_ms, AlarmKind, Error, EventId, PeripheralClass, Polarity, SourceId,
    TriggerBits, TriggerMode, TriggerPolicy,
};
use irq_ctrl::{ControllerConfig, IrqController};
use irq_hal::mock::{MockClock, MockPins, MockSerial};

type Controller = IrqController<MockSerial, MockSerial, MockPins, MockClock>;

fn controller() -> Controller {
    IrqController::new(
        &ControllerConfig::default(),
        MockSerial::new(),
        MockSerial::new(),
        MockPins::default(),
        MockClock::new(),
    )
}

fn event(bit: u8) -> EventId {
    EventId::new(bit).unwrap()
}

fn noop(_: SourceId) {}

#[test]
fn test_pin_rising_edge_fires_exactly_once() {
    static CALLS: AtomicUsize = AtomicUsize::new(0);
    static LAST_BIT: AtomicU8 = AtomicU8::new(u8::MAX);
    fn on_edge(source: SourceId) {
        assert_eq!(source.class, PeripheralClass::PinBank);
        LAST_BIT.store(source.event.bit(), Ordering::Relaxed);
        CALLS.fetch_add(1, Ordering::Relaxed);
    }

    let ctl = controller();
    let pin3 = SourceId::new(PeripheralClass::PinBank, event(3));
    ctl.register(pin3, &on_edge).unwrap();
    ctl.set_trigger(event(3), TriggerPolicy::RisingEdge).unwrap();
    ctl.enable(pin3).unwrap();

    ctl.with_pins(|pins| {
        assert_eq!(
            pins.hw().trigger[3],
            Some(TriggerBits::Single {
                mode: TriggerMode::Edge,
                polarity: Polarity::Low,
            })
        );
        assert_ne!(pins.hw().enabled & (1 << 3), 0);
        assert!(pins.hw().line);
        pins.hw_mut().pending = 1 << 3;
    });

    assert_eq!(ctl.dispatch(PeripheralClass::PinBank), 1);
    assert_eq!(CALLS.load(Ordering::Relaxed), 1);
    assert_eq!(LAST_BIT.load(Ordering::Relaxed), 3);
    ctl.with_pins(|pins| assert_eq!(pins.hw().pending, 0));

    // Nothing further pending, the handler does not run again.
    assert_eq!(ctl.dispatch(PeripheralClass::PinBank), 0);
    assert_eq!(CALLS.load(Ordering::Relaxed), 1);
}

#[test]
fn test_trigger_policy_reapplied_on_enable() {
    let ctl = controller();
    let pin5 = SourceId::new(PeripheralClass::PinBank, event(5));
    ctl.set_trigger(event(5), TriggerPolicy::BothEdges).unwrap();

    // Hardware loses the programming, a later enable restores it.
    ctl.with_pins(|pins| pins.hw_mut().trigger[5] = None);
    ctl.enable(pin5).unwrap();
    ctl.with_pins(|pins| {
        assert_eq!(pins.hw().trigger[5], Some(TriggerBits::DualEdge));
        assert_ne!(pins.hw().enabled & (1 << 5), 0);
    });
}

#[test]
fn test_alarm_enable_requires_configuration() {
    let ctl = controller();
    let subsec = SourceId::new(PeripheralClass::ClockAlarm, event(1));
    assert_eq!(ctl.enable(subsec), Err(Error::InvalidArgument));
    ctl.with_clock(|clock| assert!(!clock.armed(AlarmKind::Subsecond)));

    ctl.set_alarm(AlarmKind::Subsecond, subsec_units_from_ms(500));
    ctl.enable(subsec).unwrap();
    ctl.with_clock(|clock| {
        // 500 ms is exactly 128 hardware units.
        assert_eq!(clock.hw().armed[AlarmKind::Subsecond.id() as usize], Some(128));
        // The other alarm kind is untouched.
        assert!(!clock.armed(AlarmKind::TimeOfDay));
        assert!(clock.hw().line);
    });
}

#[test]
fn test_alarms_arm_independently() {
    let ctl = controller();
    ctl.set_alarm(AlarmKind::TimeOfDay, 3600);
    ctl.set_alarm(AlarmKind::Subsecond, 64);
    ctl.enable(SourceId::new(PeripheralClass::ClockAlarm, event(0))).unwrap();
    ctl.enable(SourceId::new(PeripheralClass::ClockAlarm, event(1))).unwrap();

    ctl.disable(SourceId::new(PeripheralClass::ClockAlarm, event(0))).unwrap();
    ctl.with_clock(|clock| {
        assert!(!clock.armed(AlarmKind::TimeOfDay));
        assert!(clock.armed(AlarmKind::Subsecond));
    });
}

#[test]
fn test_disable_is_idempotent() {
    let ctl = controller();
    let source = SourceId::new(PeripheralClass::Serial0, event(2));
    ctl.enable(source).unwrap();
    ctl.with_serial0(|port| port.hw_mut().pending = 1 << 2);

    ctl.disable(source).unwrap();
    let after_first = ctl.with_serial0(|port| {
        let hw = port.hw();
        (hw.enabled, hw.pending, hw.line)
    });
    assert_eq!(after_first, (0, 0, false));

    ctl.disable(source).unwrap();
    let after_second = ctl.with_serial0(|port| {
        let hw = port.hw();
        (hw.enabled, hw.pending, hw.line)
    });
    assert_eq!(after_first, after_second);
}

#[test]
fn test_line_stays_up_while_a_source_remains_enabled() {
    let ctl = controller();
    ctl.enable(SourceId::new(PeripheralClass::Serial1, event(0))).unwrap();
    ctl.enable(SourceId::new(PeripheralClass::Serial1, event(4))).unwrap();

    ctl.disable(SourceId::new(PeripheralClass::Serial1, event(0))).unwrap();
    ctl.with_serial1(|port| assert!(port.hw().line));

    ctl.disable(SourceId::new(PeripheralClass::Serial1, event(4))).unwrap();
    ctl.with_serial1(|port| assert!(!port.hw().line));
}

#[test]
fn test_global_disable_then_enable_restores_delivery() {
    let ctl = controller();
    ctl.enable(SourceId::new(PeripheralClass::Serial0, event(1))).unwrap();
    ctl.set_trigger(event(2), TriggerPolicy::FallingEdge).unwrap();
    ctl.enable(SourceId::new(PeripheralClass::PinBank, event(2))).unwrap();

    ctl.with_serial0(|port| port.hw_mut().pending = 1 << 1);
    ctl.with_pins(|pins| pins.hw_mut().pending = 1 << 2);

    ctl.global_disable();
    ctl.with_serial0(|port| {
        assert!(!port.hw().line);
        assert_eq!(port.hw().pending, 0);
        // Source-level enables survive the global mask.
        assert_ne!(port.hw().enabled & (1 << 1), 0);
    });
    ctl.with_pins(|pins| {
        assert!(!pins.hw().line);
        assert_eq!(pins.hw().pending, 0);
        assert_ne!(pins.hw().enabled & (1 << 2), 0);
    });

    ctl.global_enable();
    ctl.with_serial0(|port| assert!(port.hw().line));
    ctl.with_serial1(|port| assert!(port.hw().line));
    ctl.with_pins(|pins| assert!(pins.hw().line));
    ctl.with_clock(|clock| assert!(clock.hw().line));
}

#[test]
fn test_replacing_a_handler_routes_to_the_replacement() {
    static OLD: AtomicUsize = AtomicUsize::new(0);
    static NEW: AtomicUsize = AtomicUsize::new(0);
    fn old_handler(_: SourceId) {
        OLD.fetch_add(1, Ordering::Relaxed);
    }
    fn new_handler(_: SourceId) {
        NEW.fetch_add(1, Ordering::Relaxed);
    }

    let ctl = controller();
    let source = SourceId::new(PeripheralClass::Serial0, event(0));
    ctl.register(source, &old_handler).unwrap();
    ctl.enable(source).unwrap();

    ctl.with_serial0(|port| port.hw_mut().pending = 1);
    ctl.dispatch(PeripheralClass::Serial0);
    assert_eq!((OLD.load(Ordering::Relaxed), NEW.load(Ordering::Relaxed)), (1, 0));

    ctl.register(source, &new_handler).unwrap();
    ctl.with_serial0(|port| port.hw_mut().pending = 1);
    ctl.dispatch(PeripheralClass::Serial0);
    assert_eq!((OLD.load(Ordering::Relaxed), NEW.load(Ordering::Relaxed)), (1, 1));
}

#[test]
fn test_stale_pending_does_not_survive_a_disable() {
    static CALLS: AtomicUsize = AtomicUsize::new(0);
    fn on_event(_: SourceId) {
        CALLS.fetch_add(1, Ordering::Relaxed);
    }

    let ctl = controller();
    let source = SourceId::new(PeripheralClass::Serial0, event(3));
    ctl.register(source, &on_event).unwrap();
    ctl.enable(source).unwrap();
    ctl.with_serial0(|port| port.hw_mut().pending = 1 << 3);

    ctl.disable(source).unwrap();
    ctl.enable(source).unwrap();
    assert_eq!(ctl.dispatch(PeripheralClass::Serial0), 0);
    assert_eq!(CALLS.load(Ordering::Relaxed), 0);
}

#[test]
fn test_dispatch_without_registration_leaves_hardware_alone() {
    let ctl = controller();
    ctl.with_serial1(|port| {
        port.hw_mut().pending = 0b111;
        port.hw_mut().enabled = 0b111;
    });
    assert_eq!(ctl.dispatch(PeripheralClass::Serial1), 0);
    ctl.with_serial1(|port| assert_eq!(port.hw().pending, 0b111));
}

#[test]
fn test_out_of_range_sources_are_rejected_up_front() {
    let ctl = controller();
    // The default bank has 14 pins.
    let bad_pin = SourceId::new(PeripheralClass::PinBank, event(20));
    assert_eq!(ctl.register(bad_pin, &noop), Err(Error::InvalidArgument));
    assert_eq!(ctl.enable(bad_pin), Err(Error::InvalidArgument));

    // The clock has exactly two alarm events.
    let bad_alarm = SourceId::new(PeripheralClass::ClockAlarm, event(2));
    assert_eq!(ctl.register(bad_alarm, &noop), Err(Error::InvalidArgument));
    assert_eq!(ctl.enable(bad_alarm), Err(Error::InvalidArgument));
}

#[test]
fn test_unregister_without_registration_is_not_found() {
    let ctl = controller();
    let source = SourceId::new(PeripheralClass::Serial0, event(0));
    assert_eq!(ctl.unregister(source), Err(Error::NotFound));
    ctl.register(source, &noop).unwrap();
    ctl.unregister(source).unwrap();
    assert_eq!(ctl.unregister(source), Err(Error::NotFound));
}

#[test]
fn test_remove_quiesces_the_hardware() {
    let ctl = controller();
    ctl.enable(SourceId::new(PeripheralClass::Serial0, event(0))).unwrap();
    ctl.set_alarm(AlarmKind::TimeOfDay, 10);
    ctl.enable(SourceId::new(PeripheralClass::ClockAlarm, event(0))).unwrap();
    ctl.with_serial0(|port| port.hw_mut().pending = 0b11);

    let (serial0, serial1, pins, clock) = ctl.remove();
    assert_eq!(serial0.enabled, 0);
    assert_eq!(serial0.pending, 0);
    assert!(!serial0.line);
    assert!(!serial1.line);
    assert!(!pins.line);
    assert!(!clock.line);
    assert_eq!(clock.armed, [None, None]);
}

#[test]
fn test_alarm_dispatch_routes_by_kind() {
    static TOD: AtomicUsize = AtomicUsize::new(0);
    fn on_alarm(source: SourceId) {
        assert_eq!(source.event.bit(), 0);
        TOD.fetch_add(1, Ordering::Relaxed);
    }

    let ctl = controller();
    let tod = SourceId::new(PeripheralClass::ClockAlarm, event(0));
    ctl.register(tod, &on_alarm).unwrap();
    ctl.set_alarm(AlarmKind::TimeOfDay, 99);
    ctl.enable(tod).unwrap();

    ctl.with_clock(|clock| clock.hw_mut().pending = 1);
    assert_eq!(ctl.dispatch(PeripheralClass::ClockAlarm), 1);
    assert_eq!(TOD.load(Ordering::Relaxed), 1);
}
