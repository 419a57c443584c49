#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

//! # Irq Hal
//!
//! Capability traits describing what a vendor peripheral SDK must
//! supply to the interrupt routing layer: reading and clearing a
//! pending bitmask, enabling interrupt lines at the controller level,
//! per-pin trigger programming, counter and alarm primitives, and raw
//! serial byte transfer.
//!
//! The routing layer never touches hardware registers itself; it only
//! calls through these traits. The `mock` feature provides in-memory
//! implementations for host-side tests.

pub mod clock;
pub mod pin;
pub mod serial;
pub mod status;

#[cfg(feature = "mock")]
pub mod mock;

pub use clock::ClockHw;
pub use pin::{Direction, Level, PinBankHw};
pub use serial::{DataBits, Parity, SerialConfig, SerialHw, StopBits};
pub use status::{IrqLine, IrqStatus};
