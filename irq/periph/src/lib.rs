#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

//! # Irq Periph
//!
//! Peripheral adapters built on the [`irq_hal`] capability traits:
//! pin bank (direction/level operations and trigger configuration),
//! clock (counter access, time reading, alarm arming), and serial
//! port (blocking and non-blocking byte transfer).
//!
//! The adapters validate arguments before touching any register and
//! surface transient conditions as [`irq_core::Error::Busy`]. The
//! controller facade in `irq-ctrl` composes them with the callback
//! registries.

pub mod clock;
pub mod pin;
pub mod serial;

pub use clock::Clock;
pub use pin::{Pin, PinBank, PinError};
pub use serial::SerialPort;
