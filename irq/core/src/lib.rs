#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

//! # Irq Core
//!
//! Core types for the interrupt routing layer: interrupt source
//! identifiers, the pending/enabled bitmask decoder, trigger-policy
//! encoding for pin-bank interrupts, and the clock alarm time
//! representation. Everything here is allocation-free and usable from
//! interrupt context.

use core::fmt;

pub mod mask;
pub mod source;
pub mod time;
pub mod trigger;

pub use mask::*;
pub use source::*;
pub use time::*;
pub use trigger::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type used throughout the interrupt routing layer
pub type Result<T> = core::result::Result<T, Error>;

/// Error types for routing-layer operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Out-of-range pin, port or source id, or an unrecognized
    /// trigger policy. Detected before any hardware register is touched.
    InvalidArgument,
    /// Unregister on a source with no live registration
    NotFound,
    /// Backing storage for a new callback slot could not be obtained
    AllocationFailure,
    /// The hardware counter is still settling after a prior write;
    /// the caller must retry after a platform-defined delay
    Busy,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument => write!(f, "Invalid argument"),
            Error::NotFound => write!(f, "No live registration"),
            Error::AllocationFailure => write!(f, "Callback storage exhausted"),
            Error::Busy => write!(f, "Hardware counter busy"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Error::InvalidArgument => defmt::write!(fmt, "InvalidArgument"),
            Error::NotFound => defmt::write!(fmt, "NotFound"),
            Error::AllocationFailure => defmt::write!(fmt, "AllocationFailure"),
            Error::Busy => defmt::write!(fmt, "Busy"),
        }
    }
}
