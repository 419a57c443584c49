//! Interrupt routing core: callback registry, dispatcher, controller
//!
//! A hardware interrupt arrives as a bitmask of pending flags on a
//! peripheral's status register. This crate decomposes that mask into
//! logical events, routes each to exactly one registered handler, and
//! keeps registration, trigger configuration, and enable state
//! coherent across the four peripheral classes behind one
//! [`IrqController`] facade.
//!
//! The model is strictly "one interrupt line, decode bits, dispatch
//! synchronously, return": no queuing, no prioritization, no
//! allocation.

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

pub mod controller;
pub mod dispatch;
pub mod registry;

pub use controller::{ControllerConfig, IrqController};
pub use dispatch::dispatch;
pub use registry::{Callback, CallbackRegistry, Handler};
