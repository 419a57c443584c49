//! Serial port adapter: blocking and non-blocking byte transfer

use core::convert::Infallible;

use irq_core::{Error, Result};
use irq_hal::{SerialConfig, SerialHw};

fn unwrap_infallible<T>(res: core::result::Result<T, Infallible>) -> T {
    match res {
        Ok(value) => value,
        Err(e) => match e {},
    }
}

/// Adapter over one serial port
///
/// The frame configuration is programmed at construction; transfer is
/// a pass-through to the hardware byte primitives, blocking variants
/// spin on [`nb::Error::WouldBlock`].
pub struct SerialPort<S: SerialHw> {
    hw: S,
}

impl<S: SerialHw> SerialPort<S> {
    /// Wrap a serial port and program its frame configuration
    pub fn new(mut hw: S, config: &SerialConfig) -> Self {
        hw.configure(config);
        Self { hw }
    }

    /// Read into `buf`, blocking until it is full
    ///
    /// Returns the number of bytes read. An empty buffer is rejected
    /// before any hardware access.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() {
            return Err(Error::InvalidArgument);
        }
        for slot in buf.iter_mut() {
            *slot = unwrap_infallible(nb::block!(self.hw.read_byte()));
        }
        Ok(buf.len())
    }

    /// Write all of `buf`, blocking until the transmitter takes it
    pub fn write(&mut self, buf: &[u8]) -> Result<usize> {
        if buf.is_empty() {
            return Err(Error::InvalidArgument);
        }
        for &byte in buf {
            unwrap_infallible(nb::block!(self.hw.write_byte(byte)));
        }
        Ok(buf.len())
    }

    /// Take one received byte without blocking
    pub fn read_byte(&mut self) -> nb::Result<u8, Infallible> {
        self.hw.read_byte()
    }

    /// Push one byte without blocking
    pub fn write_byte(&mut self, byte: u8) -> nb::Result<(), Infallible> {
        self.hw.write_byte(byte)
    }

    /// Access the underlying hardware
    pub fn hw(&self) -> &S {
        &self.hw
    }

    /// Mutable access to the underlying hardware
    pub fn hw_mut(&mut self) -> &mut S {
        &mut self.hw
    }

    /// Unwrap the adapter
    pub fn into_inner(self) -> S {
        self.hw
    }
}
