#![cfg_attr(not(test), no_std)]

//! Async driver core for the ST LPS331AP, LPS25H and LPS22HB barometric pressure sensors.
//!
//! The chip is identified through WHO_AM_I when the driver is constructed, and every later access
//! uses that chip's register map. Measurements can be taken in continuous mode, where the chip
//! free-runs, or in one-shot mode, where every [`Lps::sense`] triggers and waits for a single
//! conversion.
//!
//! Waits between polls of the chip go through a caller-supplied [`context::Context`], which also
//! decides when to give up.

pub mod bus;
pub mod config;
pub mod context;
pub mod error;
mod lps;
pub mod measurement;
pub mod observer;
pub mod register;
mod transport;
pub mod variant;

#[cfg(test)]
mod testing;

pub use error::{ErrorKind, LpsError, LpsResult};
pub use lps::{Lps, LpsI2c, LpsSpi, State, I2C_ADDRESSES};
pub use measurement::{Pressure, Reading, Temperature};
pub use variant::ChipVariant;
