//! Shared hosted backends for the native demos
//!
//! Register blocks that behave like the real peripherals closely enough
//! for the drivers to run unchanged, plus a sleeping delay provider.

pub mod delay;
pub mod registers;

pub use delay::StdDelay;
pub use registers::{StdoutUart, ThermalAdc};
