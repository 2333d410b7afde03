//! # tempstream
//!
//! Periodic analog temperature sampling streamed as text lines over a serial
//! link, with zero heap allocation.
//!
//! **Pipeline:** ADC sample → transfer function → text → USART, then a fixed
//! delay, forever.
//!
//! - **Register-level drivers** - USART and 10-bit ADC over an owned
//!   [`RegisterBlock`], one owner per peripheral
//! - **Const configuration** - oscillator, baud rate, delays and sensor
//!   constants fixed at compile time through [`StreamConfig`]
//! - **Checked buffers** - number formatting into `heapless` strings that
//!   report overflow instead of corrupting memory
//! - **Hosted testing** - every busy-wait polls a register, so a simulated
//!   register block runs the whole loop off-target
//!
//! ## Optional Features
//!
//! - `defmt` - structured logging and `defmt::Format` on public types
//!
//! This library is `no_std` compatible.

#![no_std]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

extern crate heapless;

// ============================================================================
// Module Declarations
// ============================================================================

mod log;

pub mod config;
pub mod error;
pub mod io;
pub mod registers;

pub mod format;
pub mod sensor;

pub mod adc;
pub mod uart;

pub mod acquisition;

// ============================================================================
// Re-exports - Public API
// ============================================================================

pub use config::{DefaultConfig, FastClockConfig, StreamConfig};
pub use error::Error;
pub use io::SerialIo;
pub use registers::{AdcReg, Claim, RegisterBlock, UartReg};

pub use format::{
    DecimalText, FixedDecimal, IntegerText, fixed_decimal_to_text, integer_to_text,
};
pub use sensor::TransferFunction;

pub use adc::{Adc, AdcClock, Sampler};
pub use uart::{DataBits, SpeedMode, Uart, UartSettings};

pub use acquisition::{Acquisition, Record};

// ============================================================================
// Library Metadata
// ============================================================================

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
