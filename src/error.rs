//! Error types for peripheral setup, sampling and formatting.
//!
//! Hardware waits never fail (a status flag that never changes hangs the
//! device), so `Error` only covers violated caller contracts and settings
//! the hardware cannot honour.

use core::fmt;

/// Crate error type.
///
/// Every fallible operation returns `Result<_, Error>`. None of these are
/// recoverable at runtime on the target; they surface misconfiguration or
/// out-of-contract arguments instead of silently producing garbage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Text buffer too small for the formatted value
    BufferFull,

    /// ADC channel outside the part's analog inputs
    InvalidChannel(u8),

    /// No baud-rate divisor reaches the requested rate within tolerance
    BaudRateUnreachable {
        /// Requested baud rate
        requested: u32,
    },

    /// Conversion clock period outside the device's allowed range
    AdcClockOutOfRange {
        /// Resulting conversion clock period in nanoseconds
        tad_ns: u32,
    },

    /// Register block was already handed out
    PeripheralTaken,

    /// Serial I/O reported a failure
    Io,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BufferFull => write!(f, "Buffer full"),
            Error::InvalidChannel(channel) => write!(f, "Invalid ADC channel {}", channel),
            Error::BaudRateUnreachable { requested } => {
                write!(f, "Baud rate {} unreachable", requested)
            }
            Error::AdcClockOutOfRange { tad_ns } => {
                write!(f, "ADC clock period {} ns out of range", tad_ns)
            }
            Error::PeripheralTaken => write!(f, "Peripheral already taken"),
            Error::Io => write!(f, "I/O error"),
        }
    }
}
