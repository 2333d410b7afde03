//! Register-level access to the serial and analog peripherals.
//!
//! Drivers never touch memory directly. They go through a [`RegisterBlock`]
//! owned by value, so exactly one driver can drive a given peripheral. Board
//! code backs the trait with volatile accesses; hosted tests back it with a
//! simulation that completes every wait immediately.
//!
//! Register names and bit positions follow the PIC16-class USART and
//! 10-bit ADC this crate was written against.

use portable_atomic::{AtomicBool, Ordering};

use crate::error::Error;

/// Read/write access to one peripheral's 8-bit registers.
///
/// `R` is the register selector for that peripheral ([`UartReg`] or
/// [`AdcReg`]). Reads take `&mut self` because some registers clear flags
/// on read (e.g. reading `RCREG` clears `RCIF`).
pub trait RegisterBlock<R: Copy> {
    /// Read the current register value.
    fn read(&mut self, reg: R) -> u8;

    /// Write a register value.
    fn write(&mut self, reg: R, value: u8);

    /// Read-modify-write: clear the `clear` mask, then set the `set` mask.
    fn modify(&mut self, reg: R, clear: u8, set: u8) {
        let value = self.read(reg);
        self.write(reg, (value & !clear) | set);
    }

    /// Check whether every bit in `mask` is set.
    fn is_set(&mut self, reg: R, mask: u8) -> bool {
        self.read(reg) & mask == mask
    }
}

/// USART registers.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartReg {
    /// Baud-rate generator divisor
    Spbrg,
    /// Transmit status and control
    Txsta,
    /// Receive status and control
    Rcsta,
    /// Transmit data
    Txreg,
    /// Receive data (reading clears `RCIF`)
    Rcreg,
    /// Peripheral interrupt flags (`TXIF`, `RCIF`)
    Pir1,
    /// Port C direction (RC6 = TX, RC7 = RX)
    Trisc,
}

/// ADC registers.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcReg {
    /// Clock select, channel select, GO/DONE, ADON
    Adcon0,
    /// Result format, ADCS2, port configuration
    Adcon1,
    /// Result high byte (two significant bits when right-justified)
    Adresh,
    /// Result low byte
    Adresl,
    /// Port A direction
    Trisa,
}

/// `TXSTA` bits.
pub mod txsta {
    /// 9-bit transmission
    pub const TX9: u8 = 1 << 6;
    /// Transmit enable
    pub const TXEN: u8 = 1 << 5;
    /// Synchronous mode
    pub const SYNC: u8 = 1 << 4;
    /// High baud-rate select
    pub const BRGH: u8 = 1 << 2;
    /// Transmit shift register empty
    pub const TRMT: u8 = 1 << 1;
}

/// `RCSTA` bits.
pub mod rcsta {
    /// Serial port enable
    pub const SPEN: u8 = 1 << 7;
    /// 9-bit reception
    pub const RX9: u8 = 1 << 6;
    /// Continuous receive enable
    pub const CREN: u8 = 1 << 4;
    /// Framing error
    pub const FERR: u8 = 1 << 2;
    /// Overrun error
    pub const OERR: u8 = 1 << 1;
}

/// `PIR1` bits.
pub mod pir1 {
    /// Receive buffer full
    pub const RCIF: u8 = 1 << 5;
    /// Transmit buffer empty
    pub const TXIF: u8 = 1 << 4;
}

/// `TRISC` bits.
pub mod trisc {
    /// RC6 / TX direction (0 = output)
    pub const TX: u8 = 1 << 6;
    /// RC7 / RX direction (1 = input)
    pub const RX: u8 = 1 << 7;
}

/// `ADCON0` bits.
pub mod adcon0 {
    /// ADCS1:ADCS0 conversion clock select
    pub const ADCS_MASK: u8 = 0b1100_0000;
    /// ADCS1:ADCS0 shift
    pub const ADCS_SHIFT: u8 = 6;
    /// CHS2:CHS0 channel select
    pub const CHS_MASK: u8 = 0b0011_1000;
    /// CHS2:CHS0 shift
    pub const CHS_SHIFT: u8 = 3;
    /// Conversion in progress (set to start, hardware clears when done)
    pub const GO_DONE: u8 = 1 << 2;
    /// ADC module enable
    pub const ADON: u8 = 1 << 0;
}

/// `ADCON1` bits.
pub mod adcon1 {
    /// Right-justified result
    pub const ADFM: u8 = 1 << 7;
    /// Conversion clock divisor doubling
    pub const ADCS2: u8 = 1 << 6;
    /// PCFG3:PCFG0 port configuration
    pub const PCFG_MASK: u8 = 0b0000_1111;
    /// All eight inputs analog, references Vdd/Vss
    pub const PCFG_ALL_ANALOG: u8 = 0b0000_0000;
}

/// One-shot claim flag for a register block.
///
/// Board code keeps one `static` claim per peripheral and constructs the
/// register block only through [`Claim::take`], so a second driver for the
/// same peripheral cannot exist.
///
/// ```
/// use tempstream::registers::Claim;
///
/// static UART_CLAIM: Claim = Claim::new();
///
/// assert!(UART_CLAIM.take(|| 42u8).is_ok());
/// assert!(UART_CLAIM.take(|| 42u8).is_err());
/// ```
#[derive(Debug)]
pub struct Claim {
    taken: AtomicBool,
}

impl Claim {
    /// Create an unclaimed flag.
    pub const fn new() -> Self {
        Self {
            taken: AtomicBool::new(false),
        }
    }

    /// Construct the guarded value, once.
    ///
    /// Returns `Err(Error::PeripheralTaken)` on every call after the first.
    pub fn take<T>(&self, make: impl FnOnce() -> T) -> Result<T, Error> {
        if self.taken.swap(true, Ordering::AcqRel) {
            return Err(Error::PeripheralTaken);
        }
        Ok(make())
    }

    /// Check whether the value has been handed out.
    pub fn is_taken(&self) -> bool {
        self.taken.load(Ordering::Acquire)
    }
}

impl Default for Claim {
    fn default() -> Self {
        Self::new()
    }
}
