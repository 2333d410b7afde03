//! Asynchronous serial transport.
//!
//! [`UartSettings`] derives the write-once baud-rate and frame settings;
//! [`Uart`] writes them to the register block it owns and then moves bytes
//! by spinning on the `TXIF` / `RCIF` flags. There is no queue: at most one
//! byte is in flight.

use core::convert::Infallible;

use crate::error::Error;
use crate::io::SerialIo;
use crate::log::{debug, warning};
use crate::registers::{RegisterBlock, UartReg, pir1, rcsta, trisc, txsta};

/// Largest accepted baud-rate error, in parts per thousand.
pub const MAX_BAUD_ERROR_PERMILLE: u32 = 20;

/// Baud-rate generator speed mode (`TXSTA.BRGH`).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpeedMode {
    /// `baud = osc / (16 * (divisor + 1))`
    High,
    /// `baud = osc / (64 * (divisor + 1))`
    Low,
}

impl SpeedMode {
    /// Oscillator cycles per divisor step.
    pub const fn prescaler(self) -> u32 {
        match self {
            SpeedMode::High => 16,
            SpeedMode::Low => 64,
        }
    }
}

/// Data bits per frame. Frames are always no parity, one stop bit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    /// 8N1
    #[default]
    Eight,
    /// 9N1 (ninth bit always zero here)
    Nine,
}

/// Write-once USART configuration.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartSettings {
    divisor: u8,
    mode: SpeedMode,
    data_bits: DataBits,
    requested_baud: u32,
    actual_baud: u32,
}

impl UartSettings {
    /// Compute the divisor for `baud` from an `oscillator_hz` clock.
    ///
    /// High-speed mode is preferred; low-speed mode is used when the
    /// high-speed divisor does not fit in 8 bits or misses the tolerance.
    /// The divisor is rounded to the nearest step.
    pub fn new(oscillator_hz: u32, baud: u32, data_bits: DataBits) -> Result<Self, Error> {
        if baud == 0 {
            return Err(Error::BaudRateUnreachable { requested: baud });
        }

        for mode in [SpeedMode::High, SpeedMode::Low] {
            let clocks_per_bit = u64::from(mode.prescaler()) * u64::from(baud);
            let steps = (u64::from(oscillator_hz) + clocks_per_bit / 2) / clocks_per_bit;
            if steps == 0 || steps > 256 {
                continue;
            }

            let actual = u64::from(oscillator_hz) / (u64::from(mode.prescaler()) * steps);
            let error_permille = actual.abs_diff(u64::from(baud)) * 1000 / u64::from(baud);
            if error_permille > u64::from(MAX_BAUD_ERROR_PERMILLE) {
                continue;
            }

            return Ok(Self {
                divisor: (steps - 1) as u8,
                mode,
                data_bits,
                requested_baud: baud,
                actual_baud: actual as u32,
            });
        }

        Err(Error::BaudRateUnreachable { requested: baud })
    }

    /// `SPBRG` value.
    pub fn divisor(&self) -> u8 {
        self.divisor
    }

    /// Baud-rate generator mode.
    pub fn mode(&self) -> SpeedMode {
        self.mode
    }

    /// Frame data bits.
    pub fn data_bits(&self) -> DataBits {
        self.data_bits
    }

    /// Rate the settings were computed for.
    pub fn requested_baud(&self) -> u32 {
        self.requested_baud
    }

    /// Rate the divisor actually produces.
    pub fn actual_baud(&self) -> u32 {
        self.actual_baud
    }

    /// `TXSTA` value: asynchronous, transmitter enabled.
    pub fn tx_control(&self) -> u8 {
        let mut value = txsta::TXEN;
        if self.mode == SpeedMode::High {
            value |= txsta::BRGH;
        }
        if self.data_bits == DataBits::Nine {
            value |= txsta::TX9;
        }
        value
    }

    /// `RCSTA` value: port enabled, continuous receive.
    pub fn rx_control(&self) -> u8 {
        let mut value = rcsta::SPEN | rcsta::CREN;
        if self.data_bits == DataBits::Nine {
            value |= rcsta::RX9;
        }
        value
    }
}

/// USART driver owning its register block.
#[derive(Debug)]
pub struct Uart<R> {
    regs: R,
    settings: UartSettings,
}

impl<R: RegisterBlock<UartReg>> Uart<R> {
    /// Configure the USART and take ownership of its registers.
    ///
    /// Writes the divisor, transmit control, receive control, then sets
    /// RC6 (TX) as output and RC7 (RX) as input. Other port C pins keep
    /// their direction.
    pub fn new(mut regs: R, settings: UartSettings) -> Self {
        regs.write(UartReg::Spbrg, settings.divisor());
        regs.write(UartReg::Txsta, settings.tx_control());
        regs.write(UartReg::Rcsta, settings.rx_control());
        regs.modify(UartReg::Trisc, trisc::TX, trisc::RX);

        debug!(
            "UART initialized: divisor {}, {} baud (requested {})",
            settings.divisor(),
            settings.actual_baud(),
            settings.requested_baud()
        );

        Self { regs, settings }
    }

    /// Settings written at initialization.
    pub fn settings(&self) -> &UartSettings {
        &self.settings
    }

    /// Wait for the transmit buffer to empty, then load `byte`.
    pub fn transmit_byte(&mut self, byte: u8) {
        while !self.regs.is_set(UartReg::Pir1, pir1::TXIF) {
            core::hint::spin_loop();
        }
        self.regs.write(UartReg::Txreg, byte);
    }

    /// Transmit `s` byte by byte, stopping at a NUL if one is present.
    pub fn transmit_str(&mut self, s: &str) {
        for byte in s.bytes().take_while(|&b| b != 0) {
            self.transmit_byte(byte);
        }
    }

    /// Wait until the shift register has sent the last byte.
    pub fn flush(&mut self) {
        while !self.regs.is_set(UartReg::Txsta, txsta::TRMT) {
            core::hint::spin_loop();
        }
    }

    /// Take a received byte, if any.
    ///
    /// An overrun restarts the receiver and yields `None`. A byte with a
    /// framing error is read (clearing the error) and dropped.
    pub fn receive_byte(&mut self) -> Option<u8> {
        let status = self.regs.read(UartReg::Rcsta);
        if status & rcsta::OERR != 0 {
            self.regs.modify(UartReg::Rcsta, rcsta::CREN, 0);
            self.regs.modify(UartReg::Rcsta, 0, rcsta::CREN);
            warning!("UART receive overrun, receiver restarted");
            return None;
        }

        if !self.regs.is_set(UartReg::Pir1, pir1::RCIF) {
            return None;
        }

        let byte = self.regs.read(UartReg::Rcreg);
        if status & rcsta::FERR != 0 {
            return None;
        }
        Some(byte)
    }

    /// Give the register block back.
    pub fn release(self) -> R {
        self.regs
    }
}

impl<R: RegisterBlock<UartReg>> SerialIo for Uart<R> {
    type Error = Infallible;

    fn get_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        Ok(self.receive_byte())
    }

    fn put_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.transmit_byte(byte);
        Ok(())
    }

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        self.transmit_str(s);
        Ok(())
    }
}
