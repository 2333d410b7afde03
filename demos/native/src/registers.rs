//! Simulated register blocks for running the drivers on a desktop

use std::io::{self, Write};

use tempstream::registers::{adcon0, pir1, txsta};
use tempstream::{AdcReg, RegisterBlock, UartReg};

// =============================================================================
// USART
// =============================================================================

/// USART whose transmit register writes straight to stdout.
///
/// The transmitter is always ready and nothing is ever received.
#[derive(Debug, Default)]
pub struct StdoutUart {
    file: [u8; 7],
}

impl StdoutUart {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RegisterBlock<UartReg> for StdoutUart {
    fn read(&mut self, reg: UartReg) -> u8 {
        match reg {
            UartReg::Pir1 => self.file[reg as usize] | pir1::TXIF,
            UartReg::Txsta => self.file[reg as usize] | txsta::TRMT,
            _ => self.file[reg as usize],
        }
    }

    fn write(&mut self, reg: UartReg, value: u8) {
        if reg == UartReg::Txreg {
            let mut out = io::stdout().lock();
            // A closed stdout has nowhere to report to
            let _ = out.write_all(&[value]);
            if value == b'\n' {
                let _ = out.flush();
            }
            return;
        }
        self.file[reg as usize] = value;
    }
}

// =============================================================================
// ADC
// =============================================================================

/// Lowest simulated temperature, in thousandths of a degree
const MIN_MILLIDEGREES: u32 = 20_000;

/// Highest simulated temperature, in thousandths of a degree
const MAX_MILLIDEGREES: u32 = 30_000;

/// Change per conversion, in thousandths of a degree
const STEP_MILLIDEGREES: u32 = 500;

/// ADC with an LM35 on every channel, sweeping 20 °C to 30 °C and back.
///
/// Conversions complete as soon as `GO/DONE` is set.
#[derive(Debug)]
pub struct ThermalAdc {
    file: [u8; 5],
    millidegrees: u32,
    rising: bool,
}

impl ThermalAdc {
    pub fn new() -> Self {
        Self {
            file: [0; 5],
            millidegrees: MIN_MILLIDEGREES,
            rising: true,
        }
    }

    /// Count the sensor voltage would produce (10 mV/°C, 4.88 mV/count).
    pub fn sample(&self) -> u16 {
        let microvolts = self.millidegrees * 10;
        (microvolts / 4_880).min(1023) as u16
    }

    fn advance(&mut self) {
        if self.rising {
            self.millidegrees += STEP_MILLIDEGREES;
            self.rising = self.millidegrees < MAX_MILLIDEGREES;
        } else {
            self.millidegrees -= STEP_MILLIDEGREES;
            self.rising = self.millidegrees <= MIN_MILLIDEGREES;
        }
    }
}

impl Default for ThermalAdc {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterBlock<AdcReg> for ThermalAdc {
    fn read(&mut self, reg: AdcReg) -> u8 {
        self.file[reg as usize]
    }

    fn write(&mut self, reg: AdcReg, value: u8) {
        if reg == AdcReg::Adcon0 && value & adcon0::GO_DONE != 0 {
            let sample = self.sample();
            self.file[AdcReg::Adresh as usize] = (sample >> 8) as u8;
            self.file[AdcReg::Adresl as usize] = sample as u8;
            self.file[reg as usize] = value & !adcon0::GO_DONE;
            self.advance();
            return;
        }
        self.file[reg as usize] = value;
    }
}
