//! 10-bit analog sampler.
//!
//! [`Adc::new`] writes the write-once configuration (right-justified
//! result, Vdd/Vss references, conversion clock) and leaves the converter
//! idle. [`Adc::read_channel`] selects a channel, waits the acquisition
//! time on the caller's delay provider, starts a conversion and spins on
//! `GO/DONE` until the result is ready.

use embedded_hal::delay::DelayNs;

use crate::error::Error;
use crate::log::{debug, trace};
use crate::registers::{AdcReg, RegisterBlock, adcon0, adcon1};

/// Number of analog inputs.
pub const CHANNEL_COUNT: u8 = 8;

/// Conversion resolution.
pub const RESOLUTION_BITS: u32 = 10;

/// Largest sample value.
pub const MAX_SAMPLE: u16 = (1 << RESOLUTION_BITS) - 1;

/// Shortest conversion clock period the converter tolerates.
pub const MIN_TAD_NS: u32 = 1_600;

/// Longest conversion clock period accepted.
pub const MAX_TAD_NS: u32 = 12_800;

/// Significant bits of `ADRESH` in right-justified mode.
const ADRESH_MASK: u8 = 0b0000_0011;

/// Conversion clock source.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcClock {
    /// Oscillator / 2
    Fosc2,
    /// Oscillator / 4
    Fosc4,
    /// Oscillator / 8
    Fosc8,
    /// Oscillator / 16
    Fosc16,
    /// Oscillator / 32
    Fosc32,
    /// Oscillator / 64
    Fosc64,
    /// Dedicated internal RC oscillator
    InternalRc,
}

impl AdcClock {
    const DIVIDED: [AdcClock; 6] = [
        AdcClock::Fosc2,
        AdcClock::Fosc4,
        AdcClock::Fosc8,
        AdcClock::Fosc16,
        AdcClock::Fosc32,
        AdcClock::Fosc64,
    ];

    /// Oscillator divisor, `None` for the internal RC source.
    pub const fn divisor(self) -> Option<u32> {
        match self {
            AdcClock::Fosc2 => Some(2),
            AdcClock::Fosc4 => Some(4),
            AdcClock::Fosc8 => Some(8),
            AdcClock::Fosc16 => Some(16),
            AdcClock::Fosc32 => Some(32),
            AdcClock::Fosc64 => Some(64),
            AdcClock::InternalRc => None,
        }
    }

    /// `ADCON0` ADCS1:ADCS0 field value.
    pub const fn adcs_bits(self) -> u8 {
        match self {
            AdcClock::Fosc2 | AdcClock::Fosc4 => 0b00,
            AdcClock::Fosc8 | AdcClock::Fosc16 => 0b01,
            AdcClock::Fosc32 | AdcClock::Fosc64 => 0b10,
            AdcClock::InternalRc => 0b11,
        }
    }

    /// Whether `ADCON1.ADCS2` must be set.
    pub const fn doubled(self) -> bool {
        matches!(self, AdcClock::Fosc4 | AdcClock::Fosc16 | AdcClock::Fosc64)
    }

    /// Conversion clock period for a given oscillator, `None` for RC.
    pub fn tad_ns(self, oscillator_hz: u32) -> Option<u32> {
        let divisor = self.divisor()?;
        if oscillator_hz == 0 {
            return Some(u32::MAX);
        }
        let ns = u64::from(divisor) * 1_000_000_000 / u64::from(oscillator_hz);
        Some(u32::try_from(ns).unwrap_or(u32::MAX))
    }

    /// Fastest divided clock within the allowed period range, falling back
    /// to the internal RC source.
    pub fn select(oscillator_hz: u32) -> Self {
        Self::DIVIDED
            .into_iter()
            .find(|clock| clock.tad_ns(oscillator_hz).is_some_and(tad_in_range))
            .unwrap_or(AdcClock::InternalRc)
    }
}

fn tad_in_range(tad_ns: u32) -> bool {
    (MIN_TAD_NS..=MAX_TAD_NS).contains(&tad_ns)
}

/// Something that produces one quantized sample of an analog input.
pub trait Sampler {
    /// Sample `channel`, using `delay` for any settling wait.
    fn read_channel<D: DelayNs>(&mut self, channel: u8, delay: &mut D) -> Result<u16, Error>;
}

/// ADC driver owning its register block.
#[derive(Debug)]
pub struct Adc<R> {
    regs: R,
    clock: AdcClock,
    acquisition_delay_us: u32,
}

impl<R: RegisterBlock<AdcReg>> Adc<R> {
    /// Configure the converter and take ownership of its registers.
    ///
    /// Fails with `AdcClockOutOfRange` when `clock` divides
    /// `oscillator_hz` into a period outside [`MIN_TAD_NS`, `MAX_TAD_NS`].
    pub fn new(
        mut regs: R,
        clock: AdcClock,
        oscillator_hz: u32,
        acquisition_delay_us: u32,
    ) -> Result<Self, Error> {
        if let Some(tad_ns) = clock.tad_ns(oscillator_hz)
            && !tad_in_range(tad_ns)
        {
            return Err(Error::AdcClockOutOfRange { tad_ns });
        }

        let mut control1 = adcon1::ADFM | adcon1::PCFG_ALL_ANALOG;
        if clock.doubled() {
            control1 |= adcon1::ADCS2;
        }
        regs.write(AdcReg::Adcon1, control1);
        regs.write(
            AdcReg::Adcon0,
            (clock.adcs_bits() << adcon0::ADCS_SHIFT) | adcon0::ADON,
        );
        regs.write(AdcReg::Trisa, 0xFF);

        debug!(
            "ADC initialized: ADCON1 {}, acquisition {} us",
            control1, acquisition_delay_us
        );

        Ok(Self {
            regs,
            clock,
            acquisition_delay_us,
        })
    }

    /// Conversion clock written at initialization.
    pub fn clock(&self) -> AdcClock {
        self.clock
    }

    /// Settling wait applied before every conversion.
    pub fn acquisition_delay_us(&self) -> u32 {
        self.acquisition_delay_us
    }

    /// Convert `channel` and return the 10-bit result.
    ///
    /// Only the channel-select bits of `ADCON0` change. The acquisition
    /// wait is mandatory: converting straight after switching channels
    /// reads an under-settled hold capacitor.
    pub fn read_channel<D: DelayNs>(&mut self, channel: u8, delay: &mut D) -> Result<u16, Error> {
        if channel >= CHANNEL_COUNT {
            return Err(Error::InvalidChannel(channel));
        }

        self.regs
            .modify(AdcReg::Adcon0, adcon0::CHS_MASK, channel << adcon0::CHS_SHIFT);
        delay.delay_us(self.acquisition_delay_us);

        self.regs.modify(AdcReg::Adcon0, 0, adcon0::GO_DONE);
        while self.regs.is_set(AdcReg::Adcon0, adcon0::GO_DONE) {
            core::hint::spin_loop();
        }

        let high = self.regs.read(AdcReg::Adresh) & ADRESH_MASK;
        let low = self.regs.read(AdcReg::Adresl);
        let sample = (u16::from(high) << 8) | u16::from(low);

        trace!("ADC channel {}: {}", channel, sample);
        Ok(sample)
    }

    /// Give the register block back.
    pub fn release(self) -> R {
        self.regs
    }
}

impl<R: RegisterBlock<AdcReg>> Sampler for Adc<R> {
    fn read_channel<D: DelayNs>(&mut self, channel: u8, delay: &mut D) -> Result<u16, Error> {
        Adc::read_channel(self, channel, delay)
    }
}
