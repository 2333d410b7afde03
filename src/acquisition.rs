//! Sample, convert, format, transmit, wait. Forever.
//!
//! `Acquisition` owns the sampler, the serial I/O and the delay provider.
//! Each [`step`](Acquisition::step) emits exactly one record and then
//! waits the sample period, whether or not the record made it out.
//!
//! Wire format per record:
//!
//! ```text
//! ADC = <digits>\r\nTemp = <digits>.<digit> C\r\n\r\n
//! ```

use core::marker::PhantomData;

use embedded_hal::delay::DelayNs;

use crate::adc::{Adc, Sampler};
use crate::config::StreamConfig;
use crate::error::Error;
use crate::format::{
    DecimalText, FixedDecimal, IntegerText, fixed_decimal_to_text, integer_to_text,
};
use crate::io::SerialIo;
use crate::log::{info, trace, warning};
use crate::registers::{AdcReg, RegisterBlock, UartReg};
use crate::uart::{Uart, UartSettings};

/// One sample and the reading derived from it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Record {
    /// Raw ADC count
    pub sample: u16,

    /// Sample run through the transfer function
    pub reading: FixedDecimal,
}

impl Record {
    /// Format both values, then write the record.
    ///
    /// Nothing is written if either value fails to format.
    pub fn write_to<IO: SerialIo>(&self, io: &mut IO) -> Result<(), Error> {
        let mut sample_text = IntegerText::new();
        integer_to_text(u32::from(self.sample), &mut sample_text)?;

        let mut reading_text = DecimalText::new();
        fixed_decimal_to_text(self.reading, &mut reading_text)?;

        for part in [
            "ADC = ",
            sample_text.as_str(),
            "\r\nTemp = ",
            reading_text.as_str(),
            " C\r\n\r\n",
        ] {
            io.write_str(part).map_err(|_| Error::Io)?;
        }
        Ok(())
    }
}

/// The acquisition loop.
///
/// Generic over:
/// - `S`: Sampler (the ADC driver on hardware)
/// - `IO`: Serial output (the USART driver on hardware)
/// - `D`: Delay provider for settling, startup and sample period
/// - `C`: Build-time configuration
#[derive(Debug)]
pub struct Acquisition<S, IO, D, C> {
    sampler: S,
    io: IO,
    delay: D,
    records: u32,
    started: bool,
    _config: PhantomData<C>,
}

impl<S, IO, D, C> Acquisition<S, IO, D, C>
where
    S: Sampler,
    IO: SerialIo,
    D: DelayNs,
    C: StreamConfig,
{
    /// Create a loop over already-initialized components.
    pub fn new(sampler: S, io: IO, delay: D) -> Self {
        Self {
            sampler,
            io,
            delay,
            records: 0,
            started: false,
            _config: PhantomData,
        }
    }

    /// Wait for the line to settle, then send the banner.
    pub fn start(&mut self) -> Result<(), Error> {
        announce::<_, _, C>(&mut self.io, &mut self.delay)?;
        self.started = true;
        Ok(())
    }

    /// Run one iteration: sample, emit one record, wait the sample period.
    ///
    /// The period is waited even when the iteration fails, so records stay
    /// evenly spaced.
    pub fn step(&mut self) -> Result<Record, Error> {
        let result = self.sample_and_emit();
        self.delay.delay_ms(C::SAMPLE_PERIOD_MS);
        result
    }

    fn sample_and_emit(&mut self) -> Result<Record, Error> {
        let sample = self
            .sampler
            .read_channel(C::SENSOR_CHANNEL, &mut self.delay)?;
        let record = Record {
            sample,
            reading: C::TRANSFER.apply(sample),
        };

        record.write_to(&mut self.io)?;
        self.records = self.records.wrapping_add(1);

        // Receive path is enabled but nothing is listened for
        let discarded = self.io.discard_input().map_err(|_| Error::Io)?;
        if discarded > 0 {
            trace!("Discarded {} received bytes", discarded);
        }

        trace!("Record {}: sample {}", self.records, sample);
        Ok(record)
    }

    /// Send the banner unless already sent, then step forever.
    ///
    /// Failures are logged and the loop carries on.
    pub fn run(mut self) -> ! {
        if !self.started
            && let Err(err) = self.start()
        {
            warning!("Banner not sent: {}", err);
        }
        loop {
            if let Err(err) = self.step() {
                warning!("Acquisition step failed: {}", err);
            }
        }
    }

    /// Whether the banner has gone out.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Records emitted so far (wraps at `u32::MAX`).
    pub fn records(&self) -> u32 {
        self.records
    }

    /// Get reference to the sampler.
    pub fn sampler(&self) -> &S {
        &self.sampler
    }

    /// Get reference to the I/O interface.
    pub fn io(&self) -> &IO {
        &self.io
    }

    /// Get mutable reference to the I/O interface.
    pub fn io_mut(&mut self) -> &mut IO {
        &mut self.io
    }

    /// Get reference to the delay provider.
    pub fn delay(&self) -> &D {
        &self.delay
    }

    /// Take the components back.
    pub fn into_parts(self) -> (S, IO, D) {
        (self.sampler, self.io, self.delay)
    }
}

impl<UR, AR, D, C> Acquisition<Adc<AR>, Uart<UR>, D, C>
where
    UR: RegisterBlock<UartReg>,
    AR: RegisterBlock<AdcReg>,
    D: DelayNs,
    C: StreamConfig,
{
    /// Initialize the USART and ADC from `C` and build the loop over them.
    ///
    /// Both peripherals are configured before anything is sent. Use
    /// [`boot`](Self::boot) for power-on order.
    pub fn from_registers(uart_regs: UR, adc_regs: AR, delay: D) -> Result<Self, Error> {
        let settings = UartSettings::new(C::OSCILLATOR_HZ, C::BAUD_RATE, C::DATA_BITS)?;
        let uart = Uart::new(uart_regs, settings);
        let adc = Adc::new(
            adc_regs,
            C::ADC_CLOCK,
            C::OSCILLATOR_HZ,
            C::ACQUISITION_DELAY_US,
        )?;
        Ok(Self::new(adc, uart, delay))
    }

    /// Bring the board up in power-on order and return a started loop.
    ///
    /// USART, startup wait, banner, then the ADC. An ADC clock that is out
    /// of range is reported after the banner has gone out.
    pub fn boot(uart_regs: UR, adc_regs: AR, mut delay: D) -> Result<Self, Error> {
        let settings = UartSettings::new(C::OSCILLATOR_HZ, C::BAUD_RATE, C::DATA_BITS)?;
        let mut uart = Uart::new(uart_regs, settings);
        announce::<_, _, C>(&mut uart, &mut delay)?;

        let adc = Adc::new(
            adc_regs,
            C::ADC_CLOCK,
            C::OSCILLATOR_HZ,
            C::ACQUISITION_DELAY_US,
        )?;
        let mut acquisition = Self::new(adc, uart, delay);
        acquisition.started = true;
        Ok(acquisition)
    }
}

fn announce<IO: SerialIo, D: DelayNs, C: StreamConfig>(
    io: &mut IO,
    delay: &mut D,
) -> Result<(), Error> {
    delay.delay_ms(C::STARTUP_DELAY_MS);
    io.write_str(C::BANNER).map_err(|_| Error::Io)?;
    info!("Acquisition started, period {} ms", C::SAMPLE_PERIOD_MS);
    Ok(())
}
