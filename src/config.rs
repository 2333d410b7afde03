//! Build-time configuration for the acquisition stream.
//!
//! The `StreamConfig` trait fixes oscillator frequency, serial rate, ADC
//! clock, delays and sensor constants at compile time. Nothing here is
//! read or changed at runtime.

use crate::adc::AdcClock;
use crate::sensor::TransferFunction;
use crate::uart::DataBits;

/// Stream configuration trait.
///
/// All values are const (zero runtime cost).
pub trait StreamConfig {
    /// Oscillator frequency driving both peripherals
    const OSCILLATOR_HZ: u32;

    /// Serial line rate
    const BAUD_RATE: u32;

    /// Serial frame data bits
    const DATA_BITS: DataBits;

    /// ADC conversion clock source
    const ADC_CLOCK: AdcClock;

    /// Analog input the sensor is wired to
    const SENSOR_CHANNEL: u8;

    /// Hold-capacitor settling wait before each conversion
    const ACQUISITION_DELAY_US: u32;

    /// Pause between records
    const SAMPLE_PERIOD_MS: u32;

    /// Wait after power-up before the banner goes out
    const STARTUP_DELAY_MS: u32;

    /// Line sent once at startup
    const BANNER: &'static str;

    /// Count-to-unit conversion for the attached sensor
    const TRANSFER: TransferFunction;
}

/// 4 MHz crystal, 9600 8N1, LM35 on AN0.
///
/// - OSCILLATOR_HZ: 4 MHz
/// - BAUD_RATE: 9600 (divisor 25, high-speed)
/// - ADC_CLOCK: Fosc/32 (8 µs per conversion clock)
/// - ACQUISITION_DELAY_US: 2 ms
/// - SAMPLE_PERIOD_MS: 1 s
/// - STARTUP_DELAY_MS: 100 ms
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DefaultConfig;

impl StreamConfig for DefaultConfig {
    const OSCILLATOR_HZ: u32 = 4_000_000;
    const BAUD_RATE: u32 = 9600;
    const DATA_BITS: DataBits = DataBits::Eight;
    const ADC_CLOCK: AdcClock = AdcClock::Fosc32;
    const SENSOR_CHANNEL: u8 = 0;
    const ACQUISITION_DELAY_US: u32 = 2_000;
    const SAMPLE_PERIOD_MS: u32 = 1_000;
    const STARTUP_DELAY_MS: u32 = 100;
    const BANNER: &'static str = "UART Test Start\r\n";
    const TRANSFER: TransferFunction = TransferFunction::LM35;
}

/// 20 MHz crystal, 19200 8N1, otherwise as [`DefaultConfig`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FastClockConfig;

impl StreamConfig for FastClockConfig {
    const OSCILLATOR_HZ: u32 = 20_000_000;
    const BAUD_RATE: u32 = 19_200;
    const DATA_BITS: DataBits = DataBits::Eight;
    const ADC_CLOCK: AdcClock = AdcClock::Fosc32;
    const SENSOR_CHANNEL: u8 = 0;
    const ACQUISITION_DELAY_US: u32 = 2_000;
    const SAMPLE_PERIOD_MS: u32 = 1_000;
    const STARTUP_DELAY_MS: u32 = 100;
    const BANNER: &'static str = DefaultConfig::BANNER;
    const TRANSFER: TransferFunction = TransferFunction::LM35;
}
