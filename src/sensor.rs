//! Linear sensor transfer function.
//!
//! Maps a raw ADC count to the sensor's unit through
//! `count * step / sensitivity`, in integer arithmetic.

use crate::format::FixedDecimal;

/// Linear count-to-unit conversion.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransferFunction {
    /// ADC step size in microvolts per count
    pub step_microvolts: u32,
    /// Sensor output slope in microvolts per reported unit
    pub sensitivity_microvolts: u32,
}

impl TransferFunction {
    /// LM35 on a 5 V / 10-bit converter: 4.88 mV per count, 10 mV per °C.
    pub const LM35: Self = Self::new(4_880, 10_000);

    /// Create a transfer function.
    pub const fn new(step_microvolts: u32, sensitivity_microvolts: u32) -> Self {
        Self {
            step_microvolts,
            sensitivity_microvolts,
        }
    }

    /// Convert a raw count into the sensor's unit.
    ///
    /// The result is truncated to thousandths. A zero sensitivity yields
    /// zero rather than dividing by it.
    pub fn apply(&self, sample: u16) -> FixedDecimal {
        if self.sensitivity_microvolts == 0 {
            return FixedDecimal::ZERO;
        }
        let scaled = u64::from(sample)
            * u64::from(self.step_microvolts)
            * u64::from(FixedDecimal::SCALE)
            / u64::from(self.sensitivity_microvolts);
        FixedDecimal::from_thousandths(u32::try_from(scaled).unwrap_or(u32::MAX))
    }
}

impl Default for TransferFunction {
    fn default() -> Self {
        Self::LM35
    }
}
