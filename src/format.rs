//! Allocation-free number-to-text conversion.
//!
//! Output goes into caller-provided `heapless::String` buffers. A buffer
//! too small for the value is reported as [`Error::BufferFull`] and left
//! empty; nothing is ever partially written.

use core::fmt;

use crate::error::Error;

/// Capacity of the integer text buffer (a 16-bit value is at most 5 digits).
pub const INTEGER_TEXT_CAPACITY: usize = 5;

/// Capacity of the decimal text buffer (`<digits>.<digit>`).
pub const DECIMAL_TEXT_CAPACITY: usize = 9;

/// Digits in the largest `u32`.
const MAX_DIGITS: usize = 10;

/// Text buffer sized for a raw ADC sample.
pub type IntegerText = heapless::String<INTEGER_TEXT_CAPACITY>;

/// Text buffer sized for a derived reading.
pub type DecimalText = heapless::String<DECIMAL_TEXT_CAPACITY>;

/// Unsigned fixed-point value with three fractional decimal digits.
///
/// Only the first fractional digit is ever rendered; the other two keep
/// the transfer-function arithmetic exact before truncation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FixedDecimal {
    thousandths: u32,
}

impl FixedDecimal {
    /// Units per whole number.
    pub const SCALE: u32 = 1000;

    /// Zero.
    pub const ZERO: Self = Self { thousandths: 0 };

    /// Create from a value in thousandths (`23_960` is 23.96).
    pub const fn from_thousandths(thousandths: u32) -> Self {
        Self { thousandths }
    }

    /// Raw value in thousandths.
    pub const fn thousandths(self) -> u32 {
        self.thousandths
    }

    /// Integer part, truncated toward zero.
    pub const fn integer_part(self) -> u32 {
        self.thousandths / Self::SCALE
    }

    /// First fractional digit, truncated (0-9).
    pub const fn tenths(self) -> u8 {
        ((self.thousandths % Self::SCALE) / 100) as u8
    }
}

impl fmt::Display for FixedDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.integer_part(), self.tenths())
    }
}

/// Write the decimal digits of `value` into `out`, most significant first.
///
/// `out` is cleared first. Zero renders as `"0"`; no other value gets a
/// leading zero.
pub fn integer_to_text<const N: usize>(
    value: u32,
    out: &mut heapless::String<N>,
) -> Result<(), Error> {
    out.clear();

    let mut scratch = [0u8; MAX_DIGITS];
    let mut len = 0;
    let mut remaining = value;
    loop {
        scratch[len] = b'0' + (remaining % 10) as u8;
        len += 1;
        remaining /= 10;
        if remaining == 0 {
            break;
        }
    }

    if len > N {
        return Err(Error::BufferFull);
    }

    for &digit in scratch[..len].iter().rev() {
        out.push(digit as char).map_err(|_| Error::BufferFull)?;
    }
    Ok(())
}

/// Write `value` as `<integer digits>.<one digit>` into `out`.
///
/// The fractional digit is truncated, so 23.96 renders as `"23.9"`.
pub fn fixed_decimal_to_text<const N: usize>(
    value: FixedDecimal,
    out: &mut heapless::String<N>,
) -> Result<(), Error> {
    out.clear();

    let mut integer: heapless::String<MAX_DIGITS> = heapless::String::new();
    integer_to_text(value.integer_part(), &mut integer)?;

    // Integer digits, the point and one fractional digit
    if integer.len() + 2 > N {
        return Err(Error::BufferFull);
    }

    out.push_str(&integer).map_err(|_| Error::BufferFull)?;
    out.push('.').map_err(|_| Error::BufferFull)?;
    out.push((b'0' + value.tenths()) as char)
        .map_err(|_| Error::BufferFull)?;
    Ok(())
}
