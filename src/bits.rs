/** Validated bit-range extraction/replacement over a 32-bit register */
use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum BitsError {
    #[error("invalid bit range [{start}, {end}], must satisfy start <= end <= 31")]
    InvalidBitRange { start: u8, end: u8 },

    #[error("value {value} does not fit in {width} bit(s)")]
    ValueOutOfRange { value: u32, width: u8 },
}

/// A contiguous, inclusive range of bits `[start, end]` within a u32.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitRange {
    start: u8,
    end: u8,
}

impl BitRange {
    pub fn new(start: u8, end: u8) -> Result<Self, BitsError> {
        if start > end || end > 31 {
            return Err(BitsError::InvalidBitRange { start, end });
        }
        Ok(Self { start, end })
    }

    // For layouts known at compile time. Invalid ranges fail the const
    // evaluation instead of returning an error.
    pub(crate) const fn fixed(start: u8, end: u8) -> Self {
        assert!(start <= end && end <= 31);
        Self { start, end }
    }

    pub fn width(self) -> u8 {
        self.end - self.start + 1
    }

    /// Largest field value that fits in this range.
    pub fn max_value(self) -> u32 {
        match self.width() {
            32 => u32::MAX,
            w => (1 << w) - 1,
        }
    }

    fn register_mask(self) -> u32 {
        self.max_value() << self.start
    }
}

/// Returns the field's value right-aligned, as if it occupied bits
/// `0..width`.
pub fn extract(register: u32, range: BitRange) -> u32 {
    // Mask the original register before shifting. Masking the shifted value
    // with the same constant would clear the wrong bits.
    let masked = if range.end == 31 {
        register
    } else {
        register & ((1 << (range.end + 1)) - 1)
    };
    masked >> range.start
}

/// Returns a new register with the field set to `value` and every bit
/// outside the range untouched. Values wider than the range are rejected,
/// never truncated.
pub fn replace(register: u32, range: BitRange, value: u32) -> Result<u32, BitsError> {
    if value > range.max_value() {
        return Err(BitsError::ValueOutOfRange {
            value,
            width: range.width(),
        });
    }

    Ok((register & !range.register_mask()) | (value << range.start))
}
