//! Special pixel sentinels for 8-byte cube data.
//!
//! Cubes reserve the five most negative representable doubles as sentinels.
//! A sentinel marks a pixel that was never measured (`NULL8`) or that
//! saturated the instrument or the representation. Anything at or below
//! those values is carried through processing unchanged instead of being
//! recomputed.

/// Smallest value treated as a real measurement.
pub const VALID_MIN8: f64 = f64::from_bits(0xFFEF_FFFF_FFFF_FFFA);
/// Pixel has no data.
pub const NULL8: f64 = f64::from_bits(0xFFEF_FFFF_FFFF_FFFB);
/// Below the range of the storage representation.
pub const LOW_REPR_SAT8: f64 = f64::from_bits(0xFFEF_FFFF_FFFF_FFFC);
/// Below the range of the instrument.
pub const LOW_INSTR_SAT8: f64 = f64::from_bits(0xFFEF_FFFF_FFFF_FFFD);
/// Above the range of the instrument.
pub const HIGH_INSTR_SAT8: f64 = f64::from_bits(0xFFEF_FFFF_FFFF_FFFE);
/// Above the range of the storage representation.
pub const HIGH_REPR_SAT8: f64 = f64::from_bits(0xFFEF_FFFF_FFFF_FFFF);

/// Classification of a stored pixel value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialPixel {
    Null,
    LowRepresentationSaturation,
    LowInstrumentSaturation,
    HighInstrumentSaturation,
    HighRepresentationSaturation,
    /// NaN or any other out-of-band value below `VALID_MIN8`
    Invalid,
}

impl SpecialPixel {
    /// Classify a value, returning `None` for ordinary measurements.
    pub fn classify(value: f64) -> Option<Self> {
        if value.is_nan() {
            return Some(SpecialPixel::Invalid);
        }
        if value >= VALID_MIN8 {
            return None;
        }
        let kind = match value.to_bits() {
            bits if bits == NULL8.to_bits() => SpecialPixel::Null,
            bits if bits == LOW_REPR_SAT8.to_bits() => SpecialPixel::LowRepresentationSaturation,
            bits if bits == LOW_INSTR_SAT8.to_bits() => SpecialPixel::LowInstrumentSaturation,
            bits if bits == HIGH_INSTR_SAT8.to_bits() => SpecialPixel::HighInstrumentSaturation,
            bits if bits == HIGH_REPR_SAT8.to_bits() => SpecialPixel::HighRepresentationSaturation,
            _ => SpecialPixel::Invalid,
        };
        Some(kind)
    }

    /// Sentinel value stored for this class.
    pub fn value(self) -> f64 {
        match self {
            SpecialPixel::Null | SpecialPixel::Invalid => NULL8,
            SpecialPixel::LowRepresentationSaturation => LOW_REPR_SAT8,
            SpecialPixel::LowInstrumentSaturation => LOW_INSTR_SAT8,
            SpecialPixel::HighInstrumentSaturation => HIGH_INSTR_SAT8,
            SpecialPixel::HighRepresentationSaturation => HIGH_REPR_SAT8,
        }
    }
}

/// True when `value` is a sentinel (or NaN) rather than a measurement.
#[inline]
pub fn is_special(value: f64) -> bool {
    value.is_nan() || value < VALID_MIN8
}

/// True when `value` is an ordinary measurement.
#[inline]
pub fn is_valid(value: f64) -> bool {
    !is_special(value)
}
