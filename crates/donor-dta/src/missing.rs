//! Stata numeric missing-value sentinels.
//!
//! Each numeric storage type reserves its 27 highest encodable values for
//! the missing codes `.`, `.a`, ..., `.z`. Integer types use the top of
//! their range; float/double use reserved exponent patterns spaced by a
//! fixed bit increment.

use crate::types::{MissingValue, NumericValue};

/// Largest non-missing `byte` value; `.` is 101.
pub const BYTE_MISSING_BASE: i8 = 101;
/// Largest non-missing `int` value is 32740; `.` is 32741.
pub const INT_MISSING_BASE: i16 = 32741;
/// Largest non-missing `long` value is 2147483620; `.` is 2147483621.
pub const LONG_MISSING_BASE: i32 = 2_147_483_621;

/// Bit pattern of the `float` missing base (`.`), incremented by 1<<11
/// for each extended code.
pub const FLOAT_MISSING_BASE_BITS: u32 = 0x7f00_0000;
const FLOAT_MISSING_STEP: u32 = 1 << 11;

/// Bit pattern of the `double` missing base (`.`), incremented by 1<<40
/// for each extended code.
pub const DOUBLE_MISSING_BASE_BITS: u64 = 0x7fe0_0000_0000_0000;
const DOUBLE_MISSING_STEP: u64 = 1 << 40;

pub fn decode_byte(raw: i8) -> NumericValue {
    if raw >= BYTE_MISSING_BASE {
        NumericValue::Missing(MissingValue::from_index((raw - BYTE_MISSING_BASE) as u8))
    } else {
        NumericValue::Value(f64::from(raw))
    }
}

pub fn decode_int(raw: i16) -> NumericValue {
    if raw >= INT_MISSING_BASE {
        NumericValue::Missing(MissingValue::from_index((raw - INT_MISSING_BASE) as u8))
    } else {
        NumericValue::Value(f64::from(raw))
    }
}

pub fn decode_long(raw: i32) -> NumericValue {
    if raw >= LONG_MISSING_BASE {
        NumericValue::Missing(MissingValue::from_index((raw - LONG_MISSING_BASE) as u8))
    } else {
        NumericValue::Value(f64::from(raw))
    }
}

pub fn decode_float(raw: f32) -> NumericValue {
    let bits = raw.to_bits();
    if (FLOAT_MISSING_BASE_BITS..0x7f80_0000).contains(&bits) {
        let index = (bits - FLOAT_MISSING_BASE_BITS) / FLOAT_MISSING_STEP;
        return NumericValue::Missing(MissingValue::from_index(index.min(26) as u8));
    }
    if raw.is_nan() {
        return NumericValue::Missing(MissingValue::Standard);
    }
    NumericValue::Value(f64::from(raw))
}

pub fn decode_double(raw: f64) -> NumericValue {
    let bits = raw.to_bits();
    if (DOUBLE_MISSING_BASE_BITS..0x7ff0_0000_0000_0000).contains(&bits) {
        let index = (bits - DOUBLE_MISSING_BASE_BITS) / DOUBLE_MISSING_STEP;
        return NumericValue::Missing(MissingValue::from_index(index.min(26) as u8));
    }
    if raw.is_nan() {
        return NumericValue::Missing(MissingValue::Standard);
    }
    NumericValue::Value(raw)
}

pub fn encode_byte_missing(missing: MissingValue) -> i8 {
    BYTE_MISSING_BASE + missing.index() as i8
}

pub fn encode_int_missing(missing: MissingValue) -> i16 {
    INT_MISSING_BASE + i16::from(missing.index())
}

pub fn encode_long_missing(missing: MissingValue) -> i32 {
    LONG_MISSING_BASE + i32::from(missing.index())
}

pub fn encode_float_missing(missing: MissingValue) -> f32 {
    f32::from_bits(FLOAT_MISSING_BASE_BITS + u32::from(missing.index()) * FLOAT_MISSING_STEP)
}

pub fn encode_double_missing(missing: MissingValue) -> f64 {
    f64::from_bits(DOUBLE_MISSING_BASE_BITS + u64::from(missing.index()) * DOUBLE_MISSING_STEP)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_sentinels_roundtrip() {
        for missing in [
            MissingValue::Standard,
            MissingValue::Extended('a'),
            MissingValue::Extended('z'),
        ] {
            assert_eq!(
                decode_byte(encode_byte_missing(missing)).missing_type(),
                Some(missing)
            );
            assert_eq!(
                decode_int(encode_int_missing(missing)).missing_type(),
                Some(missing)
            );
            assert_eq!(
                decode_long(encode_long_missing(missing)).missing_type(),
                Some(missing)
            );
        }
    }

    #[test]
    fn float_sentinels_roundtrip() {
        for missing in [
            MissingValue::Standard,
            MissingValue::Extended('c'),
            MissingValue::Extended('z'),
        ] {
            assert_eq!(
                decode_float(encode_float_missing(missing)).missing_type(),
                Some(missing)
            );
            assert_eq!(
                decode_double(encode_double_missing(missing)).missing_type(),
                Some(missing)
            );
        }
    }

    #[test]
    fn boundary_values_stay_present() {
        assert!(decode_byte(100).is_present());
        assert!(decode_int(32740).is_present());
        assert!(decode_long(2_147_483_620).is_present());
        assert!(decode_double(8.0e307).is_present());
        assert!(decode_double(-1.5).is_present());
        assert!(decode_float(1.0e38).is_present());
        // Values above Stata's float ceiling (~1.701e38) are reserved.
        assert!(decode_float(2.0e38).is_missing());
    }

    #[test]
    fn nan_decodes_as_standard_missing() {
        assert_eq!(
            decode_double(f64::NAN).missing_type(),
            Some(MissingValue::Standard)
        );
    }
}
