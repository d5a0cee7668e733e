use serde::{Deserialize, Serialize};

use crate::fixed_point::FixedPointError;

/// Result of a normalized Q15 division: `quotient * 2^shift ≈ num / den`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Q15Quotient {
    pub quotient: i16,
    pub shift: i16,
}

impl Q15Quotient {
    pub fn to_f64(self) -> f64 {
        self.quotient as f64 / 32768.0 * 2f64.powi(self.shift as i32)
    }
}

/// Divide two Q15 values.
///
/// The mantissa keeps at most 15 significant bits; when `|num| > |den|` the
/// excess is returned in `shift`. A zero denominator yields
/// [`FixedPointError::DivideByZero`].
pub fn divide_q15(num: i16, den: i16) -> Result<Q15Quotient, FixedPointError> {
    if den == 0 {
        return Err(FixedPointError::DivideByZero {
            numerator: num as i32,
        });
    }

    let negative = (num < 0) != (den < 0);
    let num = num.saturating_abs() as i32;
    let den = den.saturating_abs() as i32;

    let mut temp = (num << 15) / den;
    let mut shift = 0i16;
    let norm = 17 - temp.leading_zeros() as i32;
    if norm > 0 {
        shift = norm as i16;
        temp >>= norm;
    }
    if negative {
        temp = -temp;
    }

    Ok(Q15Quotient {
        quotient: temp as i16,
        shift,
    })
}

/// Quotient a zero denominator saturates to, by the sign of the numerator.
pub fn saturated_quotient(numerator: i32) -> i16 {
    if numerator < 0 {
        i16::MIN
    } else {
        i16::MAX
    }
}
