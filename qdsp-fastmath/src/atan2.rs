//! Four-quadrant arctangent in fixed point.
//!
//! Inputs are Q15 coordinates, the result is Q2.13 radians in `[-π, π]`.
//! The first octant is a degree-9 polynomial in `|y/x|` (Horner, Q15);
//! the other octants are reached by swapping and negating the arguments.

use std::cmp::Ordering;

use qdsp_core::KernelError;
use qdsp_math::divide_q15;
use qdsp_math::ops::ssat;
use serde::{Deserialize, Serialize};

/// π/2 in Q2.13.
pub const HALF_PI_Q13: i16 = 0x3244;
/// π in Q2.13.
pub const PI_Q13: i16 = 0x6488;

pub const ATAN_COEFFS: usize = 10;

/// Polynomial coefficients of `atan(r)` on `[0, 1]`, Q15, lowest order
/// first. The result of the polynomial is Q15 and is scaled to Q13.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtanCoefficients(pub [i16; ATAN_COEFFS]);

impl Default for AtanCoefficients {
    fn default() -> Self {
        Self([0, 32767, -1, -10905, -144, 7085, -680, -5719, 4393, -1061])
    }
}

impl AtanCoefficients {
    /// `atan(r)` for `r` in `[0, 1)` Q15, result Q2.13.
    fn atan_limited(&self, r: i16) -> i16 {
        let c = &self.0;
        let mut res = c[ATAN_COEFFS - 1] as i32;
        for &k in c[..ATAN_COEFFS - 1].iter().rev() {
            res = (r as i32 * res) >> 15;
            res += k as i32;
        }
        ssat(res >> 2, 16) as i16
    }
}

/// Align a normalized quotient to a plain Q15 ratio, saturating.
fn q15_ratio(num: i16, den: i16) -> Result<i16, KernelError> {
    let q = divide_q15(num, den)?;
    let ratio = if q.shift >= 0 {
        ssat((q.quotient as i32) << q.shift, 16)
    } else {
        (q.quotient as i32) >> -q.shift
    };
    Ok(ratio as i16)
}

/// `atan(y/x)` in `[-π/2, π/2]` for `x != 0`.
fn atan_q15(coeffs: &AtanCoefficients, y: i16, x: i16) -> Result<i16, KernelError> {
    let mut negative = false;
    let mut y = y;
    let mut x = x;
    if y < 0 {
        y = y.saturating_neg();
        negative = !negative;
    }
    if x < 0 {
        x = x.saturating_neg();
        negative = !negative;
    }

    let res = if y > x {
        HALF_PI_Q13 - coeffs.atan_limited(q15_ratio(x, y)?)
    } else {
        coeffs.atan_limited(q15_ratio(y, x)?)
    };

    Ok(if negative { res.saturating_neg() } else { res })
}

/// `atan2(y, x)` with the default coefficient table.
///
/// ```
/// use qdsp_fastmath::{atan2_q15, PI_Q13};
///
/// assert_eq!(atan2_q15(0, -32768), Ok(PI_Q13));
/// assert!(atan2_q15(0, 0).is_err());
/// ```
pub fn atan2_q15(y: i16, x: i16) -> Result<i16, KernelError> {
    atan2_q15_with(&AtanCoefficients::default(), y, x)
}

/// `atan2(y, x)` in Q2.13. Both coordinates zero is
/// [`KernelError::NanInf`].
pub fn atan2_q15_with(coeffs: &AtanCoefficients, y: i16, x: i16) -> Result<i16, KernelError> {
    if x > 0 {
        return atan_q15(coeffs, y, x);
    }
    if x < 0 {
        return Ok(match y.cmp(&0) {
            Ordering::Greater => atan_q15(coeffs, y, x)?.saturating_add(PI_Q13),
            Ordering::Less => atan_q15(coeffs, y, x)?.saturating_sub(PI_Q13),
            Ordering::Equal => PI_Q13,
        });
    }
    match y.cmp(&0) {
        Ordering::Greater => Ok(HALF_PI_Q13),
        Ordering::Less => Ok(-HALF_PI_Q13),
        Ordering::Equal => Err(KernelError::NanInf),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_rad(q13: i16) -> f64 {
        q13 as f64 / 8192.0
    }

    #[test]
    fn test_axes() {
        assert_eq!(atan2_q15(0, 100), Ok(0));
        assert_eq!(atan2_q15(0, -1), Ok(PI_Q13));
        assert_eq!(atan2_q15(5, 0), Ok(HALF_PI_Q13));
        assert_eq!(atan2_q15(-5, 0), Ok(-HALF_PI_Q13));
        assert_eq!(atan2_q15(0, 0), Err(KernelError::NanInf));
    }

    #[test]
    fn test_diagonals() {
        let quarter = std::f64::consts::FRAC_PI_4;
        let cases = [
            (16384, 16384, quarter),
            (16384, -16384, 3.0 * quarter),
            (-16384, -16384, -3.0 * quarter),
            (-16384, 16384, -quarter),
        ];
        for (y, x, expected) in cases {
            let got = to_rad(atan2_q15(y, x).unwrap());
            assert!((got - expected).abs() < 1e-3, "atan2({}, {}) = {} expected {}", y, x, got, expected);
        }
    }

    #[test]
    fn test_steep_angle_uses_swap() {
        // y/x = 4: atan = 1.3258
        let got = to_rad(atan2_q15(32000, 8000).unwrap());
        assert!((got - 4f64.atan()).abs() < 2e-3, "got {}", got);
    }

    #[test]
    fn test_saturating_extremes() {
        let got = to_rad(atan2_q15(i16::MIN, i16::MIN).unwrap());
        assert!((got + 3.0 * std::f64::consts::FRAC_PI_4).abs() < 1e-3, "got {}", got);
    }

    #[test]
    fn test_custom_table() {
        // linear table: atan(r) ≈ r
        let mut c = [0i16; ATAN_COEFFS];
        c[1] = 32767;
        let linear = AtanCoefficients(c);
        let got = atan2_q15_with(&linear, 8192, 16384).unwrap();
        // 0.5 in Q13
        assert!((got - 4096).abs() <= 1, "got {}", got);
    }
}
