//! Accumulator requantization.
//!
//! An int32 accumulator is rescaled to the output scale by a Q31 multiplier
//! (a fraction in `[0.5, 1)` for normalized multipliers) and a signed power
//! of two: `round(acc * multiplier * 2^shift / 2^31)`, saturated to `i32`.
//! Positive `shift` is a left shift.

use serde::{Deserialize, Serialize};

use crate::fixed_point::Raw;
use crate::ops::round_shift_i128;

/// How the dropped fraction is rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// One rounding step, ties toward +inf. Matches the single-rounding
    /// kernels and is the default.
    #[default]
    HalfUp,
    /// Two rounding steps: doubling high multiply, then a rounding divide by
    /// a power of two with ties away from zero.
    HalfAwayFromZero,
    /// One rounding step, ties to even.
    HalfEven,
}

/// Per-channel requantization parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requantizer {
    pub multiplier: i32,
    pub shift: i32,
    #[serde(default)]
    pub rounding: RoundingMode,
}

impl Requantizer {
    pub const fn new(multiplier: i32, shift: i32) -> Self {
        Self {
            multiplier,
            shift,
            rounding: RoundingMode::HalfUp,
        }
    }

    /// Multiplier 0.5 shifted left by one: passes accumulators through.
    pub const fn identity() -> Self {
        Self::new(1 << 30, 1)
    }

    pub fn from_real_scale(scale: f64) -> Self {
        let (multiplier, shift) = quantize_multiplier(scale);
        Self::new(multiplier, shift)
    }

    pub fn with_rounding(mut self, rounding: RoundingMode) -> Self {
        self.rounding = rounding;
        self
    }

    #[inline]
    pub fn apply(&self, acc: i32) -> i32 {
        requantize_with(acc, self.multiplier, self.shift, self.rounding)
    }
}

impl Default for Requantizer {
    fn default() -> Self {
        Self::identity()
    }
}

/// `round(acc * multiplier * 2^shift / 2^31)` with [`RoundingMode::HalfUp`].
#[inline]
pub fn requantize(acc: i32, multiplier: i32, shift: i32) -> i32 {
    requantize_with(acc, multiplier, shift, RoundingMode::HalfUp)
}

/// [`requantize`], then saturate to the storage width of `R`.
#[inline]
pub fn requantize_to<R: Raw>(acc: i32, multiplier: i32, shift: i32) -> R {
    R::from_i64_sat(requantize(acc, multiplier, shift) as i64)
}

pub fn requantize_with(acc: i32, multiplier: i32, shift: i32, rounding: RoundingMode) -> i32 {
    if rounding == RoundingMode::HalfAwayFromZero {
        return requantize_double_rounding(acc, multiplier, shift);
    }

    let prod = acc as i128 * multiplier as i128;
    let total_shift = 31 - shift as i64;
    let scaled = if total_shift <= 0 {
        prod << (-total_shift).min(64)
    } else {
        let n = total_shift.min(126) as u32;
        match rounding {
            RoundingMode::HalfEven => round_half_even_i128(prod, n),
            _ => round_shift_i128(prod, n),
        }
    };
    scaled.clamp(i32::MIN as i128, i32::MAX as i128) as i32
}

fn round_half_even_i128(v: i128, n: u32) -> i128 {
    let q = v >> n;
    let rem = v - (q << n);
    let half = 1i128 << (n - 1);
    if rem > half || (rem == half && q & 1 == 1) {
        q + 1
    } else {
        q
    }
}

fn requantize_double_rounding(acc: i32, multiplier: i32, shift: i32) -> i32 {
    let left_shift = shift.clamp(0, 31) as u32;
    let right_shift = (-shift).clamp(0, 31) as u32;
    let x = ((acc as i64) << left_shift).clamp(i32::MIN as i64, i32::MAX as i64) as i32;
    rounding_divide_by_pot(doubling_high_mul(x, multiplier), right_shift)
}

/// `(a * b * 2) >> 32` rounded, saturating the single overflow case.
fn doubling_high_mul(a: i32, b: i32) -> i32 {
    if a == i32::MIN && b == i32::MIN {
        return i32::MAX;
    }
    let ab = a as i64 * b as i64;
    let nudge: i64 = if ab >= 0 { 1 << 30 } else { 1 - (1 << 30) };
    ((ab + nudge) / (1i64 << 31)) as i32
}

fn rounding_divide_by_pot(x: i32, exponent: u32) -> i32 {
    if exponent == 0 {
        return x;
    }
    let mask = (1i64 << exponent) - 1;
    let remainder = x as i64 & mask;
    let threshold = (mask >> 1) + i64::from(x < 0);
    ((x as i64 >> exponent) + i64::from(remainder > threshold)) as i32
}

/// Derive `(multiplier, shift)` for a positive real scale so that
/// `requantize(acc, multiplier, shift) ≈ acc * scale`. The multiplier lands
/// in `[2^30, 2^31)`. Zero, negative and non-finite scales map to `(0, 0)`.
pub fn quantize_multiplier(real_scale: f64) -> (i32, i32) {
    if !real_scale.is_finite() || real_scale <= 0.0 {
        return (0, 0);
    }

    let (mantissa, mut exponent) = frexp(real_scale);
    let mut q = (mantissa * (1i64 << 31) as f64).round() as i64;
    if q == 1i64 << 31 {
        q /= 2;
        exponent += 1;
    }
    if exponent < -31 {
        return (0, 0);
    }
    if exponent > 30 {
        return (i32::MAX, 30);
    }
    (q as i32, exponent)
}

/// `value = mantissa * 2^exponent` with `mantissa` in `[0.5, 1)`.
fn frexp(value: f64) -> (f64, i32) {
    let mut exponent = value.log2().floor() as i32 + 1;
    let mut mantissa = value / 2f64.powi(exponent);
    // log2 can be off by one ulp near powers of two
    while mantissa >= 1.0 {
        mantissa /= 2.0;
        exponent += 1;
    }
    while mantissa < 0.5 {
        mantissa *= 2.0;
        exponent -= 1;
    }
    (mantissa, exponent)
}
