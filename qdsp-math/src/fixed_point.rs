use std::fmt::Debug;
use std::hash::Hash;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FixedPointError {
    #[error("Shape mismatch: {0} vs {1}")]
    ShapeMismatch(usize, usize),
    #[error("Division by zero (numerator {numerator})")]
    DivideByZero { numerator: i32 },
}

/// Storage integer of a Q-format value.
///
/// Implemented for `i8`, `i16` and `i32`. Conversions from the 64-bit
/// accumulator saturate.
pub trait Raw: Copy + Default + Ord + Hash + Debug + Send + Sync + 'static {
    const BITS: u32;
    const MIN: Self;
    const MAX: Self;
    const ZERO: Self;

    fn to_i64(self) -> i64;

    /// Clamp a wider value into this storage width.
    fn from_i64_sat(value: i64) -> Self;
}

macro_rules! impl_raw {
    ($($t:ty),*) => {$(
        impl Raw for $t {
            const BITS: u32 = <$t>::BITS;
            const MIN: Self = <$t>::MIN;
            const MAX: Self = <$t>::MAX;
            const ZERO: Self = 0;

            #[inline(always)]
            fn to_i64(self) -> i64 {
                self as i64
            }

            #[inline(always)]
            fn from_i64_sat(value: i64) -> Self {
                value.clamp(<$t>::MIN as i64, <$t>::MAX as i64) as $t
            }
        }
    )*};
}

impl_raw!(i8, i16, i32);

/// Scaled integer: represents `raw / 2^F`.
///
/// `R` fixes the storage width, `F` the number of fractional bits. The
/// format is a type-level tag only; the raw value is what kernels consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fixed<R: Raw, const F: u32> {
    pub raw: R,
}

/// 8-bit, 7 fractional bits.
pub type Q7 = Fixed<i8, 7>;
/// 16-bit, 15 fractional bits.
pub type Q15 = Fixed<i16, 15>;
/// 32-bit, 31 fractional bits.
pub type Q31 = Fixed<i32, 31>;
/// 16-bit, 2 integer bits and 13 fractional bits (angles in `[-π, π]`).
pub type Q2_13 = Fixed<i16, 13>;

impl<R: Raw, const F: u32> Fixed<R, F> {
    pub const FRACTIONAL_BITS: u32 = F;

    pub const fn from_raw(raw: R) -> Self {
        Self { raw }
    }

    pub fn min_value() -> Self {
        Self { raw: R::MIN }
    }

    pub fn max_value() -> Self {
        Self { raw: R::MAX }
    }

    pub(crate) fn scale() -> f64 {
        2f64.powi(F as i32)
    }

    /// Round-to-nearest conversion, saturating at the format bounds.
    /// NaN maps to zero.
    pub fn from_f64(value: f64) -> Self {
        let scaled = (value * Self::scale()).round();
        // `as` saturates at the i64 bounds and maps NaN to 0
        Self { raw: R::from_i64_sat(scaled as i64) }
    }

    pub fn to_f64(self) -> f64 {
        self.raw.to_i64() as f64 / Self::scale()
    }

    pub fn from_f32(value: f32) -> Self {
        Self::from_f64(value as f64)
    }

    pub fn to_f32(self) -> f32 {
        self.to_f64() as f32
    }
}

/// A vector of values in one Q format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedPointBuffer<R: Raw, const F: u32> {
    /// Raw storage, interpreted as `raw / 2^F`
    pub data: Vec<R>,
}

impl<R: Raw, const F: u32> FixedPointBuffer<R, F> {
    /// Create a new buffer of zeros
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![R::ZERO; size],
        }
    }

    pub fn from_raw(data: Vec<R>) -> Self {
        Self { data }
    }

    /// Convert from f32 with deterministic quantization (round to nearest,
    /// ties away from zero, saturating).
    pub fn from_f32(data: &[f32]) -> Self {
        Self {
            data: data.iter().map(|&v| Fixed::<R, F>::from_f32(v).raw).collect(),
        }
    }

    pub fn to_f32(&self) -> Vec<f32> {
        let scale = Fixed::<R, F>::scale();
        self.data
            .iter()
            .map(|&v| (v.to_i64() as f64 / scale) as f32)
            .collect()
    }

    pub fn as_slice(&self) -> &[R] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [R] {
        &mut self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
