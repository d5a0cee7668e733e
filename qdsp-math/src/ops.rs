use crate::fixed_point::{Fixed, FixedPointBuffer, FixedPointError, Raw};

/// Clamp `x` to the two's-complement range of a `bits`-wide integer.
///
/// `bits` is clamped to `1..=64`, so the function is total.
#[inline]
pub fn saturate(x: i64, bits: u32) -> i64 {
    let bits = bits.clamp(1, 64);
    if bits == 64 {
        return x;
    }
    let max = (1i64 << (bits - 1)) - 1;
    let min = -(1i64 << (bits - 1));
    x.clamp(min, max)
}

/// Signed saturate to `bits`, the kernels' `ssat` primitive.
#[inline(always)]
pub fn ssat(x: i32, bits: u32) -> i32 {
    saturate(x as i64, bits) as i32
}

#[inline(always)]
pub fn saturate_i8(x: i64) -> i8 {
    i8::from_i64_sat(x)
}

#[inline(always)]
pub fn saturate_i16(x: i64) -> i16 {
    i16::from_i64_sat(x)
}

#[inline(always)]
pub fn saturate_i32(x: i64) -> i32 {
    i32::from_i64_sat(x)
}

#[inline(always)]
pub fn qadd16(a: i16, b: i16) -> i16 {
    a.saturating_add(b)
}

#[inline(always)]
pub fn qsub16(a: i16, b: i16) -> i16 {
    a.saturating_sub(b)
}

#[inline(always)]
pub fn qadd32(a: i32, b: i32) -> i32 {
    a.saturating_add(b)
}

#[inline(always)]
fn clamp_i128<R: Raw>(v: i128) -> R {
    R::from_i64_sat(v.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
}

impl<R: Raw, const F: u32> Fixed<R, F> {
    pub fn saturating_add(self, other: Self) -> Self {
        Self::from_raw(R::from_i64_sat(self.raw.to_i64() + other.raw.to_i64()))
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self::from_raw(R::from_i64_sat(self.raw.to_i64() - other.raw.to_i64()))
    }

    /// Q-format product, rounded half-up at bit `F`.
    pub fn saturating_mul(self, other: Self) -> Self {
        let prod = self.raw.to_i64() as i128 * other.raw.to_i64() as i128;
        Self::from_raw(clamp_i128(round_shift_i128(prod, F)))
    }

    /// `-MIN` saturates to `MAX`.
    pub fn saturating_neg(self) -> Self {
        Self::from_raw(R::from_i64_sat(-self.raw.to_i64()))
    }

    pub fn saturating_abs(self) -> Self {
        Self::from_raw(R::from_i64_sat(self.raw.to_i64().abs()))
    }

    pub fn shl_sat(self, n: u32) -> Self {
        let shifted = (self.raw.to_i64() as i128) << n.min(64);
        Self::from_raw(clamp_i128(shifted))
    }

    /// Arithmetic right shift with round-half-up.
    pub fn shr_round(self, n: u32) -> Self {
        Self::from_raw(clamp_i128(round_shift_i128(self.raw.to_i64() as i128, n)))
    }
}

#[inline(always)]
pub(crate) fn round_shift_i128(v: i128, n: u32) -> i128 {
    match n {
        0 => v,
        n if n >= 127 => 0,
        n => (v + (1i128 << (n - 1))) >> n,
    }
}

impl<R: Raw, const F: u32> FixedPointBuffer<R, F> {
    /// Element-wise saturating addition
    pub fn add(&self, other: &Self) -> Result<Self, FixedPointError> {
        if self.len() != other.len() {
            return Err(FixedPointError::ShapeMismatch(self.len(), other.len()));
        }

        let data = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(&a, &b)| R::from_i64_sat(a.to_i64() + b.to_i64()))
            .collect();

        Ok(Self { data })
    }

    /// Element-wise saturating subtraction
    pub fn sub(&self, other: &Self) -> Result<Self, FixedPointError> {
        if self.len() != other.len() {
            return Err(FixedPointError::ShapeMismatch(self.len(), other.len()));
        }

        let data = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(&a, &b)| R::from_i64_sat(a.to_i64() - b.to_i64()))
            .collect();

        Ok(Self { data })
    }

    /// Scalar multiplication (saturating). The scalar is quantized to Q32.32
    /// so factors outside the storage format (gains > 1) are representable.
    pub fn mul_scalar(&self, scalar: f32) -> Self {
        const SCALAR_BITS: u32 = 32;
        let scalar_fixed = (scalar as f64 * (1u64 << SCALAR_BITS) as f64).round() as i64;

        let data = self
            .data
            .iter()
            .map(|&val| {
                let prod = val.to_i64() as i128 * scalar_fixed as i128;
                clamp_i128(round_shift_i128(prod, SCALAR_BITS))
            })
            .collect();

        Self { data }
    }
}
