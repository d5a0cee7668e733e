//! Bit-level `1/sqrt(x)` approximation for f32.

/// Magic constant of the f32 seed.
pub const INV_SQRT_MAGIC_F32: u32 = 0x5f37_59df;

/// Initial estimate: reinterpret, halve the exponent, subtract from the magic.
#[inline(always)]
pub fn inv_sqrt_seed_f32(x: f32) -> f32 {
    f32::from_bits(INV_SQRT_MAGIC_F32.wrapping_sub(x.to_bits() >> 1))
}

/// One Newton-Raphson refinement: `y * (1.5 - half_x * y * y)`.
#[inline(always)]
pub fn inv_sqrt_newton_f32(y: f32, half_x: f32) -> f32 {
    y * (1.5 - half_x * y * y)
}
