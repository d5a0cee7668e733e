//! # qdsp-math
//!
//! Deterministic Q-format fixed-point arithmetic for the qdsp kernels.
//!
//! This crate provides [`Fixed`], a scaled integer `raw / 2^F` stored in an
//! `i8`, `i16` or `i32`, and [`FixedPointBuffer`], a vector of such values.
//! All arithmetic saturates to the storage range instead of wrapping.
//!
//! Also here, because every kernel family needs them:
//! - [`requantize`] / [`Requantizer`]: accumulator → output scale via a Q31
//!   multiplier and a signed shift
//! - [`divide_q15`]: normalized Q15 division (mantissa + shift)
//! - [`inv_sqrt`]: bit-level seed and Newton step for `1/sqrt(x)`
//! - [`int4`]: two-per-byte signed 4-bit weight packing
//!
//! No allocation happens outside the `FixedPointBuffer` / `pack_s4` helpers.

pub mod divide;
pub mod fixed_point;
pub mod int4;
pub mod inv_sqrt;
pub mod ops;
pub mod requant;

pub use divide::{divide_q15, Q15Quotient};
pub use fixed_point::{Fixed, FixedPointBuffer, FixedPointError, Raw, Q15, Q2_13, Q31, Q7};
pub use ops::{saturate, ssat};
pub use requant::{quantize_multiplier, requantize, requantize_to, Requantizer, RoundingMode};
