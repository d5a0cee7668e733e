//! # qdsp-fastmath
//!
//! Approximations of transcendental functions that trade a bounded error
//! for speed:
//! - [`cmplx_mag_f32`] / [`fast_magnitude`]: `sqrt(re² + im²)` via a
//!   bit-level inverse square root seed and Newton steps
//! - [`atan2_q15`]: four-quadrant arctangent of Q15 coordinates, result in
//!   Q2.13 radians

pub mod atan2;
pub mod magnitude;

pub use atan2::{atan2_q15, atan2_q15_with, AtanCoefficients, HALF_PI_Q13, PI_Q13};
pub use magnitude::{cmplx_mag_f32, cmplx_mag_f32_with, fast_magnitude, inv_sqrt_f32};
