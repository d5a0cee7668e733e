//! # mini-qdsp
//!
//! Fixed-point signal processing and quantized neural-network kernels for
//! memory-constrained targets.
//!
//! Crates:
//! - [`math`]: fixed-point types, saturation, requantization, int4 packing
//! - [`base`]: errors, state buffers, coefficients, kernel tier selection
//! - [`filter`]: streaming FIR decimator/interpolator, biquad cascade
//! - [`fastmath`]: Q15 atan2, complex magnitude, inverse square root
//! - [`nn`]: int4 depthwise convolution, max pooling, ReLU

pub use qdsp_core as base;
pub use qdsp_fastmath as fastmath;
pub use qdsp_filter as filter;
pub use qdsp_math as math;
pub use qdsp_nn as nn;

pub use qdsp_core::{KernelError, KernelTier};
