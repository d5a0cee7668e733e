//! # qdsp-filter
//!
//! Streaming filters over caller-owned state.
//!
//! Key types:
//! - [`FirDecimator`]: FIR filter + keep every M-th output (f32, f64, Q15, Q31)
//! - [`FirInterpolator`]: polyphase FIR upsampler by L (Q31)
//! - [`BiquadCascadeDf2T`]: cascade of second-order sections, transposed
//!   direct form II (f64)
//!
//! Each filter is created with `init` over a state slice the caller sized
//! with the filter's `state_len`, then fed one block at a time through
//! `process`. History carries across calls, so any chunking of a stream
//! yields the same output as one large block.

pub mod biquad;
pub mod fir_decimate;
pub mod fir_interpolate;
pub mod sample;

pub use biquad::BiquadCascadeDf2T;
pub use fir_decimate::FirDecimator;
pub use fir_interpolate::FirInterpolator;
pub use sample::Sample;
