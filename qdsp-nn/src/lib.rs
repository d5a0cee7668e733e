//! # qdsp-nn
//!
//! Quantized tensor kernels over NHWC (channel-last) `i8` / `i16` data.
//!
//! Key functions:
//! - [`depthwise_conv_nt_t_s4`]: inner tile of a depthwise convolution with
//!   packed int4 weights (vector tiers only)
//! - [`depthwise_conv_s4`]: full depthwise convolution built on that tile
//! - [`max_pool_s8`] / [`max_pool_s16`]: max pooling with clipped windows
//! - [`relu_s8`] / [`relu_s16`] / [`relu6_s8`]: in-place activations
//!
//! All kernels return `Ok(())` on success and [`qdsp_core::KernelError`]
//! for bad arguments or an unavailable implementation.

pub mod activation;
pub mod conv;
pub mod params;
pub mod pool;

pub use activation::{relu6_s8, relu_s16, relu_s8};
pub use conv::{depthwise_conv_nt_t_s4, depthwise_conv_s4, depthwise_conv_s4_buffer_size};
pub use params::{ConvParams, Dims, Hw, PoolParams};
pub use pool::{max_pool_s16, max_pool_s8, PoolSample};
