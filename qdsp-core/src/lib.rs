//! # qdsp-core
//!
//! Types shared by every qdsp kernel family.
//!
//! - [`KernelError`]: the status taxonomy (argument, buffer size, missing
//!   implementation, NaN/Inf) returned by `init` functions and tensor kernels
//! - [`StateBuffer`] / [`Coefficients`]: caller-owned filter history and
//!   time-reversed tap tables
//! - [`ActivationBounds`], [`QuantParams`], [`DepthwiseTile`]: tensor kernel
//!   arguments
//! - [`BlockKernel`]: inner-loop strategy with [`ScalarKernel`] (reference),
//!   [`SwarKernel`] (packed lanes in a `u32`) and [`LaneKernel`] (fixed-width
//!   chunks), selected once per process by [`kernel::active`]
//! - [`CpuFeatures`] / [`KernelConfig`]: what the host supports and what the
//!   caller asked for (`QDSP_KERNEL`)

pub mod capability;
pub mod coefficients;
pub mod config;
pub mod error;
pub mod kernel;
pub mod params;
pub mod state;

pub use capability::CpuFeatures;
pub use coefficients::Coefficients;
pub use config::{KernelConfig, TierRequest};
pub use error::KernelError;
pub use kernel::{BlockKernel, KernelTier, LaneKernel, ScalarKernel, SwarKernel};
pub use params::{ActivationBounds, DepthwiseTile, QuantParams};
pub use state::StateBuffer;
