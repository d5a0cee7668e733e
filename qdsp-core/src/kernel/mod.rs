//! Inner-loop strategies.
//!
//! Every kernel family funnels its hot loops through [`BlockKernel`]. The
//! scalar implementation is the reference; the others must agree with it
//! exactly for integer operations and within tolerance for floats.
//!
//! ```
//! use qdsp_core::{kernel, CpuFeatures, KernelConfig, KernelTier, TierRequest};
//!
//! let k = kernel::select(&KernelConfig::new(TierRequest::Scalar), CpuFeatures::detect());
//! assert_eq!(k.tier(), KernelTier::Scalar);
//!
//! let mut x = [-3i8, 4, -1, 0];
//! k.relu_s8(&mut x);
//! assert_eq!(x, [0, 4, 0, 0]);
//! ```

mod lanes;
mod scalar;
mod swar;

use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::capability::CpuFeatures;
use crate::config::KernelConfig;
use crate::error::KernelError;
use crate::params::{ActivationBounds, DepthwiseTile};

pub use lanes::LaneKernel;
pub use scalar::ScalarKernel;
pub use swar::SwarKernel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KernelTier {
    Scalar,
    Swar,
    Lanes,
}

impl fmt::Display for KernelTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KernelTier::Scalar => "scalar",
            KernelTier::Swar => "swar",
            KernelTier::Lanes => "lanes",
        };
        f.write_str(name)
    }
}

/// Block-level operations shared by filters, fast math and tensor kernels.
///
/// Default methods are the scalar reference; implementations override the
/// ones they accelerate. Slices passed in pairs must have equal length
/// (checked with `debug_assert!`).
pub trait BlockKernel: Send + Sync + fmt::Debug {
    fn tier(&self) -> KernelTier;

    /// Dot product accumulated in f64.
    fn dot_f32(&self, x: &[f32], c: &[f32]) -> f64 {
        scalar::dot_f32(x, c)
    }

    fn dot_f64(&self, x: &[f64], c: &[f64]) -> f64 {
        scalar::dot_f64(x, c)
    }

    /// Q15 × Q15 products summed in a 64-bit accumulator (Q30).
    fn dot_q15(&self, x: &[i16], c: &[i16]) -> i64 {
        scalar::dot_q15(x, c)
    }

    /// Q31 × Q31 products summed in a 64-bit accumulator (Q62). The sum
    /// wraps on overflow.
    fn dot_q31(&self, x: &[i32], c: &[i32]) -> i64 {
        scalar::dot_q31(x, c)
    }

    fn relu_s8(&self, data: &mut [i8]) {
        scalar::relu(data)
    }

    fn relu_s16(&self, data: &mut [i16]) {
        scalar::relu(data)
    }

    /// `dst[i] = max(dst[i], src[i])`
    fn max_merge_s8(&self, dst: &mut [i8], src: &[i8]) {
        scalar::max_merge(dst, src)
    }

    fn max_merge_s16(&self, dst: &mut [i16], src: &[i16]) {
        scalar::max_merge(dst, src)
    }

    fn clamp_s8(&self, data: &mut [i8], bounds: ActivationBounds) {
        scalar::clamp_s8(data, bounds)
    }

    fn clamp_s16(&self, data: &mut [i16], bounds: ActivationBounds) {
        scalar::clamp_s16(data, bounds)
    }

    /// Magnitudes of interleaved `(re, im)` pairs.
    ///
    /// The scalar tier computes `sqrt` exactly; the lane tier uses the
    /// inverse square root seed plus Newton steps and is approximate.
    fn cmplx_mag_f32(&self, src: &[f32], dst: &mut [f32]) {
        scalar::cmplx_mag_f32(src, dst)
    }

    /// Depthwise int4 tile. Only tiers with a vector path provide it.
    fn depthwise_s4_tile(&self, _tile: &DepthwiseTile<'_>, _out: &mut [i8]) -> Result<(), KernelError> {
        Err(KernelError::NoImplementation("depthwise_s4_tile"))
    }
}

static SCALAR: ScalarKernel = ScalarKernel;
static SWAR: SwarKernel = SwarKernel;
static LANES: LaneKernel = LaneKernel;

/// The implementation of a given tier, regardless of host support.
pub fn for_tier(tier: KernelTier) -> &'static dyn BlockKernel {
    match tier {
        KernelTier::Scalar => &SCALAR,
        KernelTier::Swar => &SWAR,
        KernelTier::Lanes => &LANES,
    }
}

/// Resolve a request against the host's features. An unsupported explicit
/// request falls back to the best supported tier.
pub fn select(config: &KernelConfig, features: &CpuFeatures) -> &'static dyn BlockKernel {
    let best = features.best_tier();
    let tier = match config.tier.tier() {
        None => best,
        Some(requested) if features.supports(requested) => requested,
        Some(requested) => {
            warn!(%requested, fallback = %best, "requested kernel tier unavailable");
            best
        }
    };
    for_tier(tier)
}

static ACTIVE: OnceLock<&'static dyn BlockKernel> = OnceLock::new();

/// Process-wide kernel, chosen from `QDSP_KERNEL` and the detected features
/// on first use.
pub fn active() -> &'static dyn BlockKernel {
    *ACTIVE.get_or_init(|| {
        let kernel = select(&KernelConfig::from_env(), CpuFeatures::detect());
        info!(tier = %kernel.tier(), "kernel tier selected");
        kernel
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TierRequest;

    #[test]
    fn test_select_respects_request() {
        let all = CpuFeatures {
            swar: true,
            lanes128: true,
        };
        for (req, tier) in [
            (TierRequest::Scalar, KernelTier::Scalar),
            (TierRequest::Swar, KernelTier::Swar),
            (TierRequest::Lanes, KernelTier::Lanes),
            (TierRequest::Auto, KernelTier::Lanes),
        ] {
            assert_eq!(select(&KernelConfig::new(req), &all).tier(), tier);
        }
    }

    #[test]
    fn test_magnitude_exact_on_scalar_tier() {
        let src = [3.0f32, 4.0, 5.0, 12.0];
        let mut exact = [0.0f32; 2];
        for_tier(KernelTier::Scalar).cmplx_mag_f32(&src, &mut exact);
        assert_eq!(exact, [5.0, 13.0]);

        let mut approx = [0.0f32; 2];
        for_tier(KernelTier::Lanes).cmplx_mag_f32(&src, &mut approx);
        for (a, e) in approx.iter().zip(exact) {
            assert!((a - e).abs() <= e * 1e-3, "{} vs {}", a, e);
        }
    }

    #[test]
    fn test_select_falls_back() {
        let scalar = CpuFeatures::scalar_only();
        let k = select(&KernelConfig::new(TierRequest::Lanes), &scalar);
        assert_eq!(k.tier(), KernelTier::Scalar);
    }

    #[test]
    fn test_active_is_stable() {
        let a = active().tier();
        let b = active().tier();
        assert_eq!(a, b);
        assert!(CpuFeatures::detect().supports(a));
    }

    #[test]
    fn test_scalar_depthwise_unavailable() {
        let bounds = ActivationBounds::s8();
        let quant = crate::params::QuantParams::new(&[1 << 30], &[1]).unwrap();
        let tile = DepthwiseTile {
            lhs: &[1],
            columns: 1,
            row_x_col: 1,
            ch_stride: 1,
            rhs: &[0x01],
            total_ch: 1,
            active_ch: 1,
            bias: None,
            quant,
            input_offset: 0,
            output_offset: 0,
            bounds,
        };
        let mut out = [0i8; 1];
        for tier in [KernelTier::Scalar, KernelTier::Swar] {
            assert_eq!(
                for_tier(tier).depthwise_s4_tile(&tile, &mut out),
                Err(KernelError::NoImplementation("depthwise_s4_tile"))
            );
        }
        assert!(for_tier(KernelTier::Lanes).depthwise_s4_tile(&tile, &mut out).is_ok());
        assert_eq!(out[0], 1);
    }
}
