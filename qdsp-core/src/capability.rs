//! Host capability detection.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::kernel::KernelTier;

/// What the running host can execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuFeatures {
    /// Packed lanes inside a 32-bit word. Needs nothing beyond integer ALU.
    pub swar: bool,
    /// 128-bit vector registers the lane kernel's chunks lower onto.
    pub lanes128: bool,
}

static DETECTED: OnceLock<CpuFeatures> = OnceLock::new();

impl CpuFeatures {
    /// Detect features of the current target, once per process.
    pub fn detect() -> &'static CpuFeatures {
        DETECTED.get_or_init(|| CpuFeatures {
            swar: true,
            lanes128: has_128bit_lanes(),
        })
    }

    /// Everything off except the reference path.
    pub const fn scalar_only() -> Self {
        Self {
            swar: false,
            lanes128: false,
        }
    }

    pub fn supports(&self, tier: KernelTier) -> bool {
        match tier {
            KernelTier::Scalar => true,
            KernelTier::Swar => self.swar,
            KernelTier::Lanes => self.lanes128,
        }
    }

    pub fn best_tier(&self) -> KernelTier {
        if self.lanes128 {
            KernelTier::Lanes
        } else if self.swar {
            KernelTier::Swar
        } else {
            KernelTier::Scalar
        }
    }
}

fn has_128bit_lanes() -> bool {
    #[cfg(target_arch = "x86_64")]
    {
        // SSE2 is part of the x86_64 baseline
        is_x86_feature_detected!("sse2")
    }

    #[cfg(target_arch = "aarch64")]
    {
        true // NEON is mandatory on AArch64
    }

    #[cfg(all(target_arch = "wasm32", target_feature = "simd128"))]
    {
        true
    }

    #[cfg(not(any(
        target_arch = "x86_64",
        target_arch = "aarch64",
        all(target_arch = "wasm32", target_feature = "simd128")
    )))]
    {
        false
    }
}
