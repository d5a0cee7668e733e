//! Kernel selection configuration.
//!
//! Read from the environment with defaults:
//! - `QDSP_KERNEL`: `auto` (default), `scalar`, `swar` or `lanes`

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::KernelError;
use crate::kernel::KernelTier;

pub const KERNEL_ENV: &str = "QDSP_KERNEL";

/// Which kernel tier the caller asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TierRequest {
    /// Best tier the host supports.
    #[default]
    Auto,
    Scalar,
    Swar,
    Lanes,
}

impl TierRequest {
    pub fn tier(self) -> Option<KernelTier> {
        match self {
            TierRequest::Auto => None,
            TierRequest::Scalar => Some(KernelTier::Scalar),
            TierRequest::Swar => Some(KernelTier::Swar),
            TierRequest::Lanes => Some(KernelTier::Lanes),
        }
    }
}

impl FromStr for TierRequest {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" | "" => Ok(TierRequest::Auto),
            "scalar" | "reference" => Ok(TierRequest::Scalar),
            "swar" => Ok(TierRequest::Swar),
            "lanes" | "simd" => Ok(TierRequest::Lanes),
            _ => Err(KernelError::Argument("unknown kernel tier")),
        }
    }
}

impl fmt::Display for TierRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TierRequest::Auto => "auto",
            TierRequest::Scalar => "scalar",
            TierRequest::Swar => "swar",
            TierRequest::Lanes => "lanes",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KernelConfig {
    #[serde(default)]
    pub tier: TierRequest,
}

impl KernelConfig {
    pub fn new(tier: TierRequest) -> Self {
        Self { tier }
    }

    /// Load from `QDSP_KERNEL`. Unset means `auto`; an unparsable value is
    /// logged and treated as `auto`.
    pub fn from_env() -> Self {
        let tier = match std::env::var(KERNEL_ENV) {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                warn!(value = %raw, "ignoring unrecognised {}", KERNEL_ENV);
                TierRequest::Auto
            }),
            Err(_) => TierRequest::Auto,
        };
        Self { tier }
    }
}
