use qdsp_core::ActivationBounds;
use serde::{Deserialize, Serialize};

/// Tensor shape, NHWC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dims {
    pub n: usize,
    pub h: usize,
    pub w: usize,
    pub c: usize,
}

impl Dims {
    pub const fn new(n: usize, h: usize, w: usize, c: usize) -> Self {
        Self { n, h, w, c }
    }

    pub const fn len(&self) -> usize {
        self.n * self.h * self.w * self.c
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Elements in one batch item.
    pub const fn batch_len(&self) -> usize {
        self.h * self.w * self.c
    }
}

/// Height/width pair used for strides and padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Hw {
    pub h: usize,
    pub w: usize,
}

impl Hw {
    pub const fn new(h: usize, w: usize) -> Self {
        Self { h, w }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolParams {
    pub stride: Hw,
    pub padding: Hw,
    pub activation: ActivationBounds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvParams {
    /// Added to every input value (negated input zero point).
    pub input_offset: i32,
    /// Added after requantization (output zero point).
    pub output_offset: i32,
    pub stride: Hw,
    pub padding: Hw,
    pub activation: ActivationBounds,
}

/// First kernel tap inside the input and one past the last, for a window
/// starting at `base` (which may be negative through padding).
pub(crate) fn clipped_range(base: isize, kernel: usize, input: usize) -> (usize, usize) {
    let start = (-base).max(0) as usize;
    let end = (input as isize - base).clamp(0, kernel as isize) as usize;
    (start.min(end), end)
}
