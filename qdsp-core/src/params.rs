use qdsp_math::{requantize, Requantizer};
use serde::{Deserialize, Serialize};

use crate::error::{ensure_len, KernelError};

/// Output clamp range of a tensor kernel, `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationBounds {
    min: i32,
    max: i32,
}

impl ActivationBounds {
    pub fn new(min: i32, max: i32) -> Result<Self, KernelError> {
        if min > max {
            return Err(KernelError::Argument("activation min exceeds max"));
        }
        Ok(Self { min, max })
    }

    /// Full range of an `i8` output.
    pub const fn s8() -> Self {
        Self {
            min: i8::MIN as i32,
            max: i8::MAX as i32,
        }
    }

    /// Full range of an `i16` output.
    pub const fn s16() -> Self {
        Self {
            min: i16::MIN as i32,
            max: i16::MAX as i32,
        }
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    #[inline(always)]
    pub fn clamp(&self, v: i32) -> i32 {
        v.clamp(self.min, self.max)
    }
}

/// Per-channel requantization: `multipliers[c]` (Q31) and `shifts[c]`
/// (positive = left).
#[derive(Debug, Clone, Copy)]
pub struct QuantParams<'a> {
    pub multipliers: &'a [i32],
    pub shifts: &'a [i32],
}

impl<'a> QuantParams<'a> {
    pub fn new(multipliers: &'a [i32], shifts: &'a [i32]) -> Result<Self, KernelError> {
        if multipliers.len() != shifts.len() {
            return Err(KernelError::Argument("multiplier and shift counts differ"));
        }
        Ok(Self {
            multipliers,
            shifts,
        })
    }

    pub fn channels(&self) -> usize {
        self.multipliers.len()
    }

    #[inline(always)]
    pub fn requantize(&self, ch: usize, acc: i32) -> i32 {
        requantize(acc, self.multipliers[ch], self.shifts[ch])
    }

    pub fn requantizer(&self, ch: usize) -> Requantizer {
        Requantizer::new(self.multipliers[ch], self.shifts[ch])
    }
}

/// One call of the depthwise int4 inner kernel: up to four im2col columns
/// against a packed int4 weight matrix.
///
/// Column `k`, kernel row `r`, channel `c` of the input is
/// `lhs[k * row_x_col * ch_stride + r * ch_stride + c]`. Weight `(r, c)` is
/// nibble `r * total_ch + c` of `rhs`. Output `(k, c)` goes to
/// `out[k * total_ch + c]`.
#[derive(Debug, Clone, Copy)]
pub struct DepthwiseTile<'a> {
    pub lhs: &'a [i8],
    pub columns: usize,
    pub row_x_col: usize,
    pub ch_stride: usize,
    pub rhs: &'a [u8],
    pub total_ch: usize,
    pub active_ch: usize,
    pub bias: Option<&'a [i32]>,
    pub quant: QuantParams<'a>,
    pub input_offset: i32,
    pub output_offset: i32,
    pub bounds: ActivationBounds,
}

impl DepthwiseTile<'_> {
    /// Check every index the kernel will touch.
    pub fn validate(&self, out_len: usize) -> Result<(), KernelError> {
        if self.columns == 0 || self.columns > 4 {
            return Err(KernelError::Argument("columns must be in 1..=4"));
        }
        if self.active_ch > self.total_ch || self.active_ch > self.ch_stride {
            return Err(KernelError::Argument("active channels exceed channel count"));
        }
        ensure_len(self.active_ch, self.quant.channels())?;
        if let Some(bias) = self.bias {
            ensure_len(self.active_ch, bias.len())?;
        }
        ensure_len(self.columns * self.row_x_col * self.ch_stride, self.lhs.len())?;
        ensure_len(qdsp_math::int4::packed_len(self.row_x_col * self.total_ch), self.rhs.len())?;
        ensure_len((self.columns - 1) * self.total_ch + self.active_ch, out_len)?;
        Ok(())
    }

    #[inline(always)]
    pub fn lhs_index(&self, column: usize, row: usize, ch: usize) -> usize {
        column * self.row_x_col * self.ch_stride + row * self.ch_stride + ch
    }
}
