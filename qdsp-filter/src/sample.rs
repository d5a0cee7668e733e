use qdsp_core::BlockKernel;
use qdsp_math::ops::{saturate_i16, saturate_i32};

/// Sample type a FIR can stream.
///
/// `Acc` is the accumulator the dot product runs in; [`Sample::narrow`]
/// converts it back once per output.
pub trait Sample: Copy + Default + Send + Sync + 'static {
    type Acc: Copy;

    fn dot(kernel: &dyn BlockKernel, x: &[Self], c: &[Self]) -> Self::Acc;

    fn narrow(acc: Self::Acc) -> Self;
}

impl Sample for f32 {
    type Acc = f64;

    #[inline]
    fn dot(kernel: &dyn BlockKernel, x: &[f32], c: &[f32]) -> f64 {
        kernel.dot_f32(x, c)
    }

    #[inline]
    fn narrow(acc: f64) -> f32 {
        acc as f32
    }
}

impl Sample for f64 {
    type Acc = f64;

    #[inline]
    fn dot(kernel: &dyn BlockKernel, x: &[f64], c: &[f64]) -> f64 {
        kernel.dot_f64(x, c)
    }

    #[inline]
    fn narrow(acc: f64) -> f64 {
        acc
    }
}

/// Q15: products are Q30, narrowed by `>> 15` and saturated.
impl Sample for i16 {
    type Acc = i64;

    #[inline]
    fn dot(kernel: &dyn BlockKernel, x: &[i16], c: &[i16]) -> i64 {
        kernel.dot_q15(x, c)
    }

    #[inline]
    fn narrow(acc: i64) -> i16 {
        saturate_i16(acc >> 15)
    }
}

/// Q31: products are Q62, narrowed by `>> 31` and saturated.
impl Sample for i32 {
    type Acc = i64;

    #[inline]
    fn dot(kernel: &dyn BlockKernel, x: &[i32], c: &[i32]) -> i64 {
        kernel.dot_q31(x, c)
    }

    #[inline]
    fn narrow(acc: i64) -> i32 {
        saturate_i32(acc >> 31)
    }
}
