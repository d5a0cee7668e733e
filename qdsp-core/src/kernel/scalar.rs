use super::{BlockKernel, KernelTier};
use crate::params::ActivationBounds;

/// Reference implementation: one element per step, no reordering.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScalarKernel;

impl BlockKernel for ScalarKernel {
    fn tier(&self) -> KernelTier {
        KernelTier::Scalar
    }
}

pub(super) fn dot_f32(x: &[f32], c: &[f32]) -> f64 {
    debug_assert_eq!(x.len(), c.len());
    x.iter()
        .zip(c)
        .fold(0.0f64, |acc, (&a, &b)| acc + a as f64 * b as f64)
}

pub(super) fn dot_f64(x: &[f64], c: &[f64]) -> f64 {
    debug_assert_eq!(x.len(), c.len());
    x.iter().zip(c).fold(0.0f64, |acc, (&a, &b)| acc + a * b)
}

pub(super) fn dot_q15(x: &[i16], c: &[i16]) -> i64 {
    debug_assert_eq!(x.len(), c.len());
    x.iter()
        .zip(c)
        .fold(0i64, |acc, (&a, &b)| acc.wrapping_add(a as i64 * b as i64))
}

pub(super) fn dot_q31(x: &[i32], c: &[i32]) -> i64 {
    debug_assert_eq!(x.len(), c.len());
    x.iter()
        .zip(c)
        .fold(0i64, |acc, (&a, &b)| acc.wrapping_add(a as i64 * b as i64))
}

pub(super) fn relu<T: Copy + Default + PartialOrd>(data: &mut [T]) {
    let zero = T::default();
    for v in data.iter_mut() {
        if *v < zero {
            *v = zero;
        }
    }
}

pub(super) fn max_merge<T: Copy + Ord>(dst: &mut [T], src: &[T]) {
    debug_assert_eq!(dst.len(), src.len());
    for (d, &s) in dst.iter_mut().zip(src) {
        *d = (*d).max(s);
    }
}

pub(super) fn clamp_s8(data: &mut [i8], bounds: ActivationBounds) {
    for v in data.iter_mut() {
        *v = bounds.clamp(*v as i32) as i8;
    }
}

pub(super) fn clamp_s16(data: &mut [i16], bounds: ActivationBounds) {
    for v in data.iter_mut() {
        *v = bounds.clamp(*v as i32) as i16;
    }
}

pub(super) fn cmplx_mag_f32(src: &[f32], dst: &mut [f32]) {
    debug_assert!(src.len() >= 2 * dst.len());
    for (out, pair) in dst.iter_mut().zip(src.chunks_exact(2)) {
        let (re, im) = (pair[0], pair[1]);
        *out = (re * re + im * im).sqrt();
    }
}
