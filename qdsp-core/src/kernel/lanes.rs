use qdsp_math::int4::unpack_row_quad;
use qdsp_math::inv_sqrt::{inv_sqrt_newton_f32, inv_sqrt_seed_f32};

use super::{scalar, BlockKernel, KernelTier};
use crate::error::KernelError;
use crate::params::{ActivationBounds, DepthwiseTile};

/// Fixed-width chunk implementation. Each loop body works on a whole
/// array of lanes so it lowers onto 128-bit vector registers; remainders
/// fall back to the reference loop.
#[derive(Debug, Default, Clone, Copy)]
pub struct LaneKernel;

const DOT_LANES: usize = 8;
const BYTE_LANES: usize = 16;
const MAG_BLOCK: usize = 8;

macro_rules! lane_dot {
    ($x:expr, $c:expr, $acc:ty, $zero:expr, $mul:expr, $add:expr) => {{
        debug_assert_eq!($x.len(), $c.len());
        let mut lanes: [$acc; DOT_LANES] = [$zero; DOT_LANES];
        let xs = $x.chunks_exact(DOT_LANES);
        let cs = $c.chunks_exact(DOT_LANES);
        let (x_tail, c_tail) = (xs.remainder(), cs.remainder());
        for (xb, cb) in xs.zip(cs) {
            for i in 0..DOT_LANES {
                lanes[i] = ($add)(lanes[i], ($mul)(xb[i], cb[i]));
            }
        }
        let mut total = lanes.iter().fold($zero, |a: $acc, &b| ($add)(a, b));
        for (&a, &b) in x_tail.iter().zip(c_tail) {
            total = ($add)(total, ($mul)(a, b));
        }
        total
    }};
}

impl BlockKernel for LaneKernel {
    fn tier(&self) -> KernelTier {
        KernelTier::Lanes
    }

    fn dot_f32(&self, x: &[f32], c: &[f32]) -> f64 {
        lane_dot!(x, c, f64, 0.0f64, |a: f32, b: f32| a as f64 * b as f64, |a: f64, b: f64| a + b)
    }

    fn dot_f64(&self, x: &[f64], c: &[f64]) -> f64 {
        lane_dot!(x, c, f64, 0.0f64, |a: f64, b: f64| a * b, |a: f64, b: f64| a + b)
    }

    fn dot_q15(&self, x: &[i16], c: &[i16]) -> i64 {
        lane_dot!(x, c, i64, 0i64, |a: i16, b: i16| a as i64 * b as i64, i64::wrapping_add)
    }

    fn dot_q31(&self, x: &[i32], c: &[i32]) -> i64 {
        lane_dot!(x, c, i64, 0i64, |a: i32, b: i32| a as i64 * b as i64, i64::wrapping_add)
    }

    fn relu_s8(&self, data: &mut [i8]) {
        let mut chunks = data.chunks_exact_mut(BYTE_LANES);
        for chunk in &mut chunks {
            for v in chunk.iter_mut() {
                *v = (*v).max(0);
            }
        }
        scalar::relu(chunks.into_remainder());
    }

    fn relu_s16(&self, data: &mut [i16]) {
        let mut chunks = data.chunks_exact_mut(BYTE_LANES / 2);
        for chunk in &mut chunks {
            for v in chunk.iter_mut() {
                *v = (*v).max(0);
            }
        }
        scalar::relu(chunks.into_remainder());
    }

    fn max_merge_s8(&self, dst: &mut [i8], src: &[i8]) {
        debug_assert_eq!(dst.len(), src.len());
        let mut d = dst.chunks_exact_mut(BYTE_LANES);
        let s = src.chunks_exact(BYTE_LANES);
        let s_tail = s.remainder();
        for (db, sb) in (&mut d).zip(s) {
            for i in 0..BYTE_LANES {
                db[i] = db[i].max(sb[i]);
            }
        }
        scalar::max_merge(d.into_remainder(), s_tail);
    }

    fn max_merge_s16(&self, dst: &mut [i16], src: &[i16]) {
        debug_assert_eq!(dst.len(), src.len());
        let mut d = dst.chunks_exact_mut(BYTE_LANES / 2);
        let s = src.chunks_exact(BYTE_LANES / 2);
        let s_tail = s.remainder();
        for (db, sb) in (&mut d).zip(s) {
            for i in 0..BYTE_LANES / 2 {
                db[i] = db[i].max(sb[i]);
            }
        }
        scalar::max_merge(d.into_remainder(), s_tail);
    }

    fn clamp_s8(&self, data: &mut [i8], bounds: ActivationBounds) {
        let lo = bounds.min().clamp(i8::MIN as i32, i8::MAX as i32) as i8;
        let hi = bounds.max().clamp(i8::MIN as i32, i8::MAX as i32) as i8;
        for v in data.iter_mut() {
            *v = (*v).clamp(lo, hi);
        }
    }

    fn clamp_s16(&self, data: &mut [i16], bounds: ActivationBounds) {
        let lo = bounds.min().clamp(i16::MIN as i32, i16::MAX as i32) as i16;
        let hi = bounds.max().clamp(i16::MIN as i32, i16::MAX as i32) as i16;
        for v in data.iter_mut() {
            *v = (*v).clamp(lo, hi);
        }
    }

    /// Blocks of 8 samples take three Newton steps, the tail two.
    fn cmplx_mag_f32(&self, src: &[f32], dst: &mut [f32]) {
        debug_assert!(src.len() >= 2 * dst.len());
        let blocked = dst.len() / MAG_BLOCK * MAG_BLOCK;
        let mut out = dst.chunks_exact_mut(MAG_BLOCK);
        let mut pairs = src.chunks_exact(2 * MAG_BLOCK);
        for (ob, sb) in (&mut out).zip(&mut pairs) {
            let mut sum = [0.0f32; MAG_BLOCK];
            for i in 0..MAG_BLOCK {
                sum[i] = sb[2 * i] * sb[2 * i] + sb[2 * i + 1] * sb[2 * i + 1];
            }
            for i in 0..MAG_BLOCK {
                ob[i] = magnitude_from_sum(sum[i], 3);
            }
        }

        let tail_src = &src[blocked * 2..];
        for (o, pair) in out.into_remainder().iter_mut().zip(tail_src.chunks_exact(2)) {
            *o = magnitude_from_sum(pair[0] * pair[0] + pair[1] * pair[1], 2);
        }
    }

    fn depthwise_s4_tile(&self, tile: &DepthwiseTile<'_>, out: &mut [i8]) -> Result<(), KernelError> {
        tile.validate(out.len())?;

        let mut offset = 0;
        while offset < tile.active_ch {
            let count = (tile.active_ch - offset).min(4);

            let mut init = [0i32; 4];
            if let Some(bias) = tile.bias {
                init[..count].copy_from_slice(&bias[offset..offset + count]);
            }
            let mut acc = [init; 4];
            let mut ker_sum = [0i32; 4];

            for row in 0..tile.row_x_col {
                let ker = unpack_row_quad(tile.rhs, row, tile.total_ch, offset, count);
                for lane in 0..4 {
                    ker_sum[lane] += ker[lane] as i32;
                }
                for (col, col_acc) in acc.iter_mut().enumerate().take(tile.columns) {
                    let base = tile.lhs_index(col, row, offset);
                    for lane in 0..count {
                        let ip = tile.lhs[base + lane] as i32;
                        col_acc[lane] = col_acc[lane].wrapping_add(ip * ker[lane] as i32);
                    }
                }
            }

            for (col, col_acc) in acc.iter().enumerate().take(tile.columns) {
                for lane in 0..count {
                    let ch = offset + lane;
                    let sum = col_acc[lane].wrapping_add(ker_sum[lane].wrapping_mul(tile.input_offset));
                    let res = tile
                        .quant
                        .requantize(ch, sum)
                        .saturating_add(tile.output_offset);
                    out[col * tile.total_ch + ch] = tile.bounds.clamp(res).clamp(i8::MIN as i32, i8::MAX as i32) as i8;
                }
            }

            offset += 4;
        }
        Ok(())
    }
}

#[inline(always)]
fn magnitude_from_sum(sum: f32, iterations: u32) -> f32 {
    let half = 0.5 * sum;
    let mut y = inv_sqrt_seed_f32(sum);
    for _ in 0..iterations {
        y = inv_sqrt_newton_f32(y, half);
    }
    sum * y.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::ScalarKernel;

    #[test]
    fn test_dot_matches_reference() {
        let x: Vec<i32> = (0..29).map(|i| (i * 7919 - 100_000) << 8).collect();
        let c: Vec<i32> = (0..29).map(|i| (i * 104_729 + 3) << 4).collect();
        assert_eq!(LaneKernel.dot_q31(&x, &c), ScalarKernel.dot_q31(&x, &c));

        let xf: Vec<f64> = (0..19).map(|i| i as f64 * 0.1).collect();
        let cf: Vec<f64> = (0..19).map(|i| 1.0 - i as f64 * 0.05).collect();
        let diff = (LaneKernel.dot_f64(&xf, &cf) - ScalarKernel.dot_f64(&xf, &cf)).abs();
        assert!(diff < 1e-12, "dot_f64 diverged by {}", diff);
    }

    #[test]
    fn test_magnitude_block_and_tail() {
        // 8 samples in the block, 3 in the tail
        let src: Vec<f32> = (0..11).flat_map(|i| [3.0 * (i + 1) as f32, 4.0 * (i + 1) as f32]).collect();
        let mut dst = vec![0.0f32; 11];
        LaneKernel.cmplx_mag_f32(&src, &mut dst);
        for (i, &m) in dst.iter().enumerate() {
            let exact = 5.0 * (i + 1) as f32;
            let rel = ((m - exact) / exact).abs();
            assert!(rel < 1e-3, "sample {}: {} vs {}", i, m, exact);
        }
    }

    #[test]
    fn test_magnitude_zero() {
        let mut dst = [1.0f32; 1];
        LaneKernel.cmplx_mag_f32(&[0.0, 0.0], &mut dst);
        assert_eq!(dst[0], 0.0);
    }
}
