use qdsp_core::error::ensure_len;
use qdsp_core::{kernel, BlockKernel, KernelError};
use qdsp_math::inv_sqrt::{inv_sqrt_newton_f32, inv_sqrt_seed_f32};

/// Magnitudes of the interleaved complex samples in `src`
/// (`[re0, im0, re1, im1, ...]`), one per `dst` slot.
pub fn cmplx_mag_f32(src: &[f32], dst: &mut [f32]) -> Result<(), KernelError> {
    cmplx_mag_f32_with(kernel::active(), src, dst)
}

pub fn cmplx_mag_f32_with(kernel: &dyn BlockKernel, src: &[f32], dst: &mut [f32]) -> Result<(), KernelError> {
    ensure_len(2 * dst.len(), src.len())?;
    kernel.cmplx_mag_f32(src, dst);
    Ok(())
}

/// `1/sqrt(x)` with `iterations` Newton steps after the bit-level seed.
/// Zero gives `+inf`, negative input `NaN`.
pub fn inv_sqrt_f32(x: f32, iterations: u32) -> f32 {
    if x == 0.0 {
        return f32::INFINITY;
    }
    if x < 0.0 || x.is_nan() {
        return f32::NAN;
    }
    let half = 0.5 * x;
    let mut y = inv_sqrt_seed_f32(x);
    for _ in 0..iterations {
        y = inv_sqrt_newton_f32(y, half);
    }
    y
}

/// Single-sample magnitude.
pub fn fast_magnitude(re: f32, im: f32, iterations: u32) -> f32 {
    let sum = re * re + im * im;
    if sum == 0.0 {
        return 0.0;
    }
    sum * inv_sqrt_f32(sum, iterations).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qdsp_core::KernelTier;

    #[test]
    fn test_three_four_five() {
        let m = fast_magnitude(3.0, 4.0, 3);
        assert!((m - 5.0).abs() / 5.0 < 1e-3, "got {}", m);

        let mut dst = [0.0f32; 2];
        cmplx_mag_f32(&[3.0, 4.0, -6.0, 8.0], &mut dst).unwrap();
        assert!((dst[0] - 5.0).abs() < 5e-3);
        assert!((dst[1] - 10.0).abs() < 1e-2);
    }

    #[test]
    fn test_short_source_rejected() {
        let mut dst = [0.0f32; 3];
        assert_eq!(
            cmplx_mag_f32_with(kernel::for_tier(KernelTier::Lanes), &[1.0; 5], &mut dst),
            Err(KernelError::BufferTooSmall {
                required: 6,
                available: 5
            })
        );
    }

    #[test]
    fn test_inv_sqrt_edges() {
        assert_eq!(inv_sqrt_f32(0.0, 2), f32::INFINITY);
        assert!(inv_sqrt_f32(-1.0, 2).is_nan());
        assert!((inv_sqrt_f32(4.0, 3) - 0.5).abs() < 1e-6);
        assert_eq!(fast_magnitude(0.0, 0.0, 3), 0.0);
    }

    #[test]
    fn test_more_iterations_more_accurate() {
        let exact = 2f32.sqrt();
        let e1 = (fast_magnitude(1.0, 1.0, 1) - exact).abs();
        let e3 = (fast_magnitude(1.0, 1.0, 3) - exact).abs();
        assert!(e3 <= e1, "{} vs {}", e3, e1);
    }
}
