use qdsp_core::error::ensure_len;
use qdsp_core::{kernel, ActivationBounds, BlockKernel, KernelError};

use crate::params::{clipped_range, Dims, Hw, PoolParams};

/// Element type max pooling runs on.
pub trait PoolSample: Copy + Ord + Send + Sync + 'static {
    const LOWEST: Self;

    fn merge_max(kernel: &dyn BlockKernel, dst: &mut [Self], src: &[Self]);

    fn clamp_to_bounds(kernel: &dyn BlockKernel, data: &mut [Self], bounds: ActivationBounds);
}

impl PoolSample for i8 {
    const LOWEST: Self = i8::MIN;

    fn merge_max(kernel: &dyn BlockKernel, dst: &mut [i8], src: &[i8]) {
        kernel.max_merge_s8(dst, src)
    }

    fn clamp_to_bounds(kernel: &dyn BlockKernel, data: &mut [i8], bounds: ActivationBounds) {
        kernel.clamp_s8(data, bounds)
    }
}

impl PoolSample for i16 {
    const LOWEST: Self = i16::MIN;

    fn merge_max(kernel: &dyn BlockKernel, dst: &mut [i16], src: &[i16]) {
        kernel.max_merge_s16(dst, src)
    }

    fn clamp_to_bounds(kernel: &dyn BlockKernel, data: &mut [i16], bounds: ActivationBounds) {
        kernel.clamp_s16(data, bounds)
    }
}

/// Max pooling of `s8` NHWC data.
///
/// ```
/// use qdsp_core::ActivationBounds;
/// use qdsp_nn::{max_pool_s8, Dims, Hw, PoolParams};
///
/// let params = PoolParams {
///     stride: Hw::new(1, 1),
///     padding: Hw::new(0, 0),
///     activation: ActivationBounds::s8(),
/// };
/// let mut out = [0i8; 1];
/// max_pool_s8(
///     &params,
///     Dims::new(1, 2, 2, 1),
///     &[1, 5, 3, 2],
///     Hw::new(2, 2),
///     Dims::new(1, 1, 1, 1),
///     &mut out,
/// )
/// .unwrap();
/// assert_eq!(out, [5]);
/// ```
pub fn max_pool_s8(
    params: &PoolParams,
    input_dims: Dims,
    input: &[i8],
    filter: Hw,
    output_dims: Dims,
    output: &mut [i8],
) -> Result<(), KernelError> {
    max_pool(kernel::active(), params, input_dims, input, filter, output_dims, output)
}

pub fn max_pool_s16(
    params: &PoolParams,
    input_dims: Dims,
    input: &[i16],
    filter: Hw,
    output_dims: Dims,
    output: &mut [i16],
) -> Result<(), KernelError> {
    max_pool(kernel::active(), params, input_dims, input, filter, output_dims, output)
}

/// Each output is the element-wise max over the part of its receptive
/// field that lies inside the input; padding is never read. The first
/// in-bounds position seeds the output, later ones merge into it. A window
/// with no in-bounds position yields the activation minimum. After each
/// batch item the whole output is clamped to `params.activation`.
pub fn max_pool<T: PoolSample>(
    kernel: &dyn BlockKernel,
    params: &PoolParams,
    input_dims: Dims,
    input: &[T],
    filter: Hw,
    output_dims: Dims,
    output: &mut [T],
) -> Result<(), KernelError> {
    if input_dims.n < 1 {
        return Err(KernelError::Argument("batch count must be at least 1"));
    }
    if input_dims.c != output_dims.c {
        return Err(KernelError::Argument("pooling keeps the channel count"));
    }
    if params.stride.h == 0 || params.stride.w == 0 {
        return Err(KernelError::Argument("stride must be non-zero"));
    }
    ensure_len(input_dims.len(), input.len())?;
    let out_batch = output_dims.batch_len();
    ensure_len(input_dims.n * out_batch, output.len())?;

    let ch = input_dims.c;
    let in_batch = input_dims.batch_len();

    for (src, dst) in input
        .chunks_exact(in_batch.max(1))
        .zip(output.chunks_exact_mut(out_batch.max(1)))
        .take(input_dims.n)
    {
        for oy in 0..output_dims.h {
            let base_y = (oy * params.stride.h) as isize - params.padding.h as isize;
            let (ky_start, ky_end) = clipped_range(base_y, filter.h, input_dims.h);

            for ox in 0..output_dims.w {
                let base_x = (ox * params.stride.w) as isize - params.padding.w as isize;
                let (kx_start, kx_end) = clipped_range(base_x, filter.w, input_dims.w);

                let at = (oy * output_dims.w + ox) * ch;
                let out_px = &mut dst[at..at + ch];
                let mut seeded = false;

                for ky in ky_start..ky_end {
                    let iy = (base_y + ky as isize) as usize;
                    for kx in kx_start..kx_end {
                        let ix = (base_x + kx as isize) as usize;
                        let from = (iy * input_dims.w + ix) * ch;
                        let in_px = &src[from..from + ch];
                        if seeded {
                            T::merge_max(kernel, out_px, in_px);
                        } else {
                            out_px.copy_from_slice(in_px);
                            seeded = true;
                        }
                    }
                }

                if !seeded {
                    out_px.fill(T::LOWEST);
                }
            }
        }

        T::clamp_to_bounds(kernel, &mut dst[..output_dims.h * output_dims.w * ch], params.activation);
    }
    Ok(())
}
