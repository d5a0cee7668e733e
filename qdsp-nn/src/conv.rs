use qdsp_core::error::ensure_len;
use qdsp_core::{kernel, BlockKernel, DepthwiseTile, KernelError, QuantParams};
use qdsp_math::int4::packed_len;

use crate::params::{ConvParams, Dims, Hw};

/// Output columns the tile kernel handles per call.
pub const TILE_COLUMNS: usize = 4;

/// Inner depthwise tile with int4 weights on the active kernel.
///
/// Returns [`KernelError::NoImplementation`] when the active tier has no
/// vector path for it.
pub fn depthwise_conv_nt_t_s4(tile: &DepthwiseTile<'_>, out: &mut [i8]) -> Result<(), KernelError> {
    kernel::active().depthwise_s4_tile(tile, out)
}

/// Scratch bytes [`depthwise_conv_s4`] needs: four im2col columns.
pub fn depthwise_conv_s4_buffer_size(input_dims: Dims, filter: Hw) -> usize {
    TILE_COLUMNS * filter.h * filter.w * input_dims.c
}

/// Depthwise convolution, depth multiplier 1, with int4 weights packed
/// `[kernel_h][kernel_w][channels]` two per byte.
///
/// Output positions are gathered four at a time into `ctx_buffer`
/// (padding filled with `-input_offset`, so padded taps contribute nothing)
/// and handed to the tile kernel.
#[allow(clippy::too_many_arguments)]
pub fn depthwise_conv_s4(
    ctx_buffer: &mut [i8],
    params: &ConvParams,
    quant: &QuantParams<'_>,
    input_dims: Dims,
    input: &[i8],
    filter: Hw,
    weights: &[u8],
    bias: Option<&[i32]>,
    output_dims: Dims,
    output: &mut [i8],
) -> Result<(), KernelError> {
    depthwise_conv_s4_with(
        kernel::active(),
        ctx_buffer,
        params,
        quant,
        input_dims,
        input,
        filter,
        weights,
        bias,
        output_dims,
        output,
    )
}

#[allow(clippy::too_many_arguments)]
pub fn depthwise_conv_s4_with(
    kernel: &dyn BlockKernel,
    ctx_buffer: &mut [i8],
    params: &ConvParams,
    quant: &QuantParams<'_>,
    input_dims: Dims,
    input: &[i8],
    filter: Hw,
    weights: &[u8],
    bias: Option<&[i32]>,
    output_dims: Dims,
    output: &mut [i8],
) -> Result<(), KernelError> {
    if input_dims.n < 1 {
        return Err(KernelError::Argument("batch count must be at least 1"));
    }
    if input_dims.c != output_dims.c {
        return Err(KernelError::Argument("depth multiplier must be 1"));
    }
    if params.stride.h == 0 || params.stride.w == 0 {
        return Err(KernelError::Argument("stride must be non-zero"));
    }
    if filter.h == 0 || filter.w == 0 {
        return Err(KernelError::Argument("empty filter"));
    }
    if input_dims.c == 0 {
        return Err(KernelError::Argument("channel count must be at least 1"));
    }

    let ch = input_dims.c;
    let row_x_col = filter.h * filter.w;
    let col_len = row_x_col * ch;
    ensure_len(ch, quant.channels())?;
    if let Some(bias) = bias {
        ensure_len(ch, bias.len())?;
    }
    ensure_len(input_dims.len(), input.len())?;
    ensure_len(packed_len(col_len), weights.len())?;
    let out_batch = output_dims.batch_len();
    ensure_len(input_dims.n * out_batch, output.len())?;
    ensure_len(depthwise_conv_s4_buffer_size(input_dims, filter), ctx_buffer.len())?;

    let pad_fill = (-params.input_offset).clamp(i8::MIN as i32, i8::MAX as i32) as i8;
    let positions = output_dims.h * output_dims.w;
    let in_batch = input_dims.batch_len();

    for b in 0..input_dims.n {
        let src = &input[b * in_batch..(b + 1) * in_batch];
        let dst = &mut output[b * out_batch..(b + 1) * out_batch];

        let mut first = 0;
        while first < positions {
            let columns = (positions - first).min(TILE_COLUMNS);

            for (k, column) in ctx_buffer.chunks_exact_mut(col_len).take(columns).enumerate() {
                let pos = first + k;
                let (oy, ox) = (pos / output_dims.w, pos % output_dims.w);
                let base_y = (oy * params.stride.h) as isize - params.padding.h as isize;
                let base_x = (ox * params.stride.w) as isize - params.padding.w as isize;

                for (tap, px) in column.chunks_exact_mut(ch).enumerate() {
                    let iy = base_y + (tap / filter.w) as isize;
                    let ix = base_x + (tap % filter.w) as isize;
                    let inside = iy >= 0 && ix >= 0 && (iy as usize) < input_dims.h && (ix as usize) < input_dims.w;
                    if inside {
                        let from = (iy as usize * input_dims.w + ix as usize) * ch;
                        px.copy_from_slice(&src[from..from + ch]);
                    } else {
                        px.fill(pad_fill);
                    }
                }
            }

            let tile = DepthwiseTile {
                lhs: &ctx_buffer[..columns * col_len],
                columns,
                row_x_col,
                ch_stride: ch,
                rhs: weights,
                total_ch: ch,
                active_ch: ch,
                bias,
                quant: *quant,
                input_offset: params.input_offset,
                output_offset: params.output_offset,
                bounds: params.activation,
            };
            kernel.depthwise_s4_tile(&tile, &mut dst[first * ch..])?;

            first += columns;
        }
    }
    Ok(())
}
