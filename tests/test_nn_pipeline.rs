// Integration test for the tensor chain: int4 depthwise conv -> ReLU -> max pool
use mini_qdsp::base::kernel::for_tier;
use mini_qdsp::base::{ActivationBounds, DepthwiseTile, KernelError, KernelTier, QuantParams};
use mini_qdsp::math::int4::{pack_s4, unpack_row_quad, unpack_s4};
use mini_qdsp::nn::conv::depthwise_conv_s4_with;
use mini_qdsp::nn::pool::max_pool;
use mini_qdsp::nn::{
    depthwise_conv_s4_buffer_size, max_pool_s16, max_pool_s8, relu_s8, ConvParams, Dims, Hw, PoolParams,
};

fn identity_quant(channels: usize) -> (Vec<i32>, Vec<i32>) {
    (vec![1 << 30; channels], vec![1; channels])
}

#[test]
fn test_pool_takes_window_max() {
    let params = PoolParams {
        stride: Hw::new(1, 1),
        padding: Hw::new(0, 0),
        activation: ActivationBounds::s8(),
    };
    let mut out8 = [0i8; 1];
    max_pool_s8(&params, Dims::new(1, 2, 2, 1), &[1, 5, 3, 2], Hw::new(2, 2), Dims::new(1, 1, 1, 1), &mut out8).unwrap();
    assert_eq!(out8, [5]);

    let params16 = PoolParams {
        activation: ActivationBounds::s16(),
        ..params
    };
    let mut out16 = [0i16; 1];
    max_pool_s16(&params16, Dims::new(1, 2, 2, 1), &[1, 5, 3, 2], Hw::new(2, 2), Dims::new(1, 1, 1, 1), &mut out16)
        .unwrap();
    assert_eq!(out16, [5]);
}

#[test]
fn test_conv_relu_pool_chain() {
    // 4x4x2 input, 3x3 filter with zero weights, padding 1 -> 4x4x2 of pure bias
    let input_dims = Dims::new(1, 4, 4, 2);
    let input: Vec<i8> = (0..input_dims.len()).map(|i| (i as i8).wrapping_mul(29)).collect();
    let filter = Hw::new(3, 3);
    let weights = pack_s4(&[0i8; 3 * 3 * 2]);
    let bias = [-40, 25];
    let (mults, shifts) = identity_quant(2);
    let quant = QuantParams::new(&mults, &shifts).unwrap();
    let conv = ConvParams {
        input_offset: 128,
        output_offset: -3,
        stride: Hw::new(1, 1),
        padding: Hw::new(1, 1),
        activation: ActivationBounds::s8(),
    };
    let conv_dims = Dims::new(1, 4, 4, 2);

    let mut ctx = vec![0i8; depthwise_conv_s4_buffer_size(input_dims, filter)];
    let mut features = vec![0i8; conv_dims.len()];
    depthwise_conv_s4_with(
        for_tier(KernelTier::Lanes),
        &mut ctx,
        &conv,
        &quant,
        input_dims,
        &input,
        filter,
        &weights,
        Some(&bias),
        conv_dims,
        &mut features,
    )
    .unwrap();
    for px in features.chunks_exact(2) {
        assert_eq!(px, &[-43, 22]);
    }

    relu_s8(&mut features);
    for px in features.chunks_exact(2) {
        assert_eq!(px, &[0, 22]);
    }

    let pool = PoolParams {
        stride: Hw::new(2, 2),
        padding: Hw::new(0, 0),
        activation: ActivationBounds::new(0, 20).unwrap(),
    };
    let pooled_dims = Dims::new(1, 2, 2, 2);
    let mut pooled = vec![0i8; pooled_dims.len()];
    max_pool(for_tier(KernelTier::Swar), &pool, conv_dims, &features, Hw::new(2, 2), pooled_dims, &mut pooled)
        .unwrap();
    assert_eq!(pooled, [0, 20, 0, 20, 0, 20, 0, 20]);
}

#[test]
fn test_tile_with_odd_channel_count() {
    // five channels: row 1 starts on an odd nibble
    let raw: [i8; 10] = [1, 2, 3, -4, 5, -1, 0, 7, -8, 2];
    let rhs = pack_s4(&raw);
    let lhs = [1i8, 1, 1, 1, 1, 2, 2, 2, 2, 2];
    let (mults, shifts) = identity_quant(5);
    let tile = DepthwiseTile {
        lhs: &lhs,
        columns: 1,
        row_x_col: 2,
        ch_stride: 5,
        rhs: &rhs,
        total_ch: 5,
        active_ch: 5,
        bias: None,
        quant: QuantParams::new(&mults, &shifts).unwrap(),
        input_offset: 0,
        output_offset: 0,
        bounds: ActivationBounds::s8(),
    };

    let mut out = [0i8; 5];
    for_tier(KernelTier::Lanes).depthwise_s4_tile(&tile, &mut out).unwrap();
    assert_eq!(out, [-1, 2, 17, -20, 9]);

    assert_eq!(
        for_tier(KernelTier::Scalar).depthwise_s4_tile(&tile, &mut out),
        Err(KernelError::NoImplementation("depthwise_s4_tile"))
    );
}

#[test]
fn test_int4_round_trip_even_and_odd() {
    for count in [6usize, 7] {
        let values: Vec<i8> = (0..count as i8).map(|i| i * 3 % 16 - 8).collect();
        let packed = pack_s4(&values);
        assert_eq!(packed.len(), (count + 1) / 2);
        assert_eq!(unpack_s4(&packed, count), values);
    }

    // three channels per row: row 1 starts mid-byte
    let values: [i8; 6] = [1, -2, 3, -4, 5, -6];
    let packed = pack_s4(&values);
    assert_eq!(unpack_row_quad(&packed, 0, 3, 0, 3), [1, -2, 3, 0]);
    assert_eq!(unpack_row_quad(&packed, 1, 3, 0, 3), [-4, 5, -6, 0]);
}
