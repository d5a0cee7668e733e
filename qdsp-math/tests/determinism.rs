use qdsp_math::{divide_q15, requantize, FixedPointBuffer, Q15Quotient};

// Determinism tests for Q15 and Q31 conversions and ops.
// These use rational values exactly representable in binary to avoid
// any cross-platform rounding ambiguity.

#[test]
fn test_q15_determinism_rationals() {
    let q: i32 = 1 << 15;

    let vals: [f32; 10] = [0.0, 0.5, -0.5, 0.25, -0.25, 0.75, -0.75, 0.125, -1.0, 1.0];

    let expected: Vec<i16> = vec![
        0,
        (q / 2) as i16,
        (-q / 2) as i16,
        (q / 4) as i16,
        (-q / 4) as i16,
        (3 * q / 4) as i16,
        (-3 * q / 4) as i16,
        (q / 8) as i16,
        i16::MIN,
        // +1.0 is not representable in Q15
        i16::MAX,
    ];

    let buf = FixedPointBuffer::<i16, 15>::from_f32(&vals);
    assert_eq!(buf.data, expected, "Q15 encoding mismatch");

    let out = buf.to_f32();
    for (i, (&v, &r)) in vals.iter().zip(out.iter()).enumerate().take(9) {
        assert!((v - r).abs() < 1e-6, "Round-trip mismatch at {}: {} vs {}", i, v, r);
    }
}

#[test]
fn test_q31_add_sub_and_mul_scalar_determinism() {
    let q: i64 = 1 << 31;

    // a = [0.625, -0.75], b = [0.25, 0.5]
    let a = FixedPointBuffer::<i32, 31>::from_f32(&[0.625, -0.75]);
    let b = FixedPointBuffer::<i32, 31>::from_f32(&[0.25, 0.5]);

    // a + b = [0.875, -0.25]
    let add = a.add(&b).expect("add");
    assert_eq!(add.data, vec![(7 * q / 8) as i32, (-q / 4) as i32], "add determinism");

    // a - b = [0.375, -1.25 -> saturated]
    let sub = a.sub(&b).expect("sub");
    assert_eq!(sub.data, vec![(3 * q / 8) as i32, i32::MIN], "sub determinism");

    // mul_scalar(0.5) is an exact halving
    let half = a.mul_scalar(0.5);
    assert_eq!(half.data, vec![(5 * q / 16) as i32, (-3 * q / 8) as i32], "mul_scalar(0.5) determinism");
}

#[test]
fn test_requantize_and_divide_fixed_values() {
    assert_eq!(requantize(1000, 1 << 30, 0), 500);
    assert_eq!(requantize(1001, 1 << 30, 0), 501);
    assert_eq!(requantize(1001, 1 << 30, -2), 125);
    assert_eq!(requantize(-7, 1 << 30, 2), -14);

    assert_eq!(
        divide_q15(16384, 8192).unwrap(),
        Q15Quotient { quotient: 16384, shift: 2 }
    );
}
