use proptest::prelude::*;
use qdsp_core::kernel::for_tier;
use qdsp_core::{ActivationBounds, KernelTier};

const TIERS: [KernelTier; 3] = [KernelTier::Scalar, KernelTier::Swar, KernelTier::Lanes];

// Property 1: integer dot products agree exactly across tiers
proptest! {
    #[test]
    fn prop_integer_dot_agrees(
        pairs in prop::collection::vec((any::<i32>(), any::<i32>()), 0..100)
    ) {
        let (x, c): (Vec<i32>, Vec<i32>) = pairs.into_iter().unzip();
        let x16: Vec<i16> = x.iter().map(|&v| v as i16).collect();
        let c16: Vec<i16> = c.iter().map(|&v| v as i16).collect();

        let reference = for_tier(KernelTier::Scalar);
        for tier in TIERS {
            let k = for_tier(tier);
            prop_assert_eq!(k.dot_q31(&x, &c), reference.dot_q31(&x, &c), "dot_q31 {}", tier);
            prop_assert_eq!(k.dot_q15(&x16, &c16), reference.dot_q15(&x16, &c16), "dot_q15 {}", tier);
        }
    }
}

// Property 2: float dot products agree within rounding
proptest! {
    #[test]
    fn prop_float_dot_close(
        pairs in prop::collection::vec((-1.0f32..1.0, -1.0f32..1.0), 0..200)
    ) {
        let (x, c): (Vec<f32>, Vec<f32>) = pairs.into_iter().unzip();
        let reference = for_tier(KernelTier::Scalar).dot_f32(&x, &c);
        for tier in TIERS {
            let got = for_tier(tier).dot_f32(&x, &c);
            prop_assert!((got - reference).abs() < 1e-9, "{}: {} vs {}", tier, got, reference);
        }
    }
}

// Property 3: ReLU is idempotent and tiers agree
proptest! {
    #[test]
    fn prop_relu_idempotent(data8 in prop::collection::vec(any::<i8>(), 0..70),
                            data16 in prop::collection::vec(any::<i16>(), 0..70)) {
        let mut expected8 = data8.clone();
        let mut expected16 = data16.clone();
        for_tier(KernelTier::Scalar).relu_s8(&mut expected8);
        for_tier(KernelTier::Scalar).relu_s16(&mut expected16);

        for tier in TIERS {
            let k = for_tier(tier);
            let mut once8 = data8.clone();
            k.relu_s8(&mut once8);
            prop_assert_eq!(&once8, &expected8, "relu_s8 {}", tier);
            let mut twice8 = once8.clone();
            k.relu_s8(&mut twice8);
            prop_assert_eq!(&twice8, &once8);

            let mut once16 = data16.clone();
            k.relu_s16(&mut once16);
            prop_assert_eq!(&once16, &expected16, "relu_s16 {}", tier);
            prop_assert!(once16.iter().all(|&v| v >= 0));
        }
    }
}

// Property 4: max merge and clamp agree across tiers
proptest! {
    #[test]
    fn prop_merge_and_clamp_agree(
        pairs in prop::collection::vec((any::<i16>(), any::<i16>()), 0..70),
        lo in -200i32..0,
        hi in 0i32..200
    ) {
        let (a, b): (Vec<i16>, Vec<i16>) = pairs.into_iter().unzip();
        let bounds = ActivationBounds::new(lo, hi).unwrap();

        let mut expected = a.clone();
        for_tier(KernelTier::Scalar).max_merge_s16(&mut expected, &b);
        for_tier(KernelTier::Scalar).clamp_s16(&mut expected, bounds);

        let a8: Vec<i8> = a.iter().map(|&v| v as i8).collect();
        let b8: Vec<i8> = b.iter().map(|&v| v as i8).collect();
        let mut expected8 = a8.clone();
        for_tier(KernelTier::Scalar).max_merge_s8(&mut expected8, &b8);
        for_tier(KernelTier::Scalar).clamp_s8(&mut expected8, bounds);

        for tier in TIERS {
            let k = for_tier(tier);
            let mut got = a.clone();
            k.max_merge_s16(&mut got, &b);
            k.clamp_s16(&mut got, bounds);
            prop_assert_eq!(&got, &expected, "s16 {}", tier);

            let mut got8 = a8.clone();
            k.max_merge_s8(&mut got8, &b8);
            k.clamp_s8(&mut got8, bounds);
            prop_assert_eq!(&got8, &expected8, "s8 {}", tier);
        }
    }
}

// Property 5: magnitude agrees with the exact reference
proptest! {
    #[test]
    fn prop_magnitude_close(src in prop::collection::vec(-1000.0f32..1000.0, 0..64)) {
        let n = src.len() / 2;
        let mut reference = vec![0.0f32; n];
        for_tier(KernelTier::Scalar).cmplx_mag_f32(&src, &mut reference);

        for tier in TIERS {
            let mut got = vec![0.0f32; n];
            for_tier(tier).cmplx_mag_f32(&src, &mut got);
            for (i, (&g, &r)) in got.iter().zip(&reference).enumerate() {
                let tol = 1e-3 * r.max(1e-3);
                prop_assert!((g - r).abs() <= tol, "{} sample {}: {} vs {}", tier, i, g, r);
            }
        }
    }
}
