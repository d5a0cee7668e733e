use qdsp_core::kernel::for_tier;
use qdsp_core::{Coefficients, KernelTier};
use qdsp_filter::FirDecimator;
use qdsp_math::Q31;

fn main() {
    let taps: Vec<i32> = [0.05, -0.1, 0.3, 0.5, 0.3, -0.1, 0.05]
        .iter()
        .map(|&h| Q31::from_f64(h).raw)
        .collect();
    let input: Vec<i32> = (0..256)
        .map(|n| Q31::from_f64(0.8 * ((n as f64) * 0.37).sin()).raw)
        .collect();

    for tier in [KernelTier::Scalar, KernelTier::Swar, KernelTier::Lanes] {
        let mut state = vec![0i32; FirDecimator::<i32>::state_len(taps.len(), 64)];
        let mut fir = match FirDecimator::init_with_kernel(
            Coefficients::from_impulse_response(&taps),
            4,
            &mut state,
            64,
            for_tier(tier),
        ) {
            Ok(fir) => fir,
            Err(e) => {
                eprintln!("init failed: {}", e);
                std::process::exit(1);
            }
        };

        let mut bytes = Vec::with_capacity(input.len());
        let mut out = [0i32; 16];
        for block in input.chunks(64) {
            fir.process(block, &mut out);
            for v in &out {
                bytes.extend_from_slice(&v.to_le_bytes());
            }
        }
        println!("Q31_DECIMATE_HASH {} {}", tier, sha256(&bytes));
    }
}

fn sha256(data: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(data);
    let out = hasher.finalize();
    hex::encode(out)
}
