use std::time::Instant;

use anyhow::{ensure, Result};
use clap::Parser;
use qdsp_core::kernel::{for_tier, select};
use qdsp_core::{BlockKernel, Coefficients, CpuFeatures, KernelConfig, KernelTier, TierRequest};
use qdsp_fastmath::cmplx_mag_f32_with;
use qdsp_filter::FirDecimator;
use qdsp_math::Q15;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Run a noisy Q15 tone through a windowed-sinc decimator and a complex
/// magnitude stage, once per kernel tier, and report throughput.
///
/// All tiers must produce the same decimated samples.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
struct Args {
    /// Input samples per run
    #[arg(long, default_value_t = 1 << 20)]
    samples: usize,

    /// Samples per processed block
    #[arg(long, default_value_t = 256)]
    block: usize,

    /// Filter length
    #[arg(long, default_value_t = 31)]
    taps: usize,

    /// Decimation factor
    #[arg(long, default_value_t = 4)]
    decimation: usize,

    /// Kernel tier: auto runs every supported tier
    #[arg(long, default_value_t = TierRequest::Auto)]
    tier: TierRequest,

    /// Seed for the noise generator
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Windowed-sinc lowpass at `0.5 / decimation`, Hann window, Q15.
fn lowpass_q15(taps: usize, decimation: usize) -> Vec<i16> {
    let cutoff = 0.5 / decimation as f64;
    let mid = (taps as f64 - 1.0) / 2.0;
    let raw: Vec<f64> = (0..taps)
        .map(|i| {
            let t = i as f64 - mid;
            let sinc = if t == 0.0 {
                2.0 * cutoff
            } else {
                (2.0 * std::f64::consts::PI * cutoff * t).sin() / (std::f64::consts::PI * t)
            };
            let window = if taps > 1 {
                0.5 - 0.5 * (2.0 * std::f64::consts::PI * i as f64 / (taps as f64 - 1.0)).cos()
            } else {
                1.0
            };
            sinc * window
        })
        .collect();
    let gain: f64 = raw.iter().sum();
    raw.iter().map(|&c| Q15::from_f64(c / gain * 0.99).raw).collect()
}

fn signal_q15(len: usize, seed: u64) -> Vec<i16> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len)
        .map(|i| {
            let tone = 0.4 * (i as f64 * 0.01).sin();
            let noise: f64 = rng.gen_range(-0.2..0.2);
            Q15::from_f64(tone + noise).raw
        })
        .collect()
}

struct RunStats {
    decimated: Vec<i16>,
    energy: f64,
    seconds: f64,
}

fn run(args: &Args, kernel: &'static dyn BlockKernel, coeffs: &[i16], input: &[i16]) -> Result<RunStats> {
    let mut state = vec![0i16; FirDecimator::<i16>::state_len(coeffs.len(), args.block)];
    let mut fir = FirDecimator::init_with_kernel(
        Coefficients::from_impulse_response(coeffs),
        args.decimation,
        &mut state,
        args.block,
        kernel,
    )?;

    let out_block = args.block / args.decimation;
    let mut decimated = vec![0i16; input.len() / args.decimation];
    let mut complex = vec![0f32; out_block];
    let mut magnitude = vec![0f32; out_block / 2];
    let mut energy = 0.0f64;

    let start = Instant::now();
    for (block, out) in input.chunks_exact(args.block).zip(decimated.chunks_exact_mut(out_block)) {
        fir.process(block, out);

        // consecutive output pairs as (re, im)
        for (c, &s) in complex.iter_mut().zip(out.iter()) {
            *c = Q15::from_raw(s).to_f32();
        }
        cmplx_mag_f32_with(kernel, &complex, &mut magnitude)?;
        energy += magnitude.iter().map(|&m| m as f64).sum::<f64>();
    }
    let seconds = start.elapsed().as_secs_f64();

    Ok(RunStats {
        decimated,
        energy,
        seconds,
    })
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "filter_bench=info,qdsp_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    ensure!(args.block > 0, "block must hold at least one sample");
    ensure!(args.decimation > 0, "decimation must be at least 1");
    ensure!(args.block % args.decimation == 0, "block must be a multiple of the decimation factor");
    ensure!((args.block / args.decimation) % 2 == 0, "decimated block must hold whole complex pairs");
    ensure!(args.taps > 0, "filter needs at least one tap");

    let features = CpuFeatures::detect();
    let tiers: Vec<KernelTier> = match args.tier {
        TierRequest::Auto => [KernelTier::Scalar, KernelTier::Swar, KernelTier::Lanes]
            .into_iter()
            .filter(|&t| features.supports(t))
            .collect(),
        explicit => vec![select(&KernelConfig::new(explicit), features).tier()],
    };

    let samples = args.samples - args.samples % args.block;
    let coeffs = lowpass_q15(args.taps, args.decimation);
    let input = signal_q15(samples, args.seed);
    info!(samples, taps = args.taps, decimation = args.decimation, block = args.block, "starting filter bench");

    let mut reference: Option<Vec<i16>> = None;
    for tier in tiers {
        let stats = run(&args, for_tier(tier), &coeffs, &input)?;
        let rate = samples as f64 / stats.seconds / 1e6;
        info!(%tier, msamples_per_sec = rate, energy = stats.energy, "tier complete");
        println!("{:>7}: {:8.2} Msamples/s  ({:.3} s)", tier, rate, stats.seconds);

        if let Some(expected) = &reference {
            ensure!(expected == &stats.decimated, "tier {} diverged from the first tier", tier);
        } else {
            reference = Some(stats.decimated);
        }
    }

    debug!("all tiers produced identical decimated output");
    Ok(())
}
