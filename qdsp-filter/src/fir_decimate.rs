use qdsp_core::error::ensure_len;
use qdsp_core::{kernel, BlockKernel, Coefficients, KernelError, KernelTier, StateBuffer};
use tracing::debug;

use crate::sample::Sample;

/// FIR decimator: filters the input and keeps every `M`-th output.
///
/// Output `i` of a block is the dot product of
/// `state[i*M .. i*M + taps]` with the time-reversed coefficients, where
/// the state holds `taps - 1` samples of history followed by the block.
///
/// ```
/// use qdsp_core::Coefficients;
/// use qdsp_filter::FirDecimator;
///
/// // 2-tap average, decimate by 2
/// let coeffs = Coefficients::borrowed(&[0.5f64, 0.5]);
/// let mut state = vec![0.0; FirDecimator::<f64>::state_len(2, 4)];
/// let mut fir = FirDecimator::init(coeffs, 2, &mut state, 4).unwrap();
///
/// let mut out = [0.0; 2];
/// fir.process(&[2.0, 4.0, 6.0, 8.0], &mut out);
/// assert_eq!(out, [1.0, 5.0]);
/// ```
pub struct FirDecimator<'a, S: Sample> {
    coeffs: Coefficients<'a, S>,
    state: StateBuffer<'a, S>,
    decimation: usize,
    block_size: usize,
    kernel: &'static dyn BlockKernel,
}

impl<'a, S: Sample> FirDecimator<'a, S> {
    /// State slots needed for `taps` coefficients and blocks of `block_size`.
    pub const fn state_len(taps: usize, block_size: usize) -> usize {
        taps.saturating_sub(1) + block_size
    }

    pub fn init(
        coeffs: Coefficients<'a, S>,
        decimation: usize,
        state: &'a mut [S],
        block_size: usize,
    ) -> Result<Self, KernelError> {
        Self::init_with_kernel(coeffs, decimation, state, block_size, kernel::active())
    }

    /// As [`FirDecimator::init`], with an explicit inner-loop strategy.
    pub fn init_with_kernel(
        coeffs: Coefficients<'a, S>,
        decimation: usize,
        state: &'a mut [S],
        block_size: usize,
        kernel: &'static dyn BlockKernel,
    ) -> Result<Self, KernelError> {
        if decimation == 0 {
            return Err(KernelError::Argument("decimation factor must be at least 1"));
        }
        if block_size % decimation != 0 {
            return Err(KernelError::Argument("block size must be a multiple of the decimation factor"));
        }
        if coeffs.taps() == 0 {
            return Err(KernelError::Argument("filter needs at least one tap"));
        }
        ensure_len(Self::state_len(coeffs.taps(), block_size), state.len())?;

        let mut state = StateBuffer::new(state);
        state.clear();

        debug!(
            taps = coeffs.taps(),
            decimation,
            block_size,
            tier = %kernel.tier(),
            "fir decimator initialised"
        );

        Ok(Self {
            coeffs,
            state,
            decimation,
            block_size,
            kernel,
        })
    }

    /// Filter and decimate one block. `input.len()` must not exceed the
    /// block size given at `init` and must be a multiple of the decimation
    /// factor; `output.len()` must be `input.len() / M`.
    ///
    /// # Panics
    ///
    /// Debug builds assert these sizes. In release builds an input longer
    /// than the block size panics on a slice index.
    pub fn process(&mut self, input: &[S], output: &mut [S]) {
        let taps = self.coeffs.taps();
        let history = taps - 1;
        let m = self.decimation;
        debug_assert!(input.len() <= self.block_size, "block larger than init block size");
        debug_assert!(input.len() % m == 0, "block not a multiple of the decimation factor");
        debug_assert_eq!(output.len(), input.len() / m);

        self.state.append(history, input);

        let window = self.state.as_slice();
        let coeffs = self.coeffs.as_slice();
        for (i, out) in output.iter_mut().enumerate() {
            let start = i * m;
            *out = S::narrow(S::dot(self.kernel, &window[start..start + taps], coeffs));
        }

        self.state.carry_history(input.len(), history);
    }

    /// Back to a cold start: history zeroed.
    pub fn reset(&mut self) {
        self.state.clear();
    }

    pub fn taps(&self) -> usize {
        self.coeffs.taps()
    }

    pub fn decimation(&self) -> usize {
        self.decimation
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn tier(&self) -> KernelTier {
        self.kernel.tier()
    }
}
