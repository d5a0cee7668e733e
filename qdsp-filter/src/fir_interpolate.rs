use qdsp_core::error::ensure_len;
use qdsp_core::{Coefficients, KernelError, StateBuffer};
use qdsp_math::ops::saturate_i32;
use tracing::debug;

/// Q31 polyphase interpolator: `L` outputs per input sample.
///
/// The `taps` coefficients (a multiple of `L`) split into `L` phases of
/// `phase_len = taps / L`. Output `j` of input `n` is
/// `Σ_t state[n + t] * h[(L - 1 - j) + t * L]`, narrowed by `>> 31`.
pub struct FirInterpolator<'a> {
    coeffs: Coefficients<'a, i32>,
    state: StateBuffer<'a, i32>,
    factor: usize,
    phase_len: usize,
    block_size: usize,
}

impl<'a> FirInterpolator<'a> {
    pub const fn state_len(taps: usize, factor: usize, block_size: usize) -> usize {
        if factor == 0 {
            return block_size;
        }
        (taps / factor).saturating_sub(1) + block_size
    }

    pub fn init(
        coeffs: Coefficients<'a, i32>,
        factor: usize,
        state: &'a mut [i32],
        block_size: usize,
    ) -> Result<Self, KernelError> {
        if factor == 0 {
            return Err(KernelError::Argument("interpolation factor must be at least 1"));
        }
        if coeffs.taps() == 0 || coeffs.taps() % factor != 0 {
            return Err(KernelError::Argument("tap count must be a non-zero multiple of the interpolation factor"));
        }
        let phase_len = coeffs.taps() / factor;
        ensure_len(Self::state_len(coeffs.taps(), factor, block_size), state.len())?;

        let mut state = StateBuffer::new(state);
        state.clear();

        debug!(taps = coeffs.taps(), factor, phase_len, block_size, "fir interpolator initialised");

        Ok(Self {
            coeffs,
            state,
            factor,
            phase_len,
            block_size,
        })
    }

    /// `output.len()` must be `input.len() * L`.
    pub fn process(&mut self, input: &[i32], output: &mut [i32]) {
        let l = self.factor;
        let history = self.phase_len - 1;
        debug_assert!(input.len() <= self.block_size, "block larger than init block size");
        debug_assert_eq!(output.len(), input.len() * l);

        self.state.append(history, input);

        let window = self.state.as_slice();
        let h = self.coeffs.as_slice();
        for (n, outputs) in output.chunks_exact_mut(l).enumerate() {
            let x = &window[n..n + self.phase_len];
            for (j, out) in outputs.iter_mut().enumerate() {
                let acc = x
                    .iter()
                    .zip(h[l - 1 - j..].iter().step_by(l))
                    .fold(0i64, |acc, (&s, &c)| acc.wrapping_add(s as i64 * c as i64));
                *out = saturate_i32(acc >> 31);
            }
        }

        self.state.carry_history(input.len(), history);
    }

    pub fn reset(&mut self) {
        self.state.clear();
    }

    pub fn factor(&self) -> usize {
        self.factor
    }

    pub fn phase_len(&self) -> usize {
        self.phase_len
    }
}
