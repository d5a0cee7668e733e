use qdsp_core::error::ensure_len;
use qdsp_core::{Coefficients, KernelError, StateBuffer};
use tracing::debug;

/// Coefficients per second-order section: `[b0, b1, b2, a1, a2]`.
pub const COEFFS_PER_STAGE: usize = 5;

/// Cascade of biquads in transposed direct form II, f64.
///
/// Per section and sample:
/// `y = b0 x + d1; d1 = b1 x + a1 y + d2; d2 = b2 x + a2 y`.
/// The feedback coefficients enter with a plus sign, so a conventional
/// `a1, a2` design must be negated. Section `k` reads the output of section
/// `k - 1` in place.
pub struct BiquadCascadeDf2T<'a> {
    coeffs: Coefficients<'a, f64>,
    state: StateBuffer<'a, f64>,
    stages: usize,
}

impl<'a> BiquadCascadeDf2T<'a> {
    pub const fn state_len(stages: usize) -> usize {
        2 * stages
    }

    pub fn init(stages: usize, coeffs: Coefficients<'a, f64>, state: &'a mut [f64]) -> Result<Self, KernelError> {
        if stages == 0 {
            return Err(KernelError::Argument("cascade needs at least one stage"));
        }
        if coeffs.taps() != stages * COEFFS_PER_STAGE {
            return Err(KernelError::Argument("expected five coefficients per stage"));
        }
        ensure_len(Self::state_len(stages), state.len())?;

        let mut state = StateBuffer::new(state);
        state.clear();

        debug!(stages, "biquad cascade initialised");

        Ok(Self { coeffs, state, stages })
    }

    /// `output.len()` must equal `input.len()`.
    pub fn process(&mut self, input: &[f64], output: &mut [f64]) {
        debug_assert_eq!(input.len(), output.len());
        output.copy_from_slice(input);

        let coeffs = self.coeffs.as_slice();
        let state = self.state.as_mut_slice();
        for (section, d) in coeffs
            .chunks_exact(COEFFS_PER_STAGE)
            .zip(state.chunks_exact_mut(2))
        {
            let [b0, b1, b2, a1, a2] = [section[0], section[1], section[2], section[3], section[4]];
            let (mut d1, mut d2) = (d[0], d[1]);

            for v in output.iter_mut() {
                let x = *v;
                let y = b0 * x + d1;
                d1 = b1 * x + a1 * y + d2;
                d2 = b2 * x + a2 * y;
                *v = y;
            }

            d[0] = d1;
            d[1] = d2;
        }
    }

    pub fn reset(&mut self) {
        self.state.clear();
    }

    pub fn stages(&self) -> usize {
        self.stages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_shapes() {
        let mut state = [0.0; 4];
        assert!(BiquadCascadeDf2T::init(0, Coefficients::owned(vec![]), &mut state).is_err());
        assert!(BiquadCascadeDf2T::init(1, Coefficients::owned(vec![1.0; 4]), &mut state).is_err());
        assert_eq!(
            BiquadCascadeDf2T::init(3, Coefficients::owned(vec![1.0; 15]), &mut state).err(),
            Some(KernelError::BufferTooSmall {
                required: 6,
                available: 4
            })
        );
    }

    #[test]
    fn test_one_pole_impulse_response() {
        // y[n] = x[n] + 0.5 y[n-1]
        let c = [1.0, 0.0, 0.0, 0.5, 0.0];
        let mut state = [0.0; 2];
        let mut iir = BiquadCascadeDf2T::init(1, Coefficients::borrowed(&c), &mut state).unwrap();

        let mut out = [0.0; 3];
        iir.process(&[1.0, 0.0, 0.0], &mut out);
        assert_eq!(out, [1.0, 0.5, 0.25]);

        // state carries the tail into the next block
        iir.process(&[0.0, 0.0, 0.0], &mut out);
        assert_eq!(out, [0.125, 0.0625, 0.03125]);
    }

    #[test]
    fn test_cascade_feeds_forward() {
        // two pure delays in series: z^-2
        let c = [0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0];
        let mut state = [0.0; 4];
        let mut iir = BiquadCascadeDf2T::init(2, Coefficients::borrowed(&c), &mut state).unwrap();

        let mut out = [0.0; 5];
        iir.process(&[1.0, 2.0, 3.0, 4.0, 5.0], &mut out);
        assert_eq!(out, [0.0, 0.0, 1.0, 2.0, 3.0]);
        assert_eq!(iir.stages(), 2);
    }
}
