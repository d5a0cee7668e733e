use std::borrow::Cow;

/// FIR tap table, stored time-reversed: `[h(N-1), ..., h(1), h(0)]`.
///
/// Borrowing keeps `const` tables in flash-style static memory; owning is
/// for tables computed at run time.
#[derive(Debug, Clone, PartialEq)]
pub struct Coefficients<'a, T: Clone> {
    taps: Cow<'a, [T]>,
}

impl<'a, T: Clone> Coefficients<'a, T> {
    /// Wrap taps that are already time-reversed.
    pub fn borrowed(taps: &'a [T]) -> Self {
        Self {
            taps: Cow::Borrowed(taps),
        }
    }

    pub fn owned(taps: Vec<T>) -> Self {
        Self {
            taps: Cow::Owned(taps),
        }
    }

    /// Build from an impulse response in natural order `[h(0), ..., h(N-1)]`.
    pub fn from_impulse_response(h: &[T]) -> Self {
        Self::owned(h.iter().rev().cloned().collect())
    }

    pub fn taps(&self) -> usize {
        self.taps.len()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.taps
    }
}
