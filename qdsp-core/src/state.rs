/// Caller-owned history buffer of a streaming filter.
///
/// Layout is `[history | block]`: the first `history` slots hold the samples
/// carried over from the previous call, the rest receive the next input
/// block. The library never allocates it; the borrow ties the filter's
/// lifetime to the caller's memory.
#[derive(Debug)]
pub struct StateBuffer<'a, T> {
    buf: &'a mut [T],
}

impl<'a, T: Copy + Default> StateBuffer<'a, T> {
    pub fn new(buf: &'a mut [T]) -> Self {
        Self { buf }
    }

    /// Zero the whole buffer (cold start).
    pub fn clear(&mut self) {
        self.buf.fill(T::default());
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        self.buf
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.buf
    }

    /// Copy `input` in after the first `history` samples.
    #[inline]
    pub fn append(&mut self, history: usize, input: &[T]) {
        debug_assert!(history + input.len() <= self.buf.len());
        self.buf[history..history + input.len()].copy_from_slice(input);
    }

    /// Move the `keep` samples that start at `consumed` to the head, so the
    /// next block sees them as its history.
    #[inline]
    pub fn carry_history(&mut self, consumed: usize, keep: usize) {
        debug_assert!(consumed + keep <= self.buf.len());
        if consumed > 0 && keep > 0 {
            self.buf.copy_within(consumed..consumed + keep, 0);
        }
    }

    /// The `history` samples that will precede the next block.
    pub fn history(&self, history: usize) -> &[T] {
        &self.buf[..history]
    }
}
