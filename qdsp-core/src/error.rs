use qdsp_math::FixedPointError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KernelError {
    #[error("Invalid argument: {0}")]
    Argument(&'static str),
    #[error("Buffer too small: need {required}, got {available}")]
    BufferTooSmall { required: usize, available: usize },
    #[error("No implementation for this kernel tier: {0}")]
    NoImplementation(&'static str),
    #[error("Result is NaN or infinite")]
    NanInf,
    #[error("Math error: {0}")]
    Math(#[from] FixedPointError),
}

/// Fail with [`KernelError::BufferTooSmall`] when `available < required`.
pub fn ensure_len(required: usize, available: usize) -> Result<(), KernelError> {
    if available < required {
        return Err(KernelError::BufferTooSmall {
            required,
            available,
        });
    }
    Ok(())
}
