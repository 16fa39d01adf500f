use thiserror::Error;

use crate::kernel::KernelError;

/// Rejected user input, reported before the kernel is touched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidParameter {
    #[error(
        "LIDF slope ({slope}) and bimodality ({bimodality}) must not sum to more than 1.0, got {sum}"
    )]
    LidfSumExceeded {
        slope: f64,
        bimodality: f64,
        sum: f64,
    },
}

#[derive(Debug, Error)]
pub enum ProsailError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(#[from] InvalidParameter),

    /// Only reachable through `run_raw`; `run` builds the discriminator itself.
    #[error("LIDF type must be either 1 or 2, got {0}")]
    InvalidDiscriminator(i32),

    #[error("reflectance kernel failed: {0}")]
    Kernel(#[source] KernelError),
}

impl ProsailError {
    pub fn is_user_error(&self) -> bool {
        matches!(self, ProsailError::InvalidParameter(_))
    }
}
