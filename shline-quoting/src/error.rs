use thiserror::Error;

use crate::quoting::QuotingMode;

/// Errors raised while rendering quoted values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QuotingError {
    /// The dialect table has no transform for the requested mode.
    #[error("{dialect} does not support {mode} quoting")]
    UnsupportedMode {
        mode: QuotingMode,
        dialect: &'static str,
    },
}
