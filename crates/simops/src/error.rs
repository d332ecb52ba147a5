//! CLI error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] simops_core::CoreError),

    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<simops_api::Error> for CliError {
    fn from(err: simops_api::Error) -> Self {
        Self::Core(err.into())
    }
}

impl CliError {
    /// Process exit code. Auth failures get their own code so scripts
    /// can distinguish "sign in again" from real errors.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Core(simops_core::CoreError::Unauthenticated) => 3,
            Self::Validation { .. } | Self::Config(_) => 2,
            _ => 1,
        }
    }
}
