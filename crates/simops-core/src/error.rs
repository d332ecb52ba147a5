use chrono::{DateTime, Utc};
use thiserror::Error;

/// Error type surfaced to UI consumers.
///
/// Wraps `simops-api` failures into user-facing categories. The
/// classification and formatting functions in this crate never error;
/// everything here originates from I/O or configuration.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The session is gone (never established, or torn down by a
    /// 401/403). The only recovery is signing in again.
    #[error("Not authenticated -- sign in again")]
    Unauthenticated,

    /// Login or OTP verification was rejected.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    #[error("Rate limited -- try again {}", retry_hint(.retry_at))]
    RateLimited { retry_at: Option<DateTime<Utc>> },

    /// The server answered with a non-2xx status.
    #[error("Remote error (HTTP {status}): {message}")]
    Remote { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Response arrived but could not be interpreted.
    #[error("Malformed response: {0}")]
    Malformed(String),
}

fn retry_hint(retry_at: &Option<DateTime<Utc>>) -> String {
    match retry_at {
        Some(t) => format!("at {}", t.format("%H:%M:%S UTC")),
        None => "shortly".to_owned(),
    }
}

impl From<simops_api::Error> for CoreError {
    fn from(err: simops_api::Error) -> Self {
        use simops_api::Error as Api;
        match err {
            Api::Unauthenticated => Self::Unauthenticated,
            Api::Authentication { message } => Self::Authentication { message },
            Api::RateLimited { retry_at } => Self::RateLimited { retry_at },
            Api::Api { status, message } => Self::Remote { status, message },
            Api::Transport(e) => Self::Network(e.to_string()),
            Api::InvalidUrl(e) => Self::Config(e.to_string()),
            Api::Deserialization { message, .. } => Self::Malformed(message),
        }
    }
}
