use chrono::{DateTime, Utc};
use thiserror::Error;

/// Top-level error type for the `simops-api` crate.
///
/// Covers every failure mode of the reporting API surface: missing or
/// rejected credentials, rate limiting, remote errors, transport failures,
/// and malformed response bodies. `simops-core` maps these into
/// user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// No credential present, or the server rejected the one we sent
    /// (HTTP 401/403). The session has already been torn down by the
    /// time this error reaches the caller.
    #[error("Not authenticated -- sign in again")]
    Unauthenticated,

    /// Login/OTP flow failed before a session existed.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Rate limiting ───────────────────────────────────────────────
    /// HTTP 429. `retry_at` is parsed from the `X-RateLimit-Reset`
    /// header (epoch seconds) when the server provides it.
    #[error("Rate limited -- try again {}", retry_hint(.retry_at))]
    RateLimited { retry_at: Option<DateTime<Utc>> },

    // ── Remote errors ───────────────────────────────────────────────
    /// Any other non-2xx response. `message` is the server-supplied
    /// `error` field when the body was parseable JSON, otherwise a
    /// generic `API error: <status>`.
    #[error("{message}")]
    Api { status: u16, message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

fn retry_hint(retry_at: &Option<DateTime<Utc>>) -> String {
    match retry_at {
        Some(t) => format!("at {}", t.format("%H:%M:%S UTC")),
        None => "shortly".to_owned(),
    }
}

impl Error {
    /// Returns `true` if this error forced a session teardown and the
    /// user needs to sign in again.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated)
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::RateLimited { .. } => true,
            _ => false,
        }
    }

    /// The HTTP status code, if the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::RateLimited { .. } => Some(429),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limited_display_includes_reset_time() {
        let retry_at = DateTime::parse_from_rfc3339("2025-06-01T14:30:00Z")
            .map(|t| t.with_timezone(&Utc))
            .ok();
        let err = Error::RateLimited { retry_at };
        assert_eq!(err.to_string(), "Rate limited -- try again at 14:30:00 UTC");
    }

    #[test]
    fn rate_limited_display_without_hint() {
        let err = Error::RateLimited { retry_at: None };
        assert_eq!(err.to_string(), "Rate limited -- try again shortly");
    }

    #[test]
    fn api_error_carries_server_message() {
        let err = Error::Api {
            status: 500,
            message: "API error: 500".into(),
        };
        assert_eq!(err.status(), Some(500));
        assert!(!err.is_transient());
    }
}
