//! Error types for contactdir
//!
//! Configuration problems are fatal; everything the remote service or the
//! transport can throw is recoverable and ends up as fetch state.

use thiserror::Error;

/// Main error type for contactdir operations
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Missing env.{0}")]
    MissingConfig(&'static str),

    #[error("Invalid value for {key}: {reason}")]
    InvalidConfig { key: &'static str, reason: String },

    #[error("Service returned HTTP {status}: {message}")]
    HttpError { status: u16, message: String },

    #[error("Transport error: {0}")]
    TransportError(#[from] reqwest::Error),

    #[error("Malformed service response: {0}")]
    DecodeError(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Fetch worker exited without reporting a result")]
    WorkerLost,

    #[error("Timed out after {0:?} waiting for contacts")]
    Timeout(std::time::Duration),
}

/// Result type alias for contactdir operations
pub type Result<T> = std::result::Result<T, DirectoryError>;

impl DirectoryError {
    /// Build an HTTP error from a status code and the raw response body.
    ///
    /// PostgREST reports failures as `{"message": ..., "code": ...}`; when the
    /// body has that shape only the message is kept.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .unwrap_or_else(|| {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    "empty response body".to_string()
                } else {
                    trimmed.chars().take(200).collect()
                }
            });
        DirectoryError::HttpError { status, message }
    }

    /// Check if this error can be cleared by retrying the operation
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            DirectoryError::MissingConfig(_) | DirectoryError::InvalidConfig { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_status_prefers_postgrest_message() {
        let err = DirectoryError::from_status(
            404,
            r#"{"code":"42P01","message":"relation \"public.contacts\" does not exist"}"#,
        );
        match err {
            DirectoryError::HttpError { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "relation \"public.contacts\" does not exist");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn from_status_falls_back_to_body_text() {
        let err = DirectoryError::from_status(502, "  Bad Gateway \n");
        assert_eq!(err.to_string(), "Service returned HTTP 502: Bad Gateway");

        let err = DirectoryError::from_status(500, "");
        assert_eq!(err.to_string(), "Service returned HTTP 500: empty response body");
    }

    #[test]
    fn missing_config_reads_like_the_env_name() {
        let err = DirectoryError::MissingConfig("SUPABASE_URL");
        assert_eq!(err.to_string(), "Missing env.SUPABASE_URL");
    }

    #[test]
    fn config_errors_are_not_recoverable() {
        assert!(!DirectoryError::MissingConfig("SUPABASE_ANON_KEY").is_recoverable());
        assert!(!DirectoryError::InvalidConfig {
            key: "SUPABASE_URL",
            reason: "bad".into()
        }
        .is_recoverable());
        assert!(DirectoryError::WorkerLost.is_recoverable());
        assert!(DirectoryError::from_status(503, "busy").is_recoverable());
    }
}
