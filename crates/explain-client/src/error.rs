//! Error types for the explain-error client
//!
//! Failures split into two families:
//! - [`ApiError`]: anything that goes wrong talking to the backend action.
//!   Most call sites recover locally (fail open, treat as cache miss) and
//!   surface nothing worse than a banner notification.
//! - [`SessionError`]: page-session wiring failures.

/// Errors from the backend HTTP endpoints.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request never produced a response (connection refused, timeout, ...).
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response arrived with a non-success HTTP status.
    #[error("unexpected http status: {0}")]
    Status(u16),

    /// Response body was not the expected JSON shape.
    #[error("malformed response body: {0}")]
    MalformedBody(#[from] serde_json::Error),

    /// Endpoint URL could not be derived from the page context.
    #[error("invalid endpoint url: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}

impl ApiError {
    /// Whether the failure is transient and safe to recover from locally.
    ///
    /// Transient failures fall back to the safest default (assume the run
    /// completed, assume a cache miss) instead of reaching the user.
    #[inline]
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Status(_))
    }
}

/// Errors from page-session wiring.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The host dropped the UI event channel while the session was live.
    #[error("ui event channel closed")]
    ChannelClosed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display() {
        let err = ApiError::Status(503);
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn transience_classification() {
        assert!(ApiError::Status(500).is_transient());

        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(!ApiError::MalformedBody(parse).is_transient());
    }
}
