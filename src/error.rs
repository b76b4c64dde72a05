//! Error taxonomy for remote store calls.
//!
//! `Display` keeps the full detail for logs; `user_message` is what the UI shows.

use thiserror::Error;

/// Generic message shown for any failed fetch.
pub const FETCH_FAILED_MESSAGE: &str = "Something went wrong!";

/// Longest body excerpt kept on a status error.
const MAX_BODY_EXCERPT: usize = 200;

/// Which operation an error is being reported for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Fetch,
    Submit,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("store returned HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("unexpected response shape: {0}")]
    Malformed(String),
    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),
}

impl StoreError {
    pub fn status(status: reqwest::StatusCode, body: &str) -> Self {
        let body = if body.chars().count() > MAX_BODY_EXCERPT {
            let cut: String = body.chars().take(MAX_BODY_EXCERPT).collect();
            format!("{cut}…")
        } else {
            body.to_string()
        };
        StoreError::Status { status, body }
    }

    /// Short reason suitable for a one-line status message.
    pub fn short_reason(&self) -> String {
        match self {
            StoreError::Transport(e) if e.is_timeout() => "request timed out".into(),
            StoreError::Transport(e) if e.is_connect() => "could not reach the store".into(),
            StoreError::Transport(_) => "network error".into(),
            StoreError::Status { status, .. } => format!("server responded {status}"),
            StoreError::Malformed(_) => "unexpected response".into(),
            StoreError::Encode(_) => "could not encode movie".into(),
        }
    }

    pub fn user_message(&self, op: Operation) -> String {
        match op {
            Operation::Fetch => FETCH_FAILED_MESSAGE.to_string(),
            Operation::Submit => format!("Could not add movie: {}", self.short_reason()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_message_is_generic_for_every_variant() {
        let errs = [
            StoreError::status(reqwest::StatusCode::INTERNAL_SERVER_ERROR, "boom"),
            StoreError::Malformed("results is not an array".into()),
        ];
        for e in errs {
            assert_eq!(e.user_message(Operation::Fetch), FETCH_FAILED_MESSAGE);
        }
    }

    #[test]
    fn detail_survives_in_display() {
        let e = StoreError::status(reqwest::StatusCode::NOT_FOUND, "no such path");
        let s = e.to_string();
        assert!(s.contains("404"));
        assert!(s.contains("no such path"));
        assert_eq!(
            e.user_message(Operation::Submit),
            "Could not add movie: server responded 404 Not Found"
        );
    }

    #[test]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(1000);
        match StoreError::status(reqwest::StatusCode::BAD_GATEWAY, &body) {
            StoreError::Status { body, .. } => {
                assert_eq!(body.chars().count(), MAX_BODY_EXCERPT + 1);
                assert!(body.ends_with('…'));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
