use thiserror::Error;

/// Normalized failure for every remote call. Server-phrased rejections are
/// shown verbatim; everything else surfaces as a generic notice that names
/// the operation but leaks no transport internals.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 4xx/5xx with a structured `message` in the body.
    #[error("{0}")]
    Rejected(String),

    /// Missing or rejected bearer token; resolved by logging in again.
    #[error("session missing or rejected by the server (log in again)")]
    Unauthorized,

    /// Network failure or a response that did not match its schema.
    #[error("request failed ({label})")]
    Transport {
        label: &'static str,
        #[source]
        source: Option<reqwest::Error>,
    },
}

impl ApiError {
    pub(super) fn transport(label: &'static str, source: reqwest::Error) -> Self {
        ApiError::Transport {
            label,
            source: Some(source),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}
