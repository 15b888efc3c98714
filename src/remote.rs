use serde::de::DeserializeOwned;

use crate::session::Session;

mod error;
pub use self::error::ApiError;

mod types;
pub use self::types::*;

mod catalog;
mod identity;
mod scheduling;

/// Blocking client for the hospital API. One request per user action; no
/// retries, no caching. Authenticated calls refuse to go out without a
/// bearer token.
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    client: reqwest::blocking::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("medibook")
            .build()
            .map_err(|e| ApiError::transport("build http client", e))?;
        Ok(Self {
            base_url: base_url.into(),
            token: None,
            client,
        })
    }

    pub fn with_session(base_url: impl Into<String>, session: &Session) -> Result<Self, ApiError> {
        let mut c = Self::new(base_url)?;
        c.token = Some(session.token().to_string());
        Ok(c)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get(&self, path: &str) -> reqwest::blocking::RequestBuilder {
        self.client.get(self.url(path))
    }

    fn post(&self, path: &str) -> reqwest::blocking::RequestBuilder {
        self.client.post(self.url(path))
    }

    /// Attach the bearer token, or fail before any request goes out.
    fn authed(
        &self,
        rb: reqwest::blocking::RequestBuilder,
    ) -> Result<reqwest::blocking::RequestBuilder, ApiError> {
        let token = self.token.as_deref().ok_or(ApiError::Unauthorized)?;
        Ok(rb.header(
            reqwest::header::AUTHORIZATION,
            format!("Bearer {}", token),
        ))
    }

    /// Send a request and normalize the outcome per the failure taxonomy:
    /// 401 -> `Unauthorized`; other error statuses -> `Rejected` with the
    /// body's `message` when present; network/parse trouble -> `Transport`.
    fn send_json<T: DeserializeOwned>(
        &self,
        rb: reqwest::blocking::RequestBuilder,
        label: &'static str,
    ) -> Result<T, ApiError> {
        let resp = rb.send().map_err(|e| ApiError::transport(label, e))?;
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        if status.is_client_error() || status.is_server_error() {
            return Err(match resp.json::<ErrorBody>() {
                Ok(body) if !body.message.is_empty() => ApiError::Rejected(body.message),
                _ => ApiError::Transport {
                    label,
                    source: None,
                },
            });
        }

        resp.json::<T>().map_err(|e| ApiError::transport(label, e))
    }
}

#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}
