//! Executes `HttpRequest`s built by `PokeApiClient`.
//!
//! # Design
//! The trait is the seam between the I/O-free client and the network. The
//! production implementation wraps `reqwest`; tests and hosts with their own
//! HTTP stack plug in anything that can turn a request into a response.
//! Non-2xx statuses come back as `Ok(HttpResponse)`. Only failures that
//! produced no response at all are `Err(ApiError::Transport)`.

use async_trait::async_trait;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};

#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Response payload as text. Empty is `None`; invalid UTF-8 is rejected
/// rather than patched with replacement characters.
#[cfg_attr(not(feature = "reqwest"), allow(dead_code))]
pub(crate) fn body_text(bytes: Vec<u8>) -> Result<Option<String>, ApiError> {
    if bytes.is_empty() {
        return Ok(None);
    }
    String::from_utf8(bytes)
        .map(Some)
        .map_err(|e| ApiError::DeserializationError(format!("body is not UTF-8: {e}")))
}

#[cfg(feature = "reqwest")]
pub use self::reqwest_transport::ReqwestTransport;

#[cfg(feature = "reqwest")]
mod reqwest_transport {
    use async_trait::async_trait;

    use crate::cache::CachePolicy;
    use crate::config::Config;
    use crate::error::ApiError;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    use super::{body_text, Transport};

    /// `reqwest`-backed transport that stamps responses with a `CachePolicy`.
    #[derive(Debug, Clone)]
    pub struct ReqwestTransport {
        client: reqwest::Client,
        cache: CachePolicy,
    }

    impl ReqwestTransport {
        pub fn new(config: &Config) -> Result<Self, ApiError> {
            let client = reqwest::Client::builder()
                .timeout(config.request_timeout)
                .build()
                .map_err(|e| ApiError::Transport(e.to_string()))?;
            Ok(Self::with_client(client, CachePolicy::new(config.cache_max_age)))
        }

        pub fn with_client(client: reqwest::Client, cache: CachePolicy) -> Self {
            Self { client, cache }
        }
    }

    #[async_trait]
    impl Transport for ReqwestTransport {
        async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            let mut builder = match request.method {
                HttpMethod::Get => self.client.get(&request.path),
            };
            for (key, value) in &request.headers {
                builder = builder.header(key.as_str(), value.as_str());
            }

            let response = builder
                .send()
                .await
                .map_err(|e| ApiError::Transport(e.to_string()))?;

            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(k, v)| {
                    v.to_str()
                        .ok()
                        .map(|v| (k.as_str().to_string(), v.to_string()))
                })
                .collect();
            let bytes = response
                .bytes()
                .await
                .map_err(|e| ApiError::Transport(e.to_string()))?;
            let body = body_text(bytes.to_vec())?;

            let mut response = HttpResponse {
                status,
                headers,
                body,
            };
            // Only visible to hosts that forward the response; parsing ignores it.
            self.cache.apply(&request, &mut response);
            tracing::debug!(path = %request.path, status, "http round-trip");
            Ok(response)
        }
    }
}
