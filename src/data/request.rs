//! Shared HTTP request helper and error taxonomy for the API clients
//!
//! Both upstream providers are plain JSON-over-GET APIs; this module owns
//! the one request path they share and the errors it can produce.

use reqwest::Client;
use thiserror::Error;
use tracing::debug;

/// Maximum number of response-body bytes attached to an HTTP error
const MAX_ERROR_BODY_LEN: usize = 256;

/// Errors produced by the API clients and the forecast processor
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (DNS, timeout, connection refused)
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Upstream returned a non-2xx HTTP status
    #[error("upstream HTTP error {status}: {body}")]
    UpstreamHttp {
        /// HTTP status code
        status: u16,
        /// Response body, truncated
        body: String,
    },

    /// Upstream signalled failure inside an HTTP 200 envelope
    #[error("upstream API error: {message}")]
    UpstreamApi {
        /// Provider-supplied failure message
        message: String,
    },

    /// Response parsed as JSON but lacks the expected shape
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl ApiError {
    /// True for a city-not-found response from the weather provider
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UpstreamHttp { status: 404, .. })
    }
}

/// Issues a GET request and returns the parsed JSON body
///
/// Maps the three failure layers onto the error taxonomy: transport
/// failures to `Network`, non-2xx statuses to `UpstreamHttp` with the
/// (truncated) body attached, and non-JSON bodies to `MalformedResponse`.
/// Envelope-level failures are the caller's concern.
pub(crate) async fn get_json(
    http: &Client,
    url: &str,
    query: &[(&str, String)],
) -> Result<serde_json::Value, ApiError> {
    debug!(url, "issuing GET request");

    let response = http
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(ApiError::Network)?;

    let status = response.status();
    let body = response.text().await.map_err(ApiError::Network)?;

    if !status.is_success() {
        return Err(ApiError::UpstreamHttp {
            status: status.as_u16(),
            body: truncate_body(&body),
        });
    }

    serde_json::from_str(&body).map_err(|e| ApiError::MalformedResponse(e.to_string()))
}

/// Truncates a response body for inclusion in an error value
fn truncate_body(body: &str) -> String {
    if body.len() > MAX_ERROR_BODY_LEN {
        let cut = body
            .char_indices()
            .take_while(|(i, _)| *i < MAX_ERROR_BODY_LEN)
            .last()
            .map_or(0, |(i, c)| i + c.len_utf8());
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}
