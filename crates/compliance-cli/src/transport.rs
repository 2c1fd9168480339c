// crates/compliance-cli/src/transport.rs
// ============================================================================
// Module: HTTP Transport
// Description: reqwest-backed exchange collaborator for the compliance matrix.
// Purpose: Turn one (path, verb) pair into an observed response record.
// Dependencies: compliance-core, reqwest, url
// ============================================================================

//! ## Overview
//! The transport owns timeouts and network errors. It never judges a
//! response: every completed exchange becomes an [`ObservedResponse`], and
//! every failure becomes a [`TransportFailure`] that the runner reports as
//! inconclusive.
//!
//! Security posture: the target is untrusted. Redirects are not followed and
//! bodies are capped at [`MAX_BODY_BYTES`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::future::Future;
use std::time::Duration;

use compliance_core::ObservedHeaders;
use compliance_core::ObservedResponse;
use compliance_core::TransportFailure;
use compliance_core::TransportFailureKind;
use compliance_core::Verb;
use reqwest::Client;
use reqwest::Method;
use reqwest::redirect::Policy;
use url::Url;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum response body size accepted from the target.
pub const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// User agent sent with every exchange.
const USER_AGENT: &str = concat!("compliance-harness/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Performs one request/response exchange against the system under test.
pub trait ExchangeTransport: Send + Sync {
    /// Sends `verb` to `path` and records the response.
    fn exchange(
        &self,
        verb: Verb,
        path: &str,
    ) -> impl Future<Output = Result<ObservedResponse, TransportFailure>> + Send;
}

// ============================================================================
// SECTION: HTTP Transport
// ============================================================================

/// Exchange transport over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpTransport {
    /// Shared HTTP client.
    client: Client,
    /// Target base URL without a trailing slash.
    base: String,
}

impl HttpTransport {
    /// Builds a transport for `base_url` with a per-exchange timeout.
    ///
    /// # Errors
    ///
    /// Returns [`TransportFailure`] when the HTTP client cannot be built.
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self, TransportFailure> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .redirect(Policy::none())
            .build()
            .map_err(|err| {
                TransportFailure::new(
                    TransportFailureKind::Other,
                    format!("http client build failed: {err}"),
                )
            })?;
        Ok(Self {
            client,
            base: base_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// Returns the request URL for a resource path.
    ///
    /// The path is appended verbatim so characters the target is expected to
    /// reject, such as `@`, reach it unchanged.
    #[must_use]
    pub fn request_url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }
}

impl ExchangeTransport for HttpTransport {
    async fn exchange(&self, verb: Verb, path: &str) -> Result<ObservedResponse, TransportFailure> {
        let response = self
            .client
            .request(method_for(verb), self.request_url(path))
            .send()
            .await
            .map_err(|err| classify(&err))?;
        let status = response.status().as_u16();
        let mut headers = ObservedHeaders::new();
        for (name, value) in response.headers() {
            headers.append(name.as_str(), String::from_utf8_lossy(value.as_bytes()));
        }
        let body = read_body_limited(response, MAX_BODY_BYTES).await?;
        Ok(ObservedResponse::new(status, headers, body))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Maps a verb to its HTTP method.
const fn method_for(verb: Verb) -> Method {
    match verb {
        Verb::Get => Method::GET,
        Verb::Post => Method::POST,
        Verb::Put => Method::PUT,
        Verb::Delete => Method::DELETE,
    }
}

/// Classifies a reqwest error into a transport failure.
fn classify(err: &reqwest::Error) -> TransportFailure {
    let kind = if err.is_timeout() {
        TransportFailureKind::Timeout
    } else if err.is_connect() {
        TransportFailureKind::Connect
    } else if err.is_body() || err.is_decode() {
        TransportFailureKind::Protocol
    } else {
        TransportFailureKind::Other
    };
    TransportFailure::new(kind, err.to_string())
}

/// Reads the response body while enforcing a byte limit.
///
/// A declared length above the limit is rejected before any body bytes are
/// read; streamed bodies stop as soon as they pass the limit.
async fn read_body_limited(
    mut response: reqwest::Response,
    max_bytes: usize,
) -> Result<Vec<u8>, TransportFailure> {
    let max_bytes_u64 = u64::try_from(max_bytes).map_err(|_| {
        TransportFailure::new(TransportFailureKind::Other, "body size limit exceeds u64")
    })?;
    if let Some(declared) = response.content_length()
        && declared > max_bytes_u64
    {
        return Err(body_too_large());
    }
    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await.map_err(|err| classify(&err))? {
        if body.len().saturating_add(chunk.len()) > max_bytes {
            return Err(body_too_large());
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

/// Failure for bodies above [`MAX_BODY_BYTES`].
fn body_too_large() -> TransportFailure {
    TransportFailure::new(
        TransportFailureKind::Protocol,
        format!("response body exceeds {MAX_BODY_BYTES} bytes"),
    )
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use url::Url;

    use super::HttpTransport;

    fn transport(base: &str) -> Result<HttpTransport, String> {
        let base = Url::parse(base).map_err(|err| err.to_string())?;
        HttpTransport::new(&base, Duration::from_secs(1)).map_err(|err| err.to_string())
    }

    #[test]
    fn request_url_keeps_rejected_characters_verbatim() -> Result<(), String> {
        let transport = transport("http://127.0.0.1:8082/")?;
        let url = transport.request_url("/@invalid@");
        if url != "http://127.0.0.1:8082/@invalid@" {
            return Err(format!("unexpected url {url}"));
        }
        let root = transport.request_url("/");
        if root != "http://127.0.0.1:8082/" {
            return Err(format!("unexpected root url {root}"));
        }
        Ok(())
    }

    #[test]
    fn request_url_preserves_base_prefix() -> Result<(), String> {
        let transport = transport("https://disclosure.example.org/portal")?;
        let url = transport.request_url("/public");
        if url != "https://disclosure.example.org/portal/public" {
            return Err(format!("unexpected url {url}"));
        }
        Ok(())
    }
}
