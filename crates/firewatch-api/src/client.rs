// Detector HTTP client
//
// Wraps `reqwest::Client` with detector-specific URL construction and
// response decoding. Endpoint groups (status, notifications) are
// implemented as inherent methods in separate files so this module stays
// focused on transport mechanics.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Error bodies from the service look like `{"error": "Detector not running"}`.
#[derive(serde::Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Raw response as received: status plus undecoded body text.
pub(crate) struct RawResponse {
    pub status: reqwest::StatusCode,
    pub body: String,
}

/// Async client for the detector service's JSON API.
///
/// Every method maps to exactly one HTTP request. Non-success statuses are
/// turned into [`Error::Http`] carrying the service's error text when the
/// body has one.
#[derive(Debug, Clone)]
pub struct DetectorClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl DetectorClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the service root, e.g. `http://raspberrypi.local:5000`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            timeout: transport.timeout,
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            timeout: crate::transport::DEFAULT_TIMEOUT,
        }
    }

    /// The service base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/api/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/api/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode a successful JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);
        let raw = self.send(self.http.get(url)).await?;
        Self::decode(raw)
    }

    /// Send a POST with an optional JSON body, returning the raw response.
    ///
    /// Callers that need to look at the body regardless of status (the
    /// test-notification endpoint) use this directly.
    pub(crate) async fn post_raw(
        &self,
        url: Url,
        body: Option<&(impl Serialize + Sync)>,
    ) -> Result<RawResponse, Error> {
        debug!("POST {}", url);
        let builder = match body {
            Some(body) => self.http.post(url).json(body),
            None => self.http.post(url),
        };
        self.send(builder).await
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<RawResponse, Error> {
        let resp = builder.send().await.map_err(|e| self.map_transport(e))?;
        let status = resp.status();
        let body = resp.text().await.map_err(|e| self.map_transport(e))?;
        Ok(RawResponse { status, body })
    }

    fn map_transport(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            Error::Transport(e)
        }
    }

    /// Decode a JSON body, or turn a non-success status into [`Error::Http`].
    pub(crate) fn decode<T: DeserializeOwned>(raw: RawResponse) -> Result<T, Error> {
        if !raw.status.is_success() {
            return Err(Self::status_error(&raw));
        }
        parse_json(&raw.body)
    }

    /// Build the `Http` error for a non-success response.
    pub(crate) fn status_error(raw: &RawResponse) -> Error {
        let message = serde_json::from_str::<ErrorBody>(&raw.body)
            .ok()
            .and_then(|b| b.error)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| "Detector not responding".into());
        Error::Http {
            status: raw.status.as_u16(),
            message,
        }
    }
}

/// Parse a JSON body, keeping a short preview in the error message.
pub(crate) fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    serde_json::from_str(body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: body.to_owned(),
        }
    })
}
