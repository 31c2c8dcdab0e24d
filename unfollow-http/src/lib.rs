//! Minimal JSON HTTP client with safe logging and OAuth 1.0a signing.
//!
//! - Request options: [`Auth`] and query params
//! - Redacts sensitive query params and never logs secret values
//! - One attempt per call: failures are returned to the caller as-is
//! - Optional *raw* request/response logging via `UNFOLLOW_HTTP_RAW=1`
//!
//! Example (no_run):
//! ```rust
//! # async fn demo() -> Result<(), unfollow_http::HttpError> {
//! let client = unfollow_http::HttpClient::new("https://api.example.com")?;
//! let got: serde_json::Value = client
//!     .get_json("v1/items", unfollow_http::RequestOpts::default())
//!     .await?;
//! # Ok(()) }
//! ```
//!
//! Security: logs only ever include the auth kind (oauth1/none), never the
//! header value.
//!
//! Observability: structured `tracing` events are emitted for request start,
//! response headers, body snippets (truncated), final errors, and (optionally)
//! raw request/response lines (target `http.raw`).

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, Method, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::env;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use thiserror::Error;

pub mod oauth;

pub use oauth::OAuth1Signer;

// ==============================
// Raw logging toggles
// ==============================

const RAW_ENV: &str = "UNFOLLOW_HTTP_RAW";
const RAW_MAX_BODY: usize = 64 * 1024;
const SNIPPET_MAX: usize = 500;

static REQUEST_SEQ: AtomicU64 = AtomicU64::new(1);

fn raw_enabled() -> bool {
    matches!(
        env::var(RAW_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

/// Render a best-effort curl command for repro/debug. The query string is
/// rebuilt from the redacted pairs and the auth header is never included.
fn make_curl(method: &Method, host_path: &str, query: &[(String, String)]) -> String {
    let mut url = host_path.to_string();
    if !query.is_empty() {
        let q = query
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        url.push('?');
        url.push_str(&q);
    }
    format!(
        "curl -X{} -H 'Authorization: <redacted>' '{}'",
        method,
        url.replace('\'', r"'\''")
    )
}

fn redact_headers(h: &HeaderMap) -> Vec<(String, String)> {
    h.iter()
        .map(|(k, v)| {
            let key = k.as_str().to_string();
            let val = if key.eq_ignore_ascii_case("authorization")
                || key.eq_ignore_ascii_case("set-cookie")
            {
                "<redacted>".to_string()
            } else {
                v.to_str().unwrap_or("").to_string()
            };
            (key, val)
        })
        .collect()
}

fn is_secret_param(name: &str) -> bool {
    matches!(
        name.to_ascii_lowercase().as_str(),
        "access_token"
            | "authorization"
            | "auth"
            | "key"
            | "api_key"
            | "token"
            | "secret"
            | "client_secret"
            | "bearer"
            | "oauth_token"
            | "oauth_signature"
    )
}

fn redact_query(query: &[(&str, Cow<'_, str>)]) -> Vec<(String, String)> {
    query
        .iter()
        .map(|(k, v)| {
            let v = if is_secret_param(k) {
                "<redacted>".to_string()
            } else {
                v.to_string()
            };
            ((*k).to_string(), v)
        })
        .collect()
}

// ==============================
// Errors
// ==============================

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("network error: {0}")]
    Network(String),
    #[error("decode error: {0}, body_snippet: {1}")]
    Decode(String, String),
    #[error("server returned error {status}: {message}, request_id={request_id}")]
    Api {
        status: StatusCode,
        message: String,
        request_id: String,
    },
}

// ==============================
// Auth & Request Options
// ==============================

/// Authentication strategies supported by the client.
#[derive(Clone, Debug)]
pub enum Auth<'a> {
    /// Signed `Authorization: OAuth ...` header over method, URL and query.
    OAuth1(&'a OAuth1Signer),
    None,
}

impl Auth<'_> {
    fn kind(&self) -> &'static str {
        match self {
            Self::OAuth1(_) => "oauth1",
            Self::None => "none",
        }
    }
}

/// Per-request options for the HTTP client.
///
/// ```
/// use unfollow_http::RequestOpts;
///
/// let opts = RequestOpts {
///     query: Some(vec![("count", "200".into())]),
///     ..Default::default()
/// };
///
/// assert!(opts.auth.is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts<'a> {
    pub auth: Option<Auth<'a>>,
    pub query: Option<Vec<(&'a str, Cow<'a, str>)>>,
}

// ==============================
// Client
// ==============================

#[derive(Clone)]
pub struct HttpClient {
    base: Url,
    inner: Client,
    pub default_timeout: Duration,
}

impl HttpClient {
    /// Construct a client anchored to a base URL. Relative paths passed to
    /// the request helpers are joined onto it.
    ///
    /// ```no_run
    /// use unfollow_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new("https://api.example.com")?;
    /// assert_eq!(client.default_timeout, Duration::from_secs(15));
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new(base: &str) -> Result<Self, HttpError> {
        // Without a trailing slash `Url::join` would replace the last segment.
        let base = if base.ends_with('/') {
            Cow::Borrowed(base)
        } else {
            Cow::Owned(format!("{base}/"))
        };
        let base = Url::parse(&base).map_err(|e| HttpError::Url(e.to_string()))?;
        let inner = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .user_agent(concat!("unfollow/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            base,
            inner,
            default_timeout: Duration::from_secs(15),
        })
    }

    /// Override the default per-request timeout.
    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = dur;
        self
    }

    /// GET and decode a JSON response.
    pub async fn get_json<T>(&self, path: &str, opts: RequestOpts<'_>) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        self.request_json(Method::GET, path, opts).await
    }

    /// POST with parameters in the query string (no body) and decode the
    /// JSON response.
    pub async fn post_json<T>(&self, path: &str, opts: RequestOpts<'_>) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        self.request_json(Method::POST, path, opts).await
    }

    // ==============================
    // Core request implementation
    // ==============================

    async fn request_json<T>(
        &self,
        method: Method,
        path: &str,
        opts: RequestOpts<'_>,
    ) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        let url = self
            .base
            .join(path.trim_start_matches('/'))
            .map_err(|e| HttpError::Url(e.to_string()))?;
        let host_path = format!(
            "{}{}",
            url.host_str().unwrap_or("-"),
            url.path()
        );

        let timeout = self.default_timeout;
        let query = opts.query.unwrap_or_default();
        let pairs: Vec<(&str, &str)> = query.iter().map(|(k, v)| (*k, v.as_ref())).collect();

        let mut rb = self
            .inner
            .request(method.clone(), url.clone())
            .timeout(timeout);
        if !pairs.is_empty() {
            rb = rb.query(&pairs);
        }

        let auth = opts.auth.unwrap_or(Auth::None);
        match &auth {
            Auth::OAuth1(signer) => {
                let header = signer.authorization(method.as_str(), url.as_str(), &pairs)?;
                let value = HeaderValue::from_str(&header)
                    .map_err(|e| HttpError::Build(format!("invalid Authorization header: {e}")))?;
                rb = rb.header(AUTHORIZATION, value);
            }
            Auth::None => {}
        }

        let req_id = format!("r{:x}", REQUEST_SEQ.fetch_add(1, Ordering::Relaxed));
        let redacted_q = redact_query(&query);

        tracing::debug!(
            req_id=%req_id,
            method=%method,
            host_path=%host_path,
            query=?redacted_q,
            timeout_ms=timeout.as_millis() as u64,
            auth_kind=auth.kind(),
            "http.request.start"
        );
        if raw_enabled() {
            let curl = make_curl(&method, &host_path, &redacted_q);
            tracing::debug!(target: "http.raw", %req_id, %curl, "request");
        }

        // ----- Send -----
        let t0 = Instant::now();
        let resp = rb.send().await.map_err(|err| {
            let e = if err.is_timeout() {
                HttpError::Timeout(timeout)
            } else {
                HttpError::Network(err.to_string())
            };
            tracing::warn!(req_id=%req_id, host_path=%host_path, error=%e, "http.network_error.send");
            e
        })?;
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = resp.bytes().await.map_err(|err| {
            let e = HttpError::Network(err.to_string());
            tracing::warn!(req_id=%req_id, host_path=%host_path, error=%e, "http.network_error.body");
            e
        })?;
        let dur_ms = t0.elapsed().as_millis() as u64;

        let request_id = headers
            .get("x-request-id")
            .or_else(|| headers.get("x-transaction-id"))
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-")
            .to_string();
        let header_str = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

        tracing::debug!(
            req_id=%req_id,
            %status,
            duration_ms=dur_ms,
            body_len=bytes.len(),
            x_request_id=%request_id,
            rate_limit.limit=?header_str("x-rate-limit-limit"),
            rate_limit.remaining=?header_str("x-rate-limit-remaining"),
            rate_limit.reset=?header_str("x-rate-limit-reset"),
            "http.response.headers"
        );

        if raw_enabled() {
            let mut body_snip = bytes.to_vec();
            let truncated = body_snip.len() > RAW_MAX_BODY;
            if truncated {
                body_snip.truncate(RAW_MAX_BODY);
            }
            tracing::info!(
                target: "http.raw",
                %req_id,
                status=%status,
                duration_ms=dur_ms,
                headers=?redact_headers(&headers),
                body=%String::from_utf8_lossy(&body_snip),
                truncated
            );
        }

        let snippet = snip_body(&bytes);
        tracing::trace!(req_id=%req_id, body_snippet=%snippet, "http.response.body_snippet");

        if status.is_success() {
            return serde_json::from_slice::<T>(&bytes).map_err(|e| {
                tracing::warn!(
                    req_id=%req_id,
                    serde_line=%e.line(),
                    serde_col=%e.column(),
                    serde_err=%e,
                    body_snippet=%snippet,
                    "http.response.decode_error"
                );
                HttpError::Decode(e.to_string(), snippet)
            });
        }

        let message = extract_error_message(&bytes);
        tracing::warn!(
            req_id=%req_id,
            %status,
            host_path=%host_path,
            message=%message,
            x_request_id=%request_id,
            body_snippet=%snippet,
            "http.error"
        );
        Err(HttpError::Api {
            status,
            message,
            request_id,
        })
    }
}

// ==============================
// Helpers
// ==============================

fn extract_error_message(body: &[u8]) -> String {
    // v1.1: {"errors":[{"code":144,"message":"..."}]}
    // v2:   {"errors":[{"detail":"...","title":"..."}]}
    #[derive(Deserialize)]
    struct Errors {
        errors: Vec<ErrorEntry>,
    }
    #[derive(Deserialize)]
    struct ErrorEntry {
        #[serde(default)]
        code: Option<i64>,
        #[serde(default)]
        message: String,
        #[serde(default)]
        detail: String,
        #[serde(default)]
        title: String,
    }

    // Generic: {"error":"..."} / {"detail":"..."} / {"message":"..."}
    #[derive(Deserialize)]
    struct Msg {
        #[serde(default)]
        message: String,
        #[serde(default)]
        detail: String,
        #[serde(default)]
        error: String,
    }

    if let Ok(env) = serde_json::from_slice::<Errors>(body) {
        if let Some(first) = env.errors.into_iter().next() {
            let text = [first.message, first.detail, first.title]
                .into_iter()
                .find(|s| !s.is_empty())
                .unwrap_or_default();
            return match first.code {
                Some(code) => format!("{text} (code {code})"),
                None => text,
            };
        }
    }
    if let Ok(m) = serde_json::from_slice::<Msg>(body) {
        if let Some(text) = [m.message, m.detail, m.error]
            .into_iter()
            .find(|s| !s.is_empty())
        {
            return text;
        }
    }
    snip_body(body)
}

fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).to_string();
    if snip.len() > SNIPPET_MAX {
        let mut cut = SNIPPET_MAX;
        while !snip.is_char_boundary(cut) {
            cut -= 1;
        }
        snip.truncate(cut);
        snip.push_str("...");
    }
    snip
}
