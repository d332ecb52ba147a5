// Reporting API HTTP client
//
// Wraps `reqwest::Client` with credential injection, short-TTL GET
// caching, scope-filter query merging, and uniform error translation.
// All endpoint groups (auth, usage, instances, endpoints, admin,
// revenue, export) are implemented as inherent methods via separate
// files to keep this module focused on transport mechanics.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use bytes::Bytes;
use reqwest::{Method, StatusCode, header};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace, warn};
use url::Url;

use crate::cache::{DEFAULT_TTL, ResponseCache};
use crate::error::Error;
use crate::session::{AuthMethod, Session};

const USER_AGENT: &str = concat!("simops/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Admin-only tenant/customer scoping applied to every data request.
///
/// Non-admin sessions leave this empty -- their data is already scoped
/// server-side. Changing the scope invalidates the whole response cache
/// so stale unscoped pages never leak into a scoped view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    pub tenant_id: Option<String>,
    pub customer: Option<String>,
}

impl Scope {
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(ref t) = self.tenant_id {
            params.push(("tenant_id", t.clone()));
        }
        if let Some(ref c) = self.customer {
            params.push(("customer", c.clone()));
        }
        params
    }
}

/// A raw file response (CSV export, attachment), never JSON-decoded.
#[derive(Debug)]
pub struct Download {
    pub bytes: Bytes,
    pub content_type: Option<String>,
    /// Parsed from `Content-Disposition: attachment; filename="..."`.
    pub filename: Option<String>,
}

/// Either a decoded JSON body or a raw download, depending on what the
/// server's response headers say it sent.
#[derive(Debug)]
pub(crate) enum Payload {
    Json(Value),
    Download(Download),
}

/// Options for a single request.
#[derive(Default)]
pub(crate) struct RequestOptions {
    pub params: Vec<(&'static str, Option<String>)>,
    pub body: Option<Value>,
    pub skip_cache: bool,
    /// Merge the client's tenant/customer scope into the query.
    pub scoped: bool,
}

/// HTTP client for the reseller reporting API.
///
/// Requires an established [`Session`]; any 401/403 response (or a
/// missing credential) tears the session down before the error reaches
/// the caller. Successful GET bodies are cached for a short TTL keyed
/// by the exact request URL.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session: Arc<Session>,
    cache: ResponseCache,
    scope: RwLock<Scope>,
}

impl ApiClient {
    /// Create a client against `base_url` (e.g.
    /// `https://reporting.example.com/api/v1`).
    pub fn new(base_url: Url, session: Arc<Session>) -> Result<Self, Error> {
        Self::with_cache_ttl(base_url, session, DEFAULT_TTL)
    }

    /// Create a client with a non-default cache TTL (shorter in tests).
    pub fn with_cache_ttl(
        base_url: Url,
        session: Arc<Session>,
        cache_ttl: Duration,
    ) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(Error::Transport)?;
        Ok(Self {
            http,
            base_url,
            session,
            cache: ResponseCache::new(cache_ttl),
            scope: RwLock::new(Scope::default()),
        })
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Replace the tenant/customer scope, clearing the cache.
    pub fn set_scope(&self, scope: Scope) {
        let mut current = self.scope.write().expect("scope lock poisoned");
        if *current != scope {
            *current = scope;
            drop(current);
            self.cache.clear();
        }
    }

    pub fn scope(&self) -> Scope {
        self.scope.read().expect("scope lock poisoned").clone()
    }

    /// Clear the response cache without touching the session.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Tear down session state and the cache together.
    ///
    /// Invoked internally on auth failure; also the local half of
    /// [`logout`](Self::logout).
    pub(crate) fn teardown_session(&self) {
        self.session.clear();
        self.cache.clear();
    }

    // ── URL construction ─────────────────────────────────────────────

    /// Build a full URL from base + path + query params.
    ///
    /// `None` and empty-string values are omitted entirely, matching
    /// the server's expectation that absent filters mean "no filter".
    pub(crate) fn build_url(
        &self,
        path: &str,
        params: &[(&'static str, Option<String>)],
    ) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}{path}"))?;
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                if let Some(v) = value {
                    if !v.is_empty() {
                        query.append_pair(key, v);
                    }
                }
            }
        }
        // `query_pairs_mut` leaves a trailing "?" when nothing was appended.
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }

    // ── Request core ─────────────────────────────────────────────────

    /// Perform an authenticated request, consulting the cache for GETs.
    pub(crate) async fn request(
        &self,
        method: Method,
        path: &str,
        opts: RequestOptions,
    ) -> Result<Payload, Error> {
        let mut params = opts.params;
        if opts.scoped {
            for (key, value) in self.scope().params() {
                params.push((key, Some(value)));
            }
        }
        let url = self.build_url(path, &params)?;

        let Some(token) = self.session.token_value() else {
            warn!("request without credential -- tearing down session");
            self.teardown_session();
            return Err(Error::Unauthenticated);
        };

        let is_get = method == Method::GET;
        if is_get && !opts.skip_cache {
            if let Some(cached) = self.cache.get(url.as_str()) {
                return Ok(Payload::Json(cached));
            }
        }

        debug!("{method} {url}");

        let mut builder = self.http.request(method, url.clone());
        builder = match self.session.auth_method() {
            AuthMethod::Jwt => builder.bearer_auth(&token),
            AuthMethod::ServiceToken => builder.header("CF-Access-Client-Id", &token),
        };
        if let Some(ref body) = opts.body {
            builder = builder.json(body);
        }

        let resp = builder.send().await.map_err(Error::Transport)?;
        let payload = self.handle_response(resp).await?;

        if is_get {
            if let Payload::Json(ref data) = payload {
                self.cache.insert(url.into(), data.clone());
            }
        }

        Ok(payload)
    }

    /// Translate response status and headers into the error taxonomy,
    /// then decode the body as JSON or hand it back raw for downloads.
    async fn handle_response(&self, resp: reqwest::Response) -> Result<Payload, Error> {
        let status = resp.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!("authentication failed (HTTP {status}) -- tearing down session");
            self.teardown_session();
            return Err(Error::Unauthenticated);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_at = resp
                .headers()
                .get("X-RateLimit-Reset")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<i64>().ok())
                .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0));
            return Err(Error::RateLimited { retry_at });
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                message: server_error_message(status.as_u16(), &body),
            });
        }

        // File downloads are flagged by content type or disposition and
        // must reach the caller undecoded.
        if is_download(resp.headers()) {
            let filename = attachment_filename(resp.headers());
            let content_type = resp
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(String::from);
            let bytes = resp.bytes().await.map_err(Error::Transport)?;
            trace!("download payload ({} bytes)", bytes.len());
            return Ok(Payload::Download(Download {
                bytes,
                content_type,
                filename,
            }));
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        let data: Value = serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })?;
        Ok(Payload::Json(data))
    }

    // ── Typed helpers ────────────────────────────────────────────────

    /// Authenticated GET decoded into `T`.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        opts: RequestOptions,
    ) -> Result<T, Error> {
        let payload = self.request(Method::GET, path, opts).await?;
        decode(payload)
    }

    /// Authenticated mutation decoded into `T`.
    ///
    /// Mutations can invalidate any number of cached listings, so the
    /// whole cache is cleared after success. Targeted invalidation is a
    /// possible refinement; listings are cheap to refetch at this scale.
    pub(crate) async fn mutate<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        opts: RequestOptions,
    ) -> Result<T, Error> {
        let payload = self.request(method, path, opts).await?;
        self.cache.clear();
        decode(payload)
    }

    /// Authenticated POST returning a raw download.
    pub(crate) async fn post_download(
        &self,
        path: &str,
        body: Value,
    ) -> Result<Download, Error> {
        let opts = RequestOptions {
            body: Some(body),
            ..RequestOptions::default()
        };
        match self.request(Method::POST, path, opts).await? {
            Payload::Download(download) => Ok(download),
            Payload::Json(data) => Err(Error::Deserialization {
                message: "expected file download, got JSON body".into(),
                body: data.to_string(),
            }),
        }
    }

    // ── Unauthenticated core (login flows) ───────────────────────────

    /// POST without credential injection, for the credential lifecycle
    /// endpoints themselves. Failures surface the server's `error` or
    /// `detail` field when present.
    pub(crate) async fn post_unauthenticated(
        &self,
        path: &str,
        body: Value,
    ) -> Result<Value, Error> {
        let url = self.build_url(path, &[])?;
        debug!("POST {url} (unauthenticated)");

        let resp = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        let data: Value = serde_json::from_str(&body).unwrap_or(Value::Null);

        if !status.is_success() {
            let message = data
                .get("error")
                .or_else(|| data.get("detail"))
                .and_then(Value::as_str)
                .unwrap_or("Login failed")
                .to_owned();
            return Err(Error::Authentication { message });
        }

        Ok(data)
    }
}

fn decode<T: DeserializeOwned>(payload: Payload) -> Result<T, Error> {
    match payload {
        Payload::Json(data) => {
            let body = data.to_string();
            serde_json::from_value(data).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body,
            })
        }
        Payload::Download(_) => Err(Error::Deserialization {
            message: "expected JSON body, got file download".into(),
            body: String::new(),
        }),
    }
}

/// Pull the server's `error` field out of an error body, falling back
/// to a generic status line when the body is not JSON.
fn server_error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .as_ref()
        .and_then(|v| v.get("error"))
        .and_then(Value::as_str)
        .map_or_else(|| format!("API error: {status}"), str::to_owned)
}

/// A response is a download when it says CSV or carries an attachment
/// disposition header.
fn is_download(headers: &header::HeaderMap) -> bool {
    let csv = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("text/csv"));
    csv || headers.contains_key(header::CONTENT_DISPOSITION)
}

fn attachment_filename(headers: &header::HeaderMap) -> Option<String> {
    let disposition = headers
        .get(header::CONTENT_DISPOSITION)?
        .to_str()
        .ok()?;
    let (_, rest) = disposition.split_once("filename=")?;
    Some(rest.trim_matches(|c| c == '"' || c == ' ' || c == ';').to_owned())
}
