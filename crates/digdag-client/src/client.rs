//! Main client implementation.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT_ENCODING, AUTHORIZATION, CONTENT_TYPE, COOKIE,
    PROXY_AUTHORIZATION, SET_COOKIE, USER_AGENT,
};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};
use url::{Position, Url};

use crate::api::{AttemptsApi, LogsApi, ProjectsApi, SessionsApi, TasksApi, WorkflowsApi};
use crate::config::{ClientConfig, DEFAULT_BASE_URL};
use crate::error::{Error, Result};
use crate::response::ApiResponse;

/// User agent advertised on every request.
pub const DEFAULT_USER_AGENT: &str = concat!("digdag-client/", env!("CARGO_PKG_VERSION"));

/// `tracing` target used for verbose request/response dumps.
pub const DUMP_TARGET: &str = "digdag_client::dump";

/// Per-call request options.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Query parameters, encoded in key order. Setting a key twice keeps the
    /// last value.
    pub params: BTreeMap<String, String>,
    /// Raw entity body.
    pub body: Option<Vec<u8>>,
}

impl RequestOptions {
    /// Empty options: no query, no body.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Set a raw body.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `body` as JSON and use it as the request body.
    pub fn json<B: Serialize + ?Sized>(self, body: &B) -> Result<Self> {
        Ok(self.body(serde_json::to_vec(body)?))
    }
}

/// Digdag API client.
///
/// Provides typed access to the Digdag server endpoints. Configuration is
/// fixed at construction; [`DigdagClient::with_header`] returns a new client
/// instead of mutating this one.
///
/// # Example
///
/// ```no_run
/// use digdag_client::DigdagClient;
///
/// # async fn example() -> digdag_client::Result<()> {
/// let client = DigdagClient::new("http://localhost:65432", false)?;
///
/// let projects = client.projects().list().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct DigdagClient {
    /// Inner shared state.
    inner: Arc<ClientInner>,
}

/// Inner client state (shared across clones).
pub(crate) struct ClientInner {
    /// HTTP client.
    pub(crate) http: reqwest::Client,
    /// Base URL; its path is a prefix for every API path.
    pub(crate) base_url: Url,
    /// Caller headers, applied after the defaults.
    pub(crate) headers: HeaderMap,
    /// Dump requests and responses.
    pub(crate) verbose: bool,
    /// Request timeout.
    pub(crate) timeout: Option<Duration>,
}

impl std::fmt::Debug for DigdagClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DigdagClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("verbose", &self.inner.verbose)
            .field("timeout", &self.inner.timeout)
            .finish_non_exhaustive()
    }
}

impl DigdagClient {
    /// Create a client for `base_url`. An empty string means
    /// `http://localhost:65432`.
    pub fn new(base_url: &str, verbose: bool) -> Result<Self> {
        Self::builder().base_url(base_url).verbose(verbose).build()
    }

    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Whether request/response dumps are enabled.
    pub fn is_verbose(&self) -> bool {
        self.inner.verbose
    }

    /// Custom headers sent with every request.
    pub fn headers(&self) -> &HeaderMap {
        &self.inner.headers
    }

    /// Return a copy of this client that also sends `name: value`.
    ///
    /// The connection pool is shared with the original client; the original's
    /// headers are left untouched.
    pub fn with_header(&self, name: &str, value: &str) -> Result<Self> {
        let mut headers = self.inner.headers.clone();
        let (name, value) = parse_header(name, value)?;
        headers.insert(name, value);

        Ok(Self {
            inner: Arc::new(ClientInner {
                http: self.inner.http.clone(),
                base_url: self.inner.base_url.clone(),
                headers,
                verbose: self.inner.verbose,
                timeout: self.inner.timeout,
            }),
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access the projects API.
    pub fn projects(&self) -> ProjectsApi {
        ProjectsApi::new(self.clone())
    }

    /// Access the workflows API.
    pub fn workflows(&self) -> WorkflowsApi {
        WorkflowsApi::new(self.clone())
    }

    /// Access the sessions API.
    pub fn sessions(&self) -> SessionsApi {
        SessionsApi::new(self.clone())
    }

    /// Access the attempts API.
    pub fn attempts(&self) -> AttemptsApi {
        AttemptsApi::new(self.clone())
    }

    /// Access the tasks API.
    pub fn tasks(&self) -> TasksApi {
        TasksApi::new(self.clone())
    }

    /// Access the logs API.
    pub fn logs(&self) -> LogsApi {
        LogsApi::new(self.clone())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Request core
    // ─────────────────────────────────────────────────────────────────────────

    /// Build a URL for an API path, keeping the base URL's path as a prefix.
    pub(crate) fn url(&self, path: &str) -> Result<Url> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| not_a_base(&self.inner.base_url))?
            .pop_if_empty()
            .extend(path.split('/').filter(|s| !s.is_empty()));
        Ok(url)
    }

    /// Send one request and classify the response by status.
    ///
    /// Statuses outside `[200, 400)` come back as [`Error::Server`], which
    /// still carries the status and body.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<ApiResponse> {
        let mut url = self.url(path)?;
        if !options.params.is_empty() {
            url.query_pairs_mut().extend_pairs(options.params.iter());
        }

        let mut headers = HeaderMap::new();
        if options.body.is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip"));
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
        for (name, value) in &self.inner.headers {
            headers.insert(name.clone(), value.clone());
        }

        if self.inner.verbose {
            info!(
                target: DUMP_TARGET,
                "{}",
                dump_request(&method, &url, &headers, options.body.as_deref())
            );
        }
        debug!(%method, %url, "sending request");

        let mut builder = self
            .inner
            .http
            .request(method.clone(), url.clone())
            .headers(headers);
        if let Some(timeout) = self.inner.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(body) = options.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let response_headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();
        let response = ApiResponse::new(status, response_headers, body);

        debug!(%method, %url, status = status.as_u16(), "received response");
        if self.inner.verbose {
            info!(target: DUMP_TARGET, "{}", dump_response(&response));
        }

        if !(200..400).contains(&status.as_u16()) {
            return Err(Error::Server {
                status: status.as_u16(),
                status_line: response.status_line(),
                body: response.text(),
            });
        }

        Ok(response)
    }

    /// Make a GET request.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(Method::GET, path, RequestOptions::new())
            .await?
            .json()
    }

    /// Make a GET request with query parameters.
    pub(crate) async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T> {
        self.request(Method::GET, path, options).await?.json()
    }

    /// Make a PUT request with a JSON body.
    pub(crate) async fn put<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let options = RequestOptions::new().json(body)?;
        self.request(Method::PUT, path, options).await?.json()
    }

    /// Make a POST request whose response body is not needed.
    pub(crate) async fn post_no_content<B>(&self, path: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let options = RequestOptions::new().json(body)?;
        self.request(Method::POST, path, options).await?;
        Ok(())
    }
}

fn not_a_base(url: &Url) -> Error {
    Error::Config(format!("{} cannot be used as a base URL", url))
}

fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue)> {
    let header_name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| Error::Config(format!("Invalid header name: {}", name)))?;
    let mut header_value = HeaderValue::from_str(value)
        .map_err(|_| Error::Config(format!("Invalid value for header {}", name)))?;
    if is_credential_header(&header_name) {
        header_value.set_sensitive(true);
    }
    Ok((header_name, header_value))
}

fn dump_request(method: &Method, url: &Url, headers: &HeaderMap, body: Option<&[u8]>) -> String {
    let mut out = format!("{} {} HTTP/1.1\r\n", method, &url[Position::BeforePath..]);
    out.push_str(&format!(
        "Host: {}\r\n",
        &url[Position::BeforeHost..Position::AfterPort]
    ));
    push_headers(&mut out, headers);
    if let Some(body) = body {
        out.push_str(&body_preview(body));
    }
    out
}

fn dump_response(response: &ApiResponse) -> String {
    let mut out = format!("HTTP/1.1 {}\r\n", response.status_line());
    push_headers(&mut out, response.headers());
    match response.decoded_body() {
        Ok(body) => out.push_str(&body_preview(&body)),
        Err(_) => out.push_str(&body_preview(response.body())),
    }
    out
}

fn is_credential_header(name: &HeaderName) -> bool {
    *name == AUTHORIZATION || *name == PROXY_AUTHORIZATION || *name == COOKIE || *name == SET_COOKIE
}

fn push_headers(out: &mut String, headers: &HeaderMap) {
    for (name, value) in headers {
        let shown = if value.is_sensitive() || is_credential_header(name) {
            "<redacted>"
        } else {
            value.to_str().unwrap_or("<non-ascii>")
        };
        out.push_str(&format!("{}: {}\r\n", name, shown));
    }
    out.push_str("\r\n");
}

fn body_preview(body: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(body) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(format!("<{} bytes of binary data>", body.len())),
    }
}

/// Builder for creating a DigdagClient.
#[derive(Debug, Default)]
pub struct ClientBuilder {
    base_url: Option<String>,
    verbose: bool,
    timeout: Option<Duration>,
    headers: Vec<(String, String)>,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from serialized settings.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            base_url: Some(config.base_url.clone()),
            verbose: config.verbose,
            timeout: config.timeout(),
            headers: config
                .headers
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    /// Set the base URL for the server.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Enable request/response dumps.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Add a header sent with every request. Overrides a default header of
    /// the same name.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<DigdagClient> {
        let base_url = match self.base_url.as_deref() {
            None | Some("") => DEFAULT_BASE_URL,
            Some(url) => url,
        };
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(not_a_base(&base_url));
        }

        let mut headers = HeaderMap::new();
        for (name, value) in &self.headers {
            let (name, value) = parse_header(name, value)?;
            headers.insert(name, value);
        }

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(DigdagClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                headers,
                verbose: self.verbose,
                timeout: self.timeout,
            }),
        })
    }
}
