//! Main ApiClient

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use reqwest::Client;
use reqwest::header::AUTHORIZATION;
pub use reqwest::Method;
use url::Url;

use crate::auth::AccessToken;
use crate::error::ApiError;

/// HTTP client bound to the dashboard API base URL.
///
/// This client is cheap to clone (uses `Arc` internally) and can be shared
/// across tasks safely.
///
/// # Example
///
/// ```ignore
/// use schoolboard_lib::ApiClient;
///
/// let client = ApiClient::builder()
///     .base_url("https://api.example.com")
///     .timeout(Duration::from_secs(30))
///     .build();
/// ```
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    base_url: String,
    http_client: Client,
    timeout: Option<Duration>,
}

impl ApiClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> ApiClientBuilder<Missing> {
        ApiClientBuilder::new()
    }

    /// Returns the base URL requests are resolved against.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Resolves a request path against the base URL.
    ///
    /// Absolute URLs are used as-is.
    pub fn resolve(&self, path: &str) -> Result<Url, ApiError> {
        if let Ok(url) = Url::parse(path) {
            return Ok(url);
        }
        let joined = format!(
            "{}/{}",
            self.inner.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", joined, e)))
    }

    /// Sends one request with a bearer token and returns the JSON body.
    ///
    /// An empty success body yields `serde_json::Value::Null`.
    pub async fn send(
        &self,
        request: &ApiRequest,
        token: &AccessToken,
    ) -> Result<serde_json::Value, ApiError> {
        let url = self.resolve(&request.path)?;
        debug!("{} {}", request.method, url);

        let mut builder = self
            .inner
            .http_client
            .request(request.method.clone(), url)
            .header(AUTHORIZATION, token.authorization());

        for (name, value) in &request.options.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.options.query.is_empty() {
            builder = builder.query(&request.options.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let timeout = request.options.timeout.or(self.inner.timeout);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(|e| match timeout {
            Some(duration) if e.is_timeout() => ApiError::Timeout(duration),
            _ => ApiError::Network(e),
        })?;

        let status = response.status();
        let body = response.text().await.map_err(ApiError::from)?;

        if !status.is_success() {
            let message = if body.is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                body
            };
            return Err(ApiError::http(status.as_u16(), message));
        }

        if body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }

        serde_json::from_str(&body)
            .map_err(|e| ApiError::parse_with_body(e.to_string(), body))
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .field("timeout", &self.inner.timeout)
            .finish()
    }
}

// =============================================================================
// Requests
// =============================================================================

/// Per-request options layered on top of method, path and payload.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Extra request headers.
    pub headers: Vec<(String, String)>,
    /// Query string parameters.
    pub query: Vec<(String, String)>,
    /// Overrides the client-wide timeout.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a request header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Adds a query parameter.
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// One request: method, path relative to the base URL, JSON payload, options.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
    pub options: RequestOptions,
}

impl ApiRequest {
    /// Creates a `POST` request to `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            body: None,
            options: RequestOptions::default(),
        }
    }

    /// Sets the HTTP method.
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the JSON payload.
    pub fn payload(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets the request options.
    pub fn options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing an [`ApiClient`].
///
/// Uses the typestate pattern so `build` is only available once the base
/// URL is set.
pub struct ApiClientBuilder<BaseUrl> {
    base_url: BaseUrl,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl ApiClientBuilder<Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            base_url: Missing,
            timeout: None,
            connect_timeout: None,
            http_client: None,
        }
    }

    /// Sets the API base URL.
    pub fn base_url(self, url: impl Into<String>) -> ApiClientBuilder<Set<String>> {
        ApiClientBuilder {
            base_url: Set(url.into()),
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl Default for ApiClientBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> ApiClientBuilder<U> {
    /// Sets the default timeout for all requests.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connect timeout used when building the HTTP client.
    ///
    /// Ignored when a custom client is supplied.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Uses a preconfigured `reqwest::Client`.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl ApiClientBuilder<Set<String>> {
    /// Builds the client.
    pub fn build(self) -> ApiClient {
        let http_client = self.http_client.unwrap_or_else(|| {
            let mut builder = Client::builder();
            if let Some(timeout) = self.connect_timeout {
                builder = builder.connect_timeout(timeout);
            }
            builder.build().unwrap_or_default()
        });

        ApiClient {
            inner: Arc::new(ApiClientInner {
                base_url: self.base_url.0,
                http_client,
                timeout: self.timeout,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::builder().base_url("http://localhost:8080/api/").build()
    }

    #[test]
    fn test_resolve_relative_path() {
        let url = client().resolve("/school/list").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/school/list");
    }

    #[test]
    fn test_resolve_absolute_url() {
        let url = client().resolve("https://other.example.com/x").unwrap();
        assert_eq!(url.as_str(), "https://other.example.com/x");
    }

    #[test]
    fn test_resolve_invalid_base() {
        let client = ApiClient::builder().base_url("not a url").build();
        assert!(matches!(client.resolve("x"), Err(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn test_request_defaults_to_post() {
        let request = ApiRequest::new("school");
        assert_eq!(request.method, Method::POST);
        assert!(request.body.is_none());
    }
}
