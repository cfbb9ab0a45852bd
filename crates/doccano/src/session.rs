//! Authenticated session and raw verb calls against the `/v1` API.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::{ApiError, DoccanoError, Result, short_error_message};
use crate::http::reqwest_transport::ReqwestTransport;
use crate::http::{
    HttpBody, HttpHeaders, HttpMethod, HttpRequest, HttpResponse, HttpTransport, MultipartForm,
    header_values,
};
use crate::retry::{RetryConfig, with_retry};

const CSRF_COOKIE: &str = "csrftoken";
const CSRF_HEADER: &str = "X-CSRFToken";

#[derive(Debug, Default)]
struct SessionState {
    cookies: BTreeMap<String, String>,
    csrf_token: Option<String>,
    token: Option<String>,
}

/// Low-level API client shared by every repository.
///
/// Clones share one session: cookies, CSRF token and auth token set through
/// any clone are visible to all of them.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    api_url: String,
    state: Arc<Mutex<SessionState>>,
    retry: RetryConfig,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl ApiClient {
    /// Create a client backed by reqwest.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::from_config(config)
            .map_err(|e| DoccanoError::Config(e.to_string()))?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: &ClientConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            base_url: config.base_url().to_string(),
            api_url: config.api_url(),
            state: Arc::new(Mutex::new(SessionState::default())),
            retry: RetryConfig::from(&config.retry),
        }
    }

    #[must_use]
    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `base_url` + `/v1`.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn is_authenticated(&self) -> bool {
        let state = self.state();
        state.csrf_token.is_some() || state.token.is_some()
    }

    /// Current CSRF token captured at login.
    pub fn csrf_token(&self) -> Option<String> {
        self.state().csrf_token.clone()
    }

    /// Use token authentication instead of a cookie session.
    pub fn set_token(&self, token: impl Into<String>) {
        self.state().token = Some(token.into());
    }

    /// Log in with username and password.
    ///
    /// On success the `csrftoken` cookie is captured and sent as
    /// `X-CSRFToken` on every later request.
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        #[derive(Serialize)]
        struct Credentials<'a> {
            username: &'a str,
            password: &'a str,
        }

        self.send(
            HttpMethod::Post,
            "auth/login/",
            json_body(&Credentials { username, password })?,
        )
        .await?;

        let mut state = self.state();
        match state.cookies.get(CSRF_COOKIE).cloned() {
            Some(token) => state.csrf_token = Some(token),
            None => tracing::warn!("Login succeeded but no {} cookie was set", CSRF_COOKIE),
        }
        drop(state);

        tracing::info!("Logged in to {} as {}", self.base_url, username);
        Ok(())
    }

    /// Log out and forget every credential held by the session.
    pub async fn logout(&self) -> Result<()> {
        let result = self.send(HttpMethod::Post, "auth/logout/", HttpBody::Empty).await;

        let mut state = self.state();
        state.cookies.clear();
        state.csrf_token = None;
        state.token = None;
        drop(state);

        result?;
        tracing::info!("Logged out of {}", self.base_url);
        Ok(())
    }

    /// Build the absolute URL for `resource`.
    ///
    /// Resources are relative to the API root. Absolute URLs are used as-is.
    pub fn url_for(&self, resource: &str) -> String {
        if resource.starts_with(&self.api_url)
            || resource.starts_with("http://")
            || resource.starts_with("https://")
        {
            return resource.to_string();
        }
        format!("{}/{}", self.api_url, resource.trim_start_matches('/'))
    }

    fn headers_for(&self, body: &HttpBody, accept: &str) -> HttpHeaders {
        let mut headers: HttpHeaders = vec![
            ("Accept".to_string(), accept.to_string()),
            ("Referer".to_string(), self.base_url.clone()),
        ];
        if let Some(content_type) = body.content_type() {
            headers.push(("Content-Type".to_string(), content_type.to_string()));
        }

        let state = self.state();
        if !state.cookies.is_empty() {
            let cookie = state
                .cookies
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("; ");
            headers.push(("Cookie".to_string(), cookie));
        }
        if let Some(ref csrf) = state.csrf_token {
            headers.push((CSRF_HEADER.to_string(), csrf.clone()));
        }
        if let Some(ref token) = state.token {
            headers.push(("Authorization".to_string(), format!("Token {token}")));
        }
        headers
    }

    fn absorb_cookies(&self, response: &HttpResponse) {
        let mut state = self.state();
        for raw in header_values(&response.headers, "set-cookie") {
            let Ok(parsed) = cookie::Cookie::parse(raw) else {
                tracing::debug!("Ignoring malformed Set-Cookie header: {}", raw);
                continue;
            };
            let name = parsed.name().to_string();
            let expired = parsed.value().is_empty()
                || parsed.max_age().is_some_and(|age| age.is_zero() || age.is_negative());
            if expired {
                state.cookies.remove(&name);
                continue;
            }
            if name == CSRF_COOKIE && state.csrf_token.is_some() {
                state.csrf_token = Some(parsed.value().to_string());
            }
            state.cookies.insert(name, parsed.value().to_string());
        }
    }

    async fn send_once(&self, request: HttpRequest) -> Result<HttpResponse> {
        tracing::debug!("{} {}", request.method, request.url);
        let method = request.method;
        let url = request.url.clone();

        let response = self.transport.send(request).await?;
        self.absorb_cookies(&response);

        if !response.is_success() {
            return Err(ApiError::from_response(method, url, response).into());
        }
        Ok(response)
    }

    /// Send a request and normalise any non-2xx status into an API error.
    ///
    /// GET requests are retried on transient failures.
    pub async fn send(
        &self,
        method: HttpMethod,
        resource: &str,
        body: HttpBody,
    ) -> Result<HttpResponse> {
        self.send_accepting(method, resource, body, "application/json")
            .await
    }

    /// Like [`ApiClient::send`] with a custom `Accept` header.
    pub async fn send_accepting(
        &self,
        method: HttpMethod,
        resource: &str,
        body: HttpBody,
        accept: &str,
    ) -> Result<HttpResponse> {
        let url = self.url_for(resource);
        let headers = self.headers_for(&body, accept);
        let request = HttpRequest {
            method,
            url,
            headers,
            body,
        };

        if method != HttpMethod::Get {
            return self.send_once(request).await;
        }

        let what = format!("GET {}", request.url);
        with_retry(
            || self.send_once(request.clone()),
            &self.retry,
            DoccanoError::is_retryable,
            short_error_message,
            &what,
        )
        .await
    }

    pub async fn get<T: DeserializeOwned>(&self, resource: &str) -> Result<T> {
        let response = self.send(HttpMethod::Get, resource, HttpBody::Empty).await?;
        decode(&response)
    }

    pub async fn get_raw(&self, resource: &str) -> Result<HttpResponse> {
        self.send(HttpMethod::Get, resource, HttpBody::Empty).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        resource: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .send(HttpMethod::Post, resource, json_body(body)?)
            .await?;
        decode(&response)
    }

    pub async fn post_multipart(
        &self,
        resource: &str,
        form: MultipartForm,
    ) -> Result<HttpResponse> {
        self.send(HttpMethod::Post, resource, HttpBody::Multipart(form))
            .await
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        resource: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .send(HttpMethod::Put, resource, json_body(body)?)
            .await?;
        decode(&response)
    }

    pub async fn delete(&self, resource: &str) -> Result<()> {
        self.send(HttpMethod::Delete, resource, HttpBody::Empty)
            .await
            .map(|_| ())
    }

    /// DELETE with a JSON body, as used by bulk deletes.
    pub async fn delete_with<B: Serialize + ?Sized>(&self, resource: &str, body: &B) -> Result<()> {
        self.send(HttpMethod::Delete, resource, json_body(body)?)
            .await
            .map(|_| ())
    }
}

pub(crate) fn json_body<B: Serialize + ?Sized>(body: &B) -> Result<HttpBody> {
    Ok(HttpBody::Json(serde_json::to_vec(body)?))
}

/// Decode a JSON response. An empty body decodes as JSON `null`.
pub(crate) fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T> {
    if response.body.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::from_value(serde_json::Value::Null)?);
    }
    Ok(serde_json::from_slice(&response.body)?)
}

/// Append URL-encoded query parameters to `resource`.
pub(crate) fn with_query(resource: &str, params: &[(&str, String)]) -> String {
    if params.is_empty() {
        return resource.to_string();
    }
    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())))
        .finish();
    let sep = if resource.contains('?') { '&' } else { '?' };
    format!("{resource}{sep}{query}")
}

#[cfg(test)]
pub(crate) const TEST_BASE_URL: &str = "https://doccano.test";

/// Session against [`TEST_BASE_URL`] with retries disabled.
#[cfg(test)]
pub(crate) fn mock_client(transport: &crate::http::MockTransport) -> ApiClient {
    ApiClient::with_transport(
        &ClientConfig::new(TEST_BASE_URL),
        Arc::new(transport.clone()),
    )
    .with_retry_config(RetryConfig::disabled())
}

/// Absolute API URL for `resource` under [`TEST_BASE_URL`].
#[cfg(test)]
pub(crate) fn api(resource: &str) -> String {
    format!("{TEST_BASE_URL}/v1/{resource}")
}
