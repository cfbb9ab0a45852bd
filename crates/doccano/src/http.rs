//! The HTTP boundary.
//!
//! Everything above this module talks to the network through
//! [`HttpTransport`]. The session builds plain [`HttpRequest`] values and gets
//! back buffered [`HttpResponse`]s, so tests can swap in a scripted transport.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Header name/value pairs in wire order. Repeated headers such as
/// `Set-Cookie` keep one entry per value.
pub type HttpHeaders = Vec<(String, String)>;

/// Every value of header `name`, compared case-insensitively.
pub fn header_values<'a>(
    headers: &'a HttpHeaders,
    name: &'a str,
) -> impl Iterator<Item = &'a str> + 'a {
    headers
        .iter()
        .filter(move |(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// First value of header `name`.
#[must_use]
pub fn header_value<'a>(headers: &'a HttpHeaders, name: &'a str) -> Option<&'a str> {
    header_values(headers, name).next()
}

/// A file field of a `multipart/form-data` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartPart {
    pub field: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    pub parts: Vec<MultipartPart>,
}

impl MultipartForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn file(
        mut self,
        field: impl Into<String>,
        file_name: impl Into<String>,
        content_type: Option<&str>,
        data: Vec<u8>,
    ) -> Self {
        self.parts.push(MultipartPart {
            field: field.into(),
            file_name: file_name.into(),
            content_type: content_type.map(Into::into),
            data,
        });
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum HttpBody {
    #[default]
    Empty,
    /// Serialized JSON.
    Json(Vec<u8>),
    Text(String),
    Multipart(MultipartForm),
}

impl HttpBody {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == HttpBody::Empty
    }

    /// Content type to declare. `None` for multipart, whose boundary the
    /// transport picks.
    #[must_use]
    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            HttpBody::Json(_) => Some("application/json"),
            HttpBody::Text(_) => Some("text/plain"),
            HttpBody::Empty | HttpBody::Multipart(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HttpHeaders,
    pub body: HttpBody,
}

impl HttpRequest {
    #[must_use]
    pub fn header<'a>(&'a self, name: &'a str) -> Option<&'a str> {
        header_value(&self.headers, name)
    }

    /// The JSON payload, if the body is JSON.
    #[must_use]
    pub fn json_body(&self) -> Option<serde_json::Value> {
        let HttpBody::Json(bytes) = &self.body else {
            return None;
        };
        serde_json::from_slice(bytes).ok()
    }
}

/// A fully buffered response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HttpHeaders,
    pub body: Vec<u8>,
}

impl HttpResponse {
    #[must_use]
    pub fn header<'a>(&'a self, name: &'a str) -> Option<&'a str> {
        header_value(&self.headers, name)
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The body as UTF-8, with invalid sequences replaced.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Debug, Error)]
pub enum HttpError {
    /// Connection, TLS, timeout or body read failure.
    #[error("http transport error: {0}")]
    Transport(String),
}

/// Sends one request and returns the buffered response.
///
/// Non-2xx statuses are responses, not errors. The session decides what they
/// mean.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError>;
}

pub mod reqwest_transport {
    use super::{
        HttpBody, HttpError, HttpHeaders, HttpMethod, HttpRequest, HttpResponse, HttpTransport,
        MultipartForm, async_trait,
    };
    use crate::config::ClientConfig;

    fn transport_error(err: impl std::fmt::Display) -> HttpError {
        HttpError::Transport(err.to_string())
    }

    impl From<HttpMethod> for reqwest::Method {
        fn from(method: HttpMethod) -> Self {
            match method {
                HttpMethod::Get => reqwest::Method::GET,
                HttpMethod::Post => reqwest::Method::POST,
                HttpMethod::Put => reqwest::Method::PUT,
                HttpMethod::Delete => reqwest::Method::DELETE,
            }
        }
    }

    /// [`HttpTransport`] over a pooled `reqwest::Client`.
    #[derive(Debug, Clone)]
    pub struct ReqwestTransport {
        client: reqwest::Client,
    }

    impl ReqwestTransport {
        pub fn new(client: reqwest::Client) -> Self {
            Self { client }
        }

        /// Apply the timeout and TLS settings of `config`.
        ///
        /// `verify_tls = false` accepts any certificate. A `ca_bundle` PEM
        /// file is added to the trusted roots.
        pub fn from_config(config: &ClientConfig) -> Result<Self, HttpError> {
            let mut builder = reqwest::Client::builder()
                .timeout(config.request_timeout())
                .danger_accept_invalid_certs(!config.verify_tls);

            if let Some(path) = &config.ca_bundle {
                let pem = std::fs::read(path).map_err(|e| {
                    HttpError::Transport(format!("reading CA bundle {}: {e}", path.display()))
                })?;
                let certificate = reqwest::Certificate::from_pem(&pem).map_err(transport_error)?;
                builder = builder.add_root_certificate(certificate);
            }

            builder.build().map(Self::new).map_err(transport_error)
        }
    }

    fn multipart(form: MultipartForm) -> Result<reqwest::multipart::Form, HttpError> {
        form.parts
            .into_iter()
            .try_fold(reqwest::multipart::Form::new(), |form, part| {
                let mut file = reqwest::multipart::Part::bytes(part.data).file_name(part.file_name);
                if let Some(mime) = part.content_type {
                    file = file.mime_str(&mime).map_err(transport_error)?;
                }
                Ok(form.part(part.field, file))
            })
    }

    #[async_trait]
    impl HttpTransport for ReqwestTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
            let builder = request.headers.iter().fold(
                self.client.request(request.method.into(), &request.url),
                |builder, (name, value)| builder.header(name, value),
            );
            let builder = match request.body {
                HttpBody::Empty => builder,
                HttpBody::Json(bytes) => builder.body(bytes),
                HttpBody::Text(text) => builder.body(text),
                HttpBody::Multipart(form) => builder.multipart(multipart(form)?),
            };

            let response = builder.send().await.map_err(transport_error)?;
            let status = response.status().as_u16();
            let headers: HttpHeaders = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    let value = value.to_str().ok()?;
                    Some((name.as_str().to_string(), value.to_string()))
                })
                .collect();
            let body = response.bytes().await.map_err(transport_error)?.to_vec();

            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        }
    }
}

#[cfg(test)]
pub(crate) use mock::{MockTransport, json_response};
