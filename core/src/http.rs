//! HTTP request/response values and the transport seam.
//!
//! # Design
//! Requests and responses are plain data. `ApiClient` assembles an
//! `HttpRequest`, hands it to a [`Transport`], and decodes whatever comes
//! back. Swapping the transport (a recording double in tests, a different
//! HTTP stack in production) never touches request construction.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::TransportError;

pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";
pub const ORGANIZATION_ID_HEADER: &str = "X-Organization-Id";
pub const CONTENT_TYPE_HEADER: &str = "Content-Type";

/// HTTP method for a request. `update` uses `Patch`; there is no `Put`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON:API media types understood by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentType {
    #[default]
    JsonApi,
    /// Bulk extension. Declared for callers building batched requests by hand.
    Bulk,
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::JsonApi => "application/vnd.api+json",
            ContentType::Bulk => "application/vnd.api+json; ext=bulk",
        }
    }
}

/// Per-call request options: headers, query string and JSON body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub headers: BTreeMap<String, String>,
    pub query: Option<BTreeMap<String, String>>,
    pub json: Option<Value>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy of these options with the `Content-Type` header set.
    /// `self` is left untouched.
    #[must_use]
    pub fn with_content_type(&self, content_type: ContentType) -> Self {
        let mut options = self.clone();
        options
            .headers
            .retain(|name, _| !name.eq_ignore_ascii_case(CONTENT_TYPE_HEADER));
        options
            .headers
            .insert(CONTENT_TYPE_HEADER.to_string(), content_type.as_str().to_string());
        options
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Attach a query map. An empty map is dropped so no `?` is emitted.
    #[must_use]
    pub fn with_query(mut self, query: BTreeMap<String, String>) -> Self {
        self.query = if query.is_empty() { None } else { Some(query) };
        self
    }

    #[must_use]
    pub fn with_json(mut self, body: Value) -> Self {
        self.json = Some(body);
        self
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE_HEADER).map(String::as_str)
    }
}

/// A fully resolved HTTP request as handed to a [`Transport`].
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Look up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// A successful (2xx) HTTP response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Anything that can execute an `HttpRequest`.
///
/// Implementations report non-2xx answers as [`TransportError::Status`] so
/// the dispatcher only ever decodes successful bodies. Transports must be
/// shareable across threads; `ApiClient` holds one for its whole lifetime.
pub trait Transport: Send + Sync {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}
