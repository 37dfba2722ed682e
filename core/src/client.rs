//! Request dispatcher for the Productive API.
//!
//! # Design
//! `ApiClient` is the single choke point for outbound calls. Every
//! operation resolves a URL, builds fresh `RequestOptions`, and goes through
//! [`ApiClient::send`], which stamps the credential headers, runs the
//! transport exactly once and decodes the body. Nothing is cached and
//! nothing is retried.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{
    ContentType, HttpMethod, HttpRequest, RequestOptions, Transport, AUTH_TOKEN_HEADER,
    ORGANIZATION_ID_HEADER,
};
use crate::resource::{ListParams, Resource, ResourceDescriptor};
use crate::transport::UreqTransport;

/// Client for the Productive v2 API.
///
/// Generic over the [`Transport`]; [`ApiClient::new`] uses
/// [`UreqTransport`] configured with the client's timeout.
#[derive(Debug)]
pub struct ApiClient<T: Transport = UreqTransport> {
    config: ClientConfig,
    transport: T,
}

impl ApiClient<UreqTransport> {
    pub fn new(config: ClientConfig) -> Self {
        let transport = UreqTransport::new(config.timeout());
        Self { config, transport }
    }
}

impl<T: Transport> ApiClient<T> {
    /// Build a client around an already configured transport.
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Bind a resource descriptor to this client.
    pub fn resource(&self, descriptor: ResourceDescriptor) -> Resource<'_, T> {
        Resource::new(self, descriptor)
    }

    /// Join `path` onto the base URL, inserting the leading `/` if missing.
    pub fn build_url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.config.base_url())
        } else {
            format!("{}/{path}", self.config.base_url())
        }
    }

    /// Dispatch one request and decode the JSON response.
    ///
    /// `X-Auth-Token` and `X-Organization-Id` always carry the configured
    /// values, replacing anything already present in `options`. An empty
    /// body decodes to `Value::Null`.
    pub fn send(
        &self,
        method: HttpMethod,
        url: &str,
        mut options: RequestOptions,
    ) -> Result<Value, ApiError> {
        options.headers.retain(|name, _| {
            !name.eq_ignore_ascii_case(AUTH_TOKEN_HEADER)
                && !name.eq_ignore_ascii_case(ORGANIZATION_ID_HEADER)
        });
        options
            .headers
            .insert(AUTH_TOKEN_HEADER.to_string(), self.config.auth_token().to_string());
        options.headers.insert(
            ORGANIZATION_ID_HEADER.to_string(),
            self.config.organization_id().to_string(),
        );

        let body = options.json.as_ref().map(serde_json::to_string).transpose()?;
        let request = HttpRequest {
            method,
            url: url.to_string(),
            headers: options.headers.into_iter().collect(),
            query: options.query.unwrap_or_default().into_iter().collect(),
            body,
        };

        tracing::debug!(%method, url, "dispatching productive request");
        let response = self.transport.execute(request).map_err(|err| {
            tracing::warn!(%method, url, error = %err, "productive request failed");
            ApiError::from(err)
        })?;
        tracing::debug!(%method, url, status = response.status, "productive request completed");

        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&response.body)?)
    }

    /// GET a collection. `aggregates` adds an empty `aggregates` query key.
    pub fn list(&self, path: &str, params: &ListParams, aggregates: bool) -> Result<Value, ApiError> {
        let url = self.build_url(path);
        let mut query: BTreeMap<String, String> = params.clone().into_inner();
        if aggregates {
            query.insert("aggregates".to_string(), String::new());
        }
        let options = RequestOptions::new()
            .with_content_type(ContentType::JsonApi)
            .with_query(query);
        self.send(HttpMethod::Get, &url, options)
    }

    pub fn get(&self, path: &str, id: &str) -> Result<Value, ApiError> {
        let url = self.build_url(&format!("{path}/{id}"));
        let options = RequestOptions::new().with_content_type(ContentType::JsonApi);
        self.send(HttpMethod::Get, &url, options)
    }

    pub fn create<P: Serialize + ?Sized>(&self, path: &str, payload: &P) -> Result<Value, ApiError> {
        let url = self.build_url(path);
        let options = RequestOptions::new()
            .with_json(serde_json::to_value(payload)?)
            .with_content_type(ContentType::JsonApi);
        self.send(HttpMethod::Post, &url, options)
    }

    /// PATCH `path/id` with `payload` as the body.
    pub fn update<P: Serialize + ?Sized>(
        &self,
        path: &str,
        id: &str,
        payload: &P,
    ) -> Result<Value, ApiError> {
        let url = self.build_url(&format!("{path}/{id}"));
        let options = RequestOptions::new()
            .with_json(serde_json::to_value(payload)?)
            .with_content_type(ContentType::JsonApi);
        self.send(HttpMethod::Patch, &url, options)
    }

    pub fn delete(&self, path: &str, id: &str) -> Result<Value, ApiError> {
        let url = self.build_url(&format!("{path}/{id}"));
        let options = RequestOptions::new().with_content_type(ContentType::JsonApi);
        self.send(HttpMethod::Delete, &url, options)
    }
}
