//! Default blocking transport backed by `ureq`.

use std::time::Duration;

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};

/// A [`Transport`] that performs real HTTP calls with a shared `ureq::Agent`.
///
/// The agent keeps its own connection pool and is safe to use from several
/// threads at once.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    /// Create a transport whose every request is bounded by `timeout`.
    /// A zero `timeout` means no limit.
    pub fn new(timeout: Duration) -> Self {
        let timeout = (!timeout.is_zero()).then_some(timeout);
        let agent = ureq::Agent::config_builder()
            .timeout_global(timeout)
            // Statuses are classified below so the body can be kept.
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

fn decorate<B>(builder: ureq::RequestBuilder<B>, request: &HttpRequest) -> ureq::RequestBuilder<B> {
    let mut builder = builder.query_pairs(
        request
            .query
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str())),
    );
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.url.as_str();
        let result = match (request.method, request.body.as_deref()) {
            (HttpMethod::Get, _) => decorate(self.agent.get(url), &request).call(),
            (HttpMethod::Delete, _) => decorate(self.agent.delete(url), &request).call(),
            (HttpMethod::Post, Some(body)) => decorate(self.agent.post(url), &request).send(body),
            (HttpMethod::Post, None) => decorate(self.agent.post(url), &request).send_empty(),
            (HttpMethod::Patch, Some(body)) => decorate(self.agent.patch(url), &request).send(body),
            (HttpMethod::Patch, None) => decorate(self.agent.patch(url), &request).send_empty(),
        };

        let mut response = match result {
            Ok(response) => response,
            Err(ureq::Error::Timeout(_)) => return Err(TransportError::Timeout),
            Err(ureq::Error::HostNotFound) => {
                return Err(TransportError::Connection("host not found".to_owned()))
            }
            Err(ureq::Error::ConnectionFailed) => {
                return Err(TransportError::Connection("connection failed".to_owned()))
            }
            Err(ureq::Error::Io(e)) => return Err(TransportError::Connection(e.to_string())),
            Err(e) => return Err(TransportError::Other(e.to_string())),
        };

        let status = response.status().as_u16();
        let body = match response.body_mut().read_to_string() {
            Ok(body) => body,
            Err(ureq::Error::Timeout(_)) => return Err(TransportError::Timeout),
            Err(e) => return Err(TransportError::Connection(e.to_string())),
        };

        if !(200..300).contains(&status) {
            return Err(TransportError::Status { status, body });
        }
        Ok(HttpResponse { status, body })
    }
}
