//! Blocking client for the Productive.io v2 JSON:API.
//!
//! # Overview
//! `ApiClient` builds URLs under `https://api.productive.io/api/v2`, stamps
//! every request with the `X-Auth-Token` and `X-Organization-Id` headers,
//! sends it through a pluggable [`Transport`] and returns the decoded JSON
//! body as a `serde_json::Value`. Resource kinds such as bookings are
//! declared as [`ResourceDescriptor`] constants and bound to a client with
//! [`ApiClient::resource`] or the named helpers (`client.bookings()`).
//!
//! ```no_run
//! use productive_core::{ApiClient, ClientConfig, ListParams};
//!
//! let client = ApiClient::new(ClientConfig::new("token", 12345));
//! let page = client
//!     .bookings()
//!     .list(&ListParams::new().filter("person_id", "42").page_size(50), false)?;
//! println!("{}", page["data"]);
//! # Ok::<(), productive_core::ApiError>(())
//! ```
//!
//! # Design
//! - No retries, caching or pagination traversal: each call is one request.
//! - Request payloads are passed through as-is; the caller owns the JSON:API
//!   envelope.
//! - Every transport failure becomes `ApiError::Request` with the status code
//!   preserved when the server answered.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod resource;
pub mod resources;
pub mod transport;

pub use client::ApiClient;
pub use config::{ClientConfig, API_BASE_URL};
pub use error::{ApiError, ConfigError, TransportError};
pub use http::{ContentType, HttpMethod, HttpRequest, HttpResponse, RequestOptions, Transport};
pub use resource::{Capabilities, Capability, ListParams, Resource, ResourceDescriptor};
pub use transport::UreqTransport;
