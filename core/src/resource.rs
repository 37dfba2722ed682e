//! Declarative resource descriptors and the CRUD surface bound to them.
//!
//! # Design
//! A resource kind is nothing more than a base path and the set of
//! operations the service allows on it. `ResourceDescriptor` is `Copy` and
//! const-constructible, so the catalogue in [`crate::resources`] is a list of
//! constants. `Resource` pairs a descriptor with a borrowed `ApiClient` and
//! forwards each operation, refusing the ones the descriptor does not declare
//! before any request is built.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::BitOr;

use serde::Serialize;
use serde_json::Value;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::http::Transport;

/// One operation a resource may support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl Capability {
    const fn bit(self) -> u8 {
        match self {
            Capability::List => 1,
            Capability::Get => 1 << 1,
            Capability::Create => 1 << 2,
            Capability::Update => 1 << 3,
            Capability::Delete => 1 << 4,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::List => "list",
            Capability::Get => "get",
            Capability::Create => "create",
            Capability::Update => "update",
            Capability::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Bitset of [`Capability`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities(u8);

impl Capabilities {
    pub const NONE: Self = Self(0);
    pub const LIST: Self = Self(Capability::List.bit());
    pub const GET: Self = Self(Capability::Get.bit());
    pub const CREATE: Self = Self(Capability::Create.bit());
    pub const UPDATE: Self = Self(Capability::Update.bit());
    pub const DELETE: Self = Self(Capability::Delete.bit());
    /// List and get.
    pub const READ: Self = Self::LIST.union(Self::GET);
    /// Everything except delete.
    pub const READ_WRITE: Self = Self::READ.union(Self::CREATE).union(Self::UPDATE);
    pub const ALL: Self = Self::READ_WRITE.union(Self::DELETE);

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn contains(self, capability: Capability) -> bool {
        self.0 & capability.bit() != 0
    }
}

impl BitOr for Capabilities {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// A resource base path plus the operations it supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceDescriptor {
    path: &'static str,
    capabilities: Capabilities,
}

impl ResourceDescriptor {
    pub const fn new(path: &'static str, capabilities: Capabilities) -> Self {
        Self { path, capabilities }
    }

    pub const fn path(&self) -> &'static str {
        self.path
    }

    pub const fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub const fn supports(&self, capability: Capability) -> bool {
        self.capabilities.contains(capability)
    }

    fn require(&self, capability: Capability) -> Result<(), ApiError> {
        if self.supports(capability) {
            Ok(())
        } else {
            Err(ApiError::Unsupported {
                resource: self.path,
                capability,
            })
        }
    }
}

/// Query parameters for a list request.
///
/// ```
/// use productive_core::ListParams;
///
/// let params = ListParams::new()
///     .sort_desc("started_on")
///     .page_number(2)
///     .page_size(50)
///     .filter("person_id", "17");
/// assert_eq!(params.get("sort"), Some("-started_on"));
/// assert_eq!(params.get("filter[person_id]"), Some("17"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams(BTreeMap<String, String>);

impl ListParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ascending sort on `field`.
    #[must_use]
    pub fn sort(self, field: &str) -> Self {
        self.insert("sort", field)
    }

    /// Descending sort on `field` (the service's `-` prefix).
    #[must_use]
    pub fn sort_desc(self, field: &str) -> Self {
        self.insert("sort", format!("-{field}"))
    }

    #[must_use]
    pub fn page_number(self, number: u32) -> Self {
        self.insert("page[number]", number.to_string())
    }

    #[must_use]
    pub fn page_size(self, size: u32) -> Self {
        self.insert("page[size]", size.to_string())
    }

    #[must_use]
    pub fn filter(self, property: &str, value: impl Into<String>) -> Self {
        self.insert(format!("filter[{property}]"), value)
    }

    #[must_use]
    pub fn insert(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl From<BTreeMap<String, String>> for ListParams {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

/// A resource descriptor bound to a client.
#[derive(Debug)]
pub struct Resource<'c, T: Transport> {
    client: &'c ApiClient<T>,
    descriptor: ResourceDescriptor,
}

impl<T: Transport> Clone for Resource<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Transport> Copy for Resource<'_, T> {}

impl<'c, T: Transport> Resource<'c, T> {
    pub(crate) fn new(client: &'c ApiClient<T>, descriptor: ResourceDescriptor) -> Self {
        Self { client, descriptor }
    }

    pub fn descriptor(&self) -> ResourceDescriptor {
        self.descriptor
    }

    /// List resources. `aggregates` adds the empty `aggregates` flag.
    pub fn list(&self, params: &ListParams, aggregates: bool) -> Result<Value, ApiError> {
        self.descriptor.require(Capability::List)?;
        self.client.list(self.descriptor.path, params, aggregates)
    }

    pub fn get(&self, id: &str) -> Result<Value, ApiError> {
        self.descriptor.require(Capability::Get)?;
        self.client.get(self.descriptor.path, id)
    }

    /// Create a resource. `payload` must already be a JSON:API document.
    pub fn create<P: Serialize + ?Sized>(&self, payload: &P) -> Result<Value, ApiError> {
        self.descriptor.require(Capability::Create)?;
        self.client.create(self.descriptor.path, payload)
    }

    /// Update a resource with PATCH.
    pub fn update<P: Serialize + ?Sized>(&self, id: &str, payload: &P) -> Result<Value, ApiError> {
        self.descriptor.require(Capability::Update)?;
        self.client.update(self.descriptor.path, id, payload)
    }

    /// Delete a resource. The service usually answers with an empty body,
    /// which decodes to `Value::Null`.
    pub fn delete(&self, id: &str) -> Result<Value, ApiError> {
        self.descriptor.require(Capability::Delete)?;
        self.client.delete(self.descriptor.path, id)
    }
}
