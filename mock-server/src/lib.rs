//! In-memory stand-in for the Productive v2 JSON:API.
//!
//! Serves any collection name under `/api/v2/{resource}` with list, get,
//! create, PATCH update and delete. Every request must carry the configured
//! `X-Auth-Token` and `X-Organization-Id` headers or it is answered with 401.

use std::{
    cmp::Ordering,
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub const API_PREFIX: &str = "/api/v2";
pub const JSON_API: &str = "application/vnd.api+json";
pub const DEFAULT_PAGE_SIZE: usize = 30;

/// Credentials the server accepts.
#[derive(Clone, Debug)]
pub struct Credentials {
    pub auth_token: String,
    pub organization_id: String,
}

impl Credentials {
    pub fn new(auth_token: impl Into<String>, organization_id: impl Into<String>) -> Self {
        Self {
            auth_token: auth_token.into(),
            organization_id: organization_id.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Store {
    next_id: u64,
    collections: HashMap<String, BTreeMap<u64, Value>>,
}

#[derive(Clone)]
pub struct AppState {
    credentials: Arc<Credentials>,
    store: Arc<RwLock<Store>>,
}

pub fn app(credentials: Credentials) -> Router {
    let state = AppState {
        credentials: Arc::new(credentials),
        store: Arc::new(RwLock::new(Store::default())),
    };
    Router::new()
        .route(
            &format!("{API_PREFIX}/{{resource}}"),
            get(list_resources).post(create_resource),
        )
        .route(
            &format!("{API_PREFIX}/{{resource}}/{{id}}"),
            get(get_resource).patch(update_resource).delete(delete_resource),
        )
        .with_state(state)
}

pub async fn run(listener: TcpListener, credentials: Credentials) -> Result<(), std::io::Error> {
    axum::serve(listener, app(credentials)).await
}

/// A JSON:API error document with a single entry.
#[derive(Debug)]
pub struct Failure {
    status: StatusCode,
    title: &'static str,
}

impl Failure {
    fn new(status: StatusCode, title: &'static str) -> Self {
        Self { status, title }
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let doc = json!({
            "errors": [{ "status": self.status.as_str(), "title": self.title }]
        });
        (self.status, [(CONTENT_TYPE, JSON_API)], Json(doc)).into_response()
    }
}

fn document(status: StatusCode, doc: Value) -> Response {
    (status, [(CONTENT_TYPE, JSON_API)], Json(doc)).into_response()
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), Failure> {
    if header(headers, "x-auth-token") != Some(state.credentials.auth_token.as_str()) {
        tracing::warn!("rejected request with missing or wrong auth token");
        return Err(Failure::new(StatusCode::UNAUTHORIZED, "Invalid auth token"));
    }
    if header(headers, "x-organization-id") != Some(state.credentials.organization_id.as_str()) {
        tracing::warn!("rejected request with missing or wrong organization id");
        return Err(Failure::new(StatusCode::UNAUTHORIZED, "Invalid organization"));
    }
    Ok(())
}

/// Pull `data.attributes` (and `data.relationships`) out of a request document.
fn attributes_of(resource: &str, body: &Value) -> Result<(Map<String, Value>, Option<Value>), Failure> {
    let data = body
        .get("data")
        .and_then(Value::as_object)
        .ok_or(Failure::new(StatusCode::UNPROCESSABLE_ENTITY, "Missing data object"))?;
    if let Some(kind) = data.get("type") {
        if kind.as_str() != Some(resource) {
            return Err(Failure::new(StatusCode::CONFLICT, "Type does not match endpoint"));
        }
    }
    let attributes = match data.get("attributes") {
        None => Map::new(),
        Some(Value::Object(map)) => map.clone(),
        Some(_) => {
            return Err(Failure::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                "Attributes must be an object",
            ))
        }
    };
    Ok((attributes, data.get("relationships").cloned()))
}

fn attribute_text(record: &Value, field: &str) -> Option<String> {
    match record.get("attributes")?.get(field)? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn compare_by(field: &str, a: &Value, b: &Value) -> Ordering {
    let (a, b) = (attribute_text(a, field), attribute_text(b, field));
    match (a.as_deref().map(str::parse::<f64>), b.as_deref().map(str::parse::<f64>)) {
        (Some(Ok(x)), Some(Ok(y))) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.cmp(&b),
    }
}

fn page_param(params: &HashMap<String, String>, key: &str, default: usize) -> Result<usize, Failure> {
    match params.get(key) {
        None => Ok(default),
        Some(raw) => match raw.parse::<usize>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(Failure::new(StatusCode::BAD_REQUEST, "Invalid page parameter")),
        },
    }
}

async fn list_resources(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Response, Failure> {
    authorize(&state, &headers)?;

    let store = state.store.read().await;
    let mut records: Vec<Value> = store
        .collections
        .get(&resource)
        .map(|c| c.values().cloned().collect())
        .unwrap_or_default();
    drop(store);

    for (key, expected) in &params {
        if let Some(field) = key.strip_prefix("filter[").and_then(|k| k.strip_suffix(']')) {
            records.retain(|r| attribute_text(r, field).as_deref() == Some(expected.as_str()));
        }
    }

    if let Some(sort) = params.get("sort") {
        match sort.strip_prefix('-') {
            Some(field) => records.sort_by(|a, b| compare_by(field, b, a)),
            None => records.sort_by(|a, b| compare_by(sort, a, b)),
        }
    }

    let number = page_param(&params, "page[number]", 1)?;
    let size = page_param(&params, "page[size]", DEFAULT_PAGE_SIZE)?;
    let total = records.len();
    let offset = (number - 1).saturating_mul(size);
    let data: Vec<Value> = records.into_iter().skip(offset).take(size).collect();

    let mut meta = json!({
        "current_page": number,
        "total_pages": total.div_ceil(size),
        "total_count": total,
        "page_size": size,
    });
    if params.contains_key("aggregates") {
        meta["aggregates"] = json!({ "count": total });
    }
    Ok(document(StatusCode::OK, json!({ "data": data, "meta": meta })))
}

async fn create_resource(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Response, Failure> {
    authorize(&state, &headers)?;
    let (attributes, relationships) = attributes_of(&resource, &body)?;

    let mut store = state.store.write().await;
    store.next_id += 1;
    let id = store.next_id;
    let mut record = json!({
        "id": id.to_string(),
        "type": resource,
        "attributes": attributes,
    });
    if let Some(relationships) = relationships {
        record["relationships"] = relationships;
    }
    store
        .collections
        .entry(resource.clone())
        .or_default()
        .insert(id, record.clone());
    tracing::debug!(%resource, id, "created record");

    Ok(document(StatusCode::CREATED, json!({ "data": record })))
}

async fn get_resource(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, u64)>,
    headers: HeaderMap,
) -> Result<Response, Failure> {
    authorize(&state, &headers)?;
    let store = state.store.read().await;
    let record = store
        .collections
        .get(&resource)
        .and_then(|c| c.get(&id))
        .cloned()
        .ok_or(Failure::new(StatusCode::NOT_FOUND, "Record not found"))?;
    Ok(document(StatusCode::OK, json!({ "data": record })))
}

async fn update_resource(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, u64)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Response, Failure> {
    authorize(&state, &headers)?;
    let (attributes, relationships) = attributes_of(&resource, &body)?;

    let mut store = state.store.write().await;
    let record = store
        .collections
        .get_mut(&resource)
        .and_then(|c| c.get_mut(&id))
        .ok_or(Failure::new(StatusCode::NOT_FOUND, "Record not found"))?;
    if let Some(existing) = record["attributes"].as_object_mut() {
        existing.extend(attributes);
    }
    if let Some(relationships) = relationships {
        record["relationships"] = relationships;
    }
    Ok(document(StatusCode::OK, json!({ "data": record.clone() })))
}

async fn delete_resource(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, u64)>,
    headers: HeaderMap,
) -> Result<StatusCode, Failure> {
    authorize(&state, &headers)?;
    let mut store = state.store.write().await;
    store
        .collections
        .get_mut(&resource)
        .and_then(|c| c.remove(&id))
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(Failure::new(StatusCode::NOT_FOUND, "Record not found"))
}
