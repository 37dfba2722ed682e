//! Dispatch behaviour observed through a recording transport.
//!
//! Every test drives the public API and inspects the `HttpRequest` values
//! that reached the transport, so nothing here touches the network.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use productive_core::resources::{BOOKINGS, PEOPLE};
use productive_core::{
    ApiClient, ApiError, Capability, ClientConfig, ContentType, HttpMethod, HttpRequest,
    HttpResponse, ListParams, RequestOptions, Transport, TransportError, API_BASE_URL,
};
use serde_json::{json, Value};

const TOKEN: &str = "secret-token";
const ORG: u64 = 31337;

/// Records every request and answers from a queue of scripted outcomes.
/// When the queue is empty it answers `{}`.
#[derive(Default)]
struct Recorder {
    requests: Mutex<Vec<HttpRequest>>,
    script: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
}

impl Recorder {
    fn respond(&self, outcome: Result<HttpResponse, TransportError>) {
        self.script.lock().unwrap().push_back(outcome);
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn last(&self) -> HttpRequest {
        self.requests().pop().expect("no request recorded")
    }
}

impl Transport for Recorder {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        self.script.lock().unwrap().pop_front().unwrap_or_else(|| {
            Ok(HttpResponse {
                status: 200,
                body: "{}".to_string(),
            })
        })
    }
}

fn ok(body: &str) -> Result<HttpResponse, TransportError> {
    Ok(HttpResponse {
        status: 200,
        body: body.to_string(),
    })
}

fn setup() -> (Arc<Recorder>, ApiClient<Arc<Recorder>>) {
    let recorder = Arc::new(Recorder::default());
    let client = ApiClient::with_transport(ClientConfig::new(TOKEN, ORG), Arc::clone(&recorder));
    (recorder, client)
}

// ---------------------------------------------------------------------------
// URL building
// ---------------------------------------------------------------------------

#[test]
fn build_url_inserts_exactly_one_slash() {
    let (_, client) = setup();
    for path in ["bookings", "bookings/42", "people?x=1", ""] {
        assert_eq!(client.build_url(path), format!("{API_BASE_URL}/{path}"), "{path}");
    }
    for path in ["/bookings", "/bookings/42", "/"] {
        assert_eq!(client.build_url(path), format!("{API_BASE_URL}{path}"), "{path}");
    }
}

// ---------------------------------------------------------------------------
// Headers
// ---------------------------------------------------------------------------

#[test]
fn every_operation_carries_credentials() {
    let (recorder, client) = setup();
    let bookings = client.bookings();

    bookings.list(&ListParams::new(), false).unwrap();
    bookings.get("1").unwrap();
    bookings.create(&json!({"data": {}})).unwrap();
    bookings.update("1", &json!({"data": {}})).unwrap();
    bookings.delete("1").unwrap();

    let requests = recorder.requests();
    assert_eq!(requests.len(), 5);
    for req in &requests {
        assert_eq!(req.header("X-Auth-Token"), Some(TOKEN), "{} {}", req.method, req.url);
        assert_eq!(req.header("X-Organization-Id"), Some("31337"), "{} {}", req.method, req.url);
        assert_eq!(req.header("Content-Type"), Some("application/vnd.api+json"));
    }
}

#[test]
fn caller_cannot_override_credentials() {
    let (recorder, client) = setup();
    let options = RequestOptions::new()
        .with_header("X-Auth-Token", "someone-else")
        .with_header("X-Organization-Id", "1");

    client
        .send(HttpMethod::Get, &client.build_url("/bookings"), options)
        .unwrap();

    let req = recorder.last();
    assert_eq!(req.header("X-Auth-Token"), Some(TOKEN));
    assert_eq!(req.header("X-Organization-Id"), Some("31337"));
}

#[test]
fn bulk_content_type_passes_through_send() {
    let (recorder, client) = setup();
    let options = RequestOptions::new()
        .with_json(json!({"data": [{"type": "bookings"}]}))
        .with_content_type(ContentType::Bulk);

    client
        .send(HttpMethod::Post, &client.build_url("/bookings"), options)
        .unwrap();

    assert_eq!(
        recorder.last().header("Content-Type"),
        Some("application/vnd.api+json; ext=bulk")
    );
}

#[test]
fn with_content_type_leaves_input_untouched() {
    let original = RequestOptions::new().with_header("Accept", "application/vnd.api+json");
    let first = original.with_content_type(ContentType::JsonApi);
    let second = original.with_content_type(ContentType::Bulk);

    assert_eq!(original.content_type(), None);
    assert_eq!(first.content_type(), Some(ContentType::JsonApi.as_str()));
    assert_eq!(second.content_type(), Some(ContentType::Bulk.as_str()));
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

#[test]
fn list_adds_aggregates_only_on_request() {
    let (recorder, client) = setup();

    client.list("/bookings", &ListParams::new(), true).unwrap();
    let with = recorder.last();
    assert_eq!(with.method, HttpMethod::Get);
    assert_eq!(with.url, format!("{API_BASE_URL}/bookings"));
    assert_eq!(with.query_value("aggregates"), Some(""));

    client.list("/bookings", &ListParams::new(), false).unwrap();
    let without = recorder.last();
    assert_eq!(without.query_value("aggregates"), None);
    assert!(without.query.is_empty());
}

#[test]
fn list_forwards_paging_sorting_and_filters() {
    let (recorder, client) = setup();
    let params = ListParams::new()
        .sort_desc("started_on")
        .page_number(2)
        .page_size(100)
        .filter("person_id", "7");

    client.bookings().list(&params, false).unwrap();

    let req = recorder.last();
    assert_eq!(req.query_value("sort"), Some("-started_on"));
    assert_eq!(req.query_value("page[number]"), Some("2"));
    assert_eq!(req.query_value("page[size]"), Some("100"));
    assert_eq!(req.query_value("filter[person_id]"), Some("7"));
    assert!(req.body.is_none());
}

#[test]
fn get_returns_decoded_body_unchanged() {
    let (recorder, client) = setup();
    let body = json!({
        "data": {"id": "42", "type": "bookings", "attributes": {"hours": 8, "note": null}},
        "included": []
    });
    recorder.respond(ok(&body.to_string()));

    let value = client.get("/bookings", "42").unwrap();

    assert_eq!(value, body);
    let req = recorder.last();
    assert_eq!(req.method, HttpMethod::Get);
    assert_eq!(req.url, format!("{API_BASE_URL}/bookings/42"));
}

#[test]
fn update_uses_patch_with_payload_body() {
    let (recorder, client) = setup();

    client.update("/bookings", "42", &json!({"name": "x"})).unwrap();

    let req = recorder.last();
    assert_eq!(req.method, HttpMethod::Patch);
    assert_eq!(req.url, format!("{API_BASE_URL}/bookings/42"));
    let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
    assert_eq!(body, json!({"name": "x"}));
}

#[test]
fn create_posts_to_collection() {
    let (recorder, client) = setup();
    #[derive(serde::Serialize)]
    struct Envelope<'a> {
        data: Data<'a>,
    }
    #[derive(serde::Serialize)]
    struct Data<'a> {
        r#type: &'a str,
    }

    client
        .bookings()
        .create(&Envelope { data: Data { r#type: "bookings" } })
        .unwrap();

    let req = recorder.last();
    assert_eq!(req.method, HttpMethod::Post);
    assert_eq!(req.url, format!("{API_BASE_URL}/bookings"));
    let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
    assert_eq!(body, json!({"data": {"type": "bookings"}}));
}

#[test]
fn delete_targets_member_url_and_tolerates_empty_body() {
    let (recorder, client) = setup();
    recorder.respond(Ok(HttpResponse {
        status: 204,
        body: String::new(),
    }));

    let value = client.delete("/bookings", "42").unwrap();

    assert_eq!(value, Value::Null);
    let req = recorder.last();
    assert_eq!(req.method, HttpMethod::Delete);
    assert_eq!(req.url, format!("{API_BASE_URL}/bookings/42"));
    assert!(req.body.is_none());
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn transport_failure_is_surfaced_without_retry() {
    for (outcome, expected_status) in [
        (
            TransportError::Status {
                status: 503,
                body: "unavailable".to_string(),
            },
            Some(503),
        ),
        (TransportError::Connection("connection refused".to_string()), None),
        (TransportError::Timeout, None),
    ] {
        let (recorder, client) = setup();
        recorder.respond(Err(outcome));

        let err = client.bookings().get("42").unwrap_err();

        assert!(matches!(err, ApiError::Request { .. }), "{err}");
        assert_eq!(err.status(), expected_status);
        assert_eq!(recorder.requests().len(), 1);
    }
}

#[test]
fn undeclared_capability_never_reaches_transport() {
    let (recorder, client) = setup();

    let err = client.people().delete("3").unwrap_err();

    assert!(matches!(
        err,
        ApiError::Unsupported {
            resource: "/people",
            capability: Capability::Delete
        }
    ));
    assert!(recorder.requests().is_empty());
    assert_eq!(client.resource(PEOPLE).descriptor(), PEOPLE);
}

#[test]
fn descriptor_and_path_forms_are_equivalent() {
    let (recorder, client) = setup();

    client.resource(BOOKINGS).get("9").unwrap();
    client.get("bookings", "9").unwrap();

    let requests = recorder.requests();
    assert_eq!(requests[0], requests[1]);
}
