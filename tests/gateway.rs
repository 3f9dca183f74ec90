use std::sync::Arc;

use graph_desk::api::http::normalize_base_url;
use graph_desk::api::{extract_error_message, Endpoint, Gateway, HttpGateway, Method, RequestError};
use graph_desk::forms::nodes::{DeleteNodesForm, FilterRow, SearchForm};
use graph_desk::display::NodeListView;
use graph_desk::forms::SubmitForm;
use graph_desk::graph_utils::graph::{NodeId, Operator};
use graph_desk::store::NodeSessionStore;
use httpmock::prelude::*;
use serde_json::json;

fn gateway(server: &MockServer) -> HttpGateway {
    HttpGateway::new(&server.url("/api")).expect("valid base url")
}

#[test]
fn base_url_gets_trailing_slash() {
    let url = normalize_base_url(" http://localhost:8000/api ").unwrap();
    assert_eq!(url.as_str(), "http://localhost:8000/api/");
    assert!(normalize_base_url("not a url").is_err());

    let gw = HttpGateway::new("http://localhost:8000/api").unwrap();
    assert_eq!(
        gw.endpoint_url(Endpoint::RemoveBulkRelationships).unwrap().as_str(),
        "http://localhost:8000/api/remove-bulk-relationship/"
    );
}

#[test]
fn endpoint_verbs() {
    assert_eq!(Endpoint::SearchNodes.method(), Method::Post);
    assert_eq!(Endpoint::AggregatedData.method(), Method::Post);
    assert_eq!(Endpoint::CreateRelationship.method(), Method::Post);
    assert_eq!(Endpoint::UpdateNodesProperties.method(), Method::Put);
    assert_eq!(Endpoint::RemoveBulkRelationships.method(), Method::Put);
    assert_eq!(Endpoint::DeleteNodes.method(), Method::Delete);
    assert_eq!(Endpoint::DeleteBulkRelationships.method(), Method::Delete);
}

#[test]
fn error_message_precedence() {
    let body = json!({"error": "Label required", "errors": ["x"]});
    assert_eq!(extract_error_message(&body, "Bad Request"), "Label required");

    let body = json!({"error": {"code": 7}});
    assert_eq!(extract_error_message(&body, "Bad Request"), "{\"code\":7}");

    let body = json!({"error": "", "errors": ["a", "b"]});
    assert_eq!(extract_error_message(&body, "Bad Request"), "[\"a\",\"b\"]");

    let body = json!({"detail": "ignored"});
    assert_eq!(extract_error_message(&body, "Not Found"), "Not Found");
    assert_eq!(extract_error_message(&serde_json::Value::Null, "Internal Server Error"), "Internal Server Error");
}

#[test]
fn search_posts_exact_body_and_fills_session() {
    let server = MockServer::start();
    let m = server.mock(|when, then| {
        when.method(POST)
            .path("/api/search-nodes/")
            .header("content-type", "application/json")
            .json_body(json!({
                "labels": ["Person"],
                "filters": {"age": {"operator": ">=", "value": "30"}},
                "limit": 100
            }));
        then.status(200).json_body(json!({
            "nodes": [
                {"id": 1, "labels": ["Person"], "properties": {"name": "Ann", "age": 34}},
                {"id": "4:abc:2", "labels": ["Person"]}
            ]
        }));
    });

    let store = NodeSessionStore::new(Arc::new(gateway(&server)));
    let mut form = SearchForm::default();
    form.labels = "Person".into();
    form.filters = vec![FilterRow { property: "age".into(), operator: Operator::Ge, value: "30".into() }];
    form.submit(&store);

    m.assert();
    let snap = store.snapshot();
    assert!(snap.searched);
    assert_eq!(snap.nodes().len(), 2);
    assert_eq!(snap.nodes()[1].id, NodeId::Text("4:abc:2".into()));
    assert!(snap.nodes()[1].properties.is_empty());
}

#[test]
fn search_scenario_yields_one_row_table() {
    let server = MockServer::start();
    let m = server.mock(|when, then| {
        when.method(POST).path("/api/search-nodes/").json_body(json!({
            "labels": ["Person"],
            "filters": {"age": {"operator": ">", "value": "30"}},
            "limit": 50
        }));
        then.status(200)
            .json_body(json!({"nodes": [{"id": 1, "labels": ["Person"], "properties": {"age": 31}}]}));
    });

    let store = NodeSessionStore::new(Arc::new(gateway(&server)));
    let mut form = SearchForm::default();
    form.labels = "Person".into();
    form.filters = vec![FilterRow::parse_expr("age > 30").unwrap()];
    form.limit = "50".into();
    form.submit(&store);

    m.assert();
    let NodeListView::Table(rows) = NodeListView::from_session(&store.snapshot()) else {
        panic!("expected a table");
    };
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].properties, vec!["age: 31".to_string()]);
}

#[test]
fn error_field_becomes_the_failure_message() {
    let server = MockServer::start();
    let m = server.mock(|when, then| {
        when.method(DELETE).path("/api/delete-multiple-nodes/");
        then.status(404).json_body(json!({"error": "Label 'Ghost' not found"}));
    });

    let store = NodeSessionStore::new(Arc::new(gateway(&server)));
    let mut form = DeleteNodesForm { label: "Ghost".into(), node_ids: "1".into(), ..Default::default() };
    form.submit(&store);

    m.assert();
    assert_eq!(form.feedback.error.as_deref(), Some("Label 'Ghost' not found"));
}

#[test]
fn errors_field_is_serialized() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(PUT).path("/api/update-bulk-relationships/");
        then.status(422).json_body(json!({"errors": ["missing rel_type"]}));
    });

    let err = gateway(&server)
        .call(Endpoint::UpdateBulkRelationships, Some(&json!({"relationships": []})))
        .unwrap_err();
    assert_eq!(err, RequestError::Backend("[\"missing rel_type\"]".into()));
}

#[test]
fn status_text_used_without_body() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/get-aggregated-data/");
        then.status(500).body("");
    });

    let err = gateway(&server)
        .call(Endpoint::AggregatedData, Some(&json!({"label": "Person", "property": "age"})))
        .unwrap_err();
    assert_eq!(err.to_string(), "Internal Server Error");
}

#[test]
fn empty_success_body_is_null() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/create-node-single-label/");
        then.status(201).body("");
    });

    let body = gateway(&server)
        .call(Endpoint::CreateNodeSingleLabel, Some(&json!({"label": "Person"})))
        .expect("success");
    assert!(body.is_null());
}

#[test]
fn unreachable_server_is_a_network_error() {
    // Port 9 (discard) is not expected to be listening
    let gw = HttpGateway::new("http://127.0.0.1:9/api").unwrap();
    let err = gw.call(Endpoint::SearchNodes, Some(&json!({}))).unwrap_err();
    assert!(matches!(err, RequestError::Network(_)), "got {:?}", err);
    assert!(!err.to_string().is_empty());
}

#[test]
fn request_log_is_written_when_enabled() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(DELETE).path("/api/delete-bulk-relationships/");
        then.status(200).json_body(json!({"deletedCount": 0}));
    });

    let dir = std::env::temp_dir().join(format!("graph-desk-test-{}", uuid::Uuid::now_v7()));
    let gw = gateway(&server).with_request_log(&dir);
    gw.call(Endpoint::DeleteBulkRelationships, Some(&json!({"relationships": []}))).expect("success");

    let entries: Vec<_> = std::fs::read_dir(&dir).expect("log dir created").flatten().collect();
    assert_eq!(entries.len(), 1);
    let name = entries[0].file_name().to_string_lossy().to_string();
    assert!(name.starts_with("requests_") && name.ends_with(".log"), "{}", name);
    let text = std::fs::read_to_string(entries[0].path()).unwrap();
    assert!(text.contains("DELETE delete-bulk-relationships/ -> 200"), "{}", text);
    assert!(text.contains("RID="));
    let _ = std::fs::remove_dir_all(&dir);
}
