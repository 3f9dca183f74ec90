mod common;

use common::{node_store, rel_store, RecordingGateway};
use graph_desk::api::models::{AggregateRequest, DeleteNodesRequest, SearchRequest};
use graph_desk::api::{Endpoint, RequestError};
use graph_desk::graph_utils::graph::{
    Aggregation, Node, NodeId, PropertyValue, RelationshipEndpoints,
};
use graph_desk::display::NodeListView;
use graph_desk::store::{AggregateSnapshot, Channel, NodeAction, NodeSession};
use serde_json::json;

fn person(id: i64, name: &str) -> serde_json::Value {
    json!({"id": id, "labels": ["Person"], "properties": {"name": name}})
}

#[test]
fn session_reducer_keeps_channels_independent() {
    let mut s = NodeSession::default();
    assert!(!s.searched);
    s.reduce(NodeAction::SearchStart);
    s.reduce(NodeAction::AggregateStart);
    assert!(s.search.is_loading());
    assert!(s.aggregation.is_loading());

    s.reduce(NodeAction::AggregateError("boom".into()));
    assert!(s.search.is_loading(), "aggregate failure must not touch search");
    assert_eq!(s.aggregation.error(), Some("boom"));
    assert!(!s.searched);

    s.reduce(NodeAction::SearchSuccess(vec![Node::default()]));
    assert!(s.searched);
    assert_eq!(s.nodes().len(), 1);
    assert_eq!(s.aggregation.error(), Some("boom"));
}

#[test]
fn search_start_clears_previous_error() {
    let mut s = NodeSession::default();
    s.reduce(NodeAction::SearchError("down".into()));
    assert!(s.searched);
    s.reduce(NodeAction::SearchStart);
    assert_eq!(s.search, Channel::Loading);
    assert!(s.search.error().is_none());
    assert!(s.nodes().is_empty());
}

#[test]
fn search_success_replaces_nodes_and_marks_searched() {
    let gw = RecordingGateway::new();
    gw.reply(Ok(json!({"nodes": [person(1, "Ann"), person(2, "Bob")]})));
    let store = node_store(&gw);

    let resp = store.search_nodes(&SearchRequest::default()).expect("search ok");
    assert_eq!(resp.nodes.len(), 2);

    let snap = store.snapshot();
    assert!(snap.searched);
    assert_eq!(snap.nodes()[0].id, NodeId::Int(1));
    assert_eq!(snap.nodes()[1].properties.get("name"), Some(&PropertyValue::from("Bob")));

    let calls = gw.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, Endpoint::SearchNodes);
    assert_eq!(calls[0].1, Some(json!({"labels": [], "filters": {}, "limit": 100})));
}

#[test]
fn search_failure_sets_error_and_rethrows() {
    let gw = RecordingGateway::new();
    gw.reply(Err(RequestError::Backend("Label not found".into())));
    let store = node_store(&gw);

    let err = store.search_nodes(&SearchRequest::default()).unwrap_err();
    assert_eq!(err.to_string(), "Label not found");

    let snap = store.snapshot();
    assert!(snap.searched);
    assert_eq!(snap.search.error(), Some("Label not found"));
    assert!(snap.nodes().is_empty());
    assert_eq!(snap.aggregation, Channel::Idle);
}

#[test]
fn failed_then_successful_search_keeps_aggregation() {
    let gw = RecordingGateway::new();
    gw.reply(Ok(json!({"count": 2, "avg": 30, "max": 40, "min": 20, "sum": 60})));
    gw.reply(Err(RequestError::Backend("Label not found".into())));
    gw.reply(Ok(json!({"nodes": [person(1, "Ann")]})));
    let store = node_store(&gw);

    store
        .get_aggregated_data(&AggregateRequest { label: "Person".into(), property: "age".into() })
        .expect("aggregate ok");
    let aggregation = store.snapshot().aggregation;
    assert!(aggregation.value().is_some());

    store.search_nodes(&SearchRequest::default()).unwrap_err();
    let snap = store.snapshot();
    assert_eq!(snap.search.error(), Some("Label not found"));
    assert_eq!(snap.aggregation, aggregation);

    store.search_nodes(&SearchRequest::default()).expect("search ok");
    let snap = store.snapshot();
    assert!(snap.search.error().is_none());
    assert_eq!(snap.aggregation, aggregation);
    let NodeListView::Table(rows) = NodeListView::from_session(&snap) else { panic!("expected a table") };
    assert_eq!(rows.len(), 1);
}

#[test]
fn null_fields_in_success_bodies_read_as_empty() {
    let gw = RecordingGateway::new();
    gw.reply(Ok(json!({"message": "ok", "nodes": null})));
    gw.reply(Ok(json!({"nodes": [{"id": 5, "labels": null, "properties": null}]})));
    gw.reply(Ok(json!({"count": null, "avg": null, "max": null, "min": null, "sum": null})));
    let store = node_store(&gw);

    let resp = store.search_nodes(&SearchRequest::default()).expect("search ok");
    assert!(resp.nodes.is_empty());

    let resp = store.search_nodes(&SearchRequest::default()).expect("search ok");
    assert_eq!(resp.nodes[0].id, NodeId::Int(5));
    assert!(resp.nodes[0].labels.is_empty() && resp.nodes[0].properties.is_empty());

    let data = store
        .get_aggregated_data(&AggregateRequest { label: "Person".into(), property: "age".into() })
        .expect("aggregate ok");
    assert_eq!(data, Aggregation::default());
}

#[test]
fn aggregation_success_remembers_query() {
    let gw = RecordingGateway::new();
    gw.reply(Ok(json!({"count": 3, "avg": 30.5, "max": 41, "min": 20, "sum": 91.5})));
    let store = node_store(&gw);

    let req = AggregateRequest { label: "Person".into(), property: "age".into() };
    let data = store.get_aggregated_data(&req).expect("aggregate ok");
    assert_eq!(data.count, 3);
    assert_eq!(data.max, Some(PropertyValue::Int(41)));

    let snap = store.snapshot();
    let expected = AggregateSnapshot { label: "Person".into(), property: "age".into(), data };
    assert_eq!(snap.aggregation.value(), Some(&expected));
    assert_eq!(snap.search, Channel::Idle);
    assert!(!snap.searched);
}

#[test]
fn aggregation_with_null_statistics() {
    let gw = RecordingGateway::new();
    gw.reply(Ok(json!({"count": 0, "avg": null, "max": null, "min": null, "sum": null})));
    let store = node_store(&gw);

    let data = store
        .get_aggregated_data(&AggregateRequest { label: "Ghost".into(), property: "age".into() })
        .expect("aggregate ok");
    assert_eq!(data, Aggregation::default());
}

#[test]
fn mutations_leave_session_untouched() {
    let gw = RecordingGateway::new();
    gw.reply(Ok(json!({"message": "ok", "deletedCount": 2})));
    let store = node_store(&gw);

    let before = store.snapshot();
    let out = store
        .delete_nodes(&DeleteNodesRequest { label: "Person".into(), node_ids: vec!["1".into(), "2".into()] })
        .expect("delete ok");
    assert_eq!(out.deleted_count, Some(2));
    assert_eq!(store.snapshot(), before);
    assert_eq!(gw.calls()[0].0, Endpoint::DeleteNodes);
}

#[test]
fn unexpected_success_body_is_a_decode_error() {
    let gw = RecordingGateway::new();
    gw.reply(Ok(json!({"nodes": "not a list"})));
    let store = node_store(&gw);

    let err = store.search_nodes(&SearchRequest::default()).unwrap_err();
    assert!(matches!(err, RequestError::Decode(_)));
    assert!(store.snapshot().search.error().is_some());
}

#[test]
fn bulk_relationship_calls_wrap_descriptors() {
    let gw = RecordingGateway::new();
    let store = rel_store(&gw);
    let rel = RelationshipEndpoints {
        label1: "Person".into(),
        node1_id: NodeId::Int(1),
        label2: "Company".into(),
        node2_id: NodeId::Text("c-9".into()),
        rel_type: "WORKS_AT".into(),
    };

    // Null reply decodes to an empty outcome
    let out = store.delete_bulk_relationships(vec![rel]).expect("delete ok");
    assert!(out.errors.is_empty());
    assert_eq!(out.deleted_count, None);

    assert_eq!(gw.calls()[0].0, Endpoint::DeleteBulkRelationships);
    assert_eq!(
        gw.last_payload(),
        json!({"relationships": [{
            "label1": "Person", "node1_id": 1, "label2": "Company", "node2_id": "c-9", "rel_type": "WORKS_AT"
        }]})
    );
}

#[test]
fn store_clones_share_session() {
    let gw = RecordingGateway::new();
    gw.reply(Ok(json!({"nodes": [person(7, "Eve")]})));
    let store = node_store(&gw);
    let other = store.clone();

    other.search_nodes(&SearchRequest::default()).expect("search ok");
    assert_eq!(store.snapshot().nodes()[0].id, NodeId::Int(7));
}
