use graph_desk::display::{aggregate_lines, AggregateView, NodeListView, NodeRow, NOT_SEARCHED, NO_NODES};
use graph_desk::graph_utils::graph::{Aggregation, Node, NodeId, Properties, PropertyValue};
use graph_desk::store::{AggregateSnapshot, NodeAction, NodeSession};

fn ann() -> Node {
    let mut properties = Properties::new();
    properties.insert("name".into(), "Ann".into());
    properties.insert("tags".into(), PropertyValue::List(vec!["a".into(), "b".into()]));
    Node { id: NodeId::Int(1), labels: vec!["Person".into(), "Employee".into()], properties }
}

#[test]
fn list_view_before_any_search() {
    let view = NodeListView::from_session(&NodeSession::default());
    assert_eq!(view, NodeListView::NotSearched);
    assert_eq!(view.status_text().as_deref(), Some(NOT_SEARCHED));
}

#[test]
fn loading_wins_over_everything() {
    let mut s = NodeSession::default();
    s.reduce(NodeAction::SearchError("down".into()));
    s.reduce(NodeAction::SearchStart);
    assert_eq!(NodeListView::from_session(&s), NodeListView::Loading);
}

#[test]
fn error_wins_over_results() {
    let mut s = NodeSession::default();
    s.reduce(NodeAction::SearchSuccess(vec![ann()]));
    s.reduce(NodeAction::SearchError("timeout".into()));
    let view = NodeListView::from_session(&s);
    assert_eq!(view, NodeListView::Error("timeout".into()));
    assert_eq!(view.status_text().as_deref(), Some("Error: timeout"));
}

#[test]
fn empty_result_and_table() {
    let mut s = NodeSession::default();
    s.reduce(NodeAction::SearchSuccess(vec![]));
    let view = NodeListView::from_session(&s);
    assert_eq!(view.status_text().as_deref(), Some(NO_NODES));

    s.reduce(NodeAction::SearchSuccess(vec![ann()]));
    let NodeListView::Table(rows) = NodeListView::from_session(&s) else { panic!("expected a table") };
    assert_eq!(
        rows,
        vec![NodeRow {
            id: "1".into(),
            labels: "Person, Employee".into(),
            properties: vec!["name: Ann".into(), "tags: a,b".into()],
        }]
    );
}

#[test]
fn node_without_properties_shows_placeholder() {
    let row = NodeRow::from_node(&Node { id: NodeId::Text("x".into()), ..Default::default() });
    assert_eq!(row.properties_text(), "(no properties)");
}

#[test]
fn aggregate_view_states() {
    let mut s = NodeSession::default();
    assert_eq!(AggregateView::from_session(&s), AggregateView::Hidden);
    s.reduce(NodeAction::AggregateStart);
    assert_eq!(AggregateView::from_session(&s), AggregateView::Loading);
    s.reduce(NodeAction::AggregateError("no such label".into()));
    assert_eq!(AggregateView::from_session(&s), AggregateView::Error("no such label".into()));

    let data = Aggregation {
        count: 2,
        avg: Some(PropertyValue::Float(30.5)),
        max: Some(PropertyValue::Int(41)),
        min: Some(PropertyValue::Int(20)),
        sum: None,
    };
    s.reduce(NodeAction::AggregateSuccess(AggregateSnapshot {
        label: "Person".into(),
        property: "age".into(),
        data: data.clone(),
    }));
    assert_eq!(AggregateView::from_session(&s), AggregateView::Results(aggregate_lines("age", &data)));
    assert_eq!(
        aggregate_lines("age", &data),
        vec!["Total nodes: 2", "Average age: 30.5", "Maximum age: 41", "Minimum age: 20", "Sum age: -"]
    );
}
