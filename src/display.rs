//! What the node list and the aggregation block show for a given session
//! snapshot. Both the egui pages and the terminal client render these.

use crate::graph_utils::graph::{Aggregation, Node, PropertyValue};
use crate::store::{AggregateSnapshot, Channel, NodeSession};

pub const LOADING_NODES: &str = "Loading nodes...";
pub const NOT_SEARCHED: &str = "Run a search to see nodes.";
pub const NO_NODES: &str = "No nodes found.";
pub const NO_PROPERTIES: &str = "(no properties)";

/// One table row: id, joined labels and `key: value` property lines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeRow {
    pub id: String,
    pub labels: String,
    pub properties: Vec<String>,
}

impl NodeRow {
    pub fn from_node(node: &Node) -> Self {
        Self {
            id: node.id.to_string(),
            labels: node.labels_joined(),
            properties: node.properties.iter().map(|(k, v)| format!("{}: {}", k, v)).collect(),
        }
    }

    /// Property lines joined for single-cell renderers.
    pub fn properties_text(&self) -> String {
        if self.properties.is_empty() { NO_PROPERTIES.to_string() } else { self.properties.join("\n") }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeListView {
    Loading,
    Error(String),
    NotSearched,
    Empty,
    Table(Vec<NodeRow>),
}

impl NodeListView {
    pub fn from_session(session: &NodeSession) -> Self {
        match &session.search {
            Channel::Loading => NodeListView::Loading,
            Channel::Failed(msg) => NodeListView::Error(msg.clone()),
            _ if !session.searched => NodeListView::NotSearched,
            _ => {
                let nodes = session.nodes();
                if nodes.is_empty() {
                    NodeListView::Empty
                } else {
                    NodeListView::Table(nodes.iter().map(NodeRow::from_node).collect())
                }
            }
        }
    }

    /// Text for every state except the table.
    pub fn status_text(&self) -> Option<String> {
        match self {
            NodeListView::Loading => Some(LOADING_NODES.to_string()),
            NodeListView::Error(msg) => Some(format!("Error: {}", msg)),
            NodeListView::NotSearched => Some(NOT_SEARCHED.to_string()),
            NodeListView::Empty => Some(NO_NODES.to_string()),
            NodeListView::Table(_) => None,
        }
    }
}

fn stat(value: &Option<PropertyValue>) -> String {
    value.as_ref().map(|v| v.to_string()).unwrap_or_else(|| "-".into())
}

pub fn aggregate_lines(property: &str, data: &Aggregation) -> Vec<String> {
    vec![
        format!("Total nodes: {}", data.count),
        format!("Average {}: {}", property, stat(&data.avg)),
        format!("Maximum {}: {}", property, stat(&data.max)),
        format!("Minimum {}: {}", property, stat(&data.min)),
        format!("Sum {}: {}", property, stat(&data.sum)),
    ]
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AggregateView {
    Hidden,
    Loading,
    Error(String),
    Results(Vec<String>),
}

impl AggregateView {
    pub fn from_session(session: &NodeSession) -> Self {
        match &session.aggregation {
            Channel::Idle => AggregateView::Hidden,
            Channel::Loading => AggregateView::Loading,
            Channel::Failed(msg) => AggregateView::Error(msg.clone()),
            Channel::Ready(AggregateSnapshot { property, data, .. }) => {
                AggregateView::Results(aggregate_lines(property, data))
            }
        }
    }
}
