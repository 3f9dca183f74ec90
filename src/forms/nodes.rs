use std::collections::BTreeMap;

use super::values::{collect_names, collect_properties, split_list, ValuePolicy};
use super::{Feedback, SubmitForm};
use crate::api::models::{
    AggregateRequest, BulkOutcome, CreateNodeMultipleRequest, CreateNodeSingleRequest,
    CreateNodeWithPropertiesRequest, CreatedNodeResponse, DeleteNodesRequest, RemoveNodePropertiesRequest,
    SearchRequest, SearchResponse, UpdateNodesRequest,
};
use crate::api::RequestError;
use crate::graph_utils::graph::{Aggregation, Filter, Node, Operator, Properties};
use crate::store::NodeSessionStore;

pub const MIN_LABELS_MULTI: usize = 2;
pub const MIN_NODE_PROPERTIES: usize = 5;

fn empty_rows(n: usize) -> Vec<(String, String)> { vec![(String::new(), String::new()); n] }

fn properties_json(props: &Properties) -> String { serde_json::to_string(props).unwrap_or_else(|_| "{}".into()) }

fn created_node_message(node: &Node) -> String {
    format!("Node created. ID: {}, Labels: {}", node.id, node.labels_joined())
}

fn parse_node_ids(raw: &str) -> Result<Vec<String>, String> {
    let ids = split_list(raw);
    if ids.is_empty() {
        return Err("Provide at least one node ID.".into());
    }
    Ok(ids)
}

fn require_label(label: &str) -> Result<String, String> {
    let l = label.trim();
    if l.is_empty() { Err("Label is required.".into()) } else { Ok(l.to_string()) }
}

// ---------------------------------------------------------------------------
// Search

#[derive(Clone, Debug, PartialEq)]
pub struct FilterRow {
    pub property: String,
    pub operator: Operator,
    pub value: String,
}

impl Default for FilterRow {
    fn default() -> Self { Self { property: String::new(), operator: Operator::Eq, value: String::new() } }
}

impl FilterRow {
    pub fn is_filled(&self) -> bool { !self.property.trim().is_empty() && !self.value.is_empty() }

    /// Parses `prop OP value`, e.g. `age>=30`, `tags IN a,b`, `name CONTAINS an`.
    pub fn parse_expr(expr: &str) -> Result<Self, String> {
        let upper = expr.to_ascii_uppercase();
        for op in [Operator::Contains, Operator::In] {
            let needle = format!(" {} ", op.as_str());
            if let Some(idx) = upper.find(&needle) {
                return Self::from_parts(&expr[..idx], op, &expr[idx + needle.len()..], expr);
            }
        }
        let Some(idx) = expr.find(['<', '>', '=']) else {
            return Err(format!("no operator in filter '{}'", expr));
        };
        let rest = &expr[idx..];
        let (op, len) = if rest.starts_with("<=") {
            (Operator::Le, 2)
        } else if rest.starts_with(">=") {
            (Operator::Ge, 2)
        } else if rest.starts_with('<') {
            (Operator::Lt, 1)
        } else if rest.starts_with('>') {
            (Operator::Gt, 1)
        } else {
            (Operator::Eq, 1)
        };
        Self::from_parts(&expr[..idx], op, &rest[len..], expr)
    }

    fn from_parts(property: &str, operator: Operator, value: &str, expr: &str) -> Result<Self, String> {
        let property = property.trim();
        let value = value.trim();
        if property.is_empty() || value.is_empty() {
            return Err(format!("incomplete filter '{}'", expr));
        }
        Ok(Self { property: property.to_string(), operator, value: value.to_string() })
    }
}

/// Search inputs. Failures land in the shared session, not on this form.
#[derive(Clone, Debug)]
pub struct SearchForm {
    pub labels: String,
    pub filters: Vec<FilterRow>,
    pub limit: String,
    pub default_limit: u32,
    pub feedback: Feedback,
}

impl Default for SearchForm {
    fn default() -> Self { Self::new(SearchRequest::DEFAULT_LIMIT) }
}

impl SearchForm {
    pub fn new(default_limit: u32) -> Self {
        Self {
            labels: String::new(),
            filters: vec![FilterRow::default()],
            limit: default_limit.to_string(),
            default_limit,
            feedback: Feedback::default(),
        }
    }

    pub fn add_filter(&mut self) { self.filters.push(FilterRow::default()); }

    pub fn remove_filter(&mut self, idx: usize) {
        if self.filters.len() > 1 && idx < self.filters.len() {
            self.filters.remove(idx);
        }
    }

    /// Unparseable or zero limits fall back to the default.
    pub fn effective_limit(&self) -> u32 {
        match self.limit.trim().parse::<u32>() {
            Ok(n) if n > 0 => n,
            _ => self.default_limit,
        }
    }

    pub fn build_request(&self) -> SearchRequest {
        let mut filters = BTreeMap::new();
        for f in self.filters.iter().filter(|f| f.is_filled()) {
            filters.insert(f.property.trim().to_string(), Filter::from_input(f.operator, &f.value));
        }
        SearchRequest { labels: split_list(&self.labels), filters, limit: self.effective_limit() }
    }
}

impl SubmitForm for SearchForm {
    type Store = NodeSessionStore;
    type Request = SearchRequest;
    type Response = SearchResponse;

    fn feedback(&self) -> &Feedback { &self.feedback }
    fn feedback_mut(&mut self) -> &mut Feedback { &mut self.feedback }

    fn prepare(&self) -> Result<SearchRequest, String> { Ok(self.build_request()) }

    fn execute(store: &NodeSessionStore, request: SearchRequest) -> Result<SearchResponse, RequestError> {
        store.search_nodes(&request)
    }

    // Inputs are kept so the search can be refined
    fn on_success(&mut self, _response: SearchResponse) {}

    fn on_failure(&mut self, _error: RequestError) {}
}

// ---------------------------------------------------------------------------
// Aggregation

#[derive(Clone, Debug, Default)]
pub struct AggregateForm {
    pub label: String,
    pub property: String,
    pub feedback: Feedback,
}

impl SubmitForm for AggregateForm {
    type Store = NodeSessionStore;
    type Request = AggregateRequest;
    type Response = Aggregation;

    fn feedback(&self) -> &Feedback { &self.feedback }
    fn feedback_mut(&mut self) -> &mut Feedback { &mut self.feedback }

    fn prepare(&self) -> Result<AggregateRequest, String> {
        let label = self.label.trim();
        let property = self.property.trim();
        if label.is_empty() || property.is_empty() {
            return Err("Label and numeric property are required.".into());
        }
        Ok(AggregateRequest { label: label.to_string(), property: property.to_string() })
    }

    fn execute(store: &NodeSessionStore, request: AggregateRequest) -> Result<Aggregation, RequestError> {
        store.get_aggregated_data(&request)
    }

    fn on_success(&mut self, _response: Aggregation) {}

    fn on_failure(&mut self, _error: RequestError) {}
}

// ---------------------------------------------------------------------------
// Creation

#[derive(Clone, Debug, Default)]
pub struct CreateNodeSingleForm {
    pub label: String,
    pub feedback: Feedback,
}

impl SubmitForm for CreateNodeSingleForm {
    type Store = NodeSessionStore;
    type Request = CreateNodeSingleRequest;
    type Response = CreatedNodeResponse;

    fn feedback(&self) -> &Feedback { &self.feedback }
    fn feedback_mut(&mut self) -> &mut Feedback { &mut self.feedback }

    fn prepare(&self) -> Result<CreateNodeSingleRequest, String> {
        let label = self.label.trim();
        if label.is_empty() {
            return Err("A label is required.".into());
        }
        Ok(CreateNodeSingleRequest { label: label.to_string() })
    }

    fn execute(store: &NodeSessionStore, request: CreateNodeSingleRequest) -> Result<CreatedNodeResponse, RequestError> {
        store.create_node_single(&request)
    }

    fn on_success(&mut self, response: CreatedNodeResponse) {
        let msg = match (&response.node, response.message) {
            (Some(node), _) => created_node_message(node),
            (None, Some(m)) => m,
            (None, None) => "Node created.".into(),
        };
        self.feedback.success(msg);
        self.label.clear();
    }
}

/// Comma separated labels; at least two are required. Duplicates are kept.
#[derive(Clone, Debug, Default)]
pub struct CreateNodeMultiForm {
    pub labels: String,
    pub feedback: Feedback,
}

impl SubmitForm for CreateNodeMultiForm {
    type Store = NodeSessionStore;
    type Request = CreateNodeMultipleRequest;
    type Response = CreatedNodeResponse;

    fn feedback(&self) -> &Feedback { &self.feedback }
    fn feedback_mut(&mut self) -> &mut Feedback { &mut self.feedback }

    fn prepare(&self) -> Result<CreateNodeMultipleRequest, String> {
        let labels = split_list(&self.labels);
        if labels.len() < MIN_LABELS_MULTI {
            return Err("Provide at least two labels.".into());
        }
        Ok(CreateNodeMultipleRequest { labels })
    }

    fn execute(store: &NodeSessionStore, request: CreateNodeMultipleRequest) -> Result<CreatedNodeResponse, RequestError> {
        store.create_node_multiple(&request)
    }

    fn on_success(&mut self, response: CreatedNodeResponse) {
        let msg = match (&response.node, response.message) {
            (Some(node), _) => created_node_message(node),
            (None, Some(m)) => m,
            (None, None) => "Node with multiple labels created.".into(),
        };
        self.feedback.success(msg);
        self.labels.clear();
    }
}

#[derive(Clone, Debug)]
pub struct CreateNodeWithPropsForm {
    pub label: String,
    pub properties: Vec<(String, String)>,
    pub policy: ValuePolicy,
    pub feedback: Feedback,
}

impl Default for CreateNodeWithPropsForm {
    fn default() -> Self { Self::new(ValuePolicy::default()) }
}

impl CreateNodeWithPropsForm {
    pub fn new(policy: ValuePolicy) -> Self {
        Self { label: String::new(), properties: empty_rows(MIN_NODE_PROPERTIES), policy, feedback: Feedback::default() }
    }

    pub fn add_row(&mut self) { self.properties.push((String::new(), String::new())); }

    /// Rows can only be removed above the required minimum.
    pub fn remove_row(&mut self, idx: usize) {
        if self.properties.len() > MIN_NODE_PROPERTIES && idx < self.properties.len() {
            self.properties.remove(idx);
        }
    }
}

impl SubmitForm for CreateNodeWithPropsForm {
    type Store = NodeSessionStore;
    type Request = CreateNodeWithPropertiesRequest;
    type Response = CreatedNodeResponse;

    fn feedback(&self) -> &Feedback { &self.feedback }
    fn feedback_mut(&mut self) -> &mut Feedback { &mut self.feedback }

    fn prepare(&self) -> Result<CreateNodeWithPropertiesRequest, String> {
        let label = self.label.trim();
        if label.is_empty() {
            return Err("A label is required.".into());
        }
        let (properties, filled) = collect_properties(&self.properties, self.policy);
        if filled < MIN_NODE_PROPERTIES {
            return Err(format!("Provide at least {} properties.", MIN_NODE_PROPERTIES));
        }
        Ok(CreateNodeWithPropertiesRequest { label: label.to_string(), properties })
    }

    fn execute(
        store: &NodeSessionStore,
        request: CreateNodeWithPropertiesRequest,
    ) -> Result<CreatedNodeResponse, RequestError> {
        store.create_node_with_properties(&request)
    }

    fn on_success(&mut self, response: CreatedNodeResponse) {
        let msg = match (&response.node, response.message) {
            (Some(node), _) => format!("{}, Properties: {}", created_node_message(node), properties_json(&node.properties)),
            (None, Some(m)) => m,
            (None, None) => "Node with properties created.".into(),
        };
        self.feedback.success(msg);
        self.label.clear();
        self.properties = empty_rows(MIN_NODE_PROPERTIES);
    }
}

// ---------------------------------------------------------------------------
// Bulk property edits and deletion

#[derive(Clone, Debug)]
pub struct UpdateNodesForm {
    pub label: String,
    pub node_ids: String,
    pub properties: Vec<(String, String)>,
    pub policy: ValuePolicy,
    pub feedback: Feedback,
}

impl Default for UpdateNodesForm {
    fn default() -> Self { Self::new(ValuePolicy::default()) }
}

impl UpdateNodesForm {
    pub fn new(policy: ValuePolicy) -> Self {
        Self { label: String::new(), node_ids: String::new(), properties: empty_rows(1), policy, feedback: Feedback::default() }
    }
}

impl SubmitForm for UpdateNodesForm {
    type Store = NodeSessionStore;
    type Request = UpdateNodesRequest;
    type Response = BulkOutcome;

    fn feedback(&self) -> &Feedback { &self.feedback }
    fn feedback_mut(&mut self) -> &mut Feedback { &mut self.feedback }

    fn prepare(&self) -> Result<UpdateNodesRequest, String> {
        let label = require_label(&self.label)?;
        let node_ids = parse_node_ids(&self.node_ids)?;
        let (properties, filled) = collect_properties(&self.properties, self.policy);
        if filled == 0 {
            return Err("Provide at least one property to update.".into());
        }
        Ok(UpdateNodesRequest { label, node_ids, properties })
    }

    fn execute(store: &NodeSessionStore, request: UpdateNodesRequest) -> Result<BulkOutcome, RequestError> {
        store.update_nodes_properties(&request)
    }

    fn on_success(&mut self, response: BulkOutcome) {
        let msg = match (response.updated_count, &response.message) {
            (Some(n), _) => format!("Properties updated on {} node(s).", n),
            (None, Some(m)) => m.clone(),
            (None, None) => "Update completed.".into(),
        };
        self.feedback.success(msg);
        self.feedback.partial_errors(&response.errors);
        self.label.clear();
        self.node_ids.clear();
        self.properties = empty_rows(1);
    }
}

#[derive(Clone, Debug)]
pub struct RemoveNodePropsForm {
    pub label: String,
    pub node_ids: String,
    pub properties: Vec<String>,
    pub feedback: Feedback,
}

impl Default for RemoveNodePropsForm {
    fn default() -> Self {
        Self { label: String::new(), node_ids: String::new(), properties: vec![String::new()], feedback: Feedback::default() }
    }
}

impl SubmitForm for RemoveNodePropsForm {
    type Store = NodeSessionStore;
    type Request = RemoveNodePropertiesRequest;
    type Response = BulkOutcome;

    fn feedback(&self) -> &Feedback { &self.feedback }
    fn feedback_mut(&mut self) -> &mut Feedback { &mut self.feedback }

    fn prepare(&self) -> Result<RemoveNodePropertiesRequest, String> {
        let label = require_label(&self.label)?;
        let node_ids = parse_node_ids(&self.node_ids)?;
        let properties = collect_names(&self.properties);
        if properties.is_empty() {
            return Err("Provide at least one property to remove.".into());
        }
        Ok(RemoveNodePropertiesRequest { label, node_ids, properties })
    }

    fn execute(store: &NodeSessionStore, request: RemoveNodePropertiesRequest) -> Result<BulkOutcome, RequestError> {
        store.remove_nodes_properties(&request)
    }

    fn on_success(&mut self, response: BulkOutcome) {
        let msg = match (response.updated_count, &response.message) {
            (Some(n), _) => format!("Properties removed on {} node(s).", n),
            (None, Some(m)) => m.clone(),
            (None, None) => "Properties removed.".into(),
        };
        self.feedback.success(msg);
        self.feedback.partial_errors(&response.errors);
        self.label.clear();
        self.node_ids.clear();
        self.properties = vec![String::new()];
    }
}

#[derive(Clone, Debug, Default)]
pub struct DeleteNodesForm {
    pub label: String,
    pub node_ids: String,
    pub feedback: Feedback,
}

impl SubmitForm for DeleteNodesForm {
    type Store = NodeSessionStore;
    type Request = DeleteNodesRequest;
    type Response = BulkOutcome;

    fn feedback(&self) -> &Feedback { &self.feedback }
    fn feedback_mut(&mut self) -> &mut Feedback { &mut self.feedback }

    fn prepare(&self) -> Result<DeleteNodesRequest, String> {
        let label = require_label(&self.label)?;
        let node_ids = parse_node_ids(&self.node_ids)?;
        Ok(DeleteNodesRequest { label, node_ids })
    }

    fn execute(store: &NodeSessionStore, request: DeleteNodesRequest) -> Result<BulkOutcome, RequestError> {
        store.delete_nodes(&request)
    }

    fn on_success(&mut self, response: BulkOutcome) {
        let mut msg = response.message.clone().unwrap_or_else(|| "Deletion completed.".into());
        if let Some(n) = response.deleted_count {
            msg.push_str(&format!(" Nodes deleted: {}.", n));
        }
        self.feedback.success(msg);
        self.feedback.partial_errors(&response.errors);
        self.label.clear();
        self.node_ids.clear();
    }
}
