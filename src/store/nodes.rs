use std::sync::{Arc, PoisonError, RwLock};

use super::Channel;
use crate::api::models::{
    self, AggregateRequest, BulkOutcome, CreateNodeMultipleRequest, CreateNodeSingleRequest,
    CreateNodeWithPropertiesRequest, CreatedNodeResponse, DeleteNodesRequest, RemoveNodePropertiesRequest,
    SearchRequest, SearchResponse, UpdateNodesRequest,
};
use crate::api::{Endpoint, Gateway, RequestError};
use crate::graph_utils::graph::{Aggregation, Node};

/// Last aggregation together with the label/property pair it was computed for.
#[derive(Clone, Debug, PartialEq)]
pub struct AggregateSnapshot {
    pub label: String,
    pub property: String,
    pub data: Aggregation,
}

/// Observable node state: search results and the latest aggregation live on
/// independent channels.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeSession {
    pub search: Channel<Vec<Node>>,
    // false until a search has completed, successfully or not
    pub searched: bool,
    pub aggregation: Channel<AggregateSnapshot>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeAction {
    SearchStart,
    SearchSuccess(Vec<Node>),
    SearchError(String),
    AggregateStart,
    AggregateSuccess(AggregateSnapshot),
    AggregateError(String),
}

impl NodeSession {
    pub fn reduce(&mut self, action: NodeAction) {
        match action {
            NodeAction::SearchStart => self.search = Channel::Loading,
            NodeAction::SearchSuccess(nodes) => {
                self.search = Channel::Ready(nodes);
                self.searched = true;
            }
            NodeAction::SearchError(msg) => {
                self.search = Channel::Failed(msg);
                self.searched = true;
            }
            NodeAction::AggregateStart => self.aggregation = Channel::Loading,
            NodeAction::AggregateSuccess(snapshot) => self.aggregation = Channel::Ready(snapshot),
            NodeAction::AggregateError(msg) => self.aggregation = Channel::Failed(msg),
        }
    }

    /// Nodes from the last successful search; empty in every other state.
    pub fn nodes(&self) -> &[Node] {
        self.search.value().map(|v| v.as_slice()).unwrap_or(&[])
    }
}

/// Node operations plus the shared session state. Clones share both the
/// gateway and the state.
#[derive(Clone)]
pub struct NodeSessionStore {
    gateway: Arc<dyn Gateway>,
    state: Arc<RwLock<NodeSession>>,
}

impl NodeSessionStore {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway, state: Arc::new(RwLock::new(NodeSession::default())) }
    }

    pub fn snapshot(&self) -> NodeSession {
        self.state.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn dispatch(&self, action: NodeAction) {
        log::trace!("node session action: {:?}", action);
        self.state.write().unwrap_or_else(PoisonError::into_inner).reduce(action);
    }

    fn send<Req: serde::Serialize, Resp: serde::de::DeserializeOwned + Default>(
        &self,
        endpoint: Endpoint,
        body: &Req,
    ) -> Result<Resp, RequestError> {
        let payload = models::encode(body)?;
        let raw = self.gateway.call(endpoint, Some(&payload))?;
        models::decode(raw)
    }

    pub fn search_nodes(&self, request: &SearchRequest) -> Result<SearchResponse, RequestError> {
        self.dispatch(NodeAction::SearchStart);
        match self.send::<_, SearchResponse>(Endpoint::SearchNodes, request) {
            Ok(resp) => {
                self.dispatch(NodeAction::SearchSuccess(resp.nodes.clone()));
                Ok(resp)
            }
            Err(e) => {
                self.dispatch(NodeAction::SearchError(e.message().to_string()));
                Err(e)
            }
        }
    }

    pub fn get_aggregated_data(&self, request: &AggregateRequest) -> Result<Aggregation, RequestError> {
        self.dispatch(NodeAction::AggregateStart);
        match self.send::<_, Aggregation>(Endpoint::AggregatedData, request) {
            Ok(data) => {
                self.dispatch(NodeAction::AggregateSuccess(AggregateSnapshot {
                    label: request.label.clone(),
                    property: request.property.clone(),
                    data: data.clone(),
                }));
                Ok(data)
            }
            Err(e) => {
                self.dispatch(NodeAction::AggregateError(e.message().to_string()));
                Err(e)
            }
        }
    }

    pub fn create_node_single(&self, request: &CreateNodeSingleRequest) -> Result<CreatedNodeResponse, RequestError> {
        self.send(Endpoint::CreateNodeSingleLabel, request)
    }

    pub fn create_node_multiple(&self, request: &CreateNodeMultipleRequest) -> Result<CreatedNodeResponse, RequestError> {
        self.send(Endpoint::CreateNodeMultipleLabels, request)
    }

    pub fn create_node_with_properties(
        &self,
        request: &CreateNodeWithPropertiesRequest,
    ) -> Result<CreatedNodeResponse, RequestError> {
        self.send(Endpoint::CreateNodeWithProperties, request)
    }

    pub fn update_nodes_properties(&self, request: &UpdateNodesRequest) -> Result<BulkOutcome, RequestError> {
        self.send(Endpoint::UpdateNodesProperties, request)
    }

    pub fn remove_nodes_properties(&self, request: &RemoveNodePropertiesRequest) -> Result<BulkOutcome, RequestError> {
        self.send(Endpoint::RemoveNodesProperties, request)
    }

    pub fn delete_nodes(&self, request: &DeleteNodesRequest) -> Result<BulkOutcome, RequestError> {
        self.send(Endpoint::DeleteNodes, request)
    }
}
