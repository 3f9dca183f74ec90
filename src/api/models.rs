//! Request and response bodies for the backend routes.
//!
//! Responses are deliberately tolerant: every field is optional or defaulted,
//! since the backend answers with either a structured object or a bare
//! `message`.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::RequestError;
use crate::graph_utils::graph::{null_as_default, Filter, Node, NodeId, Properties, RelationshipEndpoints};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SearchRequest {
    pub labels: Vec<String>,
    pub filters: BTreeMap<String, Filter>,
    pub limit: u32,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self { labels: Vec::new(), filters: BTreeMap::new(), limit: SearchRequest::DEFAULT_LIMIT }
    }
}

impl SearchRequest {
    pub const DEFAULT_LIMIT: u32 = 100;
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nodes: Vec<Node>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AggregateRequest {
    pub label: String,
    pub property: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CreateNodeSingleRequest {
    pub label: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CreateNodeMultipleRequest {
    pub labels: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CreateNodeWithPropertiesRequest {
    pub label: String,
    pub properties: Properties,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct CreatedNodeResponse {
    #[serde(default)]
    pub node: Option<Node>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UpdateNodesRequest {
    pub label: String,
    pub node_ids: Vec<String>,
    pub properties: Properties,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RemoveNodePropertiesRequest {
    pub label: String,
    pub node_ids: Vec<String>,
    pub properties: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DeleteNodesRequest {
    pub label: String,
    pub node_ids: Vec<String>,
}

/// Result of any update/remove/delete call. `errors` lists per-item
/// failures that did not fail the request as a whole.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct BulkOutcome {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, rename = "updatedCount")]
    pub updated_count: Option<u64>,
    #[serde(default, rename = "deletedCount")]
    pub deleted_count: Option<u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CreateRelationshipRequest {
    #[serde(flatten)]
    pub endpoints: RelationshipEndpoints,
    pub properties: Properties,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct CreatedRelationship {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: NodeId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub properties: Properties,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct CreatedRelationshipResponse {
    #[serde(default)]
    pub relationship: Option<CreatedRelationship>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Bulk update descriptor: the property map sits next to the endpoint fields.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RelationshipUpdate {
    #[serde(flatten)]
    pub endpoints: RelationshipEndpoints,
    #[serde(flatten)]
    pub properties: Properties,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RelationshipPropertyRemoval {
    #[serde(flatten)]
    pub endpoints: RelationshipEndpoints,
    pub properties: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BulkRequest<T> {
    pub relationships: Vec<T>,
}

pub fn encode<T: Serialize>(body: &T) -> Result<Value, RequestError> {
    serde_json::to_value(body).map_err(|e| RequestError::Decode(format!("could not encode request: {}", e)))
}

/// `Null` (no usable body) decodes to the default response.
pub fn decode<T: DeserializeOwned + Default>(body: Value) -> Result<T, RequestError> {
    if body.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(body).map_err(|e| RequestError::Decode(format!("unexpected response: {}", e)))
}
