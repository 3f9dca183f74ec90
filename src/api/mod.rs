use serde_json::Value;
use thiserror::Error;

pub mod http;
pub mod models;

pub use http::HttpGateway;

/// HTTP verbs used by the backend contract.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Method {
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// Every backend route the client talks to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    SearchNodes,
    AggregatedData,
    CreateNodeSingleLabel,
    CreateNodeMultipleLabels,
    CreateNodeWithProperties,
    UpdateNodesProperties,
    RemoveNodesProperties,
    DeleteNodes,
    CreateRelationship,
    UpdateBulkRelationships,
    RemoveBulkRelationships,
    DeleteBulkRelationships,
}

impl Endpoint {
    /// Path relative to the API base url.
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::SearchNodes => "search-nodes/",
            Endpoint::AggregatedData => "get-aggregated-data/",
            Endpoint::CreateNodeSingleLabel => "create-node-single-label/",
            Endpoint::CreateNodeMultipleLabels => "create-node-multiple-labels/",
            Endpoint::CreateNodeWithProperties => "create-node-with-properties/",
            Endpoint::UpdateNodesProperties => "update-multiple-nodes-properties/",
            Endpoint::RemoveNodesProperties => "remove-multiple-nodes-properties/",
            Endpoint::DeleteNodes => "delete-multiple-nodes/",
            Endpoint::CreateRelationship => "create-relationship/",
            Endpoint::UpdateBulkRelationships => "update-bulk-relationships/",
            Endpoint::RemoveBulkRelationships => "remove-bulk-relationship/",
            Endpoint::DeleteBulkRelationships => "delete-bulk-relationships/",
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Endpoint::SearchNodes
            | Endpoint::AggregatedData
            | Endpoint::CreateNodeSingleLabel
            | Endpoint::CreateNodeMultipleLabels
            | Endpoint::CreateNodeWithProperties
            | Endpoint::CreateRelationship => Method::Post,
            Endpoint::UpdateNodesProperties
            | Endpoint::RemoveNodesProperties
            | Endpoint::UpdateBulkRelationships
            | Endpoint::RemoveBulkRelationships => Method::Put,
            Endpoint::DeleteNodes | Endpoint::DeleteBulkRelationships => Method::Delete,
        }
    }
}

/// The single failure value every operation reports. Whatever the backend
/// sent is collapsed into one human readable string.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RequestError {
    /// Non-2xx response from the backend.
    #[error("{0}")]
    Backend(String),
    /// The request never produced a response.
    #[error("{0}")]
    Network(String),
    /// A 2xx response whose body did not have the expected shape.
    #[error("{0}")]
    Decode(String),
}

impl RequestError {
    pub fn message(&self) -> &str {
        match self {
            RequestError::Backend(m) | RequestError::Network(m) | RequestError::Decode(m) => m,
        }
    }
}

/// Seam between the session stores and the transport. The stores only ever
/// see parsed JSON or a `RequestError`.
pub trait Gateway: Send + Sync {
    /// Performs one call. A successful response with no usable JSON body
    /// yields `Value::Null`.
    fn call(&self, endpoint: Endpoint, payload: Option<&Value>) -> Result<Value, RequestError>;
}

/// Picks the error string for a failed response: `error`, then `errors`
/// serialized as JSON, then the status text.
pub fn extract_error_message(body: &Value, status_text: &str) -> String {
    if let Some(err) = body.get("error") {
        match err {
            Value::String(s) if !s.is_empty() => return s.clone(),
            Value::String(_) | Value::Null | Value::Bool(false) => {}
            other => return other.to_string(),
        }
    }
    if let Some(errs) = body.get("errors")
        && !errs.is_null()
    {
        return errs.to_string();
    }
    status_text.to_string()
}
