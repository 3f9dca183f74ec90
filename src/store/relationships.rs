use std::sync::Arc;

use crate::api::models::{
    self, BulkOutcome, BulkRequest, CreateRelationshipRequest, CreatedRelationshipResponse,
    RelationshipPropertyRemoval, RelationshipUpdate,
};
use crate::api::{Endpoint, Gateway, RequestError};
use crate::graph_utils::graph::RelationshipEndpoints;

/// Relationship operations. Holds no observable state; each caller keeps
/// its own outcome.
#[derive(Clone)]
pub struct RelationshipStore {
    gateway: Arc<dyn Gateway>,
}

impl RelationshipStore {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self { Self { gateway } }

    fn send<Req: serde::Serialize, Resp: serde::de::DeserializeOwned + Default>(
        &self,
        endpoint: Endpoint,
        body: &Req,
    ) -> Result<Resp, RequestError> {
        let payload = models::encode(body)?;
        models::decode(self.gateway.call(endpoint, Some(&payload))?)
    }

    pub fn create_relationship(
        &self,
        request: &CreateRelationshipRequest,
    ) -> Result<CreatedRelationshipResponse, RequestError> {
        self.send(Endpoint::CreateRelationship, request)
    }

    pub fn update_bulk_relationships(&self, relationships: Vec<RelationshipUpdate>) -> Result<BulkOutcome, RequestError> {
        self.send(Endpoint::UpdateBulkRelationships, &BulkRequest { relationships })
    }

    pub fn remove_bulk_relationships(
        &self,
        relationships: Vec<RelationshipPropertyRemoval>,
    ) -> Result<BulkOutcome, RequestError> {
        self.send(Endpoint::RemoveBulkRelationships, &BulkRequest { relationships })
    }

    pub fn delete_bulk_relationships(
        &self,
        relationships: Vec<RelationshipEndpoints>,
    ) -> Result<BulkOutcome, RequestError> {
        self.send(Endpoint::DeleteBulkRelationships, &BulkRequest { relationships })
    }
}
