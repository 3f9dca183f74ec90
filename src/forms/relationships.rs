use super::values::{collect_names, collect_properties, ValuePolicy};
use super::{Feedback, SubmitForm};
use crate::api::models::{
    BulkOutcome, CreateRelationshipRequest, CreatedRelationshipResponse, RelationshipPropertyRemoval,
    RelationshipUpdate,
};
use crate::api::RequestError;
use crate::graph_utils::graph::{NodeId, RelationshipEndpoints};
use crate::store::RelationshipStore;

pub const MIN_RELATIONSHIP_PROPERTIES: usize = 3;

const INCOMPLETE_ROW: &str = "Fill in every required field for each relationship.";

fn empty_rows(n: usize) -> Vec<(String, String)> { vec![(String::new(), String::new()); n] }

/// Raw inputs addressing one relationship.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EndpointFields {
    pub label1: String,
    pub node1_id: String,
    pub label2: String,
    pub node2_id: String,
    pub rel_type: String,
}

impl EndpointFields {
    pub fn is_complete(&self) -> bool {
        [&self.label1, &self.node1_id, &self.label2, &self.node2_id, &self.rel_type]
            .iter()
            .all(|f| !f.trim().is_empty())
    }

    /// Numeric ids are sent as integers.
    pub fn to_endpoints(&self) -> RelationshipEndpoints {
        RelationshipEndpoints {
            label1: self.label1.trim().to_string(),
            node1_id: NodeId::from_input(&self.node1_id),
            label2: self.label2.trim().to_string(),
            node2_id: NodeId::from_input(&self.node2_id),
            rel_type: self.rel_type.trim().to_string(),
        }
    }

    /// Parses `Label1:id1-[TYPE]->Label2:id2`.
    pub fn parse_pattern(pattern: &str) -> Result<Self, String> {
        let bad = || format!("expected Label1:id1-[TYPE]->Label2:id2, got '{}'", pattern);
        let (left, rest) = pattern.split_once("-[").ok_or_else(bad)?;
        let (rel_type, right) = rest.split_once("]->").ok_or_else(bad)?;
        let (label1, node1_id) = left.split_once(':').ok_or_else(bad)?;
        let (label2, node2_id) = right.split_once(':').ok_or_else(bad)?;
        let fields = Self {
            label1: label1.trim().to_string(),
            node1_id: node1_id.trim().to_string(),
            label2: label2.trim().to_string(),
            node2_id: node2_id.trim().to_string(),
            rel_type: rel_type.trim().to_string(),
        };
        if !fields.is_complete() {
            return Err(bad());
        }
        Ok(fields)
    }
}

fn bulk_message(response: &BulkOutcome, fallback: &str, count_label: &str, count: Option<u64>) -> String {
    let mut msg = response.message.clone().unwrap_or_else(|| fallback.to_string());
    if let Some(n) = count {
        msg.push_str(&format!(" {}: {}.", count_label, n));
    }
    msg
}

// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct CreateRelationshipForm {
    pub endpoints: EndpointFields,
    pub properties: Vec<(String, String)>,
    pub policy: ValuePolicy,
    pub feedback: Feedback,
}

impl Default for CreateRelationshipForm {
    fn default() -> Self { Self::new(ValuePolicy::default()) }
}

impl CreateRelationshipForm {
    pub fn new(policy: ValuePolicy) -> Self {
        Self {
            endpoints: EndpointFields::default(),
            properties: empty_rows(MIN_RELATIONSHIP_PROPERTIES),
            policy,
            feedback: Feedback::default(),
        }
    }

    pub fn add_row(&mut self) { self.properties.push((String::new(), String::new())); }

    pub fn remove_row(&mut self, idx: usize) {
        if self.properties.len() > MIN_RELATIONSHIP_PROPERTIES && idx < self.properties.len() {
            self.properties.remove(idx);
        }
    }
}

impl SubmitForm for CreateRelationshipForm {
    type Store = RelationshipStore;
    type Request = CreateRelationshipRequest;
    type Response = CreatedRelationshipResponse;

    fn feedback(&self) -> &Feedback { &self.feedback }
    fn feedback_mut(&mut self) -> &mut Feedback { &mut self.feedback }

    fn prepare(&self) -> Result<CreateRelationshipRequest, String> {
        if !self.endpoints.is_complete() {
            return Err("All node and type fields are required.".into());
        }
        let (properties, filled) = collect_properties(&self.properties, self.policy);
        if filled < MIN_RELATIONSHIP_PROPERTIES {
            return Err(format!(
                "Provide at least {} properties for the relationship.",
                MIN_RELATIONSHIP_PROPERTIES
            ));
        }
        Ok(CreateRelationshipRequest { endpoints: self.endpoints.to_endpoints(), properties })
    }

    fn execute(
        store: &RelationshipStore,
        request: CreateRelationshipRequest,
    ) -> Result<CreatedRelationshipResponse, RequestError> {
        store.create_relationship(&request)
    }

    fn on_success(&mut self, response: CreatedRelationshipResponse) {
        let msg = match (&response.relationship, response.message) {
            (Some(rel), _) => format!(
                "Relationship created. ID: {}, Properties: {}",
                rel.id,
                serde_json::to_string(&rel.properties).unwrap_or_else(|_| "{}".into())
            ),
            (None, Some(m)) => m,
            (None, None) => "Relationship created.".into(),
        };
        self.feedback.success(msg);
        self.endpoints = EndpointFields::default();
        self.properties = empty_rows(MIN_RELATIONSHIP_PROPERTIES);
    }
}

// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct RelationshipUpdateRow {
    pub endpoints: EndpointFields,
    pub properties: Vec<(String, String)>,
}

impl Default for RelationshipUpdateRow {
    fn default() -> Self { Self { endpoints: EndpointFields::default(), properties: empty_rows(1) } }
}

/// Sets or overwrites properties on several relationships in one call.
#[derive(Clone, Debug)]
pub struct UpdateRelationshipsForm {
    pub rows: Vec<RelationshipUpdateRow>,
    pub policy: ValuePolicy,
    pub feedback: Feedback,
}

impl Default for UpdateRelationshipsForm {
    fn default() -> Self { Self::new(ValuePolicy::default()) }
}

impl UpdateRelationshipsForm {
    pub fn new(policy: ValuePolicy) -> Self {
        Self { rows: vec![RelationshipUpdateRow::default()], policy, feedback: Feedback::default() }
    }

    pub fn add_row(&mut self) { self.rows.push(RelationshipUpdateRow::default()); }

    pub fn remove_row(&mut self, idx: usize) {
        if self.rows.len() > 1 && idx < self.rows.len() {
            self.rows.remove(idx);
        }
    }
}

impl SubmitForm for UpdateRelationshipsForm {
    type Store = RelationshipStore;
    type Request = Vec<RelationshipUpdate>;
    type Response = BulkOutcome;

    fn feedback(&self) -> &Feedback { &self.feedback }
    fn feedback_mut(&mut self) -> &mut Feedback { &mut self.feedback }

    fn prepare(&self) -> Result<Vec<RelationshipUpdate>, String> {
        let mut out = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            if !row.endpoints.is_complete() {
                return Err(INCOMPLETE_ROW.into());
            }
            let (properties, filled) = collect_properties(&row.properties, self.policy);
            if filled == 0 {
                return Err("Each relationship needs at least one property to update.".into());
            }
            // Properties are flattened next to the endpoint fields on the wire
            if let Some(key) = properties.keys().find(|k| RelationshipEndpoints::FIELD_NAMES.contains(&k.as_str())) {
                return Err(format!("Property name '{}' is reserved.", key));
            }
            out.push(RelationshipUpdate { endpoints: row.endpoints.to_endpoints(), properties });
        }
        Ok(out)
    }

    fn execute(store: &RelationshipStore, request: Vec<RelationshipUpdate>) -> Result<BulkOutcome, RequestError> {
        store.update_bulk_relationships(request)
    }

    fn on_success(&mut self, response: BulkOutcome) {
        let msg = bulk_message(&response, "Update completed.", "Relationships updated", response.updated_count);
        self.feedback.success(msg);
        self.feedback.partial_errors(&response.errors);
        self.rows = vec![RelationshipUpdateRow::default()];
    }
}

// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct RelationshipRemovalRow {
    pub endpoints: EndpointFields,
    pub properties: Vec<String>,
}

impl Default for RelationshipRemovalRow {
    fn default() -> Self { Self { endpoints: EndpointFields::default(), properties: vec![String::new()] } }
}

#[derive(Clone, Debug)]
pub struct RemoveRelationshipPropsForm {
    pub rows: Vec<RelationshipRemovalRow>,
    pub feedback: Feedback,
}

impl Default for RemoveRelationshipPropsForm {
    fn default() -> Self { Self { rows: vec![RelationshipRemovalRow::default()], feedback: Feedback::default() } }
}

impl RemoveRelationshipPropsForm {
    pub fn add_row(&mut self) { self.rows.push(RelationshipRemovalRow::default()); }

    pub fn remove_row(&mut self, idx: usize) {
        if self.rows.len() > 1 && idx < self.rows.len() {
            self.rows.remove(idx);
        }
    }
}

impl SubmitForm for RemoveRelationshipPropsForm {
    type Store = RelationshipStore;
    type Request = Vec<RelationshipPropertyRemoval>;
    type Response = BulkOutcome;

    fn feedback(&self) -> &Feedback { &self.feedback }
    fn feedback_mut(&mut self) -> &mut Feedback { &mut self.feedback }

    fn prepare(&self) -> Result<Vec<RelationshipPropertyRemoval>, String> {
        let mut out = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            if !row.endpoints.is_complete() {
                return Err(INCOMPLETE_ROW.into());
            }
            let properties = collect_names(&row.properties);
            if properties.is_empty() {
                return Err("Each relationship needs at least one property to remove.".into());
            }
            out.push(RelationshipPropertyRemoval { endpoints: row.endpoints.to_endpoints(), properties });
        }
        Ok(out)
    }

    fn execute(
        store: &RelationshipStore,
        request: Vec<RelationshipPropertyRemoval>,
    ) -> Result<BulkOutcome, RequestError> {
        store.remove_bulk_relationships(request)
    }

    fn on_success(&mut self, response: BulkOutcome) {
        let msg = bulk_message(&response, "Process completed.", "Relationships updated", response.updated_count);
        self.feedback.success(msg);
        self.feedback.partial_errors(&response.errors);
        self.rows = vec![RelationshipRemovalRow::default()];
    }
}

// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct DeleteRelationshipsForm {
    pub rows: Vec<EndpointFields>,
    pub feedback: Feedback,
}

impl Default for DeleteRelationshipsForm {
    fn default() -> Self { Self { rows: vec![EndpointFields::default()], feedback: Feedback::default() } }
}

impl DeleteRelationshipsForm {
    pub fn add_row(&mut self) { self.rows.push(EndpointFields::default()); }

    pub fn remove_row(&mut self, idx: usize) {
        if self.rows.len() > 1 && idx < self.rows.len() {
            self.rows.remove(idx);
        }
    }
}

impl SubmitForm for DeleteRelationshipsForm {
    type Store = RelationshipStore;
    type Request = Vec<RelationshipEndpoints>;
    type Response = BulkOutcome;

    fn feedback(&self) -> &Feedback { &self.feedback }
    fn feedback_mut(&mut self) -> &mut Feedback { &mut self.feedback }

    fn prepare(&self) -> Result<Vec<RelationshipEndpoints>, String> {
        if self.rows.iter().any(|r| !r.is_complete()) {
            return Err(INCOMPLETE_ROW.into());
        }
        Ok(self.rows.iter().map(EndpointFields::to_endpoints).collect())
    }

    fn execute(store: &RelationshipStore, request: Vec<RelationshipEndpoints>) -> Result<BulkOutcome, RequestError> {
        store.delete_bulk_relationships(request)
    }

    fn on_success(&mut self, response: BulkOutcome) {
        let msg = bulk_message(&response, "Process completed.", "Relationships deleted", response.deleted_count);
        self.feedback.success(msg);
        self.feedback.partial_errors(&response.errors);
        self.rows = vec![EndpointFields::default()];
    }
}
