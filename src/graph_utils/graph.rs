use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

// Property maps are ordered so payloads and messages are stable
pub type Properties = BTreeMap<String, PropertyValue>;

/// Reads an explicit `null` the same as a missing field.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Backend-assigned node identifier. The backend may hand back either
/// numeric ids or opaque element ids, so both shapes are accepted.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeId {
    Int(i64),
    Text(String),
}

impl NodeId {
    /// Numeric text becomes an integer id; everything else stays a string.
    pub fn from_input(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<i64>() {
            Ok(n) => NodeId::Int(n),
            Err(_) => NodeId::Text(trimmed.to_string()),
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Int(n) => write!(f, "{}", n),
            NodeId::Text(s) => f.write_str(s),
        }
    }
}

impl Default for NodeId {
    fn default() -> Self { NodeId::Text(String::new()) }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<PropertyValue>),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Bool(b) => write!(f, "{}", b),
            PropertyValue::Int(n) => write!(f, "{}", n),
            PropertyValue::Float(x) => write!(f, "{}", x),
            PropertyValue::Text(s) => f.write_str(s),
            PropertyValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 { f.write_str(",")?; }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self { PropertyValue::Text(s.to_string()) }
}

impl From<i64> for PropertyValue {
    fn from(n: i64) -> Self { PropertyValue::Int(n) }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self { PropertyValue::Bool(b) }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: NodeId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub labels: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub properties: Properties,
}

impl Node {
    pub fn labels_joined(&self) -> String { self.labels.join(", ") }
}

/// Comparison operators understood by the search endpoint.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[default]
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "IN")]
    In,
    #[serde(rename = "CONTAINS")]
    Contains,
}

impl Operator {
    pub const ALL: [Operator; 7] = [
        Operator::Eq,
        Operator::Lt,
        Operator::Le,
        Operator::Gt,
        Operator::Ge,
        Operator::In,
        Operator::Contains,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::In => "IN",
            Operator::Contains => "CONTAINS",
        }
    }

    /// IN / CONTAINS accept a comma separated list of values.
    pub fn takes_list(&self) -> bool { matches!(self, Operator::In | Operator::Contains) }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    One(String),
    Many(Vec<String>),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub operator: Operator,
    pub value: FilterValue,
}

impl Filter {
    /// Builds a filter from raw form text. List operators split on commas,
    /// dropping blank items; other operators keep the text as typed.
    pub fn from_input(operator: Operator, raw: &str) -> Self {
        let value = if operator.takes_list() && raw.contains(',') {
            FilterValue::Many(
                raw.split(',')
                    .map(|v| v.trim())
                    .filter(|v| !v.is_empty())
                    .map(|v| v.to_string())
                    .collect(),
            )
        } else {
            FilterValue::One(raw.to_string())
        };
        Filter { operator, value }
    }
}

/// Addresses a relationship by its two endpoint nodes and its type.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipEndpoints {
    pub label1: String,
    pub node1_id: NodeId,
    pub label2: String,
    pub node2_id: NodeId,
    pub rel_type: String,
}

impl RelationshipEndpoints {
    pub const FIELD_NAMES: [&'static str; 5] = ["label1", "node1_id", "label2", "node2_id", "rel_type"];
}

impl fmt::Display for RelationshipEndpoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}:{})-[{}]->({}:{})",
            self.label1, self.node1_id, self.rel_type, self.label2, self.node2_id
        )
    }
}

/// Summary statistics for one numeric property over a label.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: u64,
    #[serde(default)]
    pub avg: Option<PropertyValue>,
    #[serde(default)]
    pub max: Option<PropertyValue>,
    #[serde(default)]
    pub min: Option<PropertyValue>,
    #[serde(default)]
    pub sum: Option<PropertyValue>,
}
