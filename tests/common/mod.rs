#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use graph_desk::api::{Endpoint, Gateway, RequestError};
use graph_desk::store::{NodeSessionStore, RelationshipStore};
use serde_json::Value;

/// In-process gateway that records every call and answers from a queue.
/// An empty queue answers `Value::Null`.
#[derive(Default)]
pub struct RecordingGateway {
    calls: Mutex<Vec<(Endpoint, Option<Value>)>>,
    replies: Mutex<VecDeque<Result<Value, RequestError>>>,
}

impl RecordingGateway {
    pub fn new() -> Arc<Self> { Arc::new(Self::default()) }

    pub fn reply(&self, r: Result<Value, RequestError>) { self.replies.lock().unwrap().push_back(r); }

    pub fn calls(&self) -> Vec<(Endpoint, Option<Value>)> { self.calls.lock().unwrap().clone() }

    pub fn last_payload(&self) -> Value {
        self.calls().last().and_then(|(_, p)| p.clone()).expect("a call with a payload")
    }
}

impl Gateway for RecordingGateway {
    fn call(&self, endpoint: Endpoint, payload: Option<&Value>) -> Result<Value, RequestError> {
        self.calls.lock().unwrap().push((endpoint, payload.cloned()));
        self.replies.lock().unwrap().pop_front().unwrap_or(Ok(Value::Null))
    }
}

pub fn node_store(gw: &Arc<RecordingGateway>) -> NodeSessionStore { NodeSessionStore::new(gw.clone()) }

pub fn rel_store(gw: &Arc<RecordingGateway>) -> RelationshipStore { RelationshipStore::new(gw.clone()) }
