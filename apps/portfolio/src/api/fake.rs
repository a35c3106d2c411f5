//! In-memory `ContentSource` for tests. Reads can be held behind a gate so
//! tests decide when, and in which order, responses arrive.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Notify;

use super::ContentSource;
use crate::errors::ClientError;

#[derive(Default)]
pub(crate) struct FakeSource {
    responses: Mutex<HashMap<String, Result<Value, u16>>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    post_statuses: Mutex<HashMap<String, u16>>,
    gets: Mutex<Vec<String>>,
    posts: Mutex<Vec<(String, Option<Value>)>>,
}

impl FakeSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, path: &str, body: Value) {
        self.responses
            .lock()
            .unwrap()
            .insert(path.to_string(), Ok(body));
    }

    pub fn fail(&self, path: &str, status: u16) {
        self.responses
            .lock()
            .unwrap()
            .insert(path.to_string(), Err(status));
    }

    pub fn post_status(&self, path: &str, status: u16) {
        self.post_statuses
            .lock()
            .unwrap()
            .insert(path.to_string(), status);
    }

    /// Holds reads of `path` until the returned gate is notified.
    pub fn gate(&self, path: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(path.to_string(), gate.clone());
        gate
    }

    pub fn gets(&self) -> Vec<String> {
        self.gets.lock().unwrap().clone()
    }

    pub fn posts(&self) -> Vec<(String, Option<Value>)> {
        self.posts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentSource for FakeSource {
    async fn get_json(&self, path: &str) -> Result<Value, ClientError> {
        self.gets.lock().unwrap().push(path.to_string());

        let gate = self.gates.lock().unwrap().get(path).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let response = self.responses.lock().unwrap().get(path).cloned();
        match response {
            Some(Ok(body)) => Ok(body),
            Some(Err(status)) => Err(ClientError::Status { status }),
            None => Err(ClientError::Status { status: 404 }),
        }
    }

    async fn post(&self, path: &str, body: Option<&Value>) -> Result<u16, ClientError> {
        self.posts
            .lock()
            .unwrap()
            .push((path.to_string(), body.cloned()));
        Ok(self
            .post_statuses
            .lock()
            .unwrap()
            .get(path)
            .copied()
            .unwrap_or(200))
    }
}
