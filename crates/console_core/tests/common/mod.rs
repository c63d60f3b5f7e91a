#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use console_api::{Endpoints, FailureKind, Method, RequestOptions, Transport, TransportError};
use serde_json::{json, Value};
use tokio::sync::Notify;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: Method,
    pub url: String,
    pub options: RequestOptions,
}

struct QueuedReply {
    body: Result<Value, TransportError>,
    gate: Option<Arc<Notify>>,
}

/// Transport double that replays queued replies and records every call.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<QueuedReply>>,
    calls: Mutex<Vec<RecordedCall>>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        console_logging::initialize_for_tests();
        Self::default()
    }

    /// Every request waits for one `notify_one` on the returned handle.
    pub fn gated() -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let transport = Self {
            gate: Some(Arc::clone(&gate)),
            ..Self::new()
        };
        (transport, gate)
    }

    pub fn reply(&self, body: Value) {
        self.push(Ok(body), None);
    }

    /// Queues a reply that is held back until `gate` is notified.
    pub fn reply_when(&self, body: Value, gate: Arc<Notify>) {
        self.push(Ok(body), Some(gate));
    }

    pub fn fail(&self, status: u16) {
        self.push(
            Err(TransportError::new(
                FailureKind::HttpStatus(status),
                format!("status {status}"),
            )),
            None,
        );
    }

    fn push(&self, body: Result<Value, TransportError>, gate: Option<Arc<Notify>>) {
        self.replies
            .lock()
            .unwrap()
            .push_back(QueuedReply { body, gate });
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_params(&self) -> Value {
        self.calls()
            .last()
            .and_then(|call| call.options.params.clone())
            .unwrap_or(Value::Null)
    }
}

#[async_trait::async_trait]
impl Transport for ScriptedTransport {
    async fn request(
        &self,
        method: Method,
        url: &str,
        options: RequestOptions,
    ) -> Result<Value, TransportError> {
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            url: url.to_string(),
            options,
        });
        let next = self.replies.lock().unwrap().pop_front();
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match next {
            Some(QueuedReply { body, gate }) => {
                if let Some(gate) = gate {
                    gate.notified().await;
                }
                body
            }
            None => Ok(json!({"code": 0})),
        }
    }
}

pub fn endpoints() -> Endpoints {
    Endpoints::new("http://console.test")
}

pub fn page(list: Value, total: u64) -> Value {
    json!({"code": 0, "data": {"list": list, "total": total}})
}
