#![allow(dead_code)]

use async_trait::async_trait;
use rosflow_cloud_alicloud::{RosConfig, RosService, RpcClient, RpcError, RpcRequest};
use serde_json::Value;
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

/// One call seen by [`ScriptedClient`]
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub product: String,
    pub version: String,
    pub action: String,
    pub request: RpcRequest,
    pub autoretry: bool,
}

impl RecordedCall {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.request.get(key).and_then(Value::as_str)
    }
}

/// In-memory RPC client replaying scripted responses in order
#[derive(Default)]
pub struct ScriptedClient {
    responses: Mutex<VecDeque<Result<Value, RpcError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ok(self, response: Value) -> Self {
        self.responses.lock().unwrap().push_back(Ok(response));
        self
    }

    pub fn err(self, err: RpcError) -> Self {
        self.responses.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn err_n(self, n: usize, err: RpcError) -> Self {
        for _ in 0..n {
            self.responses.lock().unwrap().push_back(Err(err.clone()));
        }
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn actions(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.action).collect()
    }
}

#[async_trait]
impl RpcClient for ScriptedClient {
    async fn rpc_post(
        &self,
        product: &str,
        version: &str,
        action: &str,
        request: &RpcRequest,
        autoretry: bool,
    ) -> Result<Value, RpcError> {
        self.calls.lock().unwrap().push(RecordedCall {
            product: product.to_string(),
            version: version.to_string(),
            action: action.to_string(),
            request: request.clone(),
            autoretry,
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(RpcError::api("ScriptExhausted", "no scripted response left")))
    }
}

pub fn service(client: ScriptedClient) -> RosService<ScriptedClient> {
    RosService::new(client, RosConfig::new("cn-hangzhou"))
}

/// Debug-level log output captured while the guard is alive
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn install() -> (Self, tracing::subscriber::DefaultGuard) {
        let capture = Self::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        (capture, guard)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
