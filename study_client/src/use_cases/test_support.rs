use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{
    Method, Navigator, OutboundRequest, RawResponse, Route, TokenStore, Transport,
    TransportError,
};
use crate::use_cases::gateway::{SessionContext, SessionGateway};

pub(crate) const TEST_BASE_URL: &str = "http://api.test";

type Scripted = Result<RawResponse, TransportError>;

// Scripted transport: answers per (method, path) and records every request it sees.
#[derive(Default)]
pub(crate) struct RecordingTransport {
    routes: Mutex<HashMap<(&'static str, String), VecDeque<Scripted>>>,
    requests: Mutex<Vec<OutboundRequest>>,
}

impl RecordingTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn respond(&self, method: Method, path: &str, status: u16, body: Value) {
        self.script(
            method,
            path,
            Ok(RawResponse {
                status,
                body: body.to_string().into_bytes(),
            }),
        );
    }

    pub(crate) fn respond_raw(&self, method: Method, path: &str, status: u16, body: &str) {
        self.script(
            method,
            path,
            Ok(RawResponse {
                status,
                body: body.as_bytes().to_vec(),
            }),
        );
    }

    pub(crate) fn fail(&self, method: Method, path: &str, message: &str) {
        self.script(method, path, Err(TransportError(message.to_string())));
    }

    pub(crate) fn requests(&self) -> Vec<OutboundRequest> {
        self.requests.lock().expect("requests mutex poisoned").clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.requests.lock().expect("requests mutex poisoned").len()
    }

    fn script(&self, method: Method, path: &str, response: Scripted) {
        let mut routes = self.routes.lock().expect("routes mutex poisoned");
        routes
            .entry((method.as_str(), format!("{TEST_BASE_URL}{path}")))
            .or_default()
            .push_back(response);
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: OutboundRequest) -> Result<RawResponse, TransportError> {
        let key = (request.method.as_str(), request.url.clone());
        self.requests
            .lock()
            .expect("requests mutex poisoned")
            .push(request);

        let mut routes = self.routes.lock().expect("routes mutex poisoned");
        let Some(queue) = routes.get_mut(&key) else {
            return Err(TransportError(format!("no scripted response for {key:?}")));
        };
        // The last scripted answer repeats for any further calls.
        match queue.len() {
            0 => Err(TransportError(format!("no scripted response for {key:?}"))),
            1 => queue
                .front()
                .cloned()
                .unwrap_or_else(|| Err(TransportError("empty queue".into()))),
            _ => queue
                .pop_front()
                .unwrap_or_else(|| Err(TransportError("empty queue".into()))),
        }
    }
}

#[derive(Clone, Copy, Default)]
pub(crate) struct FailureFlags {
    pub token: bool,
    pub save: bool,
    pub clear: bool,
}

#[derive(Default)]
struct StoreState {
    token: Option<String>,
    user: Option<Value>,
    clear_calls: usize,
}

// In-memory token store with failure injection and call counters.
#[derive(Clone, Default)]
pub(crate) struct RecordingStore {
    state: Arc<Mutex<StoreState>>,
    failures: FailureFlags,
}

impl RecordingStore {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn with_token(token: &str) -> Arc<Self> {
        let store = Self::default();
        store.state.lock().expect("store mutex poisoned").token = Some(token.to_string());
        Arc::new(store)
    }

    pub(crate) fn with_failures(failures: FailureFlags) -> Arc<Self> {
        Arc::new(Self {
            failures,
            ..Self::default()
        })
    }

    pub(crate) fn current_token(&self) -> Option<String> {
        self.state.lock().expect("store mutex poisoned").token.clone()
    }

    pub(crate) fn current_user(&self) -> Option<Value> {
        self.state.lock().expect("store mutex poisoned").user.clone()
    }

    pub(crate) fn set_user(&self, user: Value) {
        self.state.lock().expect("store mutex poisoned").user = Some(user);
    }

    pub(crate) fn clear_calls(&self) -> usize {
        self.state.lock().expect("store mutex poisoned").clear_calls
    }
}

#[async_trait]
impl TokenStore for RecordingStore {
    async fn token(&self) -> Result<Option<String>, String> {
        if self.failures.token {
            return Err("token read failed".to_string());
        }
        Ok(self.current_token())
    }

    async fn save_token(&self, token: String) -> Result<(), String> {
        if self.failures.save {
            return Err("save failed".to_string());
        }
        self.state.lock().expect("store mutex poisoned").token = Some(token);
        Ok(())
    }

    async fn cached_user(&self) -> Result<Option<Value>, String> {
        Ok(self.current_user())
    }

    async fn cache_user(&self, user: Value) -> Result<(), String> {
        self.set_user(user);
        Ok(())
    }

    async fn clear(&self) -> Result<(), String> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        state.clear_calls += 1;
        if self.failures.clear {
            return Err("clear failed".to_string());
        }
        state.token = None;
        state.user = None;
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn routes(&self) -> Vec<Route> {
        self.routes.lock().expect("routes mutex poisoned").clone()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, route: Route) {
        self.routes
            .lock()
            .expect("routes mutex poisoned")
            .push(route);
    }
}

// Gateway wired to the recording fakes above.
pub(crate) struct Harness {
    pub gateway: SessionGateway,
    pub transport: Arc<RecordingTransport>,
    pub store: Arc<RecordingStore>,
    pub navigator: Arc<RecordingNavigator>,
}

impl Harness {
    pub(crate) fn with_store(store: Arc<RecordingStore>) -> Self {
        let transport = RecordingTransport::new();
        let navigator = RecordingNavigator::new();
        let gateway = SessionGateway::new(
            TEST_BASE_URL,
            transport.clone(),
            SessionContext {
                store: store.clone(),
                navigator: navigator.clone(),
            },
        );

        Self {
            gateway,
            transport,
            store,
            navigator,
        }
    }

    pub(crate) fn anonymous() -> Self {
        Self::with_store(RecordingStore::new())
    }

    pub(crate) fn authenticated(token: &str) -> Self {
        Self::with_store(RecordingStore::with_token(token))
    }
}
