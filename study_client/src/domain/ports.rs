use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::domain::descriptor::Method;
use crate::domain::session::Route;

// Fully resolved request handed to the transport.
#[derive(Clone, Debug, PartialEq)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl OutboundRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

// Status and undecoded body of a completed exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// Transport-level failure: nothing came back from the server.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

// The gateway depends on this trait, not on reqwest.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: OutboundRequest) -> Result<RawResponse, TransportError>;
}

// Port for the persistent session storage shared by the whole process.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn token(&self) -> Result<Option<String>, String>;
    async fn save_token(&self, token: String) -> Result<(), String>;
    async fn cached_user(&self) -> Result<Option<Value>, String>;
    async fn cache_user(&self, user: Value) -> Result<(), String>;
    // Removes the token and the cached user record.
    async fn clear(&self) -> Result<(), String>;
}

// Port for moving the user to another screen.
pub trait Navigator: Send + Sync {
    fn redirect(&self, route: Route);
}
