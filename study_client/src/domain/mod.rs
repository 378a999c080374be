mod descriptor;
mod errors;
pub mod forms;
pub mod models;
mod ports;
mod session;

// Re-export the domain boundary types and ports.
pub use descriptor::{GENERIC_FAILURE_MESSAGE, Method, RequestDescriptor};
pub use errors::GatewayError;
pub use ports::{
    Navigator, OutboundRequest, RawResponse, TokenStore, Transport, TransportError,
};
pub use session::{Route, SessionState};
