pub mod domain;
pub mod frameworks;
pub mod interface_adapters;
pub mod use_cases;

pub use domain::{GatewayError, RequestDescriptor, Route, SessionState};
pub use use_cases::{FetchState, SessionContext, SessionGateway, fetch};
