pub mod assistant;
pub mod courses;
pub mod dashboard;
pub mod endpoints;
pub mod fetch;
pub mod gateway;
pub mod groups;
pub mod profile;

#[cfg(test)]
pub(crate) mod test_support;

pub use fetch::{FetchState, fetch};
pub use gateway::{SessionContext, SessionGateway};
