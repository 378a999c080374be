use crate::domain::GatewayError;
use crate::use_cases::endpoints::Endpoint;
use crate::use_cases::gateway::SessionGateway;

// Single loader for every endpoint: authorized call plus typed decoding.
pub async fn fetch<E>(gateway: &SessionGateway, endpoint: &E) -> Result<E::Response, GatewayError>
where
    E: Endpoint,
{
    gateway.request(endpoint.descriptor()).await
}

// Per-pane load status; each pane owns its own flag.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchState<T> {
    #[default]
    Loading,
    Loaded(T),
    Failed(GatewayError),
}

impl<T> FetchState<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            FetchState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&GatewayError> {
        match self {
            FetchState::Failed(err) => Some(err),
            _ => None,
        }
    }
}

impl<T> From<Result<T, GatewayError>> for FetchState<T> {
    fn from(result: Result<T, GatewayError>) -> Self {
        match result {
            Ok(value) => FetchState::Loaded(value),
            Err(err) => FetchState::Failed(err),
        }
    }
}
