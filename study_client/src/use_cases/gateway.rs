use std::sync::Arc;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::forms::{LoginRequest, RegisterRequest};
use crate::domain::models::Acknowledgement;
use crate::domain::{
    GatewayError, Navigator, OutboundRequest, RawResponse, RequestDescriptor, Route,
    SessionState, TokenStore, Transport,
};

const LOGIN_PATH: &str = "/api/auth/login";
const REGISTER_PATH: &str = "/api/auth/register";
const REGISTERED_MESSAGE: &str = "user registered successfully";

// Explicit session context, built once at startup and handed to the gateway.
#[derive(Clone)]
pub struct SessionContext {
    pub store: Arc<dyn TokenStore>,
    pub navigator: Arc<dyn Navigator>,
}

// Shape of the error body the API returns on failures.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

// Wraps every outbound call with the bearer token, error normalization and expiry handling.
#[derive(Clone)]
pub struct SessionGateway {
    transport: Arc<dyn Transport>,
    session: SessionContext,
    base_url: String,
}

impl SessionGateway {
    pub fn new(
        base_url: impl Into<String>,
        transport: Arc<dyn Transport>,
        session: SessionContext,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            transport,
            session,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub async fn state(&self) -> SessionState {
        SessionState::from_token(self.current_token().await.as_deref())
    }

    #[tracing::instrument(
        name = "authorized_request",
        skip_all,
        fields(method = %descriptor.method, path = %descriptor.path)
    )]
    pub async fn authorized_request(
        &self,
        descriptor: RequestDescriptor,
    ) -> Result<Value, GatewayError> {
        // No token means no network call at all.
        let Some(token) = self.current_token().await else {
            tracing::info!("no session token, redirecting to login.");
            self.session.navigator.redirect(Route::Login);
            return Err(GatewayError::Unauthenticated);
        };

        let fallback = descriptor.fallback().to_string();
        let request = self.build_request(descriptor, Some(&token));
        let response = self.dispatch(request).await?;

        if response.status == 401 {
            self.expire_session(&token).await;
            return Err(GatewayError::SessionExpired);
        }

        decode_response(response, &fallback)
    }

    // Authorized call plus typed decoding of the success body.
    pub async fn request<T>(&self, descriptor: RequestDescriptor) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
    {
        let fallback = descriptor.fallback().to_string();
        let value = self.authorized_request(descriptor).await?;
        serde_json::from_value(value).map_err(|err| {
            tracing::warn!(error = %err, "response did not match the expected shape.");
            GatewayError::RequestFailed(fallback)
        })
    }

    #[tracing::instrument(name = "login", skip_all)]
    pub async fn login(&self, email: &str, password: &str) -> Result<String, GatewayError> {
        let descriptor = RequestDescriptor::post(LOGIN_PATH)
            .with_json(&LoginRequest::new(email, password))
            .with_fallback("login failed");
        let fallback = descriptor.fallback().to_string();

        let body = self.public_request(descriptor).await?;
        let token = body
            .get("token")
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .ok_or(GatewayError::RequestFailed(fallback))?;

        self.session
            .store
            .save_token(token.clone())
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "failed to persist session token.");
                GatewayError::RequestFailed("could not store the session".into())
            })?;

        tracing::info!("session established.");
        Ok(token)
    }

    #[tracing::instrument(name = "register", skip_all)]
    pub async fn register(&self, request: RegisterRequest) -> Result<String, GatewayError> {
        let descriptor = RequestDescriptor::post(REGISTER_PATH)
            .with_json(&request)
            .with_fallback("registration failed");

        let body = self.public_request(descriptor).await?;
        let ack: Acknowledgement = serde_json::from_value(body).unwrap_or_default();
        Ok(ack
            .message
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| REGISTERED_MESSAGE.to_string()))
    }

    // Always succeeds; storage failures are only logged.
    #[tracing::instrument(name = "logout", skip_all)]
    pub async fn logout(&self) {
        if let Err(err) = self.session.store.clear().await {
            tracing::warn!(error = %err, "failed to clear stored session.");
        }
        tracing::info!("logged out.");
        self.session.navigator.redirect(Route::Login);
    }

    // Unauthenticated variant: no token attached and a 401 is an ordinary failure.
    async fn public_request(&self, descriptor: RequestDescriptor) -> Result<Value, GatewayError> {
        let fallback = descriptor.fallback().to_string();
        let request = self.build_request(descriptor, None);
        let response = self.dispatch(request).await?;
        decode_response(response, &fallback)
    }

    async fn current_token(&self) -> Option<String> {
        match self.session.store.token().await {
            Ok(token) => token.filter(|token| !token.is_empty()),
            Err(err) => {
                tracing::warn!(error = %err, "failed to read session token.");
                None
            }
        }
    }

    async fn expire_session(&self, rejected_token: &str) {
        // A newer login may have replaced the token while this call was in flight.
        if let Some(current) = self.current_token().await {
            if current != rejected_token {
                tracing::debug!("ignoring 401 for a token that is no longer active.");
                return;
            }
        }

        if let Err(err) = self.session.store.clear().await {
            tracing::warn!(error = %err, "failed to clear expired session.");
        }
        tracing::warn!("session expired, redirecting to login.");
        self.session.navigator.redirect(Route::Login);
    }

    fn build_request(&self, descriptor: RequestDescriptor, token: Option<&str>) -> OutboundRequest {
        let separator = if descriptor.path.starts_with('/') { "" } else { "/" };
        let url = format!("{}{}{}", self.base_url, separator, descriptor.path);

        // Gateway headers replace caller headers of the same name.
        let mut headers: Vec<(String, String)> = descriptor
            .headers
            .into_iter()
            .filter(|(name, _)| {
                !name.eq_ignore_ascii_case("authorization")
                    && !name.eq_ignore_ascii_case("content-type")
            })
            .collect();
        headers.push(("Content-Type".into(), "application/json".into()));
        if let Some(token) = token {
            headers.push(("Authorization".into(), format!("Bearer {token}")));
        }

        OutboundRequest {
            method: descriptor.method,
            url,
            headers,
            body: descriptor.body,
        }
    }

    async fn dispatch(&self, request: OutboundRequest) -> Result<RawResponse, GatewayError> {
        tracing::debug!(method = %request.method, url = %request.url, "sending request.");
        self.transport.send(request).await.map_err(|err| {
            tracing::warn!(error = %err, "transport failure.");
            GatewayError::NetworkError(err.0)
        })
    }
}

fn decode_response(response: RawResponse, fallback: &str) -> Result<Value, GatewayError> {
    if !response.is_success() {
        let message = error_message(&response.body).unwrap_or_else(|| fallback.to_string());
        tracing::debug!(status = response.status, %message, "request rejected.");
        return Err(GatewayError::RequestFailed(message));
    }

    if response.body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }

    serde_json::from_slice(&response.body).map_err(|err| {
        tracing::warn!(error = %err, "failed to decode response body.");
        GatewayError::RequestFailed(fallback.to_string())
    })
}

fn error_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|payload| payload.message)
        .filter(|message| !message.trim().is_empty())
}
