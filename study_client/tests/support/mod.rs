// In-process stand-in for the study-group API, one instance per test.
#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    routing::{get, post},
};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use study_client::domain::TokenStore;
use study_client::interface_adapters::navigator::CliNavigator;
use study_client::interface_adapters::clients::ReqwestTransport;
use study_client::{SessionContext, SessionGateway};

pub const TOKEN: &str = "abc123";
pub const EMAIL: &str = "ana@uni.edu";
pub const PASSWORD: &str = "secret";

type Reply = (StatusCode, Json<Value>);

// Observable server-side state shared with the test body.
#[derive(Default)]
pub struct FakeApi {
    // Authorization headers received on protected routes, in arrival order.
    seen: Mutex<Vec<Option<String>>>,
    // Once set, every protected route answers 401.
    revoked: AtomicBool,
    // Makes /api/stats fail with a bodyless 500.
    stats_down: AtomicBool,
}

impl FakeApi {
    pub fn revoke_tokens(&self) {
        self.revoked.store(true, Ordering::SeqCst);
    }

    pub fn take_stats_down(&self) {
        self.stats_down.store(true, Ordering::SeqCst);
    }

    pub fn seen_authorization(&self) -> Vec<Option<String>> {
        self.seen.lock().expect("seen lock").clone()
    }

    // Records the caller and decides whether the bearer token is accepted.
    fn authorize(&self, headers: &HeaderMap) -> Result<(), Reply> {
        let value = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        self.seen.lock().expect("seen lock").push(value.clone());

        let expected = format!("Bearer {TOKEN}");
        if self.revoked.load(Ordering::SeqCst) || value.as_deref() != Some(expected.as_str()) {
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "token expired" })),
            ));
        }
        Ok(())
    }
}

// Binds an ephemeral port and serves the fake API for the rest of the test.
pub async fn spawn_api() -> (String, Arc<FakeApi>) {
    let api = Arc::new(FakeApi::default());
    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/stats", get(stats))
        .route("/api/usercourse/my-courses", get(my_courses))
        .route("/api/groups", get(public_groups))
        .with_state(api.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake api failed");
    });

    (format!("http://{addr}"), api)
}

// Real transport wired to the fake API, with the given session storage.
pub fn gateway(base_url: &str, store: Arc<dyn TokenStore>) -> (SessionGateway, Arc<CliNavigator>) {
    let navigator = Arc::new(CliNavigator::new());
    let transport = ReqwestTransport::new(None).expect("build http client");
    let gateway = SessionGateway::new(
        base_url,
        Arc::new(transport),
        SessionContext {
            store,
            navigator: navigator.clone(),
        },
    );
    (gateway, navigator)
}

async fn login(Json(body): Json<Value>) -> Reply {
    let email = body.get("email").and_then(Value::as_str);
    let password = body.get("password").and_then(Value::as_str);
    if email == Some(EMAIL) && password == Some(PASSWORD) {
        (StatusCode::OK, Json(json!({ "token": TOKEN })))
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "invalid credentials" })),
        )
    }
}

async fn stats(State(api): State<Arc<FakeApi>>, headers: HeaderMap) -> Reply {
    if let Err(reply) = api.authorize(&headers) {
        return reply;
    }
    if api.stats_down.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({})));
    }
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "users": { "today": 3, "week": 12, "year": 140 },
            "topGroups": [{ "id": 1, "name": "Calc club", "memberCount": 8 }]
        })),
    )
}

async fn my_courses(State(api): State<Arc<FakeApi>>, headers: HeaderMap) -> Reply {
    if let Err(reply) = api.authorize(&headers) {
        return reply;
    }
    (
        StatusCode::OK,
        Json(json!([
            { "id": 1, "name": "Calculus", "code": "MAT-1", "group": "A", "schedule": "Mon 8:00", "semester": "1" },
            { "id": "2", "name": "Physics", "code": "FIS-1", "group": null, "schedule": "Tue 10:00", "semester": 2 }
        ])),
    )
}

async fn public_groups(State(api): State<Arc<FakeApi>>, headers: HeaderMap) -> Reply {
    if let Err(reply) = api.authorize(&headers) {
        return reply;
    }
    (
        StatusCode::OK,
        Json(json!([
            {
                "id": 1,
                "name": "Calc club",
                "isPublic": true,
                "Course": { "id": 1, "name": "Calculus", "code": "MAT-1" },
                "Users": [{ "id": 7, "name": "Ana", "email": EMAIL, "role": "estudiante" }]
            }
        ])),
    )
}
