use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::{Json, Router};
use serde_json::{json, Value};

use smartsociety_admin::config::IdentityConfig;

const TEST_KEY: &str = include_str!("../fixtures/test-key.pem");

#[derive(Clone, Default)]
pub struct StubAccount {
    pub uid: String,
    pub custom_attributes: Option<String>,
}

/// Shared state of the stub identity platform: accounts keyed by email, plus
/// call counters and failure switches the tests flip.
#[derive(Default)]
pub struct StubState {
    pub accounts: Mutex<HashMap<String, StubAccount>>,
    pub token_calls: AtomicU32,
    pub lookup_calls: AtomicU32,
    pub update_calls: AtomicU32,
    pub reject_token: AtomicBool,
    pub fail_updates: AtomicBool,
}

pub struct StubIdentity {
    pub base_url: String,
    pub state: Arc<StubState>,
}

impl StubIdentity {
    pub fn add_account(&self, email: &str, uid: &str) {
        self.state.accounts.lock().unwrap().insert(
            email.to_string(),
            StubAccount {
                uid: uid.to_string(),
                custom_attributes: None,
            },
        );
    }

    pub fn set_claims(&self, email: &str, claims: Value) {
        let mut accounts = self.state.accounts.lock().unwrap();
        if let Some(account) = accounts.get_mut(email) {
            account.custom_attributes = Some(claims.to_string());
        }
    }

    /// Claims currently stored for the account with this uid, parsed back
    /// from the serialized attribute the platform keeps.
    pub fn claims_for_uid(&self, uid: &str) -> Option<Value> {
        let accounts = self.state.accounts.lock().unwrap();
        accounts
            .values()
            .find(|a| a.uid == uid)
            .and_then(|a| a.custom_attributes.as_deref())
            .and_then(|raw| serde_json::from_str(raw).ok())
    }

    pub fn token_calls(&self) -> u32 {
        self.state.token_calls.load(Ordering::SeqCst)
    }

    pub fn lookup_calls(&self) -> u32 {
        self.state.lookup_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> u32 {
        self.state.update_calls.load(Ordering::SeqCst)
    }

    /// Service-account JSON whose token endpoint points at this stub.
    pub fn service_account_json(&self) -> String {
        json!({
            "type": "service_account",
            "project_id": "smartsociety-test",
            "private_key_id": "test-key-1",
            "private_key": TEST_KEY,
            "client_email": "ops@smartsociety-test.iam.gserviceaccount.com",
            "token_uri": format!("{}/token", self.base_url),
        })
        .to_string()
    }

    pub fn identity_config(&self) -> IdentityConfig {
        IdentityConfig {
            api_base: self.base_url.clone(),
            credentials_path: "unused.json".into(),
            timeout_secs: 5,
        }
    }
}

pub async fn spawn_stub() -> Result<StubIdentity> {
    let state = Arc::new(StubState::default());

    // The admin API uses Google-style custom-method paths (accounts:lookup),
    // which the router's path syntax cannot express, so dispatch manually.
    let app = Router::new().fallback(route).with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(StubIdentity {
        base_url: format!("http://{addr}"),
        state,
    })
}

async fn route(
    State(state): State<Arc<StubState>>,
    uri: Uri,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let path = uri.path();

    if path.ends_with("/token") {
        state.token_calls.fetch_add(1, Ordering::SeqCst);
        if state.reject_token.load(Ordering::SeqCst) {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "invalid_grant" })),
            );
        }
        return (
            StatusCode::OK,
            Json(json!({
                "access_token": "stub-access-token",
                "expires_in": 3600,
                "token_type": "Bearer"
            })),
        );
    }

    if path.ends_with("accounts:lookup") {
        state.lookup_calls.fetch_add(1, Ordering::SeqCst);
        let request: Value = match serde_json::from_slice(&body) {
            Ok(v) => v,
            Err(_) => return (StatusCode::BAD_REQUEST, Json(json!({ "error": "bad json" }))),
        };
        let email = request["email"][0].as_str().unwrap_or_default();

        let accounts = state.accounts.lock().unwrap();
        return match accounts.get(email) {
            Some(account) => (
                StatusCode::OK,
                Json(json!({ "users": [{ "localId": account.uid, "email": email }] })),
            ),
            // The platform reports a miss as a result set with no users
            None => (StatusCode::OK, Json(json!({}))),
        };
    }

    if path.ends_with("accounts:update") {
        state.update_calls.fetch_add(1, Ordering::SeqCst);
        if state.fail_updates.load(Ordering::SeqCst) {
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "error": "backend unavailable" })),
            );
        }
        let request: Value = match serde_json::from_slice(&body) {
            Ok(v) => v,
            Err(_) => return (StatusCode::BAD_REQUEST, Json(json!({ "error": "bad json" }))),
        };
        let uid = request["localId"].as_str().unwrap_or_default().to_string();
        let attributes = request["customAttributes"].as_str().map(str::to_string);

        let mut accounts = state.accounts.lock().unwrap();
        return match accounts.values_mut().find(|a| a.uid == uid) {
            Some(account) => {
                account.custom_attributes = attributes;
                (StatusCode::OK, Json(json!({ "localId": uid })))
            }
            None => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "USER_NOT_FOUND" })),
            ),
        };
    }

    (StatusCode::NOT_FOUND, Json(json!({ "error": "no such endpoint" })))
}
