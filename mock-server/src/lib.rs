//! In-memory stand-in for the Armis lists and policies endpoints.
//!
//! Every response uses the `{success, data, error}` envelope and every route
//! requires an `Authorization` header equal to the configured API key.

use std::{collections::BTreeMap, sync::Arc, time::Duration};

use axum::{
    extract::{Path, Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ListRecord {
    pub list_id: i64,
    pub list_name: String,
    pub list_type: String,
    pub description: String,
    pub created_by: String,
    pub creation_time: String,
    pub last_updated_by: String,
    pub last_update_time: String,
}

/// A stored policy. The id is rendered as a string, as the real API does.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    pub rule_type: String,
    pub rules: Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePolicy {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rule_type: String,
    #[serde(default)]
    pub rules: Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePolicy {
    pub name: Option<String>,
    pub description: Option<String>,
    pub rule_type: Option<String>,
    pub rules: Option<Value>,
}

struct Store {
    lists: Vec<ListRecord>,
    policies: BTreeMap<u64, PolicyRecord>,
    next_id: u64,
}

#[derive(Clone)]
pub struct MockState {
    api_key: Arc<str>,
    store: Arc<RwLock<Store>>,
    latency: Duration,
}

impl MockState {
    /// No lists, no policies.
    pub fn new(api_key: &str) -> Self {
        Self::with_lists(api_key, Vec::new())
    }

    pub fn with_lists(api_key: &str, lists: Vec<ListRecord>) -> Self {
        Self {
            api_key: Arc::from(api_key),
            store: Arc::new(RwLock::new(Store {
                lists,
                policies: BTreeMap::new(),
                next_id: 1,
            })),
            latency: Duration::ZERO,
        }
    }

    /// Delay every response by `latency`, to simulate a slow tenant.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Two sample lists, matching what a fresh tenant might report.
    pub fn seeded(api_key: &str) -> Self {
        Self::with_lists(api_key, sample_lists())
    }
}

pub fn sample_lists() -> Vec<ListRecord> {
    vec![
        ListRecord {
            list_id: 1,
            list_name: "Test List".to_string(),
            list_type: "IP".to_string(),
            description: "A test list".to_string(),
            created_by: "admin@example.com".to_string(),
            creation_time: "2024-01-01T00:00:00Z".to_string(),
            last_updated_by: "admin@example.com".to_string(),
            last_update_time: "2024-01-02T00:00:00Z".to_string(),
        },
        ListRecord {
            list_id: 2,
            list_name: "Another List".to_string(),
            list_type: "MAC".to_string(),
            description: "Another test list".to_string(),
            created_by: "user@example.com".to_string(),
            creation_time: "2024-01-03T00:00:00Z".to_string(),
            last_updated_by: "user@example.com".to_string(),
            last_update_time: "2024-01-04T00:00:00Z".to_string(),
        },
    ]
}

pub fn app(state: MockState) -> Router {
    Router::new()
        .route("/api/v1/lists/", get(get_lists))
        .route("/api/v1/policies/", get(list_policies).post(create_policy))
        .route(
            "/api/v1/policies/{id}/",
            get(get_policy).patch(update_policy).delete(delete_policy),
        )
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock Armis API listening");
    }
    axum::serve(listener, app(state)).await
}

fn success(status: StatusCode, data: Value) -> Response {
    (status, Json(json!({ "success": true, "data": data }))).into_response()
}

fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "error": message }))).into_response()
}

async fn require_auth(State(state): State<MockState>, request: Request, next: Next) -> Response {
    if !state.latency.is_zero() {
        tokio::time::sleep(state.latency).await;
    }
    let presented = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    if presented != Some(&*state.api_key) {
        debug!(path = %request.uri().path(), "rejecting unauthenticated request");
        return failure(StatusCode::UNAUTHORIZED, "invalid or missing access token");
    }
    next.run(request).await
}

async fn get_lists(State(state): State<MockState>) -> Response {
    let store = state.store.read().await;
    success(StatusCode::OK, json!({ "lists": store.lists }))
}

async fn list_policies(State(state): State<MockState>) -> Response {
    let store = state.store.read().await;
    let policies: Vec<&PolicyRecord> = store.policies.values().collect();
    success(
        StatusCode::OK,
        json!({
            "count": policies.len(),
            "next": null,
            "prev": null,
            "total": policies.len(),
            "policies": policies,
        }),
    )
}

async fn create_policy(State(state): State<MockState>, Json(input): Json<CreatePolicy>) -> Response {
    if input.name.trim().is_empty() {
        return failure(StatusCode::BAD_REQUEST, "name is required");
    }
    let mut store = state.store.write().await;
    let id = store.next_id;
    store.next_id += 1;
    store.policies.insert(
        id,
        PolicyRecord {
            id: id.to_string(),
            name: input.name,
            description: input.description,
            rule_type: input.rule_type,
            rules: input.rules,
        },
    );
    success(StatusCode::CREATED, json!({ "id": id }))
}

async fn get_policy(State(state): State<MockState>, Path(id): Path<String>) -> Response {
    let store = state.store.read().await;
    match parse_id(&id).and_then(|id| store.policies.get(&id)) {
        Some(policy) => success(StatusCode::OK, json!(policy)),
        None => failure(StatusCode::NOT_FOUND, "policy not found"),
    }
}

async fn update_policy(
    State(state): State<MockState>,
    Path(id): Path<String>,
    Json(input): Json<UpdatePolicy>,
) -> Response {
    let mut store = state.store.write().await;
    let Some(policy) = parse_id(&id).and_then(|id| store.policies.get_mut(&id)) else {
        return failure(StatusCode::NOT_FOUND, "policy not found");
    };
    if let Some(name) = input.name {
        policy.name = name;
    }
    if let Some(description) = input.description {
        policy.description = description;
    }
    if let Some(rule_type) = input.rule_type {
        policy.rule_type = rule_type;
    }
    if let Some(rules) = input.rules {
        policy.rules = rules;
    }
    success(StatusCode::OK, json!(policy))
}

async fn delete_policy(State(state): State<MockState>, Path(id): Path<String>) -> Response {
    let mut store = state.store.write().await;
    match parse_id(&id).and_then(|id| store.policies.remove(&id)) {
        Some(_) => (StatusCode::OK, Json(json!({ "success": true }))).into_response(),
        None => failure(StatusCode::NOT_FOUND, "policy not found"),
    }
}

fn parse_id(raw: &str) -> Option<u64> {
    raw.parse().ok()
}
