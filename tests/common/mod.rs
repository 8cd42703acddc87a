#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use async_trait::async_trait;
use sqlx::PgPool;

use datamodel_api::access::{AccessStore, MemoryAccessStore, ProjectOwnership, Role, StoreError};
use datamodel_api::auth::{generate_jwt, Claims};
use datamodel_api::config::{ApiConfig, DatabaseConfig, SecurityConfig};
use datamodel_api::database::DatabaseManager;
use datamodel_api::server;
use datamodel_api::state::AppState;

pub const SECRET: &str = "integration-test-secret";

/// Router over an in-memory access store and a pool that never connects.
///
/// Access decisions are fully served from memory. A request that gets past
/// the gate reaches a handler whose database call fails, so it answers 5xx.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryAccessStore>,
    pub project: Uuid,
    pub model: Uuid,
    pub entity: Uuid,
    pub creator: Uuid,
    pub editor: Uuid,
    pub viewer: Uuid,
    pub outsider: Uuid,
    pub superuser: Uuid,
}

pub struct Response {
    pub status: StatusCode,
    pub body: Value,
}

impl Response {
    /// The gate let the request through to its handler.
    pub fn passed_gate(&self) -> bool {
        self.status.is_server_error()
    }

    pub fn message(&self) -> &str {
        self.body["message"].as_str().unwrap_or_default()
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(SecurityConfig::for_testing(SECRET)).await
}

pub async fn spawn_concealing_app() -> TestApp {
    let mut security = SecurityConfig::for_testing(SECRET);
    security.conceal_inaccessible_resources = true;
    spawn_app_with(security).await
}

pub async fn spawn_app_with(security: SecurityConfig) -> TestApp {
    let store = Arc::new(MemoryAccessStore::new());
    let (project, model, entity) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    let (creator, editor, viewer) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

    store.insert_project(project, creator).await;
    store.insert_data_model(model, project).await;
    store.insert_entity(entity, model).await;
    store.set_member(project, editor, Role::Editor).await;
    store.set_member(project, viewer, Role::Viewer).await;

    let state = AppState::new(unreachable_pool(), store.clone(), security);
    let router = server::app(state, &ApiConfig::default());

    TestApp {
        router,
        store,
        project,
        model,
        entity,
        creator,
        editor,
        viewer,
        outsider: Uuid::new_v4(),
        superuser: Uuid::new_v4(),
    }
}

fn unreachable_pool() -> PgPool {
    DatabaseManager::connect_lazy(&DatabaseConfig {
        url: Some("postgres://tests@127.0.0.1:1/unreachable".to_string()),
        max_connections: 1,
        connection_timeout: 1,
        run_migrations: false,
    })
    .expect("lazy pool")
}

/// Access store whose lookups all fail with an internal detail in the error.
pub struct BrokenStore;

pub const BROKEN_STORE_DETAIL: &str = "relation \"project_members\" does not exist";

#[async_trait]
impl AccessStore for BrokenStore {
    async fn find_project(&self, _: Uuid) -> Result<Option<ProjectOwnership>, StoreError> {
        Err(StoreError::Corrupt(BROKEN_STORE_DETAIL.to_string()))
    }

    async fn find_data_model_project(&self, _: Uuid) -> Result<Option<Uuid>, StoreError> {
        Err(StoreError::Corrupt(BROKEN_STORE_DETAIL.to_string()))
    }

    async fn find_entity_data_model(&self, _: Uuid) -> Result<Option<Uuid>, StoreError> {
        Err(StoreError::Corrupt(BROKEN_STORE_DETAIL.to_string()))
    }

    async fn find_membership_role(&self, _: Uuid, _: Uuid) -> Result<Option<Role>, StoreError> {
        Err(StoreError::Corrupt(BROKEN_STORE_DETAIL.to_string()))
    }
}

/// Same routes, but every access lookup fails.
pub async fn spawn_broken_store_app() -> TestApp {
    let mut app = spawn_app().await;
    let state = AppState::new(unreachable_pool(), Arc::new(BrokenStore), SecurityConfig::for_testing(SECRET));
    app.router = server::app(state, &ApiConfig::default());
    app
}

pub fn token_for(user: Uuid, superuser: bool) -> String {
    generate_jwt(&Claims::new(user, None, superuser, 1), SECRET).expect("token")
}

impl TestApp {
    pub fn token(&self, user: Uuid) -> String {
        token_for(user, user == self.superuser)
    }

    pub async fn request(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = self.router.clone().oneshot(request).await.expect("infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        Response { status, body }
    }

    pub async fn get_as(&self, user: Uuid, uri: &str) -> Response {
        self.request(Method::GET, uri, Some(&self.token(user)), None).await
    }

    pub async fn send_as(&self, user: Uuid, method: Method, uri: &str, body: Option<Value>) -> Response {
        self.request(method, uri, Some(&self.token(user)), body).await
    }
}
