use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::{get, patch},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::{ApiConfig, SecurityConfig};
use crate::handlers::{protected, public};
use crate::middleware::{access_gate_middleware, admin_gate_middleware, identify_middleware};
use crate::state::AppState;

/// Full application router.
///
/// Every request is identified first; routes that name a project, data
/// model or entity are then gated per resource.
pub fn app(state: AppState, api: &ApiConfig) -> Router {
    let router = Router::new()
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .merge(open_routes())
        .merge(gated_routes(state.clone()))
        .merge(admin_routes(state.clone()))
        .layer(from_fn_with_state(state.clone(), identify_middleware))
        .layer(DefaultBodyLimit::max(api.max_request_size_bytes));

    let router = match cors_layer(&state.security) {
        Some(cors) => router.layer(cors),
        None => router,
    };

    let router = if api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    };

    router.with_state(state)
}

/// Identity required, no per-resource gate
fn open_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/whoami", get(protected::whoami))
        .route("/api/access/:kind/:id", get(protected::access::probe))
        .route(
            "/api/projects",
            get(protected::projects::list).post(protected::projects::create),
        )
}

/// Method table decides
fn gated_routes(state: AppState) -> Router<AppState> {
    use protected::{attributes, entities, export, members, models, projects, referentials};

    Router::new()
        .route(
            "/api/projects/:project_id",
            get(projects::get).patch(projects::update).delete(projects::delete),
        )
        .route(
            "/api/projects/:project_id/models",
            get(models::list).post(models::create),
        )
        .route("/api/projects/:project_id/members", get(members::list))
        .route(
            "/api/models/:model_id",
            get(models::get).patch(models::update).delete(models::delete),
        )
        .route("/api/models/:model_id/export", get(export::export))
        .route(
            "/api/models/:model_id/referentials",
            get(referentials::list).post(referentials::create),
        )
        .route(
            "/api/models/:model_id/referentials/:referential_id",
            get(referentials::get).patch(referentials::update).delete(referentials::delete),
        )
        .route(
            "/api/models/:model_id/entities",
            get(entities::list).post(entities::create),
        )
        .route(
            "/api/entities/:entity_id",
            get(entities::get).patch(entities::update).delete(entities::delete),
        )
        .route(
            "/api/entities/:entity_id/attributes",
            get(attributes::list).post(attributes::create),
        )
        .route(
            "/api/entities/:entity_id/attributes/:attribute_id",
            patch(attributes::update).delete(attributes::delete),
        )
        .route_layer(from_fn_with_state(state, access_gate_middleware))
}

/// Access management: admins only
fn admin_routes(state: AppState) -> Router<AppState> {
    use axum::routing::post;
    use protected::members;

    Router::new()
        .route("/api/projects/:project_id/members", post(members::add))
        .route(
            "/api/projects/:project_id/members/:user_id",
            patch(members::change_access).delete(members::remove),
        )
        .route_layer(from_fn_with_state(state, admin_gate_middleware))
}

fn cors_layer(security: &SecurityConfig) -> Option<CorsLayer> {
    if !security.enable_cors {
        return None;
    }
    if security.cors_origins.iter().any(|origin| origin == "*") {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any),
    )
}
