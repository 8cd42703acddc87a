use std::collections::HashMap;

use axum::{
    extract::{Path, Request, State},
    middleware::Next,
    response::Response,
};

use super::auth::AuthUser;
use crate::access::{GatePolicy, ResourceRef, Role};
use crate::error::ApiError;
use crate::state::AppState;

/// Route layer for ordinary gated routes: the method table decides.
pub async fn access_gate_middleware(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    run_gate(&state, &params, GatePolicy::MethodTable, request, next).await
}

/// Route layer for access management: admins only.
pub async fn admin_gate_middleware(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    run_gate(&state, &params, GatePolicy::AtLeast(Role::Admin), request, next).await
}

async fn run_gate(
    state: &AppState,
    params: &HashMap<String, String>,
    policy: GatePolicy,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let conceal = state.security.conceal_inaccessible_resources;

    // Copied out so no borrow of the request lives across the await
    let method = request.method().clone();
    let identity = request.extensions().get::<AuthUser>().map(|user| user.identity);

    let resource = ResourceRef::from_path_params(params).map_err(|e| ApiError::from_access(e, conceal))?;
    let permit = state
        .gate
        .authorize(identity.as_ref(), resource, &method, policy)
        .await
        .map_err(|e| ApiError::from_access(e, conceal))?;

    request.extensions_mut().insert(permit);
    Ok(next.run(request).await)
}
