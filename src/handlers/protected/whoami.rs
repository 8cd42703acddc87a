use serde::Serialize;
use uuid::Uuid;

use crate::middleware::{ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Serialize)]
pub struct WhoAmI {
    pub id: Uuid,
    pub email: Option<String>,
    pub is_superuser: bool,
}

/// GET /api/auth/whoami - Identity carried by the bearer token
pub async fn whoami(user: AuthUser) -> ApiResult<WhoAmI> {
    Ok(ApiResponse::success(WhoAmI {
        id: user.identity.id,
        email: user.email,
        is_superuser: user.identity.is_superuser,
    }))
}
