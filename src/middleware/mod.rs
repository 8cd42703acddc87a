pub mod access;
pub mod auth;
pub mod response;

pub use access::{access_gate_middleware, admin_gate_middleware};
pub use auth::{identify_middleware, AuthUser};
pub use response::{ApiResponse, ApiResult, IntoApiResponse};
