// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Service descriptor and liveness probe. Nothing here reads the caller's
// identity.
pub mod service;

pub use service::{health, root};
