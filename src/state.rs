use std::sync::Arc;

use sqlx::PgPool;

use crate::access::{AccessGate, AccessStore, PgAccessStore};
use crate::config::SecurityConfig;

/// Shared state handed to every handler and middleware.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub gate: AccessGate,
    pub security: Arc<SecurityConfig>,
}

impl AppState {
    pub fn new(pool: PgPool, store: Arc<dyn AccessStore>, security: SecurityConfig) -> Self {
        let gate = AccessGate::new(store).with_audit_logging(security.enable_audit_logging);
        Self {
            pool,
            gate,
            security: Arc::new(security),
        }
    }

    /// Access lookups go to the same database as the handlers.
    pub fn from_pool(pool: PgPool, security: SecurityConfig) -> Self {
        let store = Arc::new(PgAccessStore::new(pool.clone()));
        Self::new(pool, store, security)
    }
}
