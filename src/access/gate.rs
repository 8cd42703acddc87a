use std::sync::Arc;

use axum::http::Method;
use uuid::Uuid;

use super::error::AccessError;
use super::method::is_method_allowed;
use super::resolver::RoleResolver;
use super::resource::ResourceRef;
use super::role::Role;
use super::store::AccessStore;
use crate::auth::Identity;

/// Extra requirement a route places on top of the method table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GatePolicy {
    #[default]
    MethodTable,
    /// Method table, and the role must be at least this one.
    AtLeast(Role),
}

/// Proof that the gate let a request through, handed to the handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permit {
    pub role: Role,
    pub project_id: Uuid,
    pub resource: ResourceRef,
}

/// Resolve, then authorize. Either a [`Permit`] or the reason for refusal;
/// every call resolves from scratch.
#[derive(Clone)]
pub struct AccessGate {
    resolver: RoleResolver,
    audit: bool,
}

impl AccessGate {
    pub fn new(store: Arc<dyn AccessStore>) -> Self {
        Self { resolver: RoleResolver::new(store), audit: false }
    }

    pub fn with_audit_logging(mut self, enabled: bool) -> Self {
        self.audit = enabled;
        self
    }

    pub fn resolver(&self) -> &RoleResolver {
        &self.resolver
    }

    pub async fn authorize(
        &self,
        identity: Option<&Identity>,
        resource: ResourceRef,
        method: &Method,
        policy: GatePolicy,
    ) -> Result<Permit, AccessError> {
        let outcome = self.decide(identity, resource, method, policy).await;
        self.record(identity, resource, method, &outcome);
        outcome
    }

    async fn decide(
        &self,
        identity: Option<&Identity>,
        resource: ResourceRef,
        method: &Method,
        policy: GatePolicy,
    ) -> Result<Permit, AccessError> {
        let resolution = self.resolver.resolve(identity, resource).await?;

        let satisfies_policy = match policy {
            GatePolicy::MethodTable => true,
            GatePolicy::AtLeast(minimum) => resolution.role >= minimum,
        };

        if !satisfies_policy || !is_method_allowed(method, Some(resolution.role)) {
            return Err(AccessError::InsufficientPermission {
                role: resolution.role,
                method: method.clone(),
            });
        }

        Ok(Permit {
            role: resolution.role,
            project_id: resolution.project_id,
            resource,
        })
    }

    fn record(
        &self,
        identity: Option<&Identity>,
        resource: ResourceRef,
        method: &Method,
        outcome: &Result<Permit, AccessError>,
    ) {
        let user = identity.map(|i| i.id.to_string()).unwrap_or_else(|| "anonymous".to_string());

        match outcome {
            Ok(permit) => {
                tracing::debug!("Permit {} {} for {} as {}", method, resource, user, permit.role);
                if self.audit {
                    tracing::info!(target: "audit", %user, %method, %resource, role = %permit.role, "permit");
                }
            }
            Err(AccessError::ResolutionFailed(msg)) => {
                tracing::error!("Access resolution failed for {} {} ({}): {}", method, resource, user, msg);
            }
            Err(err) => {
                tracing::debug!("Deny {} {} for {}: {}", method, resource, user, err);
                if !self.audit {
                    return;
                }
                match err.role() {
                    Some(role) => {
                        tracing::info!(target: "audit", %user, %method, %resource, %role, reason = err.kind(), "deny")
                    }
                    None => tracing::info!(target: "audit", %user, %method, %resource, reason = err.kind(), "deny"),
                }
            }
        }
    }
}
