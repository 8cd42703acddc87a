use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::access::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMember {
    pub id: Uuid,
    pub project_id: Uuid,
    pub user_id: Uuid,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Role arrives as a plain string so an unknown value can be reported as a
/// field error rather than a body parse failure.
#[derive(Debug, Clone, Deserialize)]
pub struct AddMember {
    pub user_id: Uuid,
    pub role: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeAccess {
    pub role: String,
}
