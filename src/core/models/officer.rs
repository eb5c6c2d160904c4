//! Officer accounts
//!
//! Elevated-privilege accounts, distinct from member records. An officer
//! may be linked to the member they are.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::Role;

/// An officer account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Officer {
    /// Login name, also the token subject
    pub username: String,
    /// Display name
    pub name: String,
    /// Roles granted
    pub roles: BTreeSet<Role>,
    /// Deactivated officers are refused even with a valid token
    #[serde(default = "default_active")]
    pub active: bool,
    /// Linked member record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_id: Option<u32>,
    /// When created (RFC3339)
    pub created_at: String,
}

const fn default_active() -> bool {
    true
}

impl Officer {
    /// Create an active officer
    #[must_use]
    pub fn new(username: &str, name: &str, roles: BTreeSet<Role>) -> Self {
        Self {
            username: username.to_string(),
            name: name.to_string(),
            roles,
            active: true,
            member_id: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
