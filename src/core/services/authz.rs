//! Authorization policy
//!
//! A single function decides whether a caller holding some roles may use an
//! operation requiring others. Endpoints declare their required roles; the
//! server adapter asks this policy before calling a handler.

use std::collections::BTreeSet;

use crate::core::models::Role;

/// Outcome of an authorization check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Caller may proceed
    Allow,
    /// Caller lacks every required role
    Deny,
}

impl Decision {
    /// Whether the decision is [`Decision::Allow`]
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Decide whether `caller_roles` satisfies `required`.
///
/// - `super-admin` is allowed everything
/// - an empty `required` list means any authenticated officer
/// - otherwise the caller needs at least one of the required roles
#[must_use]
pub fn authorize(caller_roles: &BTreeSet<Role>, required: &[Role]) -> Decision {
    if caller_roles.contains(&Role::SuperAdmin) {
        return Decision::Allow;
    }
    if required.is_empty() || required.iter().any(|role| caller_roles.contains(role)) {
        Decision::Allow
    } else {
        Decision::Deny
    }
}
