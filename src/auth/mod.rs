//! Bearer-token authentication
//!
//! Officers authenticate with signed bearer tokens. The server verifies the
//! signature and expiry, then re-checks the officer record so deactivated
//! accounts lose access immediately.

mod token;

pub use token::{Claims, TokenError, TokenSigner, bearer_token};

use std::collections::BTreeSet;

use crate::core::models::{Officer, Role};

/// The authenticated officer behind a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    /// Officer username
    pub username: String,
    /// Display name
    pub name: String,
    /// Roles from the officer record
    pub roles: BTreeSet<Role>,
}

impl Caller {
    /// Caller for an officer record
    #[must_use]
    pub fn from_officer(officer: &Officer) -> Self {
        Self {
            username: officer.username.clone(),
            name: officer.name.clone(),
            roles: officer.roles.clone(),
        }
    }
}
