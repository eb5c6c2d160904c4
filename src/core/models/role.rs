//! Officer roles
//!
//! Role strings gate API endpoints. `super-admin` satisfies every requirement.

use serde::{Deserialize, Serialize};

/// An officer role
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// Full administrative access, including officer accounts
    SuperAdmin,
    /// Chairperson of the society
    Chairperson,
    /// Secretary: member directory and attendance
    Secretary,
    /// Vice-secretary: member directory, attendance and funeral duty
    ViceSecretary,
    /// Treasurer: settings and cash book
    Treasurer,
    /// Loan treasurer: loan ledger
    LoanTreasurer,
    /// Auditor: read access to money matters
    Auditor,
}

impl Role {
    /// Every role, in declaration order
    pub const ALL: [Self; 7] = [
        Self::SuperAdmin,
        Self::Chairperson,
        Self::Secretary,
        Self::ViceSecretary,
        Self::Treasurer,
        Self::LoanTreasurer,
        Self::Auditor,
    ];

    /// The role string used in tokens and JSON
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SuperAdmin => "super-admin",
            Self::Chairperson => "chairperson",
            Self::Secretary => "secretary",
            Self::ViceSecretary => "vice-secretary",
            Self::Treasurer => "treasurer",
            Self::LoanTreasurer => "loan-treasurer",
            Self::Auditor => "auditor",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == normalized)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|r| r.as_str()).collect();
                format!("Invalid role: {s}. Use: {}", known.join(", "))
            })
    }
}
