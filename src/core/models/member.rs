//! Member model
//!
//! A member is a registered participant of the society, identified by a
//! numeric id. Dependents are tracked for funeral-benefit eligibility.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Role;

/// Membership status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MemberStatus {
    /// Full obligations
    #[default]
    Regular,
    /// Freed from all obligations (e.g. elderly members)
    Free,
    /// Hardship arrangement, freed from duty and attendance
    Convenient,
    /// Does not have to attend meetings or common work
    AttendanceExempt,
    /// Does not take funeral duty
    FuneralExempt,
    /// Temporarily suspended
    Suspended,
    /// Membership canceled
    Canceled,
}

impl MemberStatus {
    /// Statuses that are recorded as "released" instead of assigned funeral duty
    #[must_use]
    pub const fn is_duty_exempt(self) -> bool {
        matches!(
            self,
            Self::Free | Self::Convenient | Self::FuneralExempt | Self::AttendanceExempt
        )
    }

    /// Statuses left out of meeting and common-work attendance
    #[must_use]
    pub const fn is_attendance_exempt(self) -> bool {
        matches!(self, Self::Free | Self::Convenient | Self::AttendanceExempt)
    }

    /// Suspended and canceled members are not on any roster
    #[must_use]
    pub const fn is_inactive(self) -> bool {
        matches!(self, Self::Suspended | Self::Canceled)
    }
}

impl std::fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Regular => write!(f, "regular"),
            Self::Free => write!(f, "free"),
            Self::Convenient => write!(f, "convenient"),
            Self::AttendanceExempt => write!(f, "attendance-exempt"),
            Self::FuneralExempt => write!(f, "funeral-exempt"),
            Self::Suspended => write!(f, "suspended"),
            Self::Canceled => write!(f, "canceled"),
        }
    }
}

impl std::str::FromStr for MemberStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "regular" => Ok(Self::Regular),
            "free" => Ok(Self::Free),
            "convenient" => Ok(Self::Convenient),
            "attendance-exempt" => Ok(Self::AttendanceExempt),
            "funeral-exempt" => Ok(Self::FuneralExempt),
            "suspended" => Ok(Self::Suspended),
            "canceled" | "cancelled" => Ok(Self::Canceled),
            _ => Err(format!(
                "Invalid status: {s}. Use: regular, free, convenient, attendance-exempt, \
                 funeral-exempt, suspended, canceled"
            )),
        }
    }
}

/// A family member of a [`Member`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependent {
    /// Full name
    pub name: String,
    /// Relationship to the member (spouse, child, parent, ...)
    pub relationship: String,
    /// Date of death, once recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_date: Option<NaiveDate>,
}

/// A registered member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Unique numeric id; the duty roster is ordered by it
    pub id: u32,
    /// Full name
    pub name: String,
    /// Neighbourhood or village area
    pub area: String,
    /// Contact phone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Membership status
    #[serde(default)]
    pub status: MemberStatus,
    /// Officer roles currently held (empty for ordinary members)
    #[serde(default)]
    pub officer_roles: BTreeSet<Role>,
    /// Dependents, in registration order
    #[serde(default)]
    pub dependents: Vec<Dependent>,
    /// Date of death, once recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_date: Option<NaiveDate>,
    /// Date the member joined
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joined_on: Option<NaiveDate>,
}

impl Member {
    /// Create a regular member with no dependents or roles
    #[must_use]
    pub fn new(id: u32, name: impl Into<String>, area: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            area: area.into(),
            phone: None,
            status: MemberStatus::Regular,
            officer_roles: BTreeSet::new(),
            dependents: Vec::new(),
            death_date: None,
            joined_on: None,
        }
    }

    /// Living and neither suspended nor canceled
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.death_date.is_none() && !self.status.is_inactive()
    }

    /// Holds at least one officer role
    #[must_use]
    pub fn is_officer(&self) -> bool {
        !self.officer_roles.is_empty()
    }

    /// Expected at meetings and common work
    #[must_use]
    pub fn is_attendance_eligible(&self) -> bool {
        self.is_active() && !self.status.is_attendance_exempt()
    }

    /// Name of the member or of one of their dependents
    #[must_use]
    pub fn deceased_name(&self, dependent_index: Option<usize>) -> Option<&str> {
        match dependent_index {
            None => Some(self.name.as_str()),
            Some(index) => self.dependents.get(index).map(|d| d.name.as_str()),
        }
    }

    /// Recorded death date of the member or one of their dependents
    #[must_use]
    pub fn death_recorded(&self, dependent_index: Option<usize>) -> Option<NaiveDate> {
        match dependent_index {
            None => self.death_date,
            Some(index) => self.dependents.get(index).and_then(|d| d.death_date),
        }
    }
}
