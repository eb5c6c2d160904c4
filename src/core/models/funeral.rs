//! Funeral event model
//!
//! A funeral event records who was assigned cemetery and parade duty, who
//! was removed or released, and who was absent. Events are never deleted;
//! they are the audit trail for funeral fines.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The two funeral duties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Duty {
    /// Digging and closing the grave
    Cemetery,
    /// Funeral parade / procession
    Funeral,
}

impl std::fmt::Display for Duty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cemetery => write!(f, "cemetery"),
            Self::Funeral => write!(f, "funeral"),
        }
    }
}

impl std::str::FromStr for Duty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cemetery" => Ok(Self::Cemetery),
            "funeral" | "parade" => Ok(Self::Funeral),
            _ => Err(format!("Invalid duty: {s}. Use: cemetery, funeral")),
        }
    }
}

/// Snapshot of a member at assignment time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DutyMember {
    /// Member id
    pub id: u32,
    /// Member name when assigned
    pub name: String,
}

/// Who died: a member, or one of their dependents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deceased {
    /// The member (or the member the dependent belongs to)
    pub member_id: u32,
    /// Index into the member's dependents, when a dependent died
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependent_index: Option<usize>,
    /// Name of the deceased
    pub name: String,
}

/// One funeral and its duty roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuneralEvent {
    /// Sequential id
    pub id: u32,
    /// Who died
    pub deceased: Deceased,
    /// Funeral date
    pub date: NaiveDate,
    /// Roster cursor the assignment started after
    pub start_after_id: u32,
    /// Slots per duty when planned
    #[serde(default = "default_duty_size")]
    pub duty_size: usize,
    /// Previously removed members offered duty again
    #[serde(default)]
    pub carry_over: Vec<u32>,
    /// Cemetery duty, in assignment order
    pub cemetery_assignments: Vec<DutyMember>,
    /// Funeral parade duty, in assignment order
    pub funeral_assignments: Vec<DutyMember>,
    /// Members removed by an operator; retried at a later funeral
    #[serde(default)]
    pub removed_members: Vec<DutyMember>,
    /// Exempt members passed over inside the assignment window
    #[serde(default)]
    pub released_members: Vec<DutyMember>,
    /// Assigned cemetery members who did not show up
    #[serde(default)]
    pub cemetery_absent: Vec<u32>,
    /// Assigned parade members who did not show up
    #[serde(default)]
    pub funeral_absent: Vec<u32>,
    /// Once finalized, assignments can no longer be adjusted
    #[serde(default)]
    pub finalized: bool,
    /// Fewer eligible members than slots when planned
    #[serde(default)]
    pub shortfall: usize,
    /// Who planned the event
    pub created_by: String,
    /// When planned (RFC3339)
    pub created_at: String,
}

const fn default_duty_size() -> usize {
    15
}

impl FuneralEvent {
    /// Assignment list for a duty
    #[must_use]
    pub fn assignments(&self, duty: Duty) -> &[DutyMember] {
        match duty {
            Duty::Cemetery => &self.cemetery_assignments,
            Duty::Funeral => &self.funeral_assignments,
        }
    }

    /// Absent ids for a duty
    #[must_use]
    pub fn absent(&self, duty: Duty) -> &[u32] {
        match duty {
            Duty::Cemetery => &self.cemetery_absent,
            Duty::Funeral => &self.funeral_absent,
        }
    }

    /// The duty a member currently holds in this event
    #[must_use]
    pub fn duty_of(&self, member_id: u32) -> Option<Duty> {
        if self.cemetery_assignments.iter().any(|m| m.id == member_id) {
            Some(Duty::Cemetery)
        } else if self.funeral_assignments.iter().any(|m| m.id == member_id) {
            Some(Duty::Funeral)
        } else {
            None
        }
    }

    /// Ids that cannot be handed a new slot in this event
    #[must_use]
    pub fn taken_ids(&self) -> BTreeSet<u32> {
        self.cemetery_assignments
            .iter()
            .chain(&self.funeral_assignments)
            .chain(&self.removed_members)
            .map(|m| m.id)
            .collect()
    }

    /// Highest assigned id across both duty lists
    #[must_use]
    pub fn highest_assigned_id(&self) -> Option<u32> {
        self.cemetery_assignments
            .iter()
            .chain(&self.funeral_assignments)
            .map(|m| m.id)
            .max()
    }
}

/// Where the funeral duty rotation stands between events
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationState {
    /// Id of the last member handed duty; the next event starts after it
    #[serde(default)]
    pub last_assigned_id: u32,
    /// Removed members waiting to be offered duty again
    #[serde(default)]
    pub pending_carry_over: BTreeSet<u32>,
    /// Most recently planned event
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_event_id: Option<u32>,
}
