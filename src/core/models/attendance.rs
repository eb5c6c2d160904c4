//! Attendance records for meetings and common work
//!
//! One record per (kind, date); resubmitting replaces the absentee list.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// What kind of gathering was tracked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttendanceKind {
    /// General meeting
    Meeting,
    /// Common work day
    CommonWork,
}

impl AttendanceKind {
    /// Path segment and JSON value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Meeting => "meeting",
            Self::CommonWork => "common-work",
        }
    }
}

impl std::fmt::Display for AttendanceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AttendanceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "meeting" | "meetings" => Ok(Self::Meeting),
            "common-work" | "commonwork" => Ok(Self::CommonWork),
            _ => Err(format!("Invalid attendance kind: {s}. Use: meeting, common-work")),
        }
    }
}

/// Absentees of one gathering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    /// Meeting or common work
    pub kind: AttendanceKind,
    /// Date of the gathering
    pub date: NaiveDate,
    /// Members expected to attend, ascending
    pub eligible: Vec<u32>,
    /// Members who did not attend, ascending
    pub absent_array: Vec<u32>,
    /// Officer who last submitted the record
    pub recorded_by: String,
    /// Last submission (RFC3339)
    pub updated_at: String,
}

impl AttendanceRecord {
    /// Whether a member was marked absent
    #[must_use]
    pub fn is_absent(&self, member_id: u32) -> bool {
        self.absent_array.binary_search(&member_id).is_ok()
    }
}
