//! Fines derived from absences
//!
//! Fines are not stored. They are assessed from attendance records and
//! funeral absences, priced with the amounts in the settings registry.

use chrono::NaiveDate;
use serde::Serialize;

use crate::core::models::{AttendanceKind, AttendanceRecord, Duty, FuneralEvent, Money};

/// Fine amounts per absence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FineSchedule {
    /// Per missed meeting
    pub meeting: Money,
    /// Per missed common work day
    pub common_work: Money,
    /// Per missed cemetery duty
    pub cemetery: Money,
    /// Per missed funeral parade duty
    pub funeral: Money,
}

impl FineSchedule {
    fn for_attendance(&self, kind: AttendanceKind) -> Money {
        match kind {
            AttendanceKind::Meeting => self.meeting,
            AttendanceKind::CommonWork => self.common_work,
        }
    }

    fn for_duty(&self, duty: Duty) -> Money {
        match duty {
            Duty::Cemetery => self.cemetery,
            Duty::Funeral => self.funeral,
        }
    }
}

/// Why a fine was assessed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FineReason {
    /// Missed a meeting
    MeetingAbsence,
    /// Missed a common work day
    CommonWorkAbsence,
    /// Missed assigned cemetery duty
    CemeteryAbsence,
    /// Missed assigned funeral parade duty
    FuneralAbsence,
}

/// One fine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FineItem {
    /// Why
    pub reason: FineReason,
    /// Date of the missed gathering
    pub date: NaiveDate,
    /// Amount owed
    pub amount: Money,
    /// Funeral event, for duty absences
    #[serde(skip_serializing_if = "Option::is_none")]
    pub funeral_id: Option<u32>,
}

/// A member's fines
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FineStatement {
    /// Member assessed
    pub member_id: u32,
    /// Fines, oldest first
    pub items: Vec<FineItem>,
    /// Sum of all items
    pub total: Money,
}

/// Assess a member's fines from every recorded absence
#[must_use]
pub fn assess_fines(
    member_id: u32,
    attendance: &[AttendanceRecord],
    funerals: &[FuneralEvent],
    schedule: &FineSchedule,
) -> FineStatement {
    let mut items: Vec<FineItem> = attendance
        .iter()
        .filter(|record| record.is_absent(member_id))
        .map(|record| FineItem {
            reason: match record.kind {
                AttendanceKind::Meeting => FineReason::MeetingAbsence,
                AttendanceKind::CommonWork => FineReason::CommonWorkAbsence,
            },
            date: record.date,
            amount: schedule.for_attendance(record.kind),
            funeral_id: None,
        })
        .collect();

    for event in funerals {
        for duty in [Duty::Cemetery, Duty::Funeral] {
            if event.absent(duty).contains(&member_id) {
                items.push(FineItem {
                    reason: match duty {
                        Duty::Cemetery => FineReason::CemeteryAbsence,
                        Duty::Funeral => FineReason::FuneralAbsence,
                    },
                    date: event.date,
                    amount: schedule.for_duty(duty),
                    funeral_id: Some(event.id),
                });
            }
        }
    }

    items.sort_by_key(|item| item.date);
    let total = items.iter().map(|item| item.amount).sum();

    FineStatement {
        member_id,
        items,
        total,
    }
}
