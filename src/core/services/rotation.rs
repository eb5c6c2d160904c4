//! Funeral duty rotation
//!
//! The roster is every active member, ascending by id. Each funeral takes
//! the next `duty_size` eligible members for cemetery duty and the next
//! `duty_size` for the funeral parade, starting after the id of the last
//! member assigned at the previous funeral. Members removed from an earlier
//! funeral (the carry-over set) are offered duty again regardless of id.
//!
//! Officers are skipped silently. Members with a duty-exempt status are
//! skipped too, but recorded as "released" when they fall inside the
//! assignment window, so the register shows they were passed over.
//!
//! This module is pure: it takes the roster and cursor as input and returns
//! the plan; persistence is the caller's job.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::models::{Duty, DutyMember, FuneralEvent, Member, MemberStatus};

/// How far the released list reaches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReleaseWindow {
    /// Exempt members with id at or below the last cemetery assignee
    #[default]
    Cemetery,
    /// Exempt members with id at or below the last assignee of either duty
    Assignment,
}

impl std::str::FromStr for ReleaseWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cemetery" => Ok(Self::Cemetery),
            "assignment" => Ok(Self::Assignment),
            _ => Err(format!("Invalid release window: {s}. Use: cemetery, assignment")),
        }
    }
}

/// Rotation parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationPolicy {
    /// Slots per duty list
    pub duty_size: usize,
    /// Reach of the released list
    pub release_window: ReleaseWindow,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            duty_size: 15,
            release_window: ReleaseWindow::default(),
        }
    }
}

/// One member as the rotation sees them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    /// Member id
    pub id: u32,
    /// Member name
    pub name: String,
    /// Membership status
    pub status: MemberStatus,
    /// Currently holds an officer role
    pub officer: bool,
}

impl RosterEntry {
    /// Build a roster entry from a member record
    #[must_use]
    pub fn from_member(member: &Member) -> Self {
        Self {
            id: member.id,
            name: member.name.clone(),
            status: member.status,
            officer: member.is_officer(),
        }
    }

    fn snapshot(&self) -> DutyMember {
        DutyMember {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// The duty roster: active members, ascending by id
#[must_use]
pub fn build_roster(members: &[Member]) -> Vec<RosterEntry> {
    let mut roster: Vec<RosterEntry> = members
        .iter()
        .filter(|m| m.is_active())
        .map(RosterEntry::from_member)
        .collect();
    roster.sort_by_key(|e| e.id);
    roster
}

/// Result of an assignment run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DutyPlan {
    /// Cemetery duty, ascending by id
    pub cemetery_assignments: Vec<DutyMember>,
    /// Funeral parade duty, ascending by id
    pub funeral_assignments: Vec<DutyMember>,
    /// Exempt members passed over inside the window
    pub released_members: Vec<DutyMember>,
    /// Empty slots across both lists (0 when the roster sufficed)
    pub shortfall: usize,
    /// Carry-over ids that were assigned or released by this plan
    pub carry_over_consumed: Vec<u32>,
    /// Cursor for the next funeral
    pub next_cursor: u32,
}

impl DutyPlan {
    /// Both lists are full
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.shortfall == 0
    }
}

/// Assign the next cemetery and parade duty lists.
///
/// When fewer than `2 * duty_size` eligible members remain, the lists come
/// back short, `shortfall` counts the empty slots and `next_cursor` wraps
/// to 0 so the following funeral starts again from the top of the roster.
#[must_use]
pub fn assign_duties(
    roster: &[RosterEntry],
    last_assigned_id: u32,
    carry_over: &BTreeSet<u32>,
    policy: &RotationPolicy,
) -> DutyPlan {
    let candidates = candidates(roster, last_assigned_id, carry_over);
    let (eligible, exempt): (Vec<&RosterEntry>, Vec<&RosterEntry>) =
        candidates.into_iter().partition(|e| !e.status.is_duty_exempt());

    let size = policy.duty_size;
    let cemetery: Vec<DutyMember> = eligible.iter().take(size).map(|e| e.snapshot()).collect();
    let funeral: Vec<DutyMember> =
        eligible.iter().skip(size).take(size).map(|e| e.snapshot()).collect();

    let released = match release_cutoff(&cemetery, &funeral, policy.release_window) {
        Some(cutoff) => exempt
            .iter()
            .filter(|e| e.id <= cutoff)
            .map(|e| e.snapshot())
            .collect(),
        None => Vec::new(),
    };

    let shortfall = 2 * size - cemetery.len() - funeral.len();
    let highest = cemetery.iter().chain(&funeral).map(|m| m.id).max().unwrap_or(0);
    let next_cursor = if shortfall == 0 {
        highest.max(last_assigned_id)
    } else {
        0
    };

    let carry_over_consumed = cemetery
        .iter()
        .chain(&funeral)
        .chain(&released)
        .map(|m| m.id)
        .filter(|id| carry_over.contains(id))
        .collect::<BTreeSet<u32>>()
        .into_iter()
        .collect();

    DutyPlan {
        cemetery_assignments: cemetery,
        funeral_assignments: funeral,
        released_members: released,
        shortfall,
        carry_over_consumed,
        next_cursor,
    }
}

/// Carry-over ids that can still be handed duty: active members who are
/// not officers. Everyone else is dropped from the pending set.
#[must_use]
pub fn live_carry_over(roster: &[RosterEntry], carry_over: &BTreeSet<u32>) -> BTreeSet<u32> {
    roster
        .iter()
        .filter(|e| !e.officer && carry_over.contains(&e.id))
        .map(|e| e.id)
        .collect()
}

/// Why an assignment cannot be adjusted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AdjustError {
    /// The event has been finalized
    #[error("funeral {0} is finalized")]
    Finalized(u32),

    /// The member holds no duty in this event
    #[error("member {0} is not assigned to this funeral")]
    NotAssigned(u32),
}

/// What a removal changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Removal {
    /// The member removed
    pub removed: DutyMember,
    /// The list they were removed from
    pub duty: Duty,
    /// Parade member moved up into the cemetery list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promoted: Option<DutyMember>,
    /// Roster member appended to fill the vacancy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backfilled: Option<DutyMember>,
}

/// Where a removal looks for a replacement member.
///
/// Replacements come from the rotation as it stands now, not as it stood
/// when the event was planned: members past the current cursor plus the
/// pending carry-over. Members holding duty at another open event are
/// listed in `excluded`.
#[derive(Debug, Clone, Copy)]
pub struct Backfill<'a> {
    /// Current rotation cursor
    pub after_id: u32,
    /// Pending carry-over ids
    pub carry_over: &'a BTreeSet<u32>,
    /// Ids that must not be picked
    pub excluded: &'a BTreeSet<u32>,
}

/// Remove a member from an event's duty lists and refill the vacancy.
///
/// A cemetery vacancy is filled by the head of the parade list; the parade
/// list is then topped up with the next eligible member from `backfill`
/// that nobody in this event has taken. The removed member is recorded on
/// the event and should be added to the carry-over set for later funerals.
pub fn remove_from_duty(
    event: &mut FuneralEvent,
    member_id: u32,
    roster: &[RosterEntry],
    backfill: &Backfill<'_>,
    release_window: ReleaseWindow,
) -> Result<Removal, AdjustError> {
    if event.finalized {
        return Err(AdjustError::Finalized(event.id));
    }
    let duty = event.duty_of(member_id).ok_or(AdjustError::NotAssigned(member_id))?;
    let span_end = event
        .taken_ids()
        .into_iter()
        .chain(event.released_members.iter().map(|m| m.id))
        .max()
        .unwrap_or(event.start_after_id);

    let list = match duty {
        Duty::Cemetery => &mut event.cemetery_assignments,
        Duty::Funeral => &mut event.funeral_assignments,
    };
    let position = list
        .iter()
        .position(|m| m.id == member_id)
        .ok_or(AdjustError::NotAssigned(member_id))?;
    let removed = list.remove(position);
    event.removed_members.push(removed.clone());

    let taken = event.taken_ids();
    let backfilled = candidates(roster, backfill.after_id, backfill.carry_over)
        .into_iter()
        .filter(|e| !taken.contains(&e.id) && !backfill.excluded.contains(&e.id))
        .find(|e| !e.status.is_duty_exempt())
        .map(RosterEntry::snapshot);
    if let Some(member) = &backfilled {
        event.funeral_assignments.push(member.clone());
    }

    let mut promoted = None;
    while event.cemetery_assignments.len() < event.duty_size
        && !event.funeral_assignments.is_empty()
    {
        let head = event.funeral_assignments.remove(0);
        promoted = Some(head.clone());
        event.cemetery_assignments.push(head);
    }

    refresh_released(event, roster, release_window, span_end, backfill);
    event.shortfall = (2 * event.duty_size)
        .saturating_sub(event.cemetery_assignments.len() + event.funeral_assignments.len());

    Ok(Removal {
        removed,
        duty,
        promoted,
        backfilled,
    })
}

/// Non-officer roster members due for duty, ascending by id
fn candidates<'a>(
    roster: &'a [RosterEntry],
    last_assigned_id: u32,
    carry_over: &BTreeSet<u32>,
) -> Vec<&'a RosterEntry> {
    let mut due: Vec<&RosterEntry> = roster
        .iter()
        .filter(|e| e.id > last_assigned_id || carry_over.contains(&e.id))
        .filter(|e| !e.officer)
        .collect();
    due.sort_by_key(|e| e.id);
    due
}

fn release_cutoff(
    cemetery: &[DutyMember],
    funeral: &[DutyMember],
    window: ReleaseWindow,
) -> Option<u32> {
    match window {
        ReleaseWindow::Cemetery => cemetery.iter().map(|m| m.id).max(),
        ReleaseWindow::Assignment => cemetery.iter().chain(funeral).map(|m| m.id).max(),
    }
}

/// Extend the released list after the window moved. Entries already
/// released stay released.
///
/// Only members this event covered (up to `span_end`) or members the
/// backfill reached past the rotation cursor qualify; the ids in between
/// belong to later funerals.
fn refresh_released(
    event: &mut FuneralEvent,
    roster: &[RosterEntry],
    window: ReleaseWindow,
    span_end: u32,
    backfill: &Backfill<'_>,
) {
    let Some(cutoff) =
        release_cutoff(&event.cemetery_assignments, &event.funeral_assignments, window)
    else {
        return;
    };
    let carry_over: BTreeSet<u32> = event.carry_over.iter().copied().collect();
    let known: BTreeSet<u32> = event.released_members.iter().map(|m| m.id).collect();
    let taken = event.taken_ids();

    let newly_released: Vec<DutyMember> = candidates(roster, event.start_after_id, &carry_over)
        .into_iter()
        .filter(|e| e.status.is_duty_exempt() && e.id <= cutoff)
        .filter(|e| e.id <= span_end || e.id > backfill.after_id)
        .filter(|e| !known.contains(&e.id) && !taken.contains(&e.id))
        .filter(|e| !backfill.excluded.contains(&e.id))
        .map(RosterEntry::snapshot)
        .collect();

    if !newly_released.is_empty() {
        event.released_members.extend(newly_released);
        event.released_members.sort_by_key(|m| m.id);
    }
}
