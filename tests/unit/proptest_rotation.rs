//! Property-based tests for duty assignment
//!
//! Uses proptest to check what must hold for any roster and cursor.

use std::collections::BTreeSet;

use proptest::prelude::*;

use idir::core::models::{Deceased, Duty, DutyMember, FuneralEvent, MemberStatus};
use idir::core::services::{
    Backfill, DutyPlan, ReleaseWindow, RosterEntry, RotationPolicy, assign_duties,
    remove_from_duty,
};

const STATUSES: [MemberStatus; 5] = [
    MemberStatus::Regular,
    MemberStatus::Free,
    MemberStatus::Convenient,
    MemberStatus::AttendanceExempt,
    MemberStatus::FuneralExempt,
];

/// Roster of ids `1..=len` with arbitrary statuses and officer flags
fn roster_strategy() -> impl Strategy<Value = Vec<RosterEntry>> {
    prop::collection::vec((0..STATUSES.len(), prop::bool::weighted(0.1)), 0..80).prop_map(
        |entries| {
            entries
                .into_iter()
                .enumerate()
                .map(|(i, (status, officer))| {
                    let id = u32::try_from(i).unwrap() + 1;
                    RosterEntry {
                        id,
                        name: format!("Member {id}"),
                        status: STATUSES[status],
                        officer,
                    }
                })
                .collect()
        },
    )
}

fn window_strategy() -> impl Strategy<Value = ReleaseWindow> {
    prop_oneof![Just(ReleaseWindow::Cemetery), Just(ReleaseWindow::Assignment)]
}

fn id_set<'a>(lists: impl IntoIterator<Item = &'a [DutyMember]>) -> BTreeSet<u32> {
    lists.into_iter().flatten().map(|m| m.id).collect()
}

/// An unfinalized event holding `plan`
fn event_for(plan: &DutyPlan, cursor: u32, carried: &BTreeSet<u32>, size: usize) -> FuneralEvent {
    FuneralEvent {
        id: 1,
        deceased: Deceased {
            member_id: 1,
            dependent_index: None,
            name: "Member 1".to_string(),
        },
        date: chrono::NaiveDate::from_ymd_opt(2026, 5, 2).unwrap(),
        start_after_id: cursor,
        duty_size: size,
        carry_over: carried.iter().copied().collect(),
        cemetery_assignments: plan.cemetery_assignments.clone(),
        funeral_assignments: plan.funeral_assignments.clone(),
        removed_members: Vec::new(),
        released_members: plan.released_members.clone(),
        cemetery_absent: Vec::new(),
        funeral_absent: Vec::new(),
        finalized: false,
        shortfall: plan.shortfall,
        created_by: "vice".to_string(),
        created_at: String::new(),
    }
}

proptest! {
    /// Inside the release window every non-officer candidate is assigned or
    /// released, and nobody outside the candidates appears
    #[test]
    fn window_is_covered_exactly(
        roster in roster_strategy(),
        cursor in 0u32..80,
        carried in prop::collection::btree_set(1u32..80, 0..6),
        size in 1usize..20,
        window in window_strategy(),
    ) {
        let policy = RotationPolicy { duty_size: size, release_window: window };
        let plan = assign_duties(&roster, cursor, &carried, &policy);

        let candidates: BTreeSet<u32> = roster
            .iter()
            .filter(|e| !e.officer && (e.id > cursor || carried.contains(&e.id)))
            .map(|e| e.id)
            .collect();
        let covered = id_set([
            &plan.cemetery_assignments[..],
            &plan.funeral_assignments[..],
            &plan.released_members[..],
        ]);
        prop_assert!(covered.is_subset(&candidates));

        let cutoff = match window {
            ReleaseWindow::Cemetery => id_set([&plan.cemetery_assignments[..]]).last().copied(),
            ReleaseWindow::Assignment => id_set([
                &plan.cemetery_assignments[..],
                &plan.funeral_assignments[..],
            ])
            .last()
            .copied(),
        };
        match cutoff {
            Some(cutoff) => {
                let expected: BTreeSet<u32> =
                    candidates.iter().copied().filter(|id| *id <= cutoff).collect();
                let inside: BTreeSet<u32> =
                    covered.iter().copied().filter(|id| *id <= cutoff).collect();
                prop_assert_eq!(inside, expected);
            },
            None => prop_assert!(covered.is_empty()),
        }
    }

    /// Removing a member keeps the cemetery list full when anyone can move
    /// up, records the removal and keeps every list disjoint
    #[test]
    fn removal_cascade_keeps_invariants(
        roster in roster_strategy(),
        cursor in 0u32..80,
        carried in prop::collection::btree_set(1u32..80, 0..6),
        pending in prop::collection::btree_set(1u32..100, 0..4),
        size in 1usize..12,
        window in window_strategy(),
        pick in any::<prop::sample::Index>(),
    ) {
        let policy = RotationPolicy { duty_size: size, release_window: window };
        let plan = assign_duties(&roster, cursor, &carried, &policy);
        let assigned: Vec<u32> = plan
            .cemetery_assignments
            .iter()
            .chain(&plan.funeral_assignments)
            .map(|m| m.id)
            .collect();
        prop_assume!(!assigned.is_empty());
        let member_id = assigned[pick.index(assigned.len())];

        let mut event = event_for(&plan, cursor, &carried, size);
        let cemetery_before = event.cemetery_assignments.len();
        let funeral_before = event.funeral_assignments.len();
        let excluded = BTreeSet::new();
        let backfill = Backfill {
            after_id: plan.next_cursor,
            carry_over: &pending,
            excluded: &excluded,
        };
        let removal = remove_from_duty(&mut event, member_id, &roster, &backfill, window).unwrap();

        prop_assert_eq!(event.removed_members.len(), 1);
        prop_assert_eq!(event.removed_members[0].id, member_id);
        let refilled = removal.duty == Duty::Funeral
            || funeral_before > 0
            || removal.backfilled.is_some();
        if refilled {
            prop_assert_eq!(event.cemetery_assignments.len(), cemetery_before);
        }
        prop_assert_eq!(
            event.cemetery_assignments.len() + event.funeral_assignments.len(),
            cemetery_before + funeral_before - 1 + usize::from(removal.backfilled.is_some())
        );

        let cemetery = id_set([&event.cemetery_assignments[..]]);
        let funeral = id_set([&event.funeral_assignments[..]]);
        let removed = id_set([&event.removed_members[..]]);
        let released = id_set([&event.released_members[..]]);
        prop_assert!(cemetery.is_disjoint(&funeral));
        prop_assert!(cemetery.is_disjoint(&removed));
        prop_assert!(funeral.is_disjoint(&removed));
        prop_assert!(released.is_disjoint(&cemetery) && released.is_disjoint(&funeral));
        if let Some(member) = &removal.backfilled {
            let entry = roster.iter().find(|e| e.id == member.id).unwrap();
            prop_assert!(!entry.officer && !entry.status.is_duty_exempt());
            prop_assert!(member.id > plan.next_cursor || pending.contains(&member.id));
        }
    }

    /// Both lists are ascending, disjoint and no longer than the duty size
    #[test]
    fn lists_are_sorted_disjoint_and_bounded(
        roster in roster_strategy(),
        cursor in 0u32..80,
        size in 1usize..20,
        window in window_strategy(),
    ) {
        let policy = RotationPolicy { duty_size: size, release_window: window };
        let plan = assign_duties(&roster, cursor, &BTreeSet::new(), &policy);

        let cemetery: Vec<u32> = plan.cemetery_assignments.iter().map(|m| m.id).collect();
        let funeral: Vec<u32> = plan.funeral_assignments.iter().map(|m| m.id).collect();
        prop_assert!(cemetery.len() <= size);
        prop_assert!(funeral.len() <= size);
        prop_assert!(cemetery.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(funeral.windows(2).all(|w| w[0] < w[1]));
        if let (Some(last), Some(first)) = (cemetery.last(), funeral.first()) {
            prop_assert!(last < first);
        }
        prop_assert_eq!(plan.shortfall, 2 * size - cemetery.len() - funeral.len());
    }

    /// Only eligible members past the cursor are assigned
    #[test]
    fn assignees_are_eligible_and_past_the_cursor(
        roster in roster_strategy(),
        cursor in 0u32..80,
        size in 1usize..20,
    ) {
        let policy = RotationPolicy { duty_size: size, ..RotationPolicy::default() };
        let plan = assign_duties(&roster, cursor, &BTreeSet::new(), &policy);

        for member in plan.cemetery_assignments.iter().chain(&plan.funeral_assignments) {
            let entry = roster.iter().find(|e| e.id == member.id).unwrap();
            prop_assert!(member.id > cursor);
            prop_assert!(!entry.officer);
            prop_assert!(!entry.status.is_duty_exempt());
        }
        for member in &plan.released_members {
            let entry = roster.iter().find(|e| e.id == member.id).unwrap();
            prop_assert!(entry.status.is_duty_exempt());
            prop_assert!(!entry.officer);
        }
    }

    /// A full plan moves the cursor forward; a short one wraps it to zero
    #[test]
    fn cursor_advances_or_wraps(
        roster in roster_strategy(),
        cursor in 0u32..80,
        size in 1usize..20,
    ) {
        let policy = RotationPolicy { duty_size: size, ..RotationPolicy::default() };
        let plan = assign_duties(&roster, cursor, &BTreeSet::new(), &policy);

        if plan.is_complete() {
            prop_assert!(plan.next_cursor >= cursor);
            let highest = plan.funeral_assignments.last().map(|m| m.id);
            prop_assert_eq!(Some(plan.next_cursor), highest.map(|h| h.max(cursor)));
        } else {
            prop_assert_eq!(plan.next_cursor, 0);
        }
    }

    /// Eligible carry-over members are always offered before anyone new
    #[test]
    fn carry_over_goes_first(
        roster in roster_strategy(),
        carried in prop::collection::btree_set(1u32..40, 0..5),
        size in 1usize..20,
    ) {
        let policy = RotationPolicy { duty_size: size, ..RotationPolicy::default() };
        let cursor = 40;
        let plan = assign_duties(&roster, cursor, &carried, &policy);

        let eligible_carried: Vec<u32> = roster
            .iter()
            .filter(|e| carried.contains(&e.id) && !e.officer && !e.status.is_duty_exempt())
            .map(|e| e.id)
            .collect();
        let assigned: Vec<u32> = plan
            .cemetery_assignments
            .iter()
            .chain(&plan.funeral_assignments)
            .map(|m| m.id)
            .collect();
        let expected: Vec<u32> = eligible_carried.iter().copied().take(2 * size).collect();
        prop_assert_eq!(&assigned[..expected.len()], &expected[..]);
        for id in &plan.carry_over_consumed {
            prop_assert!(carried.contains(id));
        }
    }
}
