//! Tests for funeral planning and duty adjustments through the API

use serde_json::json;

use idir::api;
use idir::core::models::{FuneralEvent, MemberStatus, Money};
use idir::core::ports::FuneralRepository;
use idir::core::services::{ReleaseWindow, RotationPolicy};

use super::common::{TestApp, admin, req};

fn ids(members: &[idir::core::models::DutyMember]) -> Vec<u32> {
    members.iter().map(|m| m.id).collect()
}

/// Give member `id` a dependent and record the dependent's death
fn bereave(app: &TestApp, id: u32) {
    let id = id.to_string();
    api::add_dependent(
        &app.ctx,
        &admin(),
        &id,
        &req(json!({"name": "Parent", "relationship": "mother"})),
    )
    .unwrap();
    api::record_dependent_death(&app.ctx, &admin(), &id, "0", &req(json!({"date": "2024-05-01"})))
        .unwrap();
}

fn plan_for_dependent(app: &TestApp, member_id: u32) -> FuneralEvent {
    api::create_funeral(
        &app.ctx,
        &admin(),
        &req(json!({"memberId": member_id, "dependentIndex": 0, "date": "2024-05-03"})),
    )
    .unwrap()
}

// =============================================================================
// PLANNING
// =============================================================================

#[test]
fn test_first_funeral_takes_the_first_thirty() {
    let app = TestApp::new().with_members(40);
    bereave(&app, 1);
    let event = plan_for_dependent(&app, 1);

    assert_eq!(event.id, 1);
    assert_eq!(ids(&event.cemetery_assignments), (1..=15).collect::<Vec<_>>());
    assert_eq!(ids(&event.funeral_assignments), (16..=30).collect::<Vec<_>>());
    assert!(event.released_members.is_empty());
    assert_eq!(event.shortfall, 0);

    let state = app.store.rotation_state().unwrap();
    assert_eq!(state.last_assigned_id, 30);
    assert_eq!(state.last_event_id, Some(1));
}

#[test]
fn test_free_member_is_released_not_assigned() {
    let app = TestApp::new().with_members(4);
    app.add_member(5, MemberStatus::Free);
    for id in 6..=40 {
        app.add_member(id, MemberStatus::Regular);
    }
    bereave(&app, 40);
    let event = plan_for_dependent(&app, 40);

    let cemetery = ids(&event.cemetery_assignments);
    assert_eq!(cemetery.len(), 15);
    assert!(!cemetery.contains(&5));
    assert_eq!(cemetery.last(), Some(&16));
    assert_eq!(ids(&event.funeral_assignments), (17..=31).collect::<Vec<_>>());
    assert_eq!(ids(&event.released_members), vec![5]);
}

#[test]
fn test_member_death_funeral_skips_the_deceased() {
    let app = TestApp::new().with_members(40);
    api::record_member_death(&app.ctx, &admin(), "1", &req(json!({"date": "2024-05-01"})))
        .unwrap();
    let event = api::create_funeral(
        &app.ctx,
        &admin(),
        &req(json!({"memberId": 1, "date": "2024-05-03"})),
    )
    .unwrap();
    assert_eq!(event.deceased.name, "Member 1");
    assert_eq!(ids(&event.cemetery_assignments), (2..=16).collect::<Vec<_>>());
}

#[test]
fn test_funeral_preconditions() {
    let app = TestApp::new().with_members(5);
    let body = |member: u32| req(json!({"memberId": member, "date": "2024-05-03"}));

    let missing = api::create_funeral(&app.ctx, &admin(), &body(99)).unwrap_err();
    assert_eq!(missing.status_code(), 404);

    let alive = api::create_funeral(&app.ctx, &admin(), &body(2)).unwrap_err();
    assert_eq!(alive.status_code(), 409);

    api::record_member_death(&app.ctx, &admin(), "2", &req(json!({"date": "2024-05-01"})))
        .unwrap();
    api::create_funeral(&app.ctx, &admin(), &body(2)).unwrap();
    let twice = api::create_funeral(&app.ctx, &admin(), &body(2)).unwrap_err();
    assert_eq!(twice.status_code(), 409);
}

#[test]
fn test_preview_saves_nothing() {
    let app = TestApp::new().with_members(40);
    let preview = api::preview_duties(&app.ctx).unwrap();
    assert_eq!(preview.start_after_id, 0);
    assert_eq!(preview.plan.next_cursor, 30);
    assert!(api::list_funerals(&app.ctx).unwrap().funerals.is_empty());
    assert_eq!(app.store.rotation_state().unwrap().last_assigned_id, 0);
}

#[test]
fn test_short_roster_wraps_cursor() {
    let policy = RotationPolicy {
        duty_size: 3,
        release_window: ReleaseWindow::Cemetery,
    };
    let app = TestApp::with_policy(policy).with_members(8);
    bereave(&app, 1);
    bereave(&app, 2);

    let first = plan_for_dependent(&app, 1);
    assert_eq!(ids(&first.cemetery_assignments), vec![1, 2, 3]);
    assert_eq!(ids(&first.funeral_assignments), vec![4, 5, 6]);

    let second = plan_for_dependent(&app, 2);
    assert_eq!(ids(&second.cemetery_assignments), vec![7, 8]);
    assert!(second.funeral_assignments.is_empty());
    assert_eq!(second.shortfall, 4);
    assert_eq!(app.store.rotation_state().unwrap().last_assigned_id, 0);
}

// =============================================================================
// ADJUSTMENTS
// =============================================================================

#[test]
fn test_removal_promotes_and_backfills() {
    let app = TestApp::new().with_members(40);
    bereave(&app, 1);
    plan_for_dependent(&app, 1);

    let data =
        api::remove_from_funeral(&app.ctx, &admin(), "1", &req(json!({"memberId": 3}))).unwrap();
    assert_eq!(data.removal.removed.id, 3);
    assert_eq!(data.removal.promoted.as_ref().map(|m| m.id), Some(16));
    assert_eq!(data.removal.backfilled.as_ref().map(|m| m.id), Some(31));

    let event = data.funeral;
    assert_eq!(event.cemetery_assignments.len(), 15);
    assert_eq!(event.funeral_assignments.len(), 15);
    assert!(!ids(&event.cemetery_assignments).contains(&3));
    assert_eq!(ids(&event.removed_members), vec![3]);

    let state = app.store.rotation_state().unwrap();
    assert!(state.pending_carry_over.contains(&3));
    assert_eq!(state.last_assigned_id, 31);

    // The removed member comes back first at the next funeral
    let preview = api::preview_duties(&app.ctx).unwrap();
    assert_eq!(preview.carry_over, vec![3]);
    assert_eq!(preview.plan.cemetery_assignments[0].id, 3);
    assert_eq!(preview.plan.carry_over_consumed, vec![3]);
}

#[test]
fn test_carry_over_is_consumed_by_next_funeral() {
    let app = TestApp::new().with_members(40);
    bereave(&app, 1);
    bereave(&app, 2);
    plan_for_dependent(&app, 1);
    api::remove_from_funeral(&app.ctx, &admin(), "1", &req(json!({"memberId": 20}))).unwrap();

    let second = plan_for_dependent(&app, 2);
    assert!(ids(&second.cemetery_assignments).contains(&20));
    assert!(app.store.rotation_state().unwrap().pending_carry_over.is_empty());
}

#[test]
fn test_removal_from_an_older_funeral_backfills_after_the_cursor() {
    let app = TestApp::new().with_members(70);
    bereave(&app, 1);
    bereave(&app, 2);
    plan_for_dependent(&app, 1);
    let second = plan_for_dependent(&app, 2);
    assert_eq!(ids(&second.cemetery_assignments), (31..=45).collect::<Vec<_>>());

    let data =
        api::remove_from_funeral(&app.ctx, &admin(), "1", &req(json!({"memberId": 5}))).unwrap();
    assert_eq!(data.removal.backfilled.as_ref().map(|m| m.id), Some(61));
    assert!(!ids(&data.funeral.funeral_assignments).contains(&31));

    let state = app.store.rotation_state().unwrap();
    assert_eq!(state.last_assigned_id, 61);
    assert!(state.pending_carry_over.contains(&5));

    // Nobody holds duty at both funerals
    let second = app.store.get(2).unwrap().unwrap();
    let first = app.store.get(1).unwrap().unwrap();
    let later: std::collections::BTreeSet<u32> = second.taken_ids();
    let earlier = ids(&first.cemetery_assignments)
        .into_iter()
        .chain(ids(&first.funeral_assignments));
    for id in earlier {
        assert!(!later.contains(&id), "member {id} is on duty twice");
    }
}

#[test]
fn test_carry_over_drops_members_who_left_the_roster() {
    let app = TestApp::new().with_members(40);
    bereave(&app, 1);
    bereave(&app, 2);
    plan_for_dependent(&app, 1);
    api::remove_from_funeral(&app.ctx, &admin(), "1", &req(json!({"memberId": 3}))).unwrap();
    api::update_member(&app.ctx, &admin(), "3", &req(json!({"status": "suspended"}))).unwrap();

    assert!(api::preview_duties(&app.ctx).unwrap().carry_over.is_empty());

    let second = plan_for_dependent(&app, 2);
    assert!(second.carry_over.is_empty());
    assert!(!ids(&second.cemetery_assignments).contains(&3));
    assert!(app.store.rotation_state().unwrap().pending_carry_over.is_empty());
}

#[test]
fn test_remove_unassigned_member() {
    let app = TestApp::new().with_members(40);
    bereave(&app, 1);
    plan_for_dependent(&app, 1);
    let err = api::remove_from_funeral(&app.ctx, &admin(), "1", &req(json!({"memberId": 35})))
        .unwrap_err();
    assert_eq!(err.status_code(), 400);
    let missing = api::remove_from_funeral(&app.ctx, &admin(), "9", &req(json!({"memberId": 1})));
    assert_eq!(missing.unwrap_err().status_code(), 404);
}

// =============================================================================
// ABSENCES AND FINALIZING
// =============================================================================

#[test]
fn test_absences_fines_and_finalize() {
    let app = TestApp::new().with_members(40);
    bereave(&app, 1);
    plan_for_dependent(&app, 1);

    api::record_funeral_absences(
        &app.ctx,
        &admin(),
        "1",
        &req(json!({"duty": "cemetery", "absent": [2]})),
    )
    .unwrap();
    let event = api::record_funeral_absences(
        &app.ctx,
        &admin(),
        "1",
        &req(json!({"duty": "funeral", "absent": [20, 21]})),
    )
    .unwrap();
    assert_eq!(event.cemetery_absent, vec![2]);
    assert_eq!(event.funeral_absent, vec![20, 21]);

    // Default schedule: 200 per cemetery absence, 100 per parade absence
    assert_eq!(api::member_fines(&app.ctx, "2").unwrap().total, Money::from_cents(20_000));
    assert_eq!(api::member_fines(&app.ctx, "20").unwrap().total, Money::from_cents(10_000));

    let event = api::finalize_funeral(&app.ctx, &admin(), "1").unwrap();
    assert!(event.finalized);

    let again = api::finalize_funeral(&app.ctx, &admin(), "1").unwrap_err();
    assert_eq!(again.status_code(), 409);
    let late = api::record_funeral_absences(
        &app.ctx,
        &admin(),
        "1",
        &req(json!({"duty": "cemetery", "absent": []})),
    );
    assert_eq!(late.unwrap_err().status_code(), 409);
    let removal = api::remove_from_funeral(&app.ctx, &admin(), "1", &req(json!({"memberId": 4})));
    assert_eq!(removal.unwrap_err().status_code(), 409);
}

#[test]
fn test_absences_never_undo_finalize() {
    for _ in 0..5 {
        let app = TestApp::new().with_members(40);
        bereave(&app, 1);
        plan_for_dependent(&app, 1);

        std::thread::scope(|scope| {
            let ctx = &app.ctx;
            scope.spawn(move || {
                // Refused with 409 once the register is closed
                let _ = api::record_funeral_absences(
                    ctx,
                    &admin(),
                    "1",
                    &req(json!({"duty": "cemetery", "absent": [2]})),
                );
            });
            scope.spawn(move || api::finalize_funeral(ctx, &admin(), "1").unwrap());
        });

        assert!(app.store.get(1).unwrap().unwrap().finalized);
    }
}

#[test]
fn test_absence_must_name_assigned_members() {
    let app = TestApp::new().with_members(40);
    bereave(&app, 1);
    plan_for_dependent(&app, 1);

    let stray = api::record_funeral_absences(
        &app.ctx,
        &admin(),
        "1",
        &req(json!({"duty": "cemetery", "absent": [20]})),
    )
    .unwrap_err();
    assert_eq!(stray.status_code(), 400);
    assert_eq!(stray.fields[0].field, "absent");

    let bad_duty = api::record_funeral_absences(
        &app.ctx,
        &admin(),
        "1",
        &req(json!({"duty": "catering", "absent": []})),
    );
    assert_eq!(bad_duty.unwrap_err().status_code(), 400);
}
