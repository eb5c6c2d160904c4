//! Tests for the JSON document store

use std::sync::Arc;
use std::thread;

use chrono::NaiveDate;
use tempfile::TempDir;

use idir::adapters::JsonStore;
use idir::core::models::{
    AttendanceKind, AttendanceRecord, Loan, LoanStatus, Money, Payment, Setting,
};
use idir::core::ports::{AttendanceRepository, LoanRepository, SettingsRepository, StoreError};

fn store() -> (TempDir, Arc<JsonStore>) {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(JsonStore::open(dir.path()).unwrap());
    (dir, store)
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
}

fn loan(number: &str, cents: u64) -> Loan {
    Loan {
        loan_number: number.to_string(),
        member_id: 1,
        guarantors: [2, 3],
        principal: Money::from_cents(cents),
        issued_on: day(1),
        remaining_balance: Money::from_cents(cents),
        payments: Vec::new(),
        status: LoanStatus::Active,
        created_by: "test".to_string(),
    }
}

fn payment(cents: u64) -> Payment {
    Payment {
        principal: Money::from_cents(cents),
        interest: Money::ZERO,
        penalty: Money::ZERO,
        paid_on: day(2),
        recorded_by: "test".to_string(),
    }
}

// =============================================================================
// LOANS
// =============================================================================

#[test]
fn test_concurrent_full_payments_only_one_wins() {
    let (_dir, store) = store();
    store.create(&loan("L-9", 10_000)).unwrap();

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || store.apply_payment("L-9", payment(10_000)))
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results.iter().any(|r| matches!(
        r,
        Err(StoreError::InsufficientBalance { .. } | StoreError::LoanSettled(_))
    )));

    let saved = LoanRepository::get(store.as_ref(), "L-9").unwrap().unwrap();
    assert!(saved.remaining_balance.is_zero());
    assert_eq!(saved.payments.len(), 1);
}

#[test]
fn test_many_small_payments_never_go_negative() {
    let (_dir, store) = store();
    store.create(&loan("L-10", 1_000)).unwrap();

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || store.apply_payment("L-10", payment(100)).is_ok())
        })
        .collect();
    let accepted = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();

    assert_eq!(accepted, 10);
    let saved = LoanRepository::get(store.as_ref(), "L-10").unwrap().unwrap();
    assert!(saved.remaining_balance.is_zero());
    assert_eq!(saved.status, LoanStatus::Settled);
}

#[test]
fn test_duplicate_loan_is_refused() {
    let (_dir, store) = store();
    store.create(&loan("L-1", 100)).unwrap();
    assert!(matches!(store.create(&loan("L-1", 200)), Err(StoreError::Duplicate { .. })));
    let saved = LoanRepository::get(store.as_ref(), "L-1").unwrap().unwrap();
    assert_eq!(saved.principal, Money::from_cents(100));
}

#[test]
fn test_payment_on_missing_loan() {
    let (_dir, store) = store();
    assert!(matches!(
        store.apply_payment("missing", payment(1)),
        Err(StoreError::NotFound { .. })
    ));
}

// =============================================================================
// ATTENDANCE
// =============================================================================

#[test]
fn test_attendance_upsert_replaces_one_record_per_date() {
    let (_dir, store) = store();
    let mut record = AttendanceRecord {
        kind: AttendanceKind::Meeting,
        date: day(2),
        eligible: vec![1, 2, 3],
        absent_array: vec![1],
        recorded_by: "test".to_string(),
        updated_at: String::new(),
    };
    assert!(AttendanceRepository::upsert(store.as_ref(), &record).unwrap());
    record.absent_array = vec![2, 3];
    assert!(!AttendanceRepository::upsert(store.as_ref(), &record).unwrap());

    let all = AttendanceRepository::list(store.as_ref(), AttendanceKind::Meeting).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].absent_array, vec![2, 3]);
    assert!(AttendanceRepository::list(store.as_ref(), AttendanceKind::CommonWork)
        .unwrap()
        .is_empty());
}

#[test]
fn test_concurrent_upserts_keep_one_record() {
    let (_dir, store) = store();
    let handles: Vec<_> = (1..=8u32)
        .map(|absent| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let record = AttendanceRecord {
                    kind: AttendanceKind::CommonWork,
                    date: day(9),
                    eligible: (1..=8).collect(),
                    absent_array: vec![absent],
                    recorded_by: "test".to_string(),
                    updated_at: String::new(),
                };
                AttendanceRepository::upsert(store.as_ref(), &record).unwrap()
            })
        })
        .collect();
    let created = handles.into_iter().map(|h| h.join().unwrap()).filter(|c| *c).count();

    assert_eq!(created, 1);
    let all = AttendanceRepository::list(store.as_ref(), AttendanceKind::CommonWork).unwrap();
    assert_eq!(all.len(), 1);
}

// =============================================================================
// SETTINGS
// =============================================================================

#[test]
fn test_insert_if_absent_keeps_existing_value() {
    let (_dir, store) = store();
    let first = Setting::new("meeting-absence-fine", 50.0, None, "system");
    let second = Setting::new("meeting-absence-fine", 80.0, None, "system");
    assert!(store.insert_if_absent(&first).unwrap());
    assert!(!store.insert_if_absent(&second).unwrap());
    let saved = SettingsRepository::get(store.as_ref(), "meeting-absence-fine")
        .unwrap()
        .unwrap();
    assert!((saved.value - 50.0).abs() < f64::EPSILON);
}

#[test]
fn test_data_survives_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let store = JsonStore::open(dir.path()).unwrap();
        store.create(&loan("L-7", 500)).unwrap();
    }
    let store = JsonStore::open(dir.path()).unwrap();
    let saved = LoanRepository::get(&store, "L-7").unwrap().unwrap();
    assert_eq!(saved.remaining_balance, Money::from_cents(500));
}
