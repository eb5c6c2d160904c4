//! Tests for request routing, authentication and authorization

use serde_json::Value;
use tiny_http::Method;

use idir::core::models::Role;
use idir::core::ports::OfficerRepository;
use idir::server::{Reply, dispatch};

use super::common::{SECRET, TestApp};

fn call(app: &TestApp, method: Method, url: &str, auth: Option<&str>, body: &str) -> Reply {
    dispatch(&app.ctx, &method, url, auth, body)
}

fn json(reply: &Reply) -> Value {
    serde_json::from_str(&reply.body).expect("reply body should be JSON")
}

// =============================================================================
// PUBLIC ROUTES
// =============================================================================

#[test]
fn test_health_needs_no_token() {
    let app = TestApp::new();
    let reply = call(&app, Method::Get, "/api/health", None, "");
    assert_eq!(reply.status, 200);
    let body = json(&reply);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
}

#[test]
fn test_unknown_routes_are_404() {
    let app = TestApp::new();
    assert_eq!(call(&app, Method::Get, "/api/v1/nope", None, "").status, 404);
    assert_eq!(call(&app, Method::Get, "/not-api/members", None, "").status, 404);
    assert_eq!(call(&app, Method::Get, "/apix/members", None, "").status, 404);

    let reply = call(&app, Method::Delete, "/api/members", None, "");
    assert_eq!(reply.status, 404);
    assert_eq!(json(&reply)["error"]["code"], "NOT_FOUND");
}

// =============================================================================
// AUTHENTICATION
// =============================================================================

#[test]
fn test_missing_or_bad_token_is_401() {
    let app = TestApp::new();
    for auth in [None, Some("Basic dXNlcjpwYXNz"), Some("Bearer not-a-token")] {
        let reply = call(&app, Method::Get, "/api/members", auth, "");
        assert_eq!(reply.status, 401, "auth {auth:?}");
        assert_eq!(json(&reply)["error"]["code"], "UNAUTHORIZED");
    }
}

#[test]
fn test_token_from_another_secret_is_401() {
    let app = TestApp::new();
    app.officer("abebe", &[Role::Secretary]);
    let other = idir::auth::TokenSigner::new("other-secret", chrono::Duration::hours(1)).unwrap();
    let officer = app.store.get("abebe").unwrap().unwrap();
    let forged = format!("Bearer {}", other.issue(&officer, chrono::Utc::now()));
    assert_ne!(SECRET, "other-secret");
    assert_eq!(call(&app, Method::Get, "/api/members", Some(&forged), "").status, 401);
}

#[test]
fn test_deactivated_officer_is_401() {
    let app = TestApp::new();
    let token = app.officer("abebe", &[Role::Secretary]);
    assert_eq!(call(&app, Method::Get, "/api/members", Some(&token), "").status, 200);

    let mut officer = app.store.get("abebe").unwrap().unwrap();
    officer.active = false;
    app.store.update(&officer).unwrap();
    assert_eq!(call(&app, Method::Get, "/api/members", Some(&token), "").status, 401);
}

// =============================================================================
// AUTHORIZATION
// =============================================================================

#[test]
fn test_role_checks() {
    let app = TestApp::new().with_members(3);
    let auditor = app.officer("auditor", &[Role::Auditor]);
    let secretary = app.officer("secretary", &[Role::Secretary]);
    let root = app.officer("root", &[Role::SuperAdmin]);
    let member = r#"{"name":"New Member","area":"North"}"#;

    // Any officer reads the directory
    assert_eq!(call(&app, Method::Get, "/api/members", Some(&auditor), "").status, 200);

    // Only secretaries register members
    let denied = call(&app, Method::Post, "/api/members", Some(&auditor), member);
    assert_eq!(denied.status, 403);
    assert_eq!(json(&denied)["error"]["code"], "FORBIDDEN");
    assert_eq!(call(&app, Method::Post, "/api/members", Some(&secretary), member).status, 200);

    // Super-admin passes everything
    assert_eq!(call(&app, Method::Post, "/api/members", Some(&root), member).status, 200);
    assert_eq!(call(&app, Method::Get, "/api/officers", Some(&root), "").status, 200);
    assert_eq!(call(&app, Method::Get, "/api/officers", Some(&secretary), "").status, 403);

    // Loan ledger is closed to secretaries; readable by auditors
    assert_eq!(call(&app, Method::Get, "/api/loans", Some(&secretary), "").status, 403);
    assert_eq!(call(&app, Method::Get, "/api/loans", Some(&auditor), "").status, 200);
}

#[test]
fn test_auth_is_checked_before_the_body() {
    let app = TestApp::new();
    let auditor = app.officer("auditor", &[Role::Auditor]);
    let secretary = app.officer("secretary", &[Role::Secretary]);

    assert_eq!(call(&app, Method::Post, "/api/members", None, "{oops").status, 401);
    assert_eq!(call(&app, Method::Post, "/api/members", Some(&auditor), "{oops").status, 403);

    let reply = call(&app, Method::Post, "/api/members", Some(&secretary), "{oops");
    assert_eq!(reply.status, 400);
    assert!(json(&reply)["error"]["message"].as_str().unwrap().starts_with("Invalid JSON"));
}

// =============================================================================
// ROUTES END TO END
// =============================================================================

#[test]
fn test_validation_errors_carry_fields() {
    let app = TestApp::new();
    let secretary = app.officer("secretary", &[Role::Secretary]);
    let reply = call(&app, Method::Post, "/api/members", Some(&secretary), r#"{"name":"","area":""}"#);
    assert_eq!(reply.status, 400);
    let fields = json(&reply)["error"]["fields"].as_array().unwrap().len();
    assert_eq!(fields, 2);
}

#[test]
fn test_member_query_filters() {
    let app = TestApp::new().with_members(2);
    let token = app.officer("auditor", &[Role::Auditor]);

    let reply = call(&app, Method::Get, "/api/v1/members?area=North", Some(&token), "");
    assert_eq!(json(&reply)["data"]["members"].as_array().unwrap().len(), 2);

    let reply = call(&app, Method::Get, "/api/v1/members?area=Old%20Town", Some(&token), "");
    assert!(json(&reply)["data"]["members"].as_array().unwrap().is_empty());

    let reply = call(&app, Method::Get, "/api/members?status=retired", Some(&token), "");
    assert_eq!(reply.status, 400);
}

#[test]
fn test_loan_payment_over_http() {
    let app = TestApp::new().with_members(3);
    let lt = app.officer("lt", &[Role::LoanTreasurer]);
    let loan = r#"{"loanNumber":"L-1","memberId":1,"guarantors":[2,3],"principal":100}"#;
    assert_eq!(call(&app, Method::Post, "/api/loans", Some(&lt), loan).status, 200);

    let pay = r#"{"principal":60}"#;
    let reply = call(&app, Method::Post, "/api/loans/L-1/payments", Some(&lt), pay);
    assert_eq!(reply.status, 200);
    assert_eq!(json(&reply)["data"]["remainingBalance"], 40.0);

    let reply = call(&app, Method::Post, "/api/loans/L-1/payments", Some(&lt), pay);
    assert_eq!(reply.status, 409);
    assert_eq!(json(&reply)["error"]["code"], "CONFLICT");
}

#[test]
fn test_attendance_put_is_idempotent() {
    let app = TestApp::new().with_members(3);
    let secretary = app.officer("secretary", &[Role::Secretary]);
    let body = r#"{"absentArray":[1]}"#;
    let url = "/api/attendance/meeting/2024-06-02";

    let first = call(&app, Method::Put, url, Some(&secretary), body);
    assert_eq!(json(&first)["data"]["created"], true);
    let second = call(&app, Method::Put, url, Some(&secretary), body);
    assert_eq!(json(&second)["data"]["created"], false);

    let reply = call(&app, Method::Get, "/api/attendance/meeting", Some(&secretary), "");
    assert_eq!(json(&reply)["data"]["records"].as_array().unwrap().len(), 1);
}
