//! `tiny_http` server adapter
//!
//! Handles routing, bearer-token checks, body parsing and response
//! conversion. [`dispatch`] is independent of sockets so routes can be
//! exercised directly; [`serve`] runs it on a pool of worker threads that
//! share one listening server.

use std::io::Read as _;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use serde::{Serialize, de::DeserializeOwned};
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};

use crate::api::{
    self, AddDependentRequest, ApiError, ApiErrorData, ApiResponse, AppContext, AttendanceRequest,
    CashEntryRequest, CreateFuneralRequest, CreateLoanRequest, CreateMemberRequest,
    CreateOfficerRequest, FuneralAbsenceRequest, MemberFilter, PaymentRequest, RecordDeathRequest,
    RemoveFromDutyRequest, UpdateMemberRequest, UpdateOfficerRequest, UpdateSettingRequest,
};
use crate::auth::Caller;
use crate::core::models::Role;
use crate::core::services::authorize;

/// Largest request body accepted, in bytes
const MAX_BODY: u64 = 1024 * 1024;

// =============================================================================
// ACCESS RULES
// =============================================================================

/// Any authenticated, active officer
const ANY_OFFICER: &[Role] = &[];
const SECRETARIES: &[Role] = &[Role::Secretary, Role::ViceSecretary];
const LOAN_READERS: &[Role] = &[
    Role::LoanTreasurer,
    Role::Treasurer,
    Role::Auditor,
    Role::Chairperson,
];
const LOAN_WRITERS: &[Role] = &[Role::LoanTreasurer];
const SETTINGS_WRITERS: &[Role] = &[Role::Treasurer, Role::Chairperson];
const ACCOUNT_READERS: &[Role] = &[Role::Treasurer, Role::Auditor, Role::Chairperson];
const ACCOUNT_WRITERS: &[Role] = &[Role::Treasurer];
const ADMINS: &[Role] = &[Role::SuperAdmin];

// =============================================================================
// REQUEST HANDLING
// =============================================================================

/// Status code and JSON body of a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// HTTP status code
    pub status: u16,
    /// JSON envelope
    pub body: String,
}

/// Route one API request and produce its reply.
///
/// Paths are accepted under `/api/v1` and `/api`. Protected routes check
/// the bearer token (401), then the caller's roles (403), then parse the
/// body (400) before the handler runs.
pub fn dispatch(
    ctx: &AppContext,
    method: &Method,
    url: &str,
    authorization: Option<&str>,
    body: &str,
) -> Reply {
    let (path, query) = url.split_once('?').unwrap_or((url, ""));
    let Some(api_path) = path
        .strip_prefix("/api/v1")
        .or_else(|| path.strip_prefix("/api"))
        .filter(|p| p.is_empty() || p.starts_with('/'))
    else {
        return not_found_reply(method, path);
    };
    let segments: Vec<&str> = api_path.split('/').filter(|s| !s.is_empty()).collect();

    let guard = |required: &'static [Role]| Guard {
        ctx,
        authorization,
        required,
    };

    match (method, segments.as_slice()) {
        (&Method::Get, ["health"]) => handle_result(Ok(api::health())),

        // Members
        (&Method::Get, ["members"]) => guard(ANY_OFFICER).run(|_| {
            let filter = MemberFilter {
                status: query_param(query, "status"),
                area: query_param(query, "area"),
            };
            api::list_members(ctx, &filter)
        }),
        (&Method::Post, ["members"]) => guard(SECRETARIES).run(|caller| {
            api::create_member(ctx, caller, &parse_body::<CreateMemberRequest>(body)?)
        }),
        (&Method::Get, ["members", id]) => guard(ANY_OFFICER).run(|_| api::get_member(ctx, id)),
        (&Method::Patch, ["members", id]) => guard(SECRETARIES).run(|caller| {
            api::update_member(ctx, caller, id, &parse_body::<UpdateMemberRequest>(body)?)
        }),
        (&Method::Post, ["members", id, "death"]) => guard(SECRETARIES).run(|caller| {
            api::record_member_death(ctx, caller, id, &parse_body::<RecordDeathRequest>(body)?)
        }),
        (&Method::Post, ["members", id, "dependents"]) => guard(SECRETARIES).run(|caller| {
            api::add_dependent(ctx, caller, id, &parse_body::<AddDependentRequest>(body)?)
        }),
        (&Method::Post, ["members", id, "dependents", index, "death"]) => {
            guard(SECRETARIES).run(|caller| {
                let req = parse_body::<RecordDeathRequest>(body)?;
                api::record_dependent_death(ctx, caller, id, index, &req)
            })
        },
        (&Method::Get, ["members", id, "fines"]) => {
            guard(ANY_OFFICER).run(|_| api::member_fines(ctx, id))
        },
        (&Method::Get, ["members", id, "loans"]) => {
            guard(LOAN_READERS).run(|_| api::member_loans(ctx, id))
        },

        // Loans
        (&Method::Get, ["loans"]) => guard(LOAN_READERS).run(|_| api::list_loans(ctx)),
        (&Method::Post, ["loans"]) => guard(LOAN_WRITERS).run(|caller| {
            api::create_loan(ctx, caller, &parse_body::<CreateLoanRequest>(body)?)
        }),
        (&Method::Get, ["loans", number]) => {
            guard(LOAN_READERS).run(|_| api::get_loan(ctx, number))
        },
        (&Method::Post, ["loans", number, "payments"]) => guard(LOAN_WRITERS).run(|caller| {
            api::record_payment(ctx, caller, number, &parse_body::<PaymentRequest>(body)?)
        }),

        // Attendance
        (&Method::Get, ["attendance", kind]) => {
            guard(ANY_OFFICER).run(|_| api::list_attendance(ctx, kind))
        },
        (&Method::Get, ["attendance", kind, date]) => {
            guard(ANY_OFFICER).run(|_| api::get_attendance(ctx, kind, date))
        },
        (&Method::Put, ["attendance", kind, date]) => guard(SECRETARIES).run(|caller| {
            let req = parse_body::<AttendanceRequest>(body)?;
            api::record_attendance(ctx, caller, kind, date, &req)
        }),

        // Funerals
        (&Method::Get, ["funerals"]) => guard(ANY_OFFICER).run(|_| api::list_funerals(ctx)),
        (&Method::Get, ["funerals", "preview"]) => {
            guard(ANY_OFFICER).run(|_| api::preview_duties(ctx))
        },
        (&Method::Post, ["funerals"]) => guard(SECRETARIES).run(|caller| {
            api::create_funeral(ctx, caller, &parse_body::<CreateFuneralRequest>(body)?)
        }),
        (&Method::Get, ["funerals", id]) => {
            guard(ANY_OFFICER).run(|_| api::get_funeral(ctx, id))
        },
        (&Method::Post, ["funerals", id, "remove"]) => guard(SECRETARIES).run(|caller| {
            let req = parse_body::<RemoveFromDutyRequest>(body)?;
            api::remove_from_funeral(ctx, caller, id, &req)
        }),
        (&Method::Post, ["funerals", id, "absences"]) => guard(SECRETARIES).run(|caller| {
            let req = parse_body::<FuneralAbsenceRequest>(body)?;
            api::record_funeral_absences(ctx, caller, id, &req)
        }),
        (&Method::Post, ["funerals", id, "finalize"]) => {
            guard(SECRETARIES).run(|caller| api::finalize_funeral(ctx, caller, id))
        },

        // Settings
        (&Method::Get, ["settings"]) => guard(ANY_OFFICER).run(|_| api::list_settings(ctx)),
        (&Method::Get, ["settings", key]) => {
            guard(ANY_OFFICER).run(|_| api::get_setting(ctx, key))
        },
        (&Method::Put, ["settings", key]) => guard(SETTINGS_WRITERS).run(|caller| {
            api::update_setting(ctx, caller, key, &parse_body::<UpdateSettingRequest>(body)?)
        }),

        // Officers
        (&Method::Get, ["officers"]) => guard(ADMINS).run(|_| api::list_officers(ctx)),
        (&Method::Post, ["officers"]) => guard(ADMINS).run(|caller| {
            api::create_officer(ctx, caller, &parse_body::<CreateOfficerRequest>(body)?)
        }),
        (&Method::Get, ["officers", username]) => {
            guard(ADMINS).run(|_| api::get_officer(ctx, username))
        },
        (&Method::Patch, ["officers", username]) => guard(ADMINS).run(|caller| {
            let req = parse_body::<UpdateOfficerRequest>(body)?;
            api::update_officer(ctx, caller, username, &req)
        }),
        (&Method::Delete, ["officers", username]) => {
            guard(ADMINS).run(|caller| api::delete_officer(ctx, caller, username))
        },

        // Accounts
        (&Method::Get, ["accounts"]) => {
            guard(ACCOUNT_READERS).run(|_| api::list_cash_entries(ctx))
        },
        (&Method::Get, ["accounts", "summary"]) => {
            guard(ACCOUNT_READERS).run(|_| api::cash_summary(ctx))
        },
        (&Method::Post, ["accounts"]) => guard(ACCOUNT_WRITERS).run(|caller| {
            api::add_cash_entry(ctx, caller, &parse_body::<CashEntryRequest>(body)?)
        }),

        // 404 for unknown API routes
        _ => not_found_reply(method, path),
    }
}

/// Authentication and authorization in front of one handler
struct Guard<'a> {
    ctx: &'a AppContext,
    authorization: Option<&'a str>,
    required: &'static [Role],
}

impl Guard<'_> {
    fn check(&self) -> Result<Caller, ApiError> {
        let caller = self.ctx.authenticate(self.authorization)?;
        if authorize(&caller.roles, self.required).is_allowed() {
            Ok(caller)
        } else {
            let roles: Vec<&str> = self.required.iter().map(|r| r.as_str()).collect();
            log::warn!("Denied {} (requires {})", caller.username, roles.join(", "));
            Err(ApiError::forbidden(format!("Requires one of: {}", roles.join(", "))))
        }
    }

    fn run<T: Serialize>(self, handler: impl FnOnce(&Caller) -> Result<T, ApiError>) -> Reply {
        handle_result(self.check().and_then(|caller| handler(&caller)))
    }
}

// =============================================================================
// BODY AND QUERY PARSING
// =============================================================================

/// Parse a JSON request body
fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::bad_request(format!("Invalid JSON: {e}")))
}

/// Value of one query-string parameter (`+` and `%XX` decoded)
fn query_param(query: &str, name: &str) -> Option<String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| percent_decode(value))
        .filter(|value| !value.is_empty())
}

fn percent_decode(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' => {
                let escaped = bytes
                    .get(i + 1..i + 3)
                    .and_then(|hex| std::str::from_utf8(hex).ok())
                    .and_then(|hex| u8::from_str_radix(hex, 16).ok());
                if let Some(byte) = escaped {
                    out.push(byte);
                    i += 2;
                } else {
                    out.push(b'%');
                }
            },
            byte => out.push(byte),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

// =============================================================================
// RESPONSE CONVERSION
// =============================================================================

/// Convert a handler result to a reply
fn handle_result<T: Serialize>(result: Result<T, ApiError>) -> Reply {
    match result {
        Ok(data) => json_reply(&ApiResponse::success(data), 200),
        Err(e) => error_reply(&e),
    }
}

/// Create an error reply with the matching status code
fn error_reply(error: &ApiError) -> Reply {
    json_reply(&ApiResponse::error(ApiErrorData::from(error)), error.status_code())
}

/// Create a 404 reply for an unknown route
fn not_found_reply(method: &Method, path: &str) -> Reply {
    error_reply(&ApiError::not_found(format!(
        "API endpoint not found: {method} {path}"
    )))
}

/// Serialize an envelope with a status code
fn json_reply<T: Serialize>(data: &T, status: u16) -> Reply {
    let body = serde_json::to_string(data).unwrap_or_else(|_| r#"{"success":false}"#.to_string());
    Reply { status, body }
}

// =============================================================================
// SERVER LOOP
// =============================================================================

/// Bind `addr` and serve requests on `workers` threads until the process
/// exits
pub fn serve(ctx: Arc<AppContext>, addr: &str, workers: usize) -> anyhow::Result<()> {
    let server =
        Arc::new(Server::http(addr).map_err(|e| anyhow::anyhow!("cannot bind {addr}: {e}"))?);
    log::info!("Listening on http://{addr} with {workers} workers");

    let mut handles = Vec::with_capacity(workers);
    for i in 0..workers {
        let server = Arc::clone(&server);
        let ctx = Arc::clone(&ctx);
        handles.push(
            thread::Builder::new()
                .name(format!("idir-worker-{i}"))
                .spawn(move || worker_loop(&server, &ctx))?,
        );
    }
    for handle in handles {
        if handle.join().is_err() {
            log::error!("A worker thread panicked");
        }
    }
    Ok(())
}

fn worker_loop(server: &Server, ctx: &AppContext) {
    loop {
        match server.recv() {
            Ok(request) => handle_request(ctx, request),
            Err(e) => {
                log::error!("Failed to receive request: {e}");
                break;
            },
        }
    }
}

fn handle_request(ctx: &AppContext, mut request: Request) {
    let started = Instant::now();
    let method = request.method().clone();
    let url = request.url().to_string();
    let authorization = request
        .headers()
        .iter()
        .find(|h| h.field.equiv("Authorization"))
        .map(|h| h.value.as_str().to_string());

    let reply = match read_body(request.as_reader(), MAX_BODY) {
        Ok(body) => dispatch(ctx, &method, &url, authorization.as_deref(), &body),
        Err(e) => error_reply(&e),
    };

    log::info!(
        "{method} {url} -> {} ({} ms)",
        reply.status,
        started.elapsed().as_millis()
    );

    let mut response =
        Response::from_data(reply.body.into_bytes()).with_status_code(StatusCode(reply.status));
    if let Ok(header) = Header::from_bytes("Content-Type", "application/json") {
        response.add_header(header);
    }
    if let Err(e) = request.respond(response) {
        log::warn!("Failed to send response for {method} {url}: {e}");
    }
}

/// Read at most `limit` bytes of body; anything longer is refused
fn read_body(reader: impl std::io::Read, limit: u64) -> Result<String, ApiError> {
    let mut body = String::new();
    reader
        .take(limit + 1)
        .read_to_string(&mut body)
        .map_err(|e| ApiError::bad_request(format!("Failed to read request body: {e}")))?;
    if body.len() as u64 > limit {
        return Err(ApiError::bad_request(format!(
            "Request body exceeds {limit} bytes"
        )));
    }
    Ok(body)
}
