#![allow(dead_code)] // OpenAPI doc stubs are only referenced by utoipa macros.

use crate::{
    error::ErrorResponse,
    handlers::{attendance::CalendarQuery, health::HealthResponse},
    models::{
        Badge, CalendarCell, CheckDirection, CheckEntryDraft, CheckEntryResponse, CheckEvent,
        DayCell, DayStatus, MonthSummary, MonthView, ResolvedStatus, Tint,
    },
    types::EmployeeId,
};
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};

#[derive(OpenApi)]
#[openapi(
    paths(health_doc, calendar_doc, submit_check_entry_doc),
    components(
        schemas(
            EmployeeId,
            CheckDirection,
            CheckEvent,
            CheckEntryDraft,
            CheckEntryResponse,
            ResolvedStatus,
            DayStatus,
            Badge,
            Tint,
            DayCell,
            CalendarCell,
            MonthSummary,
            MonthView,
            HealthResponse,
            ErrorResponse
        )
    ),
    modifiers(&SecuritySchemes),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Attendance", description = "Monthly calendar and retroactive clock entries")
    ),
    security(("FrappeAuth" = []))
)]
pub struct ApiDoc;

struct SecuritySchemes;

impl Modify for SecuritySchemes {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();
        // Frappe API keys travel as `Authorization: token <key>:<secret>`.
        components.add_security_scheme(
            "FrappeAuth",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("Authorization"))),
        );
    }
}

#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, body = HealthResponse)),
    tag = "Health",
    security(())
)]
fn health_doc() {}

#[utoipa::path(
    get,
    path = "/api/employees/{employee_id}/calendar",
    params(
        ("employee_id" = String, Path, description = "Employee document name"),
        CalendarQuery
    ),
    responses(
        (status = 200, description = "Reconciled month grid", body = MonthView),
        (status = 400, body = ErrorResponse),
        (status = 401, body = ErrorResponse),
        (status = 502, description = "Frappe request failed", body = ErrorResponse)
    ),
    tag = "Attendance"
)]
fn calendar_doc() {}

#[utoipa::path(
    post,
    path = "/api/employees/{employee_id}/checkins",
    params(("employee_id" = String, Path, description = "Employee document name")),
    request_body = CheckEntryDraft,
    responses(
        (status = 201, description = "Entry recorded; calendar is null if the reload failed", body = CheckEntryResponse),
        (status = 400, description = "Invalid time or date outside the edit window", body = ErrorResponse),
        (status = 409, description = "Day complete or direction not allowed", body = ErrorResponse),
        (status = 502, description = "Frappe request failed", body = ErrorResponse)
    ),
    tag = "Attendance"
)]
fn submit_check_entry_doc() {}
