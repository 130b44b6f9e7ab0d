#![allow(dead_code)]
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, Response},
    Router,
};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use ess_backend::{
    config::{Config, FrappeConfig},
    models::{
        ApplicationKind, ApprovalStatus, AttendanceRecord, AttendanceStatus, CheckDirection,
        CheckEvent, LeaveTypeApplication,
    },
    repositories::{AttendanceSource, FrappeAuth, SourceError, SourceProvider},
    router,
    services::reconciler::MonthRecords,
    state::AppState,
    types::EmployeeId,
};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const EMPLOYEE: &str = "HR-EMP-00042";
pub const AUTH_HEADER: &str = "token api-key:api-secret";

pub fn employee() -> EmployeeId {
    EmployeeId::parse(EMPLOYEE).expect("employee id")
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn at(date: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
    date.and_hms_opt(hour, minute, 0).expect("valid time")
}

pub fn check(date: NaiveDate, hour: u32, direction: CheckDirection) -> CheckEvent {
    CheckEvent::new(employee(), at(date, hour, 0), direction)
}

pub fn record(date: NaiveDate, status: AttendanceStatus) -> AttendanceRecord {
    AttendanceRecord::new(employee(), date, status)
}

pub fn approved(kind: ApplicationKind, start: NaiveDate, end: NaiveDate) -> LeaveTypeApplication {
    LeaveTypeApplication {
        employee_id: employee(),
        kind,
        start_date: start,
        end_date: end,
        approval_status: ApprovalStatus::Approved,
    }
}

pub fn test_config() -> Config {
    Config {
        frappe: FrappeConfig::default(),
        time_zone: chrono_tz::UTC,
        bind_addr: "127.0.0.1:0".parse().expect("bind addr"),
        edit_window_days: 7,
    }
}

/// In-memory record source; writes are appended to the check events it serves.
#[derive(Default)]
pub struct StubSource {
    records: Mutex<MonthRecords>,
    created: Mutex<Vec<CheckEvent>>,
    fail_status: Mutex<Option<u16>>,
    write_fail_status: Mutex<Option<u16>>,
    seen_auth: Mutex<Vec<String>>,
}

impl StubSource {
    pub fn new(records: MonthRecords) -> Arc<Self> {
        Arc::new(Self {
            records: Mutex::new(records),
            ..Self::default()
        })
    }

    /// Makes every later call fail with this upstream status.
    pub fn fail_with(&self, status: u16) {
        *self.fail_status.lock().expect("lock") = Some(status);
    }

    /// Makes writes fail with this upstream status while reads keep working.
    pub fn fail_writes_with(&self, status: u16) {
        *self.write_fail_status.lock().expect("lock") = Some(status);
    }

    pub fn created(&self) -> Vec<CheckEvent> {
        self.created.lock().expect("lock").clone()
    }

    pub fn seen_auth(&self) -> Vec<String> {
        self.seen_auth.lock().expect("lock").clone()
    }

    fn check_failure(&self, operation: &'static str) -> Result<(), SourceError> {
        match *self.fail_status.lock().expect("lock") {
            Some(status) => Err(SourceError::Status {
                operation,
                status,
                message: "stubbed failure".to_string(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl AttendanceSource for StubSource {
    async fn list_check_events(
        &self,
        employee_id: &EmployeeId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<CheckEvent>, SourceError> {
        self.check_failure("list check events")?;
        let records = self.records.lock().expect("lock");
        Ok(records
            .check_events
            .iter()
            .filter(|event| &event.employee_id == employee_id)
            .filter(|event| (from..=to).contains(&event.local_date()))
            .cloned()
            .collect())
    }

    async fn list_attendance_records(
        &self,
        employee_id: &EmployeeId,
        from: NaiveDate,
        to: NaiveDate,
        _approved_only: bool,
    ) -> Result<Vec<AttendanceRecord>, SourceError> {
        self.check_failure("list attendance records")?;
        let records = self.records.lock().expect("lock");
        Ok(records
            .attendance_records
            .iter()
            .filter(|record| &record.employee_id == employee_id)
            .filter(|record| (from..=to).contains(&record.date))
            .cloned()
            .collect())
    }

    async fn list_approved_applications(
        &self,
        employee_id: &EmployeeId,
        kind: ApplicationKind,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<LeaveTypeApplication>, SourceError> {
        self.check_failure("list approved applications")?;
        let records = self.records.lock().expect("lock");
        let applications = match kind {
            ApplicationKind::Wfh => &records.wfh_applications,
            ApplicationKind::Od => &records.od_applications,
        };
        Ok(applications
            .iter()
            .filter(|application| &application.employee_id == employee_id)
            .filter(|application| application.start_date <= to && application.end_date >= from)
            .cloned()
            .collect())
    }

    async fn create_check_event(
        &self,
        employee_id: &EmployeeId,
        timestamp: NaiveDateTime,
        direction: CheckDirection,
    ) -> Result<CheckEvent, SourceError> {
        self.check_failure("create check event")?;
        if let Some(status) = *self.write_fail_status.lock().expect("lock") {
            return Err(SourceError::Status {
                operation: "create check event",
                status,
                message: "stubbed write failure".to_string(),
            });
        }
        let event = CheckEvent::new(employee_id.clone(), timestamp, direction);
        self.records
            .lock()
            .expect("lock")
            .check_events
            .push(event.clone());
        self.created.lock().expect("lock").push(event.clone());
        Ok(event)
    }
}

pub struct StubProvider(pub Arc<StubSource>);

impl SourceProvider for StubProvider {
    fn source_for(&self, auth: &FrappeAuth) -> Arc<dyn AttendanceSource> {
        self.0
            .seen_auth
            .lock()
            .expect("lock")
            .push(auth.as_str().to_string());
        self.0.clone()
    }
}

pub fn test_app(source: Arc<StubSource>) -> Router {
    router(AppState::new(test_config(), Arc::new(StubProvider(source))))
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("Authorization", AUTH_HEADER)
        .body(Body::empty())
        .expect("request")
}

pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Authorization", AUTH_HEADER)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("response")
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json")
}
