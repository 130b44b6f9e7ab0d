//! `AttendanceSource` backed by the Frappe/ERPNext REST resource API.
//!
//! Lists go through `GET /api/resource/{doctype}` with JSON-encoded `fields`
//! and `filters` query parameters; writes through `POST /api/resource/{doctype}`.
//! Both wrap their payload in a `{"data": ...}` envelope.

use std::{fmt, sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use reqwest::{header::AUTHORIZATION, Client, Response};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};
use url::Url;

use crate::{
    config::FrappeConfig,
    models::{
        ApplicationKind, ApprovalStatus, AttendanceRecord, AttendanceStatus, CheckDirection,
        CheckEvent, LeaveTypeApplication,
    },
    repositories::attendance_source::{AttendanceSource, SourceError, SourceProvider},
    types::EmployeeId,
    utils::time::{format_frappe_datetime, parse_frappe_datetime},
};

const USER_AGENT: &str = "ess-backend/1.0";
const MAX_ERROR_BODY_CHARS: usize = 300;

/// The caller's `Authorization` header value, forwarded to Frappe as-is.
#[derive(Clone, PartialEq, Eq)]
pub struct FrappeAuth(String);

impl FrappeAuth {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for FrappeAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FrappeAuth(<redacted>)")
    }
}

#[derive(Debug)]
struct Doctypes {
    checkin: String,
    attendance: String,
    wfh: String,
    od: String,
}

impl Doctypes {
    fn for_application(&self, kind: ApplicationKind) -> &str {
        match kind {
            ApplicationKind::Wfh => &self.wfh,
            ApplicationKind::Od => &self.od,
        }
    }
}

/// Shared HTTP client and endpoint layout. Cheap to clone.
#[derive(Debug, Clone)]
pub struct FrappeClient {
    http: Client,
    base_url: Url,
    doctypes: Arc<Doctypes>,
}

impl FrappeClient {
    pub fn new(config: &FrappeConfig) -> Result<Self, SourceError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            SourceError::Config(format!("invalid base url '{}': {}", config.base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(SourceError::Config(format!(
                "base url '{}' cannot carry a path",
                config.base_url
            )));
        }

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SourceError::Config(format!("failed to initialize HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            doctypes: Arc::new(Doctypes {
                checkin: config.checkin_doctype.clone(),
                attendance: config.attendance_doctype.clone(),
                wfh: config.wfh_doctype.clone(),
                od: config.od_doctype.clone(),
            }),
        })
    }

    pub fn with_auth(&self, auth: FrappeAuth) -> FrappeSource {
        FrappeSource {
            client: self.clone(),
            auth,
        }
    }

    fn resource_url(&self, doctype: &str) -> Result<Url, SourceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SourceError::Config("base url cannot carry a path".into()))?
            .pop_if_empty()
            .extend(["api", "resource", doctype]);
        Ok(url)
    }
}

impl SourceProvider for FrappeClient {
    fn source_for(&self, auth: &FrappeAuth) -> Arc<dyn AttendanceSource> {
        Arc::new(self.with_auth(auth.clone()))
    }
}

/// A `FrappeClient` bound to one caller's credentials.
#[derive(Debug, Clone)]
pub struct FrappeSource {
    client: FrappeClient,
    auth: FrappeAuth,
}

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct CheckinRow {
    employee: String,
    time: String,
    log_type: String,
}

impl CheckinRow {
    fn into_event(self, operation: &'static str) -> Result<CheckEvent, SourceError> {
        let employee_id = parse_employee(operation, &self.employee)?;
        let timestamp = parse_frappe_datetime(&self.time)
            .map_err(|e| decode_error(operation, format!("invalid time '{}': {}", self.time, e)))?;
        let direction = self
            .log_type
            .parse::<CheckDirection>()
            .map_err(|e| decode_error(operation, e))?;
        Ok(CheckEvent::new(employee_id, timestamp, direction))
    }
}

#[derive(Debug, Deserialize)]
struct AttendanceRow {
    employee: String,
    attendance_date: NaiveDate,
    status: String,
}

impl AttendanceRow {
    fn into_record(self, operation: &'static str) -> Result<AttendanceRecord, SourceError> {
        let employee_id = parse_employee(operation, &self.employee)?;
        let status = self
            .status
            .parse::<AttendanceStatus>()
            .map_err(|e| decode_error(operation, e.to_string()))?;
        Ok(AttendanceRecord::new(employee_id, self.attendance_date, status))
    }
}

#[derive(Debug, Deserialize)]
struct ApplicationRow {
    employee: String,
    from_date: NaiveDate,
    to_date: NaiveDate,
    status: String,
}

impl ApplicationRow {
    fn into_application(
        self,
        operation: &'static str,
        kind: ApplicationKind,
    ) -> Result<LeaveTypeApplication, SourceError> {
        let employee_id = parse_employee(operation, &self.employee)?;
        let approval_status = self
            .status
            .parse::<ApprovalStatus>()
            .map_err(|e| decode_error(operation, e))?;
        Ok(LeaveTypeApplication {
            employee_id,
            kind,
            start_date: self.from_date,
            end_date: self.to_date,
            approval_status,
        })
    }
}

impl FrappeSource {
    async fn list<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        doctype: &str,
        fields: &[&str],
        filters: Value,
        order_by: &str,
    ) -> Result<Vec<T>, SourceError> {
        let mut url = self.client.resource_url(doctype)?;
        url.query_pairs_mut()
            .append_pair("fields", &json!(fields).to_string())
            .append_pair("filters", &filters.to_string())
            .append_pair("limit_page_length", "0")
            .append_pair("order_by", order_by);

        tracing::debug!(operation, doctype, "Listing Frappe documents");
        let response = self
            .client
            .http
            .get(url)
            .header(AUTHORIZATION, self.auth.as_str())
            .send()
            .await
            .map_err(|source| SourceError::Transport { operation, source })?;

        let envelope: DataEnvelope<Vec<T>> = read_json(operation, response).await?;
        Ok(envelope.data)
    }
}

#[async_trait]
impl AttendanceSource for FrappeSource {
    async fn list_check_events(
        &self,
        employee_id: &EmployeeId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<CheckEvent>, SourceError> {
        const OPERATION: &str = "list check events";
        let filters = json!([
            ["employee", "=", employee_id.as_str()],
            ["time", ">=", format!("{} 00:00:00", from.format("%Y-%m-%d"))],
            ["time", "<=", format!("{} 23:59:59.999999", to.format("%Y-%m-%d"))],
        ]);
        let rows: Vec<CheckinRow> = self
            .list(
                OPERATION,
                &self.client.doctypes.checkin,
                &["employee", "time", "log_type"],
                filters,
                "time asc",
            )
            .await?;
        rows.into_iter().map(|row| row.into_event(OPERATION)).collect()
    }

    async fn list_attendance_records(
        &self,
        employee_id: &EmployeeId,
        from: NaiveDate,
        to: NaiveDate,
        approved_only: bool,
    ) -> Result<Vec<AttendanceRecord>, SourceError> {
        const OPERATION: &str = "list attendance records";
        // docstatus: 0 draft, 1 submitted, 2 cancelled.
        let docstatus = if approved_only {
            json!(["docstatus", "=", 1])
        } else {
            json!(["docstatus", "!=", 2])
        };
        let filters = json!([
            ["employee", "=", employee_id.as_str()],
            ["attendance_date", ">=", from],
            ["attendance_date", "<=", to],
            docstatus,
        ]);
        let rows: Vec<AttendanceRow> = self
            .list(
                OPERATION,
                &self.client.doctypes.attendance,
                &["employee", "attendance_date", "status"],
                filters,
                "attendance_date asc",
            )
            .await?;
        rows.into_iter().map(|row| row.into_record(OPERATION)).collect()
    }

    async fn list_approved_applications(
        &self,
        employee_id: &EmployeeId,
        kind: ApplicationKind,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<LeaveTypeApplication>, SourceError> {
        const OPERATION: &str = "list approved applications";
        let filters = json!([
            ["employee", "=", employee_id.as_str()],
            ["status", "=", "Approved"],
            ["from_date", "<=", to],
            ["to_date", ">=", from],
        ]);
        let rows: Vec<ApplicationRow> = self
            .list(
                OPERATION,
                self.client.doctypes.for_application(kind),
                &["employee", "from_date", "to_date", "status"],
                filters,
                "from_date asc",
            )
            .await?;
        rows.into_iter()
            .map(|row| row.into_application(OPERATION, kind))
            .collect()
    }

    async fn create_check_event(
        &self,
        employee_id: &EmployeeId,
        timestamp: NaiveDateTime,
        direction: CheckDirection,
    ) -> Result<CheckEvent, SourceError> {
        const OPERATION: &str = "create check event";
        let url = self.client.resource_url(&self.client.doctypes.checkin)?;
        let body = json!({
            "employee": employee_id.as_str(),
            "time": format_frappe_datetime(timestamp),
            "log_type": direction.log_type(),
        });

        tracing::info!(
            employee_id = %employee_id,
            %timestamp,
            %direction,
            "Creating check event"
        );
        let response = self
            .client
            .http
            .post(url)
            .header(AUTHORIZATION, self.auth.as_str())
            .json(&body)
            .send()
            .await
            .map_err(|source| SourceError::Transport {
                operation: OPERATION,
                source,
            })?;

        let envelope: DataEnvelope<CheckinRow> = read_json(OPERATION, response).await?;
        envelope.data.into_event(OPERATION)
    }
}

async fn read_json<T: DeserializeOwned>(
    operation: &'static str,
    response: Response,
) -> Result<T, SourceError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|source| SourceError::Transport { operation, source })?;

    if !status.is_success() {
        return Err(SourceError::Status {
            operation,
            status: status.as_u16(),
            message: error_message(&body),
        });
    }

    serde_json::from_str(&body).map_err(|e| decode_error(operation, e.to_string()))
}

/// Best human-readable message in a Frappe error body.
fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["message", "exception"] {
            if let Some(text) = value.get(key).and_then(Value::as_str) {
                if !text.trim().is_empty() {
                    return text.trim().to_string();
                }
            }
        }
        if let Some(message) = value
            .get("_server_messages")
            .and_then(Value::as_str)
            .and_then(first_server_message)
        {
            return message;
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }
    trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect()
}

/// `_server_messages` is a JSON list of JSON-encoded objects.
fn first_server_message(raw: &str) -> Option<String> {
    let messages: Vec<String> = serde_json::from_str(raw).ok()?;
    messages.into_iter().next().map(|message| {
        serde_json::from_str::<Value>(&message)
            .ok()
            .and_then(|value| value.get("message").and_then(Value::as_str).map(str::to_string))
            .unwrap_or(message)
    })
}

fn parse_employee(operation: &'static str, raw: &str) -> Result<EmployeeId, SourceError> {
    EmployeeId::parse(raw)
        .map_err(|e| decode_error(operation, format!("employee '{}': {}", raw, e)))
}

fn decode_error(operation: &'static str, message: impl Into<String>) -> SourceError {
    SourceError::Decode {
        operation,
        message: message.into(),
    }
}
