//! Record source trait for the calendar and entry flows.
//!
//! Implementations carry an already-authenticated capability; callers never
//! see credentials. The trait is mockable with mockall in unit tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::{
    models::{
        ApplicationKind, AttendanceRecord, CheckDirection, CheckEvent, LeaveTypeApplication,
    },
    repositories::frappe::FrappeAuth,
    types::EmployeeId,
};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{operation} request failed: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{operation} was rejected with status {status}: {message}")]
    Status {
        operation: &'static str,
        status: u16,
        message: String,
    },
    #[error("{operation} returned an unreadable response: {message}")]
    Decode {
        operation: &'static str,
        message: String,
    },
    #[error("invalid record source configuration: {0}")]
    Config(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttendanceSource: Send + Sync {
    /// Clock events whose local date falls in `[from, to]`.
    async fn list_check_events(
        &self,
        employee_id: &EmployeeId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<CheckEvent>, SourceError>;

    /// Attendance records dated in `[from, to]`; `approved_only` keeps submitted documents only.
    async fn list_attendance_records(
        &self,
        employee_id: &EmployeeId,
        from: NaiveDate,
        to: NaiveDate,
        approved_only: bool,
    ) -> Result<Vec<AttendanceRecord>, SourceError>;

    /// Approved applications whose span overlaps `[from, to]`.
    async fn list_approved_applications(
        &self,
        employee_id: &EmployeeId,
        kind: ApplicationKind,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<LeaveTypeApplication>, SourceError>;

    async fn create_check_event(
        &self,
        employee_id: &EmployeeId,
        timestamp: NaiveDateTime,
        direction: CheckDirection,
    ) -> Result<CheckEvent, SourceError>;
}

/// Hands out a source bound to one caller's credentials.
pub trait SourceProvider: Send + Sync {
    fn source_for(&self, auth: &FrappeAuth) -> Arc<dyn AttendanceSource>;
}
