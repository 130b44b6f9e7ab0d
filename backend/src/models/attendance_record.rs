use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;

use crate::types::EmployeeId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized attendance status '{0}'")]
pub struct UnknownAttendanceStatus(pub String);

/// Authoritative daily status recorded by the system of record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    OnLeave,
    HalfDay,
    WorkFromHome,
}

/// Lower-cases and joins words with `_`: "Work From Home" -> "work_from_home".
pub fn normalize_status_label(raw: &str) -> String {
    raw.split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

impl FromStr for AttendanceStatus {
    type Err = UnknownAttendanceStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_status_label(s).as_str() {
            "present" => Ok(AttendanceStatus::Present),
            "absent" => Ok(AttendanceStatus::Absent),
            "on_leave" => Ok(AttendanceStatus::OnLeave),
            "half_day" => Ok(AttendanceStatus::HalfDay),
            "work_from_home" => Ok(AttendanceStatus::WorkFromHome),
            _ => Err(UnknownAttendanceStatus(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AttendanceRecord {
    pub employee_id: EmployeeId,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

impl AttendanceRecord {
    pub fn new(employee_id: EmployeeId, date: NaiveDate, status: AttendanceStatus) -> Self {
        Self {
            employee_id,
            date,
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frappe_labels_map_onto_statuses() {
        assert_eq!("Present".parse::<AttendanceStatus>(), Ok(AttendanceStatus::Present));
        assert_eq!("On Leave".parse::<AttendanceStatus>(), Ok(AttendanceStatus::OnLeave));
        assert_eq!("Half Day".parse::<AttendanceStatus>(), Ok(AttendanceStatus::HalfDay));
        assert_eq!(
            "  Work  From   Home ".parse::<AttendanceStatus>(),
            Ok(AttendanceStatus::WorkFromHome)
        );
        assert_eq!("half-day".parse::<AttendanceStatus>(), Ok(AttendanceStatus::HalfDay));
    }

    #[test]
    fn unknown_label_is_an_error_not_absent() {
        let err = "Comp Off".parse::<AttendanceStatus>().unwrap_err();
        assert_eq!(err, UnknownAttendanceStatus("Comp Off".into()));
        assert_eq!(err.to_string(), "unrecognized attendance status 'Comp Off'");
    }

    #[test]
    fn normalize_collapses_separators() {
        assert_eq!(normalize_status_label("Work From Home"), "work_from_home");
        assert_eq!(normalize_status_label("ABSENT"), "absent");
    }
}
