//! Multi-day work-from-home and on-duty applications.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use utoipa::ToSchema;

use crate::types::EmployeeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationKind {
    Wfh,
    Od,
}

impl fmt::Display for ApplicationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplicationKind::Wfh => f.write_str("WFH"),
            ApplicationKind::Od => f.write_str("OD"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl Default for ApprovalStatus {
    fn default() -> Self {
        ApprovalStatus::Pending
    }
}

impl FromStr for ApprovalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            // Frappe workflows start documents in "Open".
            "open" | "pending" => Ok(ApprovalStatus::Pending),
            "approved" => Ok(ApprovalStatus::Approved),
            "rejected" => Ok(ApprovalStatus::Rejected),
            "cancelled" => Ok(ApprovalStatus::Cancelled),
            _ => Err(format!("unrecognized approval status '{}'", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LeaveTypeApplication {
    pub employee_id: EmployeeId,
    pub kind: ApplicationKind,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub approval_status: ApprovalStatus,
}

impl LeaveTypeApplication {
    pub fn is_approved(&self) -> bool {
        matches!(self.approval_status, ApprovalStatus::Approved)
    }
}
