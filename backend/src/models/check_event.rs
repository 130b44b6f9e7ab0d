use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::MonthView;
use crate::types::EmployeeId;
use crate::validation::rules;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckDirection {
    In,
    Out,
}

impl CheckDirection {
    /// Value of the `log_type` field on an `Employee Checkin` document.
    pub fn log_type(&self) -> &'static str {
        match self {
            CheckDirection::In => "IN",
            CheckDirection::Out => "OUT",
        }
    }
}

impl fmt::Display for CheckDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.log_type())
    }
}

impl FromStr for CheckDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "IN" => Ok(CheckDirection::In),
            "OUT" => Ok(CheckDirection::Out),
            other => Err(format!("unrecognized check direction '{}'", other)),
        }
    }
}

/// A single clock-in or clock-out. Never edited once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CheckEvent {
    pub employee_id: EmployeeId,
    /// Organization-local wall clock time, no offset attached.
    pub timestamp: NaiveDateTime,
    pub direction: CheckDirection,
}

impl CheckEvent {
    pub fn new(
        employee_id: EmployeeId,
        timestamp: NaiveDateTime,
        direction: CheckDirection,
    ) -> Self {
        Self {
            employee_id,
            timestamp,
            direction,
        }
    }

    /// Calendar day the event is bucketed under.
    pub fn local_date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// Payload for a retroactive clock entry.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CheckEntryDraft {
    pub date: NaiveDate,
    /// 12-hour clock time, e.g. "09:05 AM".
    #[validate(custom(function = "rules::validate_time_12h"))]
    #[schema(example = "09:05 AM")]
    pub time: String,
    /// Defaults to the direction the day currently allows.
    #[serde(default)]
    pub direction: Option<CheckDirection>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CheckEntryResponse {
    pub event: CheckEvent,
    /// Month reloaded after the write; `null` when the reload failed.
    pub calendar: Option<MonthView>,
}
