//! Derived, never-persisted calendar types.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::models::{attendance_record::AttendanceStatus, check_event::CheckDirection};

/// The single status shown for a calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResolvedStatus {
    Present,
    Absent,
    Incomplete,
    OnLeave,
    HalfDay,
    WorkFromHome,
}

impl From<AttendanceStatus> for ResolvedStatus {
    fn from(status: AttendanceStatus) -> Self {
        match status {
            AttendanceStatus::Present => ResolvedStatus::Present,
            AttendanceStatus::Absent => ResolvedStatus::Absent,
            AttendanceStatus::OnLeave => ResolvedStatus::OnLeave,
            AttendanceStatus::HalfDay => ResolvedStatus::HalfDay,
            AttendanceStatus::WorkFromHome => ResolvedStatus::WorkFromHome,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DayStatus {
    pub date: NaiveDate,
    pub check_ins: Vec<NaiveDateTime>,
    pub check_outs: Vec<NaiveDateTime>,
    pub resolved_status: ResolvedStatus,
    pub has_attendance_record: bool,
    pub is_wfh_flagged: bool,
    pub is_od_flagged: bool,
}

impl DayStatus {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            check_ins: Vec::new(),
            check_outs: Vec::new(),
            resolved_status: ResolvedStatus::Absent,
            has_attendance_record: false,
            is_wfh_flagged: false,
            is_od_flagged: false,
        }
    }

    pub fn has_check_events(&self) -> bool {
        !self.check_ins.is_empty() || !self.check_outs.is_empty()
    }

    pub fn is_flagged(&self) -> bool {
        self.is_wfh_flagged || self.is_od_flagged
    }
}

/// Reconciled statuses keyed by calendar date; serializes with `YYYY-MM-DD` keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DayStatusMap(BTreeMap<NaiveDate, DayStatus>);

impl DayStatusMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DayStatus> {
        self.0.get(&date)
    }

    pub(crate) fn entry(&mut self, date: NaiveDate) -> &mut DayStatus {
        self.0.entry(date).or_insert_with(|| DayStatus::empty(date))
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut DayStatus> {
        self.0.values_mut()
    }

    /// Status for any date; days nothing refers to are absent.
    pub fn resolved_status(&self, date: NaiveDate) -> ResolvedStatus {
        self.get(date)
            .map(|day| day.resolved_status)
            .unwrap_or(ResolvedStatus::Absent)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Indicator drawn on a day cell. WFH outranks OD, which outranks the status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    Wfh,
    Od,
    Status(ResolvedStatus),
}

/// Background intensity of a day cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Tint {
    /// Attendance record and clock data both present.
    Solid,
    /// Exactly one of attendance record or clock data.
    Medium,
    /// Only WFH/OD coverage.
    FlagOnly,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DayCell {
    pub day: u32,
    pub date: NaiveDate,
    pub date_key: String,
    pub status: Option<DayStatus>,
    pub badge: Option<Badge>,
    pub tint: Tint,
    pub editable: bool,
    /// Direction a new entry would take; `None` when not editable or already complete.
    pub allowed_entry: Option<CheckDirection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CalendarCell {
    Blank,
    Day(DayCell),
}

impl CalendarCell {
    pub fn is_blank(&self) -> bool {
        matches!(self, CalendarCell::Blank)
    }

    pub fn as_day(&self) -> Option<&DayCell> {
        match self {
            CalendarCell::Day(cell) => Some(cell),
            CalendarCell::Blank => None,
        }
    }
}

/// Seven cells, Sunday first.
pub type CalendarWeek = Vec<CalendarCell>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MonthSummary {
    pub present: u32,
    pub absent: u32,
    pub incomplete: u32,
    pub on_leave: u32,
    pub half_day: u32,
    pub work_from_home: u32,
    pub wfh_flagged: u32,
    pub od_flagged: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    pub iso_start: String,
    pub iso_end: String,
    #[schema(value_type = Vec<Vec<CalendarCell>>)]
    pub weeks: Vec<CalendarWeek>,
    pub summary: MonthSummary,
}

impl MonthView {
    pub fn day(&self, date: NaiveDate) -> Option<&DayCell> {
        self.weeks
            .iter()
            .flatten()
            .filter_map(CalendarCell::as_day)
            .find(|cell| cell.date == date)
    }
}
