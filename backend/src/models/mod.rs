//! Data models shared across the record source, calendar services and API handlers.

pub mod application;
pub mod attendance_record;
pub mod calendar;
pub mod check_event;

pub use application::{ApplicationKind, ApprovalStatus, LeaveTypeApplication};
pub use attendance_record::{AttendanceRecord, AttendanceStatus, UnknownAttendanceStatus};
pub use calendar::{
    Badge, CalendarCell, CalendarWeek, DayCell, DayStatus, DayStatusMap, MonthSummary, MonthView,
    ResolvedStatus, Tint,
};
pub use check_event::{CheckDirection, CheckEntryDraft, CheckEntryResponse, CheckEvent};
