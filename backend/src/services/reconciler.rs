//! Merges clock events, attendance records and WFH/OD applications into one
//! status per calendar day.
//!
//! Precedence, highest first:
//! 1. an attendance record's status (any status, including `Absent`);
//! 2. the status derived from clock events (`Present` when outs >= ins,
//!    otherwise `Incomplete`);
//! 3. `Absent`.
//!
//! WFH/OD coverage only sets flags and never changes the resolved status.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::{
    models::{
        ApplicationKind, AttendanceRecord, CheckDirection, CheckEvent, DayStatus, DayStatusMap,
        LeaveTypeApplication, MonthSummary, ResolvedStatus,
    },
    services::date_range::{expand_inclusive, MonthRange},
};

/// Everything fetched for one employee and month.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthRecords {
    pub check_events: Vec<CheckEvent>,
    pub attendance_records: Vec<AttendanceRecord>,
    pub wfh_applications: Vec<LeaveTypeApplication>,
    pub od_applications: Vec<LeaveTypeApplication>,
}

/// Resolves every day the records refer to. Application spans are clipped to `range`.
pub fn reconcile(records: &MonthRecords, range: &MonthRange) -> DayStatusMap {
    let mut days = DayStatusMap::new();

    // Attendance records go first so authority is settled before any clock data.
    for record in &records.attendance_records {
        let day = days.entry(record.date);
        day.resolved_status = record.status.into();
        day.has_attendance_record = true;
    }

    for event in &records.check_events {
        let day = days.entry(event.local_date());
        match event.direction {
            CheckDirection::In => day.check_ins.push(event.timestamp),
            CheckDirection::Out => day.check_outs.push(event.timestamp),
        }
    }

    for day in days.values_mut() {
        day.check_ins.sort_unstable();
        day.check_outs.sort_unstable();
        if !day.has_attendance_record {
            day.resolved_status = derive_from_check_events(day);
        }
    }

    for date in coverage(&records.wfh_applications, ApplicationKind::Wfh, range) {
        days.entry(date).is_wfh_flagged = true;
    }
    for date in coverage(&records.od_applications, ApplicationKind::Od, range) {
        days.entry(date).is_od_flagged = true;
    }

    days
}

fn derive_from_check_events(day: &DayStatus) -> ResolvedStatus {
    let ins = day.check_ins.len();
    let outs = day.check_outs.len();
    match (ins, outs) {
        (0, 0) => ResolvedStatus::Absent,
        (0, _) | (_, 0) => ResolvedStatus::Incomplete,
        (ins, outs) if outs >= ins => ResolvedStatus::Present,
        _ => ResolvedStatus::Incomplete,
    }
}

/// Dates inside `range` covered by approved applications of `kind`.
pub fn coverage(
    applications: &[LeaveTypeApplication],
    kind: ApplicationKind,
    range: &MonthRange,
) -> BTreeSet<NaiveDate> {
    applications
        .iter()
        .filter(|application| application.kind == kind && application.is_approved())
        .flat_map(|application| {
            expand_inclusive(
                application.start_date.max(range.first_of_month),
                application.end_date.min(range.last_of_month),
            )
        })
        .collect()
}

/// Per-status day counts for the days of `range`. Days with no data are not counted.
pub fn summarize(range: &MonthRange, days: &DayStatusMap) -> MonthSummary {
    let mut summary = MonthSummary::default();
    for date in range.days() {
        let Some(day) = days.get(date) else {
            continue;
        };
        if day.is_wfh_flagged {
            summary.wfh_flagged += 1;
        }
        if day.is_od_flagged {
            summary.od_flagged += 1;
        }
        // Flag-only days carry a placeholder status that is not a real absence.
        if !day.has_attendance_record && !day.has_check_events() {
            continue;
        }
        let counter = match day.resolved_status {
            ResolvedStatus::Present => &mut summary.present,
            ResolvedStatus::Absent => &mut summary.absent,
            ResolvedStatus::Incomplete => &mut summary.incomplete,
            ResolvedStatus::OnLeave => &mut summary.on_leave,
            ResolvedStatus::HalfDay => &mut summary.half_day,
            ResolvedStatus::WorkFromHome => &mut summary.work_from_home,
        };
        *counter += 1;
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ApprovalStatus, AttendanceStatus};
    use crate::types::EmployeeId;

    fn emp() -> EmployeeId {
        EmployeeId::parse("HR-EMP-00001").unwrap()
    }

    fn march() -> MonthRange {
        MonthRange::for_month(2024, 3).unwrap()
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn check(day: u32, hour: u32, direction: CheckDirection) -> CheckEvent {
        CheckEvent::new(emp(), d(day).and_hms_opt(hour, 0, 0).unwrap(), direction)
    }

    fn record(day: u32, status: AttendanceStatus) -> AttendanceRecord {
        AttendanceRecord::new(emp(), d(day), status)
    }

    fn application(
        kind: ApplicationKind,
        start: u32,
        end: u32,
        approval_status: ApprovalStatus,
    ) -> LeaveTypeApplication {
        LeaveTypeApplication {
            employee_id: emp(),
            kind,
            start_date: d(start),
            end_date: d(end),
            approval_status,
        }
    }

    #[test]
    fn leave_like_records_win_over_clock_data() {
        for status in [
            AttendanceStatus::OnLeave,
            AttendanceStatus::HalfDay,
            AttendanceStatus::WorkFromHome,
        ] {
            let records = MonthRecords {
                check_events: vec![check(5, 9, CheckDirection::In)],
                attendance_records: vec![record(5, status)],
                ..Default::default()
            };
            let days = reconcile(&records, &march());
            assert_eq!(days.resolved_status(d(5)), ResolvedStatus::from(status));
            assert_eq!(days.get(d(5)).unwrap().check_ins.len(), 1);
        }
    }

    #[test]
    fn one_in_one_out_is_present() {
        let records = MonthRecords {
            check_events: vec![
                check(10, 18, CheckDirection::Out),
                check(10, 9, CheckDirection::In),
            ],
            ..Default::default()
        };
        let days = reconcile(&records, &march());
        let day = days.get(d(10)).unwrap();
        assert_eq!(day.resolved_status, ResolvedStatus::Present);
        assert!(!day.is_wfh_flagged && !day.is_od_flagged);
        assert_eq!(day.check_ins, vec![d(10).and_hms_opt(9, 0, 0).unwrap()]);
    }

    #[test]
    fn one_sided_or_unbalanced_days_are_incomplete() {
        let records = MonthRecords {
            check_events: vec![
                check(11, 9, CheckDirection::In),
                check(12, 18, CheckDirection::Out),
                check(13, 9, CheckDirection::In),
                check(13, 13, CheckDirection::Out),
                check(13, 14, CheckDirection::In),
            ],
            ..Default::default()
        };
        let days = reconcile(&records, &march());
        assert_eq!(days.resolved_status(d(11)), ResolvedStatus::Incomplete);
        assert_eq!(days.resolved_status(d(12)), ResolvedStatus::Incomplete);
        assert_eq!(days.resolved_status(d(13)), ResolvedStatus::Incomplete);
    }

    #[test]
    fn more_outs_than_ins_is_present() {
        let records = MonthRecords {
            check_events: vec![
                check(14, 9, CheckDirection::In),
                check(14, 17, CheckDirection::Out),
                check(14, 18, CheckDirection::Out),
            ],
            ..Default::default()
        };
        assert_eq!(
            reconcile(&records, &march()).resolved_status(d(14)),
            ResolvedStatus::Present
        );
    }

    #[test]
    fn day_with_nothing_is_absent() {
        let days = reconcile(&MonthRecords::default(), &march());
        assert!(days.is_empty());
        assert_eq!(days.resolved_status(d(20)), ResolvedStatus::Absent);
    }

    #[test]
    fn authoritative_absent_is_not_rederived_from_stray_check_in() {
        let records = MonthRecords {
            check_events: vec![check(7, 9, CheckDirection::In)],
            attendance_records: vec![record(7, AttendanceStatus::Absent)],
            ..Default::default()
        };
        assert_eq!(
            reconcile(&records, &march()).resolved_status(d(7)),
            ResolvedStatus::Absent
        );
    }

    #[test]
    fn authoritative_present_survives_missing_check_out() {
        let records = MonthRecords {
            check_events: vec![check(8, 9, CheckDirection::In)],
            attendance_records: vec![record(8, AttendanceStatus::Present)],
            ..Default::default()
        };
        assert_eq!(
            reconcile(&records, &march()).resolved_status(d(8)),
            ResolvedStatus::Present
        );
    }

    #[test]
    fn approved_wfh_flags_every_covered_day_without_status_change() {
        let records = MonthRecords {
            wfh_applications: vec![application(
                ApplicationKind::Wfh,
                4,
                6,
                ApprovalStatus::Approved,
            )],
            ..Default::default()
        };
        let days = reconcile(&records, &march());
        for day in 4..=6 {
            let status = days.get(d(day)).unwrap();
            assert!(status.is_wfh_flagged);
            assert!(!status.has_attendance_record && !status.has_check_events());
            assert_eq!(status.resolved_status, ResolvedStatus::Absent);
        }
        assert!(days.get(d(7)).is_none());
    }

    #[test]
    fn application_spans_are_clipped_to_the_month() {
        let records = MonthRecords {
            wfh_applications: vec![LeaveTypeApplication {
                employee_id: emp(),
                kind: ApplicationKind::Wfh,
                start_date: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2099, 12, 31).unwrap(),
                approval_status: ApprovalStatus::Approved,
            }],
            ..Default::default()
        };
        let days = reconcile(&records, &march());
        let march = march();
        assert!(march.days().all(|date| days.get(date).is_some()));
        assert!(days.get(d(1)).unwrap().is_wfh_flagged);
        assert!(days.get(d(31)).unwrap().is_wfh_flagged);
        assert!(days.get(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()).is_none());
    }

    #[test]
    fn flags_are_additive_over_explicit_status() {
        let records = MonthRecords {
            attendance_records: vec![record(4, AttendanceStatus::OnLeave)],
            od_applications: vec![application(ApplicationKind::Od, 4, 4, ApprovalStatus::Approved)],
            ..Default::default()
        };
        let day = reconcile(&records, &march()).get(d(4)).cloned().unwrap();
        assert!(day.is_od_flagged);
        assert_eq!(day.resolved_status, ResolvedStatus::OnLeave);
    }

    #[test]
    fn unapproved_or_mislabelled_applications_are_ignored() {
        let records = MonthRecords {
            wfh_applications: vec![
                application(ApplicationKind::Wfh, 1, 2, ApprovalStatus::Pending),
                application(ApplicationKind::Wfh, 3, 3, ApprovalStatus::Rejected),
                application(ApplicationKind::Od, 9, 9, ApprovalStatus::Approved),
            ],
            ..Default::default()
        };
        assert!(reconcile(&records, &march()).is_empty());
    }

    #[test]
    fn reconcile_is_idempotent() {
        let records = MonthRecords {
            check_events: vec![check(10, 9, CheckDirection::In), check(11, 9, CheckDirection::In)],
            attendance_records: vec![record(12, AttendanceStatus::HalfDay)],
            wfh_applications: vec![application(
                ApplicationKind::Wfh,
                10,
                12,
                ApprovalStatus::Approved,
            )],
            od_applications: vec![],
        };
        assert_eq!(reconcile(&records, &march()), reconcile(&records, &march()));
    }

    #[test]
    fn summarize_counts_real_days_and_flags() {
        let records = MonthRecords {
            check_events: vec![
                check(10, 9, CheckDirection::In),
                check(10, 18, CheckDirection::Out),
                check(11, 9, CheckDirection::In),
            ],
            attendance_records: vec![record(12, AttendanceStatus::Absent)],
            wfh_applications: vec![application(
                ApplicationKind::Wfh,
                4,
                6,
                ApprovalStatus::Approved,
            )],
            od_applications: vec![application(
                ApplicationKind::Od,
                10,
                10,
                ApprovalStatus::Approved,
            )],
        };
        let summary = summarize(&march(), &reconcile(&records, &march()));
        assert_eq!(summary.present, 1);
        assert_eq!(summary.incomplete, 1);
        assert_eq!(summary.absent, 1);
        assert_eq!(summary.wfh_flagged, 3);
        assert_eq!(summary.od_flagged, 1);
    }
}
