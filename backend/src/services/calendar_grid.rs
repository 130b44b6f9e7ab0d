use chrono::{Datelike, NaiveDate};

use crate::{
    models::{Badge, CalendarCell, CalendarWeek, DayCell, DayStatus, DayStatusMap, MonthView, Tint},
    services::{
        date_range::{date_key, MonthRange},
        edit_window::EditWindow,
        reconciler::summarize,
    },
};

const DAYS_PER_WEEK: usize = 7;

/// Sunday-first week rows for `range`, padded with blank cells on both ends.
pub fn build_weeks(
    range: &MonthRange,
    days: &DayStatusMap,
    today: NaiveDate,
    window: &EditWindow,
) -> Vec<CalendarWeek> {
    let leading = range.first_of_month.weekday().num_days_from_sunday() as usize;

    let mut cells: Vec<CalendarCell> = Vec::with_capacity(6 * DAYS_PER_WEEK);
    cells.extend((0..leading).map(|_| CalendarCell::Blank));
    cells.extend(
        range
            .days()
            .map(|date| CalendarCell::Day(day_cell(date, days.get(date), today, window))),
    );
    let trailing = (DAYS_PER_WEEK - cells.len() % DAYS_PER_WEEK) % DAYS_PER_WEEK;
    cells.extend((0..trailing).map(|_| CalendarCell::Blank));

    cells
        .chunks(DAYS_PER_WEEK)
        .map(<[CalendarCell]>::to_vec)
        .collect()
}

pub fn build_month_view(
    range: &MonthRange,
    days: &DayStatusMap,
    today: NaiveDate,
    window: &EditWindow,
) -> MonthView {
    MonthView {
        year: range.year(),
        month: range.month(),
        iso_start: range.iso_start(),
        iso_end: range.iso_end(),
        weeks: build_weeks(range, days, today, window),
        summary: summarize(range, days),
    }
}

fn day_cell(
    date: NaiveDate,
    status: Option<&DayStatus>,
    today: NaiveDate,
    window: &EditWindow,
) -> DayCell {
    let dialog = window.on_tap(today, date, status);
    DayCell {
        day: date.day(),
        date,
        date_key: date_key(date),
        status: status.cloned(),
        badge: status.and_then(badge_for),
        tint: status.map(tint_for).unwrap_or(Tint::None),
        editable: dialog.is_some(),
        allowed_entry: dialog.and_then(|dialog| dialog.allowance.direction()),
    }
}

/// WFH > OD > resolved status. Flag-only days show only their flag.
pub fn badge_for(day: &DayStatus) -> Option<Badge> {
    if day.is_wfh_flagged {
        Some(Badge::Wfh)
    } else if day.is_od_flagged {
        Some(Badge::Od)
    } else if day.has_attendance_record || day.has_check_events() {
        Some(Badge::Status(day.resolved_status))
    } else {
        None
    }
}

pub fn tint_for(day: &DayStatus) -> Tint {
    match (day.has_attendance_record, day.has_check_events()) {
        (true, true) => Tint::Solid,
        (true, false) | (false, true) => Tint::Medium,
        (false, false) if day.is_flagged() => Tint::FlagOnly,
        (false, false) => Tint::None,
    }
}
