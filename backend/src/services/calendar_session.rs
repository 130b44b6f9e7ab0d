//! Per-request calendar state: the selected month, its reconciled days and
//! the rendered view, plus the retroactive entry flow on top of them.
//!
//! Loads are tagged with a generation number. A result is applied only when
//! its ticket is still the latest one issued for the selected month, so a
//! slow response for a month the caller navigated away from is dropped.

use std::{future::Future, sync::Arc};

use chrono::NaiveDate;
use thiserror::Error;

use crate::{
    models::{
        ApplicationKind, CheckDirection, CheckEntryDraft, CheckEntryResponse, DayStatusMap,
        MonthView,
    },
    repositories::{AttendanceSource, SourceError},
    services::{
        calendar_grid::build_month_view,
        date_range::MonthRange,
        edit_window::{EditWindow, EntryAllowance, EntryDialog},
        reconciler::{reconcile, MonthRecords},
    },
    types::EmployeeId,
    utils::time::parse_time_12h,
};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to fetch calendar data: {0}")]
    Fetch(#[source] SourceError),
    #[error("calendar load was superseded by a newer request")]
    Superseded,
}

#[derive(Debug, Error)]
pub enum EntryError {
    #[error("invalid time '{0}', expected HH:MM AM/PM")]
    InvalidTime(String),
    #[error("{0} is outside the edit window")]
    OutsideEditWindow(NaiveDate),
    #[error("{0} already has both a check-in and a check-out")]
    AlreadyComplete(NaiveDate),
    #[error("{date} accepts a {expected} entry, not {requested}")]
    DirectionMismatch {
        date: NaiveDate,
        expected: CheckDirection,
        requested: CheckDirection,
    },
    #[error(transparent)]
    Load(#[from] SessionError),
    #[error("Failed to submit check-in entry: {0}")]
    Submit(#[source] SourceError),
}

/// Identifies one issued load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    range: MonthRange,
}

impl LoadTicket {
    pub fn range(&self) -> &MonthRange {
        &self.range
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    Stale,
}

/// Fetches the four record sets for one month concurrently. Any failure fails the whole load.
pub async fn fetch_month(
    source: &dyn AttendanceSource,
    employee_id: &EmployeeId,
    range: &MonthRange,
) -> Result<MonthRecords, SourceError> {
    let (from, to) = (range.first_of_month, range.last_of_month);
    let (check_events, attendance_records, wfh_applications, od_applications) = tokio::try_join!(
        source.list_check_events(employee_id, from, to),
        source.list_attendance_records(employee_id, from, to, true),
        source.list_approved_applications(employee_id, ApplicationKind::Wfh, from, to),
        source.list_approved_applications(employee_id, ApplicationKind::Od, from, to),
    )?;

    Ok(MonthRecords {
        check_events,
        attendance_records,
        wfh_applications,
        od_applications,
    })
}

pub struct CalendarSession {
    source: Arc<dyn AttendanceSource>,
    employee_id: EmployeeId,
    window: EditWindow,
    selected: MonthRange,
    generation: u64,
    days: Option<DayStatusMap>,
    view: Option<MonthView>,
}

impl CalendarSession {
    /// Starts on the month containing `today`; nothing is loaded yet.
    pub fn open(
        source: Arc<dyn AttendanceSource>,
        employee_id: EmployeeId,
        window: EditWindow,
        today: NaiveDate,
    ) -> Self {
        Self {
            source,
            employee_id,
            window,
            selected: MonthRange::containing(today),
            generation: 0,
            days: None,
            view: None,
        }
    }

    pub fn selected(&self) -> &MonthRange {
        &self.selected
    }

    pub fn select_month(&mut self, range: MonthRange) {
        if range != self.selected {
            self.selected = range;
            self.days = None;
            self.view = None;
        }
    }

    pub fn begin_refresh(&mut self) -> LoadTicket {
        self.generation += 1;
        LoadTicket {
            generation: self.generation,
            range: self.selected,
        }
    }

    /// Detached load for `ticket`; the session is not borrowed while it runs.
    pub fn load(
        &self,
        ticket: LoadTicket,
    ) -> impl Future<Output = (LoadTicket, Result<MonthRecords, SourceError>)> + Send + 'static
    {
        let source = Arc::clone(&self.source);
        let employee_id = self.employee_id.clone();
        async move {
            let result = fetch_month(source.as_ref(), &employee_id, &ticket.range).await;
            (ticket, result)
        }
    }

    /// Reconciles and renders a finished load unless a newer one was issued since.
    pub fn apply(
        &mut self,
        ticket: LoadTicket,
        result: Result<MonthRecords, SourceError>,
        today: NaiveDate,
    ) -> Result<ApplyOutcome, SessionError> {
        if ticket.generation != self.generation || ticket.range != self.selected {
            tracing::debug!(
                employee_id = %self.employee_id,
                stale_generation = ticket.generation,
                current_generation = self.generation,
                "Discarding stale calendar load"
            );
            return Ok(ApplyOutcome::Stale);
        }

        let records = result.map_err(SessionError::Fetch)?;
        let days = reconcile(&records, &self.selected);
        self.view = Some(build_month_view(&self.selected, &days, today, &self.window));
        self.days = Some(days);
        Ok(ApplyOutcome::Applied)
    }

    pub async fn refresh(&mut self, today: NaiveDate) -> Result<&MonthView, SessionError> {
        let ticket = self.begin_refresh();
        let (ticket, result) = self.load(ticket).await;
        match self.apply(ticket, result, today)? {
            ApplyOutcome::Applied => self.view.as_ref().ok_or(SessionError::Superseded),
            ApplyOutcome::Stale => Err(SessionError::Superseded),
        }
    }

    pub fn view(&self) -> Option<&MonthView> {
        self.view.as_ref()
    }

    pub fn tap(&self, today: NaiveDate, date: NaiveDate) -> Option<EntryDialog> {
        let day = self.days.as_ref().and_then(|days| days.get(date));
        self.window.on_tap(today, date, day)
    }

    /// Validates and writes one clock entry, then reloads the month.
    ///
    /// A failed reload after a successful write is not an error: the event is
    /// returned with `calendar: None`.
    pub async fn submit_entry(
        &mut self,
        draft: &CheckEntryDraft,
        today: NaiveDate,
    ) -> Result<CheckEntryResponse, EntryError> {
        let time =
            parse_time_12h(&draft.time).map_err(|_| EntryError::InvalidTime(draft.time.clone()))?;
        if !self.window.contains(today, draft.date) {
            return Err(EntryError::OutsideEditWindow(draft.date));
        }

        if !self.selected.contains(draft.date) || self.days.is_none() {
            self.select_month(MonthRange::containing(draft.date));
            self.refresh(today).await?;
        }

        let dialog = self
            .tap(today, draft.date)
            .ok_or(EntryError::OutsideEditWindow(draft.date))?;
        let direction = match dialog.allowance {
            EntryAllowance::Complete => return Err(EntryError::AlreadyComplete(draft.date)),
            EntryAllowance::Allowed(expected) => match draft.direction {
                Some(requested) if requested != expected => {
                    return Err(EntryError::DirectionMismatch {
                        date: draft.date,
                        expected,
                        requested,
                    })
                }
                _ => expected,
            },
        };

        let event = self
            .source
            .create_check_event(&self.employee_id, draft.date.and_time(time), direction)
            .await
            .map_err(EntryError::Submit)?;
        tracing::info!(
            employee_id = %self.employee_id,
            date = %draft.date,
            %direction,
            "Recorded retroactive check entry"
        );

        let calendar = match self.refresh(today).await {
            Ok(view) => Some(view.clone()),
            Err(err) => {
                tracing::warn!(
                    employee_id = %self.employee_id,
                    error = %err,
                    "Calendar reload after check entry failed"
                );
                self.days = None;
                self.view = None;
                None
            }
        };

        Ok(CheckEntryResponse { event, calendar })
    }
}
