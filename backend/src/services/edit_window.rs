//! Which days accept a retroactive clock entry, and of which direction.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{CheckDirection, DayStatus};

pub const DEFAULT_EDIT_WINDOW_DAYS: u32 = 7;

/// Trailing window of calendar days, today included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditWindow {
    days: u32,
}

impl Default for EditWindow {
    fn default() -> Self {
        Self::new(DEFAULT_EDIT_WINDOW_DAYS)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "direction")]
pub enum EntryAllowance {
    Allowed(CheckDirection),
    /// Both directions already recorded; the dialog opens read-only.
    Complete,
}

impl EntryAllowance {
    pub fn direction(&self) -> Option<CheckDirection> {
        match self {
            EntryAllowance::Allowed(direction) => Some(*direction),
            EntryAllowance::Complete => None,
        }
    }
}

/// What tapping an editable day opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntryDialog {
    pub date: NaiveDate,
    pub allowance: EntryAllowance,
}

impl EntryDialog {
    pub fn is_read_only(&self) -> bool {
        matches!(self.allowance, EntryAllowance::Complete)
    }
}

impl EditWindow {
    /// A zero-length window is widened to today only.
    pub fn new(days: u32) -> Self {
        Self { days: days.max(1) }
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    /// `[today - (days - 1), today]`, compared as dates.
    pub fn contains(&self, today: NaiveDate, date: NaiveDate) -> bool {
        let age = today.signed_duration_since(date).num_days();
        (0..i64::from(self.days)).contains(&age)
    }

    /// Dialog for a tapped day, or `None` when the tap is ignored.
    pub fn on_tap(
        &self,
        today: NaiveDate,
        date: NaiveDate,
        day: Option<&DayStatus>,
    ) -> Option<EntryDialog> {
        self.contains(today, date).then(|| EntryDialog {
            date,
            allowance: allowed_entry(day),
        })
    }
}

/// Entry direction permitted by what the day already holds.
pub fn allowed_entry(day: Option<&DayStatus>) -> EntryAllowance {
    let (has_in, has_out) = day
        .map(|day| (!day.check_ins.is_empty(), !day.check_outs.is_empty()))
        .unwrap_or((false, false));
    match (has_in, has_out) {
        (true, true) => EntryAllowance::Complete,
        (true, false) => EntryAllowance::Allowed(CheckDirection::Out),
        // Entries need not start with IN; a lone OUT still asks for the IN.
        (false, _) => EntryAllowance::Allowed(CheckDirection::In),
    }
}
