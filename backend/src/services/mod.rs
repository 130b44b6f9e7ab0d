pub mod calendar_grid;
pub mod calendar_session;
pub mod date_range;
pub mod edit_window;
pub mod reconciler;

pub use calendar_session::{CalendarSession, EntryError, SessionError};
pub use date_range::{DateRangeError, MonthRange};
pub use edit_window::EditWindow;
