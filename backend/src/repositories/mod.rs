pub mod attendance_source;
pub mod frappe;

pub use attendance_source::{AttendanceSource, SourceError, SourceProvider};
pub use frappe::{FrappeAuth, FrappeClient, FrappeSource};

#[cfg(test)]
pub use attendance_source::MockAttendanceSource;
