//! Common validation rules shared across request payloads.

use validator::ValidationError;

use crate::utils::time::parse_time_12h;

/// Validates a 12-hour clock time.
///
/// Requirements:
/// - `HH:MM AM` or `HH:MM PM`, hours 01-12, minutes 00-59
/// - Surrounding whitespace is ignored
pub fn validate_time_12h(time: &str) -> Result<(), ValidationError> {
    if time.trim().is_empty() {
        return Err(ValidationError::new("time_required"));
    }

    parse_time_12h(time)
        .map(|_| ())
        .map_err(|_| ValidationError::new("time_format_invalid"))
}
