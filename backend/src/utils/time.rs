use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;

const FRAPPE_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const TIME_12H_FORMAT: &str = "%I:%M %p";

/// Returns the current time in the configured timezone.
pub fn now_in_timezone(tz: &Tz) -> DateTime<Tz> {
    Utc::now().with_timezone(tz)
}

/// Returns today's date in the configured timezone.
pub fn today_local(tz: &Tz) -> NaiveDate {
    now_in_timezone(tz).date_naive()
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("time must be HH:MM AM or HH:MM PM: {0:?}")]
pub struct TimeFormatError(pub String);

/// Parses a 12-hour clock time such as "09:05 AM".
///
/// The shape is strict: two-digit hour, `:`, two-digit minute, a single space
/// and `AM`/`PM` in either case. Range checks are left to chrono.
pub fn parse_time_12h(raw: &str) -> Result<NaiveTime, TimeFormatError> {
    let text = raw.trim();
    if !has_12h_shape(text) {
        return Err(TimeFormatError(raw.to_string()));
    }
    NaiveTime::parse_from_str(text, TIME_12H_FORMAT)
        .map_err(|_| TimeFormatError(raw.to_string()))
}

fn has_12h_shape(text: &str) -> bool {
    match text.as_bytes() {
        [h1, h2, b':', m1, m2, b' ', meridiem @ ..] => {
            [h1, h2, m1, m2].iter().all(|b| b.is_ascii_digit())
                && (meridiem.eq_ignore_ascii_case(b"AM") || meridiem.eq_ignore_ascii_case(b"PM"))
        }
        _ => false,
    }
}

/// `YYYY-MM-DD HH:MM:SS`, the datetime layout Frappe stores and expects.
pub fn format_frappe_datetime(value: NaiveDateTime) -> String {
    value.format(FRAPPE_DATETIME_FORMAT).to_string()
}

/// Accepts Frappe datetimes with or without fractional seconds.
pub fn parse_frappe_datetime(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(raw.trim(), "%Y-%m-%d %H:%M:%S%.f")
}
