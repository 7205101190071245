//! Pure output helpers.
//!
//! Datetimes:  `2021-07-18 10:30:00`
//! Ranges:
//!   {
//!     "start": "2021-07-18 00:00:00",
//!     "end": "2021-07-20 00:00:00",
//!     "error": ""
//!   }

use chrono::NaiveDateTime;

use crate::extract::DateRange;

/// `2021-07-18 10:30:00`
pub fn format_datetime(datetime: NaiveDateTime) -> String {
    datetime.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Pretty JSON with two-space indentation. Non-ASCII text is written as-is.
pub fn to_json(range: &DateRange) -> serde_json::Result<String> {
    serde_json::to_string_pretty(range)
}
