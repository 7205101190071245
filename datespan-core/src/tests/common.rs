use crate::{Config, TextResolver};
use chrono::{NaiveDate, NaiveDateTime};

/// Every resolver test is anchored here: Wednesday, 20 Aug 2025.
pub fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 8, 20).expect("valid date")
}

/// Test helper to create a `Config` pinned to [`reference_date`].
pub fn mk_config() -> Config {
    Config {
        reference_date: Some(reference_date()),
        input_date_formats: Vec::new(),
    }
}

pub fn resolver() -> TextResolver {
    TextResolver::from_config(&mk_config()).expect("resolver builds")
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
    at(y, m, d, 0, 0)
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(h, min, 0))
        .expect("valid datetime")
}
