use chrono::{Datelike, Days, Local, Months, NaiveDate, NaiveTime, Weekday};

use crate::keywords::{KeywordClass, Keywords};

/// Default accepted numeric date formats, tried in order.
pub const DEFAULT_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%d/%m/%Y", "%d.%m.%Y", "%d-%m-%Y", "%Y%m%d",
];

/// Configuration options for parsing functions.
#[derive(Copy, Clone, Debug, Default)]
pub struct ParseOptions<'a> {
    /// The date to use as "today" for relative keywords.
    pub reference_date: Option<NaiveDate>,
    /// A slice of `chrono` format strings to try for parsing dates.
    pub formats: Option<&'a [&'a str]>,
}

impl ParseOptions<'_> {
    pub fn reference(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| Local::now().date_naive())
    }
}

/// Direction of a weekday modifier ("last friday", "next friday").
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Past,
    Future,
}

/// Calendar unit used by relative offsets such as "3 days ago" or "2週間後".
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OffsetUnit {
    Day,
    Week,
    Month,
    Year,
}

impl OffsetUnit {
    /// Accepts English (singular or plural) and Japanese unit words.
    pub fn from_word(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().trim_end_matches('s') {
            "day" | "日" => Some(Self::Day),
            "week" | "週" | "週間" => Some(Self::Week),
            "month" | "か月" | "ヶ月" | "ヵ月" | "カ月" | "ケ月" => Some(Self::Month),
            "year" | "年" => Some(Self::Year),
            _ => None,
        }
    }
}

/// Parses a string token into a concrete calendar date (`NaiveDate`).
///
/// This function understands several formats, processed in the following order:
/// 1.  **Relative Keywords**: `today`, `yesterday`, `tomorrow`, `明日`, ... and any
///     user-defined synonyms (case-insensitive). These are resolved relative to
///     the reference date.
/// 2.  **Weekdays**: `friday`, `金曜日`, ... resolve to the most recent such day,
///     the reference date included.
/// 3.  **Formatted Dates**: Any format string provided in the `formats` slice,
///     such as `"%Y-%m-%d"`.
///
/// Vague periods (`last week`, `今月`) name no single day and return `None`.
///
/// # Examples
///
/// ```
/// # use chrono::NaiveDate;
/// # use datespan_core::parse_input::{parse_date_token, ParseOptions};
/// let opts = ParseOptions {
///     reference_date: Some(NaiveDate::from_ymd_opt(2025, 8, 17).unwrap()),
///     formats: Some(&["%Y-%m-%d"]),
/// };
///
/// // Using a keyword
/// let yesterday = parse_date_token("yesterday", Some(opts)).unwrap();
/// assert_eq!(yesterday, NaiveDate::from_ymd_opt(2025, 8, 16).unwrap());
///
/// // Using a formatted string
/// let specific_date = parse_date_token("2025-01-20", Some(opts)).unwrap();
/// assert_eq!(specific_date, NaiveDate::from_ymd_opt(2025, 1, 20).unwrap());
///
/// assert_eq!(parse_date_token("last week", Some(opts)), None);
/// ```
pub fn parse_date_token(s: &str, options: Option<ParseOptions>) -> Option<NaiveDate> {
    let options = options.unwrap_or_default();
    let reference_date = options.reference();
    let formats = options.formats.unwrap_or(DEFAULT_FORMATS);

    match Keywords::lookup(s).map(|k| k.class()) {
        Some(KeywordClass::DayOffset(days)) => return shift_days(reference_date, days),
        Some(KeywordClass::Weekday(weekday)) => {
            let days_ago = (reference_date.weekday().num_days_from_monday() + 7
                - weekday.num_days_from_monday())
                % 7;
            return reference_date.checked_sub_days(Days::new(days_ago.into()));
        }
        Some(_) => return None,
        None => {}
    }

    // Fallback to formatted dates
    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s.trim(), fmt).ok())
}

/// The closest `weekday` strictly before (`Past`) or after (`Future`) the reference date.
///
/// ```
/// # use chrono::{NaiveDate, Weekday};
/// # use datespan_core::parse_input::{relative_weekday, Direction};
/// let wednesday = NaiveDate::from_ymd_opt(2025, 8, 20).unwrap();
/// assert_eq!(
///     relative_weekday(wednesday, Weekday::Wed, Direction::Past),
///     NaiveDate::from_ymd_opt(2025, 8, 13)
/// );
/// assert_eq!(
///     relative_weekday(wednesday, Weekday::Fri, Direction::Future),
///     NaiveDate::from_ymd_opt(2025, 8, 22)
/// );
/// ```
pub fn relative_weekday(
    reference_date: NaiveDate,
    weekday: Weekday,
    direction: Direction,
) -> Option<NaiveDate> {
    let today = reference_date.weekday().num_days_from_monday();
    let target = weekday.num_days_from_monday();
    match direction {
        Direction::Past => {
            let back = match (today + 7 - target) % 7 {
                0 => 7,
                n => n,
            };
            reference_date.checked_sub_days(Days::new(back.into()))
        }
        Direction::Future => {
            let ahead = match (target + 7 - today) % 7 {
                0 => 7,
                n => n,
            };
            reference_date.checked_add_days(Days::new(ahead.into()))
        }
    }
}

/// The given `weekday` inside the Monday-to-Sunday week containing the reference date.
pub fn weekday_in_week(reference_date: NaiveDate, weekday: Weekday) -> Option<NaiveDate> {
    let monday = reference_date.checked_sub_days(Days::new(
        reference_date.weekday().num_days_from_monday().into(),
    ))?;
    monday.checked_add_days(Days::new(weekday.num_days_from_monday().into()))
}

/// Shifts the reference date by `amount` units in `direction`.
///
/// Month and year shifts clamp to the end of shorter months (Jan 31 + 1 month = Feb 28).
pub fn shift_date(
    reference_date: NaiveDate,
    amount: u32,
    unit: OffsetUnit,
    direction: Direction,
) -> Option<NaiveDate> {
    let amount = u64::from(amount);
    match (unit, direction) {
        (OffsetUnit::Day, Direction::Future) => reference_date.checked_add_days(Days::new(amount)),
        (OffsetUnit::Day, Direction::Past) => reference_date.checked_sub_days(Days::new(amount)),
        (OffsetUnit::Week, Direction::Future) => {
            reference_date.checked_add_days(Days::new(amount.checked_mul(7)?))
        }
        (OffsetUnit::Week, Direction::Past) => {
            reference_date.checked_sub_days(Days::new(amount.checked_mul(7)?))
        }
        (OffsetUnit::Month, Direction::Future) => {
            reference_date.checked_add_months(Months::new(u32::try_from(amount).ok()?))
        }
        (OffsetUnit::Month, Direction::Past) => {
            reference_date.checked_sub_months(Months::new(u32::try_from(amount).ok()?))
        }
        (OffsetUnit::Year, Direction::Future) => reference_date
            .checked_add_months(Months::new(u32::try_from(amount).ok()?.checked_mul(12)?)),
        (OffsetUnit::Year, Direction::Past) => reference_date
            .checked_sub_months(Months::new(u32::try_from(amount).ok()?.checked_mul(12)?)),
    }
}

fn shift_days(reference_date: NaiveDate, days: i64) -> Option<NaiveDate> {
    let magnitude = Days::new(days.unsigned_abs());
    if days < 0 {
        reference_date.checked_sub_days(magnitude)
    } else {
        reference_date.checked_add_days(magnitude)
    }
}

/// Month number for an English month name or its three-letter abbreviation.
pub fn month_from_name(name: &str) -> Option<u32> {
    let lower = name.trim_end_matches('.').to_ascii_lowercase();
    const MONTHS: [&str; 12] = [
        "january", "february", "march", "april", "may", "june", "july", "august", "september",
        "october", "november", "december",
    ];
    MONTHS
        .iter()
        .position(|m| *m == lower || (lower.len() >= 3 && m.starts_with(lower.as_str())))
        .map(|i| i as u32 + 1)
}

/// Gregorian year for a Japanese era year (`令和3年` → 2021). `元` is year one.
pub fn era_year(era: &str, year: &str) -> Option<i32> {
    let offset = match era {
        "令和" => 2018,
        "平成" => 1988,
        "昭和" => 1925,
        _ => return None,
    };
    let year: i32 = if year == "元" { 1 } else { year.parse().ok()? };
    (year > 0).then_some(offset + year)
}

/// Builds a date from parts where the year may be missing; the reference year fills it in.
pub fn date_from_parts(
    year: Option<i32>,
    month: u32,
    day: u32,
    reference_date: NaiveDate,
) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.unwrap_or(reference_date.year()), month, day)
}

/// Parses a string token into a specific time of day (`NaiveTime`).
///
/// This function is case-insensitive and understands several formats, processed in order:
/// 1.  **Keywords**: `morning` (08:00), `noon` (12:00), `evening` (18:00),
///     `night` (21:00), `midnight` (00:00) and their registered aliases.
/// 2.  **12-hour Format**: A time ending in `am` or `pm`, with optional minutes.
///     Examples: "6am", "6 pm", "12:30pm".
/// 3.  **Japanese clock times**: `15時`, `10時30分`, `3時半`, `午後3時`, `午前10時`.
/// 4.  **24-hour Format (HH:MM[:SS])**: e.g., "14:30", "08:00".
/// 5.  **24-hour Format (Hour only)**: A single integer from 0-23. e.g., "8", "17".
///
/// # Examples
///
/// ```
/// # use chrono::NaiveTime;
/// # use datespan_core::parse_input::parse_time_token;
/// let noon = parse_time_token("noon").unwrap();
/// assert_eq!(noon, NaiveTime::from_hms_opt(12, 0, 0).unwrap());
///
/// let six_thirty_pm = parse_time_token("6:30 pm").unwrap();
/// assert_eq!(six_thirty_pm, NaiveTime::from_hms_opt(18, 30, 0).unwrap());
///
/// let afternoon = parse_time_token("午後3時半").unwrap();
/// assert_eq!(afternoon, NaiveTime::from_hms_opt(15, 30, 0).unwrap());
/// ```
pub fn parse_time_token(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    if let Some(KeywordClass::TimeOfDay(h, m)) = Keywords::lookup(s).map(|k| k.class()) {
        return NaiveTime::from_hms_opt(h, m, 0);
    }

    let lower_s = s.to_ascii_lowercase();
    if lower_s.ends_with("am") || lower_s.ends_with("pm") {
        let (core_str, suffix) = lower_s.split_at(lower_s.len() - 2);
        let is_pm = suffix == "pm";
        let (h, m, sec) = split_clock(core_str.trim())?;
        if h == 0 || h > 12 || m > 59 || sec > 59 {
            return None;
        }
        let h24 = match (h, is_pm) {
            (12, false) => 0, // 12am is midnight
            (12, true) => 12, // 12pm is noon
            (_, true) => h + 12,
            (_, false) => h,
        };
        return NaiveTime::from_hms_opt(h24, m, sec);
    }

    if s.contains('時') {
        return parse_japanese_time(s);
    }

    // 24h: "HH:MM" or "HH:MM:SS"
    if s.contains(':') {
        let (h, m, sec) = split_clock(s)?;
        return NaiveTime::from_hms_opt(h, m, sec);
    }
    // Single hour (24h format implied): "H" or "HH"
    match s.parse::<u32>() {
        Ok(h) if h <= 23 => NaiveTime::from_hms_opt(h, 0, 0),
        _ => None,
    }
}

/// Splits `H[:MM[:SS]]` into its numeric parts.
fn split_clock(core: &str) -> Option<(u32, u32, u32)> {
    let mut parts = core.split(':');
    let h = parts.next()?.trim().parse::<u32>().ok()?;
    let m = match parts.next() {
        Some(m) if m.len() == 2 => m.parse::<u32>().ok()?,
        Some(_) => return None,
        None => 0,
    };
    let sec = match parts.next() {
        Some(sec) if sec.len() == 2 => sec.parse::<u32>().ok()?,
        Some(_) => return None,
        None => 0,
    };
    if parts.next().is_some() {
        return None;
    }
    Some((h, m, sec))
}

/// `[午前|午後]H時[MM分|半]`
fn parse_japanese_time(s: &str) -> Option<NaiveTime> {
    let (pm, rest) = if let Some(rest) = s.strip_prefix("午後") {
        (Some(true), rest)
    } else if let Some(rest) = s.strip_prefix("午前") {
        (Some(false), rest)
    } else {
        (None, s)
    };
    let (hour, minutes) = rest.split_once('時')?;
    let mut h: u32 = hour.trim().parse().ok()?;
    let m: u32 = match minutes.trim() {
        "" => 0,
        "半" => 30,
        other => other.strip_suffix('分')?.parse().ok()?,
    };
    match pm {
        Some(true) if h < 12 => h += 12,
        Some(false) if h == 12 => h = 0,
        Some(_) if h > 12 => return None,
        _ => {}
    }
    NaiveTime::from_hms_opt(h, m, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn opts(anchor: NaiveDate) -> Option<ParseOptions<'static>> {
        Some(ParseOptions {
            reference_date: Some(anchor),
            ..Default::default()
        })
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn relative_keywords() {
        let anchor = date(2025, 8, 15);
        assert_eq!(parse_date_token("today", opts(anchor)), Some(anchor));
        assert_eq!(parse_date_token("Yesterday", opts(anchor)), Some(date(2025, 8, 14)));
        assert_eq!(parse_date_token("tomorrow", opts(anchor)), Some(date(2025, 8, 16)));
        assert_eq!(parse_date_token("明後日", opts(anchor)), Some(date(2025, 8, 17)));
        assert_eq!(parse_date_token("一昨日", opts(anchor)), Some(date(2025, 8, 13)));
    }

    #[test]
    fn numeric_formats() {
        let anchor = date(2025, 8, 15);
        assert_eq!(parse_date_token("2025/08/01", opts(anchor)), Some(date(2025, 8, 1)));
        assert_eq!(parse_date_token("01/09/2025", opts(anchor)), Some(date(2025, 9, 1)));
        assert_eq!(parse_date_token("20250801", opts(anchor)), Some(date(2025, 8, 1)));
        assert_eq!(parse_date_token("2025-13-01", opts(anchor)), None);
    }

    #[test]
    fn custom_format_list_is_respected() {
        let anchor = date(2025, 8, 15);
        let fmts: &[&str] = &["%m/%d/%Y"];
        let custom = Some(ParseOptions {
            reference_date: Some(anchor),
            formats: Some(fmts),
        });
        assert_eq!(parse_date_token("01/09/2025", custom), Some(date(2025, 1, 9)));
    }

    #[test]
    fn natural_days_of_week() {
        // Anchor date is a Wednesday
        let anchor = date(2025, 8, 20);
        let p_opts = opts(anchor);

        assert_eq!(parse_date_token("monday", p_opts), Some(date(2025, 8, 18)));
        assert_eq!(parse_date_token("tuesday", p_opts), Some(date(2025, 8, 19)));
        // A day keyword matching the anchor date should return the anchor date
        assert_eq!(parse_date_token("wednesday", p_opts), Some(anchor));
        // Days from the "previous week" should resolve correctly
        assert_eq!(parse_date_token("thursday", p_opts), Some(date(2025, 8, 14)));
        assert_eq!(parse_date_token("金曜日", p_opts), Some(date(2025, 8, 15)));
        assert_eq!(parse_date_token("saturday", p_opts), Some(date(2025, 8, 16)));
        assert_eq!(parse_date_token("日曜", p_opts), Some(date(2025, 8, 17)));
    }

    #[test]
    fn vague_periods_do_not_resolve() {
        let anchor = date(2025, 8, 20);
        assert_eq!(parse_date_token("last month", opts(anchor)), None);
        assert_eq!(parse_date_token("来週", opts(anchor)), None);
        assert_eq!(parse_date_token("every day", opts(anchor)), None);
    }

    #[test]
    fn weekday_modifiers() {
        let wednesday = date(2025, 8, 20);
        assert_eq!(
            relative_weekday(wednesday, Weekday::Mon, Direction::Past),
            Some(date(2025, 8, 18))
        );
        assert_eq!(
            relative_weekday(wednesday, Weekday::Mon, Direction::Future),
            Some(date(2025, 8, 25))
        );
        assert_eq!(
            relative_weekday(wednesday, Weekday::Wed, Direction::Future),
            Some(date(2025, 8, 27))
        );
        assert_eq!(weekday_in_week(wednesday, Weekday::Mon), Some(date(2025, 8, 18)));
        assert_eq!(weekday_in_week(wednesday, Weekday::Sun), Some(date(2025, 8, 24)));
    }

    #[test]
    fn offsets() {
        let anchor = date(2025, 1, 31);
        assert_eq!(
            shift_date(anchor, 3, OffsetUnit::Day, Direction::Past),
            Some(date(2025, 1, 28))
        );
        assert_eq!(
            shift_date(anchor, 2, OffsetUnit::Week, Direction::Future),
            Some(date(2025, 2, 14))
        );
        assert_eq!(
            shift_date(anchor, 1, OffsetUnit::Month, Direction::Future),
            Some(date(2025, 2, 28))
        );
        assert_eq!(
            shift_date(anchor, 1, OffsetUnit::Year, Direction::Past),
            Some(date(2024, 1, 31))
        );
    }

    #[test]
    fn offset_units() {
        assert_eq!(OffsetUnit::from_word("days"), Some(OffsetUnit::Day));
        assert_eq!(OffsetUnit::from_word("Week"), Some(OffsetUnit::Week));
        assert_eq!(OffsetUnit::from_word("週間"), Some(OffsetUnit::Week));
        assert_eq!(OffsetUnit::from_word("ヶ月"), Some(OffsetUnit::Month));
        assert_eq!(OffsetUnit::from_word("年"), Some(OffsetUnit::Year));
        assert_eq!(OffsetUnit::from_word("hours"), None);
    }

    #[test]
    fn month_names() {
        assert_eq!(month_from_name("August"), Some(8));
        assert_eq!(month_from_name("aug"), Some(8));
        assert_eq!(month_from_name("Sept."), Some(9));
        assert_eq!(month_from_name("ma"), None);
        assert_eq!(month_from_name("augustus"), None);
    }

    #[test]
    fn japanese_eras() {
        assert_eq!(era_year("令和", "3"), Some(2021));
        assert_eq!(era_year("令和", "元"), Some(2019));
        assert_eq!(era_year("平成", "31"), Some(2019));
        assert_eq!(era_year("大正", "1"), None);
    }

    #[test]
    fn missing_year_comes_from_reference() {
        let anchor = date(2025, 8, 20);
        assert_eq!(date_from_parts(None, 7, 18, anchor), Some(date(2025, 7, 18)));
        assert_eq!(date_from_parts(Some(2021), 7, 18, anchor), Some(date(2021, 7, 18)));
        assert_eq!(date_from_parts(None, 2, 30, anchor), None);
    }

    #[test]
    fn time_token_parsing() {
        let t = |h, m| Some(NaiveTime::from_hms_opt(h, m, 0).unwrap());

        assert_eq!(parse_time_token("morning"), t(8, 0));
        assert_eq!(parse_time_token("noon"), t(12, 0));
        assert_eq!(parse_time_token("evening"), t(18, 0));
        assert_eq!(parse_time_token("night"), t(21, 0));
        assert_eq!(parse_time_token("midnight"), t(0, 0));
        assert_eq!(parse_time_token("正午"), t(12, 0));

        // 12-hour format
        assert_eq!(parse_time_token("5am"), t(5, 0));
        assert_eq!(parse_time_token("5pm"), t(17, 0));
        assert_eq!(parse_time_token("5:30am"), t(5, 30));
        assert_eq!(parse_time_token("5:30 pm"), t(17, 30));
        assert_eq!(parse_time_token("12am"), t(0, 0));
        assert_eq!(parse_time_token("12pm"), t(12, 0));
        assert_eq!(parse_time_token("5PM"), t(17, 0));
        assert_eq!(parse_time_token("12:45AM"), t(0, 45));

        // Japanese
        assert_eq!(parse_time_token("15時"), t(15, 0));
        assert_eq!(parse_time_token("10時30分"), t(10, 30));
        assert_eq!(parse_time_token("3時半"), t(3, 30));
        assert_eq!(parse_time_token("午後3時"), t(15, 0));
        assert_eq!(parse_time_token("午前12時"), t(0, 0));

        // 24-hour format
        assert_eq!(parse_time_token("08:00"), t(8, 0));
        assert_eq!(parse_time_token("23:59"), t(23, 59));
        assert_eq!(
            parse_time_token("23:59:30"),
            Some(NaiveTime::from_hms_opt(23, 59, 30).unwrap())
        );
        assert_eq!(parse_time_token("8"), t(8, 0));
        assert_eq!(parse_time_token("17"), t(17, 0));

        // Invalid
        assert!(parse_time_token("25:00").is_none());
        assert!(parse_time_token("13:00pm").is_none());
        assert!(parse_time_token("25時").is_none());
        assert!(parse_time_token("午後13時").is_none());
        assert!(parse_time_token("not-a-time").is_none());
    }
}
