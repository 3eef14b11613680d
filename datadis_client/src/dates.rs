//! Date helpers for the Datadis wire format.
//!
//! The service speaks Spanish-locale calendar dates without a timezone, so
//! everything here works on naive dates and treats them as local civil time.
//! Parsing never fails loudly: a malformed or missing value yields `None`.

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};

/// Accepted date layouts, tried in order. Upstream payloads use the first;
/// the second is the `day/month/year` locale form.
const DATE_FORMATS: [&str; 2] = ["%Y/%m/%d", "%d/%m/%Y"];

const TIME_FORMAT: &str = "%H:%M";

/// Query parameter layout for date-ranged endpoints (month granularity).
const MONTH_FORMAT: &str = "%Y/%m";

/// Parses a calendar date in any of the accepted layouts.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Combines a date string and an `HH:mm` time string into a timestamp.
///
/// The service labels the last hourly block of a day `24:00`; that label rolls
/// over to `00:00` of the next day.
pub fn parse_date_time(date: &str, time: &str) -> Option<NaiveDateTime> {
    let date = parse_date(date)?;
    let time = time.trim();

    if time == "24:00" {
        let next = date.checked_add_days(Days::new(1))?;
        return Some(next.and_time(NaiveTime::MIN));
    }

    NaiveTime::parse_from_str(time, TIME_FORMAT)
        .ok()
        .map(|t| date.and_time(t))
}

/// Formats a date as the `YYYY/MM` value the ranged endpoints expect.
/// The day of month is discarded.
pub fn format_month(date: NaiveDate) -> String {
    date.format(MONTH_FORMAT).to_string()
}
