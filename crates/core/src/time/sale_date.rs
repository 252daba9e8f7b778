use chrono::{DateTime, Duration, NaiveDate, Utc};

pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Sale date offered before the user touches the date field: tomorrow, on the UTC calendar.
pub fn default_sale_date(now_utc: DateTime<Utc>) -> NaiveDate {
    now_utc.date_naive() + Duration::days(1)
}

pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), ISO_DATE_FORMAT).ok()
}

/// Human-readable form used in headings, e.g. `Mon Jan 01 2024`.
///
/// Strings that are not `YYYY-MM-DD` are returned unchanged.
pub fn display_date(date: &str) -> String {
    match parse_iso_date(date) {
        Some(d) => d.format("%a %b %d %Y").to_string(),
        None => date.to_string(),
    }
}
