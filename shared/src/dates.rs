//! Calendar-date helpers.
//!
//! Every comparison in the widget happens on calendar dates (`NaiveDate`).
//! Instants are reduced to the date they fall on in their own timezone
//! before use, so an offset or a daylight-saving shift never moves a day.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone};

const MONTH_NAMES_FR: [&str; 12] = [
    "janvier", "février", "mars", "avril", "mai", "juin",
    "juillet", "août", "septembre", "octobre", "novembre", "décembre",
];

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DateError {
    #[error("Malformed ISO date: {0:?}")]
    Malformed(String),
    #[error("Month out of range: {0}")]
    InvalidMonth(u32),
}

/// Format a date as `YYYY-MM-DD`
pub fn iso_from_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a strict `YYYY-MM-DD` string
pub fn date_from_iso(iso: &str) -> Result<NaiveDate, DateError> {
    let trimmed = iso.trim();
    if trimmed.len() != 10 {
        return Err(DateError::Malformed(iso.to_string()));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| DateError::Malformed(iso.to_string()))
}

/// Calendar date of an instant in its own timezone
pub fn local_date<Tz: TimeZone>(instant: &DateTime<Tz>) -> NaiveDate {
    instant.date_naive()
}

pub fn same_day<A: TimeZone, B: TimeZone>(a: &DateTime<A>, b: &DateTime<B>) -> bool {
    local_date(a) == local_date(b)
}

/// Monday-first week containing `anchor`
pub fn week_of(anchor: NaiveDate) -> [NaiveDate; 7] {
    let monday = anchor - Duration::days(i64::from(anchor.weekday().num_days_from_monday()));
    std::array::from_fn(|offset| monday + Duration::days(offset as i64))
}

pub fn first_of_month(year: i32, month: u32) -> Result<NaiveDate, DateError> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or(DateError::InvalidMonth(month))
}

/// Number of days in a month: the day before the first of the next month
pub fn days_in_month(year: i32, month: u32) -> Result<u32, DateError> {
    let first = first_of_month(year, month)?;
    let next = if month == 12 {
        first_of_month(year + 1, 1)?
    } else {
        first_of_month(year, month + 1)?
    };
    Ok((next - Duration::days(1)).day())
}

pub fn month_name_fr(month: u32) -> &'static str {
    MONTH_NAMES_FR
        .get(month.wrapping_sub(1) as usize)
        .copied()
        .unwrap_or("janvier")
}

/// e.g. "octobre 2026"
pub fn format_month_title_fr(year: i32, month: u32) -> String {
    format!("{} {}", month_name_fr(month), year)
}

/// e.g. "17 octobre"
pub fn format_day_month_fr(date: NaiveDate) -> String {
    format!("{} {}", date.day(), month_name_fr(date.month()))
}

/// Amount with two decimals and a trailing euro sign, e.g. "12.50 €"
pub fn format_euros(amount: f64) -> String {
    format!("{:.2} €", amount)
}

/// French currency rendering, e.g. "12,50 €"
pub fn format_euros_fr(amount: f64) -> String {
    format!("{:.2}\u{a0}€", amount).replace('.', ",")
}
