use chrono::{NaiveDate, NaiveDateTime};
use js_sys::Date;

/// Current local wall-clock time, read from the browser's calendar fields
pub fn now_local() -> NaiveDateTime {
    let now = Date::new_0();
    NaiveDate::from_ymd_opt(now.get_full_year() as i32, now.get_month() + 1, now.get_date())
        .and_then(|date| date.and_hms_opt(now.get_hours(), now.get_minutes(), now.get_seconds()))
        .unwrap_or_else(|| chrono::Local::now().naive_local())
}

/// Today's local calendar date
pub fn today() -> NaiveDate {
    now_local().date()
}
