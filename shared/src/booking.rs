use chrono::{NaiveDate, NaiveDateTime, Timelike};
use crate::dates::{iso_from_date, week_of};
use crate::ReservationRules;

/// Stop counts from this value upward are labelled "N+"
pub const OPEN_ENDED_STOP_LABEL_FROM: u32 = 6;

/// Selectable day of the reservation week picker
#[derive(Debug, Clone, PartialEq)]
pub struct DayChip {
    pub date: NaiveDate,
    pub enabled: bool,
}

impl DayChip {
    /// Two-digit day of month shown on the chip
    pub fn label(&self) -> String {
        self.date.format("%d").to_string()
    }

    pub fn iso(&self) -> String {
        iso_from_date(self.date)
    }
}

/// Whether `day` can still be booked at local time `now`.
///
/// Past days never are. Today is bookable only when same-day booking is
/// allowed and the cutoff hour has not been reached.
pub fn chip_enabled(day: NaiveDate, now: NaiveDateTime, rules: &ReservationRules) -> bool {
    let today = now.date();
    if day == today {
        rules.allow_same_day && now.hour() < rules.same_day_cutoff_hour
    } else {
        day > today
    }
}

/// Chips for the Monday-first week containing `anchor`
pub fn day_chips(anchor: NaiveDate, now: NaiveDateTime, rules: &ReservationRules) -> Vec<DayChip> {
    week_of(anchor)
        .into_iter()
        .map(|date| DayChip {
            date,
            enabled: chip_enabled(date, now, rules),
        })
        .collect()
}

/// First chip a user may pick, selected when the modal opens
pub fn first_enabled(chips: &[DayChip]) -> Option<NaiveDate> {
    chips.iter().find(|chip| chip.enabled).map(|chip| chip.date)
}

#[derive(Debug, Clone, PartialEq)]
pub struct StopOption {
    pub value: u32,
    pub label: String,
}

/// Entries of the stop-count selector, from 1 to `max_visible`
pub fn stop_options(max_visible: u32) -> Vec<StopOption> {
    (1..=max_visible.max(1))
        .map(|value| StopOption {
            value,
            label: stop_label(value),
        })
        .collect()
}

fn stop_label(value: u32) -> String {
    if value >= OPEN_ENDED_STOP_LABEL_FROM {
        format!("{}+ arrêts", value)
    } else if value > 1 {
        format!("{} arrêts", value)
    } else {
        format!("{} arrêt", value)
    }
}
