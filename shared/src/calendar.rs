use chrono::{Datelike, NaiveDate};
use crate::dates::{self, DateError};
use crate::sequence::{RequestSequence, RequestTicket};
use crate::AvailabilityMap;

/// Month currently shown by the calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayedMonth {
    pub year: i32,
    /// 1-based month
    pub month: u32,
}

impl DisplayedMonth {
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Move by whole months, rolling the year over in both directions
    pub fn shift(self, delta: i32) -> Self {
        let index = self.year * 12 + (self.month as i32 - 1) + delta;
        Self {
            year: index.div_euclid(12),
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    /// First day of the month, used as the availability query anchor
    pub fn anchor(self) -> Result<NaiveDate, DateError> {
        dates::first_of_month(self.year, self.month)
    }

    pub fn title(self) -> String {
        dates::format_month_title_fr(self.year, self.month)
    }
}

/// One day cell of the month grid
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarCell {
    pub day: u32,
    pub date: NaiveDate,
    pub available: bool,
    pub is_today: bool,
}

impl CalendarCell {
    pub fn iso(&self) -> String {
        dates::iso_from_date(self.date)
    }
}

/// Monday-first layout of a month
#[derive(Debug, Clone, PartialEq)]
pub struct MonthGrid {
    pub month: DisplayedMonth,
    /// Blank cells before the 1st
    pub leading_blanks: u32,
    pub cells: Vec<CalendarCell>,
}

impl MonthGrid {
    /// Lay out `month`; days missing from `availability` are unavailable.
    pub fn build(
        month: DisplayedMonth,
        availability: &AvailabilityMap,
        today: NaiveDate,
    ) -> Result<Self, DateError> {
        let first = month.anchor()?;
        // Sunday lands in the last column
        let leading_blanks = first.weekday().num_days_from_monday();
        let length = dates::days_in_month(month.year, month.month)?;

        let cells = first
            .iter_days()
            .take(length as usize)
            .map(|date| CalendarCell {
                day: date.day(),
                date,
                available: availability.get(&date).copied().unwrap_or(false),
                is_today: date == today,
            })
            .collect();

        Ok(Self {
            month,
            leading_blanks,
            cells,
        })
    }

    pub fn title(&self) -> String {
        self.month.title()
    }
}

/// Availability fetch issued for one month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRequest {
    pub ticket: RequestTicket,
    pub month: DisplayedMonth,
}

/// Month navigation of the calendar.
///
/// `shown` is the month whose availability is on screen. `target` is the
/// month of the latest request. The grid only moves to `target` once its
/// availability has arrived; a failed fetch leaves `shown` untouched.
#[derive(Debug)]
pub struct MonthNavigator {
    shown: DisplayedMonth,
    target: DisplayedMonth,
    sequence: RequestSequence,
}

impl MonthNavigator {
    pub fn new(month: DisplayedMonth) -> Self {
        Self {
            shown: month,
            target: month,
            sequence: RequestSequence::new(),
        }
    }

    pub fn shown(&self) -> DisplayedMonth {
        self.shown
    }

    pub fn target(&self) -> DisplayedMonth {
        self.target
    }

    /// Request the month `delta` months away from the latest request
    pub fn navigate(&mut self, delta: i32) -> MonthRequest {
        self.target = self.target.shift(delta);
        self.request()
    }

    /// Request the latest target again
    pub fn refresh(&mut self) -> MonthRequest {
        self.request()
    }

    /// Record a successful reply. Returns false for a stale request.
    pub fn accept(&mut self, request: MonthRequest) -> bool {
        if !self.sequence.is_latest(request.ticket) {
            return false;
        }
        self.shown = request.month;
        true
    }

    /// Record a failed reply; navigation falls back to the month on screen.
    /// Returns false for a stale request.
    pub fn reject(&mut self, request: MonthRequest) -> bool {
        if !self.sequence.is_latest(request.ticket) {
            return false;
        }
        self.target = self.shown;
        true
    }

    fn request(&mut self) -> MonthRequest {
        MonthRequest {
            ticket: self.sequence.issue(),
            month: self.target,
        }
    }
}
