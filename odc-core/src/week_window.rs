//! Rolling seven-day window over the calendar, anchored on Mondays.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::calendar_index::CalendarIndex;
use crate::constants::WEEK_LENGTH;
use crate::date_range::week_start;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDirection {
    Previous,
    Next,
}

impl PageDirection {
    fn sign(&self) -> i64 {
        match self {
            PageDirection::Previous => -1,
            PageDirection::Next => 1,
        }
    }
}

/// The week currently shown. The anchor is always a Monday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    anchor: NaiveDate,
}

impl WeekWindow {
    /// Window for the week containing `day`.
    pub fn starting(day: NaiveDate) -> Self {
        WeekWindow {
            anchor: week_start(day),
        }
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    /// Move one week back or forward.
    pub fn page(&mut self, direction: PageDirection) {
        self.anchor = week_start(self.anchor + Duration::days(direction.sign() * WEEK_LENGTH));
    }

    /// Back to the week containing `today`.
    pub fn reset(&mut self, today: NaiveDate) {
        self.anchor = week_start(today);
    }

    /// The seven dates of the window, Monday first.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        self.anchor.iter_days().take(WEEK_LENGTH as usize)
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        week_start(day) == self.anchor
    }

    /// Day cards for the window, with occurrence counts from `index`.
    pub fn visible_days(&self, index: &CalendarIndex, today: NaiveDate) -> Vec<DayCard> {
        self.dates()
            .map(|date| DayCard::new(date, today, index.count_on(date)))
            .collect()
    }
}

/// How many occurrences fall on a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccurrenceCount {
    None,
    One,
    Many(usize),
}

impl From<usize> for OccurrenceCount {
    fn from(n: usize) -> Self {
        match n {
            0 => OccurrenceCount::None,
            1 => OccurrenceCount::One,
            n => OccurrenceCount::Many(n),
        }
    }
}

impl fmt::Display for OccurrenceCount {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OccurrenceCount::None => write!(f, "no events"),
            OccurrenceCount::One => write!(f, "1 event"),
            OccurrenceCount::Many(n) => write!(f, "{} events", n),
        }
    }
}

/// One date of the week window, as shown on a date card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCard {
    pub date: NaiveDate,
    pub is_today: bool,
    pub count: OccurrenceCount,
    /// Short month, with the year when it is not the current one ("Mar", "Jan 2025").
    pub month_label: String,
}

impl DayCard {
    fn new(date: NaiveDate, today: NaiveDate, count: usize) -> Self {
        let month_label = if date.year() == today.year() {
            date.format("%b").to_string()
        } else {
            date.format("%b %Y").to_string()
        };
        DayCard {
            date,
            is_today: date == today,
            count: count.into(),
            month_label,
        }
    }

    pub fn day_of_month(&self) -> u32 {
        self.date.day()
    }

    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }

    /// "Today", or the short weekday name ("Mon").
    pub fn weekday_label(&self) -> String {
        if self.is_today {
            "Today".to_string()
        } else {
            self.date.format("%a").to_string()
        }
    }
}
