//! Calendar controller.
//!
//! `CalendarState` owns everything the calendar page needs between user
//! actions: the loaded records, the active city filter, the derived index,
//! the week window and the selected day. Every mutation that changes the
//! inputs rebuilds the index and brings the window and selection back in
//! line with it.

use chrono::NaiveDate;
use tracing::info;

use crate::calendar_index::CalendarIndex;
use crate::city::CityFilter;
use crate::constants::UPCOMING_LIMIT;
use crate::event::Event;
use crate::formation::Formation;
use crate::occurrence::Occurrence;
use crate::upcoming::{Upcoming, upcoming};
use crate::week_window::{DayCard, PageDirection, WeekWindow};

/// Everything shown for one selected day.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySelection {
    pub date: NaiveDate,
    /// Long form of the date, e.g. "Monday 4 March 2024".
    pub title: String,
    pub occurrences: Vec<Occurrence>,
    /// Next occurrences strictly after `date`.
    pub upcoming: Vec<Upcoming>,
}

#[derive(Debug, Clone)]
pub struct CalendarState {
    formations: Vec<Formation>,
    events: Vec<Event>,
    city_filter: CityFilter,
    index: CalendarIndex,
    window: WeekWindow,
    today: NaiveDate,
    selected: NaiveDate,
}

impl CalendarState {
    /// Empty calendar showing the week of `today`.
    pub fn new(today: NaiveDate) -> Self {
        CalendarState {
            formations: Vec::new(),
            events: Vec::new(),
            city_filter: CityFilter::All,
            index: CalendarIndex::default(),
            window: WeekWindow::starting(today),
            today,
            selected: today,
        }
    }

    pub fn with_records(today: NaiveDate, formations: Vec<Formation>, events: Vec<Event>) -> Self {
        let mut state = Self::new(today);
        state.regenerate(formations, events);
        state
    }

    /// Replace the records and rebuild the calendar.
    ///
    /// The window goes back to the current week and today becomes the
    /// selected day.
    pub fn regenerate(&mut self, formations: Vec<Formation>, events: Vec<Event>) {
        self.formations = formations;
        self.events = events;
        self.rebuild();
    }

    /// Restrict the calendar to one city, or show all of them again.
    pub fn filter_by_city(&mut self, filter: CityFilter) {
        self.city_filter = filter;
        self.rebuild();
    }

    fn rebuild(&mut self) {
        self.index = CalendarIndex::build_for(&self.formations, &self.events, self.city_filter);
        self.window.reset(self.today);
        self.selected = self.today;

        info!(
            formations = self.formations.len(),
            events = self.events.len(),
            city = %self.city_filter,
            days = self.index.len(),
            skipped = self.index.skipped().len(),
            "calendar regenerated"
        );
    }

    /// Select `date` and return what should be shown for it.
    pub fn select_date(&mut self, date: NaiveDate) -> DaySelection {
        self.selected = date;
        self.selection()
    }

    /// What is shown for the currently selected day.
    pub fn selection(&self) -> DaySelection {
        let date = self.selected;
        DaySelection {
            date,
            title: date.format("%A %-d %B %Y").to_string(),
            occurrences: self.index.on(date).to_vec(),
            upcoming: self.upcoming_after(date),
        }
    }

    pub fn page(&mut self, direction: PageDirection) {
        self.window.page(direction);
    }

    pub fn reset(&mut self) {
        self.window.reset(self.today);
    }

    pub fn visible_days(&self) -> Vec<DayCard> {
        self.window.visible_days(&self.index, self.today)
    }

    pub fn today_occurrences(&self) -> &[Occurrence] {
        self.index.on(self.today)
    }

    pub fn upcoming_after(&self, date: NaiveDate) -> Vec<Upcoming> {
        upcoming(&self.index, date, UPCOMING_LIMIT)
    }

    /// Move "today" forward (e.g. after midnight). The index is unchanged.
    pub fn set_today(&mut self, today: NaiveDate) {
        self.today = today;
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.selected
    }

    pub fn window(&self) -> WeekWindow {
        self.window
    }

    pub fn city_filter(&self) -> CityFilter {
        self.city_filter
    }

    pub fn index(&self) -> &CalendarIndex {
        &self.index
    }

    pub fn formations(&self) -> &[Formation] {
        &self.formations
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }
}
