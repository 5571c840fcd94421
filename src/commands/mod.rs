pub mod check;
pub mod config;
pub mod dashboard;
pub mod day;
pub mod events;
pub mod formations;
pub mod image;
pub mod upcoming;
pub mod week;

use chrono::NaiveDate;
use odc_core::{CalendarState, CityFilter};
use owo_colors::OwoColorize;

use crate::backend::Backend;

/// Load records and build the calendar for `today`, scoped to `city`.
async fn calendar(backend: &Backend, city: Option<CityFilter>, today: NaiveDate) -> CalendarState {
    let records = backend.load_records().await;
    let mut state = CalendarState::with_records(today, records.formations, records.events);
    if let Some(city) = city {
        state.filter_by_city(city);
    }
    state
}

fn print_scope(state: &CalendarState) {
    println!("{}", format!("Showing {}", state.city_filter()).dimmed());
}
