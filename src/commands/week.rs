use anyhow::Result;
use chrono::NaiveDate;
use odc_core::date_range::week_start;
use odc_core::{CityFilter, PageDirection};
use owo_colors::OwoColorize;

use crate::backend::Backend;
use crate::render::Render;

pub async fn run(
    backend: &Backend,
    city: Option<CityFilter>,
    today: NaiveDate,
    date: NaiveDate,
    offset: i32,
) -> Result<()> {
    let mut state = super::calendar(backend, city, today).await;

    let weeks = (week_start(date) - week_start(today)).num_weeks() + i64::from(offset);
    let direction = if weeks < 0 {
        PageDirection::Previous
    } else {
        PageDirection::Next
    };
    for _ in 0..weeks.unsigned_abs() {
        state.page(direction);
    }

    let days = state.visible_days();
    if let (Some(first), Some(last)) = (days.first(), days.last()) {
        println!(
            "{}",
            format!("Week of {} to {}", first.date.format("%-d %b"), last.date.format("%-d %b %Y")).bold()
        );
    }
    super::print_scope(&state);
    println!();

    for card in &days {
        println!("  {}", card.render());
    }

    let today_list = state.today_occurrences();
    if state.window().contains(today) && !today_list.is_empty() {
        println!();
        println!("{}", "Today".bold());
        for occurrence in today_list {
            println!("  {}", occurrence.render());
        }
    }

    Ok(())
}
