use anyhow::Result;
use chrono::NaiveDate;
use odc_core::CityFilter;
use owo_colors::OwoColorize;

use crate::backend::Backend;
use crate::render::Render;

pub async fn run(backend: &Backend, city: Option<CityFilter>, today: NaiveDate, date: NaiveDate) -> Result<()> {
    let mut state = super::calendar(backend, city, today).await;
    let selection = state.select_date(date);

    println!("{}", selection.title.bold());
    super::print_scope(&state);
    println!();

    if selection.occurrences.is_empty() {
        println!("  {}", "Nothing scheduled".dimmed());
    }
    for occurrence in &selection.occurrences {
        println!("  {}", occurrence.render());
    }

    println!();
    println!("{}", "Coming up".bold());
    if selection.upcoming.is_empty() {
        println!("  {}", "No upcoming formations or events".dimmed());
    }
    for upcoming in &selection.upcoming {
        println!("  {}", upcoming.render());
    }

    Ok(())
}
