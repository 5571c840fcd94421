use anyhow::Result;
use chrono::NaiveDate;
use odc_core::CityFilter;
use owo_colors::OwoColorize;

use crate::backend::Backend;
use crate::render::Render;

pub async fn run(backend: &Backend, city: Option<CityFilter>, today: NaiveDate, from: NaiveDate) -> Result<()> {
    let state = super::calendar(backend, city, today).await;
    let upcoming = state.upcoming_after(from);

    if upcoming.is_empty() {
        println!("{}", format!("Nothing scheduled after {}", from).dimmed());
        return Ok(());
    }

    println!("{}", format!("After {}", from.format("%A %-d %B %Y")).bold());
    super::print_scope(&state);
    for entry in &upcoming {
        println!("  {}", entry.render());
    }

    Ok(())
}
