use anyhow::Result;
use chrono::NaiveDate;
use odc_core::constants::{RECENT_ACTIVITY_LIMIT, UPCOMING_LIMIT};
use odc_core::dashboard::{recent_activity, upcoming_records, DashboardStats};
use owo_colors::OwoColorize;

use crate::backend::Backend;
use crate::render::Render;

pub async fn run(backend: &Backend, today: NaiveDate) -> Result<()> {
    let records = backend.load_records().await;
    let (formations, events) = (&records.formations, &records.events);

    let stats = DashboardStats::compute(formations, events);
    println!("{}", "Dashboard".bold());
    println!("  {:<20} {}", "Active formations", stats.active_formations.bold());
    println!("  {:<20} {}", "Open events", stats.open_events.bold());
    println!("  {:<20} {}", "Participants", stats.participants.bold());

    println!();
    println!("{}", "Recent activity".bold());
    let recent = recent_activity(formations, events, RECENT_ACTIVITY_LIMIT);
    if recent.is_empty() {
        println!("  {}", "No records yet".dimmed());
    }
    for record in &recent {
        println!("  {}", record.render());
    }

    println!();
    println!("{}", "Upcoming".bold());
    let upcoming = upcoming_records(formations, events, today, UPCOMING_LIMIT);
    if upcoming.is_empty() {
        println!("  {}", "Nothing scheduled".dimmed());
    }
    for record in &upcoming {
        println!("  {}", record.render());
    }

    Ok(())
}
