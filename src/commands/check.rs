use anyhow::Result;
use chrono::NaiveDate;
use odc_core::config::AdminConfig;
use odc_core::CalendarState;
use owo_colors::OwoColorize;

use crate::backend::{Backend, Store};
use crate::render::Render;

pub async fn run(backend: &Backend, today: NaiveDate) -> Result<()> {
    println!("{}", "Configuration".bold());
    println!("  {:<10} {}", "file", AdminConfig::config_path()?.display());
    println!("  {:<10} {}", "store", backend.describe());
    if let Some(city) = backend.default_city() {
        println!("  {:<10} {}", "city", city);
    }

    if let Store::Supabase(supabase) = backend.store() {
        println!();
        println!("{}", "Supabase".bold());
        match supabase.test_connection().await {
            Ok(()) => println!("  {} REST API reachable", "✓".green()),
            Err(e) => println!("  {} REST API: {:#}", "✗".red(), e),
        }
        match supabase.bucket_exists().await {
            Ok(true) => println!("  {} bucket '{}' exists", "✓".green(), supabase.bucket()),
            Ok(false) => println!(
                "  {} bucket '{}' not found; images will be stored inline",
                "!".yellow(),
                supabase.bucket()
            ),
            Err(e) => println!("  {} bucket lookup: {:#}", "✗".red(), e),
        }
    }

    let records = backend.load_records().await;
    let rejected = records.rejected;
    let state = CalendarState::with_records(today, records.formations, records.events);
    let index = state.index();

    println!();
    println!("{}", "Records".bold());
    println!(
        "  {} formations, {} events, {} calendar days",
        state.formations().len(),
        state.events().len(),
        index.len()
    );

    if !rejected.is_empty() {
        println!("  {} could not be read:", "!".yellow());
        for row in &rejected {
            println!("    {}", row.render());
        }
    }

    if index.skipped().is_empty() && rejected.is_empty() {
        println!("  {} every record is on the calendar", "✓".green());
    } else if !index.skipped().is_empty() {
        println!("  {} left out of the calendar:", "!".yellow());
        for skipped in index.skipped() {
            println!("    {}", skipped.render());
        }
    }

    Ok(())
}
