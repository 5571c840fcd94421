use anyhow::{Context, Result};
use odc_core::config::AdminConfig;
use odc_core::{City, CityFilter};
use owo_colors::OwoColorize;

use crate::backend::Backend;

pub fn run(backend: &Backend, default_city: Option<CityFilter>) -> Result<()> {
    let config_path = AdminConfig::config_path()?;

    if let Some(choice) = default_city {
        let city = match choice {
            CityFilter::All => None,
            CityFilter::Only(city) => Some(city),
        };
        AdminConfig::set_default_city(&config_path, city)
            .with_context(|| format!("Failed to update {}", config_path.display()))?;
        println!("{} Calendar views now start on {}", "✓".green(), choice);
        println!();
    }

    println!("{}", "Paths".bold());
    println!("  Config:   {}", config_path.display());
    println!("  Records:  {}", backend.config().display_data_path().display());
    println!("  Store:    {}", backend.describe());

    println!();
    println!("{}", "Centers".bold());
    for city in City::ALL {
        println!(
            "  {:<12} {:<18} {}",
            city.as_str(),
            city.center_name(),
            city.center_address().dimmed()
        );
    }

    Ok(())
}
