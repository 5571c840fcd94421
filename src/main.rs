mod backend;
mod commands;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use odc_core::date_range::parse_date;
use odc_core::image::ImageFolder;
use odc_core::wire;
use odc_core::{City, CityFilter, EventStatus, FormationCategory, FormationFilter, FormationStatus};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use backend::Backend;
use commands::events::EventChanges;
use commands::formations::FormationChanges;

#[derive(Parser)]
#[command(name = "odc-admin")]
#[command(about = "Manage Orange Digital Center formations and events, and browse the calendar")]
struct Cli {
    /// Only show one city in calendar views (rabat, agadir, benmisk, sidimaarouf or all)
    #[arg(long, global = true)]
    city: Option<CityFilter>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a week of the calendar with per-day counts
    Week {
        /// Any day of the week to show (YYYY-MM-DD, defaults to today)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,

        /// Weeks to move from there (e.g. 1 for next week, -1 for last week)
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        offset: i32,
    },
    /// List what happens on one day, and what comes next
    Day {
        /// Day to show (YYYY-MM-DD, defaults to today)
        #[arg(value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Next formations and events after a day, one entry each
    Upcoming {
        /// Reference day (YYYY-MM-DD, defaults to today)
        #[arg(long, value_parser = parse_date)]
        from: Option<NaiveDate>,
    },
    /// Totals, recent activity and upcoming records
    Dashboard,
    /// Manage formations
    Formations {
        #[command(subcommand)]
        command: FormationCommands,
    },
    /// Manage events
    Events {
        #[command(subcommand)]
        command: EventCommands,
    },
    /// Upload or remove images
    Image {
        #[command(subcommand)]
        command: ImageCommands,
    },
    /// Check configuration, backend connectivity and data quality
    Check,
    /// Show paths and centers, or change the default city
    Config {
        /// City the calendar views start on (a city name, or all)
        #[arg(long, value_name = "CITY")]
        default_city: Option<CityFilter>,
    },
}

#[derive(Subcommand)]
enum FormationCommands {
    /// List formations, optionally filtered
    List {
        /// Case-insensitive text to look for in title, description and city
        #[arg(short, long)]
        search: Option<String>,

        /// ecole-du-code or fablab
        #[arg(long)]
        category: Option<FormationCategory>,

        /// Print the matching records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a formation
    Add {
        title: String,

        #[arg(long)]
        category: FormationCategory,

        /// City whose center hosts it (rabat, agadir, benmisk, sidimaarouf)
        #[arg(long, value_name = "CITY")]
        center: City,

        /// First day (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        start: NaiveDate,

        /// Last day, defaults to the first
        #[arg(long, value_parser = parse_date)]
        end: Option<NaiveDate>,

        /// Daily start time (HH:MM)
        #[arg(long, value_parser = parse_time)]
        from: NaiveTime,

        /// Daily end time (HH:MM)
        #[arg(long, value_parser = parse_time)]
        to: NaiveTime,

        #[arg(long)]
        max_participants: u32,

        #[arg(short, long, default_value = "")]
        description: String,

        /// Defaults to the city's center
        #[arg(short, long)]
        location: Option<String>,

        #[arg(long)]
        registration_link: Option<String>,

        #[arg(long)]
        status: Option<FormationStatus>,

        /// Image file to upload
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Change fields of a formation
    Edit {
        id: String,

        #[command(flatten)]
        changes: FormationChanges,
    },
    /// Delete a formation and its image
    Delete { id: String },
}

#[derive(Subcommand)]
enum EventCommands {
    /// List events
    List {
        #[arg(long)]
        json: bool,
    },
    /// Create an event
    Add {
        title: String,

        /// City whose center hosts it (rabat, agadir, benmisk, sidimaarouf)
        #[arg(long, value_name = "CITY")]
        center: City,

        /// Day of the event (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        date: NaiveDate,

        #[arg(long, value_parser = parse_time)]
        from: NaiveTime,

        #[arg(long, value_parser = parse_time)]
        to: NaiveTime,

        #[arg(short, long)]
        description: String,

        #[arg(short, long)]
        location: String,

        /// e.g. workshop, conference, hackathon
        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        speaker: Option<String>,

        #[arg(long)]
        max_participants: Option<u32>,

        /// Price in MAD
        #[arg(long)]
        price: Option<u32>,

        #[arg(long)]
        status: Option<EventStatus>,

        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Change fields of an event
    Edit {
        id: String,

        #[command(flatten)]
        changes: EventChanges,
    },
    /// Delete an event and its image
    Delete { id: String },
}

#[derive(Subcommand)]
enum ImageCommands {
    /// Upload an image and print the reference to store on a record
    Upload {
        file: PathBuf,

        /// formations or events
        #[arg(long, default_value = "formations", value_parser = parse_folder)]
        folder: ImageFolder,
    },
    /// Delete an uploaded image by its URL
    Remove { reference: String },
}

fn parse_time(s: &str) -> Result<NaiveTime, String> {
    wire::time::parse(s).ok_or_else(|| format!("Invalid time '{}'. Expected HH:MM", s))
}

fn parse_folder(s: &str) -> Result<ImageFolder, String> {
    match s {
        "formations" => Ok(ImageFolder::Formations),
        "events" => Ok(ImageFolder::Events),
        other => Err(format!("Unknown folder '{}'. Expected formations or events", other)),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let today = chrono::Local::now().date_naive();

    let backend = Backend::load()?;
    let city = cli.city.or_else(|| backend.default_city().map(CityFilter::Only));

    match cli.command {
        Commands::Week { date, offset } => {
            commands::week::run(&backend, city, today, date.unwrap_or(today), offset).await
        }
        Commands::Day { date } => commands::day::run(&backend, city, today, date.unwrap_or(today)).await,
        Commands::Upcoming { from } => {
            commands::upcoming::run(&backend, city, today, from.unwrap_or(today)).await
        }
        Commands::Dashboard => commands::dashboard::run(&backend, today).await,
        Commands::Formations { command } => match command {
            FormationCommands::List { search, category, json } => {
                let filter = FormationFilter {
                    search: search.unwrap_or_default(),
                    category,
                    city: match city {
                        Some(CityFilter::Only(c)) => Some(c),
                        _ => None,
                    },
                };
                commands::formations::list(&backend, &filter, json).await
            }
            FormationCommands::Add {
                title,
                category,
                center,
                start,
                end,
                from,
                to,
                max_participants,
                description,
                location,
                registration_link,
                status,
                image,
            } => {
                let draft = odc_core::FormationDraft {
                    title,
                    category,
                    description,
                    date_start: Some(start),
                    date_end: end,
                    time_start: Some(from),
                    time_end: Some(to),
                    city: center,
                    location,
                    image: None,
                    max_participants: Some(max_participants),
                    registration_link,
                    status,
                };
                commands::formations::add(&backend, draft, image).await
            }
            FormationCommands::Edit { id, changes } => {
                commands::formations::edit(&backend, &id, changes).await
            }
            FormationCommands::Delete { id } => commands::formations::delete(&backend, &id).await,
        },
        Commands::Events { command } => match command {
            EventCommands::List { json } => commands::events::list(&backend, city, json).await,
            EventCommands::Add {
                title,
                center,
                date,
                from,
                to,
                description,
                location,
                category,
                speaker,
                max_participants,
                price,
                status,
                image,
            } => {
                let draft = odc_core::EventDraft {
                    title,
                    category,
                    description,
                    date_start: Some(date),
                    time_start: Some(from),
                    time_end: Some(to),
                    city: center,
                    location: Some(location),
                    image: None,
                    speaker,
                    max_participants,
                    price,
                    status,
                };
                commands::events::add(&backend, draft, image).await
            }
            EventCommands::Edit { id, changes } => {
                commands::events::edit(&backend, &id, changes).await
            }
            EventCommands::Delete { id } => commands::events::delete(&backend, &id).await,
        },
        Commands::Image { command } => match command {
            ImageCommands::Upload { file, folder } => commands::image::upload(&backend, &file, folder).await,
            ImageCommands::Remove { reference } => commands::image::remove(&backend, &reference).await,
        },
        Commands::Check => commands::check::run(&backend, today).await,
        Commands::Config { default_city } => commands::config::run(&backend, default_city),
    }
}
