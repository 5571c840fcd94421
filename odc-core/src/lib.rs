//! Core types for the ODC admin tools.
//!
//! This crate provides the pieces shared by the `odc-admin` CLI and the
//! storage providers:
//! - `Formation`, `Event` and `City` records as stored by the backend
//! - the calendar core: date expansion, the calendar index, the week window
//!   and the upcoming-occurrence list
//! - `CalendarState`, the controller that owns calendar/filter/navigation state
//! - the `RecordStore` and `ImageStore` seams implemented by providers

pub mod calendar;
pub mod calendar_index;
pub mod city;
pub mod config;
pub mod constants;
pub mod dashboard;
pub mod date_range;
pub mod error;
pub mod event;
pub mod filter;
pub mod formation;
pub mod image;
pub mod occurrence;
pub mod store;
pub mod upcoming;
pub mod validation;
pub mod week_window;

pub mod wire;

#[cfg(test)]
mod fixtures;

pub use calendar::{CalendarState, DaySelection};
pub use calendar_index::{CalendarIndex, SkippedRecord};
pub use city::{City, CityFilter};
pub use config::{AdminConfig, SupabaseConfig};
pub use dashboard::{DashboardStats, RecordRef};
pub use error::{OdcError, OdcResult};
pub use event::{Event, EventStatus};
pub use filter::{FilterSummary, FormationFilter};
pub use formation::{Formation, FormationCategory, FormationStatus};
pub use image::{ImageFolder, ImageStore, ImageUpload, StoredImage};
pub use occurrence::{Occurrence, OccurrenceKind, OccurrenceSource};
pub use store::{LocalStore, RecordStore, Records};
pub use validation::{EventDraft, FormationDraft};
pub use week_window::{DayCard, OccurrenceCount, PageDirection, WeekWindow};
