use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use clap::Args;
use odc_core::date_range::parse_date;
use odc_core::image::ImageFolder;
use odc_core::{City, CityFilter, Event, EventDraft, EventStatus, OdcError};
use owo_colors::OwoColorize;
use tracing::warn;

use crate::backend::Backend;
use crate::parse_time;
use crate::render::Render;

/// Fields to change on a stored event. Anything not given keeps its value.
#[derive(Args, Debug, Default)]
pub struct EventChanges {
    #[arg(long)]
    pub title: Option<String>,

    /// City whose center hosts it (rabat, agadir, benmisk, sidimaarouf)
    #[arg(long, value_name = "CITY")]
    pub center: Option<City>,

    /// Day of the event (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    #[arg(long, value_parser = parse_time)]
    pub from: Option<NaiveTime>,

    #[arg(long, value_parser = parse_time)]
    pub to: Option<NaiveTime>,

    #[arg(short, long)]
    pub description: Option<String>,

    #[arg(short, long)]
    pub location: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub speaker: Option<String>,

    #[arg(long)]
    pub max_participants: Option<u32>,

    /// Price in MAD
    #[arg(long)]
    pub price: Option<u32>,

    #[arg(long)]
    pub status: Option<EventStatus>,

    /// Image file replacing the current one
    #[arg(long)]
    pub image: Option<PathBuf>,
}

impl EventChanges {
    /// Write the given fields into `draft`. Returns the new image file, if any.
    fn apply(self, draft: &mut EventDraft) -> Option<PathBuf> {
        if let Some(title) = self.title {
            draft.title = title;
        }
        if let Some(city) = self.center {
            draft.city = city;
        }
        if self.date.is_some() {
            draft.date_start = self.date;
        }
        if self.from.is_some() {
            draft.time_start = self.from;
        }
        if self.to.is_some() {
            draft.time_end = self.to;
        }
        if let Some(description) = self.description {
            draft.description = description;
        }
        if self.location.is_some() {
            draft.location = self.location;
        }
        if self.category.is_some() {
            draft.category = self.category;
        }
        if self.speaker.is_some() {
            draft.speaker = self.speaker;
        }
        if self.max_participants.is_some() {
            draft.max_participants = self.max_participants;
        }
        if self.price.is_some() {
            draft.price = self.price;
        }
        if self.status.is_some() {
            draft.status = self.status;
        }
        self.image
    }
}

pub async fn list(backend: &Backend, city: Option<CityFilter>, json: bool) -> Result<()> {
    let events = backend.records().fetch_events().await?;
    let city = city.unwrap_or_default();
    let shown: Vec<_> = events.iter().filter(|e| city.matches(e.city)).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&shown)?);
        return Ok(());
    }

    println!("{}", format!("{} of {} events ({})", shown.len(), events.len(), city).dimmed());
    for event in shown {
        println!("  {}", event.render());
    }
    Ok(())
}

/// Save `event`. If that fails, an image uploaded for it is removed again.
async fn save(backend: &Backend, event: &Event, uploaded: bool) -> Result<Event> {
    match backend.records().save_event(event).await {
        Ok(saved) => Ok(saved),
        Err(e) => {
            if let (true, Some(reference)) = (uploaded, &event.image) {
                super::image::discard(backend, reference).await;
            }
            Err(e).with_context(|| format!("Failed to save event: {}", event.title))
        }
    }
}

pub async fn add(backend: &Backend, draft: EventDraft, image: Option<PathBuf>) -> Result<()> {
    let mut event = draft.validate(None, 0)?;

    // Validated first: a rejected draft never uploads anything.
    let uploaded = image.is_some();
    if let Some(path) = image {
        let stored = super::image::store_file(backend, &path, ImageFolder::Events).await?;
        event.image = Some(stored.into_reference());
    }

    let saved = save(backend, &event, uploaded).await?;

    println!("{} Created event {}", "✓".green(), saved.title.bold());
    println!("  {}", saved.render());
    Ok(())
}

pub async fn edit(backend: &Backend, id: &str, changes: EventChanges) -> Result<()> {
    let events = backend.records().fetch_events().await?;
    let existing = events
        .into_iter()
        .find(|e| e.id == id)
        .ok_or_else(|| OdcError::NotFound(id.to_string()))?;

    let mut draft = EventDraft::from_record(&existing);
    let image = changes.apply(&mut draft);
    let mut event = draft.validate_edit(&existing)?;

    let uploaded = image.is_some();
    if let Some(path) = image {
        let stored = super::image::store_file(backend, &path, ImageFolder::Events).await?;
        event.image = Some(stored.into_reference());
    }

    let saved = save(backend, &event, uploaded).await?;

    if let (true, Some(old)) = (uploaded, &existing.image) {
        if let Err(e) = super::image::delete_reference(backend, old).await {
            warn!(id, error = %e, "event updated but its old image could not be removed");
        }
    }

    println!("{} Updated event {}", "✓".green(), saved.title.bold());
    println!("  {}", saved.render());
    Ok(())
}

pub async fn delete(backend: &Backend, id: &str) -> Result<()> {
    let events = backend.records().fetch_events().await?;
    let image = events.iter().find(|e| e.id == id).and_then(|e| e.image.clone());

    backend
        .records()
        .delete_event(id)
        .await
        .with_context(|| format!("Failed to delete event: {}", id))?;

    if let Some(reference) = image {
        if let Err(e) = super::image::delete_reference(backend, &reference).await {
            warn!(id, error = %e, "event deleted but its image could not be removed");
        }
    }

    println!("{} Deleted event {}", "✓".green(), id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use odc_core::config::AdminConfig;

    use super::*;

    #[tokio::test]
    async fn edit_reschedules_and_keeps_registrations() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Backend::from_config(AdminConfig {
            data_path: dir.path().join("records.json"),
            ..Default::default()
        })
        .unwrap();

        let stored = EventDraft {
            title: "AI Meetup".into(),
            category: Some("conference".into()),
            description: "Talks".into(),
            date_start: NaiveDate::from_ymd_opt(2024, 3, 5),
            time_start: NaiveTime::from_hms_opt(18, 0, 0),
            time_end: NaiveTime::from_hms_opt(20, 0, 0),
            city: City::Rabat,
            location: Some("Auditorium".into()),
            image: None,
            speaker: Some("Sara".into()),
            max_participants: Some(80),
            price: None,
            status: None,
        }
        .validate(Some("e-1".into()), 41)
        .unwrap();
        backend.records().save_event(&stored).await.unwrap();

        let changes = EventChanges {
            date: NaiveDate::from_ymd_opt(2024, 3, 12),
            status: Some(EventStatus::Postponed),
            ..Default::default()
        };
        edit(&backend, "e-1", changes).await.unwrap();

        let events = backend.records().fetch_events().await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].date_start, NaiveDate::from_ymd_opt(2024, 3, 12));
        assert_eq!(events[0].status, EventStatus::Postponed);
        assert_eq!(events[0].category, "conference");
        assert_eq!(events[0].speaker.as_deref(), Some("Sara"));
        assert_eq!(events[0].current_participants, 41);
    }
}
