use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use clap::Args;
use odc_core::date_range::parse_date;
use odc_core::image::ImageFolder;
use odc_core::{
    City, Formation, FormationCategory, FormationDraft, FormationFilter, FormationStatus, OdcError,
};
use owo_colors::OwoColorize;
use tracing::warn;

use crate::backend::Backend;
use crate::parse_time;
use crate::render::Render;

/// Fields to change on a stored formation. Anything not given keeps its value.
#[derive(Args, Debug, Default)]
pub struct FormationChanges {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub category: Option<FormationCategory>,

    /// City whose center hosts it (rabat, agadir, benmisk, sidimaarouf)
    #[arg(long, value_name = "CITY")]
    pub center: Option<City>,

    /// First day (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub start: Option<NaiveDate>,

    /// Last day (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub end: Option<NaiveDate>,

    /// Daily start time (HH:MM)
    #[arg(long, value_parser = parse_time)]
    pub from: Option<NaiveTime>,

    /// Daily end time (HH:MM)
    #[arg(long, value_parser = parse_time)]
    pub to: Option<NaiveTime>,

    #[arg(long)]
    pub max_participants: Option<u32>,

    #[arg(short, long)]
    pub description: Option<String>,

    /// An empty value falls back to the city's center
    #[arg(short, long)]
    pub location: Option<String>,

    #[arg(long)]
    pub registration_link: Option<String>,

    #[arg(long)]
    pub status: Option<FormationStatus>,

    /// Image file replacing the current one
    #[arg(long)]
    pub image: Option<PathBuf>,
}

impl FormationChanges {
    /// Write the given fields into `draft`. Returns the new image file, if any.
    fn apply(self, draft: &mut FormationDraft) -> Option<PathBuf> {
        if let Some(title) = self.title {
            draft.title = title;
        }
        if let Some(category) = self.category {
            draft.category = category;
        }
        if let Some(city) = self.center {
            draft.city = city;
        }
        if self.start.is_some() {
            draft.date_start = self.start;
        }
        if self.end.is_some() {
            draft.date_end = self.end;
        }
        if self.from.is_some() {
            draft.time_start = self.from;
        }
        if self.to.is_some() {
            draft.time_end = self.to;
        }
        if self.max_participants.is_some() {
            draft.max_participants = self.max_participants;
        }
        if let Some(description) = self.description {
            draft.description = description;
        }
        if self.location.is_some() {
            draft.location = self.location;
        }
        if self.registration_link.is_some() {
            draft.registration_link = self.registration_link;
        }
        if self.status.is_some() {
            draft.status = self.status;
        }
        self.image
    }
}

pub async fn list(backend: &Backend, filter: &FormationFilter, json: bool) -> Result<()> {
    let formations = backend.records().fetch_formations().await?;
    let shown = filter.apply(&formations);

    if json {
        println!("{}", serde_json::to_string_pretty(&shown)?);
        return Ok(());
    }

    println!("{}", filter.summary(&formations).to_string().dimmed());
    for formation in shown {
        println!("  {}", formation.render());
    }
    Ok(())
}

/// Save `formation`. If that fails, an image uploaded for it is removed again.
async fn save(backend: &Backend, formation: &Formation, uploaded: bool) -> Result<Formation> {
    match backend.records().save_formation(formation).await {
        Ok(saved) => Ok(saved),
        Err(e) => {
            if let (true, Some(reference)) = (uploaded, &formation.image) {
                super::image::discard(backend, reference).await;
            }
            Err(e).with_context(|| format!("Failed to save formation: {}", formation.title))
        }
    }
}

async fn find(backend: &Backend, id: &str) -> Result<Formation> {
    let formations = backend.records().fetch_formations().await?;
    Ok(formations
        .into_iter()
        .find(|f| f.id == id)
        .ok_or_else(|| OdcError::NotFound(id.to_string()))?)
}

pub async fn add(backend: &Backend, draft: FormationDraft, image: Option<PathBuf>) -> Result<()> {
    let mut formation = draft.validate(None, 0)?;

    // Validated first: a rejected draft never uploads anything.
    let uploaded = image.is_some();
    if let Some(path) = image {
        let stored = super::image::store_file(backend, &path, ImageFolder::Formations).await?;
        formation.image = Some(stored.into_reference());
    }

    let saved = save(backend, &formation, uploaded).await?;

    println!("{} Created formation {}", "✓".green(), saved.title.bold());
    println!("  {}", saved.render());
    Ok(())
}

pub async fn edit(backend: &Backend, id: &str, changes: FormationChanges) -> Result<()> {
    let existing = find(backend, id).await?;

    let mut draft = FormationDraft::from_record(&existing);
    let image = changes.apply(&mut draft);
    let mut formation = draft.validate_edit(&existing)?;

    let uploaded = image.is_some();
    if let Some(path) = image {
        let stored = super::image::store_file(backend, &path, ImageFolder::Formations).await?;
        formation.image = Some(stored.into_reference());
    }

    let saved = save(backend, &formation, uploaded).await?;

    if let (true, Some(old)) = (uploaded, &existing.image) {
        if let Err(e) = super::image::delete_reference(backend, old).await {
            warn!(id, error = %e, "formation updated but its old image could not be removed");
        }
    }

    println!("{} Updated formation {}", "✓".green(), saved.title.bold());
    println!("  {}", saved.render());
    Ok(())
}

pub async fn delete(backend: &Backend, id: &str) -> Result<()> {
    let formations = backend.records().fetch_formations().await?;
    let image = formations.iter().find(|f| f.id == id).and_then(|f| f.image.clone());

    backend
        .records()
        .delete_formation(id)
        .await
        .with_context(|| format!("Failed to delete formation: {}", id))?;

    if let Some(reference) = image {
        if let Err(e) = super::image::delete_reference(backend, &reference).await {
            warn!(id, error = %e, "formation deleted but its image could not be removed");
        }
    }

    println!("{} Deleted formation {}", "✓".green(), id);
    Ok(())
}
