//! Turning form input into records.
//!
//! Drafts hold what an admin typed. `validate` checks every rule, reports all
//! failures together and returns the normalized record ready to be saved.

use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use crate::city::City;
use crate::constants::{MAX_IMAGE_REF_LEN, MAX_LINK_LEN, MAX_LOCATION_LEN, MAX_TITLE_LEN};
use crate::error::{OdcError, OdcResult};
use crate::event::{DEFAULT_EVENT_CATEGORY, Event, EventStatus};
use crate::formation::{Formation, FormationCategory, FormationStatus};
use crate::wire::non_empty;

/// Unvalidated formation input.
#[derive(Debug, Clone, PartialEq)]
pub struct FormationDraft {
    pub title: String,
    pub category: FormationCategory,
    pub description: String,
    pub date_start: Option<NaiveDate>,
    pub date_end: Option<NaiveDate>,
    pub time_start: Option<NaiveTime>,
    pub time_end: Option<NaiveTime>,
    pub city: City,
    pub location: Option<String>,
    pub image: Option<String>,
    pub max_participants: Option<u32>,
    pub registration_link: Option<String>,
    pub status: Option<FormationStatus>,
}

/// Unvalidated event input.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    pub title: String,
    pub category: Option<String>,
    pub description: String,
    pub date_start: Option<NaiveDate>,
    pub time_start: Option<NaiveTime>,
    pub time_end: Option<NaiveTime>,
    pub city: City,
    pub location: Option<String>,
    pub image: Option<String>,
    pub speaker: Option<String>,
    pub max_participants: Option<u32>,
    pub price: Option<u32>,
    pub status: Option<EventStatus>,
}

/// Accumulates rule failures so they can be reported at once.
#[derive(Default)]
struct Errors(Vec<String>);

impl Errors {
    fn check(&mut self, ok: bool, message: impl Into<String>) {
        if !ok {
            self.0.push(message.into());
        }
    }

    fn max_len(&mut self, value: Option<&str>, max: usize, field: &str) {
        if let Some(value) = value {
            self.check(
                value.chars().count() <= max,
                format!("{} must be at most {} characters", field, max),
            );
        }
    }

    fn finish(self) -> OdcResult<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(OdcError::Validation(self.0))
        }
    }
}

fn id_or_new(id: Option<String>) -> String {
    id.unwrap_or_else(|| Uuid::new_v4().to_string())
}

fn check_title(errors: &mut Errors, title: &str) {
    errors.check(!title.is_empty(), "Title is required");
    errors.max_len(Some(title), MAX_TITLE_LEN, "Title");
}

impl FormationDraft {
    /// Validate and normalize into a `Formation`.
    ///
    /// `id` is `None` for a new record. `existing_participants` carries the
    /// registration count over when editing; pass 0 on create.
    pub fn validate(self, id: Option<String>, existing_participants: u32) -> OdcResult<Formation> {
        let title = self.title.trim().to_string();
        let location = non_empty(self.location);
        let image = non_empty(self.image);
        let registration_link = non_empty(self.registration_link);

        let mut errors = Errors::default();
        check_title(&mut errors, &title);
        errors.check(self.date_start.is_some(), "Start date is required");
        if let (Some(start), Some(end)) = (self.date_start, self.date_end) {
            errors.check(end >= start, "End date must be on or after the start date");
        }
        errors.check(self.time_start.is_some(), "Start time is required");
        errors.check(self.time_end.is_some(), "End time is required");
        errors.check(
            self.max_participants.is_some_and(|n| n >= 1),
            "Maximum participants must be at least 1",
        );
        errors.max_len(location.as_deref(), MAX_LOCATION_LEN, "Location");
        errors.max_len(registration_link.as_deref(), MAX_LINK_LEN, "Registration link");
        errors.max_len(image.as_deref(), MAX_IMAGE_REF_LEN, "Image reference");
        errors.finish()?;

        let (Some(date_start), Some(time_start), Some(time_end), Some(max_participants)) =
            (self.date_start, self.time_start, self.time_end, self.max_participants)
        else {
            return Err(OdcError::Validation(vec!["Incomplete formation".into()]));
        };

        Ok(Formation {
            id: id_or_new(id),
            title,
            category: self.category,
            description: self.description.trim().to_string(),
            date_start: Some(date_start),
            date_end: Some(self.date_end.unwrap_or(date_start)),
            time_start,
            time_end,
            city: self.city,
            location: Some(location.unwrap_or_else(|| self.city.center_name().to_string())),
            image,
            max_participants,
            current_participants: existing_participants,
            registration_link,
            status: self.status.unwrap_or_default(),
            created_at: None,
        })
    }

    /// Draft holding the values of a stored formation, ready for changes.
    /// The image is left out; `validate_edit` keeps the stored one.
    pub fn from_record(formation: &Formation) -> Self {
        FormationDraft {
            title: formation.title.clone(),
            category: formation.category,
            description: formation.description.clone(),
            date_start: formation.date_start,
            date_end: formation.date_end,
            time_start: Some(formation.time_start),
            time_end: Some(formation.time_end),
            city: formation.city,
            location: formation.location.clone(),
            image: None,
            max_participants: Some(formation.max_participants),
            registration_link: formation.registration_link.clone(),
            status: Some(formation.status),
        }
    }

    /// Validate as a change to `existing`, keeping its id, registrations,
    /// creation time and, unless the draft names a new one, its image.
    pub fn validate_edit(self, existing: &Formation) -> OdcResult<Formation> {
        let mut formation =
            self.validate(Some(existing.id.clone()), existing.current_participants)?;
        formation.created_at = existing.created_at;
        if formation.image.is_none() {
            formation.image = existing.image.clone();
        }
        Ok(formation)
    }
}

impl EventDraft {
    /// Validate and normalize into an `Event`. See `FormationDraft::validate`.
    pub fn validate(self, id: Option<String>, existing_participants: u32) -> OdcResult<Event> {
        let title = self.title.trim().to_string();
        let description = self.description.trim().to_string();
        let location = non_empty(self.location);
        let image = non_empty(self.image);

        let mut errors = Errors::default();
        check_title(&mut errors, &title);
        errors.check(!description.is_empty(), "Description is required");
        errors.check(self.date_start.is_some(), "Date is required");
        errors.check(self.time_start.is_some(), "Start time is required");
        errors.check(self.time_end.is_some(), "End time is required");
        errors.check(location.is_some(), "Location is required");
        errors.max_len(location.as_deref(), MAX_LOCATION_LEN, "Location");
        errors.max_len(image.as_deref(), MAX_IMAGE_REF_LEN, "Image reference");
        errors.finish()?;

        let (Some(date_start), Some(time_start), Some(time_end)) =
            (self.date_start, self.time_start, self.time_end)
        else {
            return Err(OdcError::Validation(vec!["Incomplete event".into()]));
        };

        Ok(Event {
            id: id_or_new(id),
            title,
            category: non_empty(self.category).unwrap_or_else(|| DEFAULT_EVENT_CATEGORY.to_string()),
            description,
            date_start: Some(date_start),
            time_start,
            time_end,
            city: self.city,
            location,
            image,
            speaker: non_empty(self.speaker),
            max_participants: self.max_participants.unwrap_or(0),
            current_participants: existing_participants,
            price: self.price.unwrap_or(0),
            status: self.status.unwrap_or_default(),
            created_at: None,
        })
    }

    /// Draft holding the values of a stored event. See `FormationDraft::from_record`.
    pub fn from_record(event: &Event) -> Self {
        EventDraft {
            title: event.title.clone(),
            category: Some(event.category.clone()),
            description: event.description.clone(),
            date_start: event.date_start,
            time_start: Some(event.time_start),
            time_end: Some(event.time_end),
            city: event.city,
            location: event.location.clone(),
            image: None,
            speaker: event.speaker.clone(),
            max_participants: Some(event.max_participants),
            price: Some(event.price),
            status: Some(event.status),
        }
    }

    pub fn validate_edit(self, existing: &Event) -> OdcResult<Event> {
        let mut event =
            self.validate(Some(existing.id.clone()), existing.current_participants)?;
        event.created_at = existing.created_at;
        if event.image.is_none() {
            event.image = existing.image.clone();
        }
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{d, event, formation, t};

    fn formation_draft() -> FormationDraft {
        FormationDraft {
            title: "  Python Basics ".into(),
            category: FormationCategory::CodeSchool,
            description: " Intro ".into(),
            date_start: Some(d(2024, 3, 4)),
            date_end: None,
            time_start: Some(t(9, 0)),
            time_end: Some(t(17, 0)),
            city: City::Agadir,
            location: Some("   ".into()),
            image: None,
            max_participants: Some(20),
            registration_link: None,
            status: None,
        }
    }

    fn event_draft() -> EventDraft {
        EventDraft {
            title: "AI Meetup".into(),
            category: None,
            description: "Talks".into(),
            date_start: Some(d(2024, 3, 5)),
            time_start: Some(t(18, 0)),
            time_end: Some(t(20, 0)),
            city: City::Rabat,
            location: Some("Auditorium".into()),
            image: None,
            speaker: Some(" ".into()),
            max_participants: None,
            price: None,
            status: None,
        }
    }

    #[test]
    fn formation_is_normalized() {
        let formation = formation_draft().validate(None, 0).unwrap();
        assert_eq!(formation.title, "Python Basics");
        assert_eq!(formation.description, "Intro");
        assert_eq!(formation.date_end, Some(d(2024, 3, 4)));
        assert_eq!(formation.location.as_deref(), Some("ODC Agadir"));
        assert_eq!(formation.status, FormationStatus::Active);
        assert!(Uuid::parse_str(&formation.id).is_ok());
    }

    #[test]
    fn edit_keeps_id_and_participants() {
        let formation = formation_draft().validate(Some("f-1".into()), 12).unwrap();
        assert_eq!(formation.id, "f-1");
        assert_eq!(formation.current_participants, 12);
    }

    #[test]
    fn every_formation_failure_is_reported() {
        let mut draft = formation_draft();
        draft.title = " ".into();
        draft.date_end = Some(d(2024, 3, 1));
        draft.max_participants = Some(0);
        draft.registration_link = Some("x".repeat(501));

        match draft.validate(None, 0) {
            Err(OdcError::Validation(errors)) => {
                assert_eq!(errors.len(), 4);
                assert!(errors[0].contains("Title"));
                assert!(errors[1].contains("End date"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn title_length_counts_characters() {
        let mut draft = formation_draft();
        draft.title = "é".repeat(255);
        assert!(draft.clone().validate(None, 0).is_ok());
        draft.title.push('é');
        assert!(draft.validate(None, 0).is_err());
    }

    #[test]
    fn event_defaults() {
        let event = event_draft().validate(None, 4).unwrap();
        assert_eq!(event.category, "workshop");
        assert_eq!(event.status, EventStatus::Open);
        assert_eq!(event.price, 0);
        assert_eq!(event.max_participants, 0);
        assert_eq!(event.current_participants, 4);
        assert_eq!(event.speaker, None);
    }

    #[test]
    fn event_requires_location_and_description() {
        let mut draft = event_draft();
        draft.location = None;
        draft.description = String::new();
        draft.time_end = None;
        match draft.validate(None, 0) {
            Err(OdcError::Validation(errors)) => assert_eq!(errors.len(), 3),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn unchanged_formation_survives_an_edit() {
        let mut stored = formation("f-1", d(2024, 3, 4), d(2024, 3, 6));
        stored.location = Some("Lab 2".into());
        stored.image = Some(format!("data:image/png;base64,{}", "A".repeat(800)));
        stored.created_at = "2024-02-01T10:00:00Z".parse().ok();

        let edited = FormationDraft::from_record(&stored).validate_edit(&stored).unwrap();
        assert_eq!(edited, stored);
    }

    #[test]
    fn formation_edit_applies_changes_and_keeps_registrations() {
        let stored = formation("f-1", d(2024, 3, 4), d(2024, 3, 6));
        let mut draft = FormationDraft::from_record(&stored);
        draft.title = "Python Advanced".into();
        draft.date_end = Some(d(2024, 3, 8));
        draft.status = Some(FormationStatus::Inactive);

        let edited = draft.validate_edit(&stored).unwrap();
        assert_eq!(edited.id, "f-1");
        assert_eq!(edited.title, "Python Advanced");
        assert_eq!(edited.date_end, Some(d(2024, 3, 8)));
        assert_eq!(edited.current_participants, stored.current_participants);
        assert!(!edited.is_active());
    }

    #[test]
    fn event_edit_can_replace_the_image() {
        let mut stored = event("e-1", d(2024, 3, 5));
        stored.location = Some("Auditorium".into());
        stored.image = Some("https://example.test/old.png".into());

        let mut draft = EventDraft::from_record(&stored);
        draft.image = Some("https://example.test/new.png".into());
        draft.date_start = None;
        assert!(draft.clone().validate_edit(&stored).is_err());

        draft.date_start = Some(d(2024, 3, 12));
        let edited = draft.validate_edit(&stored).unwrap();
        assert_eq!(edited.image.as_deref(), Some("https://example.test/new.png"));
        assert_eq!(edited.date_start, Some(d(2024, 3, 12)));
        assert_eq!(edited.current_participants, 3);
    }
}
