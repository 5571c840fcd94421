//! Calendar occurrences: one per (record, calendar day).

use std::fmt;

use chrono::NaiveTime;

use crate::city::City;
use crate::event::{Event, EventStatus};
use crate::formation::{Formation, FormationCategory, FormationStatus};
use crate::wire;

/// Where an occurrence comes from, with the data only that source carries.
#[derive(Debug, Clone, PartialEq)]
pub enum OccurrenceSource {
    Formation {
        category: FormationCategory,
        status: FormationStatus,
        /// 1-based position of this day within the formation.
        day_index: u32,
        total_days: u32,
    },
    Event {
        category: String,
        status: EventStatus,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OccurrenceKind {
    Formation,
    Event,
}

impl OccurrenceKind {
    pub fn label(&self) -> &'static str {
        match self {
            OccurrenceKind::Formation => "formation",
            OccurrenceKind::Event => "event",
        }
    }
}

/// One calendar-day instance of a formation or event, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Occurrence {
    pub record_id: String,
    /// Title of the source record, without any day marker.
    pub title: String,
    pub city: City,
    pub time_start: NaiveTime,
    pub time_end: NaiveTime,
    pub description: String,
    pub location: String,
    pub current_participants: u32,
    pub max_participants: u32,
    pub source: OccurrenceSource,
}

impl Occurrence {
    pub fn for_formation_day(formation: &Formation, day_index: u32, total_days: u32) -> Self {
        Occurrence {
            record_id: formation.id.clone(),
            title: formation.title.clone(),
            city: formation.city,
            time_start: formation.time_start,
            time_end: formation.time_end,
            description: formation.description.clone(),
            location: formation.location_or_center().to_string(),
            current_participants: formation.current_participants,
            max_participants: formation.max_participants,
            source: OccurrenceSource::Formation {
                category: formation.category,
                status: formation.status,
                day_index,
                total_days,
            },
        }
    }

    pub fn for_event(event: &Event) -> Self {
        Occurrence {
            record_id: event.id.clone(),
            title: event.title.clone(),
            city: event.city,
            time_start: event.time_start,
            time_end: event.time_end,
            description: event.description.clone(),
            location: event.location_or_center().to_string(),
            current_participants: event.current_participants,
            max_participants: event.max_participants,
            source: OccurrenceSource::Event {
                category: event.category.clone(),
                status: event.status,
            },
        }
    }

    pub fn kind(&self) -> OccurrenceKind {
        match self.source {
            OccurrenceSource::Formation { .. } => OccurrenceKind::Formation,
            OccurrenceSource::Event { .. } => OccurrenceKind::Event,
        }
    }

    /// `(day_index, total_days)` for days of a multi-day formation.
    pub fn day_of(&self) -> Option<(u32, u32)> {
        match self.source {
            OccurrenceSource::Formation {
                day_index,
                total_days,
                ..
            } if total_days > 1 => Some((day_index, total_days)),
            _ => None,
        }
    }

    pub fn is_multi_day(&self) -> bool {
        self.day_of().is_some()
    }

    /// Title as shown on the calendar, e.g. "Python Basics (Jour 2/3)".
    pub fn display_title(&self) -> String {
        match self.day_of() {
            Some((day, total)) => format!("{} (Jour {}/{})", self.title, day, total),
            None => self.title.clone(),
        }
    }

    /// Category label for the badge: formation category, or the event's own label.
    pub fn category_label(&self) -> &str {
        match &self.source {
            OccurrenceSource::Formation { category, .. } => category.label(),
            OccurrenceSource::Event { category, .. } => category,
        }
    }

    pub fn status_label(&self) -> &'static str {
        match &self.source {
            OccurrenceSource::Formation { status, .. } => status.label(),
            OccurrenceSource::Event { status, .. } => status.label(),
        }
    }

    /// "09:00-17:00"
    pub fn time_range(&self) -> String {
        format!(
            "{}-{}",
            wire::time::format(&self.time_start),
            wire::time::format(&self.time_end)
        )
    }

    /// "12/20"
    pub fn participants_summary(&self) -> String {
        format!("{}/{}", self.current_participants, self.max_participants)
    }
}

impl fmt::Display for Occurrence {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.display_title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formation_occurrence(day_index: u32, total_days: u32) -> Occurrence {
        Occurrence {
            record_id: "f-1".into(),
            title: "Python Basics".into(),
            city: City::Rabat,
            time_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            time_end: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            description: String::new(),
            location: "ODC Rabat".into(),
            current_participants: 12,
            max_participants: 20,
            source: OccurrenceSource::Formation {
                category: FormationCategory::CodeSchool,
                status: FormationStatus::Active,
                day_index,
                total_days,
            },
        }
    }

    #[test]
    fn multi_day_title_has_day_marker() {
        let occ = formation_occurrence(2, 3);
        assert_eq!(occ.display_title(), "Python Basics (Jour 2/3)");
        assert_eq!(occ.day_of(), Some((2, 3)));
    }

    #[test]
    fn single_day_title_is_plain() {
        let occ = formation_occurrence(1, 1);
        assert_eq!(occ.display_title(), "Python Basics");
        assert!(!occ.is_multi_day());
    }

    #[test]
    fn display_helpers() {
        let occ = formation_occurrence(1, 1);
        assert_eq!(occ.time_range(), "09:00-17:00");
        assert_eq!(occ.participants_summary(), "12/20");
        assert_eq!(occ.category_label(), "École du Code");
        assert_eq!(occ.kind(), OccurrenceKind::Formation);
    }
}
