//! Date-indexed view of formations and events.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::city::CityFilter;
use crate::error::OdcError;
use crate::event::Event;
use crate::formation::Formation;
use crate::occurrence::{Occurrence, OccurrenceKind};

/// A record left out of the index, and why.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    pub kind: OccurrenceKind,
    pub record_id: String,
    pub reason: String,
}

/// Mapping from calendar day to the occurrences on that day.
///
/// Every key has at least one occurrence. Within a day, occurrences keep
/// input order: formations first (in list order), then events.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalendarIndex {
    days: BTreeMap<NaiveDate, Vec<Occurrence>>,
    skipped: Vec<SkippedRecord>,
}

impl CalendarIndex {
    /// Build the index from scratch.
    ///
    /// Formations are expanded to one occurrence per day of their span, events
    /// give one occurrence on their date. A record without a start date or with
    /// an end before its start is skipped; the rest of the index still builds.
    pub fn build<'a, F, E>(formations: F, events: E) -> Self
    where
        F: IntoIterator<Item = &'a Formation>,
        E: IntoIterator<Item = &'a Event>,
    {
        let mut index = CalendarIndex::default();

        for formation in formations {
            match formation.span() {
                Ok(span) => {
                    let total = span.len();
                    for (day_index, day) in span.numbered_days() {
                        index.push(day, Occurrence::for_formation_day(formation, day_index, total));
                    }
                }
                Err(e) => index.skip(OccurrenceKind::Formation, &formation.id, e),
            }
        }

        for event in events {
            match event.date() {
                Ok(day) => index.push(day, Occurrence::for_event(event)),
                Err(e) => index.skip(OccurrenceKind::Event, &event.id, e),
            }
        }

        debug!(
            days = index.days.len(),
            skipped = index.skipped.len(),
            "calendar index built"
        );
        index
    }

    /// Build from the subset of records held in the filtered cities.
    pub fn build_for(formations: &[Formation], events: &[Event], filter: CityFilter) -> Self {
        let (formations, events) = scope_to_city(formations, events, filter);
        Self::build(formations, events)
    }

    fn push(&mut self, day: NaiveDate, occurrence: Occurrence) {
        self.days.entry(day).or_default().push(occurrence);
    }

    fn skip(&mut self, kind: OccurrenceKind, record_id: &str, error: OdcError) {
        warn!(kind = kind.label(), record_id, %error, "record left out of calendar");
        self.skipped.push(SkippedRecord {
            kind,
            record_id: record_id.to_string(),
            reason: error.to_string(),
        });
    }

    /// Occurrences on `day`, empty if none.
    pub fn on(&self, day: NaiveDate) -> &[Occurrence] {
        self.days.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn count_on(&self, day: NaiveDate) -> usize {
        self.on(day).len()
    }

    /// Days with at least one occurrence, ascending.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.keys().copied()
    }

    /// `(day, occurrences)` pairs, ascending by day.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &[Occurrence])> {
        self.days.iter().map(|(day, occs)| (*day, occs.as_slice()))
    }

    /// `(day, occurrences)` pairs strictly after `day`, ascending.
    pub fn after(&self, day: NaiveDate) -> impl Iterator<Item = (NaiveDate, &[Occurrence])> {
        use std::ops::Bound::{Excluded, Unbounded};
        self.days
            .range((Excluded(day), Unbounded))
            .map(|(day, occs)| (*day, occs.as_slice()))
    }

    /// Number of days with occurrences.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn occurrence_count(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    pub fn skipped(&self) -> &[SkippedRecord] {
        &self.skipped
    }
}

/// Records held in the cities selected by `filter`, as borrowed views.
pub fn scope_to_city<'a>(
    formations: &'a [Formation],
    events: &'a [Event],
    filter: CityFilter,
) -> (Vec<&'a Formation>, Vec<&'a Event>) {
    (
        formations.iter().filter(|f| filter.matches(f.city)).collect(),
        events.iter().filter(|e| filter.matches(e.city)).collect(),
    )
}
