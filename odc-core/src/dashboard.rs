//! Summary figures and lists for the admin dashboard.

use chrono::{DateTime, NaiveDate, Utc};

use crate::city::City;
use crate::event::Event;
use crate::formation::Formation;
use crate::occurrence::OccurrenceKind;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub active_formations: usize,
    pub open_events: usize,
    /// Current participants across formations and events.
    pub participants: u32,
}

impl DashboardStats {
    pub fn compute(formations: &[Formation], events: &[Event]) -> Self {
        DashboardStats {
            active_formations: formations.iter().filter(|f| f.is_active()).count(),
            open_events: events.iter().filter(|e| e.is_open()).count(),
            participants: formations
                .iter()
                .map(|f| f.current_participants)
                .chain(events.iter().map(|e| e.current_participants))
                .sum(),
        }
    }
}

/// A formation or an event, borrowed from the loaded lists.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RecordRef<'a> {
    Formation(&'a Formation),
    Event(&'a Event),
}

impl<'a> RecordRef<'a> {
    pub fn kind(&self) -> OccurrenceKind {
        match self {
            RecordRef::Formation(_) => OccurrenceKind::Formation,
            RecordRef::Event(_) => OccurrenceKind::Event,
        }
    }

    pub fn id(&self) -> &'a str {
        match self {
            RecordRef::Formation(f) => &f.id,
            RecordRef::Event(e) => &e.id,
        }
    }

    pub fn title(&self) -> &'a str {
        match self {
            RecordRef::Formation(f) => &f.title,
            RecordRef::Event(e) => &e.title,
        }
    }

    pub fn city(&self) -> City {
        match self {
            RecordRef::Formation(f) => f.city,
            RecordRef::Event(e) => e.city,
        }
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        match self {
            RecordRef::Formation(f) => f.date_start,
            RecordRef::Event(e) => e.date_start,
        }
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        match self {
            RecordRef::Formation(f) => f.created_at,
            RecordRef::Event(e) => e.created_at,
        }
    }
}

fn all_records<'a>(formations: &'a [Formation], events: &'a [Event]) -> Vec<RecordRef<'a>> {
    formations
        .iter()
        .map(RecordRef::Formation)
        .chain(events.iter().map(RecordRef::Event))
        .collect()
}

/// Most recently created records first. Records without a creation time
/// come last, in input order.
pub fn recent_activity<'a>(
    formations: &'a [Formation],
    events: &'a [Event],
    limit: usize,
) -> Vec<RecordRef<'a>> {
    let mut records = all_records(formations, events);
    // `None` sorts below any `Some`, so reversing the comparison puts it last.
    records.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
    records.truncate(limit);
    records
}

/// Records starting strictly after `today`, soonest first.
pub fn upcoming_records<'a>(
    formations: &'a [Formation],
    events: &'a [Event],
    today: NaiveDate,
    limit: usize,
) -> Vec<RecordRef<'a>> {
    let mut records: Vec<_> = all_records(formations, events)
        .into_iter()
        .filter(|r| r.start_date().is_some_and(|d| d > today))
        .collect();
    records.sort_by_key(|r| r.start_date());
    records.truncate(limit);
    records
}
