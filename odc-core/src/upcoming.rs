//! Upcoming occurrences after a reference date.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::calendar_index::CalendarIndex;
use crate::city::City;
use crate::occurrence::{Occurrence, OccurrenceKind};

/// An occurrence together with the day it falls on.
#[derive(Debug, Clone, PartialEq)]
pub struct Upcoming {
    pub date: NaiveDate,
    pub occurrence: Occurrence,
}

/// Identity of a logical event across its calendar days.
///
/// Days of one formation share a key; the same title in two cities does not.
/// Titles are compared trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct DedupKey<'a> {
    title: &'a str,
    city: City,
    kind: OccurrenceKind,
}

impl<'a> DedupKey<'a> {
    fn of(occurrence: &'a Occurrence) -> Self {
        DedupKey {
            title: occurrence.title.trim(),
            city: occurrence.city,
            kind: occurrence.kind(),
        }
    }
}

/// At most `limit` occurrences strictly after `reference`, one per logical
/// event, each at its earliest future day, ascending by day.
///
/// The key uses the record's own title rather than the "(Jour N/M)" display
/// title, so an event whose name happens to contain such text is left alone.
pub fn upcoming(index: &CalendarIndex, reference: NaiveDate, limit: usize) -> Vec<Upcoming> {
    let mut seen = HashSet::new();
    let mut result = Vec::new();

    // `after` walks days in ascending order, so the first time a key is seen
    // is its earliest day; equal days keep index order.
    for (date, occurrences) in index.after(reference) {
        for occurrence in occurrences {
            if seen.insert(DedupKey::of(occurrence)) {
                result.push(Upcoming {
                    date,
                    occurrence: occurrence.clone(),
                });
            }
        }
    }

    result.sort_by_key(|u| u.date);
    result.truncate(limit);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::UPCOMING_LIMIT;
    use crate::event::Event;
    use crate::fixtures::{d, event, formation};
    use crate::formation::Formation;

    #[test]
    fn multi_day_formation_appears_once() {
        let formations = vec![formation("f", d(2024, 3, 4), d(2024, 3, 8))];
        let index = CalendarIndex::build(&formations, &Vec::<Event>::new());

        let result = upcoming(&index, d(2024, 3, 5), UPCOMING_LIMIT);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].date, d(2024, 3, 6));
        assert_eq!(result[0].occurrence.day_of(), Some((3, 5)));
    }

    #[test]
    fn reference_day_is_excluded() {
        let events = vec![event("today", d(2024, 3, 4))];
        let index = CalendarIndex::build(&Vec::<Formation>::new(), &events);
        assert!(upcoming(&index, d(2024, 3, 4), UPCOMING_LIMIT).is_empty());
        assert_eq!(upcoming(&index, d(2024, 3, 3), UPCOMING_LIMIT).len(), 1);
    }

    #[test]
    fn truncates_to_limit() {
        let events: Vec<_> = (5..15)
            .map(|day| event(&format!("e{}", day), d(2024, 3, day)))
            .collect();
        let index = CalendarIndex::build(&Vec::<Formation>::new(), &events);
        let result = upcoming(&index, d(2024, 3, 4), UPCOMING_LIMIT);
        assert_eq!(result.len(), 5);
        assert!(result.windows(2).all(|w| w[0].date <= w[1].date));
        assert_eq!(result[0].date, d(2024, 3, 5));
    }

    #[test]
    fn same_title_in_both_kinds_is_kept_twice() {
        let mut f = formation("f", d(2024, 3, 5), d(2024, 3, 5));
        f.title = "Arduino".into();
        let mut e = event("e", d(2024, 3, 5));
        e.title = "Arduino".into();
        e.city = f.city;
        let index = CalendarIndex::build(&vec![f], &vec![e]);
        assert_eq!(upcoming(&index, d(2024, 3, 4), UPCOMING_LIMIT).len(), 2);
    }

    #[test]
    fn event_title_with_day_marker_is_not_merged() {
        let mut a = event("a", d(2024, 3, 5));
        a.title = "Demo (Jour 1/2)".into();
        let mut b = event("b", d(2024, 3, 6));
        b.title = "Demo (Jour 2/2)".into();
        let index = CalendarIndex::build(&Vec::<Formation>::new(), &vec![a, b]);
        assert_eq!(upcoming(&index, d(2024, 3, 4), UPCOMING_LIMIT).len(), 2);
    }

    #[test]
    fn first_in_input_order_wins_on_the_same_day() {
        let mut first = event("first", d(2024, 3, 6));
        first.title = "Same".into();
        let mut second = event("second", d(2024, 3, 6));
        second.title = "Same".into();
        let index = CalendarIndex::build(&Vec::<Formation>::new(), &vec![first, second]);

        let ids: Vec<_> = upcoming(&index, d(2024, 3, 5), UPCOMING_LIMIT)
            .iter()
            .map(|u| u.occurrence.record_id.clone())
            .collect();
        assert_eq!(ids, vec!["first"]);
    }

    #[test]
    fn trailing_spaces_do_not_split_an_event() {
        let mut a = event("a", d(2024, 3, 6));
        a.title = "Hackathon".into();
        let mut b = event("b", d(2024, 3, 7));
        b.title = "Hackathon  ".into();
        let index = CalendarIndex::build(&Vec::<Formation>::new(), &vec![a, b]);

        let result = upcoming(&index, d(2024, 3, 5), UPCOMING_LIMIT);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].occurrence.record_id, "a");
    }
}
