//! Record builders shared by unit tests.

use chrono::{NaiveDate, NaiveTime};

use crate::city::City;
use crate::event::{Event, EventStatus};
use crate::formation::{Formation, FormationCategory, FormationStatus};

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

pub fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

/// A Rabat code-school formation over `start..=end`.
pub fn formation(id: &str, start: NaiveDate, end: NaiveDate) -> Formation {
    Formation {
        id: id.to_string(),
        title: format!("Formation {}", id),
        category: FormationCategory::CodeSchool,
        description: "Hands-on sessions".to_string(),
        date_start: Some(start),
        date_end: Some(end),
        time_start: t(9, 0),
        time_end: t(17, 0),
        city: City::Rabat,
        location: None,
        image: None,
        max_participants: 20,
        current_participants: 5,
        registration_link: None,
        status: FormationStatus::Active,
        created_at: None,
    }
}

/// An open Rabat workshop on `date`.
pub fn event(id: &str, date: NaiveDate) -> Event {
    Event {
        id: id.to_string(),
        title: format!("Event {}", id),
        category: "workshop".to_string(),
        description: "Afternoon workshop".to_string(),
        date_start: Some(date),
        time_start: t(14, 0),
        time_end: t(16, 0),
        city: City::Rabat,
        location: None,
        image: None,
        speaker: None,
        max_participants: 30,
        current_participants: 3,
        price: 0,
        status: EventStatus::Open,
        created_at: None,
    }
}
