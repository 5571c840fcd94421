//! Single-day event records.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::city::City;
use crate::error::{OdcError, OdcResult};
use crate::wire;

pub const DEFAULT_EVENT_CATEGORY: &str = "workshop";

fn default_category() -> String {
    DEFAULT_EVENT_CATEGORY.to_string()
}

fn category_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(wire::non_empty(Option::<String>::deserialize(deserializer)?).unwrap_or_else(default_category))
}

/// A one-day event (workshop, conference, hackathon, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    /// Free-form label such as "workshop" or "hackathon".
    #[serde(default = "default_category", deserialize_with = "category_or_default")]
    pub category: String,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub description: String,

    #[serde(default)]
    pub date_start: Option<NaiveDate>,
    #[serde(with = "wire::time")]
    pub time_start: NaiveTime,
    #[serde(with = "wire::time")]
    pub time_end: NaiveTime,

    pub city: City,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub speaker: Option<String>,

    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub max_participants: u32,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub current_participants: u32,
    /// Price in MAD; 0 means free.
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub price: u32,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub status: EventStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Event {
    pub fn date(&self) -> OdcResult<NaiveDate> {
        self.date_start
            .ok_or_else(|| OdcError::MissingDate(self.id.clone()))
    }

    pub fn is_open(&self) -> bool {
        self.status == EventStatus::Open
    }

    pub fn location_or_center(&self) -> &str {
        match self.location.as_deref() {
            Some(l) if !l.trim().is_empty() => l,
            _ => self.city.center_name(),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Registration status of an event. Distinct from `FormationStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EventStatus {
    /// Older rows were written as "active".
    #[default]
    #[serde(rename = "ouvert", alias = "open", alias = "active")]
    Open,
    #[serde(rename = "complet", alias = "full")]
    Full,
    #[serde(rename = "annule", alias = "cancelled")]
    Cancelled,
    #[serde(rename = "reporte", alias = "postponed")]
    Postponed,
}

impl EventStatus {
    pub fn label(&self) -> &'static str {
        match self {
            EventStatus::Open => "Open",
            EventStatus::Full => "Full",
            EventStatus::Cancelled => "Cancelled",
            EventStatus::Postponed => "Postponed",
        }
    }
}

impl FromStr for EventStatus {
    type Err = OdcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" | "ouvert" | "active" => Ok(EventStatus::Open),
            "full" | "complet" => Ok(EventStatus::Full),
            "cancelled" | "annule" => Ok(EventStatus::Cancelled),
            "postponed" | "reporte" => Ok(EventStatus::Postponed),
            other => Err(OdcError::Validation(vec![format!(
                "Unknown event status '{}'. Expected open, full, cancelled or postponed",
                other
            )])),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_legacy_row() {
        let json = r#"{
            "id": "e-1",
            "title": "AI Workshop",
            "category": null,
            "date_start": "2024-03-05",
            "time_start": "14:00",
            "time_end": "16:00",
            "city": "agadir",
            "location": "",
            "max_participants": 30,
            "status": "active"
        }"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.category, "workshop");
        assert_eq!(event.status, EventStatus::Open);
        assert_eq!(event.price, 0);
        assert_eq!(event.location_or_center(), "ODC Agadir");
        assert_eq!(event.date().unwrap(), NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
    }

    #[test]
    fn status_writes_backend_values() {
        assert_eq!(serde_json::to_string(&EventStatus::Postponed).unwrap(), "\"reporte\"");
        assert_eq!("full".parse::<EventStatus>().unwrap(), EventStatus::Full);
    }
}
