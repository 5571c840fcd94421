//! Formation (training session) records.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::city::City;
use crate::date_range::DateSpan;
use crate::error::{OdcError, OdcResult};
use crate::wire;

/// A training session, possibly spanning several days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Formation {
    pub id: String,
    pub title: String,
    pub category: FormationCategory,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub description: String,

    /// `None` only for malformed rows; such formations are left out of the calendar.
    #[serde(default)]
    pub date_start: Option<NaiveDate>,
    /// Defaults to `date_start` when absent.
    #[serde(default)]
    pub date_end: Option<NaiveDate>,
    #[serde(with = "wire::time")]
    pub time_start: NaiveTime,
    #[serde(with = "wire::time")]
    pub time_end: NaiveTime,

    pub city: City,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub image: Option<String>,

    pub max_participants: u32,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub current_participants: u32,
    #[serde(default)]
    pub registration_link: Option<String>,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub status: FormationStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Formation {
    /// Days covered by this formation.
    pub fn span(&self) -> OdcResult<DateSpan> {
        let start = self
            .date_start
            .ok_or_else(|| OdcError::MissingDate(self.id.clone()))?;
        DateSpan::new(start, self.date_end).map_err(|e| match e {
            OdcError::InvalidDateRange { start, end, .. } => OdcError::InvalidDateRange {
                record: self.id.clone(),
                start,
                end,
            },
            other => other,
        })
    }

    pub fn is_active(&self) -> bool {
        self.status == FormationStatus::Active
    }

    /// Location to display, falling back to the city's center.
    pub fn location_or_center(&self) -> &str {
        match self.location.as_deref() {
            Some(l) if !l.trim().is_empty() => l,
            _ => self.city.center_name(),
        }
    }
}

impl fmt::Display for Formation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormationCategory {
    #[serde(rename = "ecole-du-code")]
    CodeSchool,
    #[serde(rename = "fablab")]
    Fablab,
}

impl FormationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormationCategory::CodeSchool => "ecole-du-code",
            FormationCategory::Fablab => "fablab",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormationCategory::CodeSchool => "École du Code",
            FormationCategory::Fablab => "FabLab",
        }
    }
}

impl FromStr for FormationCategory {
    type Err = OdcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ecole-du-code" | "code-school" => Ok(FormationCategory::CodeSchool),
            "fablab" => Ok(FormationCategory::Fablab),
            other => Err(OdcError::Validation(vec![format!(
                "Unknown formation category '{}'. Expected ecole-du-code or fablab",
                other
            )])),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormationStatus {
    #[default]
    Active,
    Inactive,
}

impl FormationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            FormationStatus::Active => "Active",
            FormationStatus::Inactive => "Inactive",
        }
    }
}

impl FromStr for FormationStatus {
    type Err = OdcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(FormationStatus::Active),
            "inactive" => Ok(FormationStatus::Inactive),
            other => Err(OdcError::Validation(vec![format!(
                "Unknown formation status '{}'. Expected active or inactive",
                other
            )])),
        }
    }
}
