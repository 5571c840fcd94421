//! The four ODC centers and the city filter used by the calendar.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::OdcError;

/// City hosting an Orange Digital Center. Each city has exactly one center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum City {
    Rabat,
    Agadir,
    #[serde(rename = "benmisk")]
    BenMsik,
    #[serde(rename = "sidimaarouf")]
    SidiMaarouf,
}

impl City {
    pub const ALL: [City; 4] = [City::Rabat, City::Agadir, City::BenMsik, City::SidiMaarouf];

    /// Value stored in the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            City::Rabat => "rabat",
            City::Agadir => "agadir",
            City::BenMsik => "benmisk",
            City::SidiMaarouf => "sidimaarouf",
        }
    }

    /// Short human label (e.g. "Ben M'sik").
    pub fn label(&self) -> &'static str {
        match self {
            City::Rabat => "Rabat",
            City::Agadir => "Agadir",
            City::BenMsik => "Ben M'sik",
            City::SidiMaarouf => "Sidi Maarouf",
        }
    }

    /// Name of the center, used as the location when a record has none.
    pub fn center_name(&self) -> &'static str {
        match self {
            City::Rabat => "ODC Rabat",
            City::Agadir => "ODC Agadir",
            City::BenMsik => "ODC Ben M'sik",
            City::SidiMaarouf => "ODC Sidi Maarouf",
        }
    }

    pub fn center_address(&self) -> &'static str {
        match self {
            City::Rabat => "Technopolis Rabat-Shore, Rabat",
            City::Agadir => "Quartier Industriel, Agadir",
            City::BenMsik => "Ben M'sik, Casablanca",
            City::SidiMaarouf => "Sidi Maarouf, Casablanca",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for City {
    type Err = OdcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        City::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                OdcError::Validation(vec![format!(
                    "Unknown city '{}'. Expected one of: rabat, agadir, benmisk, sidimaarouf",
                    s
                )])
            })
    }
}

/// Which cities the calendar covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CityFilter {
    #[default]
    All,
    Only(City),
}

impl CityFilter {
    pub fn matches(&self, city: City) -> bool {
        match self {
            CityFilter::All => true,
            CityFilter::Only(c) => *c == city,
        }
    }
}

impl FromStr for CityFilter {
    type Err = OdcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(CityFilter::All)
        } else {
            s.parse().map(CityFilter::Only)
        }
    }
}

impl fmt::Display for CityFilter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CityFilter::All => write!(f, "all cities"),
            CityFilter::Only(city) => write!(f, "{}", city),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_values() {
        assert_eq!("benmisk".parse::<City>().unwrap(), City::BenMsik);
        assert_eq!("Rabat".parse::<City>().unwrap(), City::Rabat);
        assert!("casablanca".parse::<City>().is_err());
    }

    #[test]
    fn serde_uses_wire_values() {
        let json = serde_json::to_string(&City::SidiMaarouf).unwrap();
        assert_eq!(json, "\"sidimaarouf\"");
        let city: City = serde_json::from_str("\"agadir\"").unwrap();
        assert_eq!(city, City::Agadir);
    }

    #[test]
    fn filter_parses_all() {
        assert_eq!("all".parse::<CityFilter>().unwrap(), CityFilter::All);
        assert_eq!(
            "agadir".parse::<CityFilter>().unwrap(),
            CityFilter::Only(City::Agadir)
        );
        assert!(CityFilter::All.matches(City::Rabat));
        assert!(!CityFilter::Only(City::Agadir).matches(City::Rabat));
    }
}
