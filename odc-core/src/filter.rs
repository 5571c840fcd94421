//! Search and facet filtering for the formation list.

use std::fmt;

use crate::city::City;
use crate::formation::{Formation, FormationCategory};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormationFilter {
    /// Case-insensitive substring over title, description and city label.
    pub search: String,
    pub category: Option<FormationCategory>,
    pub city: Option<City>,
}

impl FormationFilter {
    pub fn is_active(&self) -> bool {
        !self.search.trim().is_empty() || self.category.is_some() || self.city.is_some()
    }

    pub fn matches(&self, formation: &Formation) -> bool {
        if self.category.is_some_and(|c| c != formation.category) {
            return false;
        }
        if self.city.is_some_and(|c| c != formation.city) {
            return false;
        }

        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [
            formation.title.as_str(),
            formation.description.as_str(),
            formation.city.label(),
        ]
        .iter()
        .any(|haystack| haystack.to_lowercase().contains(&needle))
    }

    /// Matching formations, in input order.
    pub fn apply<'a>(&self, formations: &'a [Formation]) -> Vec<&'a Formation> {
        formations.iter().filter(|f| self.matches(f)).collect()
    }

    pub fn summary(&self, formations: &[Formation]) -> FilterSummary {
        FilterSummary {
            shown: self.apply(formations).len(),
            total: formations.len(),
            active: self.is_active(),
        }
    }
}

/// Result counter shown above the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSummary {
    pub shown: usize,
    pub total: usize,
    pub active: bool,
}

impl fmt::Display for FilterSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.active {
            write!(f, "{} of {} formations", self.shown, self.total)
        } else {
            write!(f, "{} formations total", self.total)
        }
    }
}
