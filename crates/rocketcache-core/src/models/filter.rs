use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::Rocket;
use crate::utils::contains_ignore_case;

/// Tri-state filter on the `active` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl ActiveFilter {
    pub fn matches(&self, active: bool) -> bool {
        match self {
            ActiveFilter::All => true,
            ActiveFilter::Active => active,
            ActiveFilter::Inactive => !active,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActiveFilter::All => "all",
            ActiveFilter::Active => "true",
            ActiveFilter::Inactive => "false",
        }
    }
}

impl fmt::Display for ActiveFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid active filter '{0}' (expected all, true or false)")]
pub struct ParseActiveFilterError(String);

impl FromStr for ActiveFilter {
    type Err = ParseActiveFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "" => Ok(ActiveFilter::All),
            "true" => Ok(ActiveFilter::Active),
            "false" => Ok(ActiveFilter::Inactive),
            _ => Err(ParseActiveFilterError(s.to_string())),
        }
    }
}

/// Criteria applied by the store's filtered view.
///
/// The default matches every record: empty search, no country, a cost range
/// of `0..=+inf` and all activity states.
#[derive(Debug, Clone, PartialEq)]
pub struct RocketFilter {
    pub search: String,
    /// Empty means no country restriction.
    pub country: String,
    pub cost_min: f64,
    pub cost_max: f64,
    pub active: ActiveFilter,
}

impl Default for RocketFilter {
    fn default() -> Self {
        Self {
            search: String::new(),
            country: String::new(),
            cost_min: 0.0,
            cost_max: f64::INFINITY,
            active: ActiveFilter::All,
        }
    }
}

impl RocketFilter {
    /// Check a single record against every criterion.
    pub fn matches(&self, rocket: &Rocket) -> bool {
        self.matches_with_query(rocket, &self.search.to_lowercase())
    }

    /// Apply the filter to a slice, keeping the original order.
    pub fn apply<'a>(&self, rockets: &'a [Rocket]) -> Vec<&'a Rocket> {
        // Lowercase the query once for the whole pass
        let query = self.search.to_lowercase();
        rockets
            .iter()
            .filter(|r| self.matches_with_query(r, &query))
            .collect()
    }

    /// `query` must already be lowercased.
    fn matches_with_query(&self, rocket: &Rocket, query: &str) -> bool {
        let name_ok = contains_ignore_case(&rocket.name, query);
        let country_ok = self.country.is_empty() || rocket.country == self.country;
        let cost_ok =
            rocket.cost_per_launch >= self.cost_min && rocket.cost_per_launch <= self.cost_max;
        let active_ok = self.active.matches(rocket.active);

        name_ok && country_ok && cost_ok && active_ok
    }
}
