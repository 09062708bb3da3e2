use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::QueryError;

/// A validated, trimmed city name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityQuery(String);

impl CityQuery {
    /// Trims `input` and rejects it when nothing is left.
    pub fn parse(input: &str) -> Result<Self, QueryError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(QueryError::EmptyQuery);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CityQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub location: String,
    pub temperature_c: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub timestamp: DateTime<Utc>,
    pub temperature_c: f64,
    pub description: String,
}

/// Daily forecast: at most [`ForecastSet::MAX_DAYS`] entries, one per calendar day,
/// strictly ascending. Built with [`ForecastSet::from_samples`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ForecastSet(pub(crate) Vec<ForecastEntry>);

impl ForecastSet {
    pub const MAX_DAYS: usize = 5;

    pub fn entries(&self) -> &[ForecastEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ForecastEntry> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a ForecastSet {
    type Item = &'a ForecastEntry;
    type IntoIter = std::slice::Iter<'a, ForecastEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub current: CurrentConditions,
    pub forecast: ForecastSet,
}
