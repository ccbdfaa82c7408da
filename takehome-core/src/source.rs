use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::CityRecord;

/// Read-only lookup of raw city records by canonical city name.
///
/// The resolver never mutates a source; loaders build one up front and the
/// caller passes it by reference.
pub trait CityDataSource {
    fn city_record(
        &self,
        name: &str,
    ) -> Option<&CityRecord>;

    /// Canonical names of every city the source knows, in a stable order.
    fn city_names(&self) -> Vec<&str>;
}

/// In-memory [`CityDataSource`] keyed by canonical city name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CityTable {
    records: BTreeMap<String, CityRecord>,
}

impl CityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the record for `name`, returning the previous one.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        record: CityRecord,
    ) -> Option<CityRecord> {
        self.records.insert(name.into(), record)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<(String, CityRecord)> for CityTable {
    fn from_iter<I: IntoIterator<Item = (String, CityRecord)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl CityDataSource for CityTable {
    fn city_record(
        &self,
        name: &str,
    ) -> Option<&CityRecord> {
        self.records.get(name)
    }

    fn city_names(&self) -> Vec<&str> {
        self.records.keys().map(String::as_str).collect()
    }
}
