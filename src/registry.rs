//! Static mapping from city to the CSV file holding its trips.

use crate::error::Result;
use crate::models::City;
use std::path::PathBuf;

/// Resolves city data files under a base directory.
#[derive(Debug, Clone)]
pub struct Registry {
    data_dir: PathBuf,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(".")
    }
}

impl Registry {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// File name of a city's dataset, relative to the data directory.
    pub fn file_name(city: City) -> &'static str {
        match city {
            City::Chicago => "chicago.csv",
            City::NewYork => "new_york_city.csv",
            City::Washington => "washington.csv",
        }
    }

    pub fn source(&self, city: City) -> PathBuf {
        self.data_dir.join(Self::file_name(city))
    }

    /// Look up a raw city key. Unknown keys fail with `Error::NotFound`.
    pub fn lookup(&self, key: &str) -> Result<PathBuf> {
        let city = City::from_key(key)?;
        Ok(self.source(city))
    }
}
