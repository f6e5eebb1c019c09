//! Location geocoding
//!
//! Maps venue names to coordinates. Known coordinates live in a persistent,
//! append-only cache; missing ones are resolved through an external geocoder
//! on scheduled days only.

pub mod cache;
pub mod provider;
pub mod resolver;

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

// Re-export main types
pub use cache::{LocationCache, MemoryLocationCache, SqliteLocationCache};
pub use provider::{Geocoder, NominatimGeocoder};
pub use resolver::{LocationResolver, ResolveReport};

/// Geocoding errors
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Cache error: {0}")]
    CacheError(String),
}

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Whether both components are finite and in range.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Read-only coordinate lookup by exact location name.
pub trait CoordinateLookup {
    fn coordinates(&self, location: &str) -> Option<Coordinates>;
}

impl CoordinateLookup for HashMap<String, Coordinates> {
    fn coordinates(&self, location: &str) -> Option<Coordinates> {
        self.get(location).copied()
    }
}

/// Days of the week on which new locations may be geocoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshSchedule {
    pub days: Vec<Weekday>,
}

impl RefreshSchedule {
    /// Allow refreshes every day.
    pub fn always() -> Self {
        Self {
            days: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
                Weekday::Sat,
                Weekday::Sun,
            ],
        }
    }

    /// Never refresh; cache reads only.
    pub fn never() -> Self {
        Self { days: Vec::new() }
    }

    pub fn allows(&self, day: Weekday) -> bool {
        self.days.contains(&day)
    }
}

impl Default for RefreshSchedule {
    /// Fridays, Saturdays and Sundays.
    fn default() -> Self {
        Self {
            days: vec![Weekday::Fri, Weekday::Sat, Weekday::Sun],
        }
    }
}
