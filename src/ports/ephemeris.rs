//! Ephemeris port trait

use chrono::{DateTime, Utc};

use crate::domain::{GroundStation, Observation, SatrigResult, TwoLineElements};

/// Orbit propagation: where a satellite is, seen from a station, at an instant.
pub trait Ephemeris {
    /// Observe satellite `id` with elements `tle` from `station` at `at`.
    ///
    /// Implementations may cache per `id`; elements for an id never change
    /// after loading.
    fn observe(
        &mut self,
        id: &str,
        tle: &TwoLineElements,
        station: &GroundStation,
        at: DateTime<Utc>,
    ) -> SatrigResult<Observation>;
}
