//! Satellites and their transponders

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Frequency, GroundStation, Mode, Observation, SatrigError, SatrigResult};
use crate::ports::Ephemeris;

/// A frequency segment given by its centre and width.
/// A width of zero is a single, non-tunable frequency (beacon, FM channel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passband {
    pub center_hz: u64,
    pub width_hz: u64,
}

/// Where a satellite-side frequency lies relative to a passband
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PassbandPosition {
    Below,
    /// Fraction across the passband, 0.0 = low edge, 1.0 = high edge
    Within(f64),
    Above,
}

impl Passband {
    /// Build from band edges. `high` absent means a single frequency.
    pub fn from_edges(low: u64, high: Option<u64>) -> SatrigResult<Self> {
        match high {
            None => Ok(Self {
                center_hz: low,
                width_hz: 0,
            }),
            Some(high) if high < low => Err(SatrigError::Config(format!(
                "passband high edge {high} Hz is below low edge {low} Hz"
            ))),
            Some(high) => Ok(Self {
                center_hz: (low + high) / 2,
                width_hz: high - low,
            }),
        }
    }

    pub fn center(&self) -> Frequency {
        Frequency::hz(self.center_hz as f64)
    }

    pub fn is_tunable(&self) -> bool {
        self.width_hz > 0
    }

    /// Position of `freq` inside the passband, or `None` for a single frequency.
    pub fn position(&self, freq: Frequency) -> Option<PassbandPosition> {
        if !self.is_tunable() {
            return None;
        }
        let half = self.width_hz as f64 / 2.0;
        let low = self.center_hz as f64 - half;
        let high = self.center_hz as f64 + half;
        let f = freq.as_hz();
        Some(if f < low {
            PassbandPosition::Below
        } else if f > high {
            PassbandPosition::Above
        } else {
            PassbandPosition::Within((f - low) / (high - low))
        })
    }
}

/// A satellite transponder: immutable once loaded
#[derive(Debug, Clone, PartialEq)]
pub struct Transponder {
    pub name: String,
    pub mode: Mode,
    pub inverting: bool,
    pub downlink: Passband,
    /// `None` when the transponder cannot be transmitted into
    pub uplink: Option<Passband>,
}

impl Transponder {
    /// Uplink passband, if transmitting is enabled. A zero uplink
    /// frequency disables transmit.
    pub fn active_uplink(&self) -> Option<Passband> {
        self.uplink.filter(|p| p.center_hz > 0)
    }

    pub fn has_uplink(&self) -> bool {
        self.active_uplink().is_some()
    }

    /// Mode for the uplink VFO: sidebands flip on an inverting transponder.
    pub fn uplink_mode(&self) -> Mode {
        if self.inverting {
            self.mode.inverted()
        } else {
            self.mode
        }
    }
}

/// Two-line element set, with the optional name line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwoLineElements {
    pub name: Option<String>,
    pub line1: String,
    pub line2: String,
}

impl TwoLineElements {
    /// Parse 2- or 3-line TLE text. Blank lines and surrounding whitespace are ignored.
    pub fn parse(text: &str) -> SatrigResult<Self> {
        let lines: Vec<&str> = text
            .lines()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect();

        match lines.as_slice() {
            [line1, line2] => Ok(Self {
                name: None,
                line1: line1.to_string(),
                line2: line2.to_string(),
            }),
            [name, line1, line2] => Ok(Self {
                name: Some(name.trim_start_matches("0 ").to_string()),
                line1: line1.to_string(),
                line2: line2.to_string(),
            }),
            _ => Err(SatrigError::Config(format!(
                "expected 2 or 3 TLE lines, got {}",
                lines.len()
            ))),
        }
    }
}

/// A tracked satellite. Only `observation` changes after loading, and only
/// through `update`.
#[derive(Debug, Clone)]
pub struct Satellite {
    pub id: String,
    pub name: String,
    pub tle: TwoLineElements,
    pub station: GroundStation,
    pub transponders: Vec<Transponder>,
    observation: Observation,
}

impl Satellite {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        tle: TwoLineElements,
        station: GroundStation,
        transponders: Vec<Transponder>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tle,
            station,
            transponders,
            observation: Observation::default(),
        }
    }

    pub fn observation(&self) -> &Observation {
        &self.observation
    }

    /// Live Doppler ratio from the latest observation
    pub fn doppler_ratio(&self) -> f64 {
        self.observation.doppler_ratio()
    }

    /// Refresh the observation for `at`. On failure the previous
    /// observation is kept and the error is returned for logging.
    pub fn update(&mut self, ephemeris: &mut dyn Ephemeris, at: DateTime<Utc>) -> SatrigResult<()> {
        let observation = ephemeris.observe(&self.id, &self.tle, &self.station, at)?;
        self.observation = observation;
        Ok(())
    }

    /// Replace the observation directly (used by test doubles and replays)
    pub fn set_observation(&mut self, observation: Observation) {
        self.observation = observation;
    }
}
