//! Band plan: which amateur band a dial frequency belongs to
//!
//! The IC-821H carries one band per VFO context. Moving a context to a
//! frequency on the other band requires exchanging main and sub first.

use crate::domain::Frequency;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    /// 2 m
    Vhf,
    /// 70 cm
    Uhf,
}

/// Inclusive frequency range covered by one band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandRange {
    pub band: Band,
    pub low_hz: u64,
    pub high_hz: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BandPlan {
    ranges: Vec<BandRange>,
}

impl BandPlan {
    pub fn new(ranges: Vec<BandRange>) -> Self {
        Self { ranges }
    }

    /// Tuning ranges of the IC-821H (wide RX coverage, all regions)
    pub fn ic821h() -> Self {
        Self::new(vec![
            BandRange {
                band: Band::Vhf,
                low_hz: 136_000_000,
                high_hz: 174_000_000,
            },
            BandRange {
                band: Band::Uhf,
                low_hz: 420_000_000,
                high_hz: 470_000_000,
            },
        ])
    }

    pub fn band_of(&self, freq: Frequency) -> Option<Band> {
        let hz = freq.rounded_hz();
        self.ranges
            .iter()
            .find(|r| (r.low_hz..=r.high_hz).contains(&hz))
            .map(|r| r.band)
    }

    /// True when moving a context from `current` to `target` crosses
    /// bands. An unknown band on either side is not a crossing.
    pub fn crosses_band(&self, current: Frequency, target: Frequency) -> bool {
        match (self.band_of(current), self.band_of(target)) {
            (Some(a), Some(b)) => a != b,
            _ => false,
        }
    }
}

impl Default for BandPlan {
    fn default() -> Self {
        Self::ic821h()
    }
}
