//! Configuration records
//!
//! A Configuration describes one ground station: its position, the radio
//! it drives, the control loop timing, and the satellites it can track.
//! Parsed from JSON by the config file adapter, then turned into domain
//! `Satellite`s once and never touched again.

use serde::{Deserialize, Serialize};

use super::GroundStation;

fn default_port() -> String {
    "/dev/ttyUSB0".to_string()
}

fn default_baud_rate() -> u32 {
    19200
}

fn default_civ_address() -> u8 {
    0x4C
}

fn default_ui_interval_ms() -> u64 {
    25
}

fn default_calc_interval_ms() -> u64 {
    300
}

/// Serial link to the radio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigConfig {
    /// Serial device path
    #[serde(default = "default_port")]
    pub port: String,
    /// Serial baud rate
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    /// CI-V bus address of the radio (IC-821H default 0x4C)
    #[serde(default = "default_civ_address")]
    pub civ_address: u8,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            baud_rate: default_baud_rate(),
            civ_address: default_civ_address(),
        }
    }
}

/// Control loop cadence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopConfig {
    /// UI refresh / input poll period
    #[serde(default = "default_ui_interval_ms")]
    pub ui_interval_ms: u64,
    /// Ephemeris + rig correction period
    #[serde(default = "default_calc_interval_ms")]
    pub calc_interval_ms: u64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            ui_interval_ms: default_ui_interval_ms(),
            calc_interval_ms: default_calc_interval_ms(),
        }
    }
}

/// One transponder as written in the config file (band edges, not centres)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransponderConfig {
    pub name: String,
    pub mode: String,
    #[serde(default)]
    pub invert: bool,
    pub down_low: u64,
    #[serde(default)]
    pub down_high: Option<u64>,
    #[serde(default)]
    pub up_low: Option<u64>,
    #[serde(default)]
    pub up_high: Option<u64>,
}

/// One satellite as written in the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SatelliteConfig {
    /// Catalogue identifier (usually the NORAD number)
    pub id: String,
    /// Display name; falls back to the TLE name line, then the id
    #[serde(default)]
    pub name: Option<String>,
    /// Two or three TLE lines separated by newlines
    pub tle: String,
    #[serde(default)]
    pub transponders: Vec<TransponderConfig>,
}

/// A complete station configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub station: GroundStation,
    #[serde(default)]
    pub rig: RigConfig,
    #[serde(default, rename = "loop")]
    pub timing: LoopConfig,
    pub satellites: Vec<SatelliteConfig>,
}
