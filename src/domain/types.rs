//! Core domain types

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mean Earth rotation rate, used for the station's ECEF velocity
pub const EARTH_ROTATION_RAD_S: f64 = 7.292_115e-5;

/// Frequency in Hz.
///
/// Kept as `f64` so the rig cache can hold the exact value a Doppler
/// correction produced; the radio itself only ever sees whole hertz.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Frequency(pub f64);

impl Frequency {
    /// The "unknown" sentinel a failed hardware read reports
    pub const UNKNOWN: Frequency = Frequency(0.0);

    pub fn hz(hz: f64) -> Self {
        Self(hz)
    }

    pub fn mhz(mhz: f64) -> Self {
        Self(mhz * 1_000_000.0)
    }

    pub fn as_hz(&self) -> f64 {
        self.0
    }

    /// Whole hertz as sent over the wire. Negative values clamp to zero.
    pub fn rounded_hz(&self) -> u64 {
        self.0.round().max(0.0) as u64
    }

    pub fn is_unknown(&self) -> bool {
        self.rounded_hz() == 0
    }

    pub fn offset(&self, delta_hz: f64) -> Self {
        Self(self.0 + delta_hz)
    }
}

impl fmt::Display for Frequency {
    /// `145902918` → `145 902 918`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&group_thousands(self.0.round() as i64, false))
    }
}

/// Format an integer with space-separated thousands groups, optionally
/// with an explicit `+` for positive values (used for Doppler offsets).
pub fn group_thousands(value: i64, signed: bool) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }
    if value < 0 {
        format!("-{grouped}")
    } else if signed && value > 0 {
        format!("+{grouped}")
    } else {
        grouped
    }
}

/// Operating mode of a transponder / VFO
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    Lsb,
    Usb,
    Cw,
    Fm,
    /// Anything the radio has no code for (BPSK, FSK, ...)
    Other,
}

impl Mode {
    /// Parse a mode tag from configuration. Unknown tags map to `Other`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_uppercase().as_str() {
            "LSB" => Mode::Lsb,
            "USB" => Mode::Usb,
            "CW" => Mode::Cw,
            "FM" => Mode::Fm,
            _ => Mode::Other,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mode::Lsb => "LSB",
            Mode::Usb => "USB",
            Mode::Cw => "CW",
            Mode::Fm => "FM",
            Mode::Other => "OTHER",
        }
    }

    /// Sideband flip applied to the uplink of an inverting transponder.
    /// CW and FM have no sideband and pass through unchanged.
    pub fn inverted(&self) -> Self {
        match self {
            Mode::Usb => Mode::Lsb,
            Mode::Lsb => Mode::Usb,
            other => *other,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// One of the radio's two VFO contexts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bank {
    /// Uplink / transmit by convention
    Main,
    /// Downlink / receive by convention
    Sub,
}

impl Bank {
    pub fn other(&self) -> Self {
        match self {
            Bank::Main => Bank::Sub,
            Bank::Sub => Bank::Main,
        }
    }
}

/// Frequencies currently held by the two VFOs
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RigFrequencies {
    pub main: Frequency,
    pub sub: Frequency,
}

impl RigFrequencies {
    pub fn get(&self, bank: Bank) -> Frequency {
        match bank {
            Bank::Main => self.main,
            Bank::Sub => self.sub,
        }
    }

    pub fn set(&mut self, bank: Bank, freq: Frequency) {
        match bank {
            Bank::Main => self.main = freq,
            Bank::Sub => self.sub = freq,
        }
    }
}

/// Snapshot of a satellite's position and Doppler shift at one instant
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Observation {
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
    /// Downlink shift in Hz as observed at a 100 MHz reference
    pub doppler_100mhz_hz: f64,
}

impl Observation {
    /// Doppler ratio `r = 1 + doppler100 / 1e8`
    pub fn doppler_ratio(&self) -> f64 {
        crate::doppler::ratio_from_shift(self.doppler_100mhz_hz)
    }
}

/// Ground station position (WGS-84)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GroundStation {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    #[serde(default)]
    pub altitude_m: f64,
}

impl GroundStation {
    pub fn lat_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }

    pub fn lon_rad(&self) -> f64 {
        self.longitude_deg.to_radians()
    }

    pub fn position_ecef_km(&self) -> [f64; 3] {
        // WGS-84 constants
        let a = 6378.137;
        let e2 = 0.00669437999014;
        let (sin_lat, cos_lat) = self.lat_rad().sin_cos();
        let (sin_lon, cos_lon) = self.lon_rad().sin_cos();
        let n = a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        let alt_km = self.altitude_m / 1000.0;
        [
            (n + alt_km) * cos_lat * cos_lon,
            (n + alt_km) * cos_lat * sin_lon,
            (n * (1.0 - e2) + alt_km) * sin_lat,
        ]
    }

    pub fn velocity_ecef_km_s(&self) -> [f64; 3] {
        let pos = self.position_ecef_km();
        [
            -EARTH_ROTATION_RAD_S * pos[1],
            EARTH_ROTATION_RAD_S * pos[0],
            0.0,
        ]
    }
}

/// Information about a serial port
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerialPortInfo {
    pub name: String,
    pub port_type: String,
}
