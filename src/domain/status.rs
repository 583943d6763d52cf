//! Status view handed to the operator display each UI tick

use super::{Frequency, Mode, Observation, PassbandPosition};

/// One VFO as the operator sees it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VfoStatus {
    /// Frequency on the radio's dial
    pub dial: Frequency,
    /// Doppler offset between dial and satellite frequency
    pub doppler_hz: f64,
    /// Frequency the dial corresponds to on the satellite
    pub satellite: Frequency,
    /// Where `satellite` sits in the transponder passband, if it has a width
    pub passband: Option<PassbandPosition>,
}

/// Everything the display needs, computed once per UI tick
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSnapshot {
    pub satellite_name: String,
    pub observation: Observation,
    pub transponder_index: usize,
    pub transponder_count: usize,
    pub transponder_name: String,
    pub transponder_mode: Mode,
    pub inverting: bool,
    pub engaged: bool,
    /// A correction was written since the last render
    pub radio_activity: bool,
    /// False once the rig has degraded to the no-op stub
    pub rig_connected: bool,
    /// Sub VFO (receive)
    pub downlink: VfoStatus,
    /// Main VFO (transmit)
    pub uplink: VfoStatus,
}
