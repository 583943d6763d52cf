//! Operator interface port traits
//!
//! The control loop only talks to the operator through these two traits:
//! it renders a `StatusSnapshot` and polls for `UserCommand`s. Neither call
//! may block longer than a UI tick.

use crate::domain::StatusSnapshot;

/// Step used by the manual nudge commands
pub const NUDGE_STEP_HZ: f64 = 1_000.0;

/// Commands the operator can issue, independent of the input device
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UserCommand {
    NextSatellite,
    PreviousSatellite,
    NextTransponder,
    PreviousTransponder,
    ToggleEngage,
    /// Tune both VFOs to the current transponder
    Tune,
    /// Move the main (uplink) VFO by the given Hz
    NudgeMain(f64),
    /// Move the sub (downlink) VFO by the given Hz
    NudgeSub(f64),
    /// Put main on 2 m and sub on 70 cm defaults
    ResetVfos,
    Quit,
}

/// Source of operator commands, polled once per UI tick
pub trait CommandSource {
    /// Next pending command, if any. Must not block.
    fn poll(&mut self) -> Option<UserCommand>;
}

/// Sink for status rendering, called once per UI tick
pub trait Display {
    fn render(&mut self, status: &StatusSnapshot);
}
