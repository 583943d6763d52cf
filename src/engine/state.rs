//! Engine state and the pure tick planner
//!
//! Every transition here takes a state by value and returns the next one.
//! The `Engine` wrapper is the only place hardware effects happen.

use crate::doppler::retarget;
use crate::domain::{Frequency, RigFrequencies};

/// Smallest correction worth sending to the radio
pub const CORRECTION_THRESHOLD_HZ: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineState {
    pub engaged: bool,
    pub satellite_index: usize,
    pub transponder_index: usize,
    /// Main dial as recorded after the previous tick
    pub f_main_prev: Frequency,
    /// Sub dial as recorded after the previous tick
    pub f_sub_prev: Frequency,
    /// Doppler ratio the dials were last corrected for
    pub baseline_ratio: f64,
}

impl EngineState {
    pub fn new(rig: RigFrequencies, baseline_ratio: f64) -> Self {
        Self {
            engaged: false,
            satellite_index: 0,
            transponder_index: 0,
            f_main_prev: rig.main,
            f_sub_prev: rig.sub,
            baseline_ratio,
        }
    }

    pub fn toggled(self) -> Self {
        Self {
            engaged: !self.engaged,
            ..self
        }
    }

    /// Select a satellite: disengages and starts at its first transponder
    pub fn with_satellite(self, index: usize) -> Self {
        Self {
            engaged: false,
            satellite_index: index,
            transponder_index: 0,
            ..self
        }
    }

    /// Select a transponder of the current satellite: disengages
    pub fn with_transponder(self, index: usize) -> Self {
        Self {
            engaged: false,
            transponder_index: index,
            ..self
        }
    }

    /// State after a tick: the planned baseline, and the dials as they
    /// stand once the plan was written.
    pub fn advance(self, baseline_ratio: f64, rig_after: RigFrequencies) -> Self {
        Self {
            f_main_prev: rig_after.main,
            f_sub_prev: rig_after.sub,
            baseline_ratio,
            ..self
        }
    }
}

/// What one tick decided to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickPlan {
    /// New main dial, if it is to be written
    pub main: Option<Frequency>,
    /// New sub dial, if it is to be written
    pub sub: Option<Frequency>,
    /// Baseline to carry into the next tick
    pub baseline_ratio: f64,
    /// Operator moved the main dial since the last tick
    pub manual_main: bool,
    /// Operator moved the sub dial since the last tick
    pub manual_sub: bool,
}

impl TickPlan {
    fn idle(baseline_ratio: f64) -> Self {
        Self {
            main: None,
            sub: None,
            baseline_ratio,
            manual_main: false,
            manual_sub: false,
        }
    }

    pub fn writes(&self) -> bool {
        self.main.is_some() || self.sub.is_some()
    }
}

/// Decide the corrections for one tick.
///
/// Disengaged, the baseline simply follows the live ratio. Engaged, each
/// dial is moved from the baseline ratio to the live one; if neither moves
/// by the threshold nothing is written and the baseline stays put, so slow
/// drift accumulates until it is worth a write. A dial the operator turned
/// since the last tick, or one that reads unknown, is left alone.
pub fn plan_tick(state: &EngineState, rig: RigFrequencies, live_ratio: f64) -> TickPlan {
    if !state.engaged {
        return TickPlan::idle(live_ratio);
    }

    let manual_main = rig.main != state.f_main_prev;
    let manual_sub = rig.sub != state.f_sub_prev;

    let target_main = retarget(rig.main.as_hz(), state.baseline_ratio, live_ratio, true);
    let target_sub = retarget(rig.sub.as_hz(), state.baseline_ratio, live_ratio, false);

    let exceeds = (rig.main.as_hz() - target_main).abs() >= CORRECTION_THRESHOLD_HZ
        || (rig.sub.as_hz() - target_sub).abs() >= CORRECTION_THRESHOLD_HZ;
    if !exceeds {
        return TickPlan {
            manual_main,
            manual_sub,
            ..TickPlan::idle(state.baseline_ratio)
        };
    }

    let correct = |manual: bool, dial: Frequency, target: f64| {
        (!manual && !dial.is_unknown()).then(|| Frequency::hz(target))
    };

    TickPlan {
        main: correct(manual_main, rig.main, target_main),
        sub: correct(manual_sub, rig.sub, target_sub),
        baseline_ratio: live_ratio,
        manual_main,
        manual_sub,
    }
}
