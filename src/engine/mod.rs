//! Rig synchronization engine
//!
//! Owns the satellite list and the `EngineState`, and is the only thing
//! that decides when the radio gets retuned. Decisions come from the pure
//! `plan_tick`; this module only carries them out against the `Rig`.

pub mod state;

use chrono::{DateTime, Utc};

use crate::doppler::observed_frequency_from_satellite;
use crate::domain::{Bank, Frequency, Mode, Satellite, SatrigError, SatrigResult, Transponder};
use crate::ports::Ephemeris;
use crate::rig::Rig;

pub use state::{plan_tick, EngineState, TickPlan, CORRECTION_THRESHOLD_HZ};

pub struct Engine {
    satellites: Vec<Satellite>,
    state: EngineState,
}

impl Engine {
    /// Start disengaged on the first satellite, with the rig's current
    /// dials as the reference for manual-change detection.
    pub fn new(satellites: Vec<Satellite>, rig: &Rig) -> SatrigResult<Self> {
        if satellites.is_empty() {
            return Err(SatrigError::Config("No satellites to track".into()));
        }
        if let Some(sat) = satellites.iter().find(|s| s.transponders.is_empty()) {
            return Err(SatrigError::Config(format!(
                "Satellite {} has no transponders",
                sat.name
            )));
        }
        let baseline = satellites[0].doppler_ratio();
        Ok(Self {
            satellites,
            state: EngineState::new(rig.frequencies(), baseline),
        })
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn satellites(&self) -> &[Satellite] {
        &self.satellites
    }

    pub fn satellite(&self) -> &Satellite {
        &self.satellites[self.state.satellite_index]
    }

    /// Current satellite, for observation updates
    pub fn satellite_mut(&mut self) -> &mut Satellite {
        &mut self.satellites[self.state.satellite_index]
    }

    pub fn transponder(&self) -> &Transponder {
        &self.satellite().transponders[self.state.transponder_index]
    }

    pub fn is_engaged(&self) -> bool {
        self.state.engaged
    }

    /// Propagate the current satellite to `at`. A failure keeps the
    /// previous observation.
    pub fn refresh_observation(&mut self, ephemeris: &mut dyn Ephemeris, at: DateTime<Utc>) {
        let sat = self.satellite_mut();
        if let Err(e) = sat.update(ephemeris, at) {
            log::warn!("Ephemeris update for {} failed: {e}", sat.name);
        }
    }

    /// One calculation tick: read the dials, correct them if due, and
    /// remember where they ended up.
    pub fn tick(&mut self, rig: &mut Rig) -> TickPlan {
        let dials = rig.read_frequencies();
        let live_ratio = self.satellite().doppler_ratio();
        let plan = plan_tick(&self.state, dials, live_ratio);

        if plan.manual_main || plan.manual_sub {
            log::debug!(
                "Manual tuning detected (main={}, sub={})",
                plan.manual_main,
                plan.manual_sub
            );
        }
        if let Some(main) = plan.main {
            rig.set_main_frequency(main);
        }
        if let Some(sub) = plan.sub {
            rig.set_sub_frequency(sub);
        }
        if plan.writes() {
            log::info!(
                "Doppler correction r={:.9}: main={} sub={}",
                live_ratio,
                rig.frequency(Bank::Main),
                rig.frequency(Bank::Sub)
            );
        }

        self.state = self.state.advance(plan.baseline_ratio, rig.frequencies());
        plan
    }

    pub fn toggle_engage(&mut self) {
        self.state = self.state.toggled();
        log::info!(
            "Tracking {}",
            if self.state.engaged { "engaged" } else { "disengaged" }
        );
    }

    pub fn next_satellite(&mut self) {
        self.select_satellite(1);
    }

    pub fn previous_satellite(&mut self) {
        self.select_satellite(-1);
    }

    pub fn next_transponder(&mut self) {
        self.select_transponder(1);
    }

    pub fn previous_transponder(&mut self) {
        self.select_transponder(-1);
    }

    fn select_satellite(&mut self, step: isize) {
        let index = wrap(self.state.satellite_index, step, self.satellites.len());
        self.state = self.state.with_satellite(index);
        log::info!("Selected satellite {}", self.satellite().name);
    }

    fn select_transponder(&mut self, step: isize) {
        let count = self.satellite().transponders.len();
        let index = wrap(self.state.transponder_index, step, count);
        self.state = self.state.with_transponder(index);
        log::info!("Selected transponder {}", self.transponder().name);
    }

    /// Put the dials on the centre of the current transponder at the live
    /// ratio and set the modes. Tracking is not engaged.
    pub fn tune(&mut self, rig: &mut Rig) {
        let ratio = self.satellite().doppler_ratio();
        let trsp = self.transponder().clone();

        let downlink = observed_frequency_from_satellite(trsp.downlink.center().as_hz(), ratio, false);
        rig.set_sub_frequency(Frequency::hz(downlink));

        if let Some(uplink) = trsp.active_uplink() {
            let uplink = observed_frequency_from_satellite(uplink.center().as_hz(), ratio, true);
            rig.set_main_frequency(Frequency::hz(uplink));
        }

        let sub_mode = if rig.supports_mode(trsp.mode) {
            trsp.mode
        } else {
            Mode::Usb
        };
        rig.set_mode(Bank::Sub, sub_mode);
        if trsp.has_uplink() {
            rig.set_mode(Bank::Main, trsp.uplink_mode());
        }

        log::info!(
            "Tuned to {} {}: sub={} main={}",
            self.satellite().name,
            trsp.name,
            rig.frequency(Bank::Sub),
            rig.frequency(Bank::Main)
        );
    }
}

fn wrap(index: usize, step: isize, len: usize) -> usize {
    (index as isize + step).rem_euclid(len as isize) as usize
}
