//! Control loop
//!
//! A fixed-period scheduler on the main thread. Every UI tick renders the
//! status and handles at most one operator command; every Nth UI tick
//! (N = calc interval / UI interval) first refreshes the ephemeris and runs
//! one engine tick. The loop owns the rig and the engine outright, so no
//! locking is involved. Shutdown is cooperative through a shared flag
//! checked between passes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::doppler::{doppler_shift, satellite_frequency_from_observed};
use crate::domain::{Bank, Frequency, LoopConfig, Passband, StatusSnapshot, VfoStatus};
use crate::engine::Engine;
use crate::ports::{CommandSource, Display, Ephemeris, UserCommand};
use crate::rig::Rig;

/// Frequencies "reset VFOs" puts the dials on
pub const RESET_MAIN_HZ: f64 = 145_000_000.0;
pub const RESET_SUB_HZ: f64 = 435_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Continue,
    Quit,
}

pub struct ControlLoop {
    engine: Engine,
    rig: Rig,
    ephemeris: Box<dyn Ephemeris>,
    commands: Box<dyn CommandSource>,
    display: Box<dyn Display>,
    ui_interval: Duration,
    calc_every: u64,
    calc_countdown: u64,
    radio_activity: bool,
    shutdown: Arc<AtomicBool>,
}

impl ControlLoop {
    pub fn new(
        engine: Engine,
        rig: Rig,
        ephemeris: Box<dyn Ephemeris>,
        commands: Box<dyn CommandSource>,
        display: Box<dyn Display>,
        timing: &LoopConfig,
        shutdown: Arc<AtomicBool>,
    ) -> Self {
        let ui_ms = timing.ui_interval_ms.max(1);
        Self {
            engine,
            rig,
            ephemeris,
            commands,
            display,
            ui_interval: Duration::from_millis(ui_ms),
            calc_every: (timing.calc_interval_ms / ui_ms).max(1),
            calc_countdown: 0,
            radio_activity: false,
            shutdown,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn rig(&self) -> &Rig {
        &self.rig
    }

    /// UI ticks per calculation tick
    pub fn calc_every(&self) -> u64 {
        self.calc_every
    }

    /// Run passes until quit or shutdown, sleeping one UI interval between
    /// them.
    pub fn run(&mut self) {
        log::info!(
            "Control loop running: UI every {:?}, calculation every {} UI ticks",
            self.ui_interval,
            self.calc_every
        );
        while !self.shutdown.load(Ordering::SeqCst) {
            if self.step(Utc::now()) == Pass::Quit {
                break;
            }
            thread::sleep(self.ui_interval);
        }
        log::info!("Control loop stopped");
    }

    /// One UI pass at `now`, without sleeping.
    pub fn step(&mut self, now: DateTime<Utc>) -> Pass {
        if self.calc_countdown == 0 {
            self.engine.refresh_observation(self.ephemeris.as_mut(), now);
            let plan = self.engine.tick(&mut self.rig);
            if plan.writes() {
                self.radio_activity = true;
            }
            self.calc_countdown = self.calc_every;
        }
        self.calc_countdown -= 1;

        let status = self.snapshot();
        self.display.render(&status);
        self.radio_activity = false;

        match self.commands.poll() {
            Some(cmd) => self.handle(cmd),
            None => Pass::Continue,
        }
    }

    /// Carry out one operator command
    pub fn handle(&mut self, cmd: UserCommand) -> Pass {
        log::debug!("Command: {cmd:?}");
        match cmd {
            UserCommand::NextSatellite => self.engine.next_satellite(),
            UserCommand::PreviousSatellite => self.engine.previous_satellite(),
            UserCommand::NextTransponder => self.engine.next_transponder(),
            UserCommand::PreviousTransponder => self.engine.previous_transponder(),
            UserCommand::ToggleEngage => self.engine.toggle_engage(),
            UserCommand::Tune => self.engine.tune(&mut self.rig),
            UserCommand::NudgeMain(delta) => self.nudge(Bank::Main, delta),
            UserCommand::NudgeSub(delta) => self.nudge(Bank::Sub, delta),
            UserCommand::ResetVfos => {
                self.rig.set_main_frequency(Frequency::hz(RESET_MAIN_HZ));
                self.rig.set_sub_frequency(Frequency::hz(RESET_SUB_HZ));
                log::info!("VFOs reset to {RESET_MAIN_HZ} / {RESET_SUB_HZ} Hz");
            }
            UserCommand::Quit => {
                self.shutdown.store(true, Ordering::SeqCst);
                return Pass::Quit;
            }
        }
        Pass::Continue
    }

    fn nudge(&mut self, bank: Bank, delta_hz: f64) {
        let current = self.rig.frequency(bank);
        if current.is_unknown() {
            log::warn!("{bank:?} frequency unknown, nudge ignored");
            return;
        }
        self.rig.set_frequency(bank, current.offset(delta_hz));
    }

    /// Status as of now, for the display
    pub fn snapshot(&self) -> StatusSnapshot {
        let sat = self.engine.satellite();
        let trsp = self.engine.transponder();
        let state = self.engine.state();
        let observation = *sat.observation();
        let ratio = observation.doppler_ratio();
        let doppler100 = observation.doppler_100mhz_hz;

        let vfo = |dial: Frequency, passband: Option<&Passband>, tx: bool| {
            let satellite = Frequency::hz(satellite_frequency_from_observed(dial.as_hz(), ratio, tx));
            VfoStatus {
                dial,
                doppler_hz: doppler_shift(dial.as_hz(), doppler100, tx),
                satellite,
                passband: passband.and_then(|p| p.position(satellite)),
            }
        };

        StatusSnapshot {
            satellite_name: sat.name.clone(),
            observation,
            transponder_index: state.transponder_index,
            transponder_count: sat.transponders.len(),
            transponder_name: trsp.name.clone(),
            transponder_mode: trsp.mode,
            inverting: trsp.inverting,
            engaged: state.engaged,
            radio_activity: self.radio_activity,
            rig_connected: self.rig.is_connected(),
            downlink: vfo(self.rig.frequency(Bank::Sub), Some(&trsp.downlink), false),
            uplink: vfo(self.rig.frequency(Bank::Main), trsp.active_uplink().as_ref(), true),
        }
    }
}
