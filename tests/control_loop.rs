//! Integration tests: control loop scheduling and command dispatch
//!
//! Ports are replaced with local test doubles: a scripted command source,
//! a display that records every snapshot, and an ephemeris that reports a
//! settable Doppler shift.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};

use satrig_lib::adapters::{MockRadio, MockRigHandle};
use satrig_lib::control::{ControlLoop, Pass};
use satrig_lib::domain::{
    Bank, Frequency, GroundStation, LoopConfig, Mode, Observation, Passband, PassbandPosition,
    Satellite, SatrigError, SatrigResult, StatusSnapshot, Transponder, TwoLineElements,
};
use satrig_lib::engine::Engine;
use satrig_lib::ports::{CommandSource, Display, Ephemeris, UserCommand};
use satrig_lib::rig::Rig;

// ---------------------------------------------------------------------------
// Test doubles
// ---------------------------------------------------------------------------

struct Scripted(VecDeque<UserCommand>);

impl CommandSource for Scripted {
    fn poll(&mut self) -> Option<UserCommand> {
        self.0.pop_front()
    }
}

struct Recorder(Arc<Mutex<Vec<StatusSnapshot>>>);

impl Display for Recorder {
    fn render(&mut self, status: &StatusSnapshot) {
        self.0.lock().unwrap().push(status.clone());
    }
}

/// Reports a settable shift, counts calls, optionally fails
struct FixedEphemeris {
    doppler100: Arc<Mutex<f64>>,
    calls: Arc<Mutex<usize>>,
    fail: bool,
}

impl Ephemeris for FixedEphemeris {
    fn observe(
        &mut self,
        _id: &str,
        _tle: &TwoLineElements,
        _station: &GroundStation,
        _at: DateTime<Utc>,
    ) -> SatrigResult<Observation> {
        *self.calls.lock().unwrap() += 1;
        if self.fail {
            return Err(SatrigError::Ephemeris("decayed".into()));
        }
        Ok(Observation {
            azimuth_deg: 90.0,
            elevation_deg: 45.0,
            doppler_100mhz_hz: *self.doppler100.lock().unwrap(),
        })
    }
}

struct Harness {
    control: ControlLoop,
    radio: MockRigHandle,
    frames: Arc<Mutex<Vec<StatusSnapshot>>>,
    ephemeris_calls: Arc<Mutex<usize>>,
    doppler100: Arc<Mutex<f64>>,
    shutdown: Arc<AtomicBool>,
}

fn satellites() -> Vec<Satellite> {
    vec![Satellite::new(
        "43137",
        "FOX-1D",
        TwoLineElements {
            name: None,
            line1: "1 43137U".into(),
            line2: "2 43137".into(),
        },
        GroundStation::default(),
        vec![Transponder {
            name: "Linear".into(),
            mode: Mode::Usb,
            inverting: true,
            downlink: Passband::from_edges(145_960_000, Some(145_990_000)).unwrap(),
            uplink: Some(Passband::from_edges(435_120_000, Some(435_150_000)).unwrap()),
        }],
    )]
}

fn harness(commands: &[UserCommand], doppler100: f64, fail: bool) -> Harness {
    let radio = MockRadio::with_frequencies(
        Frequency::hz(435_135_000.0),
        Frequency::hz(145_975_000.0),
    );
    let handle = radio.handle();
    let mut rig = Rig::new(Box::new(radio));
    rig.init();
    let engine = Engine::new(satellites(), &rig).unwrap();

    let frames = Arc::new(Mutex::new(Vec::new()));
    let calls = Arc::new(Mutex::new(0));
    let doppler = Arc::new(Mutex::new(doppler100));
    let shutdown = Arc::new(AtomicBool::new(false));
    let control = ControlLoop::new(
        engine,
        rig,
        Box::new(FixedEphemeris {
            doppler100: Arc::clone(&doppler),
            calls: Arc::clone(&calls),
            fail,
        }),
        Box::new(Scripted(commands.iter().copied().collect())),
        Box::new(Recorder(Arc::clone(&frames))),
        &LoopConfig {
            ui_interval_ms: 25,
            calc_interval_ms: 100,
        },
        Arc::clone(&shutdown),
    );

    Harness {
        control,
        radio: handle,
        frames,
        ephemeris_calls: calls,
        doppler100: doppler,
        shutdown,
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn calculation_runs_every_nth_ui_tick() {
    let mut h = harness(&[], 0.0, false);
    assert_eq!(h.control.calc_every(), 4);
    for _ in 0..9 {
        h.control.step(now());
    }
    // Passes 0, 4 and 8
    assert_eq!(*h.ephemeris_calls.lock().unwrap(), 3);
    assert_eq!(h.frames.lock().unwrap().len(), 9);
}

#[test]
fn engaging_mid_pass_does_not_jump_dials() {
    let mut h = harness(&[UserCommand::ToggleEngage], 2_000.0, false);

    // Pass 0 ticks disengaged (baseline follows), then engages
    for _ in 0..5 {
        h.control.step(now());
    }
    // Pass 4 ran the first engaged tick with an unchanged ratio
    assert!(h.radio.lock().unwrap().frequency_writes.is_empty());

    let frames = h.frames.lock().unwrap();
    assert!(frames.iter().all(|f| !f.radio_activity));
    assert!(frames.last().unwrap().engaged);
}

#[test]
fn correction_flags_radio_activity_for_one_render() {
    let mut h = harness(&[UserCommand::ToggleEngage], 2_000.0, false);
    for _ in 0..4 {
        h.control.step(now());
    }

    *h.doppler100.lock().unwrap() = 4_000.0;
    h.control.step(now());
    h.control.step(now());

    let frames = h.frames.lock().unwrap();
    assert!(frames[4].radio_activity);
    assert!(!frames[5].radio_activity);
    // 145 975 000 moved by the extra 2e-5
    assert_eq!(
        h.radio.lock().unwrap().sub.frequency.rounded_hz(),
        (145_975_000.0_f64 / 1.00002 * 1.00004).round() as u64
    );
}

#[test]
fn quit_sets_shutdown_flag() {
    let mut h = harness(&[UserCommand::Quit], 0.0, false);
    assert_eq!(h.control.step(now()), Pass::Quit);
    assert!(h.shutdown.load(Ordering::SeqCst));
}

#[test]
fn run_returns_when_shutdown_already_set() {
    let mut h = harness(&[], 0.0, false);
    h.shutdown.store(true, Ordering::SeqCst);
    h.control.run();
    assert!(h.frames.lock().unwrap().is_empty());
}

#[test]
fn nudges_move_one_vfo_by_a_kilohertz() {
    let mut h = harness(
        &[UserCommand::NudgeMain(1_000.0), UserCommand::NudgeSub(-1_000.0)],
        0.0,
        false,
    );
    h.control.step(now());
    h.control.step(now());

    let radio = h.radio.lock().unwrap();
    assert_eq!(radio.main.frequency, Frequency::hz(435_136_000.0));
    assert_eq!(radio.sub.frequency, Frequency::hz(145_974_000.0));
}

#[test]
fn reset_puts_vfos_on_band_defaults() {
    let mut h = harness(&[UserCommand::ResetVfos], 0.0, false);
    h.control.step(now());

    let radio = h.radio.lock().unwrap();
    assert_eq!(radio.main.frequency, Frequency::hz(145_000_000.0));
    assert_eq!(radio.sub.frequency, Frequency::hz(435_000_000.0));
}

#[test]
fn tune_command_reaches_the_radio() {
    let mut h = harness(&[UserCommand::Tune], 0.0, false);
    h.control.step(now());
    let radio = h.radio.lock().unwrap();
    assert_eq!(radio.main.mode, Mode::Lsb);
    assert_eq!(radio.sub.mode, Mode::Usb);
}

#[test]
fn snapshot_reports_satellite_side_frequencies() {
    // +1000 Hz at 100 MHz
    let mut h = harness(&[], 1_000.0, false);
    h.control.step(now());

    let frames = h.frames.lock().unwrap();
    let status = &frames[0];
    assert_eq!(status.satellite_name, "FOX-1D");
    assert_eq!(status.observation.elevation_deg, 45.0);
    assert!(status.rig_connected);
    assert!(!status.engaged);

    // Dial 145 975 000 at r = 1.00001 sits ~1460 Hz above the satellite
    assert!((status.downlink.doppler_hz - 1_459.75).abs() < 1e-6);
    assert_eq!(status.downlink.satellite.rounded_hz(), 145_973_540);
    assert!(matches!(
        status.downlink.passband,
        Some(PassbandPosition::Within(_))
    ));
    assert!(status.uplink.doppler_hz < 0.0);
}

#[test]
fn ephemeris_failure_keeps_loop_running() {
    let mut h = harness(&[], 0.0, true);
    for _ in 0..5 {
        assert_eq!(h.control.step(now()), Pass::Continue);
    }
    assert_eq!(*h.ephemeris_calls.lock().unwrap(), 2);
    let frames = h.frames.lock().unwrap();
    assert_eq!(frames.last().unwrap().observation, Observation::default());
    assert_eq!(
        h.control.rig().frequency(Bank::Sub),
        Frequency::hz(145_975_000.0)
    );
}
