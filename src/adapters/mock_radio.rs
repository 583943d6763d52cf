//! Mock radio adapter for development and testing without hardware.
//!
//! Activate by setting MOCK_RADIO=1 in the environment:
//!
//!   MOCK_RADIO=1 RUST_LOG=satrig_lib=info satrig --config station.json
//!
//! Simulates the two bands of a satellite rig, including the main/sub
//! exchange and whole-hertz frequency storage. Every RigControl call is
//! logged at INFO level. Tests keep a `MockRigHandle` to turn the dials
//! behind the engine's back and to inspect what was sent.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::{Bank, Frequency, Mode, SatrigError, SatrigResult};
use crate::ports::RigControl;

/// Default main band: 2 m satellite segment
const DEFAULT_MAIN_HZ: f64 = 145_000_000.0;
/// Default sub band: 70 cm satellite segment
const DEFAULT_SUB_HZ: f64 = 435_000_000.0;
/// Entries kept in each write log; older ones are dropped
pub const WRITE_LOG_CAPACITY: usize = 256;

/// One simulated band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MockBank {
    pub frequency: Frequency,
    pub mode: Mode,
}

/// Everything the simulated radio holds, shared with tests
#[derive(Debug, Clone, PartialEq)]
pub struct MockRigState {
    pub main: MockBank,
    pub sub: MockBank,
    pub selected: Bank,
    /// Number of main/sub exchanges performed
    pub swaps: usize,
    /// Most recent frequency writes, with the bank each landed on
    pub frequency_writes: VecDeque<(Bank, Frequency)>,
    /// Most recent mode writes, with the bank each landed on
    pub mode_writes: VecDeque<(Bank, Mode)>,
}

impl MockRigState {
    pub fn bank(&self, bank: Bank) -> &MockBank {
        match bank {
            Bank::Main => &self.main,
            Bank::Sub => &self.sub,
        }
    }

    fn bank_mut(&mut self, bank: Bank) -> &mut MockBank {
        match bank {
            Bank::Main => &mut self.main,
            Bank::Sub => &mut self.sub,
        }
    }

    /// Turn a dial directly, as the operator would
    pub fn turn_dial(&mut self, bank: Bank, freq: Frequency) {
        self.bank_mut(bank).frequency = Frequency::hz(freq.rounded_hz() as f64);
    }
}

fn record<T>(log: &mut VecDeque<T>, entry: T) {
    if log.len() == WRITE_LOG_CAPACITY {
        log.pop_front();
    }
    log.push_back(entry);
}

pub type MockRigHandle = Arc<Mutex<MockRigState>>;

pub struct MockRadio {
    state: MockRigHandle,
}

impl MockRadio {
    pub fn new() -> Self {
        Self::with_frequencies(Frequency::hz(DEFAULT_MAIN_HZ), Frequency::hz(DEFAULT_SUB_HZ))
    }

    pub fn with_frequencies(main: Frequency, sub: Frequency) -> Self {
        log::info!("[MOCK RADIO] Initialized main={main} Hz sub={sub} Hz");
        let state = MockRigState {
            main: MockBank {
                frequency: main,
                mode: Mode::Usb,
            },
            sub: MockBank {
                frequency: sub,
                mode: Mode::Usb,
            },
            selected: Bank::Sub,
            swaps: 0,
            frequency_writes: VecDeque::new(),
            mode_writes: VecDeque::new(),
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Shared view of the simulated radio
    pub fn handle(&self) -> MockRigHandle {
        Arc::clone(&self.state)
    }

    fn lock(&self) -> SatrigResult<MutexGuard<'_, MockRigState>> {
        self.state
            .lock()
            .map_err(|_| SatrigError::Serial("Mock radio state poisoned".into()))
    }
}

impl Default for MockRadio {
    fn default() -> Self {
        Self::new()
    }
}

impl RigControl for MockRadio {
    fn select_bank(&mut self, bank: Bank) -> SatrigResult<()> {
        log::info!("[MOCK RADIO] SELECT {bank:?}");
        self.lock()?.selected = bank;
        Ok(())
    }

    fn swap_banks(&mut self) -> SatrigResult<()> {
        let mut guard = self.lock()?;
        let state = &mut *guard;
        std::mem::swap(&mut state.main, &mut state.sub);
        state.swaps += 1;
        log::info!(
            "[MOCK RADIO] EXCHANGE → main={} sub={}",
            state.main.frequency,
            state.sub.frequency
        );
        Ok(())
    }

    fn select_vfo_a(&mut self) -> SatrigResult<()> {
        log::info!("[MOCK RADIO] VFO A");
        Ok(())
    }

    fn set_simplex(&mut self) -> SatrigResult<()> {
        log::info!("[MOCK RADIO] SIMPLEX");
        Ok(())
    }

    fn get_frequency(&mut self) -> SatrigResult<Frequency> {
        let state = self.lock()?;
        let freq = state.bank(state.selected).frequency;
        log::info!("[MOCK RADIO] GET FREQ {:?} → {freq}", state.selected);
        Ok(freq)
    }

    fn set_frequency(&mut self, freq: Frequency) -> SatrigResult<()> {
        let mut state = self.lock()?;
        let bank = state.selected;
        let stored = Frequency::hz(freq.rounded_hz() as f64);
        log::info!("[MOCK RADIO] SET FREQ {bank:?} → {stored}");
        state.bank_mut(bank).frequency = stored;
        record(&mut state.frequency_writes, (bank, stored));
        Ok(())
    }

    fn set_mode(&mut self, mode: Mode) -> SatrigResult<()> {
        if !self.supports_mode(mode) {
            return Ok(());
        }
        let mut state = self.lock()?;
        let bank = state.selected;
        log::info!("[MOCK RADIO] SET MODE {bank:?} → {mode}");
        state.bank_mut(bank).mode = mode;
        record(&mut state.mode_writes, (bank, mode));
        Ok(())
    }
}
