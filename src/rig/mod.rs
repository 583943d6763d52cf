//! Rig port: the radio as the engine sees it
//!
//! Wraps a `RigControl` adapter with three things the bare adapter lacks:
//!
//! - a cache of both dial frequencies, kept at full (fractional) precision
//! - band handling: a context moved onto the other band is exchanged first
//! - fail-soft I/O: a serial failure swaps the adapter for `NullRadio`
//!
//! Nothing here returns an error. A CI-V failure means "unknown this cycle"
//! and leaves the cache alone; a serial failure degrades the rig for good.

pub mod band_plan;

use crate::adapters::NullRadio;
use crate::domain::{Bank, Frequency, Mode, RigFrequencies, SatrigError, SatrigResult};
use crate::ports::RigControl;

pub use band_plan::{Band, BandPlan, BandRange};

pub struct Rig {
    radio: Box<dyn RigControl>,
    band_plan: BandPlan,
    cache: RigFrequencies,
    degraded: bool,
}

impl Rig {
    pub fn new(radio: Box<dyn RigControl>) -> Self {
        Self::with_band_plan(radio, BandPlan::ic821h())
    }

    pub fn with_band_plan(radio: Box<dyn RigControl>, band_plan: BandPlan) -> Self {
        Self {
            radio,
            band_plan,
            cache: RigFrequencies::default(),
            degraded: false,
        }
    }

    /// A rig with no hardware behind it
    pub fn disconnected() -> Self {
        Self::new(Box::new(NullRadio))
    }

    /// Put both contexts in a known state (simplex, VFO A, USB), then read
    /// back the dials.
    pub fn init(&mut self) -> RigFrequencies {
        for bank in [Bank::Main, Bank::Sub] {
            self.run(|radio| {
                radio.select_bank(bank)?;
                radio.set_simplex()?;
                radio.select_vfo_a()?;
                radio.set_mode(Mode::Usb)
            });
        }
        let freqs = self.read_frequencies();
        log::info!("Rig initialized: main={} sub={}", freqs.main, freqs.sub);
        freqs
    }

    /// Refresh the cache from the hardware and return it.
    ///
    /// A reading replaces the cached value only when it is known and
    /// differs from the cached value in whole hertz, so the fraction left
    /// by a Doppler correction survives an unchanged dial.
    pub fn read_frequencies(&mut self) -> RigFrequencies {
        for bank in [Bank::Main, Bank::Sub] {
            let reading = self.run(|radio| {
                radio.select_bank(bank)?;
                radio.get_frequency()
            });
            if let Some(freq) = reading {
                self.absorb(bank, freq);
            }
        }
        self.cache
    }

    fn absorb(&mut self, bank: Bank, reading: Frequency) {
        if reading.is_unknown() {
            return;
        }
        if self.cache.get(bank).rounded_hz() != reading.rounded_hz() {
            self.cache.set(bank, reading);
        }
    }

    /// Cached frequencies as of the last read or write
    pub fn frequencies(&self) -> RigFrequencies {
        self.cache
    }

    pub fn frequency(&self, bank: Bank) -> Frequency {
        self.cache.get(bank)
    }

    pub fn set_main_frequency(&mut self, freq: Frequency) {
        self.set_frequency(Bank::Main, freq);
    }

    pub fn set_sub_frequency(&mut self, freq: Frequency) {
        self.set_frequency(Bank::Sub, freq);
    }

    /// Tune one context. If `freq` is on the other band, main and sub are
    /// exchanged first and the cache follows the exchange. Sub is left
    /// selected afterwards.
    pub fn set_frequency(&mut self, bank: Bank, freq: Frequency) {
        let current = self.cache.get(bank);
        let exchange = self.needs_exchange(bank, freq);

        self.run(|radio| {
            radio.select_bank(bank)?;
            if exchange {
                radio.swap_banks()?;
            }
            radio.set_frequency(freq)?;
            if bank == Bank::Main {
                radio.select_bank(Bank::Sub)?;
            }
            Ok(())
        });

        if exchange {
            log::info!("Exchanged main/sub to move {bank:?} to {freq} Hz");
            self.cache.set(bank.other(), current);
        }
        self.cache.set(bank, freq);
    }

    /// With this context's dial unknown, its band is inferred from the
    /// other context, which always holds the opposite band.
    fn needs_exchange(&self, bank: Bank, target: Frequency) -> bool {
        let current = self.cache.get(bank);
        if !current.is_unknown() {
            return self.band_plan.crosses_band(current, target);
        }
        let other = self.cache.get(bank.other());
        match (self.band_plan.band_of(other), self.band_plan.band_of(target)) {
            (Some(theirs), Some(wanted)) => theirs == wanted,
            _ => {
                log::warn!("Band of {bank:?} unknown, writing {target} Hz without exchange");
                false
            }
        }
    }

    /// Set one context's mode. Modes the radio has no code for send nothing.
    pub fn set_mode(&mut self, bank: Bank, mode: Mode) {
        self.run(|radio| {
            radio.select_bank(bank)?;
            radio.set_mode(mode)?;
            if bank == Bank::Main {
                radio.select_bank(Bank::Sub)?;
            }
            Ok(())
        });
    }

    pub fn supports_mode(&self, mode: Mode) -> bool {
        self.radio.supports_mode(mode)
    }

    /// False once the rig has degraded or when no hardware was found
    pub fn is_connected(&self) -> bool {
        !self.degraded && self.radio.is_connected()
    }

    /// Run a command sequence against the adapter, absorbing failures.
    fn run<T>(&mut self, f: impl FnOnce(&mut dyn RigControl) -> SatrigResult<T>) -> Option<T> {
        match f(self.radio.as_mut()) {
            Ok(value) => Some(value),
            Err(e @ SatrigError::Serial(_)) => {
                self.degrade(&e);
                None
            }
            Err(e) => {
                log::warn!("Rig command failed: {e}");
                None
            }
        }
    }

    fn degrade(&mut self, cause: &SatrigError) {
        if !self.degraded {
            log::warn!("Radio connection lost ({cause}), continuing without rig control");
        }
        self.radio = Box::new(NullRadio);
        self.degraded = true;
    }
}
