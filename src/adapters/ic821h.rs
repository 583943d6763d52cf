//! IC-821H radio adapter using CI-V commands
//!
//! The IC-821H is a 2 m / 70 cm satellite transceiver with two bands,
//! "main" and "sub". Commands act on the band selected with 0x07 D0/D1,
//! and the two bands can be exchanged with 0x07 B0.

use crate::civ::{mode_code, CivCommand, CivResponse, CivSession};
use crate::domain::{Bank, Frequency, Mode, SatrigError, SatrigResult};
use crate::ports::{RigControl, SerialConnection};

/// IC-821H radio adapter. Owns the CI-V session.
pub struct Ic821hRadio {
    session: CivSession,
}

impl Ic821hRadio {
    pub fn new(session: CivSession) -> Self {
        Self { session }
    }

    /// Convenience constructor over a raw serial connection
    pub fn over_serial(serial: Box<dyn SerialConnection>, civ_address: u8) -> Self {
        Self::new(CivSession::new(serial, crate::civ::Addresses::new(civ_address)))
    }

    fn command(&mut self, cmd: CivCommand) -> SatrigResult<()> {
        match self.session.execute(&cmd)? {
            CivResponse::Ack => Ok(()),
            other => Err(SatrigError::Civ(format!(
                "Unexpected reply {other:?} to {cmd:?}"
            ))),
        }
    }
}

impl RigControl for Ic821hRadio {
    fn select_bank(&mut self, bank: Bank) -> SatrigResult<()> {
        match bank {
            Bank::Main => self.command(CivCommand::SelectMain),
            Bank::Sub => self.command(CivCommand::SelectSub),
        }
    }

    fn swap_banks(&mut self) -> SatrigResult<()> {
        self.command(CivCommand::ExchangeMainSub)
    }

    fn select_vfo_a(&mut self) -> SatrigResult<()> {
        self.command(CivCommand::SelectVfoA)
    }

    fn set_simplex(&mut self) -> SatrigResult<()> {
        self.command(CivCommand::SetSimplex)
    }

    fn get_frequency(&mut self) -> SatrigResult<Frequency> {
        match self.session.execute(&CivCommand::ReadFrequency)? {
            CivResponse::FrequencyHz(hz) => Ok(Frequency::hz(hz as f64)),
            other => Err(SatrigError::Civ(format!(
                "Unexpected reply {other:?} to frequency read"
            ))),
        }
    }

    fn set_frequency(&mut self, freq: Frequency) -> SatrigResult<()> {
        self.command(CivCommand::SetFrequency(freq.rounded_hz()))
    }

    fn supports_mode(&self, mode: Mode) -> bool {
        mode_code(mode).is_some()
    }

    fn set_mode(&mut self, mode: Mode) -> SatrigResult<()> {
        if !self.supports_mode(mode) {
            log::debug!("IC-821H has no code for mode {mode}, not sent");
            return Ok(());
        }
        self.command(CivCommand::SetMode(mode))
    }
}

/// Release the serial port when the radio goes away
impl Drop for Ic821hRadio {
    fn drop(&mut self) {
        if let Err(e) = self.session.close() {
            log::warn!("Failed to close CI-V session: {e}");
        }
    }
}
