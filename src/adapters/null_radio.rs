//! No-op radio used when no hardware is reachable.
//!
//! Reports every frequency as unknown (0 Hz) and accepts every write
//! without effect, so the rest of the system runs headless.

use crate::domain::{Bank, Frequency, Mode, SatrigResult};
use crate::ports::RigControl;

#[derive(Debug, Default)]
pub struct NullRadio;

impl RigControl for NullRadio {
    fn select_bank(&mut self, _bank: Bank) -> SatrigResult<()> {
        Ok(())
    }

    fn swap_banks(&mut self) -> SatrigResult<()> {
        Ok(())
    }

    fn select_vfo_a(&mut self) -> SatrigResult<()> {
        Ok(())
    }

    fn set_simplex(&mut self) -> SatrigResult<()> {
        Ok(())
    }

    fn get_frequency(&mut self) -> SatrigResult<Frequency> {
        Ok(Frequency::UNKNOWN)
    }

    fn set_frequency(&mut self, _freq: Frequency) -> SatrigResult<()> {
        Ok(())
    }

    fn set_mode(&mut self, _mode: Mode) -> SatrigResult<()> {
        Ok(())
    }

    fn is_connected(&self) -> bool {
        false
    }
}
