//! Radio control port trait

use crate::domain::{Bank, Frequency, Mode, SatrigResult};

/// Low-level control of a two-band radio.
///
/// Frequency and mode commands act on whichever bank was last selected,
/// mirroring how the hardware routes commands. Band-plan decisions and
/// caching live in the `rig` façade on top of this.
pub trait RigControl: Send {
    /// Route following commands to `bank`
    fn select_bank(&mut self, bank: Bank) -> SatrigResult<()>;

    /// Exchange the contents of the main and sub bands
    fn swap_banks(&mut self) -> SatrigResult<()>;

    /// Select VFO A on the current bank
    fn select_vfo_a(&mut self) -> SatrigResult<()>;

    /// Switch the current bank to simplex
    fn set_simplex(&mut self) -> SatrigResult<()>;

    /// Get the current bank's frequency
    fn get_frequency(&mut self) -> SatrigResult<Frequency>;

    /// Set the current bank's frequency (rounded to whole Hz)
    fn set_frequency(&mut self, freq: Frequency) -> SatrigResult<()>;

    /// Set the current bank's mode. Modes the radio has no code for are
    /// ignored without sending anything.
    fn set_mode(&mut self, mode: Mode) -> SatrigResult<()>;

    /// Whether the radio has an operating mode for `mode`
    fn supports_mode(&self, mode: Mode) -> bool {
        mode != Mode::Other
    }

    /// Whether real hardware is behind this adapter
    fn is_connected(&self) -> bool {
        true
    }
}
