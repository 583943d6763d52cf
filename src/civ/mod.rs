//! CI-V command layer for the IC-821H.
//!
//! This module separates the three concerns of CI-V communication:
//! - `encode`: translate CivCommand → wire frame (pure, no I/O)
//! - `decode`: translate wire bytes → CivResponse (pure, no I/O)
//! - `session`: own the serial port, drive timing and I/O
//!
//! A frame is `FE FE <to> <from> <command...> FD`. CI-V is a shared bus,
//! so every frame we send is echoed back ahead of the radio's reply.

pub mod decode;
pub mod encode;
pub mod session;

pub use decode::{decode, decode_frequency};
pub use encode::{encode, encode_frequency};
pub use session::CivSession;

use crate::domain::Mode;

/// Frame preamble byte (sent twice)
pub const PREAMBLE: u8 = 0xFE;
/// End-of-message byte
pub const END_OF_MESSAGE: u8 = 0xFD;
/// Reply body for an accepted command
pub const ACK: u8 = 0xFB;
/// Reply body for a rejected command
pub const NAK: u8 = 0xFA;
/// Default controller (PC) address on the bus
pub const CONTROLLER_ADDRESS: u8 = 0xE0;
/// IC-821H factory default address
pub const IC821H_ADDRESS: u8 = 0x4C;

/// Length of the radio's reply to a frequency read:
/// `FE FE E0 4C 03 <5 BCD bytes> FD`
pub const FREQUENCY_REPLY_LEN: usize = 11;
/// Length of an ACK/NAK reply: `FE FE E0 4C FB FD`
pub const ACK_REPLY_LEN: usize = 6;

/// Mode codes for command 0x06. Modes without an entry are never sent.
pub const MODE_TABLE: &[(Mode, &[u8])] = &[
    (Mode::Lsb, &[0x00]),
    (Mode::Usb, &[0x01]),
    (Mode::Cw, &[0x03, 0x01]),
    (Mode::Fm, &[0x05]),
];

/// CI-V mode code for `mode`, if the radio has one
pub fn mode_code(mode: Mode) -> Option<&'static [u8]> {
    MODE_TABLE
        .iter()
        .find(|(m, _)| *m == mode)
        .map(|(_, code)| *code)
}

/// Bus addresses of the two ends of the link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Addresses {
    pub radio: u8,
    pub controller: u8,
}

impl Addresses {
    pub fn new(radio: u8) -> Self {
        Self {
            radio,
            controller: CONTROLLER_ADDRESS,
        }
    }
}

impl Default for Addresses {
    fn default() -> Self {
        Self::new(IC821H_ADDRESS)
    }
}

/// High-level CI-V commands understood by the IC-821H.
#[derive(Debug, PartialEq, Clone)]
pub enum CivCommand {
    /// 0x03: read the operating frequency of the selected band
    ReadFrequency,
    /// 0x05: set the operating frequency of the selected band (Hz)
    SetFrequency(u64),
    /// 0x07 D0: route following commands to the main band
    SelectMain,
    /// 0x07 D1: route following commands to the sub band
    SelectSub,
    /// 0x07 00
    SelectVfoA,
    /// 0x07 B0: exchange main and sub bands
    ExchangeMainSub,
    /// 0x0F 10: simplex operation
    SetSimplex,
    /// 0x06: operating mode
    SetMode(Mode),
}

impl CivCommand {
    /// Bytes the radio sends back after our echo
    pub fn reply_len(&self) -> usize {
        match self {
            CivCommand::ReadFrequency => FREQUENCY_REPLY_LEN,
            _ => ACK_REPLY_LEN,
        }
    }
}

/// Parsed replies from the IC-821H.
#[derive(Debug, PartialEq)]
pub enum CivResponse {
    FrequencyHz(u64),
    /// Command accepted; radio returned FB
    Ack,
}

/// `[0xFE, 0x4C]` → `"fe 4c"`, for wire traces in debug logs
pub fn hex_dump(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_dump_groups_bytes() {
        assert_eq!(hex_dump(&[0xFE, 0xFE, 0x4C, 0xE0, 0x03, 0xFD]), "fe fe 4c e0 03 fd");
        assert_eq!(hex_dump(&[]), "");
    }

    #[test]
    fn mode_codes_cover_radio_modes_only() {
        assert_eq!(mode_code(Mode::Usb), Some(&[0x01u8][..]));
        assert_eq!(mode_code(Mode::Cw), Some(&[0x03u8, 0x01][..]));
        assert_eq!(mode_code(Mode::Other), None);
    }
}
