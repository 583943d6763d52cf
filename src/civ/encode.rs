//! Pure encoding: CivCommand → CI-V wire frame.
//!
//! No I/O, no side effects. Easy to unit-test without any serial port.

use crate::domain::{SatrigError, SatrigResult};

use super::{mode_code, Addresses, CivCommand, END_OF_MESSAGE, PREAMBLE};

/// Largest frequency that fits the 10-digit BCD field
pub const MAX_FREQUENCY_HZ: u64 = 9_999_999_999;

/// Pack Hz into 5 BCD bytes, least significant digit pair first.
///
/// `145_900_000` is the digit string `0145900000`; its pairs
/// `01 45 90 00 00` go on the wire reversed: `00 00 90 45 01`.
pub fn encode_frequency(hz: u64) -> SatrigResult<[u8; 5]> {
    if hz > MAX_FREQUENCY_HZ {
        return Err(SatrigError::Civ(format!(
            "frequency {hz} Hz does not fit 10 BCD digits"
        )));
    }
    let mut rest = hz;
    let mut out = [0u8; 5];
    for byte in out.iter_mut() {
        let pair = (rest % 100) as u8;
        *byte = ((pair / 10) << 4) | (pair % 10);
        rest /= 100;
    }
    Ok(out)
}

/// Encode a CivCommand into a complete frame including preamble and `FD`.
///
/// Fails for a mode the radio has no code for and for frequencies that do
/// not fit the BCD field; callers filter unsupported modes before sending.
pub fn encode(cmd: &CivCommand, addresses: Addresses) -> SatrigResult<Vec<u8>> {
    use CivCommand::*;

    let body: Vec<u8> = match cmd {
        ReadFrequency => vec![0x03],
        SetFrequency(hz) => {
            let mut body = vec![0x05];
            body.extend_from_slice(&encode_frequency(*hz)?);
            body
        }
        SelectMain => vec![0x07, 0xD0],
        SelectSub => vec![0x07, 0xD1],
        SelectVfoA => vec![0x07, 0x00],
        ExchangeMainSub => vec![0x07, 0xB0],
        SetSimplex => vec![0x0F, 0x10],
        SetMode(mode) => {
            let code = mode_code(*mode).ok_or_else(|| {
                SatrigError::Civ(format!("no CI-V code for mode {mode}"))
            })?;
            let mut body = vec![0x06];
            body.extend_from_slice(code);
            body
        }
    };

    let mut frame = Vec::with_capacity(body.len() + 5);
    frame.extend_from_slice(&[PREAMBLE, PREAMBLE, addresses.radio, addresses.controller]);
    frame.extend_from_slice(&body);
    frame.push(END_OF_MESSAGE);
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Mode;
    use CivCommand::*;

    fn frame(cmd: CivCommand) -> Vec<u8> {
        encode(&cmd, Addresses::default()).unwrap()
    }

    #[test]
    fn encode_read_frequency() {
        assert_eq!(frame(ReadFrequency), vec![0xFE, 0xFE, 0x4C, 0xE0, 0x03, 0xFD]);
    }

    #[test]
    fn encode_set_frequency_2m() {
        assert_eq!(
            frame(SetFrequency(145_900_000)),
            vec![0xFE, 0xFE, 0x4C, 0xE0, 0x05, 0x00, 0x00, 0x90, 0x45, 0x01, 0xFD]
        );
    }

    #[test]
    fn encode_set_frequency_70cm_odd_hertz() {
        assert_eq!(
            encode_frequency(435_123_457).unwrap(),
            [0x57, 0x34, 0x12, 0x35, 0x04]
        );
    }

    #[test]
    fn encode_frequency_zero_padded() {
        assert_eq!(encode_frequency(0).unwrap(), [0, 0, 0, 0, 0]);
        assert_eq!(encode_frequency(7).unwrap(), [0x07, 0, 0, 0, 0]);
    }

    #[test]
    fn encode_frequency_rejects_eleven_digits() {
        assert!(encode_frequency(MAX_FREQUENCY_HZ).is_ok());
        assert!(encode_frequency(MAX_FREQUENCY_HZ + 1).is_err());
    }

    #[test]
    fn encode_bank_and_vfo_selection() {
        assert_eq!(frame(SelectMain)[4..6], [0x07, 0xD0]);
        assert_eq!(frame(SelectSub)[4..6], [0x07, 0xD1]);
        assert_eq!(frame(SelectVfoA)[4..6], [0x07, 0x00]);
        assert_eq!(frame(ExchangeMainSub)[4..6], [0x07, 0xB0]);
        assert_eq!(frame(SetSimplex)[4..6], [0x0F, 0x10]);
    }

    #[test]
    fn encode_modes() {
        assert_eq!(frame(SetMode(Mode::Lsb))[4..], [0x06, 0x00, 0xFD]);
        assert_eq!(frame(SetMode(Mode::Usb))[4..], [0x06, 0x01, 0xFD]);
        assert_eq!(frame(SetMode(Mode::Cw))[4..], [0x06, 0x03, 0x01, 0xFD]);
        assert_eq!(frame(SetMode(Mode::Fm))[4..], [0x06, 0x05, 0xFD]);
    }

    #[test]
    fn encode_unknown_mode_is_an_error() {
        assert!(encode(&SetMode(Mode::Other), Addresses::default()).is_err());
    }

    #[test]
    fn encode_uses_configured_radio_address() {
        let frame = encode(&ReadFrequency, Addresses::new(0x60)).unwrap();
        assert_eq!(frame[..4], [0xFE, 0xFE, 0x60, 0xE0]);
    }
}
