//! Pure decoding: CI-V wire bytes + command context → CivResponse.
//!
//! No I/O, no side effects. The `cmd` parameter tells us which reply body
//! to expect; the `sent` frame lets us drop the bus echo that precedes it.

use crate::domain::{SatrigError, SatrigResult};

use super::{hex_dump, Addresses, CivCommand, CivResponse, ACK, END_OF_MESSAGE, NAK, PREAMBLE};

/// Unpack 5 BCD bytes (least significant pair first) into Hz.
///
/// Fails on a short field or on any nibble above 9.
pub fn decode_frequency(bytes: &[u8]) -> SatrigResult<u64> {
    if bytes.len() != 5 {
        return Err(SatrigError::Civ(format!(
            "frequency field must be 5 bytes, got {}",
            bytes.len()
        )));
    }
    let mut hz = 0u64;
    for &b in bytes.iter().rev() {
        let high = b >> 4;
        let low = b & 0x0F;
        if high > 9 || low > 9 {
            return Err(SatrigError::Civ(format!(
                "invalid BCD byte {b:02x} in frequency {}",
                hex_dump(bytes)
            )));
        }
        hz = hz * 100 + u64::from(high) * 10 + u64::from(low);
    }
    Ok(hz)
}

/// Decode the raw bytes read after sending `sent` into a typed CivResponse.
///
/// `raw` may start with the echo of `sent`; it is stripped if present.
/// Returns `Err` for short or malformed replies and for NAK (`FA`).
pub fn decode(
    raw: &[u8],
    sent: &[u8],
    cmd: &CivCommand,
    addresses: Addresses,
) -> SatrigResult<CivResponse> {
    let reply = raw.strip_prefix(sent).unwrap_or(raw);
    let body = reply_body(reply, addresses)?;

    if body == &[NAK] {
        return Err(SatrigError::Civ(format!("Radio NAK for command {cmd:?}")));
    }

    match cmd {
        CivCommand::ReadFrequency => parse_frequency(body),
        _ => expect_ack(body, cmd),
    }
}

/// Check framing of a reply addressed to us and return the bytes between
/// the address header and `FD`.
fn reply_body(reply: &[u8], addresses: Addresses) -> SatrigResult<&[u8]> {
    let header = [PREAMBLE, PREAMBLE, addresses.controller, addresses.radio];
    let rest = reply.strip_prefix(&header[..]).ok_or_else(|| {
        SatrigError::Civ(format!("Unexpected reply header: '{}'", hex_dump(reply)))
    })?;
    let end = rest
        .iter()
        .position(|&b| b == END_OF_MESSAGE)
        .ok_or_else(|| SatrigError::Civ(format!("Truncated reply: '{}'", hex_dump(reply))))?;
    Ok(&rest[..end])
}

/// `03 00 00 90 45 01` → `FrequencyHz(145_900_000)`
fn parse_frequency(body: &[u8]) -> SatrigResult<CivResponse> {
    match body.split_first() {
        Some((&0x03, digits)) => decode_frequency(digits).map(CivResponse::FrequencyHz),
        _ => Err(SatrigError::Civ(format!(
            "Invalid frequency reply: '{}'",
            hex_dump(body)
        ))),
    }
}

fn expect_ack(body: &[u8], cmd: &CivCommand) -> SatrigResult<CivResponse> {
    if body == &[ACK] {
        Ok(CivResponse::Ack)
    } else {
        Err(SatrigError::Civ(format!(
            "Expected ACK (fb) for {cmd:?}, got: '{}'",
            hex_dump(body)
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::civ::{encode, encode_frequency};
    use crate::domain::Mode;
    use CivCommand::*;

    const ACK_REPLY: [u8; 6] = [0xFE, 0xFE, 0xE0, 0x4C, 0xFB, 0xFD];
    const NAK_REPLY: [u8; 6] = [0xFE, 0xFE, 0xE0, 0x4C, 0xFA, 0xFD];

    fn freq_reply(bcd: [u8; 5]) -> Vec<u8> {
        let mut reply = vec![0xFE, 0xFE, 0xE0, 0x4C, 0x03];
        reply.extend_from_slice(&bcd);
        reply.push(0xFD);
        reply
    }

    fn decode_with_echo(cmd: CivCommand, reply: &[u8]) -> SatrigResult<CivResponse> {
        let sent = encode(&cmd, Addresses::default()).unwrap();
        let mut raw = sent.clone();
        raw.extend_from_slice(reply);
        decode(&raw, &sent, &cmd, Addresses::default())
    }

    // --- BCD ---

    #[test]
    fn decode_frequency_reverses_digit_pairs() {
        assert_eq!(
            decode_frequency(&[0x00, 0x00, 0x90, 0x45, 0x01]).unwrap(),
            145_900_000
        );
        assert_eq!(
            decode_frequency(&[0x57, 0x34, 0x12, 0x35, 0x04]).unwrap(),
            435_123_457
        );
    }

    #[test]
    fn decode_frequency_rejects_hex_nibbles() {
        assert!(decode_frequency(&[0x0A, 0x00, 0x90, 0x45, 0x01]).is_err());
        assert!(decode_frequency(&[0x00, 0x00, 0x90, 0xF5, 0x01]).is_err());
    }

    #[test]
    fn decode_frequency_rejects_short_field() {
        assert!(decode_frequency(&[0x00, 0x00, 0x90, 0x45]).is_err());
    }

    #[test]
    fn bcd_round_trip_across_ten_digits() {
        let samples = [
            0,
            1,
            29_300_000,
            145_900_000,
            145_902_918,
            435_795_001,
            1_269_550_000,
            9_999_999_999,
        ];
        for hz in samples {
            let bcd = encode_frequency(hz).unwrap();
            assert_eq!(decode_frequency(&bcd).unwrap(), hz, "round trip failed for {hz}");
        }
    }

    // --- ReadFrequency ---

    #[test]
    fn decode_frequency_reply_after_echo() {
        let reply = freq_reply([0x00, 0x00, 0x90, 0x45, 0x01]);
        assert_eq!(
            decode_with_echo(ReadFrequency, &reply).unwrap(),
            CivResponse::FrequencyHz(145_900_000)
        );
    }

    #[test]
    fn decode_frequency_reply_without_echo() {
        let sent = encode(&ReadFrequency, Addresses::default()).unwrap();
        let reply = freq_reply([0x00, 0x00, 0x00, 0x35, 0x04]);
        assert_eq!(
            decode(&reply, &sent, &ReadFrequency, Addresses::default()).unwrap(),
            CivResponse::FrequencyHz(435_000_000)
        );
    }

    #[test]
    fn decode_short_frequency_reply_fails() {
        let reply = freq_reply([0x00, 0x00, 0x90, 0x45, 0x01]);
        assert!(decode_with_echo(ReadFrequency, &reply[..8]).is_err());
        assert!(decode_with_echo(ReadFrequency, &[]).is_err());
    }

    #[test]
    fn decode_reply_from_other_station_fails() {
        let mut reply = freq_reply([0x00, 0x00, 0x90, 0x45, 0x01]);
        reply[3] = 0x60;
        assert!(decode_with_echo(ReadFrequency, &reply).is_err());
    }

    #[test]
    fn decode_frequency_reply_with_wrong_command_byte_fails() {
        let mut reply = freq_reply([0x00, 0x00, 0x90, 0x45, 0x01]);
        reply[4] = 0x00;
        assert!(decode_with_echo(ReadFrequency, &reply).is_err());
    }

    // --- ACK / NAK ---

    #[test]
    fn decode_ack_for_set_commands() {
        for cmd in [
            SetFrequency(145_900_000),
            SelectMain,
            SelectSub,
            ExchangeMainSub,
            SetSimplex,
            SetMode(Mode::Fm),
        ] {
            assert_eq!(decode_with_echo(cmd, &ACK_REPLY).unwrap(), CivResponse::Ack);
        }
    }

    #[test]
    fn nak_returns_err() {
        assert!(decode_with_echo(SelectMain, &NAK_REPLY).is_err());
        assert!(decode_with_echo(ReadFrequency, &NAK_REPLY).is_err());
    }

    #[test]
    fn frequency_reply_to_set_command_is_not_ack() {
        let reply = freq_reply([0x00, 0x00, 0x90, 0x45, 0x01]);
        assert!(decode_with_echo(SelectSub, &reply).is_err());
    }
}
