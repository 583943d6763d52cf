//! CivSession: owns a serial connection and drives CI-V I/O timing.
//!
//! Pure translation lives in `encode` / `decode`. CivSession only handles
//! I/O: flush stale bytes, write the frame, read back the echo plus the
//! fixed-length reply within a bounded time.

use std::time::{Duration, Instant};

use crate::domain::SatrigResult;
use crate::ports::SerialConnection;

use super::{decode, encode, hex_dump, Addresses, CivCommand, CivResponse};

/// Upper bound on waiting for a complete reply
pub const RESPONSE_TIMEOUT: Duration = Duration::from_millis(100);

/// Owns a serial connection and executes CI-V commands against the radio.
pub struct CivSession {
    serial: Box<dyn SerialConnection>,
    addresses: Addresses,
    timeout: Duration,
}

impl CivSession {
    pub fn new(serial: Box<dyn SerialConnection>, addresses: Addresses) -> Self {
        Self {
            serial,
            addresses,
            timeout: RESPONSE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Send a CI-V command and return the parsed response.
    ///
    /// Serial I/O failures come back as `SatrigError::Serial`; anything
    /// wrong with the reply itself (timeout, short read, NAK, bad BCD)
    /// comes back as `SatrigError::Civ`. A timed-out read is not retried.
    pub fn execute(&mut self, cmd: &CivCommand) -> SatrigResult<CivResponse> {
        let frame = encode(cmd, self.addresses)?;
        log::debug!("CI-V TX: {}", hex_dump(&frame));

        self.serial.clear()?;
        self.serial.write(&frame)?;

        let raw = self.read_reply(frame.len() + cmd.reply_len())?;
        log::debug!("CI-V RX: {}", hex_dump(&raw));

        decode(&raw, &frame, cmd, self.addresses)
    }

    /// Read until `expected` bytes arrived or the timeout passed.
    /// Returns whatever was received; decode decides if it is usable.
    fn read_reply(&mut self, expected: usize) -> SatrigResult<Vec<u8>> {
        let deadline = Instant::now() + self.timeout;
        let mut buf = vec![0u8; expected];
        let mut total = 0;

        while total < expected {
            let n = self.serial.read(&mut buf[total..])?;
            total += n;
            if n == 0 && Instant::now() >= deadline {
                break;
            }
        }

        buf.truncate(total);
        Ok(buf)
    }

    pub fn close(&mut self) -> SatrigResult<()> {
        self.serial.close()
    }
}
