//! Serial port traits
//!
//! Split into two traits:
//! - `SerialFactory` - static methods for listing and opening ports
//! - `SerialConnection` - instance methods for reading/writing data

use crate::domain::{SatrigResult, SerialPortInfo};

/// Factory for creating serial connections.
pub trait SerialFactory {
    /// List available serial ports on the system
    fn list_ports() -> SatrigResult<Vec<SerialPortInfo>>;

    /// Open a serial port at the given baud rate, returning a boxed connection
    fn open(port: &str, baud_rate: u32) -> SatrigResult<Box<dyn SerialConnection>>;
}

/// Trait for an open serial port connection.
///
/// Byte transport only: no knowledge of CI-V framing. Owned by the single
/// control thread, so only `Send` is required.
pub trait SerialConnection: Send {
    /// Write bytes to the port
    fn write(&mut self, data: &[u8]) -> SatrigResult<usize>;

    /// Read bytes from the port. A read that times out returns `Ok(0)`.
    fn read(&mut self, buffer: &mut [u8]) -> SatrigResult<usize>;

    /// Discard anything pending in the input and output buffers
    fn clear(&mut self) -> SatrigResult<()>;

    /// Close the connection
    fn close(&mut self) -> SatrigResult<()>;

    /// Check if the port is still connected
    fn is_connected(&self) -> bool;
}
