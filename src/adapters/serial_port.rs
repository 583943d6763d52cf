//! Serial port adapter using the `serialport` crate
//!
//! Implements `SerialFactory` and `SerialConnection` traits.

use std::io::ErrorKind;
use std::time::Duration;

use crate::domain::{SatrigError, SatrigResult, SerialPortInfo};
use crate::ports::{SerialConnection, SerialFactory};

/// Per-read timeout. Short so the CI-V session's overall reply deadline
/// stays close to its nominal value.
const READ_TIMEOUT_MS: u64 = 20;

/// Zero-sized factory for creating serial port connections.
pub struct SerialPortFactory;

impl SerialFactory for SerialPortFactory {
    fn list_ports() -> SatrigResult<Vec<SerialPortInfo>> {
        let mut ports: Vec<SerialPortInfo> = serialport::available_ports()
            .map_err(|e| SatrigError::Serial(format!("Failed to list ports: {e}")))?
            .into_iter()
            .map(|p| SerialPortInfo {
                port_type: describe(&p.port_type),
                name: p.port_name,
            })
            .collect();
        ports.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(ports)
    }

    fn open(port: &str, baud_rate: u32) -> SatrigResult<Box<dyn SerialConnection>> {
        let serial = serialport::new(port, baud_rate)
            .timeout(Duration::from_millis(READ_TIMEOUT_MS))
            .open()
            .map_err(|e| SatrigError::Serial(format!("Failed to open {port}: {e}")))?;

        log::info!("Opened {port} at {baud_rate} baud");

        Ok(Box::new(SerialPortConnection {
            port: serial,
            connected: true,
        }))
    }
}

/// Human-readable port kind. USB-serial CI-V interfaces (CT-17 clones,
/// FTDI and CP210x cables) are shown with their product string.
fn describe(port_type: &serialport::SerialPortType) -> String {
    match port_type {
        serialport::SerialPortType::UsbPort(info) => match &info.product {
            Some(product) => format!("USB {product} ({:04X}:{:04X})", info.vid, info.pid),
            None => format!("USB ({:04X}:{:04X})", info.vid, info.pid),
        },
        serialport::SerialPortType::PciPort => "PCI".to_string(),
        serialport::SerialPortType::BluetoothPort => "Bluetooth".to_string(),
        serialport::SerialPortType::Unknown => "Native".to_string(),
    }
}

/// An open serial port connection wrapping the `serialport` crate.
pub struct SerialPortConnection {
    port: Box<dyn serialport::SerialPort>,
    connected: bool,
}

impl SerialConnection for SerialPortConnection {
    /// A CI-V frame goes out whole or not at all
    fn write(&mut self, data: &[u8]) -> SatrigResult<usize> {
        use std::io::Write;
        self.port
            .write_all(data)
            .map_err(|e| SatrigError::Serial(format!("Write failed: {e}")))?;
        Ok(data.len())
    }

    fn read(&mut self, buffer: &mut [u8]) -> SatrigResult<usize> {
        use std::io::Read;
        match self.port.read(buffer) {
            Ok(n) => Ok(n),
            // No data within the port timeout is "nothing yet", not a failure
            Err(e) if e.kind() == ErrorKind::TimedOut => Ok(0),
            Err(e) => Err(SatrigError::Serial(format!("Read failed: {e}"))),
        }
    }

    fn clear(&mut self) -> SatrigResult<()> {
        self.port
            .clear(serialport::ClearBuffer::All)
            .map_err(|e| SatrigError::Serial(format!("Flush failed: {e}")))
    }

    fn close(&mut self) -> SatrigResult<()> {
        self.connected = false;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}
