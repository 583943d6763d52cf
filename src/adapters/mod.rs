//! Adapters: implementations of the port traits
//!
//! - `serial_port` - serial transport over the `serialport` crate
//! - `ic821h` - IC-821H radio over CI-V
//! - `mock_radio` - in-memory two-band radio (MOCK_RADIO=1)
//! - `null_radio` - no-op radio used once the hardware is gone
//! - `sgp4_ephemeris` - SGP4 orbit propagation
//! - `config_file` - JSON configuration loader
//! - `gpredict` - configuration from a Gpredict user directory
//! - `console` - stdin commands and stdout status line

pub mod config_file;
pub mod console;
pub mod gpredict;
pub mod ic821h;
pub mod mock_radio;
pub mod null_radio;
pub mod serial_port;
pub mod sgp4_ephemeris;

pub use config_file::{ConfigLoader, LoaderConfig};
pub use console::{ConsoleDisplay, StdinCommands};
pub use gpredict::{GpredictConfig, GpredictLoader};
pub use ic821h::Ic821hRadio;
pub use mock_radio::{MockRadio, MockRigHandle, MockRigState};
pub use null_radio::NullRadio;
pub use serial_port::{SerialPortConnection, SerialPortFactory};
pub use sgp4_ephemeris::Sgp4Ephemeris;
