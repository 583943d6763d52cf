//! Core domain types
//!
//! Pure types with no I/O dependencies. These represent the core concepts
//! of the rig control application: frequencies, modes, VFO banks,
//! satellites, transponders and observations.

pub mod config;
pub mod error;
pub mod satellite;
pub mod status;
pub mod types;

pub use config::*;
pub use error::*;
pub use satellite::*;
pub use status::*;
pub use types::*;
