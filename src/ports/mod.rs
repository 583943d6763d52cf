//! Port traits (interfaces)
//!
//! These traits define the boundaries between the core domain and external I/O.
//! Adapters implement these traits to connect to real hardware.

pub mod ephemeris;
pub mod radio;
pub mod serial;
pub mod ui;

pub use ephemeris::*;
pub use radio::*;
pub use serial::*;
pub use ui::*;
