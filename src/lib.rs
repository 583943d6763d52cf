//! satrig: Doppler-tracking rig control for satellite operation
//!
//! Keeps the two VFOs of an IC-821H on a satellite transponder while the
//! Doppler shift changes during a pass, without fighting the operator's
//! own tuning.
//!
//! ## Architecture (Hexagonal / Ports & Adapters)
//!
//! - `domain/` - Pure domain types, no I/O dependencies
//! - `doppler` - Doppler conversions (pure functions)
//! - `civ/` - CI-V protocol codec and session
//! - `ports/` - Trait definitions (interfaces) for external dependencies
//! - `adapters/` - Implementations of ports (serialport, IC-821H, SGP4, console)
//! - `rig/` - Rig port: frequency cache, band handling, fail-soft I/O
//! - `engine/` - Rig synchronization engine
//! - `control/` - Control loop driving the engine and the operator UI

// Core domain (pure, no I/O)
pub mod doppler;
pub mod domain;
pub mod ports;

// Protocol
pub mod civ;

// Adapters (external I/O)
pub mod adapters;

// Application core
pub mod control;
pub mod engine;
pub mod rig;
