//! Application Layer - switcher use cases over platform ports
//!
//! - **Ports**: traits the platform layer implements
//! - **Services**: the window collector and the switcher state machine

pub mod ports;
pub mod services;
