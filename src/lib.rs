//! TabWind - an Alt+Tab style window switcher
//!
//! The domain and application layers have no Windows dependencies so the
//! switcher logic can be tested on any host. The Win32 platform layer is
//! only built on Windows.

#[macro_use]
pub mod log;

pub mod application;
pub mod domain;
pub mod shared;

#[cfg(windows)]
pub mod platform;
