//! Platform abstraction layer
//!
//! Currently only Windows (win32) is supported.

#[cfg(windows)]
pub mod win32;
