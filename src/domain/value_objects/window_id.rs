//! Opaque identities for native windows and processes
//!
//! These are comparison tokens only. They never own the underlying object and
//! may refer to a destroyed window as soon as the enumeration that produced
//! them has finished.

use std::fmt;

/// Identity of a top-level window (the raw handle value)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct WindowId(pub isize);

impl WindowId {
    /// The null handle
    pub const NULL: WindowId = WindowId(0);

    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:X}", self.0)
    }
}

/// Identity of a process
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProcessId(pub u32);
