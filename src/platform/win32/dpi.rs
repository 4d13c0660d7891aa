//! Per-monitor DPI awareness

use windows::core::Error;
use windows::Win32::UI::HiDpi::{
    SetProcessDpiAwarenessContext, DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE,
    DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2,
};

/// Opt into per-monitor awareness so overlay geometry is in physical pixels.
/// Must run before any window is created.
pub fn enable_dpi_awareness() -> Result<(), Error> {
    unsafe {
        SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2)
            .or_else(|_| SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE))
    }
}
