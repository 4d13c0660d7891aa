//! Win32 platform implementation

pub mod activate;
pub mod app;
pub mod desktop;
pub mod dpi;
pub mod gdi;
pub mod hook;
pub mod host;
pub mod icon;
pub mod instance;
pub mod menu;
pub mod render;
pub mod window;

use std::ffi::c_void;

use windows::Win32::Foundation::HWND;

use crate::domain::value_objects::WindowId;

pub use app::{report_error, run};

pub fn to_hwnd(id: WindowId) -> HWND {
    HWND(id.0 as *mut c_void)
}

pub fn to_window_id(hwnd: HWND) -> WindowId {
    WindowId(hwnd.0 as isize)
}
