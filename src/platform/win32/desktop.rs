//! Top-level window enumeration and inspection

use std::ffi::OsString;
use std::os::windows::ffi::OsStringExt;
use std::path::PathBuf;

use windows::core::PWSTR;
use windows::Win32::Foundation::{CloseHandle, BOOL, HANDLE, HWND, LPARAM, MAX_PATH, TRUE};
use windows::Win32::System::Threading::{
    OpenProcess, QueryFullProcessImageNameW, PROCESS_NAME_WIN32,
    PROCESS_QUERY_LIMITED_INFORMATION,
};
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GetForegroundWindow, GetWindow, GetWindowLongW, GetWindowTextLengthW,
    GetWindowTextW, GetWindowThreadProcessId, IsWindowVisible, GWL_EXSTYLE, GW_OWNER,
    WINDOW_EX_STYLE, WS_EX_TOOLWINDOW,
};

use super::{to_hwnd, to_window_id};
use crate::application::ports::{DesktopPort, WindowAttributes};
use crate::domain::entities::candidate::MAX_TITLE_UNITS;
use crate::domain::value_objects::{ProcessId, WindowId};

/// Live desktop
pub struct Win32Desktop;

unsafe extern "system" fn enum_windows_proc(hwnd: HWND, lparam: LPARAM) -> BOOL {
    let windows = &mut *(lparam.0 as *mut Vec<WindowId>);
    windows.push(to_window_id(hwnd));
    TRUE
}

fn window_process(hwnd: HWND) -> Option<ProcessId> {
    let mut pid = 0u32;
    unsafe {
        GetWindowThreadProcessId(hwnd, Some(&mut pid));
    }
    (pid != 0).then_some(ProcessId(pid))
}

/// Process handle closed on drop
struct ProcessHandle(HANDLE);

impl Drop for ProcessHandle {
    fn drop(&mut self) {
        unsafe {
            let _ = CloseHandle(self.0);
        }
    }
}

impl DesktopPort for Win32Desktop {
    fn top_level_windows(&self) -> Vec<WindowId> {
        let mut windows: Vec<WindowId> = Vec::new();
        unsafe {
            if let Err(e) = EnumWindows(
                Some(enum_windows_proc),
                LPARAM(&mut windows as *mut Vec<WindowId> as isize),
            ) {
                log!("EnumWindows failed: {}", e);
            }
        }
        windows
    }

    fn attributes(&self, window: WindowId) -> WindowAttributes {
        let hwnd = to_hwnd(window);
        unsafe {
            let ex_style = WINDOW_EX_STYLE(GetWindowLongW(hwnd, GWL_EXSTYLE) as u32);
            WindowAttributes {
                visible: IsWindowVisible(hwnd).as_bool(),
                has_title: GetWindowTextLengthW(hwnd) > 0,
                owned: GetWindow(hwnd, GW_OWNER).is_ok_and(|owner| !owner.is_invalid()),
                tool_window: ex_style.contains(WS_EX_TOOLWINDOW),
                process: window_process(hwnd),
            }
        }
    }

    fn foreground_process(&self) -> Option<ProcessId> {
        let foreground = unsafe { GetForegroundWindow() };
        if foreground.is_invalid() {
            return None;
        }
        window_process(foreground)
    }

    fn title(&self, window: WindowId) -> String {
        let mut buffer = [0u16; MAX_TITLE_UNITS + 1];
        let len = unsafe { GetWindowTextW(to_hwnd(window), &mut buffer) };
        if len <= 0 {
            return String::new();
        }
        String::from_utf16_lossy(&buffer[..len as usize])
    }

    fn image_path(&self, process: ProcessId) -> Option<PathBuf> {
        let handle = unsafe {
            OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, false, process.0).ok()?
        };
        let handle = ProcessHandle(handle);

        let mut buffer = vec![0u16; MAX_PATH as usize];
        let mut size = buffer.len() as u32;
        unsafe {
            QueryFullProcessImageNameW(
                handle.0,
                PROCESS_NAME_WIN32,
                PWSTR(buffer.as_mut_ptr()),
                &mut size,
            )
            .ok()?;
        }
        Some(PathBuf::from(OsString::from_wide(&buffer[..size as usize])))
    }
}
