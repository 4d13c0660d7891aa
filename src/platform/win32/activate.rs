//! Bringing the chosen window to the foreground
//!
//! Windows refuses `SetForegroundWindow` from a process that does not own the
//! foreground, so the call is made while our input queue is attached to the
//! foreground thread.

use windows::Win32::Foundation::HWND;
use windows::Win32::System::Threading::{AttachThreadInput, GetCurrentThreadId};
use windows::Win32::UI::Input::KeyboardAndMouse::{SetActiveWindow, SetFocus};
use windows::Win32::UI::WindowsAndMessaging::{
    AllowSetForegroundWindow, GetForegroundWindow, GetWindowThreadProcessId, IsIconic, IsWindow,
    LockSetForegroundWindow, SetForegroundWindow, SetWindowPos, ShowWindow, ASFW_ANY,
    HWND_NOTOPMOST, HWND_TOPMOST, LSFW_UNLOCK, SWP_NOMOVE, SWP_NOSIZE, SWP_SHOWWINDOW, SW_RESTORE,
};

use super::to_hwnd;
use crate::domain::value_objects::WindowId;

/// Input queue attachment, detached on drop
struct ThreadAttachment {
    ours: u32,
    theirs: u32,
}

impl ThreadAttachment {
    fn to_foreground() -> Option<Self> {
        unsafe {
            let ours = GetCurrentThreadId();
            let theirs = GetWindowThreadProcessId(GetForegroundWindow(), None);
            if theirs == 0 || theirs == ours {
                return None;
            }
            AttachThreadInput(ours, theirs, true)
                .as_bool()
                .then_some(Self { ours, theirs })
        }
    }
}

impl Drop for ThreadAttachment {
    fn drop(&mut self) {
        unsafe {
            let _ = AttachThreadInput(self.ours, self.theirs, false);
        }
    }
}

/// Make `target` the active foreground window, restoring it if minimized.
/// Null handles and handles of destroyed windows are ignored.
pub fn activate_window(target: WindowId) {
    if target.is_null() {
        return;
    }
    let hwnd: HWND = to_hwnd(target);
    if !unsafe { IsWindow(hwnd) }.as_bool() {
        log!("activate_window: {} is gone", target);
        return;
    }

    log!("activate_window: {}", target);
    let _attachment = ThreadAttachment::to_foreground();
    let flags = SWP_NOMOVE | SWP_NOSIZE | SWP_SHOWWINDOW;

    unsafe {
        let _ = LockSetForegroundWindow(LSFW_UNLOCK);
        let _ = AllowSetForegroundWindow(ASFW_ANY);
        if IsIconic(hwnd).as_bool() {
            let _ = ShowWindow(hwnd, SW_RESTORE);
        }

        // Brief topmost toggle lifts the window above everything else
        let _ = SetWindowPos(hwnd, HWND_TOPMOST, 0, 0, 0, 0, flags);
        let _ = SetForegroundWindow(hwnd);
        let _ = SetActiveWindow(hwnd);
        let _ = SetFocus(hwnd);
        let _ = SetWindowPos(hwnd, HWND_NOTOPMOST, 0, 0, 0, 0, flags);
    }
}
