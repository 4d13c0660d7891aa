//! Overlay context menu

use windows::core::{w, HSTRING, PCWSTR};
use windows::Win32::Foundation::{HWND, LPARAM, POINT, WPARAM};
use windows::Win32::UI::WindowsAndMessaging::{
    AppendMenuW, CreatePopupMenu, DestroyMenu, GetCursorPos, MessageBoxW, PostMessageW,
    SetForegroundWindow, TrackPopupMenu, HMENU, MB_ICONINFORMATION, MB_OK, MF_STRING,
    TPM_NONOTIFY, TPM_RETURNCMD, WM_CLOSE,
};

const IDM_ABOUT: u32 = 1001;
const IDM_EXIT: u32 = 1002;

/// Popup menu destroyed on drop
struct PopupMenu(HMENU);

impl PopupMenu {
    fn create() -> Option<Self> {
        let menu = unsafe { CreatePopupMenu().ok()? };
        let menu = Self(menu);
        unsafe {
            AppendMenuW(menu.0, MF_STRING, IDM_ABOUT as usize, w!("About")).ok()?;
            AppendMenuW(menu.0, MF_STRING, IDM_EXIT as usize, w!("Exit")).ok()?;
        }
        Some(menu)
    }

    /// Show at the cursor and wait for a choice. 0 when dismissed.
    fn track(&self, owner: HWND) -> u32 {
        unsafe {
            let mut cursor = POINT::default();
            let _ = GetCursorPos(&mut cursor);
            // Required for the menu to close when clicking elsewhere
            let _ = SetForegroundWindow(owner);
            let chosen = TrackPopupMenu(
                self.0,
                TPM_RETURNCMD | TPM_NONOTIFY,
                cursor.x,
                cursor.y,
                0,
                owner,
                None,
            );
            chosen.0 as u32
        }
    }
}

impl Drop for PopupMenu {
    fn drop(&mut self) {
        unsafe {
            let _ = DestroyMenu(self.0);
        }
    }
}

/// Show the About/Exit menu for `overlay`. Exit asks `main_window` to close.
pub fn show_context_menu(overlay: HWND, main_window: HWND) {
    let Some(menu) = PopupMenu::create() else {
        log!("show_context_menu: menu creation failed");
        return;
    };

    match menu.track(overlay) {
        IDM_ABOUT => {
            let text = HSTRING::from(format!("TabWind v{}", env!("CARGO_PKG_VERSION")));
            unsafe {
                MessageBoxW(
                    overlay,
                    PCWSTR(text.as_ptr()),
                    w!("About"),
                    MB_OK | MB_ICONINFORMATION,
                );
            }
        }
        IDM_EXIT => {
            log!("Exit chosen from context menu");
            unsafe {
                let _ = PostMessageW(main_window, WM_CLOSE, WPARAM(0), LPARAM(0));
            }
        }
        _ => {}
    }
}
