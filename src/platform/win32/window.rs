//! Win32 window classes and the two windows TabWind owns
//!
//! The main window is message-only: it receives deferred activation requests
//! and owns the application lifetime. The overlay is a layered popup that
//! exists only while the switcher is showing.

use std::cell::Cell;

use windows::core::{w, PCWSTR};
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, RECT, WPARAM};
use windows::Win32::Graphics::Gdi::HBRUSH;
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::WindowsAndMessaging::*;

use super::activate::activate_window;
use super::menu::show_context_menu;
use super::{to_hwnd, to_window_id};
use crate::domain::errors::AppError;
use crate::domain::value_objects::{ScreenRect, WindowId};

/// Posted to the main window with the target handle in `wparam`
pub const WM_APP_SWITCH_TO_WINDOW: u32 = WM_APP + 1;

const MAIN_CLASS_NAME: PCWSTR = w!("TabWindMainWindow");
const OVERLAY_CLASS_NAME: PCWSTR = w!("TabWindOverlayWindow");

thread_local! {
    /// Main window of this thread, for the overlay's Exit command
    static MAIN_WINDOW: Cell<WindowId> = const { Cell::new(WindowId::NULL) };
}

unsafe extern "system" fn main_wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        WM_APP_SWITCH_TO_WINDOW => {
            activate_window(WindowId(wparam.0 as isize));
            LRESULT(0)
        }
        WM_CLOSE => {
            log!("WM_CLOSE received - destroying main window");
            let _ = DestroyWindow(hwnd);
            LRESULT(0)
        }
        WM_DESTROY => {
            log!("WM_DESTROY received - posting quit message");
            PostQuitMessage(0);
            LRESULT(0)
        }
        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

unsafe extern "system" fn overlay_wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        WM_RBUTTONUP => {
            let main = MAIN_WINDOW.with(Cell::get);
            show_context_menu(hwnd, to_hwnd(main));
            LRESULT(0)
        }
        WM_MOUSEACTIVATE => LRESULT(MA_NOACTIVATE as isize),
        // Layered content is pushed with UpdateLayeredWindow
        WM_ERASEBKGND => LRESULT(1),
        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

/// Both window classes, unregistered on drop
pub struct WindowClasses;

impl WindowClasses {
    pub fn register() -> Result<Self, AppError> {
        unsafe {
            let hinstance =
                GetModuleHandleW(None).map_err(|e| AppError::WindowClass(e.to_string()))?;
            let cursor =
                LoadCursorW(None, IDC_ARROW).map_err(|e| AppError::WindowClass(e.to_string()))?;

            for (name, proc) in [
                (MAIN_CLASS_NAME, main_wnd_proc as WndProcFn),
                (OVERLAY_CLASS_NAME, overlay_wnd_proc as WndProcFn),
            ] {
                let wc = WNDCLASSEXW {
                    cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
                    lpfnWndProc: Some(proc),
                    hInstance: hinstance.into(),
                    hCursor: cursor,
                    hbrBackground: HBRUSH::default(),
                    lpszClassName: name,
                    ..Default::default()
                };
                if RegisterClassExW(&wc) == 0 {
                    let e = windows::core::Error::from_win32();
                    return Err(AppError::WindowClass(e.to_string()));
                }
            }
        }
        log!("Window classes registered");
        Ok(Self)
    }
}

impl Drop for WindowClasses {
    fn drop(&mut self) {
        unsafe {
            if let Ok(hinstance) = GetModuleHandleW(None) {
                let _ = UnregisterClassW(OVERLAY_CLASS_NAME, hinstance);
                let _ = UnregisterClassW(MAIN_CLASS_NAME, hinstance);
            }
        }
    }
}

type WndProcFn = unsafe extern "system" fn(HWND, u32, WPARAM, LPARAM) -> LRESULT;

/// Message-only window that owns the application lifetime
pub struct MainWindow {
    hwnd: HWND,
}

impl MainWindow {
    pub fn create() -> Result<Self, AppError> {
        let hwnd = unsafe {
            let hinstance =
                GetModuleHandleW(None).map_err(|e| AppError::WindowCreation(e.to_string()))?;
            CreateWindowExW(
                WINDOW_EX_STYLE::default(),
                MAIN_CLASS_NAME,
                w!("TabWind Main"),
                WINDOW_STYLE::default(),
                0,
                0,
                0,
                0,
                HWND_MESSAGE,
                None,
                hinstance,
                None,
            )
            .map_err(|e| AppError::WindowCreation(e.to_string()))?
        };

        MAIN_WINDOW.with(|main| main.set(to_window_id(hwnd)));
        log!("Main window created: {:?}", hwnd);
        Ok(Self { hwnd })
    }

    pub fn id(&self) -> WindowId {
        to_window_id(self.hwnd)
    }
}

/// Queue activation of `target` on `main_window` so it runs outside the
/// keyboard hook
pub fn post_switch(main_window: WindowId, target: WindowId) {
    unsafe {
        if let Err(e) = PostMessageW(
            to_hwnd(main_window),
            WM_APP_SWITCH_TO_WINDOW,
            WPARAM(target.0 as usize),
            LPARAM(0),
        ) {
            log!("post_switch({}) failed: {}", target, e);
        }
    }
}

impl Drop for MainWindow {
    fn drop(&mut self) {
        MAIN_WINDOW.with(|main| main.set(WindowId::NULL));
        unsafe {
            if IsWindow(self.hwnd).as_bool() {
                let _ = DestroyWindow(self.hwnd);
            }
        }
    }
}

/// Layered, topmost, non-activating popup; destroyed on drop
pub struct OverlayWindow {
    hwnd: HWND,
    bounds: ScreenRect,
    dpi: u32,
}

impl OverlayWindow {
    /// Create the overlay hidden at `bounds`, drawn for a monitor at `dpi`
    pub fn create(bounds: ScreenRect, dpi: u32) -> Result<Self, AppError> {
        let hwnd = unsafe {
            let hinstance =
                GetModuleHandleW(None).map_err(|e| AppError::WindowCreation(e.to_string()))?;
            CreateWindowExW(
                WS_EX_TOPMOST | WS_EX_LAYERED | WS_EX_TOOLWINDOW,
                OVERLAY_CLASS_NAME,
                w!("TabWind"),
                WS_POPUP,
                bounds.x,
                bounds.y,
                bounds.width,
                bounds.height,
                None,
                None,
                hinstance,
                None,
            )
            .map_err(|e| AppError::WindowCreation(e.to_string()))?
        };
        log!("Overlay created: {:?} at {:?}, {} dpi", hwnd, bounds, dpi);
        Ok(Self { hwnd, bounds, dpi })
    }

    pub fn hwnd(&self) -> HWND {
        self.hwnd
    }

    pub fn id(&self) -> WindowId {
        to_window_id(self.hwnd)
    }

    pub fn bounds(&self) -> ScreenRect {
        self.bounds
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    /// Current client size, falling back to the creation bounds
    pub fn client_size(&self) -> (i32, i32) {
        let mut rect = RECT::default();
        unsafe {
            if GetClientRect(self.hwnd, &mut rect).is_ok() {
                let size = (rect.right - rect.left, rect.bottom - rect.top);
                if size.0 > 0 && size.1 > 0 {
                    return size;
                }
            }
        }
        (self.bounds.width, self.bounds.height)
    }

    /// Show without taking focus
    pub fn show(&self) {
        unsafe {
            let _ = ShowWindow(self.hwnd, SW_SHOWNOACTIVATE);
        }
    }
}

impl Drop for OverlayWindow {
    fn drop(&mut self) {
        unsafe {
            let _ = DestroyWindow(self.hwnd);
        }
        log!("Overlay destroyed: {:?}", self.hwnd);
    }
}
