//! Win32 side of the switcher: collection, overlay lifetime, activation

use windows::Win32::Foundation::POINT;
use windows::Win32::Graphics::Gdi::{
    GetMonitorInfoW, MonitorFromPoint, MONITORINFO, MONITOR_DEFAULTTONEAREST,
};
use windows::Win32::UI::HiDpi::{GetDpiForMonitor, MDT_EFFECTIVE_DPI};
use windows::Win32::UI::WindowsAndMessaging::{
    GetCursorPos, GetSystemMetrics, SM_CXSCREEN, SM_CYSCREEN,
};

use super::desktop::Win32Desktop;
use super::icon::Win32IconResolver;
use super::render::Renderer;
use super::window::{post_switch, OverlayWindow};
use crate::application::ports::OverlayPort;
use crate::application::services::collect;
use crate::domain::entities::{CandidateList, SwitcherSession};
use crate::domain::services::overlay_layout::{place_panel, BASE_DPI};
use crate::domain::value_objects::{ScreenRect, SwitchMode, WindowId};

/// Bounds and effective DPI of the monitor under the cursor. Falls back to
/// the primary screen size at the origin and the base DPI.
fn monitor_under_cursor() -> (ScreenRect, u32) {
    unsafe {
        let mut cursor = POINT::default();
        if GetCursorPos(&mut cursor).is_ok() {
            let monitor = MonitorFromPoint(cursor, MONITOR_DEFAULTTONEAREST);
            let mut info = MONITORINFO {
                cbSize: std::mem::size_of::<MONITORINFO>() as u32,
                ..Default::default()
            };
            if GetMonitorInfoW(monitor, &mut info).as_bool() {
                let r = info.rcMonitor;
                let (mut dpi_x, mut dpi_y) = (0u32, 0u32);
                let queried = GetDpiForMonitor(monitor, MDT_EFFECTIVE_DPI, &mut dpi_x, &mut dpi_y);
                let dpi = match queried {
                    Ok(()) if dpi_x > 0 => dpi_x,
                    _ => BASE_DPI,
                };
                let bounds = ScreenRect::new(r.left, r.top, r.right - r.left, r.bottom - r.top);
                return (bounds, dpi);
            }
        }
        let width = GetSystemMetrics(SM_CXSCREEN);
        let height = GetSystemMetrics(SM_CYSCREEN);
        (ScreenRect::new(0, 0, width, height), BASE_DPI)
    }
}

pub struct Win32Host {
    desktop: Win32Desktop,
    icons: Win32IconResolver,
    renderer: Renderer,
    overlay: Option<OverlayWindow>,
    main_window: WindowId,
    transparency: u8,
}

impl Win32Host {
    pub fn new(renderer: Renderer, main_window: WindowId, transparency: u8) -> Self {
        Self {
            desktop: Win32Desktop,
            icons: Win32IconResolver,
            renderer,
            overlay: None,
            main_window,
            transparency,
        }
    }

    fn paint(&mut self, session: &SwitcherSession) {
        if let Some(overlay) = &self.overlay {
            if let Err(e) = self.renderer.render(overlay, session, self.transparency) {
                log!("render failed: {}", e);
            }
        }
    }
}

impl OverlayPort for Win32Host {
    fn collect(&mut self, mode: SwitchMode) -> CandidateList {
        let mut own = vec![self.main_window];
        own.extend(self.overlay.as_ref().map(OverlayWindow::id));
        collect(&self.desktop, &self.icons, mode, &own)
    }

    fn open_overlay(&mut self, session: &SwitcherSession) -> bool {
        self.overlay = None;
        let (monitor, dpi) = monitor_under_cursor();
        let bounds = place_panel(session.candidates().len(), monitor, dpi);

        match OverlayWindow::create(bounds, dpi) {
            Ok(overlay) => {
                self.overlay = Some(overlay);
                self.paint(session);
                if let Some(overlay) = &self.overlay {
                    overlay.show();
                }
                true
            }
            Err(e) => {
                log!("open_overlay: {}", e);
                false
            }
        }
    }

    fn render_overlay(&mut self, session: &SwitcherSession) {
        self.paint(session);
    }

    fn close_overlay(&mut self) {
        self.overlay = None;
    }

    fn activate(&mut self, target: WindowId) {
        post_switch(self.main_window, target);
    }
}
