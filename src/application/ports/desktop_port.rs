//! DesktopPort - read access to the desktop's top-level windows
//!
//! The window collector talks to the desktop only through this port so its
//! inclusion rules can be exercised against synthetic windows.

use std::path::{Path, PathBuf};

use crate::domain::value_objects::{IconBitmap, ProcessId, WindowId};

/// Properties that decide whether a window is listed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WindowAttributes {
    pub visible: bool,
    pub has_title: bool,
    /// Owned by another window (dialogs, tool popups)
    pub owned: bool,
    /// Carries `WS_EX_TOOLWINDOW`
    pub tool_window: bool,
    /// Owning process, if it could be resolved
    pub process: Option<ProcessId>,
}

impl WindowAttributes {
    /// Visible, titled, unowned and not a tool window
    pub fn is_switchable(&self) -> bool {
        self.visible && self.has_title && !self.owned && !self.tool_window
    }
}

/// Port interface for window enumeration and inspection
pub trait DesktopPort {
    /// All top-level windows in enumeration order. Finite, taken in one pass.
    fn top_level_windows(&self) -> Vec<WindowId>;

    /// Inspect a window. Destroyed windows report as invisible.
    fn attributes(&self, window: WindowId) -> WindowAttributes;

    /// Process owning the current foreground window
    fn foreground_process(&self) -> Option<ProcessId>;

    /// Current title text
    fn title(&self, window: WindowId) -> String;

    /// Executable image of a process, best effort
    fn image_path(&self, process: ProcessId) -> Option<PathBuf>;
}

/// Port interface for icon resolution
pub trait IconPort {
    /// Best icon for an executable, falling back to the window's own icon and
    /// finally to a transparent placeholder. Never fails.
    fn resolve(&self, image_path: Option<&Path>, fallback: WindowId) -> IconBitmap;
}
