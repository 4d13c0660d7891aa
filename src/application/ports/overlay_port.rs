//! OverlayPort - everything the switcher asks of the outside world
//!
//! Implemented by the Win32 host in production and by recording fakes in
//! tests. All calls happen on the UI thread from inside the keyboard hook, so
//! implementations must return promptly.

use crate::domain::entities::{CandidateList, SwitcherSession};
use crate::domain::value_objects::{SwitchMode, WindowId};

pub trait OverlayPort {
    /// Build a fresh candidate list
    fn collect(&mut self, mode: SwitchMode) -> CandidateList;

    /// Create, paint and show the overlay. Returns false if the window could
    /// not be created; the switcher then drops the session.
    fn open_overlay(&mut self, session: &SwitcherSession) -> bool;

    /// Repaint the overlay after a selection change
    fn render_overlay(&mut self, session: &SwitcherSession);

    /// Destroy the overlay if one exists
    fn close_overlay(&mut self);

    /// Hand a window to the activation dispatcher
    fn activate(&mut self, target: WindowId);
}
