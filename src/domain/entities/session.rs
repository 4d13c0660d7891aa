//! SwitcherSession entity - the state behind one shown overlay
//!
//! A session is created when the overlay is first shown for a modifier hold
//! and dropped when the overlay is dismissed. It owns the candidate list and
//! therefore every icon in it.

use super::candidate::{CandidateList, CandidateWindow};
use crate::domain::value_objects::SwitchMode;

/// Index of the highlighted candidate
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    index: usize,
}

impl Selection {
    pub fn index(self) -> usize {
        self.index
    }

    /// Move to the next entry, wrapping at `len`. No-op for an empty list.
    pub fn advance(&mut self, len: usize) {
        if len > 0 {
            self.index = (self.index + 1) % len;
        }
    }

    /// Whether the index addresses an entry of a list of `len` items
    pub fn is_valid_for(self, len: usize) -> bool {
        self.index < len
    }
}

/// One press-and-hold switcher session
#[derive(Debug)]
pub struct SwitcherSession {
    mode: SwitchMode,
    candidates: CandidateList,
    selection: Selection,
}

impl SwitcherSession {
    /// Start a session over a freshly collected list, selecting the first entry
    pub fn new(mode: SwitchMode, candidates: CandidateList) -> Self {
        Self {
            mode,
            candidates,
            selection: Selection::default(),
        }
    }

    pub fn mode(&self) -> SwitchMode {
        self.mode
    }

    pub fn candidates(&self) -> &CandidateList {
        &self.candidates
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Advance the selection by one, wrapping around
    pub fn advance(&mut self) {
        self.selection.advance(self.candidates.len());
    }

    /// The highlighted candidate, if the list is non-empty
    pub fn selected(&self) -> Option<&CandidateWindow> {
        self.candidates.get(self.selection.index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{IconBitmap, WindowId};

    fn list(n: isize) -> CandidateList {
        (1..=n)
            .map(|i| CandidateWindow::new(WindowId(i), "w", IconBitmap::placeholder()))
            .collect()
    }

    #[test]
    fn test_selection_wraps() {
        let mut sel = Selection::default();
        for n in 1..=10 {
            sel.advance(3);
            assert_eq!(sel.index(), n % 3);
        }
    }

    #[test]
    fn test_selection_empty_list_is_noop() {
        let mut sel = Selection::default();
        sel.advance(0);
        assert_eq!(sel.index(), 0);
        assert!(!sel.is_valid_for(0));
    }

    #[test]
    fn test_session_starts_at_first_candidate() {
        let session = SwitcherSession::new(SwitchMode::AllWindows, list(4));
        assert_eq!(session.selection().index(), 0);
        assert_eq!(session.selected().map(|c| c.id), Some(WindowId(1)));
    }

    #[test]
    fn test_session_advance_selects_next() {
        let mut session = SwitcherSession::new(SwitchMode::SameProcess, list(2));
        session.advance();
        assert_eq!(session.selected().map(|c| c.id), Some(WindowId(2)));
        session.advance();
        assert_eq!(session.selected().map(|c| c.id), Some(WindowId(1)));
        assert_eq!(session.mode(), SwitchMode::SameProcess);
    }
}
