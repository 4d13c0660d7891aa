//! CandidateWindow entity - a window eligible for selection in the overlay

use crate::domain::value_objects::{IconBitmap, WindowId};

/// Longest title snapshot kept, in UTF-16 code units
pub const MAX_TITLE_UNITS: usize = 255;

/// One entry of the switcher list
#[derive(Clone, Debug, PartialEq)]
pub struct CandidateWindow {
    pub id: WindowId,
    pub title: String,
    pub icon: IconBitmap,
}

impl CandidateWindow {
    /// Create a candidate, cutting the title down to `MAX_TITLE_UNITS`
    pub fn new(id: WindowId, title: &str, icon: IconBitmap) -> Self {
        Self {
            id,
            title: bounded_title(title),
            icon,
        }
    }
}

/// Truncate a title to `MAX_TITLE_UNITS` UTF-16 units without splitting a
/// surrogate pair
pub fn bounded_title(title: &str) -> String {
    let mut units = 0;
    let mut end = title.len();
    for (idx, ch) in title.char_indices() {
        if units + ch.len_utf16() > MAX_TITLE_UNITS {
            end = idx;
            break;
        }
        units += ch.len_utf16();
    }
    title[..end].to_string()
}

/// Ordered candidates of one session, in enumeration order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CandidateList {
    items: Vec<CandidateWindow>,
}

impl CandidateList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, candidate: CandidateWindow) {
        self.items.push(candidate);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CandidateWindow> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CandidateWindow> {
        self.items.iter()
    }

    /// Window ids in list order
    pub fn ids(&self) -> Vec<WindowId> {
        self.items.iter().map(|c| c.id).collect()
    }
}

impl FromIterator<CandidateWindow> for CandidateList {
    fn from_iter<I: IntoIterator<Item = CandidateWindow>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a CandidateList {
    type Item = &'a CandidateWindow;
    type IntoIter = std::slice::Iter<'a, CandidateWindow>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
