//! Window collector - builds the candidate list for a session
//!
//! Enumeration yields each top-level window once, in enumeration order; this
//! stage filters it and resolves a title and icon for every admitted window.

use crate::application::ports::{DesktopPort, IconPort};
use crate::domain::entities::{CandidateList, CandidateWindow};
use crate::domain::value_objects::{SwitchMode, WindowId};

/// Collect switchable windows.
///
/// `excluded` lists this application's own windows (overlay, message window).
/// In `SameProcess` mode only windows of the foreground window's process are
/// kept; if that process cannot be determined the list is empty.
pub fn collect<D, I>(desktop: &D, icons: &I, mode: SwitchMode, excluded: &[WindowId]) -> CandidateList
where
    D: DesktopPort,
    I: IconPort,
{
    let target_process = match mode {
        SwitchMode::AllWindows => None,
        SwitchMode::SameProcess => match desktop.foreground_process() {
            Some(pid) => Some(pid),
            None => {
                log!("collect: foreground process unresolved, nothing to list");
                return CandidateList::new();
            }
        },
    };

    let list: CandidateList = desktop
        .top_level_windows()
        .into_iter()
        .filter(|id| !excluded.contains(id))
        .filter_map(|id| {
            let attrs = desktop.attributes(id);
            if !attrs.is_switchable() {
                return None;
            }
            if target_process.is_some() && attrs.process != target_process {
                return None;
            }

            let image_path = attrs.process.and_then(|pid| desktop.image_path(pid));
            let icon = icons.resolve(image_path.as_deref(), id);
            Some(CandidateWindow::new(id, &desktop.title(id), icon))
        })
        .collect();

    log!("collect({:?}): {} candidates", mode, list.len());
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::WindowAttributes;
    use crate::domain::value_objects::{IconBitmap, ProcessId};
    use std::cell::RefCell;
    use std::path::{Path, PathBuf};

    #[derive(Clone)]
    struct FakeWindow {
        id: WindowId,
        title: &'static str,
        attrs: WindowAttributes,
    }

    struct FakeDesktop {
        windows: Vec<FakeWindow>,
        foreground: Option<ProcessId>,
    }

    impl DesktopPort for FakeDesktop {
        fn top_level_windows(&self) -> Vec<WindowId> {
            self.windows.iter().map(|w| w.id).collect()
        }

        fn attributes(&self, window: WindowId) -> WindowAttributes {
            self.windows
                .iter()
                .find(|w| w.id == window)
                .map(|w| w.attrs)
                .unwrap_or_default()
        }

        fn foreground_process(&self) -> Option<ProcessId> {
            self.foreground
        }

        fn title(&self, window: WindowId) -> String {
            self.windows
                .iter()
                .find(|w| w.id == window)
                .map(|w| w.title.to_string())
                .unwrap_or_default()
        }

        fn image_path(&self, process: ProcessId) -> Option<PathBuf> {
            if process.0 == 0 {
                None
            } else {
                Some(PathBuf::from(format!("C:\\apps\\p{}.exe", process.0)))
            }
        }
    }

    /// Icon port that always yields the placeholder
    struct PlaceholderIcons;

    impl IconPort for PlaceholderIcons {
        fn resolve(&self, _image_path: Option<&Path>, _fallback: WindowId) -> IconBitmap {
            IconBitmap::placeholder()
        }
    }

    fn window(id: isize, title: &'static str, pid: u32) -> FakeWindow {
        FakeWindow {
            id: WindowId(id),
            title,
            attrs: WindowAttributes {
                visible: true,
                has_title: !title.is_empty(),
                owned: false,
                tool_window: false,
                process: Some(ProcessId(pid)),
            },
        }
    }

    fn mixed_desktop() -> FakeDesktop {
        let mut hidden = window(3, "Hidden", 10);
        hidden.attrs.visible = false;
        let mut dialog = window(4, "Save As", 10);
        dialog.attrs.owned = true;
        let mut palette = window(5, "Tools", 20);
        palette.attrs.tool_window = true;

        FakeDesktop {
            windows: vec![
                window(1, "Editor", 10),
                window(2, "", 10),
                hidden,
                dialog,
                palette,
                window(6, "Browser", 20),
                window(7, "Overlay", 99),
                window(8, "Editor 2", 10),
            ],
            foreground: Some(ProcessId(10)),
        }
    }

    #[test]
    fn test_collect_applies_every_inclusion_rule() {
        let desktop = mixed_desktop();
        let list = collect(&desktop, &PlaceholderIcons, SwitchMode::AllWindows, &[WindowId(7)]);

        assert_eq!(list.ids(), vec![WindowId(1), WindowId(6), WindowId(8)]);
    }

    #[test]
    fn test_collect_matches_predicate_subset() {
        let desktop = mixed_desktop();
        let excluded = [WindowId(7)];
        let expected: Vec<WindowId> = desktop
            .windows
            .iter()
            .filter(|w| !excluded.contains(&w.id) && w.attrs.is_switchable())
            .map(|w| w.id)
            .collect();

        let list = collect(&desktop, &PlaceholderIcons, SwitchMode::AllWindows, &excluded);
        assert_eq!(list.ids(), expected);
    }

    #[test]
    fn test_collect_same_process_filters_by_foreground_pid() {
        let desktop = mixed_desktop();
        let list = collect(&desktop, &PlaceholderIcons, SwitchMode::SameProcess, &[]);

        assert_eq!(list.ids(), vec![WindowId(1), WindowId(8)]);
        for c in &list {
            assert_eq!(desktop.attributes(c.id).process, Some(ProcessId(10)));
        }
    }

    #[test]
    fn test_collect_same_process_without_foreground_is_empty() {
        let mut desktop = mixed_desktop();
        desktop.foreground = None;

        let list = collect(&desktop, &PlaceholderIcons, SwitchMode::SameProcess, &[]);
        assert!(list.is_empty());
    }

    #[test]
    fn test_collect_keeps_titles() {
        let desktop = mixed_desktop();
        let list = collect(&desktop, &PlaceholderIcons, SwitchMode::AllWindows, &[]);
        let titles: Vec<&str> = list.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Editor", "Browser", "Overlay", "Editor 2"]);
    }

    /// Records what the collector asked the icon resolver for
    struct RecordingIcons {
        calls: RefCell<Vec<(Option<PathBuf>, WindowId)>>,
    }

    impl IconPort for RecordingIcons {
        fn resolve(&self, image_path: Option<&Path>, fallback: WindowId) -> IconBitmap {
            self.calls
                .borrow_mut()
                .push((image_path.map(Path::to_path_buf), fallback));
            IconBitmap::placeholder()
        }
    }

    #[test]
    fn test_collect_passes_image_path_and_fallback_window() {
        let desktop = FakeDesktop {
            windows: vec![window(1, "Known", 42), window(2, "Unknown path", 0)],
            foreground: None,
        };
        let icons = RecordingIcons {
            calls: RefCell::new(Vec::new()),
        };

        let list = collect(&desktop, &icons, SwitchMode::AllWindows, &[]);
        assert_eq!(list.len(), 2);

        let calls = icons.calls.borrow();
        assert_eq!(
            calls[0],
            (Some(PathBuf::from("C:\\apps\\p42.exe")), WindowId(1))
        );
        assert_eq!(calls[1], (None, WindowId(2)));
    }
}
