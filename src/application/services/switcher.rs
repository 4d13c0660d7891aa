//! Switcher state machine
//!
//! Driven one key event at a time from the low-level keyboard hook. The
//! overlay exists exactly while a session does; the session is created on the
//! first trigger press of a modifier hold and dropped on modifier release.

use crate::application::ports::OverlayPort;
use crate::domain::entities::SwitcherSession;
use crate::domain::value_objects::{KeyInput, SwitchKey, SwitchMode};

/// What the hook should do with the event it just reported
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HookAction {
    /// Hand the event to the next hook
    PassThrough,
    /// Swallow the event
    Consume,
}

/// Observable state of the switcher
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwitcherState {
    Idle,
    ModifierHeldNoOverlay,
    ModifierHeldOverlayShown,
}

#[derive(Debug, Default)]
pub struct Switcher {
    modifier_held: bool,
    session: Option<SwitcherSession>,
}

impl Switcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SwitcherState {
        match (self.modifier_held, &self.session) {
            (_, Some(_)) => SwitcherState::ModifierHeldOverlayShown,
            (true, None) => SwitcherState::ModifierHeldNoOverlay,
            (false, None) => SwitcherState::Idle,
        }
    }

    pub fn session(&self) -> Option<&SwitcherSession> {
        self.session.as_ref()
    }

    /// Feed one key event through the state machine
    pub fn handle_key<P: OverlayPort>(&mut self, input: KeyInput, port: &mut P) -> HookAction {
        match (input.key, input.pressed) {
            (SwitchKey::Modifier, true) => {
                self.modifier_held = true;
                HookAction::PassThrough
            }
            (SwitchKey::Modifier, false) => {
                self.modifier_held = false;
                self.dismiss(port);
                HookAction::PassThrough
            }
            (SwitchKey::Trigger(mode), true) if self.modifier_held => {
                self.trigger(mode, port);
                HookAction::Consume
            }
            _ => HookAction::PassThrough,
        }
    }

    fn trigger<P: OverlayPort>(&mut self, mode: SwitchMode, port: &mut P) {
        if let Some(session) = self.session.as_mut() {
            session.advance();
            port.render_overlay(session);
            return;
        }

        let candidates = port.collect(mode);
        if candidates.is_empty() {
            log!("trigger({:?}): no switchable windows", mode);
            return;
        }

        let session = SwitcherSession::new(mode, candidates);
        if port.open_overlay(&session) {
            self.session = Some(session);
        } else {
            log!("trigger({:?}): overlay could not be opened", mode);
        }
    }

    fn dismiss<P: OverlayPort>(&mut self, port: &mut P) {
        let Some(session) = self.session.take() else {
            return;
        };

        if session.selection().is_valid_for(session.candidates().len()) {
            if let Some(selected) = session.selected() {
                port.activate(selected.id);
            }
        }
        port.close_overlay();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{CandidateList, CandidateWindow};
    use crate::domain::value_objects::key_input::vk;
    use crate::domain::value_objects::{IconBitmap, WindowId};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Collect(SwitchMode),
        Open(usize),
        Render(usize),
        Close,
        Activate(WindowId),
    }

    struct FakePort {
        windows: usize,
        open_succeeds: bool,
        calls: Vec<Call>,
    }

    impl FakePort {
        fn with_windows(windows: usize) -> Self {
            Self {
                windows,
                open_succeeds: true,
                calls: Vec::new(),
            }
        }

        fn count(&self, f: impl Fn(&Call) -> bool) -> usize {
            self.calls.iter().filter(|c| f(c)).count()
        }
    }

    impl OverlayPort for FakePort {
        fn collect(&mut self, mode: SwitchMode) -> CandidateList {
            self.calls.push(Call::Collect(mode));
            (1..=self.windows as isize)
                .map(|i| CandidateWindow::new(WindowId(i), "window", IconBitmap::placeholder()))
                .collect()
        }

        fn open_overlay(&mut self, session: &SwitcherSession) -> bool {
            self.calls.push(Call::Open(session.selection().index()));
            self.open_succeeds
        }

        fn render_overlay(&mut self, session: &SwitcherSession) {
            self.calls.push(Call::Render(session.selection().index()));
        }

        fn close_overlay(&mut self) {
            self.calls.push(Call::Close);
        }

        fn activate(&mut self, target: WindowId) {
            self.calls.push(Call::Activate(target));
        }
    }

    fn alt(pressed: bool) -> KeyInput {
        KeyInput::classify(vk::MENU, pressed)
    }

    fn tab(pressed: bool) -> KeyInput {
        KeyInput::classify(vk::TAB, pressed)
    }

    fn backtick(pressed: bool) -> KeyInput {
        KeyInput::classify(vk::OEM_3, pressed)
    }

    #[test]
    fn test_modifier_down_passes_through() {
        let mut switcher = Switcher::new();
        let mut port = FakePort::with_windows(3);

        assert_eq!(switcher.handle_key(alt(true), &mut port), HookAction::PassThrough);
        assert_eq!(switcher.state(), SwitcherState::ModifierHeldNoOverlay);
        assert!(port.calls.is_empty());
    }

    #[test]
    fn test_trigger_without_modifier_passes_through() {
        let mut switcher = Switcher::new();
        let mut port = FakePort::with_windows(3);

        assert_eq!(switcher.handle_key(tab(true), &mut port), HookAction::PassThrough);
        assert_eq!(switcher.state(), SwitcherState::Idle);
        assert!(port.calls.is_empty());
    }

    #[test]
    fn test_first_trigger_opens_overlay_at_first_entry() {
        let mut switcher = Switcher::new();
        let mut port = FakePort::with_windows(3);

        switcher.handle_key(alt(true), &mut port);
        assert_eq!(switcher.handle_key(tab(true), &mut port), HookAction::Consume);

        assert_eq!(switcher.state(), SwitcherState::ModifierHeldOverlayShown);
        assert_eq!(port.calls, vec![Call::Collect(SwitchMode::AllWindows), Call::Open(0)]);
    }

    #[test]
    fn test_n_presses_select_n_minus_one_mod_len() {
        for len in 1..=4usize {
            for presses in 1..=9usize {
                let mut switcher = Switcher::new();
                let mut port = FakePort::with_windows(len);

                switcher.handle_key(alt(true), &mut port);
                for _ in 0..presses {
                    switcher.handle_key(tab(true), &mut port);
                    switcher.handle_key(tab(false), &mut port);
                }

                let session = switcher.session().expect("overlay shown");
                assert_eq!(session.selection().index(), (presses - 1) % len);
                assert!(session.selection().is_valid_for(len));

                switcher.handle_key(alt(false), &mut port);
                let expected = WindowId(((presses - 1) % len) as isize + 1);
                assert_eq!(port.calls[port.calls.len() - 2], Call::Activate(expected));
                assert_eq!(port.calls.last(), Some(&Call::Close));
            }
        }
    }

    #[test]
    fn test_release_activates_then_closes() {
        let mut switcher = Switcher::new();
        let mut port = FakePort::with_windows(3);

        switcher.handle_key(alt(true), &mut port);
        switcher.handle_key(tab(true), &mut port);
        switcher.handle_key(tab(true), &mut port);
        assert_eq!(switcher.handle_key(alt(false), &mut port), HookAction::PassThrough);

        assert_eq!(
            port.calls,
            vec![
                Call::Collect(SwitchMode::AllWindows),
                Call::Open(0),
                Call::Render(1),
                Call::Activate(WindowId(2)),
                Call::Close,
            ]
        );
        assert_eq!(switcher.state(), SwitcherState::Idle);
        assert!(switcher.session().is_none());
    }

    #[test]
    fn test_release_without_overlay_is_noop() {
        let mut switcher = Switcher::new();
        let mut port = FakePort::with_windows(3);

        switcher.handle_key(alt(true), &mut port);
        assert_eq!(switcher.handle_key(alt(false), &mut port), HookAction::PassThrough);

        assert!(port.calls.is_empty());
        assert_eq!(switcher.state(), SwitcherState::Idle);
    }

    #[test]
    fn test_empty_list_shows_nothing_but_consumes() {
        let mut switcher = Switcher::new();
        let mut port = FakePort::with_windows(0);

        switcher.handle_key(alt(true), &mut port);
        assert_eq!(switcher.handle_key(tab(true), &mut port), HookAction::Consume);
        assert_eq!(switcher.state(), SwitcherState::ModifierHeldNoOverlay);

        switcher.handle_key(alt(false), &mut port);
        assert_eq!(port.calls, vec![Call::Collect(SwitchMode::AllWindows)]);
    }

    #[test]
    fn test_open_failure_drops_session() {
        let mut switcher = Switcher::new();
        let mut port = FakePort::with_windows(2);
        port.open_succeeds = false;

        switcher.handle_key(alt(true), &mut port);
        assert_eq!(switcher.handle_key(tab(true), &mut port), HookAction::Consume);
        assert_eq!(switcher.state(), SwitcherState::ModifierHeldNoOverlay);

        // Next press tries again from scratch
        port.open_succeeds = true;
        switcher.handle_key(tab(true), &mut port);
        assert_eq!(switcher.state(), SwitcherState::ModifierHeldOverlayShown);
        assert_eq!(port.count(|c| matches!(c, Call::Collect(_))), 2);
    }

    #[test]
    fn test_same_process_trigger_uses_its_mode() {
        let mut switcher = Switcher::new();
        let mut port = FakePort::with_windows(2);

        switcher.handle_key(alt(true), &mut port);
        switcher.handle_key(backtick(true), &mut port);
        assert_eq!(port.calls[0], Call::Collect(SwitchMode::SameProcess));
        assert_eq!(switcher.session().map(|s| s.mode()), Some(SwitchMode::SameProcess));

        // Tab advances the running session without switching modes
        switcher.handle_key(tab(true), &mut port);
        assert_eq!(port.calls.last(), Some(&Call::Render(1)));
        assert_eq!(switcher.session().map(|s| s.mode()), Some(SwitchMode::SameProcess));
    }

    #[test]
    fn test_other_keys_pass_through() {
        let mut switcher = Switcher::new();
        let mut port = FakePort::with_windows(2);

        switcher.handle_key(alt(true), &mut port);
        switcher.handle_key(tab(true), &mut port);
        let calls = port.calls.len();

        assert_eq!(
            switcher.handle_key(KeyInput::classify(0x41, true), &mut port),
            HookAction::PassThrough
        );
        assert_eq!(switcher.handle_key(tab(false), &mut port), HookAction::PassThrough);
        assert_eq!(port.calls.len(), calls);
    }

    #[test]
    fn test_open_and_close_stay_balanced() {
        let mut switcher = Switcher::new();
        let mut port = FakePort::with_windows(5);

        for cycle in 0..100 {
            switcher.handle_key(alt(true), &mut port);
            for _ in 0..(cycle % 4 + 1) {
                switcher.handle_key(tab(true), &mut port);
            }
            switcher.handle_key(alt(false), &mut port);
            assert_eq!(switcher.state(), SwitcherState::Idle);
        }

        let opened = port.count(|c| matches!(c, Call::Open(_)));
        let closed = port.count(|c| *c == Call::Close);
        assert_eq!(opened, 100);
        assert_eq!(closed, 100);
        assert_eq!(port.count(|c| matches!(c, Call::Activate(_))), 100);
    }
}
