//! Low-level keyboard hook
//!
//! The hook runs on the thread that installed it, inside that thread's
//! message loop. Events are classified and handed to a thread-local handler
//! which decides whether they are swallowed.

use std::cell::{Cell, RefCell};

use windows::Win32::Foundation::{LPARAM, LRESULT, WPARAM};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, SetWindowsHookExW, UnhookWindowsHookEx, HC_ACTION, HHOOK, KBDLLHOOKSTRUCT,
    WH_KEYBOARD_LL, WM_KEYDOWN, WM_KEYUP, WM_SYSKEYDOWN, WM_SYSKEYUP,
};

use crate::application::services::HookAction;
use crate::domain::errors::AppError;
use crate::domain::value_objects::{KeyInput, SwitchKey};

type KeyHandler = Box<dyn FnMut(KeyInput) -> HookAction>;

thread_local! {
    static KEY_HANDLER: RefCell<Option<KeyHandler>> = RefCell::new(None);
    /// Modifier released while the handler was busy
    static PENDING_RELEASE: Cell<bool> = const { Cell::new(false) };
}

const MODIFIER_UP: KeyInput = KeyInput {
    key: SwitchKey::Modifier,
    pressed: false,
};

/// Direction of a raw keyboard message, if it is one
fn key_direction(message: u32) -> Option<bool> {
    match message {
        WM_KEYDOWN | WM_SYSKEYDOWN => Some(true),
        WM_KEYUP | WM_SYSKEYUP => Some(false),
        _ => None,
    }
}

/// Run the handler unless it is already running further up the stack.
///
/// A hook event can arrive while the handler is blocked in a cross-thread
/// send; such events are passed through untouched. A modifier release seen
/// that way is replayed to the handler once it returns, so the switcher
/// never misses the end of a hold.
fn dispatch(input: KeyInput) -> HookAction {
    KEY_HANDLER.with(|slot| match slot.try_borrow_mut() {
        Ok(mut handler) => match handler.as_mut() {
            Some(handler) => {
                let action = handler(input);
                if PENDING_RELEASE.with(|pending| pending.replace(false)) {
                    log!("replaying modifier release seen during re-entry");
                    handler(MODIFIER_UP);
                }
                action
            }
            None => HookAction::PassThrough,
        },
        Err(_) => {
            log!("keyboard hook re-entered, passing {:?} through", input);
            if input.key == SwitchKey::Modifier {
                PENDING_RELEASE.with(|pending| pending.set(!input.pressed));
            }
            HookAction::PassThrough
        }
    })
}

unsafe extern "system" fn keyboard_proc(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    if code == HC_ACTION as i32 {
        if let Some(pressed) = key_direction(wparam.0 as u32) {
            let event = &*(lparam.0 as *const KBDLLHOOKSTRUCT);
            let input = KeyInput::classify(event.vkCode, pressed);
            if dispatch(input) == HookAction::Consume {
                return LRESULT(1);
            }
        }
    }
    CallNextHookEx(None, code, wparam, lparam)
}

/// Installed keyboard hook; uninstalled on drop
pub struct KeyboardHook {
    hook: HHOOK,
}

impl KeyboardHook {
    /// Install the hook on the current thread with `handler` deciding each event
    pub fn install<F>(handler: F) -> Result<Self, AppError>
    where
        F: FnMut(KeyInput) -> HookAction + 'static,
    {
        KEY_HANDLER.with(|slot| *slot.borrow_mut() = Some(Box::new(handler)));

        let installed = unsafe {
            GetModuleHandleW(None)
                .and_then(|module| SetWindowsHookExW(WH_KEYBOARD_LL, Some(keyboard_proc), module, 0))
        };

        match installed {
            Ok(hook) => {
                log!("Keyboard hook installed: {:?}", hook);
                Ok(Self { hook })
            }
            Err(e) => {
                KEY_HANDLER.with(|slot| *slot.borrow_mut() = None);
                Err(AppError::HookInstall(e.to_string()))
            }
        }
    }
}

impl Drop for KeyboardHook {
    fn drop(&mut self) {
        unsafe {
            let _ = UnhookWindowsHookEx(self.hook);
        }
        KEY_HANDLER.with(|slot| {
            if let Ok(mut handler) = slot.try_borrow_mut() {
                *handler = None;
            }
        });
        log!("Keyboard hook removed");
    }
}
