//! KeyInput value object - keyboard events as the switcher sees them
//!
//! Raw virtual-key codes from the low-level hook are classified into the
//! handful of keys the switcher reacts to. Everything else is `Other`.

/// Win32 virtual-key codes the switcher cares about
pub mod vk {
    pub const TAB: u32 = 0x09;
    pub const MENU: u32 = 0x12;
    pub const LMENU: u32 = 0xA4;
    pub const RMENU: u32 = 0xA5;
    /// The key left of "1" on a US layout (grave accent / tilde)
    pub const OEM_3: u32 = 0xC0;
}

/// Which windows a switcher session lists
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SwitchMode {
    /// Every switchable window on the desktop
    #[default]
    AllWindows,
    /// Only windows of the foreground window's process
    SameProcess,
}

/// Classified key
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwitchKey {
    /// Alt (either side)
    Modifier,
    /// Tab or the grave-accent key
    Trigger(SwitchMode),
    Other,
}

impl SwitchKey {
    pub fn from_vk(code: u32) -> Self {
        match code {
            vk::MENU | vk::LMENU | vk::RMENU => SwitchKey::Modifier,
            vk::TAB => SwitchKey::Trigger(SwitchMode::AllWindows),
            vk::OEM_3 => SwitchKey::Trigger(SwitchMode::SameProcess),
            _ => SwitchKey::Other,
        }
    }
}

/// A key transition delivered by the keyboard observer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyInput {
    pub key: SwitchKey,
    pub pressed: bool,
}

impl KeyInput {
    /// Classify a raw key event
    pub fn classify(code: u32, pressed: bool) -> Self {
        Self {
            key: SwitchKey::from_vk(code),
            pressed,
        }
    }
}
