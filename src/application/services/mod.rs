//! Application Services

pub mod switcher;
pub mod window_collector;

pub use switcher::{HookAction, Switcher, SwitcherState};
pub use window_collector::collect;
