//! Domain Value Objects - Immutable values that describe characteristics
//!
//! Value objects have no identity and are compared by their values.

pub mod color;
pub mod icon;
pub mod key_input;
pub mod rect;
pub mod window_id;

pub use color::Color;
pub use icon::{pack_mask, IconBitmap};
pub use key_input::{KeyInput, SwitchKey, SwitchMode};
pub use rect::{Rect, ScreenRect};
pub use window_id::{ProcessId, WindowId};
