//! Domain Services

pub mod overlay_layout;
