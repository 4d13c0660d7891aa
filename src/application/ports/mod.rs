//! Application Ports - interfaces implemented by the platform layer

pub mod desktop_port;
pub mod overlay_port;

pub use desktop_port::{DesktopPort, IconPort, WindowAttributes};
pub use overlay_port::OverlayPort;
