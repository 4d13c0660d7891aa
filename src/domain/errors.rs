//! Domain layer error types
//!
//! Only environment failures surface as errors. Resource and lookup failures
//! in the switcher pipeline degrade to placeholders or empty results instead.

use thiserror::Error;

/// Failures that stop the application from starting or running
#[derive(Error, Debug)]
pub enum AppError {
    /// Another instance holds the instance mutex
    #[error("Another instance of TabWind is already running.")]
    AlreadyRunning,

    /// The instance mutex could not be created at all
    #[error("Failed to create instance lock: {0}")]
    InstanceLock(String),

    /// The low-level keyboard hook was rejected by the system
    #[error("Failed to install keyboard hook: {0}")]
    HookInstall(String),

    /// A window class could not be registered
    #[error("Failed to register window class: {0}")]
    WindowClass(String),

    /// A window could not be created
    #[error("Failed to create window: {0}")]
    WindowCreation(String),

    /// The Direct2D/DirectWrite factories could not be created
    #[error("Failed to initialize renderer: {0}")]
    Renderer(String),
}

/// Settings file errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}
