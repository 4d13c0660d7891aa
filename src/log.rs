//! File-based logging next to the executable

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use parking_lot::Mutex;

static LOG_FILE: Mutex<Option<File>> = Mutex::new(None);

/// Name of the log file written beside the executable
pub const LOG_FILE_NAME: &str = "tabwind.log";

/// Get the directory where the executable is located
pub fn exe_dir() -> PathBuf {
    std::env::current_exe()
        .unwrap_or_else(|_| PathBuf::from("tabwind.exe"))
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Initialize logging to a file next to the executable.
///
/// The file is truncated on every start. If it cannot be opened, logging
/// silently becomes a no-op.
pub fn init() {
    let log_path = exe_dir().join(LOG_FILE_NAME);

    if let Ok(file) = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&log_path)
    {
        *LOG_FILE.lock() = Some(file);
    }

    log(&format!(
        "=== TabWind {} log started ===",
        env!("CARGO_PKG_VERSION")
    ));
}

/// Log a message to the file
pub fn log(msg: &str) {
    let mut guard = LOG_FILE.lock();
    if let Some(ref mut file) = *guard {
        let ts = chrono::Local::now().format("%H:%M:%S%.3f");
        let _ = writeln!(file, "[{}] {}", ts, msg);
        let _ = file.flush();
    }
}

/// Log a formatted message
#[macro_export]
macro_rules! log {
    ($($arg:tt)*) => {
        $crate::log::log(&format!($($arg)*))
    };
}
