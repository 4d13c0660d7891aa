//! TabWind - hold Alt and press Tab (or the key above Tab) to switch windows.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

#[cfg(windows)]
fn main() {
    use tabwind::platform::win32;

    tabwind::log::init();
    tabwind::log!("main() starting");

    if let Err(e) = win32::run() {
        tabwind::log!("Fatal: {}", e);
        win32::report_error(&e);
        std::process::exit(1);
    }

    tabwind::log!("main() exiting normally");
}

#[cfg(not(windows))]
fn main() {
    eprintln!("TabWind only runs on Windows");
    std::process::exit(1);
}
