//! Process bootstrap and message loop

use windows::core::{w, HSTRING};
use windows::Win32::UI::WindowsAndMessaging::{
    DispatchMessageW, GetMessageW, MessageBoxW, TranslateMessage, MB_ICONERROR,
    MB_ICONINFORMATION, MB_OK, MSG,
};

use super::dpi::enable_dpi_awareness;
use super::hook::KeyboardHook;
use super::host::Win32Host;
use super::instance::InstanceGuard;
use super::render::Renderer;
use super::window::{MainWindow, WindowClasses};
use crate::application::services::Switcher;
use crate::domain::errors::AppError;
use crate::shared::config::Settings;

fn run_message_loop() {
    let mut msg = MSG::default();
    unsafe {
        while GetMessageW(&mut msg, None, 0, 0).0 > 0 {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }
}

/// Start TabWind and block until it exits.
///
/// Resources are released in reverse order of acquisition; the hook goes
/// first so no key event can reach a half-torn-down switcher.
pub fn run() -> Result<(), AppError> {
    let _instance = InstanceGuard::acquire()?;

    if let Err(e) = enable_dpi_awareness() {
        log!("DPI awareness not enabled: {}", e);
    }

    let settings = Settings::load();
    let _classes = WindowClasses::register()?;
    let main_window = MainWindow::create()?;
    let renderer = Renderer::new()?;

    let mut host = Win32Host::new(renderer, main_window.id(), settings.transparency);
    let mut switcher = Switcher::new();
    let hook = KeyboardHook::install(move |input| switcher.handle_key(input, &mut host))?;

    log!("TabWind running");
    run_message_loop();
    log!("Message loop ended, shutting down");

    drop(hook);
    drop(main_window);
    Ok(())
}

/// Tell the user why TabWind could not start
pub fn report_error(error: &AppError) {
    let text = HSTRING::from(error.to_string());
    let icon = match error {
        AppError::AlreadyRunning => MB_ICONINFORMATION,
        _ => MB_ICONERROR,
    };
    unsafe {
        MessageBoxW(None, &text, w!("TabWind"), MB_OK | icon);
    }
}
