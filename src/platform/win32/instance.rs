//! Single-instance guard

use windows::core::w;
use windows::Win32::Foundation::{CloseHandle, GetLastError, ERROR_ALREADY_EXISTS, HANDLE};
use windows::Win32::System::Threading::{CreateMutexW, ReleaseMutex};

use crate::domain::errors::AppError;

/// Holds the named instance mutex for the life of the process
pub struct InstanceGuard(HANDLE);

impl InstanceGuard {
    /// Claim the instance mutex. Fails with `AlreadyRunning` if another
    /// process already holds it.
    pub fn acquire() -> Result<Self, AppError> {
        let handle = unsafe { CreateMutexW(None, true, w!("TabWindSwitcher_InstanceMutex")) }
            .map_err(|e| AppError::InstanceLock(e.to_string()))?;

        if unsafe { GetLastError() } == ERROR_ALREADY_EXISTS {
            unsafe {
                let _ = CloseHandle(handle);
            }
            return Err(AppError::AlreadyRunning);
        }

        Ok(Self(handle))
    }
}

impl Drop for InstanceGuard {
    fn drop(&mut self) {
        unsafe {
            let _ = ReleaseMutex(self.0);
            let _ = CloseHandle(self.0);
        }
    }
}
