//! Scoped GDI handles
//!
//! Every handle created while building a frame or decoding an icon is wrapped
//! here so it is released on every exit path.

use std::ffi::c_void;

use windows::core::Error;
use windows::Win32::Graphics::Gdi::{
    CreateCompatibleDC, CreateDIBSection, DeleteDC, DeleteObject, GetDC, ReleaseDC, SelectObject,
    BITMAPINFO, BITMAPINFOHEADER, BI_RGB, DIB_RGB_COLORS, HBITMAP, HDC, HGDIOBJ,
};

/// Screen device context from `GetDC(NULL)`
pub struct ScreenDc(HDC);

impl ScreenDc {
    pub fn acquire() -> Option<Self> {
        let hdc = unsafe { GetDC(None) };
        if hdc.is_invalid() {
            log!("GetDC(NULL) failed");
            None
        } else {
            Some(Self(hdc))
        }
    }

    pub fn hdc(&self) -> HDC {
        self.0
    }
}

impl Drop for ScreenDc {
    fn drop(&mut self) {
        unsafe {
            ReleaseDC(None, self.0);
        }
    }
}

/// Memory device context from `CreateCompatibleDC`
pub struct MemoryDc(HDC);

impl MemoryDc {
    /// Create a memory DC compatible with `reference`, or with the screen
    /// when `reference` is `None`
    pub fn new(reference: Option<HDC>) -> Option<Self> {
        let hdc = unsafe {
            match reference {
                Some(hdc) => CreateCompatibleDC(hdc),
                None => CreateCompatibleDC(None),
            }
        };
        if hdc.is_invalid() {
            log!("CreateCompatibleDC failed");
            None
        } else {
            Some(Self(hdc))
        }
    }

    pub fn hdc(&self) -> HDC {
        self.0
    }

    /// Select a bitmap until the returned guard is dropped
    pub fn select<'a>(&'a self, bitmap: &'a OwnedBitmap) -> Selection<'a> {
        let previous = unsafe { SelectObject(self.0, bitmap.handle()) };
        Selection { dc: self, previous }
    }
}

impl Drop for MemoryDc {
    fn drop(&mut self) {
        unsafe {
            let _ = DeleteDC(self.0);
        }
    }
}

/// Restores the previously selected object on drop
pub struct Selection<'a> {
    dc: &'a MemoryDc,
    previous: HGDIOBJ,
}

impl Drop for Selection<'_> {
    fn drop(&mut self) {
        if !self.previous.is_invalid() {
            unsafe {
                SelectObject(self.dc.0, self.previous);
            }
        }
    }
}

/// A bitmap this process owns and must delete
pub struct OwnedBitmap(HBITMAP);

impl OwnedBitmap {
    /// Take ownership of a raw bitmap. Null handles yield `None`.
    pub fn from_raw(handle: HBITMAP) -> Option<Self> {
        if handle.is_invalid() {
            None
        } else {
            Some(Self(handle))
        }
    }

    pub fn handle(&self) -> HBITMAP {
        self.0
    }
}

impl Drop for OwnedBitmap {
    fn drop(&mut self) {
        unsafe {
            let _ = DeleteObject(self.0);
        }
    }
}

/// Header for a top-down 32-bpp BI_RGB bitmap
pub fn dib_header(width: i32, height: i32) -> BITMAPINFO {
    BITMAPINFO {
        bmiHeader: BITMAPINFOHEADER {
            biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
            biWidth: width,
            biHeight: -height,
            biPlanes: 1,
            biBitCount: 32,
            biCompression: BI_RGB.0,
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Top-down 32-bpp DIB section, zero-initialised by the system
pub struct DibSection {
    bitmap: OwnedBitmap,
}

impl DibSection {
    pub fn create(hdc: HDC, width: i32, height: i32) -> Result<Self, Error> {
        let bmi = dib_header(width, height);
        let mut bits: *mut c_void = std::ptr::null_mut();
        let handle = unsafe { CreateDIBSection(hdc, &bmi, DIB_RGB_COLORS, &mut bits, None, 0)? };
        let bitmap = OwnedBitmap::from_raw(handle).ok_or_else(Error::from_win32)?;
        if bits.is_null() {
            return Err(Error::from_win32());
        }
        Ok(Self { bitmap })
    }

    pub fn bitmap(&self) -> &OwnedBitmap {
        &self.bitmap
    }
}
