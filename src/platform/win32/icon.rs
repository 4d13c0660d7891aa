//! Application icon resolution
//!
//! Reads the best grouped icon straight out of an executable's resources,
//! falls back to the window's own large icon, and converts whichever handle
//! it got into an `IconBitmap`.

use std::ffi::c_void;
use std::os::windows::ffi::OsStrExt;
use std::path::Path;

use windows::core::{PCWSTR, PWSTR};
use windows::Win32::Foundation::{BOOL, FALSE, FreeLibrary, HMODULE, LPARAM, TRUE, WPARAM};
use windows::Win32::Graphics::Gdi::{GetDIBits, GetObjectW, BITMAP, DIB_RGB_COLORS};
use windows::Win32::System::LibraryLoader::{
    EnumResourceNamesW, FindResourceW, LoadLibraryExW, LoadResource, LockResource,
    SizeofResource, LOAD_LIBRARY_AS_DATAFILE, LOAD_LIBRARY_AS_IMAGE_RESOURCE,
};
use windows::Win32::UI::WindowsAndMessaging::{
    CreateIconFromResourceEx, DestroyIcon, GetIconInfo, LookupIconIdFromDirectoryEx,
    SendMessageTimeoutW, HICON, ICONINFO, ICON_BIG, LR_DEFAULTCOLOR, RT_GROUP_ICON, RT_ICON,
    SMTO_ABORTIFHUNG, WM_GETICON,
};

use super::gdi::{dib_header, MemoryDc, OwnedBitmap};
use super::to_hwnd;
use crate::application::ports::IconPort;
use crate::domain::value_objects::{pack_mask, IconBitmap, WindowId};

/// Edge length the directory lookup aims for
const TARGET_ICON_SIZE: i32 = 256;

/// Resource format version expected by `CreateIconFromResourceEx`
const ICON_RESOURCE_VERSION: u32 = 0x0003_0000;

/// Upper bound on waiting for a window to answer `WM_GETICON`
const GETICON_TIMEOUT_MS: u32 = 50;

/// `IconPort` backed by the executable's resources and `WM_GETICON`
pub struct Win32IconResolver;

impl IconPort for Win32IconResolver {
    fn resolve(&self, image_path: Option<&Path>, fallback: WindowId) -> IconBitmap {
        let icon = image_path
            .and_then(load_executable_icon)
            .or_else(|| query_window_icon(fallback));

        match icon.as_ref().and_then(icon_to_bitmap) {
            Some(bitmap) => bitmap,
            None => {
                log!("Icon for {} unresolved, using placeholder", fallback);
                IconBitmap::placeholder()
            }
        }
    }
}

/// An icon handle, destroyed on drop only if this process created it
struct IconHandle {
    handle: HICON,
    owned: bool,
}

impl Drop for IconHandle {
    fn drop(&mut self) {
        if self.owned {
            unsafe {
                let _ = DestroyIcon(self.handle);
            }
        }
    }
}

/// A module mapped as a data file for resource access
struct DataModule(HMODULE);

impl DataModule {
    fn load(path: &Path) -> Option<Self> {
        let wide: Vec<u16> = path
            .as_os_str()
            .encode_wide()
            .chain(std::iter::once(0))
            .collect();
        let flags = LOAD_LIBRARY_AS_DATAFILE | LOAD_LIBRARY_AS_IMAGE_RESOURCE;
        match unsafe { LoadLibraryExW(PCWSTR(wide.as_ptr()), None, flags) } {
            Ok(module) => Some(Self(module)),
            Err(e) => {
                log!("LoadLibraryExW({}) failed: {}", path.display(), e);
                None
            }
        }
    }

    /// Raw bytes of a resource. Valid for as long as the module is loaded.
    fn resource(&self, name: PCWSTR, kind: PCWSTR) -> Option<&[u8]> {
        unsafe {
            let info = FindResourceW(self.0, name, kind).ok()?;
            let size = SizeofResource(self.0, info) as usize;
            let data = LoadResource(self.0, info).ok()?;
            let ptr = LockResource(data) as *const u8;
            if ptr.is_null() || size == 0 {
                return None;
            }
            Some(std::slice::from_raw_parts(ptr, size))
        }
    }
}

impl Drop for DataModule {
    fn drop(&mut self) {
        unsafe {
            let _ = FreeLibrary(self.0);
        }
    }
}

/// A resource name copied out of the enumeration callback
enum ResourceName {
    Id(u16),
    Text(Vec<u16>),
}

impl ResourceName {
    fn as_pcwstr(&self) -> PCWSTR {
        match self {
            ResourceName::Id(id) => PCWSTR(*id as usize as *const u16),
            ResourceName::Text(text) => PCWSTR(text.as_ptr()),
        }
    }
}

unsafe extern "system" fn first_name_proc(
    _module: HMODULE,
    _kind: PCWSTR,
    name: PWSTR,
    lparam: isize,
) -> BOOL {
    let slot = &mut *(lparam as *mut Option<ResourceName>);
    let raw = name.0 as usize;
    *slot = Some(if raw >> 16 == 0 {
        ResourceName::Id(raw as u16)
    } else {
        ResourceName::Text(name.as_wide().iter().copied().chain(std::iter::once(0)).collect())
    });
    // Stop after the first group
    FALSE
}

fn first_group_icon(module: &DataModule) -> Option<ResourceName> {
    let mut slot: Option<ResourceName> = None;
    unsafe {
        // Stopping early reports an error; the slot tells us what happened
        let _ = EnumResourceNamesW(
            module.0,
            RT_GROUP_ICON,
            Some(first_name_proc),
            &mut slot as *mut Option<ResourceName> as isize,
        );
    }
    slot
}

fn load_executable_icon(path: &Path) -> Option<IconHandle> {
    let module = DataModule::load(path)?;
    let group = first_group_icon(&module)?;
    let directory = module.resource(group.as_pcwstr(), RT_GROUP_ICON)?;

    let id = unsafe {
        LookupIconIdFromDirectoryEx(
            directory.as_ptr(),
            TRUE,
            TARGET_ICON_SIZE,
            TARGET_ICON_SIZE,
            LR_DEFAULTCOLOR,
        )
    };
    if id <= 0 {
        log!("No icon entry matched in {}", path.display());
        return None;
    }

    let bits = module.resource(PCWSTR(id as usize as *const u16), RT_ICON)?;
    let handle = unsafe {
        CreateIconFromResourceEx(bits, TRUE, ICON_RESOURCE_VERSION, 0, 0, LR_DEFAULTCOLOR).ok()?
    };
    Some(IconHandle {
        handle,
        owned: true,
    })
}

fn query_window_icon(window: WindowId) -> Option<IconHandle> {
    let mut result = 0usize;
    let sent = unsafe {
        SendMessageTimeoutW(
            to_hwnd(window),
            WM_GETICON,
            WPARAM(ICON_BIG as usize),
            LPARAM(0),
            SMTO_ABORTIFHUNG,
            GETICON_TIMEOUT_MS,
            Some(&mut result),
        )
    };
    if sent.0 == 0 || result == 0 {
        return None;
    }
    // Belongs to the target window
    Some(IconHandle {
        handle: HICON(result as *mut c_void),
        owned: false,
    })
}

fn bitmap_size(bitmap: &OwnedBitmap) -> Option<(u32, u32)> {
    let mut info = BITMAP::default();
    let written = unsafe {
        GetObjectW(
            bitmap.handle(),
            std::mem::size_of::<BITMAP>() as i32,
            Some(&mut info as *mut BITMAP as *mut c_void),
        )
    };
    if written == 0 || info.bmWidth <= 0 || info.bmHeight <= 0 {
        return None;
    }
    Some((info.bmWidth as u32, info.bmHeight as u32))
}

/// Read a bitmap as top-down 32-bpp pixels (`0xAARRGGBB`)
fn read_pixels(dc: &MemoryDc, bitmap: &OwnedBitmap, width: u32, height: u32) -> Option<Vec<u32>> {
    let mut bmi = dib_header(width as i32, height as i32);
    let mut pixels = vec![0u32; (width as usize) * (height as usize)];
    let lines = unsafe {
        GetDIBits(
            dc.hdc(),
            bitmap.handle(),
            0,
            height,
            Some(pixels.as_mut_ptr() as *mut c_void),
            &mut bmi,
            DIB_RGB_COLORS,
        )
    };
    if lines == 0 {
        None
    } else {
        Some(pixels)
    }
}

fn icon_to_bitmap(icon: &IconHandle) -> Option<IconBitmap> {
    let mut info = ICONINFO::default();
    unsafe { GetIconInfo(icon.handle, &mut info).ok()? };
    let color = OwnedBitmap::from_raw(info.hbmColor);
    let mask = OwnedBitmap::from_raw(info.hbmMask);
    let dc = MemoryDc::new(None)?;

    match color {
        Some(color) => {
            let (width, height) = bitmap_size(&color)?;
            let pixels = read_pixels(&dc, &color, width, height)?;
            let mut bitmap = IconBitmap::from_argb(width, height, pixels)?;
            if !bitmap.has_alpha() {
                let packed = mask
                    .as_ref()
                    .and_then(|m| read_pixels(&dc, m, width, height))
                    .map(|p| pack_mask(&p, width as usize));
                let repaired = bitmap
                    .repair_alpha(packed.as_ref().map(|(bits, stride)| (bits.as_slice(), *stride)));
                if !repaired {
                    log!("Icon mask unreadable, leaving legacy icon transparent");
                }
            }
            Some(bitmap)
        }
        None => {
            // Monochrome: the mask holds the AND plane above the XOR plane
            let mask = mask?;
            let (width, double_height) = bitmap_size(&mask)?;
            let height = double_height / 2;
            let planes = read_pixels(&dc, &mask, width, double_height)?;
            let split = (width as usize) * (height as usize);
            let xor: Vec<u32> = planes[split..split * 2]
                .iter()
                .map(|p| p & 0x00FF_FFFF)
                .collect();
            let (and_bits, stride) = pack_mask(&planes[..split], width as usize);
            let mut bitmap = IconBitmap::from_argb(width, height, xor)?;
            bitmap.apply_mask(&and_bits, stride);
            Some(bitmap)
        }
    }
}
