//! Direct2D rendering of the switcher overlay
//!
//! Every frame is drawn in full into a DIB section through a DC render
//! target and pushed to the layered window with `UpdateLayeredWindow`.

use std::collections::HashMap;

use windows::core::{w, Error};
use windows::Win32::Foundation::{COLORREF, POINT, RECT, SIZE};
use windows::Win32::Graphics::Direct2D::Common::*;
use windows::Win32::Graphics::Direct2D::*;
use windows::Win32::Graphics::DirectWrite::*;
use windows::Win32::Graphics::Dxgi::Common::DXGI_FORMAT_B8G8R8A8_UNORM;
use windows::Win32::Graphics::Gdi::{AC_SRC_ALPHA, AC_SRC_OVER, BLENDFUNCTION};
use windows::Win32::UI::WindowsAndMessaging::{UpdateLayeredWindow, ULW_ALPHA};

use super::gdi::{DibSection, MemoryDc, ScreenDc};
use super::window::OverlayWindow;
use crate::domain::entities::SwitcherSession;
use crate::domain::errors::AppError;
use crate::domain::services::overlay_layout::{self as layout, ItemLayout};
use crate::domain::value_objects::{Color, IconBitmap, Rect};

/// A cached brush key
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct BrushKey([u8; 4]);

impl From<Color> for BrushKey {
    fn from(c: Color) -> Self {
        Self(c.to_argb8())
    }
}

fn d2d_rect(r: Rect) -> D2D_RECT_F {
    D2D_RECT_F {
        left: r.left,
        top: r.top,
        right: r.right,
        bottom: r.bottom,
    }
}

fn d2d_color(c: Color) -> D2D1_COLOR_F {
    D2D1_COLOR_F {
        r: c.r,
        g: c.g,
        b: c.b,
        a: c.a,
    }
}

/// Overlay renderer. The factory and the title format live for the whole
/// process; the render target is created lazily and dropped when the device
/// is lost.
pub struct Renderer {
    factory: ID2D1Factory,
    title_format: IDWriteTextFormat,
    render_target: Option<ID2D1DCRenderTarget>,
    brush_cache: HashMap<BrushKey, ID2D1SolidColorBrush>,
}

impl Renderer {
    pub fn new() -> Result<Self, AppError> {
        Self::create().map_err(|e| AppError::Renderer(e.to_string()))
    }

    fn create() -> Result<Self, Error> {
        log!("Renderer::new() starting");
        let factory: ID2D1Factory =
            unsafe { D2D1CreateFactory(D2D1_FACTORY_TYPE_SINGLE_THREADED, None)? };
        let dwrite_factory: IDWriteFactory =
            unsafe { DWriteCreateFactory(DWRITE_FACTORY_TYPE_SHARED)? };
        let title_format = create_title_format(&dwrite_factory)?;
        log!("Renderer::new() completed (render target created lazily)");

        Ok(Self {
            factory,
            title_format,
            render_target: None,
            brush_cache: HashMap::new(),
        })
    }

    fn ensure_render_target(&mut self) -> Result<ID2D1DCRenderTarget, Error> {
        if let Some(target) = &self.render_target {
            return Ok(target.clone());
        }

        let props = D2D1_RENDER_TARGET_PROPERTIES {
            r#type: D2D1_RENDER_TARGET_TYPE_DEFAULT,
            pixelFormat: D2D1_PIXEL_FORMAT {
                format: DXGI_FORMAT_B8G8R8A8_UNORM,
                alphaMode: D2D1_ALPHA_MODE_PREMULTIPLIED,
            },
            // Reset to the overlay's DPI on every frame
            dpiX: 96.0,
            dpiY: 96.0,
            usage: D2D1_RENDER_TARGET_USAGE_NONE,
            minLevel: D2D1_FEATURE_LEVEL_DEFAULT,
        };

        let target = unsafe { self.factory.CreateDCRenderTarget(&props)? };
        unsafe {
            target.SetTextAntialiasMode(D2D1_TEXT_ANTIALIAS_MODE_GRAYSCALE);
        }
        log!("DC render target created");
        self.brush_cache.clear();
        self.render_target = Some(target.clone());
        Ok(target)
    }

    fn discard_render_target(&mut self) {
        log!("Render target lost, will recreate on next frame");
        self.render_target = None;
        self.brush_cache.clear();
    }

    fn brush(&mut self, target: &ID2D1DCRenderTarget, color: Color) -> Result<ID2D1SolidColorBrush, Error> {
        let key = BrushKey::from(color);
        if let Some(brush) = self.brush_cache.get(&key) {
            return Ok(brush.clone());
        }
        let brush = unsafe { target.CreateSolidColorBrush(&d2d_color(color), None)? };
        self.brush_cache.insert(key, brush.clone());
        Ok(brush)
    }

    /// Draw the whole overlay for `session` and present it at `transparency`
    pub fn render(
        &mut self,
        overlay: &OverlayWindow,
        session: &SwitcherSession,
        transparency: u8,
    ) -> Result<(), Error> {
        let (width, height) = overlay.client_size();
        if width <= 0 || height <= 0 {
            return Ok(());
        }

        let screen = ScreenDc::acquire().ok_or_else(Error::from_win32)?;
        let memory = MemoryDc::new(Some(screen.hdc())).ok_or_else(Error::from_win32)?;
        let surface = DibSection::create(screen.hdc(), width, height)?;
        let _selected = memory.select(surface.bitmap());

        let target = self.ensure_render_target()?;
        let bounds = RECT {
            left: 0,
            top: 0,
            right: width,
            bottom: height,
        };
        // Layout is in DIPs; the target maps them onto the pixel surface
        let scale = layout::dpi_scale(overlay.dpi());
        let dpi = scale * layout::BASE_DPI as f32;
        unsafe {
            target.BindDC(memory.hdc(), &bounds)?;
            target.SetDpi(dpi, dpi);
        }
        let to_dips = |pixels: i32| (pixels as f32 / scale).round() as i32;

        unsafe { target.BeginDraw() };
        let drawn = self.draw_frame(&target, session, to_dips(width), to_dips(height));
        let ended = unsafe { target.EndDraw(None, None) };

        if let Err(e) = ended {
            if e.code() == D2DERR_RECREATE_TARGET {
                self.discard_render_target();
            }
            return Err(e);
        }
        drawn?;

        let bounds = overlay.bounds();
        let destination = POINT {
            x: bounds.x,
            y: bounds.y,
        };
        let size = SIZE {
            cx: width,
            cy: height,
        };
        let source = POINT { x: 0, y: 0 };
        let blend = BLENDFUNCTION {
            BlendOp: AC_SRC_OVER as u8,
            BlendFlags: 0,
            SourceConstantAlpha: transparency,
            AlphaFormat: AC_SRC_ALPHA as u8,
        };

        unsafe {
            UpdateLayeredWindow(
                overlay.hwnd(),
                screen.hdc(),
                Some(&destination),
                Some(&size),
                memory.hdc(),
                Some(&source),
                COLORREF(0),
                Some(&blend),
                ULW_ALPHA,
            )
        }
    }

    fn draw_frame(
        &mut self,
        target: &ID2D1DCRenderTarget,
        session: &SwitcherSession,
        width: i32,
        height: i32,
    ) -> Result<(), Error> {
        unsafe { target.Clear(Some(&d2d_color(Color::TRANSPARENT))) };

        let panel = D2D1_ROUNDED_RECT {
            rect: d2d_rect(layout::panel_rect(width, height)),
            radiusX: layout::PANEL_RADIUS,
            radiusY: layout::PANEL_RADIUS,
        };
        let panel_brush = self.brush(target, layout::PANEL_FILL)?;
        unsafe { target.FillRoundedRectangle(&panel, &panel_brush) };

        let candidates = session.candidates();
        let selected = session.selection().index();
        let items = layout::item_layouts(candidates.len(), width);

        for (index, (candidate, item)) in candidates.iter().zip(items.iter()).enumerate() {
            if index == selected {
                self.draw_highlight(target, item)?;
            }
            // A bad icon only costs that icon
            if let Err(e) = draw_icon(target, &candidate.icon, item.icon) {
                log!("draw_icon({}) failed: {}", candidate.id, e);
            }
            self.draw_title(target, &candidate.title, item.title)?;
        }
        Ok(())
    }

    fn draw_highlight(&mut self, target: &ID2D1DCRenderTarget, item: &ItemLayout) -> Result<(), Error> {
        let brush = self.brush(target, layout::SELECTION_FILL)?;
        let highlight = D2D1_ROUNDED_RECT {
            rect: d2d_rect(item.highlight),
            radiusX: layout::SELECTION_RADIUS,
            radiusY: layout::SELECTION_RADIUS,
        };
        unsafe { target.FillRoundedRectangle(&highlight, &brush) };
        Ok(())
    }

    fn draw_title(&mut self, target: &ID2D1DCRenderTarget, title: &str, rect: Rect) -> Result<(), Error> {
        let brush = self.brush(target, layout::TEXT_COLOR)?;
        let text: Vec<u16> = title.encode_utf16().collect();
        unsafe {
            target.DrawText(
                &text,
                &self.title_format,
                &d2d_rect(rect),
                &brush,
                D2D1_DRAW_TEXT_OPTIONS_CLIP,
                DWRITE_MEASURING_MODE_NATURAL,
            );
        }
        Ok(())
    }
}

fn create_title_format(factory: &IDWriteFactory) -> Result<IDWriteTextFormat, Error> {
    let family: Vec<u16> = layout::TITLE_FONT_FAMILY
        .encode_utf16()
        .chain(std::iter::once(0))
        .collect();

    unsafe {
        let format = factory.CreateTextFormat(
            windows::core::PCWSTR(family.as_ptr()),
            None,
            DWRITE_FONT_WEIGHT_REGULAR,
            DWRITE_FONT_STYLE_NORMAL,
            DWRITE_FONT_STRETCH_NORMAL,
            layout::TITLE_FONT_SIZE,
            w!("en-US"),
        )?;
        format.SetTextAlignment(DWRITE_TEXT_ALIGNMENT_CENTER)?;
        format.SetParagraphAlignment(DWRITE_PARAGRAPH_ALIGNMENT_NEAR)?;

        let trimming = DWRITE_TRIMMING {
            granularity: DWRITE_TRIMMING_GRANULARITY_CHARACTER,
            delimiter: 0,
            delimiterCount: 0,
        };
        let ellipsis = factory.CreateEllipsisTrimmingSign(&format)?;
        format.SetTrimming(&trimming, &ellipsis)?;
        Ok(format)
    }
}

fn draw_icon(target: &ID2D1DCRenderTarget, icon: &IconBitmap, rect: Rect) -> Result<(), Error> {
    if icon.width() == 0 || icon.height() == 0 {
        return Ok(());
    }
    let pixels = icon.to_premultiplied_bgra();
    let props = D2D1_BITMAP_PROPERTIES {
        pixelFormat: D2D1_PIXEL_FORMAT {
            format: DXGI_FORMAT_B8G8R8A8_UNORM,
            alphaMode: D2D1_ALPHA_MODE_PREMULTIPLIED,
        },
        dpiX: 96.0,
        dpiY: 96.0,
    };
    let size = D2D_SIZE_U {
        width: icon.width(),
        height: icon.height(),
    };

    unsafe {
        let bitmap = target.CreateBitmap(
            size,
            Some(pixels.as_ptr() as *const _),
            icon.width() * 4,
            &props,
        )?;
        target.DrawBitmap(
            &bitmap,
            Some(&d2d_rect(rect)),
            1.0,
            D2D1_BITMAP_INTERPOLATION_MODE_LINEAR,
            None,
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{CandidateList, CandidateWindow};
    use crate::domain::value_objects::{ScreenRect, SwitchMode, WindowId};
    use crate::platform::win32::window::WindowClasses;
    use windows::Win32::System::Threading::{
        GetCurrentProcess, GetGuiResources, GR_GDIOBJECTS, GR_USEROBJECTS,
    };

    fn gdi_objects() -> u32 {
        unsafe { GetGuiResources(GetCurrentProcess(), GR_GDIOBJECTS) }
    }

    fn session(n: isize) -> SwitcherSession {
        let opaque = IconBitmap::from_argb(16, 16, vec![0xFF33_6699; 256]).unwrap();
        let list: CandidateList = (1..=n)
            .map(|i| {
                let icon = if i % 2 == 0 { opaque.clone() } else { IconBitmap::placeholder() };
                CandidateWindow::new(WindowId(i), "A window with a fairly long title text", icon)
            })
            .collect();
        SwitcherSession::new(SwitchMode::AllWindows, list)
    }

    fn user_objects() -> u32 {
        unsafe { GetGuiResources(GetCurrentProcess(), GR_USEROBJECTS) }
    }

    fn open(dpi: u32) -> OverlayWindow {
        let monitor = ScreenRect::new(0, 0, 1920, 1080);
        OverlayWindow::create(layout::place_panel(5, monitor, dpi), dpi).unwrap()
    }

    #[test]
    #[ignore = "needs an interactive Windows desktop"]
    fn test_repeated_frames_do_not_leak_gdi_objects() {
        let _classes = WindowClasses::register().unwrap();
        let mut renderer = Renderer::new().unwrap();
        let mut session = session(5);
        let overlay = open(layout::BASE_DPI);

        // Warm up caches before sampling
        renderer.render(&overlay, &session, 220).unwrap();
        let before = gdi_objects();

        for _ in 0..200 {
            session.advance();
            renderer.render(&overlay, &session, 220).unwrap();
        }

        assert_eq!(gdi_objects(), before);
    }

    #[test]
    #[ignore = "needs an interactive Windows desktop"]
    fn test_overlay_open_close_cycles_do_not_leak() {
        let _classes = WindowClasses::register().unwrap();
        let mut renderer = Renderer::new().unwrap();
        let mut session = session(5);

        // Warm up with one full cycle
        {
            let overlay = open(layout::BASE_DPI);
            renderer.render(&overlay, &session, 220).unwrap();
        }
        let (gdi, user) = (gdi_objects(), user_objects());

        for i in 0..100 {
            let dpi = if i % 2 == 0 { 96 } else { 144 };
            let overlay = open(dpi);
            renderer.render(&overlay, &session, 220).unwrap();
            overlay.show();
            session.advance();
            renderer.render(&overlay, &session, 220).unwrap();
        }

        assert_eq!(gdi_objects(), gdi);
        assert_eq!(user_objects(), user);
    }
}
