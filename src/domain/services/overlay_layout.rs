//! Overlay geometry
//!
//! Pure layout for the switcher panel: how big it is, where it sits on the
//! monitor, and where each item's icon, title and highlight go. The renderer
//! only draws what this module computes.
//!
//! Sizes are in DIPs (1/96 inch). Only `place_panel` deals in physical
//! pixels, scaling by the monitor's DPI.

use crate::domain::value_objects::{Color, Rect, ScreenRect};

/// Edge length of each drawn icon
pub const ICON_SIZE: i32 = 64;
/// Outer padding and gap between items
pub const PADDING: i32 = 20;
/// Height of the title band under each icon
pub const TITLE_HEIGHT: i32 = 40;
/// Width of one item's content (icon column and title)
pub const ITEM_CONTENT_WIDTH: i32 = 128;
/// Horizontal advance from one item to the next
pub const CELL_WIDTH: i32 = ITEM_CONTENT_WIDTH + PADDING;
/// Corner radius of the panel
pub const PANEL_RADIUS: f32 = 12.0;
/// Distance the highlight extends past the item content
pub const SELECTION_INSET: f32 = 4.0;
/// Corner radius of the highlight
pub const SELECTION_RADIUS: f32 = 6.0;
/// Largest share of the monitor width the panel may take
pub const MAX_WIDTH_FRACTION: f64 = 0.9;
/// DPI at which one DIP is one pixel
pub const BASE_DPI: u32 = 96;

/// Panel background
pub const PANEL_FILL: Color = Color {
    r: 40.0 / 255.0,
    g: 40.0 / 255.0,
    b: 45.0 / 255.0,
    a: 220.0 / 255.0,
};

/// Highlight behind the selected item
pub const SELECTION_FILL: Color = Color {
    r: 120.0 / 255.0,
    g: 120.0 / 255.0,
    b: 140.0 / 255.0,
    a: 80.0 / 255.0,
};

/// Title text
pub const TEXT_COLOR: Color = Color::WHITE;

/// Title font
pub const TITLE_FONT_FAMILY: &str = "Segoe UI";
/// 10pt expressed in DIPs
pub const TITLE_FONT_SIZE: f32 = 10.0 * 96.0 / 72.0;

/// Width of all items side by side, without outer padding
pub fn content_width(count: usize) -> i32 {
    if count == 0 {
        return 0;
    }
    CELL_WIDTH * count as i32 - PADDING
}

/// Natural panel size for `count` items
pub fn panel_size(count: usize) -> (i32, i32) {
    let width = content_width(count) + 2 * PADDING;
    let height = ICON_SIZE + TITLE_HEIGHT + 2 * PADDING;
    (width, height)
}

/// Pixels per DIP at `dpi`. A zero DPI counts as the base DPI.
pub fn dpi_scale(dpi: u32) -> f32 {
    if dpi == 0 {
        return 1.0;
    }
    dpi as f32 / BASE_DPI as f32
}

/// Place the panel centred on `monitor`, at most 90% of its width.
///
/// `monitor` and the result are in pixels; the panel is scaled by `dpi`.
/// Only the window is narrowed; item layout is not shrunk, so a very long
/// list overflows and is clipped at the panel edges.
pub fn place_panel(count: usize, monitor: ScreenRect, dpi: u32) -> ScreenRect {
    let scale = dpi_scale(dpi);
    let (width, height) = panel_size(count);
    let mut width = (width as f32 * scale).round() as i32;
    let height = (height as f32 * scale).round() as i32;
    let cap = (monitor.width as f64 * MAX_WIDTH_FRACTION) as i32;
    if width > cap {
        width = cap;
    }

    ScreenRect::new(
        monitor.x + (monitor.width - width) / 2,
        monitor.y + (monitor.height - height) / 2,
        width,
        height,
    )
}

/// Rounded panel bounds for a client area
pub fn panel_rect(client_width: i32, client_height: i32) -> Rect {
    Rect::from_pos_size(0.0, 0.0, client_width as f32, client_height as f32)
}

/// Where one item is drawn
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ItemLayout {
    /// Content area: icon column plus title band
    pub cell: Rect,
    /// Square icon, centred horizontally in the cell
    pub icon: Rect,
    /// Title band under the icon
    pub title: Rect,
    /// Highlight drawn under a selected item
    pub highlight: Rect,
}

/// Layout of `count` items centred in a client area `client_width` wide
pub fn item_layouts(count: usize, client_width: i32) -> Vec<ItemLayout> {
    let start_x = (client_width - content_width(count)) / 2;
    let y = PADDING as f32;

    (0..count)
        .map(|i| {
            let x = (start_x + i as i32 * CELL_WIDTH) as f32;
            let cell = Rect::from_pos_size(
                x,
                y,
                ITEM_CONTENT_WIDTH as f32,
                (ICON_SIZE + TITLE_HEIGHT) as f32,
            );
            let icon_x = x + ((ITEM_CONTENT_WIDTH - ICON_SIZE) / 2) as f32;
            ItemLayout {
                cell,
                icon: Rect::from_pos_size(icon_x, y, ICON_SIZE as f32, ICON_SIZE as f32),
                title: Rect::from_pos_size(
                    x,
                    y + ICON_SIZE as f32,
                    ITEM_CONTENT_WIDTH as f32,
                    TITLE_HEIGHT as f32,
                ),
                highlight: cell.expand_uniform(SELECTION_INSET),
            }
        })
        .collect()
}
