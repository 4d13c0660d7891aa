//! IconBitmap value object - a decoded application icon
//!
//! Pixels are straight (not premultiplied) ARGB, one `u32` per pixel laid out
//! as `0xAARRGGBB`, rows top-down. On little-endian hosts this is the same
//! byte order as a 32-bpp BGRA DIB.

/// Edge length of the transparent placeholder icon
pub const PLACEHOLDER_SIZE: u32 = 32;

const ALPHA_MASK: u32 = 0xFF00_0000;

/// A fixed-format bitmap owned by one candidate window
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IconBitmap {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl IconBitmap {
    /// Create a bitmap from ARGB pixels. Returns `None` if the pixel count
    /// does not match the dimensions.
    pub fn from_argb(width: u32, height: u32, pixels: Vec<u32>) -> Option<Self> {
        if pixels.len() != (width as usize) * (height as usize) {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    /// Fully transparent 32x32 bitmap used when no icon could be resolved
    pub fn placeholder() -> Self {
        let len = (PLACEHOLDER_SIZE * PLACEHOLDER_SIZE) as usize;
        Self {
            width: PLACEHOLDER_SIZE,
            height: PLACEHOLDER_SIZE,
            pixels: vec![0; len],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Whether any pixel carries a non-zero alpha byte
    pub fn has_alpha(&self) -> bool {
        self.pixels.iter().any(|p| p & ALPHA_MASK != 0)
    }

    /// Synthesize alpha from a 1-bpp AND mask.
    ///
    /// `mask` holds `height` rows of `stride` bytes, most significant bit
    /// first. A set bit makes the pixel transparent, a clear bit makes it
    /// fully opaque. Colour channels are left untouched. Rows missing from a
    /// short mask count as opaque.
    pub fn apply_mask(&mut self, mask: &[u8], stride: usize) {
        let width = self.width as usize;
        for (y, row) in self.pixels.chunks_exact_mut(width.max(1)).enumerate() {
            for (x, pixel) in row.iter_mut().enumerate() {
                let byte = mask.get(y * stride + x / 8).copied().unwrap_or(0);
                if (byte >> (7 - (x % 8))) & 1 == 1 {
                    *pixel &= !ALPHA_MASK;
                } else {
                    *pixel |= ALPHA_MASK;
                }
            }
        }
    }

    /// Repair legacy icons that carry no alpha channel.
    ///
    /// Without a mask the pixels are left as they are, so an unreadable
    /// legacy icon stays fully transparent. Returns true when the mask was
    /// applied.
    pub fn repair_alpha(&mut self, mask: Option<(&[u8], usize)>) -> bool {
        if self.has_alpha() {
            return false;
        }
        match mask {
            Some((bits, stride)) => {
                self.apply_mask(bits, stride);
                true
            }
            None => false,
        }
    }

    /// Premultiplied BGRA bytes, the layout Direct2D expects for
    /// `DXGI_FORMAT_B8G8R8A8_UNORM` with premultiplied alpha.
    pub fn to_premultiplied_bgra(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 4);
        for &p in &self.pixels {
            let a = (p >> 24) & 0xFF;
            let r = (p >> 16) & 0xFF;
            let g = (p >> 8) & 0xFF;
            let b = p & 0xFF;
            out.push(premultiply(b, a));
            out.push(premultiply(g, a));
            out.push(premultiply(r, a));
            out.push(a as u8);
        }
        out
    }
}

/// Pack a monochrome mask read back as 32-bpp pixels into 1-bpp rows.
///
/// Any non-black pixel becomes a set bit. Returns the bits and the row
/// stride in bytes.
pub fn pack_mask(pixels: &[u32], width: usize) -> (Vec<u8>, usize) {
    let stride = width.div_ceil(8);
    if width == 0 {
        return (Vec::new(), 0);
    }
    let rows = pixels.len() / width;
    let mut bits = vec![0u8; stride * rows];
    for (y, row) in pixels.chunks_exact(width).enumerate() {
        for (x, &p) in row.iter().enumerate() {
            if p & 0x00FF_FFFF != 0 {
                bits[y * stride + x / 8] |= 0x80 >> (x % 8);
            }
        }
    }
    (bits, stride)
}

fn premultiply(channel: u32, alpha: u32) -> u8 {
    ((channel * alpha + 127) / 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, argb: u32) -> IconBitmap {
        IconBitmap::from_argb(width, height, vec![argb; (width * height) as usize]).unwrap()
    }

    #[test]
    fn test_placeholder_is_transparent_32px() {
        let icon = IconBitmap::placeholder();
        assert_eq!(icon.width(), 32);
        assert_eq!(icon.height(), 32);
        assert!(!icon.has_alpha());
        assert!(icon.pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn test_from_argb_rejects_wrong_length() {
        assert!(IconBitmap::from_argb(2, 2, vec![0; 3]).is_none());
        assert!(IconBitmap::from_argb(2, 2, vec![0; 4]).is_some());
    }

    #[test]
    fn test_mask_sets_alpha_and_preserves_colour() {
        // 32 px wide: one 4-byte row per scanline, no padding surprises
        let mut icon = solid(32, 2, 0x00_12_34_56);
        let mut mask = vec![0u8; 8];
        mask[0] = 0b1000_0001; // pixels 0 and 7 of row 0 transparent
        mask[7] = 0b0000_0001; // pixel 31 of row 1 transparent

        assert!(icon.repair_alpha(Some((&mask, 4))));

        let px = icon.pixels();
        assert_eq!(px[0], 0x00_12_34_56);
        assert_eq!(px[7], 0x00_12_34_56);
        assert_eq!(px[1], 0xFF_12_34_56);
        assert_eq!(px[32 + 31], 0x00_12_34_56);
        assert_eq!(px[32 + 30], 0xFF_12_34_56);
        assert!(px.iter().all(|p| p & 0x00FF_FFFF == 0x12_34_56));
    }

    #[test]
    fn test_mask_respects_row_stride() {
        // 16 px wide with 4-byte padded rows (DIB alignment)
        let mut icon = solid(16, 2, 0x00_FF_FF_FF);
        let mask = [0x00, 0x00, 0xFF, 0xFF, 0x80, 0x00, 0x00, 0x00];
        icon.apply_mask(&mask, 4);

        let px = icon.pixels();
        assert!(px[..16].iter().all(|p| p >> 24 == 0xFF));
        assert_eq!(px[16] >> 24, 0x00);
        assert!(px[17..].iter().all(|p| p >> 24 == 0xFF));
    }

    #[test]
    fn test_existing_alpha_is_kept() {
        let mut icon = solid(8, 1, 0x80_00_00_00);
        let mask = [0xFFu8; 4];
        assert!(!icon.repair_alpha(Some((&mask, 4))));
        assert!(icon.pixels().iter().all(|&p| p == 0x80_00_00_00));
    }

    #[test]
    fn test_missing_mask_leaves_icon_transparent() {
        let mut icon = solid(8, 2, 0x00_12_34_56);
        assert!(!icon.repair_alpha(None));
        assert!(icon.pixels().iter().all(|&p| p == 0x00_12_34_56));
    }

    #[test]
    fn test_short_mask_counts_as_opaque() {
        let mut icon = solid(8, 2, 0);
        icon.apply_mask(&[0xFF], 4);
        assert!(icon.pixels()[..8].iter().all(|p| p >> 24 == 0));
        assert!(icon.pixels()[8..].iter().all(|p| p >> 24 == 0xFF));
    }

    #[test]
    fn test_premultiplied_bgra() {
        let icon = IconBitmap::from_argb(2, 1, vec![0xFF_10_20_30, 0x80_FF_00_FF]).unwrap();
        let bytes = icon.to_premultiplied_bgra();
        assert_eq!(&bytes[..4], &[0x30, 0x20, 0x10, 0xFF]);
        assert_eq!(&bytes[4..], &[0x80, 0x00, 0x80, 0x80]);
    }

    #[test]
    fn test_pack_mask_round_trips_through_apply() {
        // 10 px wide so each row spans two mask bytes
        let width = 10;
        let mut mask_pixels = vec![0u32; width * 2];
        mask_pixels[0] = 0x00FF_FFFF;
        mask_pixels[9] = 0x00FF_FFFF;
        mask_pixels[width + 3] = 0x00FF_FFFF;

        let (bits, stride) = pack_mask(&mask_pixels, width);
        assert_eq!(stride, 2);
        assert_eq!(bits, vec![0x80, 0x40, 0x10, 0x00]);

        let mut icon = solid(width as u32, 2, 0x0011_2233);
        icon.apply_mask(&bits, stride);
        let alpha: Vec<u32> = icon.pixels().iter().map(|p| p >> 24).collect();
        assert_eq!(alpha[0], 0);
        assert_eq!(alpha[1], 0xFF);
        assert_eq!(alpha[9], 0);
        assert_eq!(alpha[width + 3], 0);
        assert_eq!(alpha[width + 4], 0xFF);
    }
}
