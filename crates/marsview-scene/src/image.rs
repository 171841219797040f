//! Decoded texture pixels shared between materials.

use std::sync::Arc;

use crate::Color;

/// Decoded RGBA8 pixels in sRGB encoding, row-major, top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    /// Where the pixels came from (file path or a synthetic name).
    pub label: String,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Shared, immutable texture contents. Cloning is a reference bump.
pub type TextureHandle = Arc<ImageData>;

impl ImageData {
    /// Wrap raw RGBA8 pixels. Returns `None` for zero-sized images or when
    /// the buffer length does not equal `width * height * 4`.
    pub fn from_rgba8(
        label: impl Into<String>,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    ) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return None;
        }
        Some(Self {
            label: label.into(),
            width,
            height,
            pixels,
        })
    }

    /// A 1×1 opaque texel of `color`, used when a texture file cannot be loaded.
    pub fn solid(label: impl Into<String>, color: Color) -> Self {
        let [r, g, b] = color.to_srgb8();
        Self {
            label: label.into(),
            width: 1,
            height: 1,
            pixels: vec![r, g, b, 255],
        }
    }

    /// RGBA value at `(x, y)`, or `None` outside the image.
    pub fn texel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.pixels.get(i..i + 4).map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// Bytes per row, as wgpu's `TexelCopyBufferLayout` expects.
    pub fn bytes_per_row(&self) -> u32 {
        self.width * 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_dimensions() {
        assert!(ImageData::from_rgba8("empty", 0, 4, Vec::new()).is_none());
        assert!(ImageData::from_rgba8("empty", 4, 0, Vec::new()).is_none());
    }

    #[test]
    fn test_rejects_short_buffer() {
        assert!(ImageData::from_rgba8("short", 2, 2, vec![0; 15]).is_none());
    }

    #[test]
    fn test_solid_is_single_opaque_texel() {
        let img = ImageData::solid("fallback", Color::from_hex(0xffa500));
        assert_eq!((img.width, img.height), (1, 1));
        assert_eq!(img.texel(0, 0), Some([0xff, 0xa5, 0x00, 0xff]));
        assert_eq!(img.texel(1, 0), None);
    }

    #[test]
    fn test_texel_indexing_is_row_major() {
        let pixels = (0u8..16).collect::<Vec<_>>();
        let img = ImageData::from_rgba8("grid", 2, 2, pixels).unwrap();
        assert_eq!(img.texel(1, 0), Some([4, 5, 6, 7]));
        assert_eq!(img.texel(0, 1), Some([8, 9, 10, 11]));
        assert_eq!(img.bytes_per_row(), 8);
    }
}
