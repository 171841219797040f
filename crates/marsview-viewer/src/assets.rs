//! Texture loading with a flat-color fallback.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use marsview_scene::{Color, ImageData, TextureHandle};
use thiserror::Error;

/// Errors raised while turning a file into [`ImageData`].
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("{} decoded to an empty image", path.display())]
    EmptyImage { path: PathBuf },
}

/// Source of decoded texture pixels.
pub trait TextureLoader: Sync {
    fn load(&self, path: &Path) -> Result<ImageData, AssetError>;
}

/// Decodes PNG and JPEG files from disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageFileLoader;

impl TextureLoader for ImageFileLoader {
    fn load(&self, path: &Path) -> Result<ImageData, AssetError> {
        let bytes = std::fs::read(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let rgba = image::load_from_memory(&bytes)
            .map_err(|source| AssetError::Decode {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();

        let (width, height) = rgba.dimensions();
        ImageData::from_rgba8(path.display().to_string(), width, height, rgba.into_raw())
            .ok_or_else(|| AssetError::EmptyImage {
                path: path.to_path_buf(),
            })
    }
}

/// Load `path`, or substitute a 1×1 texel of `fallback` and log a warning.
pub fn load_or_fallback(loader: &dyn TextureLoader, path: &Path, fallback: Color) -> TextureHandle {
    match loader.load(path) {
        Ok(image) => {
            tracing::info!(
                path = %path.display(),
                width = image.width,
                height = image.height,
                "Loaded texture"
            );
            Arc::new(image)
        }
        Err(err) => {
            tracing::warn!(error = %err, "Texture unavailable, using flat fallback texel");
            Arc::new(ImageData::solid(
                format!("fallback:{}", path.display()),
                fallback,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(dir: &Path, name: &str, w: u32, h: u32) -> PathBuf {
        let path = dir.join(name);
        let img = image::RgbaImage::from_pixel(w, h, image::Rgba([10, 20, 30, 255]));
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn test_loads_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "tex.png", 4, 2);
        let img = ImageFileLoader.load(&path).unwrap();
        assert_eq!((img.width, img.height), (4, 2));
        assert_eq!(img.texel(3, 1), Some([10, 20, 30, 255]));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ImageFileLoader
            .load(&dir.path().join("nope.png"))
            .unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        let err = ImageFileLoader.load(&path).unwrap_err();
        assert!(matches!(err, AssetError::Decode { .. }));
    }

    #[test]
    fn test_missing_file_falls_back_to_given_color() {
        let dir = tempfile::tempdir().unwrap();
        let tex = load_or_fallback(
            &ImageFileLoader,
            &dir.path().join("mars-map.png"),
            Color::from_hex(0xffa500),
        );
        assert_eq!((tex.width, tex.height), (1, 1));
        assert_eq!(tex.texel(0, 0), Some([0xff, 0xa5, 0x00, 0xff]));
        assert!(tex.label.starts_with("fallback:"));
    }

    #[test]
    fn test_present_file_is_not_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "mars.png", 8, 8);
        let tex = load_or_fallback(&ImageFileLoader, &path, Color::BLACK);
        assert_eq!((tex.width, tex.height), (8, 8));
    }
}
