// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Image file loading.
//!
//! This module probes image dimensions for the session and decodes
//! images into RGBA pixels suitable for display in egui.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while reading an image.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("failed to load image {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("image {} has no pixels", .path.display())]
    Empty { path: PathBuf },
}

/// Anything that can report the pixel size of an image file.
pub trait ImageSource {
    fn dimensions(&self, path: &Path) -> Result<(u32, u32), MediaError>;
}

/// Reads image headers from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskImages;

impl ImageSource for DiskImages {
    fn dimensions(&self, path: &Path) -> Result<(u32, u32), MediaError> {
        let (width, height) = image::image_dimensions(path).map_err(|source| MediaError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        check_size(path, width, height)
    }
}

/// A decoded image ready to become a texture.
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    /// RGBA8, row-major.
    pub pixels: Vec<u8>,
}

/// Decode an image file into RGBA pixels.
pub fn load_image(path: &Path) -> Result<LoadedImage, MediaError> {
    let decoded = image::open(path).map_err(|source| MediaError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let rgba = decoded.to_rgba8();
    let (width, height) = check_size(path, rgba.width(), rgba.height())?;

    Ok(LoadedImage {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}

fn check_size(path: &Path, width: u32, height: u32) -> Result<(u32, u32), MediaError> {
    if width == 0 || height == 0 {
        return Err(MediaError::Empty {
            path: path.to_path_buf(),
        });
    }
    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_dimensions_and_pixels_from_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tiny.png");
        image::RgbaImage::new(7, 3).save(&path).unwrap();

        assert_eq!(DiskImages.dimensions(&path).unwrap(), (7, 3));
        let loaded = load_image(&path).unwrap();
        assert_eq!((loaded.width, loaded.height), (7, 3));
        assert_eq!(loaded.pixels.len(), 7 * 3 * 4);
    }

    #[test]
    fn test_missing_image_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            DiskImages.dimensions(&dir.path().join("nope.png")),
            Err(MediaError::Decode { .. })
        ));
    }
}
