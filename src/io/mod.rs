// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations for images and box persistence.
//!
//! Boxes are written through to disk after every store mutation by one of
//! two interchangeable [`PersistenceStrategy`] implementations.

pub mod media;
pub mod shared_map;
pub mod sidecar;

use crate::models::{annotation::BoxRect, store::ImageEntry};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading or writing persisted boxes.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed box map {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to encode box map: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Outcome of loading the persisted boxes of one image.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadResult {
    /// Nothing stored for this image.
    Empty,
    Populated(Vec<BoxRect>),
    /// Stored data exists but could not be parsed.
    Corrupt(String),
}

impl LoadResult {
    /// Boxes to start from; corrupt data starts empty.
    pub fn into_boxes(self) -> Vec<BoxRect> {
        match self {
            LoadResult::Populated(boxes) => boxes,
            LoadResult::Empty | LoadResult::Corrupt(_) => Vec::new(),
        }
    }
}

/// On-disk representation of every image's boxes.
pub trait PersistenceStrategy {
    /// Read stored boxes, one result per entry, in entry order.
    fn load(&mut self, entries: &[ImageEntry]) -> Result<Vec<LoadResult>, PersistError>;

    /// Write the current boxes. `active` is the image that just changed.
    fn save(&mut self, entries: &[ImageEntry], active: usize) -> Result<(), PersistError>;

    /// Whether saves are suppressed.
    fn is_read_only(&self) -> bool {
        false
    }

    /// Short human-readable description for logs and the status bar.
    fn describe(&self) -> String;
}
