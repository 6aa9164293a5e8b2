// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Per-image label file persistence.
//!
//! Each image gets a `.txt` file next to it with one line per box:
//! `0 <cx> <cy> <w> <h>`, every value normalized to the image size and
//! printed with five decimals. The class label is always `0`.

use super::{LoadResult, PersistError, PersistenceStrategy};
use crate::models::{
    annotation::{BoxRect, NormalizedBox},
    store::ImageEntry,
};
use crate::util::geometry::{from_normalized, to_normalized};
use std::path::{Path, PathBuf};

/// Class label written for every box.
pub const CLASS_LABEL: u32 = 0;

/// Writes one label file per image.
#[derive(Debug, Default)]
pub struct SidecarStore {
    read_only: bool,
}

impl SidecarStore {
    pub fn new(read_only: bool) -> Self {
        Self { read_only }
    }
}

/// Label file path for an image: same stem, `.txt` extension.
pub fn sidecar_path(image_path: &Path) -> PathBuf {
    image_path.with_extension("txt")
}

/// Render boxes as label file content.
pub fn format_labels(boxes: &[BoxRect], width: u32, height: u32) -> String {
    boxes
        .iter()
        .map(|rect| {
            let norm = to_normalized(rect, width, height);
            format!(
                "{} {:.5} {:.5} {:.5} {:.5}\n",
                CLASS_LABEL, norm.cx, norm.cy, norm.w, norm.h
            )
        })
        .collect()
}

/// Parse label file content into pixel boxes.
pub fn parse_labels(content: &str, width: u32, height: u32) -> Result<Vec<BoxRect>, String> {
    let mut boxes = Vec::new();
    for (lineno, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        let [class, cx, cy, w, h] = fields.as_slice() else {
            return Err(format!(
                "line {}: expected 5 fields, found {}",
                lineno + 1,
                fields.len()
            ));
        };
        class
            .parse::<u32>()
            .map_err(|e| format!("line {}: bad class label {:?}: {}", lineno + 1, class, e))?;

        let value = |field: &str| {
            field
                .parse::<f64>()
                .map_err(|e| format!("line {}: bad value {:?}: {}", lineno + 1, field, e))
        };
        let norm = NormalizedBox {
            cx: value(*cx)?,
            cy: value(*cy)?,
            w: value(*w)?,
            h: value(*h)?,
        };
        boxes.push(from_normalized(&norm, width, height));
    }
    Ok(boxes)
}

impl PersistenceStrategy for SidecarStore {
    fn load(&mut self, entries: &[ImageEntry]) -> Result<Vec<LoadResult>, PersistError> {
        let results = entries
            .iter()
            .map(|entry| {
                let path = sidecar_path(&entry.path);
                let content = match std::fs::read_to_string(&path) {
                    Ok(content) => content,
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => return LoadResult::Empty,
                    Err(e) => return LoadResult::Corrupt(e.to_string()),
                };
                match parse_labels(&content, entry.width, entry.height) {
                    Ok(boxes) if boxes.is_empty() => LoadResult::Empty,
                    Ok(boxes) => LoadResult::Populated(boxes),
                    Err(reason) => LoadResult::Corrupt(reason),
                }
            })
            .collect();
        Ok(results)
    }

    fn save(&mut self, entries: &[ImageEntry], active: usize) -> Result<(), PersistError> {
        if self.read_only {
            return Ok(());
        }
        let Some(entry) = entries.get(active) else {
            return Ok(());
        };

        let path = sidecar_path(&entry.path);
        let content = format_labels(&entry.boxes, entry.width, entry.height);
        std::fs::write(&path, content).map_err(|source| PersistError::Write {
            path: path.clone(),
            source,
        })?;

        log::debug!("Saved {} boxes to {}", entry.boxes.len(), path.display());
        Ok(())
    }

    fn is_read_only(&self) -> bool {
        self.read_only
    }

    fn describe(&self) -> String {
        if self.read_only {
            "label files (read-only)".to_string()
        } else {
            "label files".to_string()
        }
    }
}
