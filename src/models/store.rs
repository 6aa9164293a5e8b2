// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Per-image box lists and the current selection.
//!
//! The store owns every box for every input image plus the single
//! selection into the active image's list. Mutators report whether they
//! changed anything so the session can write the change through to disk.

use super::annotation::BoxRect;
use std::path::{Path, PathBuf};

/// One input image and its boxes, in insertion (and drawing) order.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageEntry {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub boxes: Vec<BoxRect>,
}

impl ImageEntry {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            width: 0,
            height: 0,
            boxes: Vec::new(),
        }
    }

    /// File name used as the key in the shared JSON map.
    pub fn basename(&self) -> String {
        basename(&self.path)
    }
}

/// File name component of `path`, lossily converted to UTF-8.
pub fn basename(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// All boxes for all images, plus the selection on the active image.
#[derive(Debug, Clone, Default)]
pub struct BoxStore {
    entries: Vec<ImageEntry>,
    selection: Option<usize>,
}

impl BoxStore {
    pub fn new(entries: Vec<ImageEntry>) -> Self {
        Self {
            entries,
            selection: None,
        }
    }

    pub fn entries(&self) -> &[ImageEntry] {
        &self.entries
    }

    pub fn entry_mut(&mut self, active: usize) -> Option<&mut ImageEntry> {
        self.entries.get_mut(active)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Boxes of the given image, or an empty slice when out of range.
    pub fn boxes(&self, active: usize) -> &[BoxRect] {
        self.entries
            .get(active)
            .map(|entry| entry.boxes.as_slice())
            .unwrap_or(&[])
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Append a box to the active image and select it.
    pub fn append(&mut self, active: usize, rect: BoxRect) -> Option<usize> {
        let entry = self.entries.get_mut(active)?;
        entry.boxes.push(rect);
        let index = entry.boxes.len() - 1;
        self.selection = Some(index);
        Some(index)
    }

    /// Replace the box at `index`. Only the selected box can be replaced.
    pub fn replace(&mut self, active: usize, index: usize, rect: BoxRect) -> bool {
        if self.selection != Some(index) {
            log::debug!(
                "Ignoring replace of box {} with selection {:?}",
                index,
                self.selection
            );
            return false;
        }
        match self
            .entries
            .get_mut(active)
            .and_then(|entry| entry.boxes.get_mut(index))
        {
            Some(slot) => {
                *slot = rect;
                true
            }
            None => {
                log::debug!("Ignoring replace of out-of-range box {}", index);
                false
            }
        }
    }

    /// Delete the selected box and step the selection back by one.
    pub fn delete_selected(&mut self, active: usize) -> bool {
        let Some(index) = self.selection else {
            return false;
        };
        let Some(entry) = self.entries.get_mut(active) else {
            return false;
        };
        if index >= entry.boxes.len() {
            log::debug!("Ignoring delete of out-of-range box {}", index);
            self.selection = None;
            return false;
        }
        entry.boxes.remove(index);
        self.selection = index.checked_sub(1).filter(|_| !entry.boxes.is_empty());
        true
    }

    /// Select `index` on the active image.
    pub fn select(&mut self, active: usize, index: usize) -> bool {
        if index >= self.boxes(active).len() {
            log::debug!("Ignoring selection of out-of-range box {}", index);
            return false;
        }
        self.selection = Some(index);
        true
    }

    /// Advance the selection cyclically. Starts at the first box.
    pub fn select_next(&mut self, active: usize) -> bool {
        let count = self.boxes(active).len();
        if count == 0 {
            return false;
        }
        self.selection = Some(match self.selection {
            Some(index) => (index + 1) % count,
            None => 0,
        });
        true
    }

    /// Retreat the selection cyclically. Starts at the last box.
    pub fn select_previous(&mut self, active: usize) -> bool {
        let count = self.boxes(active).len();
        if count == 0 {
            return false;
        }
        self.selection = Some(match self.selection {
            Some(index) => (index + count - 1) % count,
            None => count - 1,
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(count: i32) -> BoxStore {
        let mut entry = ImageEntry::new(PathBuf::from("a.png"));
        entry.boxes = (0..count).map(|i| BoxRect::new(i, i, 5, 5)).collect();
        BoxStore::new(vec![entry, ImageEntry::new(PathBuf::from("b.png"))])
    }

    #[test]
    fn test_append_selects_new_box() {
        let mut store = store_with(2);
        assert_eq!(store.append(0, BoxRect::new(1, 2, 3, 4)), Some(2));
        assert_eq!(store.selection(), Some(2));
        assert_eq!(store.boxes(0)[2], BoxRect::new(1, 2, 3, 4));
        assert_eq!(store.append(7, BoxRect::default()), None);
    }

    #[test]
    fn test_replace_requires_selection_and_valid_index() {
        let mut store = store_with(2);
        assert!(!store.replace(0, 0, BoxRect::new(9, 9, 9, 9)));
        assert!(store.select(0, 1));
        assert!(!store.replace(0, 5, BoxRect::new(9, 9, 9, 9)));
        assert!(store.replace(0, 1, BoxRect::new(9, 9, 9, 9)));
        assert_eq!(store.boxes(0)[1], BoxRect::new(9, 9, 9, 9));
    }

    #[test]
    fn test_replace_rejects_unselected_box() {
        let mut store = store_with(3);
        assert!(store.select(0, 1));
        assert!(store.delete_selected(0));
        assert_eq!(store.selection(), Some(0));

        // Index 1 now names what used to be box 2.
        assert!(!store.replace(0, 1, BoxRect::new(9, 9, 9, 9)));
        assert_eq!(store.boxes(0)[1], BoxRect::new(2, 2, 5, 5));
    }

    #[test]
    fn test_delete_steps_selection_back() {
        for n in 2..6 {
            for i in 0..n {
                let mut store = store_with(n as i32);
                store.select(0, i);
                assert!(store.delete_selected(0));
                assert_eq!(store.boxes(0).len(), n - 1);
                assert_eq!(store.selection(), i.checked_sub(1));
            }
        }
    }

    #[test]
    fn test_delete_last_box_clears_selection() {
        let mut store = store_with(1);
        store.select(0, 0);
        assert!(store.delete_selected(0));
        assert!(store.boxes(0).is_empty());
        assert_eq!(store.selection(), None);
    }

    #[test]
    fn test_delete_without_selection_is_noop() {
        let mut store = store_with(3);
        assert!(!store.delete_selected(0));
        assert_eq!(store.boxes(0).len(), 3);
    }

    #[test]
    fn test_select_next_cycles_through_every_index() {
        let n = 4;
        let mut store = store_with(n as i32);
        store.select(0, 2);
        let mut seen = Vec::new();
        for _ in 0..n {
            assert!(store.select_next(0));
            seen.push(store.selection().unwrap());
        }
        assert_eq!(seen, vec![3, 0, 1, 2]);
        assert_eq!(store.selection(), Some(2));
    }

    #[test]
    fn test_select_previous_wraps() {
        let mut store = store_with(3);
        assert!(store.select_previous(0));
        assert_eq!(store.selection(), Some(2));
        store.select(0, 0);
        assert!(store.select_previous(0));
        assert_eq!(store.selection(), Some(2));
    }

    #[test]
    fn test_cycling_empty_list_is_noop() {
        let mut store = store_with(0);
        assert!(!store.select_next(0));
        assert!(!store.select_previous(0));
        assert_eq!(store.selection(), None);
    }

    #[test]
    fn test_select_out_of_range_is_ignored() {
        let mut store = store_with(2);
        assert!(!store.select(0, 2));
        assert!(!store.select(1, 0));
        assert_eq!(store.selection(), None);
    }

    #[test]
    fn test_basename() {
        assert_eq!(basename(Path::new("/data/set/img1.png")), "img1.png");
        assert_eq!(ImageEntry::new(PathBuf::from("img2.png")).basename(), "img2.png");
    }
}
