// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Shared JSON map persistence.
//!
//! All boxes live in a single JSON object keyed by image basename, each
//! value a list of `[x, y, w, h]` pixel tuples. Keys that do not match any
//! image of the current run are kept verbatim and written back on every
//! save, so labelling a subset of a dataset never drops the rest.

use super::{LoadResult, PersistError, PersistenceStrategy};
use crate::models::{annotation::BoxRect, store::ImageEntry};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Writes one JSON map holding the boxes of every image.
#[derive(Debug)]
pub struct SharedMapStore {
    path: PathBuf,
    unmatched: Map<String, Value>,
}

impl SharedMapStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            unmatched: Map::new(),
        }
    }

    /// Entries loaded from disk that belong to no current image.
    pub fn unmatched(&self) -> &Map<String, Value> {
        &self.unmatched
    }

    fn malformed(&self, source: serde_json::Error) -> PersistError {
        PersistError::Malformed {
            path: self.path.clone(),
            source,
        }
    }
}

impl PersistenceStrategy for SharedMapStore {
    fn load(&mut self, entries: &[ImageEntry]) -> Result<Vec<LoadResult>, PersistError> {
        let mut results = vec![LoadResult::Empty; entries.len()];

        if !self.path.exists() {
            log::info!("No existing box map at {}", self.path.display());
            return Ok(results);
        }

        let json = std::fs::read_to_string(&self.path).map_err(|source| PersistError::Read {
            path: self.path.clone(),
            source,
        })?;
        let restored: Map<String, Value> =
            serde_json::from_str(&json).map_err(|e| self.malformed(e))?;

        let positions: BTreeMap<String, usize> = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.basename(), i))
            .collect();

        let mut matched = 0;
        for (name, value) in restored {
            match positions.get(&name) {
                Some(&i) => {
                    let tuples: Vec<[i32; 4]> =
                        serde_json::from_value(value).map_err(|e| self.malformed(e))?;
                    let boxes: Vec<BoxRect> = tuples.into_iter().map(BoxRect::from_array).collect();
                    matched += 1;
                    results[i] = LoadResult::Populated(boxes);
                }
                None => {
                    self.unmatched.insert(name, value);
                }
            }
        }

        log::info!(
            "Loaded box map {} ({} matched, {} unmatched)",
            self.path.display(),
            matched,
            self.unmatched.len()
        );
        Ok(results)
    }

    fn save(&mut self, entries: &[ImageEntry], _active: usize) -> Result<(), PersistError> {
        let mut map: BTreeMap<String, Value> = self
            .unmatched
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        for entry in entries {
            let tuples: Vec<[i32; 4]> = entry.boxes.iter().map(|rect| rect.to_array()).collect();
            map.insert(entry.basename(), serde_json::to_value(tuples)?);
        }

        let json = serde_json::to_string(&map)?;
        std::fs::write(&self.path, json).map_err(|source| PersistError::Write {
            path: self.path.clone(),
            source,
        })?;

        log::debug!("Saved {} entries to {}", map.len(), self.path.display());
        Ok(())
    }

    fn describe(&self) -> String {
        match self.unmatched().len() {
            0 => format!("JSON map {}", self.path.display()),
            n => format!("JSON map {} (+{} other images)", self.path.display(), n),
        }
    }
}
