// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation session state.
//!
//! A session owns the box store, the persistence strategy, the active
//! image and the pointer state machine. Every input is processed to
//! completion, including the write to disk, before the next one is
//! accepted. The egui app only forwards events and paints the [`View`].

use crate::io::{media::ImageSource, LoadResult, PersistenceStrategy};
use crate::models::{
    annotation::BoxRect,
    store::{BoxStore, ImageEntry},
};
use crate::ui::interaction::{transition, EditorState, Effect, PointerEvent};
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

/// Keyboard-level commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    PreviousImage,
    NextImage,
    SelectNext,
    SelectPrevious,
    DeleteSelected,
}

/// Whether the event loop should keep running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Snapshot of what the canvas should draw.
#[derive(Debug, Clone, Copy)]
pub struct View<'a> {
    pub path: &'a Path,
    pub width: u32,
    pub height: u32,
    pub boxes: &'a [BoxRect],
    pub selection: Option<usize>,
    pub preview: Option<BoxRect>,
    pub position: usize,
    pub count: usize,
    pub read_only: bool,
    pub storage: &'a str,
}

pub struct Session<S: ImageSource> {
    store: BoxStore,
    strategy: Box<dyn PersistenceStrategy>,
    images: S,
    active: usize,
    editor: EditorState,
    storage: String,
    /// Per image: stored labels could not be read and have not been edited
    unreadable: Vec<bool>,
}

impl<S: ImageSource> Session<S> {
    /// Probe every image, restore stored boxes and activate the first image.
    pub fn open(
        files: Vec<PathBuf>,
        mut strategy: Box<dyn PersistenceStrategy>,
        images: S,
    ) -> Result<Self> {
        if files.is_empty() {
            bail!("no images to annotate");
        }

        let mut entries = Vec::with_capacity(files.len());
        for path in files {
            let (width, height) = images.dimensions(&path)?;
            let mut entry = ImageEntry::new(path);
            entry.width = width;
            entry.height = height;
            entries.push(entry);
        }

        let results = strategy
            .load(&entries)
            .with_context(|| format!("failed to restore boxes from {}", strategy.describe()))?;

        let mut restored = 0;
        let mut unreadable = vec![false; entries.len()];
        for ((entry, result), flag) in entries.iter_mut().zip(results).zip(&mut unreadable) {
            if let LoadResult::Corrupt(reason) = &result {
                log::warn!(
                    "Ignoring unreadable labels for {}: {}",
                    entry.path.display(),
                    reason
                );
                *flag = true;
            }
            entry.boxes = result.into_boxes();
            restored += entry.boxes.len();
        }
        log::info!(
            "Opened {} images, restored {} boxes from {}",
            entries.len(),
            restored,
            strategy.describe()
        );

        let storage = strategy.describe();
        Ok(Self {
            store: BoxStore::new(entries),
            strategy,
            images,
            active: 0,
            editor: EditorState::default(),
            storage,
            unreadable,
        })
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn is_dragging(&self) -> bool {
        self.editor.is_dragging()
    }

    pub fn view(&self) -> View<'_> {
        let entry = &self.store.entries()[self.active];
        View {
            path: &entry.path,
            width: entry.width,
            height: entry.height,
            boxes: &entry.boxes,
            selection: self.store.selection(),
            preview: self.editor.preview(),
            position: self.active,
            count: self.store.len(),
            read_only: self.strategy.is_read_only(),
            storage: &self.storage,
        }
    }

    /// Feed one pointer event through the state machine.
    ///
    /// Returns whether the canvas needs repainting.
    pub fn pointer(&mut self, event: PointerEvent) -> Result<bool> {
        let before = self.editor;
        let (editor, effect) = transition(
            self.editor,
            event,
            self.store.boxes(self.active),
            self.store.selection(),
        );
        self.editor = editor;
        log::trace!("{:?}: {:?} -> {:?}", event, before.drag, editor.drag);

        let (changed, edited) = match effect {
            Some(Effect::Append(rect)) => {
                let index = self.store.append(self.active, rect);
                log::info!("Added box {:?} as #{:?}", rect, index);
                (index.is_some(), index.is_some())
            }
            Some(Effect::Replace(index, rect)) => {
                let replaced = self.store.replace(self.active, index, rect);
                (replaced, replaced)
            }
            Some(Effect::Select(index)) => (self.store.select(self.active, index), false),
            None => (false, false),
        };
        if changed {
            self.persist(edited)?;
        }
        Ok(changed || before != editor)
    }

    /// Apply a keyboard command.
    pub fn command(&mut self, command: Command) -> Result<Flow> {
        let (changed, edited) = match command {
            Command::Quit => return Ok(Flow::Quit),
            Command::PreviousImage => {
                if let Some(previous) = self.active.checked_sub(1) {
                    self.go_to(previous)?;
                }
                return Ok(Flow::Continue);
            }
            Command::NextImage => {
                self.go_to(self.active + 1)?;
                return Ok(Flow::Continue);
            }
            Command::SelectNext => (self.store.select_next(self.active), false),
            Command::SelectPrevious => (self.store.select_previous(self.active), false),
            Command::DeleteSelected => {
                let deleted = self.store.delete_selected(self.active);
                if deleted {
                    log::info!(
                        "Deleted box, {} left on {}",
                        self.store.boxes(self.active).len(),
                        self.view().path.display()
                    );
                }
                (deleted, deleted)
            }
        };
        if changed {
            // A drag in progress refers to boxes by index.
            self.editor.reset();
            self.persist(edited)?;
        }
        Ok(Flow::Continue)
    }

    /// Switch to another image. Out-of-range indices are ignored.
    ///
    /// Returns whether the active image changed.
    pub fn go_to(&mut self, index: usize) -> Result<bool> {
        if index >= self.store.len() || index == self.active {
            return Ok(false);
        }

        if let Some(entry) = self.store.entry_mut(index) {
            let (width, height) = self.images.dimensions(&entry.path)?;
            entry.width = width;
            entry.height = height;
            log::info!(
                "Showing {} ({}x{}, {} boxes)",
                entry.path.display(),
                width,
                height,
                entry.boxes.len()
            );
        }

        self.active = index;
        self.store.clear_selection();
        self.editor.reset();
        self.persist(false)?;
        Ok(true)
    }

    /// Write the store through the strategy.
    ///
    /// Unreadable labels of the active image are left on disk until
    /// `edited` reports a change to its boxes.
    fn persist(&mut self, edited: bool) -> Result<()> {
        if let Some(flag) = self.unreadable.get_mut(self.active) {
            if *flag && !edited {
                log::debug!(
                    "Keeping unreadable labels of image {} until it is edited",
                    self.active
                );
                return Ok(());
            }
            if *flag && !self.strategy.is_read_only() {
                log::warn!(
                    "Overwriting unreadable labels for {}",
                    self.store.entries()[self.active].path.display()
                );
            }
            *flag = false;
        }
        self.strategy
            .save(self.store.entries(), self.active)
            .with_context(|| format!("failed to save boxes to {}", self.storage))
    }
}
