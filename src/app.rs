// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module forwards keyboard and pointer input to the [`Session`],
//! keeps the texture of the active image loaded, and paints the toolbar
//! and canvas every frame.

use crate::io::media::{self, DiskImages};
use crate::session::{Command, Flow, Session};
use crate::ui::{canvas, toolbar};
use std::cell::RefCell;
use std::rc::Rc;

/// Vertical room reserved for the toolbar when sizing the window.
pub const TOOLBAR_HEIGHT: f32 = 40.0;

/// Slot where a fatal error is left for `main` to report after exit.
pub type FatalSlot = Rc<RefCell<Option<anyhow::Error>>>;

/// Main application state.
pub struct BoxLabelApp {
    session: Session<DiskImages>,

    /// Texture of the active image
    texture: Option<egui::TextureHandle>,

    /// Image index the window was last sized for
    shown: Option<usize>,

    fatal: FatalSlot,
}

impl BoxLabelApp {
    pub fn new(session: Session<DiskImages>, fatal: FatalSlot) -> Self {
        Self {
            session,
            texture: None,
            shown: None,
            fatal,
        }
    }

    /// Stop the application on an unrecoverable error.
    fn fail(&mut self, ctx: &egui::Context, err: anyhow::Error) {
        log::error!("{:#}", err);
        *self.fatal.borrow_mut() = Some(err);
        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
    }

    /// Load the texture and size the window when the active image changed.
    fn sync_image(&mut self, ctx: &egui::Context) {
        let active = self.session.active();
        if self.shown == Some(active) {
            return;
        }
        self.shown = Some(active);

        let view = self.session.view();
        self.texture = match media::load_image(view.path) {
            Ok(loaded) => {
                let size = [loaded.width as usize, loaded.height as usize];
                let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &loaded.pixels);
                let texture = ctx.load_texture(
                    view.path.to_string_lossy(),
                    color_image,
                    egui::TextureOptions::LINEAR,
                );
                Some(texture)
            }
            Err(e) => {
                log::error!("{}", e);
                None
            }
        };

        ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(egui::vec2(
            view.width as f32,
            view.height as f32 + TOOLBAR_HEIGHT,
        )));
        ctx.send_viewport_cmd(egui::ViewportCommand::Title(format!(
            "boxlabel - {}",
            view.path.display()
        )));
    }

    fn keyboard_commands(ctx: &egui::Context) -> Vec<Command> {
        ctx.input_mut(|i| {
            let mut commands = Vec::new();
            if i.key_pressed(egui::Key::Q) {
                commands.push(Command::Quit);
            }
            if i.key_pressed(egui::Key::ArrowLeft) {
                commands.push(Command::PreviousImage);
            }
            if i.key_pressed(egui::Key::ArrowRight) {
                commands.push(Command::NextImage);
            }
            // Shift+Tab first: a plain Tab pattern also matches with shift held.
            if i.consume_key(egui::Modifiers::SHIFT, egui::Key::Tab) {
                commands.push(Command::SelectPrevious);
            } else if i.consume_key(egui::Modifiers::NONE, egui::Key::Tab) {
                commands.push(Command::SelectNext);
            }
            if i.key_pressed(egui::Key::Backspace) || i.key_pressed(egui::Key::Delete) {
                commands.push(Command::DeleteSelected);
            }
            commands
        })
    }
}

impl eframe::App for BoxLabelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.fatal.borrow().is_some() {
            return;
        }

        self.sync_image(ctx);

        let mut commands = Self::keyboard_commands(ctx);

        let clicked = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| toolbar::show(ui, &self.session.view()))
            .inner;
        commands.extend(clicked);

        let dragging = self.session.is_dragging();
        let events = egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                egui::ScrollArea::both()
                    .drag_to_scroll(false)
                    .show(ui, |ui| {
                        canvas::show(ui, &self.session.view(), self.texture.as_ref(), dragging)
                    })
                    .inner
            })
            .inner;

        for event in events {
            if let Err(e) = self.session.pointer(event) {
                self.fail(ctx, e);
                return;
            }
        }

        for command in commands {
            match self.session.command(command) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => {
                    log::info!("Quitting");
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    return;
                }
                Err(e) => {
                    self.fail(ctx, e);
                    return;
                }
            }
        }
    }
}
