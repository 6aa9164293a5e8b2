// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar with image navigation and session status.

use crate::session::{Command, View};

/// Display the toolbar. Returns the command of a clicked button, if any.
pub fn show(ui: &mut egui::Ui, view: &View<'_>) -> Option<Command> {
    let mut command = None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        let has_previous = view.position > 0;
        let has_next = view.position + 1 < view.count;
        if ui.add_enabled(has_previous, egui::Button::new("◀ Prev")).clicked() {
            command = Some(Command::PreviousImage);
        }
        if ui.add_enabled(has_next, egui::Button::new("Next ▶")).clicked() {
            command = Some(Command::NextImage);
        }

        ui.separator();

        let name = view
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        ui.label(format!("{}/{}  {}", view.position + 1, view.count, name));

        ui.separator();

        let selected = match view.selection {
            Some(i) => format!("box {} of {}", i + 1, view.boxes.len()),
            None => format!("{} boxes", view.boxes.len()),
        };
        ui.label(selected);

        ui.separator();

        ui.label(egui::RichText::new(view.storage).italics().weak());
        if view.read_only {
            ui.label(egui::RichText::new("read-only").color(egui::Color32::LIGHT_RED));
        }
    });

    command
}
