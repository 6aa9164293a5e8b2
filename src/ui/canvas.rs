// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing canvas for image display and box annotation.
//!
//! The image is painted at its native size so one pointer unit equals one
//! image pixel. Primary-button input over the image is translated into
//! [`PointerEvent`]s for the session; everything else here is painting.

use crate::models::annotation::{BoxRect, Point};
use crate::session::View;
use crate::ui::interaction::{PointerEvent, HANDLE_RADIUS};
use crate::util::geometry::handle_corners;

const SELECTED_FILL: egui::Color32 = egui::Color32::from_rgba_premultiplied(20, 50, 50, 50);
const BOX_FILL: egui::Color32 = egui::Color32::from_rgba_premultiplied(50, 50, 20, 50);

/// Display the active image with its boxes and collect pointer input.
///
/// `dragging` tells the canvas whether a press is still outstanding, so
/// moves and releases outside the image are still delivered.
pub fn show(
    ui: &mut egui::Ui,
    view: &View<'_>,
    texture: Option<&egui::TextureHandle>,
    dragging: bool,
) -> Vec<PointerEvent> {
    let size = egui::vec2(view.width as f32, view.height as f32);
    let (image_rect, response) = ui.allocate_exact_size(size, egui::Sense::click_and_drag());
    let painter = ui.painter().clone();

    match texture {
        Some(texture) => {
            painter.image(
                texture.id(),
                image_rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }
        None => {
            painter.rect_filled(image_rect, 0.0, egui::Color32::from_gray(40));
            painter.text(
                image_rect.center(),
                egui::Align2::CENTER_CENTER,
                format!("Cannot display {}", view.path.display()),
                egui::FontId::proportional(14.0),
                egui::Color32::from_gray(180),
            );
        }
    }

    for (i, rect) in view.boxes.iter().enumerate() {
        let fill = if view.selection == Some(i) {
            SELECTED_FILL
        } else {
            BOX_FILL
        };
        draw_box(&painter, image_rect.min, rect, fill);
    }

    // Grabbers for the selected box
    if let Some(rect) = view.selection.and_then(|i| view.boxes.get(i)) {
        for (_, corner) in handle_corners(rect) {
            let center = to_screen(image_rect.min, corner);
            painter.circle_filled(center, HANDLE_RADIUS as f32, egui::Color32::WHITE);
            painter.circle_stroke(
                center,
                HANDLE_RADIUS as f32,
                egui::Stroke::new(1.0, egui::Color32::BLACK),
            );
        }
    }

    if let Some(rect) = view.preview {
        draw_box(&painter, image_rect.min, &rect, SELECTED_FILL);
    }

    collect_events(ui, image_rect.min, response.hovered(), dragging)
}

fn collect_events(
    ui: &egui::Ui,
    origin: egui::Pos2,
    hovered: bool,
    dragging: bool,
) -> Vec<PointerEvent> {
    let (pressed, released, moving, pos) = ui.input(|i| {
        (
            i.pointer.primary_pressed(),
            i.pointer.primary_released(),
            i.pointer.is_moving(),
            i.pointer.interact_pos(),
        )
    });
    let Some(pos) = pos else {
        return Vec::new();
    };
    let point = to_image(origin, pos);

    let mut events = Vec::new();
    let mut active = dragging;
    if pressed && hovered {
        events.push(PointerEvent::Press(point));
        active = true;
    } else if active && moving {
        events.push(PointerEvent::Move(point));
    }
    if released && active {
        events.push(PointerEvent::Release(point));
    }
    events
}

fn to_image(origin: egui::Pos2, pos: egui::Pos2) -> Point {
    Point::new(
        (pos.x - origin.x).floor() as i32,
        (pos.y - origin.y).floor() as i32,
    )
}

fn to_screen(origin: egui::Pos2, point: Point) -> egui::Pos2 {
    origin + egui::vec2(point.x as f32, point.y as f32)
}

/// Draw one box on the canvas.
fn draw_box(painter: &egui::Painter, origin: egui::Pos2, rect: &BoxRect, fill: egui::Color32) {
    let screen = egui::Rect::from_min_size(
        to_screen(origin, Point::new(rect.x, rect.y)),
        egui::vec2(rect.width as f32, rect.height as f32),
    );
    painter.rect_filled(screen, 0.0, fill);
    painter.rect_stroke(screen, 0.0, egui::Stroke::new(1.0, egui::Color32::BLACK));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_image_mapping() {
        let origin = egui::pos2(100.0, 50.0);
        assert_eq!(to_image(origin, egui::pos2(110.7, 60.2)), Point::new(10, 10));
        assert_eq!(to_image(origin, egui::pos2(99.5, 50.0)), Point::new(-1, 0));
        assert_eq!(to_screen(origin, Point::new(10, 10)), egui::pos2(110.0, 60.0));
    }
}
