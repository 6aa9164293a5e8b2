// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Pointer interaction state machine.
//!
//! Turns press/move/release events into box-store effects: drawing a new
//! box, live-resizing the selected box by one of its corner handles, or
//! selecting a box with a click. [`transition`] is a pure function so the
//! whole gesture logic can be exercised without a window.

use crate::models::annotation::{BoxRect, Point};
use crate::util::geometry::{contains, distance, handle_corners, manhattan_length, normalize};
use serde::{Deserialize, Serialize};

/// Grab radius around each corner handle, in pointer units.
pub const HANDLE_RADIUS: f64 = 4.0;

/// Releases closer than this (Manhattan) to the press count as clicks.
pub const CLICK_TOLERANCE: i32 = 4;

/// Transient drag state between a press and its release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DragState {
    #[default]
    Idle,
    Drawing {
        anchor: Point,
        current: Point,
    },
    Resizing {
        index: usize,
        anchor: Point,
        current: Point,
    },
}

/// Raw pointer input, in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Press(Point),
    Move(Point),
    Release(Point),
}

/// Box-store mutation requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Append(BoxRect),
    Replace(usize, BoxRect),
    Select(usize),
}

/// Editor state threaded through every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EditorState {
    pub drag: DragState,
}

impl EditorState {
    /// The box being drawn, if a new box is in progress.
    pub fn preview(&self) -> Option<BoxRect> {
        match self.drag {
            DragState::Drawing { anchor, current } => Some(normalize(anchor, current)),
            _ => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag != DragState::Idle
    }

    pub fn reset(&mut self) {
        self.drag = DragState::Idle;
    }
}

/// Apply one pointer event.
///
/// `boxes` is the active image's list and `selection` the current index
/// into it.
pub fn transition(
    state: EditorState,
    event: PointerEvent,
    boxes: &[BoxRect],
    selection: Option<usize>,
) -> (EditorState, Option<Effect>) {
    match event {
        PointerEvent::Press(point) => (EditorState { drag: press(point, boxes, selection) }, None),
        PointerEvent::Move(point) => drag_to(state, point),
        PointerEvent::Release(point) => (EditorState::default(), release(state, point, boxes)),
    }
}

fn press(point: Point, boxes: &[BoxRect], selection: Option<usize>) -> DragState {
    let selected = selection.and_then(|index| boxes.get(index).map(|rect| (index, rect)));

    if let Some((index, rect)) = selected {
        let grabbed = handle_corners(rect)
            .into_iter()
            .find(|(_, handle)| distance(*handle, point) < HANDLE_RADIUS);

        if let Some((corner, handle)) = grabbed {
            log::trace!("Grabbed {:?} handle of box {}", corner, index);
            return DragState::Resizing {
                index,
                anchor: rect.corner(corner.opposite()),
                current: handle,
            };
        }
    }

    DragState::Drawing {
        anchor: point,
        current: point,
    }
}

fn drag_to(state: EditorState, point: Point) -> (EditorState, Option<Effect>) {
    match state.drag {
        DragState::Idle => (state, None),
        DragState::Drawing { anchor, .. } => (
            EditorState {
                drag: DragState::Drawing {
                    anchor,
                    current: point,
                },
            },
            None,
        ),
        DragState::Resizing { index, anchor, .. } => (
            EditorState {
                drag: DragState::Resizing {
                    index,
                    anchor,
                    current: point,
                },
            },
            Some(Effect::Replace(index, normalize(anchor, point))),
        ),
    }
}

fn release(state: EditorState, point: Point, boxes: &[BoxRect]) -> Option<Effect> {
    let anchor = match state.drag {
        // Resizes were applied live on every move.
        DragState::Idle | DragState::Resizing { .. } => return None,
        DragState::Drawing { anchor, .. } => anchor,
    };

    if manhattan_length(anchor, point) < CLICK_TOLERANCE {
        // Later boxes are drawn on top, so they win the hit test.
        return boxes
            .iter()
            .rposition(|rect| contains(rect, point))
            .map(Effect::Select);
    }

    Some(Effect::Append(normalize(anchor, point)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(
        events: &[PointerEvent],
        boxes: &[BoxRect],
        selection: Option<usize>,
    ) -> (EditorState, Vec<Effect>) {
        let mut state = EditorState::default();
        let mut effects = Vec::new();
        for event in events {
            let (next, effect) = transition(state, *event, boxes, selection);
            state = next;
            effects.extend(effect);
        }
        (state, effects)
    }

    #[test]
    fn test_drag_draws_new_box() {
        let (state, effects) = run(
            &[
                PointerEvent::Press(Point::new(50, 40)),
                PointerEvent::Move(Point::new(30, 20)),
                PointerEvent::Release(Point::new(10, 10)),
            ],
            &[],
            None,
        );
        assert_eq!(state.drag, DragState::Idle);
        assert_eq!(effects, vec![Effect::Append(BoxRect::new(10, 10, 40, 30))]);
    }

    #[test]
    fn test_drawing_previews_without_mutation() {
        let state = EditorState::default();
        let (state, effect) = transition(state, PointerEvent::Press(Point::new(5, 5)), &[], None);
        assert!(effect.is_none());
        let (state, effect) = transition(state, PointerEvent::Move(Point::new(15, 25)), &[], None);
        assert!(effect.is_none());
        assert_eq!(state.preview(), Some(BoxRect::new(5, 5, 10, 20)));
        assert!(state.is_dragging());
    }

    #[test]
    fn test_click_selects_topmost_box() {
        let boxes = [BoxRect::new(0, 0, 50, 50), BoxRect::new(20, 20, 50, 50)];
        let (_, effects) = run(
            &[
                PointerEvent::Press(Point::new(30, 30)),
                PointerEvent::Release(Point::new(31, 31)),
            ],
            &boxes,
            None,
        );
        assert_eq!(effects, vec![Effect::Select(1)]);
    }

    #[test]
    fn test_click_on_empty_space_keeps_selection() {
        let boxes = [BoxRect::new(0, 0, 10, 10)];
        let (_, effects) = run(
            &[
                PointerEvent::Press(Point::new(80, 80)),
                PointerEvent::Release(Point::new(80, 82)),
            ],
            &boxes,
            Some(0),
        );
        assert!(effects.is_empty());
    }

    #[test]
    fn test_short_drag_is_a_click_not_a_box() {
        let (_, effects) = run(
            &[
                PointerEvent::Press(Point::new(10, 10)),
                PointerEvent::Move(Point::new(12, 11)),
                PointerEvent::Release(Point::new(12, 11)),
            ],
            &[],
            None,
        );
        assert!(effects.is_empty());
    }

    #[test]
    fn test_resize_from_bottom_right_handle() {
        let boxes = [BoxRect::new(10, 10, 40, 30)];
        let (state, effects) = run(
            &[
                PointerEvent::Press(Point::new(52, 41)),
                PointerEvent::Move(Point::new(60, 50)),
                PointerEvent::Move(Point::new(70, 65)),
                PointerEvent::Release(Point::new(70, 65)),
            ],
            &boxes,
            Some(0),
        );
        assert_eq!(state.drag, DragState::Idle);
        assert_eq!(
            effects,
            vec![
                Effect::Replace(0, BoxRect::new(10, 10, 50, 40)),
                Effect::Replace(0, BoxRect::new(10, 10, 60, 55)),
            ]
        );
    }

    #[test]
    fn test_press_on_handle_anchors_opposite_corner() {
        let boxes = [BoxRect::new(10, 10, 40, 30)];
        let (state, effect) = transition(
            EditorState::default(),
            PointerEvent::Press(Point::new(11, 11)),
            &boxes,
            Some(0),
        );
        assert!(effect.is_none());
        assert_eq!(
            state.drag,
            DragState::Resizing {
                index: 0,
                anchor: Point::new(50, 40),
                current: Point::new(10, 10),
            }
        );
        assert_eq!(state.preview(), None);
    }

    #[test]
    fn test_resize_past_anchor_flips_box() {
        let boxes = [BoxRect::new(10, 10, 40, 30)];
        let (_, effects) = run(
            &[
                PointerEvent::Press(Point::new(50, 40)),
                PointerEvent::Move(Point::new(0, 0)),
            ],
            &boxes,
            Some(0),
        );
        assert_eq!(effects, vec![Effect::Replace(0, BoxRect::new(0, 0, 10, 10))]);
    }

    #[test]
    fn test_handles_ignored_without_selection() {
        let boxes = [BoxRect::new(10, 10, 40, 30)];
        let (state, _) = transition(
            EditorState::default(),
            PointerEvent::Press(Point::new(50, 40)),
            &boxes,
            None,
        );
        assert!(matches!(state.drag, DragState::Drawing { .. }));
    }

    #[test]
    fn test_handle_radius_is_exclusive() {
        let boxes = [BoxRect::new(10, 10, 40, 30)];
        let (state, _) = transition(
            EditorState::default(),
            PointerEvent::Press(Point::new(54, 40)),
            &boxes,
            Some(0),
        );
        assert!(matches!(state.drag, DragState::Drawing { .. }));
    }

    #[test]
    fn test_move_and_release_while_idle_do_nothing() {
        let boxes = [BoxRect::new(0, 0, 10, 10)];
        let (state, effects) = run(
            &[PointerEvent::Move(Point::new(5, 5)), PointerEvent::Release(Point::new(5, 5))],
            &boxes,
            None,
        );
        assert_eq!(state.drag, DragState::Idle);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_editor_state_serializes() {
        let state = EditorState {
            drag: DragState::Drawing {
                anchor: Point::new(1, 2),
                current: Point::new(3, 4),
            },
        };
        let json = serde_json::to_string(&state).unwrap();
        let back: EditorState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
