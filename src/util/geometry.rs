// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides rectangle construction from drag corners, hit
//! testing, and the transformations between pixel boxes and normalized
//! center-form boxes.

use crate::models::annotation::{BoxRect, Corner, NormalizedBox, Point};

/// Build a box from two arbitrary corner points.
pub fn normalize(p1: Point, p2: Point) -> BoxRect {
    BoxRect {
        x: p1.x.min(p2.x),
        y: p1.y.min(p2.y),
        width: (p1.x - p2.x).abs(),
        height: (p1.y - p2.y).abs(),
    }
}

/// Euclidean distance between two points.
pub fn distance(p: Point, q: Point) -> f64 {
    let dx = f64::from(p.x - q.x);
    let dy = f64::from(p.y - q.y);
    (dx * dx + dy * dy).sqrt()
}

/// Sum of the absolute axis deltas, used to tell clicks from drags.
pub fn manhattan_length(p: Point, q: Point) -> i32 {
    (p.x - q.x).abs() + (p.y - q.y).abs()
}

/// Whether `p` lies inside `rect`, edges included.
pub fn contains(rect: &BoxRect, p: Point) -> bool {
    p.x >= rect.x && p.x <= rect.x + rect.width && p.y >= rect.y && p.y <= rect.y + rect.height
}

/// The four handle positions of a box, in hit-test order.
pub fn handle_corners(rect: &BoxRect) -> [(Corner, Point); 4] {
    Corner::ALL.map(|corner| (corner, rect.corner(corner)))
}

/// Convert a pixel box to normalized center form, clamping every
/// component to `[0, 1]`.
pub fn to_normalized(rect: &BoxRect, width: u32, height: u32) -> NormalizedBox {
    let img_w = f64::from(width);
    let img_h = f64::from(height);
    let w = f64::from(rect.width);
    let h = f64::from(rect.height);

    NormalizedBox {
        cx: ((f64::from(rect.x) + w / 2.0) / img_w).clamp(0.0, 1.0),
        cy: ((f64::from(rect.y) + h / 2.0) / img_h).clamp(0.0, 1.0),
        w: (w / img_w).clamp(0.0, 1.0),
        h: (h / img_h).clamp(0.0, 1.0),
    }
}

/// Convert a normalized box back to pixel space. Stored values are
/// trusted, so nothing is clamped.
pub fn from_normalized(norm: &NormalizedBox, width: u32, height: u32) -> BoxRect {
    let img_w = f64::from(width);
    let img_h = f64::from(height);

    BoxRect {
        x: ((norm.cx - norm.w / 2.0) * img_w).round() as i32,
        y: ((norm.cy - norm.h / 2.0) * img_h).round() as i32,
        width: (norm.w * img_w).round() as i32,
        height: (norm.h * img_h).round() as i32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_is_order_independent() {
        let pairs = [
            (Point::new(10, 10), Point::new(50, 40)),
            (Point::new(50, 10), Point::new(10, 40)),
            (Point::new(-5, 3), Point::new(7, -9)),
            (Point::new(4, 4), Point::new(4, 4)),
        ];
        for (a, b) in pairs {
            assert_eq!(normalize(a, b), normalize(b, a));
        }
        assert_eq!(
            normalize(Point::new(50, 40), Point::new(10, 10)),
            BoxRect::new(10, 10, 40, 30)
        );
    }

    #[test]
    fn test_distance_and_manhattan() {
        let a = Point::new(0, 0);
        let b = Point::new(3, 4);
        assert!((distance(a, b) - 5.0).abs() < 1e-9);
        assert_eq!(manhattan_length(a, b), 7);
        assert_eq!(manhattan_length(b, a), 7);
    }

    #[test]
    fn test_contains_includes_edges() {
        let rect = BoxRect::new(10, 10, 20, 20);
        assert!(contains(&rect, Point::new(10, 10)));
        assert!(contains(&rect, Point::new(30, 30)));
        assert!(contains(&rect, Point::new(20, 15)));
        assert!(!contains(&rect, Point::new(9, 15)));
        assert!(!contains(&rect, Point::new(20, 31)));
    }

    #[test]
    fn test_handle_corners_order() {
        let corners = handle_corners(&BoxRect::new(0, 0, 10, 5));
        assert_eq!(corners[0], (Corner::TopLeft, Point::new(0, 0)));
        assert_eq!(corners[3], (Corner::BottomRight, Point::new(10, 5)));
    }

    #[test]
    fn test_to_normalized_known_values() {
        let norm = to_normalized(&BoxRect::new(10, 10, 40, 30), 100, 80);
        assert!((norm.cx - 0.3).abs() < 1e-9);
        assert!((norm.cy - 0.3125).abs() < 1e-9);
        assert!((norm.w - 0.4).abs() < 1e-9);
        assert!((norm.h - 0.375).abs() < 1e-9);
    }

    #[test]
    fn test_to_normalized_clamps_off_canvas() {
        let norm = to_normalized(&BoxRect::new(-50, 60, 300, 40), 100, 80);
        assert_eq!(norm.cx, 1.0);
        assert_eq!(norm.cy, 1.0);
        assert_eq!(norm.w, 1.0);
        assert!((norm.h - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_normalized_roundtrip_inside_image() {
        let (w, h) = (640, 480);
        let rects = [
            BoxRect::new(0, 0, 640, 480),
            BoxRect::new(13, 17, 101, 59),
            BoxRect::new(639, 479, 1, 1),
            BoxRect::new(200, 100, 0, 0),
        ];
        for rect in rects {
            let norm = to_normalized(&rect, w, h);
            // Round through the five-decimal text format as well.
            let stored = NormalizedBox {
                cx: format!("{:.5}", norm.cx).parse().unwrap(),
                cy: format!("{:.5}", norm.cy).parse().unwrap(),
                w: format!("{:.5}", norm.w).parse().unwrap(),
                h: format!("{:.5}", norm.h).parse().unwrap(),
            };
            assert_eq!(from_normalized(&stored, w, h), rect);
        }
    }
}
