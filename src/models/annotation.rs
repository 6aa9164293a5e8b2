// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation data structures.
//!
//! This module defines the core data structures for representing
//! bounding boxes in image pixel space and in normalized center form.

use serde::{Deserialize, Serialize};

/// A 2D point in image pixel coordinates.
///
/// The canvas draws images at their native size, so pointer coordinates
/// and pixel coordinates are the same space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned bounding box in pixel space.
///
/// `width` and `height` are never negative once a box has gone through
/// [`crate::util::geometry::normalize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoxRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoxRect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Position of one of the four resize handles.
    pub fn corner(&self, corner: Corner) -> Point {
        match corner {
            Corner::TopLeft => Point::new(self.x, self.y),
            Corner::TopRight => Point::new(self.x + self.width, self.y),
            Corner::BottomLeft => Point::new(self.x, self.y + self.height),
            Corner::BottomRight => Point::new(self.x + self.width, self.y + self.height),
        }
    }

    /// The `[x, y, w, h]` tuple used by the JSON output.
    pub fn to_array(self) -> [i32; 4] {
        [self.x, self.y, self.width, self.height]
    }

    pub fn from_array([x, y, width, height]: [i32; 4]) -> Self {
        Self::new(x, y, width, height)
    }
}

/// A corner handle of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// Handles in hit-test order.
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    /// The diagonally opposite corner, which stays fixed while resizing.
    pub fn opposite(self) -> Corner {
        match self {
            Corner::TopLeft => Corner::BottomRight,
            Corner::TopRight => Corner::BottomLeft,
            Corner::BottomLeft => Corner::TopRight,
            Corner::BottomRight => Corner::TopLeft,
        }
    }
}

/// A box in normalized center form, each component relative to the
/// image dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedBox {
    pub cx: f64,
    pub cy: f64,
    pub w: f64,
    pub h: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corners() {
        let rect = BoxRect::new(10, 20, 30, 40);
        assert_eq!(rect.corner(Corner::TopLeft), Point::new(10, 20));
        assert_eq!(rect.corner(Corner::TopRight), Point::new(40, 20));
        assert_eq!(rect.corner(Corner::BottomLeft), Point::new(10, 60));
        assert_eq!(rect.corner(Corner::BottomRight), Point::new(40, 60));
    }

    #[test]
    fn test_opposite_is_involution() {
        for corner in Corner::ALL {
            assert_ne!(corner.opposite(), corner);
            assert_eq!(corner.opposite().opposite(), corner);
        }
    }
}
