//! Axis-aligned collision detection
//!
//! Every collision in the game is a rectangle-vs-rectangle test between
//! hitboxes. Hitboxes are usually smaller than the sprite they belong to.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle of size `w` x `h` centered on `center`
    pub fn from_center(center: Vec2, w: f32, h: f32) -> Self {
        Self::new(center.x - w / 2.0, center.y - h / 2.0, w, h)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Zero or negative area
    pub fn is_empty(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }

    /// Move the rectangle so its top-left corner sits at `pos + offset`
    pub fn place_at(&mut self, pos: Vec2, offset: Vec2) {
        self.x = pos.x + offset.x;
        self.y = pos.y + offset.y;
    }
}

/// True iff the rectangles overlap on both axes.
///
/// Overlap is strict: rectangles that only share an edge do not
/// intersect, and an empty rectangle intersects nothing.
pub fn intersects(a: &Rect, b: &Rect) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.left() < b.right() && b.left() < a.right() && a.top() < b.bottom() && b.top() < a.bottom()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(intersects(&a, &b));
        assert!(intersects(&b, &a));
    }

    #[test]
    fn test_contained() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        let inner = Rect::new(40.0, 40.0, 5.0, 5.0);
        assert!(intersects(&outer, &inner));
        assert!(intersects(&inner, &outer));
    }

    #[test]
    fn test_touching_edges_do_not_count() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        // Shares the right edge
        let right = Rect::new(10.0, 0.0, 10.0, 10.0);
        // Shares the bottom edge
        let below = Rect::new(0.0, 10.0, 10.0, 10.0);
        // Shares only a corner
        let corner = Rect::new(10.0, 10.0, 10.0, 10.0);
        assert!(!intersects(&a, &right));
        assert!(!intersects(&a, &below));
        assert!(!intersects(&a, &corner));

        // A hair of overlap does count
        let nudged = Rect::new(9.99, 0.0, 10.0, 10.0);
        assert!(intersects(&a, &nudged));
    }

    #[test]
    fn test_separated_on_one_axis() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        // Overlaps on x, separated on y
        let b = Rect::new(2.0, 50.0, 10.0, 10.0);
        assert!(!intersects(&a, &b));
        // Overlaps on y, separated on x
        let c = Rect::new(50.0, 2.0, 10.0, 10.0);
        assert!(!intersects(&a, &c));
    }

    #[test]
    fn test_empty_rect_never_hits() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let empty = Rect::new(5.0, 5.0, 0.0, 4.0);
        assert!(!intersects(&a, &empty));
        assert!(!intersects(&empty, &a));
    }

    #[test]
    fn test_from_center_and_place_at() {
        let r = Rect::from_center(Vec2::new(50.0, 50.0), 20.0, 10.0);
        assert_eq!(r, Rect::new(40.0, 45.0, 20.0, 10.0));
        assert_eq!(r.center(), Vec2::new(50.0, 50.0));

        let mut hb = Rect::new(0.0, 0.0, 5.0, 5.0);
        hb.place_at(Vec2::new(100.0, 200.0), Vec2::new(10.0, 5.0));
        assert_eq!((hb.x, hb.y), (110.0, 205.0));
    }
}
