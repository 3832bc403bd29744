// =============================================================================
// GEOMETRY.RS — Axis-aligned rectangles in pixel space
//
// The whole collision model is AABB vs. AABB:
// - Bodies derive their rectangle from (position, size) every time it is
//   needed; the rectangle is never stored.
// - Overlap is strict: rectangles that merely touch along an edge do not
//   collide, which is what lets a body rest exactly on a surface.
// =============================================================================

use glam::Vec2;

/// Axis-aligned rectangle, top-left anchored, in pixels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_corner_size(pos: Vec2, size: Vec2) -> Self {
        Self { x: pos.x, y: pos.y, w: size.x, h: size.y }
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
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// Move the rectangle so its left edge sits at `v`.
    pub fn set_left(&mut self, v: f32) {
        self.x = v;
    }

    /// Move the rectangle so its right edge sits at `v`.
    pub fn set_right(&mut self, v: f32) {
        self.x = v - self.w;
    }

    /// Move the rectangle so its top edge sits at `v`.
    pub fn set_top(&mut self, v: f32) {
        self.y = v;
    }

    /// Move the rectangle so its bottom edge sits at `v`.
    pub fn set_bottom(&mut self, v: f32) {
        self.y = v - self.h;
    }

    /// Strict overlap test: touching edges do NOT count as overlapping.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Point containment, inclusive of the top-left edges and exclusive of
    /// the bottom-right ones (so adjacent rectangles partition the plane).
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x < self.right() && p.y >= self.top() && p.y < self.bottom()
    }
}
