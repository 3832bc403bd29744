use glam::Vec2;

use crate::geometry::Rect;
use crate::tilemap::TileMap;

/// Downward acceleration folded into the persistent velocity each frame.
pub const GRAVITY: f32 = 0.1;

/// Cap on downward velocity, in pixels per frame. Together with the dash
/// speed cap this keeps per-frame motion under one tile, which the tile
/// map's 3×3 broad-phase query depends on.
pub const TERMINAL_FALL: f32 = 5.0;

/// Which sides of a body touched something solid during the last resolve.
/// Recomputed from scratch every frame; never carried over.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CollisionFlags {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// A movable axis-aligned box: position, size, persistent velocity, the
/// collision flags of the last frame and the current facing. The bounding
/// rectangle is always derived from `(pos, size)`, never stored.
#[derive(Clone, Debug)]
pub struct PhysicsBody {
    pub pos: Vec2,
    pub size: Vec2,
    pub velocity: Vec2,
    pub collisions: CollisionFlags,
    /// Facing: `false` is right, `true` is left.
    pub flip: bool,
    /// The most recent movement intent with a nonzero horizontal component.
    pub last_nonzero_move: Vec2,
}

impl PhysicsBody {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            velocity: Vec2::ZERO,
            collisions: CollisionFlags::default(),
            flip: false,
            last_nonzero_move: Vec2::ZERO,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_corner_size(self.pos, self.size)
    }

    /// Facing as a sign: `+1.0` right, `-1.0` left.
    pub fn facing(&self) -> f32 {
        if self.flip {
            -1.0
        } else {
            1.0
        }
    }

    /// One frame of axis-separated collision resolution against the tile
    /// map. Horizontal displacement resolves before vertical; this ordering
    /// biases corner cases toward horizontal resolution and is load-bearing
    /// for how bodies behave on tile corners.
    ///
    /// Gravity accumulates into the velocity before displacement, so a body
    /// resting on a surface sinks `GRAVITY` pixels, is clamped back to the
    /// exact surface and re-asserts its `down` flag every single frame.
    pub fn resolve(&mut self, map: &TileMap, movement: Vec2) {
        self.collisions = CollisionFlags::default();

        self.velocity.y = (self.velocity.y + GRAVITY).min(TERMINAL_FALL);
        let frame_movement = movement + self.velocity;

        // Horizontal pass. The rectangle is re-derived after every clamp,
        // so overlapping candidates resolve incrementally: the last
        // overlapping tile in scan order wins the final clamp.
        self.pos.x += frame_movement.x;
        let mut rect = self.rect();
        for tile in map.solid_rects_near(self.pos, self.size) {
            if rect.overlaps(&tile) {
                if frame_movement.x > 0.0 {
                    rect.set_right(tile.left());
                    self.collisions.right = true;
                }
                if frame_movement.x < 0.0 {
                    rect.set_left(tile.right());
                    self.collisions.left = true;
                }
                self.pos.x = rect.x;
            }
        }

        // Vertical pass, using the already-corrected horizontal position.
        self.pos.y += frame_movement.y;
        let mut rect = self.rect();
        for tile in map.solid_rects_near(self.pos, self.size) {
            if rect.overlaps(&tile) {
                if frame_movement.y > 0.0 {
                    rect.set_bottom(tile.top());
                    self.collisions.down = true;
                }
                if frame_movement.y < 0.0 {
                    rect.set_top(tile.bottom());
                    self.collisions.up = true;
                }
                self.pos.y = rect.y;
            }
        }

        if movement.x > 0.0 {
            self.flip = false;
        }
        if movement.x < 0.0 {
            self.flip = true;
        }
        if movement.x != 0.0 {
            self.last_nonzero_move = movement;
        }

        // Landing or a ceiling hit kills vertical momentum.
        if self.collisions.down || self.collisions.up {
            self.velocity.y = 0.0;
        }
    }
}
