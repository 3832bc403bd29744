// =============================================================================
// PLAYER.RS — Protagonist state machine
//
// The player layers three orthogonal mechanics over a PhysicsBody:
// - an action state machine (idle / run / jump / wall_slide) driving the
//   animation,
// - a jump-charge system with a wall-kick branch,
// - a signed dash countdown whose outer window forces horizontal velocity
//   and grants projectile invulnerability.
// =============================================================================

use glam::Vec2;
use rand::rngs::SmallRng;

use crate::animation::{AnimationError, AnimationLibrary, AnimationState};
use crate::effects::{Color, Effects, Faction, ProjectileVisual};
use crate::geometry::Rect;
use crate::physics::PhysicsBody;
use crate::scene::{Signal, Signals};
use crate::tilemap::TileMap;

/// Collision box, deliberately narrower than a tile.
pub const PLAYER_SIZE: Vec2 = Vec2::new(8.0, 15.0);

/// Airborne frames after which the fall is lethal.
pub const FALL_DEATH_FRAMES: u32 = 120;

/// Airborne frames before the body counts as properly off the ground.
/// Below this, coyote-style grace keeps run/idle animations active.
pub const AIRBORNE_FRAMES: u32 = 4;

/// Fall speed cap while pressed against a wall.
pub const WALL_SLIDE_MAX_FALL: f32 = 0.5;

/// Vertical launch velocity of a plain jump.
pub const JUMP_VELOCITY: f32 = -3.0;

/// Wall-kick launch: lateral push away from the wall, and the (weaker)
/// vertical component.
pub const WALL_KICK: Vec2 = Vec2::new(3.5, -2.5);

/// Total length of the dash countdown, in frames.
pub const DASH_FRAMES: i32 = 60;

/// While `|dashing| > DASH_FORCE_FRAMES` the dash overrides horizontal
/// velocity; the remaining frames are recovery.
pub const DASH_FORCE_FRAMES: i32 = 50;

/// Forced horizontal speed during the dash window.
pub const DASH_SPEED: f32 = 8.0;

/// Per-frame horizontal drag applied toward zero.
pub const DRAG_X: f32 = 0.1;

/// Player projectile speed, signed by facing at fire time.
pub const SHOT_SPEED: f32 = 3.0;

/// Muzzle offset from the body center, along facing.
pub const SHOT_MUZZLE_OFFSET: f32 = 8.0;

const ACTIONS: [&str; 4] = ["idle", "run", "jump", "wall_slide"];

#[derive(Debug)]
pub struct Player {
    pub body: PhysicsBody,
    pub anim: AnimationState,
    air_time: u32,
    jumps: u32,
    wall_slide: bool,
    /// Signed dash countdown; the sign is the dash direction, zero is idle.
    dashing: i32,
}

impl Player {
    pub fn new(pos: Vec2, assets: &AnimationLibrary) -> Result<Self, AnimationError> {
        let table = assets.action_table("player", &ACTIONS)?;
        Ok(Self {
            body: PhysicsBody::new(pos, PLAYER_SIZE),
            anim: AnimationState::new(table, "idle"),
            air_time: 0,
            jumps: 1,
            wall_slide: false,
            dashing: 0,
        })
    }

    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    pub fn air_time(&self) -> u32 {
        self.air_time
    }

    pub fn jumps(&self) -> u32 {
        self.jumps
    }

    pub fn wall_sliding(&self) -> bool {
        self.wall_slide
    }

    /// Raw signed dash countdown, for drivers that render trails.
    pub fn dashing(&self) -> i32 {
        self.dashing
    }

    /// True from the first dash frame through the end of the forced window;
    /// enemy projectiles and melee cannot connect while this holds.
    pub fn dash_invulnerable(&self) -> bool {
        self.dashing.abs() >= DASH_FORCE_FRAMES
    }

    /// False only during the forced dash window, when the renderer should
    /// hide the sprite behind the particle stream.
    pub fn visible(&self) -> bool {
        self.dashing.abs() <= DASH_FORCE_FRAMES
    }

    /// Put the player back at a spawn point with every counter cleared.
    pub fn respawn(&mut self, pos: Vec2) {
        self.body = PhysicsBody::new(pos, PLAYER_SIZE);
        self.anim.set_action("idle");
        self.air_time = 0;
        self.jumps = 1;
        self.wall_slide = false;
        self.dashing = 0;
    }

    /// One simulation frame: collide, animate, run the action state machine
    /// and the dash countdown.
    pub fn update(
        &mut self,
        map: &TileMap,
        movement: Vec2,
        effects: &mut Effects,
        signals: &mut Signals,
        rng: &mut SmallRng,
    ) {
        self.body.resolve(map, movement);
        self.anim.advance();

        self.air_time += 1;
        // Edge-triggered: air_time passes this value exactly once per fall.
        if self.air_time == FALL_DEATH_FRAMES + 1 {
            signals.push(Signal::Screenshake(16.0));
            signals.push(Signal::PlayerDied);
        }
        if self.body.collisions.down {
            self.air_time = 0;
            self.jumps = 1;
        }

        self.wall_slide = false;
        if (self.body.collisions.left || self.body.collisions.right)
            && self.air_time > AIRBORNE_FRAMES
        {
            self.wall_slide = true;
            self.body.velocity.y = self.body.velocity.y.min(WALL_SLIDE_MAX_FALL);
            // Face the wall being held.
            self.body.flip = !self.body.collisions.right;
            self.anim.set_action("wall_slide");
        }

        if !self.wall_slide {
            if self.air_time > AIRBORNE_FRAMES {
                self.anim.set_action("jump");
            } else if movement.x != 0.0 {
                self.anim.set_action("run");
            } else {
                self.anim.set_action("idle");
            }
        }

        // Dust bursts mark both edges of the forced dash window.
        if self.dashing.abs() == DASH_FRAMES || self.dashing.abs() == DASH_FORCE_FRAMES {
            effects.spawn_dash_burst(self.rect().center(), rng);
        }
        self.dashing -= self.dashing.signum();

        // Drag first, then the dash override, so a mid-window read of the
        // velocity sees the full dash speed rather than a dragged copy.
        if self.body.velocity.x > 0.0 {
            self.body.velocity.x = (self.body.velocity.x - DRAG_X).max(0.0);
        } else {
            self.body.velocity.x = (self.body.velocity.x + DRAG_X).min(0.0);
        }
        if self.dashing.abs() > DASH_FORCE_FRAMES {
            let dir = self.dashing.signum() as f32;
            self.body.velocity.x = dir * DASH_SPEED;
            // The last forced frame launches the recovery at a tenth speed.
            if self.dashing.abs() == DASH_FORCE_FRAMES + 1 {
                self.body.velocity.x *= 0.1;
            }
            effects.spawn_dash_stream(self.rect().center(), dir, rng);
        }
    }

    /// Try to jump. Wall-sliding converts the jump into a kick away from
    /// the wall when the player is still pushing into it; otherwise a plain
    /// vertical jump spends the remaining charge.
    pub fn jump(&mut self, effects: &mut Effects, signals: &mut Signals, rng: &mut SmallRng) -> bool {
        if self.wall_slide {
            let pushing_left = self.body.flip && self.body.last_nonzero_move.x < 0.0;
            let pushing_right = !self.body.flip && self.body.last_nonzero_move.x > 0.0;
            let kick_dir = if pushing_left {
                1.0
            } else if pushing_right {
                -1.0
            } else {
                return false;
            };
            self.body.velocity.x = kick_dir * WALL_KICK.x;
            self.body.velocity.y = WALL_KICK.y;
            self.air_time = AIRBORNE_FRAMES + 1;
            self.jumps = self.jumps.saturating_sub(1);
            effects.spawn_muzzle_sparks(self.rect().center(), kick_dir, Color::PALE, rng);
            signals.push(Signal::Jump);
            return true;
        }
        if self.jumps > 0 {
            self.body.velocity.y = JUMP_VELOCITY;
            self.jumps -= 1;
            self.air_time = AIRBORNE_FRAMES + 1;
            signals.push(Signal::Jump);
            return true;
        }
        false
    }

    /// Start a dash in the current facing. No-op while one is running.
    pub fn dash(&mut self, signals: &mut Signals) {
        if self.dashing != 0 {
            return;
        }
        self.dashing = if self.body.flip { -DASH_FRAMES } else { DASH_FRAMES };
        signals.push(Signal::Dash);
    }

    /// Fire a projectile from the muzzle point, along facing.
    pub fn shoot(&mut self, effects: &mut Effects, signals: &mut Signals, rng: &mut SmallRng) {
        let dir = self.body.facing();
        let muzzle = Vec2::new(
            self.rect().center().x + dir * SHOT_MUZZLE_OFFSET,
            self.rect().center().y,
        );
        effects.spawn_projectile(
            muzzle,
            dir * SHOT_SPEED,
            Faction::Player,
            ProjectileVisual::Orb,
            Color::VIOLET,
        );
        effects.spawn_muzzle_sparks(muzzle, dir, Color::VIOLET, rng);
        signals.push(Signal::Shoot);
    }
}
