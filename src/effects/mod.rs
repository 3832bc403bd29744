//! Transient combat/visual effects: projectiles, sparks and particles.
//!
//! Each category is an insertion-ordered collection with per-frame
//! update/expire semantics. Pruning is a single mark-and-filter pass per
//! category; nothing is ever removed from a collection while it is being
//! iterated.

mod particle;
mod projectile;
mod spark;

pub use particle::{Particle, ParticleKind};
pub use projectile::{Faction, Projectile, ProjectileVisual, PROJECTILE_LIFETIME};
pub use spark::{Spark, SPARK_DECAY};

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::Rng;

use crate::animation::{AnimationDesc, AnimationError, AnimationLibrary};
use crate::geometry::Rect;
use crate::scene::{Signal, Signals};
use crate::tilemap::TileMap;

// ── Color ────────────────────────────────────────────────────────────────────

/// RGB render tag carried by sparks and projectiles.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const WHITE: Self = Self([255, 255, 255]);
    pub const RED: Self = Self([255, 0, 0]);
    pub const ORANGE: Self = Self([255, 140, 0]);
    pub const VIOLET: Self = Self([160, 80, 255]);
    pub const PALE: Self = Self([220, 220, 255]);
}

// ── Registry ─────────────────────────────────────────────────────────────────

const WALL_RING_SPARKS: u32 = 12;
const IMPACT_BURST_COUNT: u32 = 30;
const MUZZLE_SPARKS: u32 = 4;
const DASH_BURST_PARTICLES: u32 = 20;

/// Owns the three live-effect collections and the particle descriptors
/// resolved from the asset layer at load time.
#[derive(Debug)]
pub struct Effects {
    pub projectiles: Vec<Projectile>,
    pub sparks: Vec<Spark>,
    pub particles: Vec<Particle>,
    leaf: AnimationDesc,
    dust: AnimationDesc,
}

impl Effects {
    pub fn new(assets: &AnimationLibrary) -> Result<Self, AnimationError> {
        let descriptor = |key: &str| {
            assets
                .get(key)
                .copied()
                .ok_or_else(|| AnimationError::Missing { key: key.to_string() })
        };
        Ok(Self {
            projectiles: Vec::new(),
            sparks: Vec::new(),
            particles: Vec::new(),
            leaf: descriptor("particle/leaf")?,
            dust: descriptor("particle/dust")?,
        })
    }

    /// Advance every live effect one frame: projectiles, then sparks, then
    /// particles. Effects spawned earlier in the same frame are updated and
    /// may expire here; there is no one-frame grace period.
    ///
    /// `player_vulnerable` is false while the player is dash-invulnerable or
    /// already down; enemy shots pass straight through in that case.
    pub fn update(
        &mut self,
        map: &TileMap,
        player_rect: Rect,
        player_vulnerable: bool,
        signals: &mut Signals,
        rng: &mut SmallRng,
    ) {
        // The projectile list is detached for the pass so expiry handlers
        // can spawn sparks/particles through `self` without aliasing it.
        let mut projectiles = std::mem::take(&mut self.projectiles);
        projectiles.retain_mut(|p| {
            p.advance();
            if map.solid_at(p.pos) {
                self.spawn_wall_ring(p.pos, p.speed, p.color, rng);
                return false;
            }
            if p.age > PROJECTILE_LIFETIME {
                return false;
            }
            if p.faction == Faction::Enemy
                && player_vulnerable
                && player_rect.contains_point(p.pos)
            {
                signals.push(Signal::PlayerHit);
                signals.push(Signal::Screenshake(16.0));
                self.spawn_impact_burst(player_rect.center(), Color::RED, rng);
                return false;
            }
            true
        });
        debug_assert!(self.projectiles.is_empty());
        self.projectiles = projectiles;

        self.sparks.retain_mut(|s| !s.update());
        self.particles.retain_mut(|p| !p.update());
    }

    // ── Spawners ─────────────────────────────────────────────────────────

    pub fn spawn_projectile(
        &mut self,
        pos: Vec2,
        speed: f32,
        faction: Faction,
        visual: ProjectileVisual,
        color: Color,
    ) {
        self.projectiles.push(Projectile::new(pos, speed, faction, visual, color));
    }

    /// Short fan of sparks around a firing direction (`dir` is ±1).
    pub fn spawn_muzzle_sparks(&mut self, pos: Vec2, dir: f32, color: Color, rng: &mut SmallRng) {
        let base = if dir < 0.0 { PI } else { 0.0 };
        for _ in 0..MUZZLE_SPARKS {
            let angle = base + rng.gen::<f32>() - 0.5;
            self.sparks.push(Spark::new(pos, angle, 2.0 + rng.gen::<f32>(), color));
        }
    }

    /// Ring of sparks fanned away from a projectile's travel direction when
    /// it buries itself in a wall.
    pub fn spawn_wall_ring(&mut self, pos: Vec2, travel_speed: f32, color: Color, rng: &mut SmallRng) {
        let base = if travel_speed > 0.0 { PI } else { 0.0 };
        for _ in 0..WALL_RING_SPARKS {
            let angle = base + rng.gen::<f32>() - 0.5;
            self.sparks.push(Spark::new(pos, angle, 2.0 + rng.gen::<f32>(), color));
        }
    }

    /// Radial burst of sparks and dust on a kill or a player hit.
    pub fn spawn_impact_burst(&mut self, center: Vec2, color: Color, rng: &mut SmallRng) {
        for _ in 0..IMPACT_BURST_COUNT {
            let angle = rng.gen::<f32>() * TAU;
            let speed = rng.gen::<f32>() * 5.0;
            self.sparks.push(Spark::new(center, angle, 2.0 + rng.gen::<f32>(), color));
            let velocity = Vec2::new((angle + PI).cos(), (angle + PI).sin()) * speed * 0.5;
            let mut dust = Particle::new(ParticleKind::Dust, self.dust, center, velocity);
            dust.skip(rng.gen_range(0..8));
            self.particles.push(dust);
        }
    }

    /// The two long horizontal "impact flash" sparks layered over a kill
    /// burst.
    pub fn spawn_impact_flash(&mut self, center: Vec2, rng: &mut SmallRng) {
        self.sparks.push(Spark::new(center, 0.0, 5.0 + rng.gen::<f32>(), Color::WHITE));
        self.sparks.push(Spark::new(center, PI, 5.0 + rng.gen::<f32>(), Color::WHITE));
    }

    /// Omnidirectional dust puff at both edges of the dash window.
    pub fn spawn_dash_burst(&mut self, center: Vec2, rng: &mut SmallRng) {
        for _ in 0..DASH_BURST_PARTICLES {
            let angle = rng.gen::<f32>() * TAU;
            let speed = rng.gen::<f32>() * 0.5 + 0.5;
            let velocity = Vec2::new(angle.cos(), angle.sin()) * speed;
            let mut dust = Particle::new(ParticleKind::Dust, self.dust, center, velocity);
            dust.skip(rng.gen_range(0..8));
            self.particles.push(dust);
        }
    }

    /// One trailing dust mote per frame while the dash window is open.
    pub fn spawn_dash_stream(&mut self, center: Vec2, dir: f32, rng: &mut SmallRng) {
        let velocity = Vec2::new(dir * rng.gen::<f32>() * 3.0, 0.0);
        let mut dust = Particle::new(ParticleKind::Dust, self.dust, center, velocity);
        dust.skip(rng.gen_range(0..8));
        self.particles.push(dust);
    }

    /// A canopy leaf with a slow downward drift and a randomized clip start
    /// so simultaneous leaves don't flip in lockstep.
    pub fn spawn_leaf(&mut self, pos: Vec2, rng: &mut SmallRng) {
        let mut leaf =
            Particle::new(ParticleKind::Leaf, self.leaf, pos, Vec2::new(-0.1, 0.3));
        leaf.skip(rng.gen_range(0..20));
        self.particles.push(leaf);
    }
}
