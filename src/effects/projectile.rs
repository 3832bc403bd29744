use glam::Vec2;

use super::Color;

/// Frames a projectile may live before it silently despawns.
pub const PROJECTILE_LIFETIME: u32 = 360;

/// Who fired a projectile; decides who it can hurt.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Faction {
    Player,
    Enemy,
}

/// Which sprite the renderer should use for a projectile. Purely a render
/// tag; the kernel treats every visual identically.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ProjectileVisual {
    Bolt,
    Bomb,
    Orb,
}

/// A point projectile travelling horizontally at a fixed signed speed.
#[derive(Clone, Debug)]
pub struct Projectile {
    pub pos: Vec2,
    /// Pixels per frame; the sign is the travel direction.
    pub speed: f32,
    pub age: u32,
    pub visual: ProjectileVisual,
    pub color: Color,
    pub faction: Faction,
}

impl Projectile {
    pub fn new(pos: Vec2, speed: f32, faction: Faction, visual: ProjectileVisual, color: Color) -> Self {
        Self { pos, speed, age: 0, visual, color, faction }
    }

    pub fn advance(&mut self) {
        self.pos.x += self.speed;
        self.age += 1;
    }
}
