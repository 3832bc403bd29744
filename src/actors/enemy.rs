// =============================================================================
// ENEMY.RS — Patrolling hostiles
//
// Every hostile shares one chassis: a walk countdown that paces back and
// forth between ledges and walls, an attack attempt when the countdown
// runs out, and two ways to die (player dash, player projectile). Kinds
// differ only in the per-kind config table below.
// =============================================================================

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::Rng;

use crate::animation::{AnimationError, AnimationLibrary, AnimationState};
use crate::effects::{Color, Effects, Faction, ProjectileVisual};
use crate::geometry::Rect;
use crate::physics::PhysicsBody;
use crate::scene::{Signal, Signals};
use crate::tilemap::TileMap;

use super::player::Player;

pub const ENEMY_SIZE: Vec2 = Vec2::new(8.0, 15.0);

/// Patrol speed, in pixels per frame.
pub const WALK_SPEED: f32 = 0.5;

/// Ledge probe: a point this far ahead of the body center and this far
/// below the body top must be solid for the patrol to keep advancing.
pub const LEDGE_PROBE_X: f32 = 7.0;
pub const LEDGE_PROBE_Y: f32 = 23.0;

/// Vertical band within which a ranged enemy considers the player a target.
pub const SIGHT_BAND: f32 = 16.0;

/// Enemy projectile speed, signed by facing at fire time.
pub const SHOT_SPEED: f32 = 1.5;

/// Muzzle offset from the body center, along facing.
pub const SHOT_MUZZLE_OFFSET: f32 = 7.0;

/// Chance per idle frame to start a new patrol leg.
pub const WALK_RESTART_CHANCE: f64 = 0.01;

const ACTIONS: [&str; 2] = ["idle", "run"];

/// The closed set of hostile variants, in level-data spawner order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EnemyKind {
    /// Rifle shooter; ranged only.
    Gunner,
    /// Lobbed-looking shot, still a straight line; ranged only.
    Bomber,
    /// Fires orbs and also hurts on contact.
    Creeper,
    /// Contact damage only, never fires.
    Brawler,
}

struct KindConfig {
    /// Animation namespace, e.g. `"gunner/idle"`.
    asset_kind: &'static str,
    ranged: Option<(ProjectileVisual, Color)>,
    melee: bool,
}

impl EnemyKind {
    fn config(self) -> KindConfig {
        match self {
            EnemyKind::Gunner => KindConfig {
                asset_kind: "gunner",
                ranged: Some((ProjectileVisual::Bolt, Color::WHITE)),
                melee: false,
            },
            EnemyKind::Bomber => KindConfig {
                asset_kind: "bomber",
                ranged: Some((ProjectileVisual::Bomb, Color::ORANGE)),
                melee: false,
            },
            EnemyKind::Creeper => KindConfig {
                asset_kind: "creeper",
                ranged: Some((ProjectileVisual::Orb, Color::VIOLET)),
                melee: true,
            },
            EnemyKind::Brawler => KindConfig {
                asset_kind: "brawler",
                ranged: None,
                melee: true,
            },
        }
    }
}

#[derive(Debug)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub body: PhysicsBody,
    pub anim: AnimationState,
    /// Frames left in the current patrol leg; zero means standing.
    walking: u32,
}

impl Enemy {
    pub fn new(kind: EnemyKind, pos: Vec2, assets: &AnimationLibrary) -> Result<Self, AnimationError> {
        let table = assets.action_table(kind.config().asset_kind, &ACTIONS)?;
        Ok(Self {
            kind,
            body: PhysicsBody::new(pos, ENEMY_SIZE),
            anim: AnimationState::new(table, "idle"),
            walking: 0,
        })
    }

    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    /// Force a patrol leg; test/scripting hook.
    pub fn set_walking(&mut self, frames: u32) {
        self.walking = frames;
    }

    /// One simulation frame. Returns `true` when the enemy died and must be
    /// removed by the caller.
    pub fn update(
        &mut self,
        map: &TileMap,
        player: &Player,
        player_alive: bool,
        effects: &mut Effects,
        signals: &mut Signals,
        rng: &mut SmallRng,
    ) -> bool {
        let mut movement = Vec2::ZERO;
        if self.walking > 0 {
            let probe = Vec2::new(
                self.rect().center().x + self.body.facing() * LEDGE_PROBE_X,
                self.body.pos.y + LEDGE_PROBE_Y,
            );
            if map.solid_at(probe) {
                if self.body.collisions.right || self.body.collisions.left {
                    self.body.flip = !self.body.flip;
                } else {
                    movement.x = self.body.facing() * WALK_SPEED;
                }
            } else {
                // Ledge ahead: turn around instead of stepping off.
                self.body.flip = !self.body.flip;
            }
            self.walking -= 1;
            if self.walking == 0 && player_alive {
                self.try_ranged_attack(player, effects, signals, rng);
            }
        } else if rng.gen_bool(WALK_RESTART_CHANCE) {
            self.walking = rng.gen_range(30..120);
        }

        self.body.resolve(map, movement);
        self.anim.advance();
        if movement.x != 0.0 {
            self.anim.set_action("run");
        } else {
            self.anim.set_action("idle");
        }

        // A dashing player shreds anything they pass through.
        if player.dash_invulnerable() && self.rect().overlaps(&player.rect()) {
            self.explode(effects, signals, rng);
            return true;
        }

        // Player shots are points; the first one inside the body connects
        // and is consumed.
        let hit = effects
            .projectiles
            .iter()
            .position(|p| p.faction == Faction::Player && self.rect().contains_point(p.pos));
        if let Some(idx) = hit {
            effects.projectiles.remove(idx);
            self.explode(effects, signals, rng);
            return true;
        }

        if self.kind.config().melee
            && player_alive
            && !player.dash_invulnerable()
            && self.rect().overlaps(&player.rect())
        {
            effects.spawn_impact_burst(player.rect().center(), Color::RED, rng);
            signals.push(Signal::PlayerHit);
            signals.push(Signal::Screenshake(16.0));
        }

        false
    }

    /// Fire at the player if this kind is ranged, the player sits within the
    /// sight band and this body is facing them.
    fn try_ranged_attack(
        &mut self,
        player: &Player,
        effects: &mut Effects,
        signals: &mut Signals,
        rng: &mut SmallRng,
    ) {
        let Some((visual, color)) = self.kind.config().ranged else {
            return;
        };
        let delta = player.body.pos - self.body.pos;
        if delta.y.abs() >= SIGHT_BAND {
            return;
        }
        let dir = self.body.facing();
        if delta.x * dir <= 0.0 {
            return;
        }
        let muzzle = Vec2::new(
            self.rect().center().x + dir * SHOT_MUZZLE_OFFSET,
            self.rect().center().y,
        );
        effects.spawn_projectile(muzzle, dir * SHOT_SPEED, Faction::Enemy, visual, color);
        effects.spawn_muzzle_sparks(muzzle, dir, color, rng);
        signals.push(Signal::Shoot);
    }

    fn explode(&self, effects: &mut Effects, signals: &mut Signals, rng: &mut SmallRng) {
        signals.push(Signal::EnemyKilled);
        signals.push(Signal::Screenshake(16.0));
        effects.spawn_impact_burst(self.rect().center(), Color::WHITE, rng);
        effects.spawn_impact_flash(self.rect().center(), rng);
    }
}
