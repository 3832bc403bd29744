// =============================================================================
// SCENE.RS — Frame driver surface
//
// One Scene is one loaded level: the tile map, the player, the live
// hostiles, the effect registry and the signal queue the outer driver
// drains every frame. The scene is a pure fixed-timestep simulation; it
// never touches rendering, audio or input devices.
// =============================================================================

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::actors::{Enemy, EnemyKind, Player};
use crate::animation::{AnimationError, AnimationLibrary};
use crate::effects::{Effects, ParticleKind};
use crate::geometry::Rect;
use crate::tilemap::{LevelData, TileMap};

/// Frames the death counter runs before the driver should reload the level.
pub const RESPAWN_FRAMES: u32 = 40;

/// Tile kind whose variants mark actor spawn points.
pub const SPAWNER_KIND: &str = "spawners";

/// Tile kind whose tree variants emit drifting leaves.
pub const LEAF_EMITTER_KIND: &str = "large_decor";

const LEAF_EMITTER_VARIANTS: [u8; 3] = [2, 3, 4];

/// Leaf drift parameters, applied by the scene on top of the particle's own
/// velocity so the sway is keyed to each leaf's animation clock.
const LEAF_SWAY_RATE: f32 = 0.035;
const LEAF_SWAY_AMPLITUDE: f32 = 0.3;

/// Leaf spawn rate scale: each emitter fires when
/// `rng * LEAF_RATE_SCALE < area`, making the rate proportional to area.
const LEAF_RATE_SCALE: f32 = 49999.0;

const DEFAULT_PLAYER_SPAWN: Vec2 = Vec2::new(50.0, 50.0);

// ── Signals ──────────────────────────────────────────────────────────────────

/// One observable simulation event. The driver maps these onto sounds,
/// screenshake and UI; the kernel only reports them.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Signal {
    Jump,
    Dash,
    Shoot,
    PlayerHit,
    PlayerDied,
    EnemyKilled,
    /// Requested screenshake magnitude; the driver keeps the running max.
    Screenshake(f32),
}

/// Frame-scoped event queue. The driver drains it once per frame; anything
/// left over is stale and the scene never reads its own history.
#[derive(Debug, Default)]
pub struct Signals {
    events: Vec<Signal>,
}

impl Signals {
    pub fn push(&mut self, signal: Signal) {
        self.events.push(signal);
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, Signal> {
        self.events.drain(..)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Signal> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

// ── Errors ───────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LevelError {
    #[error(transparent)]
    Animation(#[from] AnimationError),
    #[error("unknown spawner variant {variant} at ({x}, {y})")]
    UnknownSpawner { variant: u8, x: f32, y: f32 },
}

// ── Scene ────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct Scene {
    pub tilemap: TileMap,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub effects: Effects,
    pub signals: Signals,
    leaf_emitters: Vec<Rect>,
    /// Frames since the player went down; zero while alive.
    dead: u32,
    rng: SmallRng,
}

impl Scene {
    pub fn load(level: &LevelData, assets: &AnimationLibrary) -> Result<Self, LevelError> {
        Self::build(level, assets, SmallRng::from_entropy())
    }

    /// Deterministic construction for tests and replays.
    pub fn load_seeded(
        level: &LevelData,
        assets: &AnimationLibrary,
        seed: u64,
    ) -> Result<Self, LevelError> {
        Self::build(level, assets, SmallRng::seed_from_u64(seed))
    }

    fn build(
        level: &LevelData,
        assets: &AnimationLibrary,
        rng: SmallRng,
    ) -> Result<Self, LevelError> {
        let mut tilemap = TileMap::from_level(level);

        let leaf_emitters = tilemap
            .extract(
                &LEAF_EMITTER_VARIANTS.map(|v| (LEAF_EMITTER_KIND, v)),
                true,
            )
            .into_iter()
            .map(|t| Rect::new(t.pos.x + 4.0, t.pos.y + 4.0, 23.0, 13.0))
            .collect();

        let spawners = tilemap.extract(
            &[
                (SPAWNER_KIND, 0),
                (SPAWNER_KIND, 1),
                (SPAWNER_KIND, 2),
                (SPAWNER_KIND, 3),
                (SPAWNER_KIND, 4),
            ],
            false,
        );
        // Whatever spawner tiles the extraction left behind carry variants
        // the kernel has no actor for.
        if let Some(stray) = tilemap.tiles().find(|t| t.kind == SPAWNER_KIND) {
            let ts = tilemap.tile_size() as f32;
            return Err(LevelError::UnknownSpawner {
                variant: stray.variant,
                x: stray.pos[0] as f32 * ts,
                y: stray.pos[1] as f32 * ts,
            });
        }
        if let Some(stray) = tilemap.offgrid_tiles().find(|t| t.kind == SPAWNER_KIND) {
            return Err(LevelError::UnknownSpawner {
                variant: stray.variant,
                x: stray.pos[0],
                y: stray.pos[1],
            });
        }

        let mut player_spawn = DEFAULT_PLAYER_SPAWN;
        let mut enemies = Vec::new();
        for spawner in spawners {
            let kind = match spawner.variant {
                0 => {
                    player_spawn = spawner.pos;
                    continue;
                }
                1 => EnemyKind::Gunner,
                2 => EnemyKind::Bomber,
                3 => EnemyKind::Creeper,
                4 => EnemyKind::Brawler,
                _ => unreachable!("extraction matched variants 0..=4"),
            };
            enemies.push(Enemy::new(kind, spawner.pos, assets)?);
        }

        Ok(Self {
            tilemap,
            player: Player::new(player_spawn, assets)?,
            enemies,
            effects: Effects::new(assets)?,
            signals: Signals::default(),
            leaf_emitters,
            dead: 0,
            rng,
        })
    }

    /// Frames since the player died, zero while alive. The driver reloads
    /// the level once this passes [`RESPAWN_FRAMES`].
    pub fn dead_frames(&self) -> u32 {
        self.dead
    }

    pub fn enemies_remaining(&self) -> usize {
        self.enemies.len()
    }

    /// Advance the whole simulation one fixed-timestep frame. `movement` is
    /// the horizontal intent from input, already normalized to `-1..=1`.
    pub fn update(&mut self, movement: Vec2) {
        for emitter in &self.leaf_emitters {
            if self.rng.gen::<f32>() * LEAF_RATE_SCALE < emitter.w * emitter.h {
                let pos = Vec2::new(
                    emitter.x + self.rng.gen::<f32>() * emitter.w,
                    emitter.y + self.rng.gen::<f32>() * emitter.h,
                );
                self.effects.spawn_leaf(pos, &mut self.rng);
            }
        }

        // Disjoint field borrows: enemies observe the player while feeding
        // the shared effect registry and signal queue.
        let Self { tilemap, player, enemies, effects, signals, rng, dead, .. } = self;
        let player_alive = *dead == 0;
        enemies.retain_mut(|enemy| {
            !enemy.update(tilemap, player, player_alive, effects, signals, rng)
        });

        if self.dead == 0 {
            self.player.update(
                &self.tilemap,
                movement,
                &mut self.effects,
                &mut self.signals,
                &mut self.rng,
            );
        } else {
            self.dead += 1;
        }

        let player_rect = self.player.rect();
        let vulnerable = self.dead == 0 && !self.player.dash_invulnerable();
        self.effects.update(
            &self.tilemap,
            player_rect,
            vulnerable,
            &mut self.signals,
            &mut self.rng,
        );

        for particle in &mut self.effects.particles {
            if particle.kind == ParticleKind::Leaf {
                particle.pos.x += (particle.anim.frames_elapsed() as f32 * LEAF_SWAY_RATE).sin()
                    * LEAF_SWAY_AMPLITUDE;
            }
        }

        // Latch the death counter off this frame's signals so every hit
        // source funnels into one respawn path.
        if self.dead == 0 {
            let hit = self
                .signals
                .iter()
                .any(|s| matches!(s, Signal::PlayerHit | Signal::PlayerDied));
            if hit {
                self.dead = 1;
                if !self.signals.iter().any(|s| matches!(s, Signal::PlayerDied)) {
                    self.signals.push(Signal::PlayerDied);
                }
            }
        }
    }

    // ── Input edges ──────────────────────────────────────────────────────

    pub fn jump(&mut self) -> bool {
        if self.dead != 0 {
            return false;
        }
        self.player.jump(&mut self.effects, &mut self.signals, &mut self.rng)
    }

    pub fn dash(&mut self) {
        if self.dead != 0 {
            return;
        }
        self.player.dash(&mut self.signals);
    }

    pub fn shoot(&mut self) {
        if self.dead != 0 {
            return;
        }
        self.player.shoot(&mut self.effects, &mut self.signals, &mut self.rng);
    }
}
