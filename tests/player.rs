use glam::Vec2;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tilefall::actors::Player;
use tilefall::animation::{AnimationDesc, AnimationLibrary};
use tilefall::effects::Effects;
use tilefall::scene::{Signal, Signals};
use tilefall::tilemap::{Tile, TileMap};

fn assets() -> AnimationLibrary {
    let mut lib = AnimationLibrary::new();
    let clip = AnimationDesc { image_count: 4, image_duration: 6, looping: true };
    for key in ["player/idle", "player/run", "player/jump", "player/wall_slide"] {
        lib.insert(key, clip);
    }
    lib.insert(
        "particle/leaf",
        AnimationDesc { image_count: 18, image_duration: 20, looping: false },
    );
    lib.insert(
        "particle/dust",
        AnimationDesc { image_count: 4, image_duration: 6, looping: false },
    );
    lib
}

fn tile(kind: &str, x: i32, y: i32) -> Tile {
    Tile { kind: kind.to_string(), variant: 0, pos: [x, y] }
}

/// Forty grass tiles along row 10, long enough to dash across.
fn floor_map() -> TileMap {
    let mut map = TileMap::new(16);
    for x in 0..40 {
        map.insert(tile("grass", x, 10));
    }
    map
}

struct Rig {
    map: TileMap,
    player: Player,
    effects: Effects,
    signals: Signals,
    rng: SmallRng,
}

impl Rig {
    fn on_floor() -> Self {
        let lib = assets();
        let mut rig = Self {
            map: floor_map(),
            player: Player::new(Vec2::new(32.0, 140.0), &lib).unwrap(),
            effects: Effects::new(&lib).unwrap(),
            signals: Signals::default(),
            rng: SmallRng::seed_from_u64(7),
        };
        // Settle onto the floor.
        for _ in 0..30 {
            rig.step(Vec2::ZERO);
        }
        assert!(rig.player.body.collisions.down);
        rig
    }

    fn step(&mut self, movement: Vec2) {
        self.player.update(
            &self.map,
            movement,
            &mut self.effects,
            &mut self.signals,
            &mut self.rng,
        );
    }

    fn jump(&mut self) -> bool {
        self.player.jump(&mut self.effects, &mut self.signals, &mut self.rng)
    }
}

#[test]
fn test_jump_spends_the_charge_until_landing() {
    let mut rig = Rig::on_floor();
    assert_eq!(rig.player.jumps(), 1);

    assert!(rig.jump());
    assert_eq!(rig.player.body.velocity.y, -3.0);
    assert_eq!(rig.player.jumps(), 0);

    rig.step(Vec2::ZERO);
    assert!(!rig.jump(), "no double jump while airborne");

    // Ride the arc back down to the floor.
    for _ in 0..120 {
        rig.step(Vec2::ZERO);
        if rig.player.body.collisions.down && rig.player.air_time() == 0 {
            break;
        }
    }
    assert_eq!(rig.player.jumps(), 1, "landing restores the charge");
    assert!(rig.jump());
}

#[test]
fn test_dash_window_forces_full_speed_then_decays() {
    let mut rig = Rig::on_floor();
    let mut signals = Signals::default();
    rig.player.dash(&mut signals);
    assert!(signals.iter().any(|s| matches!(s, Signal::Dash)));
    assert!(rig.player.dash_invulnerable());
    assert!(!rig.player.visible(), "sprite hides during the forced window");

    // Nine forced frames: eight at full speed, the boundary frame at a
    // tenth of it.
    for frame in 1..=8 {
        rig.step(Vec2::ZERO);
        assert_eq!(rig.player.body.velocity.x, 8.0, "frame {frame}");
    }
    rig.step(Vec2::ZERO);
    assert!((rig.player.body.velocity.x - 0.8).abs() < 1e-6);

    // Recovery: plain drag toward zero, 0.1 per frame.
    let mut prev = rig.player.body.velocity.x;
    for _ in 0..10 {
        rig.step(Vec2::ZERO);
        let vx = rig.player.body.velocity.x;
        assert!(vx <= prev);
        assert!(vx >= 0.0);
        prev = vx;
    }
    assert_eq!(prev, 0.0);
    assert!(rig.player.visible());
}

#[test]
fn test_dash_is_a_no_op_while_dashing() {
    let mut rig = Rig::on_floor();
    let mut signals = Signals::default();
    rig.player.dash(&mut signals);
    rig.step(Vec2::ZERO);
    let countdown = rig.player.dashing();
    rig.player.dash(&mut signals);
    assert_eq!(rig.player.dashing(), countdown);
}

#[test]
fn test_wall_slide_engages_and_caps_fall_speed() {
    let lib = assets();
    let mut map = TileMap::new(16);
    // A tall stone column at cells x = 5, no floor.
    for y in 0..12 {
        map.insert(tile("stone", 5, y));
    }
    let mut rig = Rig {
        map,
        player: Player::new(Vec2::new(72.0, 0.0), &lib).unwrap(),
        effects: Effects::new(&lib).unwrap(),
        signals: Signals::default(),
        rng: SmallRng::seed_from_u64(7),
    };

    // Push into the wall; the first few frames are still plain falling.
    for _ in 0..4 {
        rig.step(Vec2::new(1.0, 0.0));
        assert!(!rig.player.wall_sliding());
    }
    for _ in 0..30 {
        rig.step(Vec2::new(1.0, 0.0));
        assert!(rig.player.wall_sliding());
        assert!(rig.player.body.velocity.y <= 0.5);
        assert!(!rig.player.body.flip, "faces the wall on the right");
        assert_eq!(rig.player.anim.action(), "wall_slide");
    }
}

#[test]
fn test_wall_kick_launches_away_from_the_wall() {
    let lib = assets();
    let mut map = TileMap::new(16);
    for y in 0..12 {
        map.insert(tile("stone", 5, y));
    }
    let mut rig = Rig {
        map,
        player: Player::new(Vec2::new(72.0, 0.0), &lib).unwrap(),
        effects: Effects::new(&lib).unwrap(),
        signals: Signals::default(),
        rng: SmallRng::seed_from_u64(7),
    };
    for _ in 0..10 {
        rig.step(Vec2::new(1.0, 0.0));
    }
    assert!(rig.player.wall_sliding());

    assert!(rig.jump());
    assert_eq!(rig.player.body.velocity.x, -3.5, "kicked away from the wall");
    assert_eq!(rig.player.body.velocity.y, -2.5);
    assert!(rig.signals.iter().any(|s| matches!(s, Signal::Jump)));
}

#[test]
fn test_fall_death_signal_fires_exactly_once() {
    let lib = assets();
    let mut rig = Rig {
        map: TileMap::new(16),
        player: Player::new(Vec2::ZERO, &lib).unwrap(),
        effects: Effects::new(&lib).unwrap(),
        signals: Signals::default(),
        rng: SmallRng::seed_from_u64(7),
    };
    let mut deaths = 0;
    let mut shakes = 0;
    for _ in 0..200 {
        rig.step(Vec2::ZERO);
        for signal in rig.signals.drain() {
            match signal {
                Signal::PlayerDied => deaths += 1,
                Signal::Screenshake(_) => shakes += 1,
                _ => {}
            }
        }
    }
    assert_eq!(deaths, 1);
    assert_eq!(shakes, 1);
}

#[test]
fn test_shoot_spawns_projectile_and_sparks_at_the_muzzle() {
    let mut rig = Rig::on_floor();
    rig.step(Vec2::new(1.0, 0.0));
    let center = rig.player.rect().center();
    rig.player.shoot(&mut rig.effects, &mut rig.signals, &mut rig.rng);

    assert_eq!(rig.effects.projectiles.len(), 1);
    let shot = &rig.effects.projectiles[0];
    assert_eq!(shot.speed, 3.0);
    assert_eq!(shot.pos, Vec2::new(center.x + 8.0, center.y));
    assert_eq!(rig.effects.sparks.len(), 4);
    assert!(rig.signals.iter().any(|s| matches!(s, Signal::Shoot)));
}
