use glam::Vec2;
use tilefall::actors::EnemyKind;
use tilefall::animation::{AnimationDesc, AnimationLibrary};
use tilefall::effects::ParticleKind;
use tilefall::scene::{LevelError, Scene, Signal, RESPAWN_FRAMES};
use tilefall::tilemap::{LevelData, OffgridTile, Tile};

fn assets() -> AnimationLibrary {
    let mut lib = AnimationLibrary::new();
    let clip = AnimationDesc { image_count: 4, image_duration: 6, looping: true };
    for kind in ["player", "gunner", "bomber", "creeper", "brawler"] {
        for action in ["idle", "run", "jump", "wall_slide"] {
            lib.insert(format!("{kind}/{action}"), clip);
        }
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

fn tile(kind: &str, variant: u8, x: i32, y: i32) -> Tile {
    Tile { kind: kind.to_string(), variant, pos: [x, y] }
}

/// A flat level: grass along row 10 covering cells `0..cells`.
fn flat_level(cells: i32) -> LevelData {
    let mut level = LevelData::default();
    for x in 0..cells {
        level.tiles.push(tile("grass", 1, x, 10));
    }
    level
}

#[test]
fn test_player_settles_on_the_floor() {
    let mut level = flat_level(10);
    level.tiles.push(tile("spawners", 0, 3, 5));
    let mut scene = Scene::load_seeded(&level, &assets(), 1).unwrap();

    for _ in 0..200 {
        scene.update(Vec2::ZERO);
        scene.signals.drain();
    }
    assert_eq!(scene.player.body.pos.y, 145.0);
    assert!(scene.player.body.collisions.down);
    assert_eq!(scene.player.body.velocity.y, 0.0);
    assert_eq!(scene.player.air_time(), 0);
    assert_eq!(scene.dead_frames(), 0);
}

#[test]
fn test_spawners_seed_actors_in_level_order() {
    let mut level = flat_level(10);
    level.tiles.push(tile("spawners", 0, 0, 9));
    level.tiles.push(tile("spawners", 1, 2, 9));
    level.tiles.push(tile("spawners", 2, 4, 9));
    level.tiles.push(tile("spawners", 3, 6, 9));
    level.tiles.push(tile("spawners", 4, 8, 9));
    let scene = Scene::load_seeded(&level, &assets(), 1).unwrap();

    assert_eq!(scene.player.body.pos, Vec2::new(0.0, 144.0));
    assert_eq!(scene.enemies_remaining(), 4);
    let kinds: Vec<EnemyKind> = scene.enemies.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![EnemyKind::Gunner, EnemyKind::Bomber, EnemyKind::Creeper, EnemyKind::Brawler]
    );
    assert_eq!(scene.enemies[0].body.pos, Vec2::new(32.0, 144.0));
    // Spawner tiles never survive into the collision map.
    assert!(scene.tilemap.tiles().all(|t| t.kind != "spawners"));
}

#[test]
fn test_unknown_spawner_variant_is_a_load_error() {
    let mut level = flat_level(10);
    level.tiles.push(tile("spawners", 7, 3, 9));
    let err = Scene::load_seeded(&level, &assets(), 1).unwrap_err();
    assert!(matches!(err, LevelError::UnknownSpawner { variant: 7, .. }));
}

#[test]
fn test_dash_kills_a_hostile_and_spares_the_player() {
    let mut level = flat_level(40);
    level.tiles.push(tile("spawners", 0, 2, 9));
    level.tiles.push(tile("spawners", 4, 4, 9));
    let mut scene = Scene::load_seeded(&level, &assets(), 1).unwrap();
    assert_eq!(scene.enemies_remaining(), 1);

    // Settle, then dash right through the brawler.
    for _ in 0..30 {
        scene.update(Vec2::ZERO);
        scene.signals.drain();
    }
    scene.dash();
    let mut killed = false;
    for _ in 0..20 {
        scene.update(Vec2::ZERO);
        for signal in scene.signals.drain() {
            if matches!(signal, Signal::EnemyKilled) {
                killed = true;
            }
        }
    }
    assert!(killed);
    assert_eq!(scene.enemies_remaining(), 0);
    assert_eq!(scene.dead_frames(), 0, "the dasher walks away");
}

#[test]
fn test_fall_death_latches_the_counter_and_blocks_input() {
    let mut level = LevelData::default();
    level.tiles.push(tile("spawners", 0, 3, 3));
    let mut scene = Scene::load_seeded(&level, &assets(), 1).unwrap();

    let mut deaths = 0;
    for _ in 0..130 {
        scene.update(Vec2::ZERO);
        for signal in scene.signals.drain() {
            if matches!(signal, Signal::PlayerDied) {
                deaths += 1;
            }
        }
    }
    assert_eq!(deaths, 1);
    assert_eq!(scene.dead_frames(), 10);
    assert!(!scene.jump(), "input is ignored while dead");

    // The driver reloads once the counter passes the respawn delay.
    for _ in 0..RESPAWN_FRAMES {
        scene.update(Vec2::ZERO);
        scene.signals.drain();
    }
    assert!(scene.dead_frames() > RESPAWN_FRAMES);
}

#[test]
fn test_tree_decor_emits_drifting_leaves() {
    let mut level = flat_level(10);
    level.tiles.push(tile("spawners", 0, 3, 5));
    level.offgrid.push(OffgridTile {
        kind: "large_decor".to_string(),
        variant: 2,
        pos: [100.0, 50.0],
    });
    let mut scene = Scene::load_seeded(&level, &assets(), 1).unwrap();
    // The emitter copies the decor tile; it still renders.
    assert_eq!(scene.tilemap.offgrid_tiles().count(), 1);

    let mut saw_leaf = false;
    for _ in 0..4000 {
        scene.update(Vec2::ZERO);
        scene.signals.drain();
        if scene.effects.particles.iter().any(|p| p.kind == ParticleKind::Leaf) {
            saw_leaf = true;
        }
    }
    assert!(saw_leaf, "a 23x13 canopy should shed leaves");
}

#[test]
fn test_input_edges_push_signals_for_the_driver() {
    let mut level = flat_level(10);
    level.tiles.push(tile("spawners", 0, 3, 9));
    let mut scene = Scene::load_seeded(&level, &assets(), 1).unwrap();
    for _ in 0..10 {
        scene.update(Vec2::ZERO);
        scene.signals.drain();
    }

    assert!(scene.jump());
    scene.shoot();
    let drained: Vec<Signal> = scene.signals.drain().collect();
    assert!(drained.iter().any(|s| matches!(s, Signal::Jump)));
    assert!(drained.iter().any(|s| matches!(s, Signal::Shoot)));
    assert!(scene.signals.is_empty());
}
