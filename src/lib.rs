pub mod actors;
pub mod animation;
pub mod effects;
pub mod geometry;
pub mod physics;
pub mod scene;
pub mod tilemap;

/// Simulation frames per second the kernel is tuned for. The kernel itself
/// never sleeps or measures time; the frame driver is expected to call
/// [`scene::Scene::update`] at this cadence.
pub const FRAME_RATE: u32 = 60;
