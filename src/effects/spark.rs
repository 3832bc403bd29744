use std::f32::consts::PI;

use glam::Vec2;

use super::Color;

/// Default per-frame shrink applied to a spark's speed.
pub const SPARK_DECAY: f32 = 0.1;

/// Repeated f32 subtraction of the decay leaves a ~1e-7 residue; anything
/// under this floor counts as spent, so a spark of speed `s` and decay `d`
/// dies after exactly `ceil(s / d)` updates.
const SPENT_EPSILON: f32 = 1e-4;

/// A directional line spark: it streaks along `angle` and shrinks every
/// frame. `speed` doubles as the rendered size.
#[derive(Clone, Debug)]
pub struct Spark {
    pub pos: Vec2,
    /// Travel direction in radians, `0` pointing along +x.
    pub angle: f32,
    pub speed: f32,
    pub color: Color,
    pub decay: f32,
}

impl Spark {
    pub fn new(pos: Vec2, angle: f32, speed: f32, color: Color) -> Self {
        Self { pos, angle, speed, color, decay: SPARK_DECAY }
    }

    pub fn with_decay(mut self, decay: f32) -> Self {
        self.decay = decay;
        self
    }

    /// Move and shrink one frame; returns `true` once the spark is spent.
    pub fn update(&mut self) -> bool {
        self.pos.x += self.angle.cos() * self.speed;
        self.pos.y += self.angle.sin() * self.speed;
        self.speed = (self.speed - self.decay).max(0.0);
        self.speed < SPENT_EPSILON
    }

    /// The four-point render polygon: a long diamond stretched 3× the speed
    /// along the travel axis and squashed to 0.5× across it.
    pub fn polygon(&self) -> [Vec2; 4] {
        let along = |angle: f32, scale: f32| {
            self.pos + Vec2::new(angle.cos(), angle.sin()) * self.speed * scale
        };
        [
            along(self.angle, 3.0),
            along(self.angle + PI * 0.5, 0.5),
            along(self.angle + PI, 3.0),
            along(self.angle - PI * 0.5, 0.5),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spark_expires_after_ceil_speed_over_decay_updates() {
        let mut spark = Spark::new(Vec2::ZERO, 0.0, 2.0, Color::WHITE);
        let mut updates = 0;
        while !spark.update() {
            updates += 1;
            assert!(updates < 1000, "spark never expired");
        }
        assert_eq!(updates + 1, 20); // ceil(2.0 / 0.1)
    }

    #[test]
    fn spark_travels_along_its_angle() {
        let mut spark = Spark::new(Vec2::ZERO, 0.0, 1.0, Color::WHITE);
        spark.update();
        assert!((spark.pos.x - 1.0).abs() < 1e-6);
        assert!(spark.pos.y.abs() < 1e-6);
    }

    #[test]
    fn polygon_is_centered_on_the_spark() {
        let spark = Spark::new(Vec2::new(5.0, 5.0), 1.0, 2.0, Color::WHITE);
        let points = spark.polygon();
        let centroid = points.iter().copied().sum::<Vec2>() / 4.0;
        assert!((centroid - spark.pos).length() < 1e-4);
    }
}
