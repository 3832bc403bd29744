use glam::Vec2;

use crate::animation::{AnimationDesc, AnimationState};

/// Render/behavior tag for a drifting particle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ParticleKind {
    /// Falling canopy leaf; the scene adds a sinusoidal horizontal drift.
    Leaf,
    /// Generic dust mote used by dashes and impact bursts.
    Dust,
}

/// A free-flying animated particle. It expires when its (non-looping)
/// animation finishes; looping particle clips never self-expire and must be
/// pruned by whoever spawned them.
#[derive(Clone, Debug)]
pub struct Particle {
    pub kind: ParticleKind,
    pub pos: Vec2,
    pub velocity: Vec2,
    pub anim: AnimationState,
}

impl Particle {
    pub fn new(kind: ParticleKind, desc: AnimationDesc, pos: Vec2, velocity: Vec2) -> Self {
        Self { kind, pos, velocity, anim: AnimationState::single(desc) }
    }

    /// Fast-forward the animation clock, for staggered spawns.
    pub fn skip(&mut self, frames: u32) {
        for _ in 0..frames {
            self.anim.advance();
        }
    }

    /// Integrate one frame; returns `true` once the particle has expired.
    /// The finished flag is read before moving, so the last image gets one
    /// full frame on screen.
    pub fn update(&mut self) -> bool {
        let expired = self.anim.is_done();
        self.pos += self.velocity;
        self.anim.advance();
        expired
    }
}
