//! The two simulated actor kinds: the player character and patrolling
//! enemies. Both wrap a [`PhysicsBody`](crate::physics::PhysicsBody) and an
//! [`AnimationState`](crate::animation::AnimationState) and layer their own
//! state machine on top.

pub mod enemy;
pub mod player;

pub use enemy::{Enemy, EnemyKind};
pub use player::Player;
