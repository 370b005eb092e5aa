//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Entities step in insertion order
//! - Randomness comes from the seeded context RNG only
//! - Delayed actions run on the simulation clock, not wall time
//! - No rendering or platform dependencies

pub mod ball;
pub mod body;
pub mod context;
pub mod controller;
pub mod entity;
pub mod game;
pub mod input;
pub mod paddle;
pub mod world;

pub use ball::BallState;
pub use body::{Axis, BodyOptions, CollisionMask, CollisionType, PhysicsBody, Side, Size};
pub use context::{Arena, Score, SimContext};
pub use controller::{Controller, KeyBindings};
pub use entity::{Entity, EntityId, EntityKind, Image, Shape};
pub use game::{BallSpawner, Game};
pub use input::{InputState, Key};
pub use paddle::PaddleState;
pub use world::{World, WorldId};
