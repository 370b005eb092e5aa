//! World: the ordered entity collection and the per-tick update
//!
//! Iteration, collision queries and pending-action resolution all follow
//! insertion order.

use std::sync::atomic::{AtomicU32, Ordering};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ball;
use super::body::{CollisionType, Side};
use super::context::SimContext;
use super::entity::{self, Entity, EntityId, index_of};

static NEXT_WORLD_ID: AtomicU32 = AtomicU32::new(1);

/// Unique world handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldId(u32);

impl WorldId {
    fn next() -> Self {
        Self(NEXT_WORLD_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Entity container
#[derive(Debug)]
pub struct World {
    id: WorldId,
    entities: Vec<Entity>,
}

impl World {
    pub fn new() -> Self {
        Self {
            id: WorldId::next(),
            entities: Vec::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> WorldId {
        self.id
    }

    /// Register an entity. An entity already present keeps its slot.
    pub fn add_entity(&mut self, mut entity: Entity) -> EntityId {
        let id = entity.id();
        if self.contains(id) {
            log::debug!("Entity {} already in world", id.raw());
            return id;
        }
        entity.set_world(Some(self.id));
        self.entities.push(entity);
        id
    }

    /// Unregister an entity, preserving the order of the rest
    pub fn remove_entity(&mut self, id: EntityId) -> Option<Entity> {
        let index = index_of(&self.entities, id)?;
        let mut entity = self.entities.remove(index);
        entity.set_world(None);
        Some(entity)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        index_of(&self.entities, id).is_some()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        index_of(&self.entities, id).map(|i| &self.entities[i])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        index_of(&self.entities, id).map(|i| &mut self.entities[i])
    }

    /// All entities, in insertion order
    #[inline]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entities of one collision type, in insertion order
    pub fn filter(&self, ty: CollisionType) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(move |e| e.collision_type() == ty)
    }

    /// Advance the clock, fire due resets and launches, then step every
    /// entity once.
    pub fn update(&mut self, dt_ms: f32, ctx: &mut SimContext) {
        ctx.advance(dt_ms);
        ball::resolve_pending(&mut self.entities, ctx);
        for index in 0..self.entities.len() {
            entity::update(&mut self.entities, index, dt_ms, ctx);
        }
    }

    /// First entity the given one would overlap at `at`, honoring its mask
    pub fn collide(&self, id: EntityId, at: Vec2) -> Option<EntityId> {
        let index = index_of(&self.entities, id)?;
        entity::collide(&self.entities, index, at).map(|i| self.entities[i].id())
    }

    /// Run the collision response of `id` against `other`
    pub fn handle_collision(
        &mut self,
        id: EntityId,
        other: EntityId,
        side: Side,
        ctx: &mut SimContext,
    ) -> bool {
        let (Some(a), Some(b)) = (index_of(&self.entities, id), index_of(&self.entities, other))
        else {
            return false;
        };
        if a == b {
            return false;
        }
        entity::handle_collision(&mut self.entities, a, b, side, ctx);
        true
    }

    /// Stop `ball` now and serve it from `target` after `delay_ms`
    pub fn reset_ball(
        &mut self,
        ball_id: EntityId,
        target: EntityId,
        delay_ms: f64,
        ctx: &SimContext,
    ) -> bool {
        let fire_at = ctx.now_ms() + delay_ms.max(0.0);
        match self.get_mut(ball_id) {
            Some(ball) if ball.as_ball().is_some() => {
                ball::schedule_reset(ball, target, fire_at);
                true
            }
            _ => false,
        }
    }

    /// Launch `ball` after `delay_ms`. False if unknown or already launched.
    pub fn launch_ball(&mut self, ball_id: EntityId, delay_ms: f64, ctx: &SimContext) -> bool {
        let fire_at = ctx.now_ms() + delay_ms.max(0.0);
        self.get_mut(ball_id)
            .and_then(Entity::as_ball_mut)
            .is_some_and(|state| state.schedule_launch(fire_at))
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
