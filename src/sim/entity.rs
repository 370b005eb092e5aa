//! Entities: a body plus behaviour
//!
//! Variants form a closed set ([`EntityKind`]). Per-variant collision
//! responses run first, then the shared [`base_collision`] routine.
//!
//! Stepping works on the world's entity slice by index, since a response may
//! touch both the moving entity and the one it hit.

use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};

use super::ball::{self, BallState};
use super::body::{Axis, BodyOptions, CollisionMask, CollisionType, PhysicsBody, Side, axis_sign};
use super::context::SimContext;
use super::controller::Controller;
use super::paddle::{self, PaddleState};
use super::world::WorldId;
use crate::consts::*;
use crate::renderer::colors::{self, Color};

static NEXT_ENTITY_ID: AtomicU32 = AtomicU32::new(1);

/// Unique entity handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    fn next() -> Self {
        Self(NEXT_ENTITY_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Render shape tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Shape {
    #[default]
    Rectangle,
    Circle,
}

/// Visual descriptor. No effect on physics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub color: Color,
    pub shape: Shape,
}

impl Image {
    pub fn new(color: Color, shape: Shape) -> Self {
        Self { color, shape }
    }

    pub fn rectangle(color: Color) -> Self {
        Self::new(color, Shape::Rectangle)
    }
}

impl Default for Image {
    fn default() -> Self {
        Self::rectangle(colors::BLACK)
    }
}

/// Behavioural variant of an entity
#[derive(Debug, Clone)]
pub enum EntityKind {
    /// Moves and reflects off obstacles, nothing else
    Plain,
    Obstacle,
    Paddle(PaddleState),
    Ball(BallState),
}

/// A simulated object
#[derive(Debug, Clone)]
pub struct Entity {
    id: EntityId,
    pub body: PhysicsBody,
    pub image: Option<Image>,
    pub controller: Option<Controller>,
    pub kind: EntityKind,
    world: Option<WorldId>,
}

impl Entity {
    /// A plain entity
    pub fn new(body: PhysicsBody, image: Option<Image>, controller: Option<Controller>) -> Self {
        Self::with_kind(EntityKind::Plain, body, image, controller)
    }

    pub(crate) fn with_kind(
        kind: EntityKind,
        body: PhysicsBody,
        image: Option<Image>,
        controller: Option<Controller>,
    ) -> Self {
        Self {
            id: EntityId::next(),
            body,
            image,
            controller,
            kind,
            world: None,
        }
    }

    /// Static solid box. Transparent unless a color is given.
    pub fn obstacle(x: f32, y: f32, width: f32, height: f32, color: Option<Color>) -> Self {
        let body = PhysicsBody::new(x, y, width, height, BodyOptions::typed(CollisionType::Obstacle));
        let image = Image::rectangle(color.unwrap_or(colors::TRANSPARENT));
        Self::with_kind(EntityKind::Obstacle, body, Some(image), None)
    }

    /// Paddle resting at `x`
    pub fn paddle(x: f32, y: f32, controller: Option<Controller>) -> Self {
        let options =
            BodyOptions::typed(CollisionType::Paddle).with_mask(CollisionType::Obstacle);
        let body = PhysicsBody::new(x, y, PADDLE_WIDTH, PADDLE_HEIGHT, options);
        Self::with_kind(
            EntityKind::Paddle(PaddleState::new(x)),
            body,
            Some(Image::rectangle(colors::BLACK)),
            controller,
        )
    }

    /// Unlaunched ball waiting on `owner`
    pub fn ball(owner: EntityId) -> Self {
        let options = BodyOptions::typed(CollisionType::Ball)
            .with_mask([CollisionType::Obstacle, CollisionType::Paddle]);
        let body = PhysicsBody::new(0.0, 0.0, BALL_SIZE, BALL_SIZE, options);
        Self::with_kind(
            EntityKind::Ball(BallState::new(owner)),
            body,
            Some(Image::new(colors::BLACK, Shape::Circle)),
            None,
        )
    }

    #[inline]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// World this entity is registered in
    #[inline]
    pub fn world(&self) -> Option<WorldId> {
        self.world
    }

    pub(crate) fn set_world(&mut self, world: Option<WorldId>) {
        self.world = world;
    }

    #[inline]
    pub fn collision_type(&self) -> CollisionType {
        self.body.collision_type()
    }

    pub fn as_ball(&self) -> Option<&BallState> {
        match &self.kind {
            EntityKind::Ball(ball) => Some(ball),
            _ => None,
        }
    }

    pub fn as_ball_mut(&mut self) -> Option<&mut BallState> {
        match &mut self.kind {
            EntityKind::Ball(ball) => Some(ball),
            _ => None,
        }
    }

    pub fn as_paddle(&self) -> Option<&PaddleState> {
        match &self.kind {
            EntityKind::Paddle(paddle) => Some(paddle),
            _ => None,
        }
    }
}

/// Position of the entity with `id` in `entities`
pub(crate) fn index_of(entities: &[Entity], id: EntityId) -> Option<usize> {
    entities.iter().position(|e| e.id == id)
}

/// Mutable access to two distinct entities
pub(crate) fn pair_mut(entities: &mut [Entity], a: usize, b: usize) -> (&mut Entity, &mut Entity) {
    debug_assert_ne!(a, b);
    if a < b {
        let (lo, hi) = entities.split_at_mut(b);
        (&mut lo[a], &mut hi[0])
    } else {
        let (lo, hi) = entities.split_at_mut(a);
        (&mut hi[0], &mut lo[b])
    }
}

/// First entity (insertion order) that the entity at `index` would overlap
/// if it stood at `at`. Only types in its collision mask are considered.
pub(crate) fn collide(entities: &[Entity], index: usize, at: glam::Vec2) -> Option<usize> {
    let me = &entities[index];
    let mask: CollisionMask = me.body.collision_mask();
    entities
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != index)
        .filter(|(_, e)| mask.accepts(e.collision_type()))
        .find(|(_, e)| me.body.overlaps_at(at, &e.body))
        .map(|(i, _)| i)
}

/// Shared response: reflect off obstacles on the contact axis
pub(crate) fn base_collision(me: &mut Entity, other: &Entity, side: Side) {
    if other.collision_type() == CollisionType::Obstacle {
        if side.is_horizontal() {
            me.body.velocity.x *= -1.0;
        } else {
            me.body.velocity.y *= -1.0;
        }
    }
}

/// Variant response followed by the base response
pub(crate) fn handle_collision(
    entities: &mut [Entity],
    index: usize,
    other: usize,
    side: Side,
    ctx: &mut SimContext,
) {
    let (me, them) = pair_mut(entities, index, other);
    match me.kind {
        EntityKind::Paddle(_) => paddle::handle_collision(me, them, side),
        EntityKind::Ball(_) => ball::handle_collision(me, them, side, ctx),
        EntityKind::Plain | EntityKind::Obstacle => {}
    }
    base_collision(me, them, side);
}

/// One tick for the entity at `index`: variant pre-update, motion sweep,
/// then the controller.
pub(crate) fn update(entities: &mut [Entity], index: usize, dt_ms: f32, ctx: &mut SimContext) {
    match entities[index].kind {
        EntityKind::Paddle(_) => paddle::pre_update(&mut entities[index], dt_ms),
        EntityKind::Ball(_) => ball::pre_update(entities, index, ctx),
        EntityKind::Plain | EntityKind::Obstacle => {}
    }

    integrate(entities, index, dt_ms, ctx);

    if let Some(controller) = entities[index].controller {
        controller.update(entities, index, dt_ms, ctx);
    }
}

/// Stepwise motion, x axis then y axis. The intended displacement is fixed
/// from the velocity at the start of the sweep.
fn integrate(entities: &mut [Entity], index: usize, dt_ms: f32, ctx: &mut SimContext) {
    let body = &entities[index].body;
    let seconds = dt_ms / 1000.0;
    let sign_x = axis_sign(body.velocity.x);
    let sign_y = axis_sign(body.velocity.y);
    let delta_x = body.velocity.x * seconds * sign_x;
    let delta_y = body.velocity.y * seconds * sign_y;

    sweep_axis(entities, index, Axis::X, sign_x, delta_x, ctx);
    sweep_axis(entities, index, Axis::Y, sign_y, delta_y, ctx);
}

/// Advance along one axis in steps no longer than the body's own extent.
/// Stops at a solid-solid contact; attempts are capped per tick.
fn sweep_axis(
    entities: &mut [Entity],
    index: usize,
    axis: Axis,
    sign: f32,
    mut delta: f32,
    ctx: &mut SimContext,
) {
    let mut attempts = 0;
    while delta > 0.0 {
        if attempts >= MAX_SWEEP_STEPS {
            log::warn!(
                "Entity {} sweep on {:?} hit {} attempts, dropping {:.2} units",
                entities[index].id.raw(),
                axis,
                MAX_SWEEP_STEPS,
                delta
            );
            break;
        }
        attempts += 1;

        let body = &entities[index].body;
        let extent = body.size.along(axis);
        let step = if delta > extent { extent } else { 1.0 };
        let mut probe = body.position;
        probe[axis.index()] += step * sign;

        match collide(entities, index, probe) {
            None => {
                entities[index].body.position[axis.index()] += step * sign;
                delta -= step;
            }
            Some(other) => {
                handle_collision(entities, index, other, Side::of_motion(axis, sign), ctx);
                if entities[other].body.is_solid() && entities[index].body.is_solid() {
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn plain(x: f32, y: f32, w: f32, h: f32, solid: bool) -> Entity {
        let options = BodyOptions::default()
            .with_mask(CollisionType::Obstacle)
            .solid(solid);
        Entity::new(PhysicsBody::new(x, y, w, h, options), None, None)
    }

    #[test]
    fn test_ids_unique() {
        let a = Entity::obstacle(0.0, 0.0, 1.0, 1.0, None);
        let b = Entity::obstacle(0.0, 0.0, 1.0, 1.0, None);
        assert_ne!(a.id(), b.id());
        assert!(a.world().is_none());
    }

    #[test]
    fn test_collide_respects_mask_and_order() {
        let mover = plain(0.0, 0.0, 10.0, 10.0, true);
        let first = Entity::obstacle(5.0, 0.0, 10.0, 10.0, None);
        let second = Entity::obstacle(5.0, 0.0, 10.0, 10.0, None);
        let decor = Entity::new(
            PhysicsBody::new(5.0, 0.0, 10.0, 10.0, BodyOptions::default()),
            None,
            None,
        );
        let entities = vec![mover, decor, first, second];

        assert_eq!(collide(&entities, 0, Vec2::ZERO), Some(2));
        assert_eq!(collide(&entities, 0, Vec2::new(-20.0, 0.0)), None);
    }

    #[test]
    fn test_free_motion_quantized_steps() {
        // 0.5 units of intended travel still moves one whole unit
        let mut entities = vec![plain(0.0, 0.0, 10.0, 10.0, true)];
        entities[0].body.velocity = Vec2::new(0.5, 0.0);
        let mut ctx = SimContext::default();
        update(&mut entities, 0, 1000.0, &mut ctx);
        assert_eq!(entities[0].body.position, Vec2::new(1.0, 0.0));

        // 25 units with a 10-wide body: 10 + 10 + 1 * 5
        entities[0].body.velocity = Vec2::new(25.0, 0.0);
        update(&mut entities, 0, 1000.0, &mut ctx);
        assert_eq!(entities[0].body.position.x, 26.0);
    }

    #[test]
    fn test_solid_contact_stops_axis_and_reflects() {
        let mut entities = vec![
            plain(0.0, 0.0, 10.0, 10.0, true),
            Entity::obstacle(30.0, -100.0, 10.0, 300.0, None),
        ];
        entities[0].body.velocity = Vec2::new(50.0, 10.0);
        let mut ctx = SimContext::default();
        update(&mut entities, 0, 1000.0, &mut ctx);

        let body = &entities[0].body;
        // One step of 10, then the probe at 20 touches the wall at 30
        assert_eq!(body.position.x, 10.0);
        assert_eq!(body.velocity.x, -50.0);
        // y axis unaffected by the x contact
        assert_eq!(body.position.y, 10.0);
        assert_eq!(body.velocity.y, 10.0);
    }

    #[test]
    fn test_non_solid_contact_is_bounded() {
        let mut entities = vec![
            plain(0.0, 0.0, 10.0, 10.0, false),
            Entity::obstacle(5.0, 0.0, 10.0, 10.0, None),
        ];
        entities[0].body.velocity = Vec2::new(100.0, 0.0);
        let mut ctx = SimContext::default();
        update(&mut entities, 0, 16.0, &mut ctx);

        // Overlapping from the start: every attempt collides, nothing commits
        assert_eq!(entities[0].body.position, Vec2::ZERO);
        // An even number of reflections leaves the sign unchanged
        assert_eq!(MAX_SWEEP_STEPS % 2, 0);
        assert_eq!(entities[0].body.velocity.x, 100.0);
    }

    #[test]
    fn test_base_collision_ignores_non_obstacles() {
        let mut a = plain(0.0, 0.0, 1.0, 1.0, true);
        a.body.velocity = Vec2::new(3.0, 4.0);
        let paddle = Entity::paddle(0.0, 0.0, None);
        base_collision(&mut a, &paddle, Side::Left);
        assert_eq!(a.body.velocity, Vec2::new(3.0, 4.0));

        let wall = Entity::obstacle(0.0, 0.0, 1.0, 1.0, None);
        base_collision(&mut a, &wall, Side::Top);
        assert_eq!(a.body.velocity, Vec2::new(3.0, -4.0));
    }

    #[test]
    fn test_pair_mut_both_orders() {
        let mut entities = vec![plain(0.0, 0.0, 1.0, 1.0, true), plain(5.0, 0.0, 1.0, 1.0, true)];
        let (a, b) = pair_mut(&mut entities, 1, 0);
        assert_eq!(a.body.position.x, 5.0);
        assert_eq!(b.body.position.x, 0.0);
    }
}
